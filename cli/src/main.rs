//! jiffyi - create, provision and tear down JiffyBox cloud servers

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jiffy_cli::cli::Cli;
use jiffy_cli::domain::JiffyError;
use jiffy_cli::output::json;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "JIFFY_LOG";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let as_json = cli.json;
    if let Err(e) = cli.run().await {
        let message = format!("{e:#}");
        if as_json {
            let code = e.downcast_ref::<JiffyError>().map_or("internal", JiffyError::code);
            if let Ok(doc) = json::format_error(&message, code) {
                println!("{doc}");
            }
        }
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; `JIFFY_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}
