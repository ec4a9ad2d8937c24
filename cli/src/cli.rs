//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, ConfigFlags, OutputFlags};
use crate::commands;
use crate::domain::config::DEFAULT_PROFILE;
use crate::domain::{Overrides, Transition};
use crate::infra::config::YamlConfigStore;

/// Create, provision and tear down JiffyBox cloud servers
#[derive(Parser)]
#[command(
    name = "jiffyi",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// API token of the JiffyBox account
    #[arg(short = 'a', long, global = true, env = "JIFFY_APITOKEN", hide_env_values = true)]
    pub apitoken: Option<String>,

    /// Profile section of ~/.jiffyirc to use
    #[arg(long, global = true, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Base URL of the JiffyBox API
    #[arg(long, global = true, env = "JIFFY_API_URL")]
    pub api_url: Option<String>,

    /// Give up waiting on a box after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List boxes, plans or distributions
    List(commands::list::ListArgs),

    /// Show one box
    Show(commands::TargetArgs),

    /// Create a box and wait until it runs
    Create(commands::create::CreateArgs),

    /// Start a box
    Start(commands::TargetArgs),

    /// Stop a box (`now` pulls the plug)
    Stop(commands::StopArgs),

    /// Freeze a box
    Freeze(commands::TargetArgs),

    /// Thaw a frozen box
    Thaw(commands::TargetArgs),

    /// Delete a stopped box
    Delete(commands::TargetArgs),

    /// Write a box's public address to ~/.jiffyi/selected
    Select(commands::TargetArgs),

    /// Create a box and run preset scripts on it
    Install(commands::install::InstallArgs),

    /// Stop a box and delete it once stopped
    Teardown(commands::StopArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            apitoken,
            profile,
            api_url,
            timeout,
            yes,
            json,
            quiet,
            no_color,
            verbose: _,
            command,
        } = self;

        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
            config: ConfigFlags {
                profile,
                overrides: Overrides {
                    apitoken,
                    api_url,
                    timeout_secs: timeout,
                },
            },
        };
        let app = AppContext::new(flags, &YamlConfigStore::from_env()?)?;

        match command {
            Command::List(args) => commands::list::run(&app, &app.api()?, &args).await,
            Command::Show(target) => commands::show::run(&app, &app.api()?, &target).await,
            Command::Create(args) => commands::create::run(&app, &app.api()?, &args).await,
            Command::Start(target) => {
                commands::power::run(&app, &app.api()?, &target, Transition::Start).await
            }
            Command::Stop(args) => {
                let action = Transition::stop(args.is_now());
                commands::power::run(&app, &app.api()?, &args.target, action).await
            }
            Command::Freeze(target) => {
                commands::power::run(&app, &app.api()?, &target, Transition::Freeze).await
            }
            Command::Thaw(target) => {
                commands::power::run(&app, &app.api()?, &target, Transition::Thaw).await
            }
            Command::Delete(target) => commands::delete::run(&app, &app.api()?, &target).await,
            Command::Select(target) => {
                commands::select::run(&app, &app.api()?, &app.selection()?, &target).await
            }
            Command::Install(args) => {
                let shell = app.shell();
                let scripts = app.scripts();
                commands::install::run(&app, &app.api()?, &shell, &scripts, &args).await
            }
            Command::Teardown(args) => commands::teardown::run(&app, &app.api()?, &args).await,
        }
    }
}
