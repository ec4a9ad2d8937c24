//! Application context: unified state passed to every command handler.
//!
//! `AppContext` carries the output context, the resolved settings and the
//! interaction mode. Adapters are built on demand so commands that never touch
//! the API do not need a token.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::DEFAULT_PROFILE;
use crate::domain::{JiffyError, Overrides, Settings};
use crate::infra::api::HttpBoxApi;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::scripts::LocalScriptsDir;
use crate::infra::selection::{FileSelectionStore, state_dir};
use crate::infra::ssh::OpenSsh;
use crate::output::reporter::TerminalReporter;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `JIFFY_YES` env vars).
    pub yes: bool,
}

/// Which config profile to use and what overrides it.
pub struct ConfigFlags {
    pub profile: String,
    pub overrides: Overrides,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    pub config: ConfigFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Profile merged with command-line overrides.
    pub settings: Settings,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `JIFFY_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags and the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or names
    /// no profile called `flags.config.profile`.
    pub fn new(flags: AppFlags, store: &impl ConfigStore) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("JIFFY_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config = store.load()?;
        let profile_name = flags.config.profile;
        if profile_name != DEFAULT_PROFILE && !config.0.contains_key(&profile_name) {
            return Err(JiffyError::Configuration(format!(
                "profile '{profile_name}' not found in {}",
                store.path()?.display()
            ))
            .into());
        }
        tracing::debug!(profile = %profile_name, "using config profile");
        let settings = Settings::resolve(config.profile(&profile_name), flags.config.overrides);

        Ok(Self {
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet,
                flags.output.json,
            ),
            mode,
            settings,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// HTTP client for the hosting API.
    ///
    /// # Errors
    ///
    /// Fails with `Configuration` when no API token is configured.
    pub fn api(&self) -> Result<HttpBoxApi> {
        let token = self.settings.require_token()?;
        HttpBoxApi::new(&self.settings.api_url, token)
    }

    #[must_use]
    pub fn shell(&self) -> OpenSsh<TokioCommandRunner> {
        OpenSsh::new(TokioCommandRunner::default())
    }

    #[must_use]
    pub fn scripts(&self) -> LocalScriptsDir {
        LocalScriptsDir::new(self.settings.scripts_dir.clone())
    }

    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn selection(&self) -> Result<FileSelectionStore> {
        FileSelectionStore::from_env()
    }

    /// Directory holding ssh control sockets.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn control_dir(&self) -> Result<PathBuf> {
        Ok(state_dir()?.join("cm"))
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `JIFFY_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
