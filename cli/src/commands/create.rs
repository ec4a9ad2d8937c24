//! `jiffyi create -n NAME -p PLANID -d DISTRIBUTION`

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::BoxApi;
use crate::application::services::lifecycle::LifecycleController;
use crate::domain::CreateSpec;
use crate::domain::config::CreateDefaults;

/// Name, plan and distribution of a new box; profile values fill the gaps.
#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Name of the new box
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Plan id
    #[arg(short = 'p', long = "plan")]
    pub plan_id: Option<String>,

    /// Distribution key, e.g. ubuntu_12_4_lts_64bit
    #[arg(short = 'd', long)]
    pub distribution: Option<String>,

    /// Return once the create request is accepted
    #[arg(long)]
    pub no_wait: bool,
}

impl CreateArgs {
    /// Validated create request, falling back to the profile's defaults.
    ///
    /// # Errors
    ///
    /// Fails with `Configuration` naming every field still missing.
    pub fn spec(&self, defaults: &CreateDefaults) -> Result<CreateSpec> {
        let pick = |flag: &Option<String>, default: &Option<String>| {
            flag.clone().or_else(|| default.clone())
        };
        let name = pick(&self.name, &defaults.name);
        let plan_id = pick(&self.plan_id, &defaults.plan_id);
        let distribution = pick(&self.distribution, &defaults.distribution);
        Ok(CreateSpec::new(
            name.as_deref(),
            plan_id.as_deref(),
            distribution.as_deref(),
        )?)
    }
}

/// Run `jiffyi create`.
///
/// # Errors
///
/// Returns an error if a field is missing, the API rejects the request or
/// the box does not come up.
pub async fn run(app: &AppContext, api: &impl BoxApi, args: &CreateArgs) -> Result<()> {
    let spec = args.spec(&app.settings.create_defaults)?;
    let reporter = app.reporter();
    let controller = LifecycleController::new(
        api,
        &app.settings.protected,
        app.settings.poll,
        &reporter,
    );
    let created = if args.no_wait {
        controller.create(&spec).await?
    } else {
        controller.create_and_await_running(&spec).await?
    };
    app.renderer().render_box(&created)
}
