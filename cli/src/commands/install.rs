//! `jiffyi install -n NAME -p PLANID -d DISTRIBUTION [--teardown] [PRESET...]`

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{BoxApi, ScriptCatalog, ShellRunner};
use crate::application::services::lifecycle::LifecycleController;
use crate::application::services::provision::ProvisioningPipeline;
use crate::commands::create::CreateArgs;
use crate::domain::Transition;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Name of the new box
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Plan id
    #[arg(short = 'p', long = "plan")]
    pub plan_id: Option<String>,

    /// Distribution key
    #[arg(short = 'd', long)]
    pub distribution: Option<String>,

    /// Stop and delete the box once every preset succeeded
    #[arg(long)]
    pub teardown: bool,

    /// Presets to run after `all`, each a script `install_<preset>`
    pub presets: Vec<String>,
}

/// Run `jiffyi install`: create a box, wait for it, then provision it.
///
/// # Errors
///
/// Returns an error if creation, the remote channel or any preset fails.
pub async fn run(
    app: &AppContext,
    api: &impl BoxApi,
    shell: &impl ShellRunner,
    scripts: &impl ScriptCatalog,
    args: &InstallArgs,
) -> Result<()> {
    let spec = CreateArgs {
        name: args.name.clone(),
        plan_id: args.plan_id.clone(),
        distribution: args.distribution.clone(),
        no_wait: false,
    }
    .spec(&app.settings.create_defaults)?;

    let reporter = app.reporter();
    let controller = LifecycleController::new(
        api,
        &app.settings.protected,
        app.settings.poll,
        &reporter,
    );
    let created = controller.create_and_await_running(&spec).await?;

    let pipeline = ProvisioningPipeline::new(
        shell,
        scripts,
        &reporter,
        app.settings.ssh.clone(),
        app.control_dir()?,
    );
    let session = pipeline.prepare_channel(created.public_address()).await?;
    let outcome = pipeline.run(&session, &args.presets).await;
    pipeline.close(&session).await;
    let report = outcome?;

    if args.teardown {
        controller
            .stop_and_await_deleted(created.id, Transition::Shutdown)
            .await?;
    }
    app.renderer()
        .render_provision_report(&created, &report, args.teardown)
}
