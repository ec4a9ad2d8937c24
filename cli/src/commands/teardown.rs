//! `jiffyi teardown <target> [now]`: stop a box, then delete it.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::BoxApi;
use crate::application::services::lifecycle::LifecycleController;
use crate::commands::{StopArgs, resolve_target};
use crate::domain::Transition;

/// Run `jiffyi teardown`.
///
/// The protected-id check runs before the confirmation prompt.
///
/// # Errors
///
/// Returns an error if the box is protected, reports an unexpected status or
/// does not reach deletion before the polling deadline.
pub async fn run(app: &AppContext, api: &impl BoxApi, args: &StopArgs) -> Result<()> {
    let id = resolve_target(api, &args.target).await?;
    app.settings.protected.guard(id)?;

    if !app.confirm(&format!("Stop and delete JiffyBox {id}?"), true)? {
        app.output.info("Cancelled.");
        return Ok(());
    }

    let reporter = app.reporter();
    LifecycleController::new(api, &app.settings.protected, app.settings.poll, &reporter)
        .stop_and_await_deleted(id, Transition::stop(args.is_now()))
        .await?;
    app.renderer()
        .render_done(id, "teardown", &format!("JiffyBox {id} torn down"))
}
