//! `jiffyi delete <target>`: remove a stopped box.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::BoxApi;
use crate::application::services::lifecycle::LifecycleController;
use crate::commands::{TargetArgs, resolve_target};

/// Run `jiffyi delete`.
///
/// The protected-id check runs before the confirmation prompt.
///
/// # Errors
///
/// Returns an error if the box is protected or the API rejects the deletion.
pub async fn run(app: &AppContext, api: &impl BoxApi, target: &TargetArgs) -> Result<()> {
    let id = resolve_target(api, target).await?;
    app.settings.protected.guard(id)?;

    if !app.confirm(&format!("Delete JiffyBox {id}?"), true)? {
        app.output.info("Cancelled.");
        return Ok(());
    }

    let reporter = app.reporter();
    LifecycleController::new(api, &app.settings.protected, app.settings.poll, &reporter)
        .delete_box(id)
        .await?;
    app.renderer()
        .render_done(id, "delete", &format!("JiffyBox {id} deleted"))
}
