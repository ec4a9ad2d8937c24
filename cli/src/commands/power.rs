//! `jiffyi start|stop|freeze|thaw <target>`: single guarded transitions.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::BoxApi;
use crate::application::services::lifecycle::LifecycleController;
use crate::commands::{TargetArgs, resolve_target};
use crate::domain::Transition;

/// Send `action` to the target box and show the box as the API reports it.
///
/// # Errors
///
/// Returns an error if the box is protected or the API rejects the transition.
pub async fn run(
    app: &AppContext,
    api: &impl BoxApi,
    target: &TargetArgs,
    action: Transition,
) -> Result<()> {
    let id = resolve_target(api, target).await?;
    let reporter = app.reporter();
    let controller = LifecycleController::new(
        api,
        &app.settings.protected,
        app.settings.poll,
        &reporter,
    );
    let updated = controller.transition(id, action).await?;
    app.renderer().render_box(&updated)
}
