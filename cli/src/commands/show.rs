//! `jiffyi show <target>`

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::BoxApi;
use crate::application::services::inventory;
use crate::commands::{TargetArgs, resolve_target};
use crate::domain::JiffyBox;
use crate::output::progress;

/// Run `jiffyi show`.
///
/// # Errors
///
/// Returns an error if the box cannot be found or read.
pub async fn run(app: &AppContext, api: &impl BoxApi, target: &TargetArgs) -> Result<()> {
    let spinner = progress::spinner(&app.output, "fetching from the JiffyBox API...");
    let found = lookup(api, target).await;
    spinner.finish_and_clear();
    app.renderer().render_box(&found?)
}

async fn lookup(api: &impl BoxApi, target: &TargetArgs) -> Result<JiffyBox> {
    let id = resolve_target(api, target).await?;
    inventory::show(api, id).await
}
