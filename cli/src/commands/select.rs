//! `jiffyi select <target>`

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::{BoxApi, SelectionStore};
use crate::application::services::inventory;
use crate::commands::{TargetArgs, resolve_target};

/// Run `jiffyi select`.
///
/// # Errors
///
/// Returns an error if the box has no public address or the selection file
/// cannot be written.
pub async fn run(
    app: &AppContext,
    api: &impl BoxApi,
    store: &impl SelectionStore,
    target: &TargetArgs,
) -> Result<()> {
    let id = resolve_target(api, target).await?;
    let (chosen, path) = inventory::select(api, store, id).await?;
    app.renderer().render_selection(&chosen, &path)
}
