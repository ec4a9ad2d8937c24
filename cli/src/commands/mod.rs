//! Command implementations

pub mod create;
pub mod delete;
pub mod install;
pub mod list;
pub mod power;
pub mod select;
pub mod show;
pub mod teardown;

use anyhow::Result;
use clap::Args;

use crate::application::ports::BoxApi;
use crate::application::services::inventory;
use crate::domain::BoxId;

/// Which box an action applies to.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Box id
    #[arg(short = 'i', long)]
    pub id: Option<BoxId>,

    /// The box with the lowest id
    #[arg(short = 'f', long)]
    pub first: bool,

    /// The box with exactly this name
    #[arg(short = 'n', long)]
    pub name: Option<String>,
}

/// Arguments for `stop` and `teardown`.
#[derive(Args, Debug, Clone)]
pub struct StopArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Pull the plug instead of shutting down gracefully
    #[arg(value_name = "now", value_parser = ["now"])]
    pub now: Option<String>,
}

impl StopArgs {
    #[must_use]
    pub fn is_now(&self) -> bool {
        self.now.is_some()
    }
}

/// Resolve the target flags to a box id. `-f` and `-n` look at the listing.
///
/// # Errors
///
/// Fails when the listing cannot be read or no box matches.
pub async fn resolve_target(api: &impl BoxApi, target: &TargetArgs) -> Result<BoxId> {
    if let Some(id) = target.id {
        return Ok(id);
    }
    if let Some(name) = &target.name {
        return Ok(inventory::find_by_name(api, name).await?.id);
    }
    Ok(inventory::find_first(api).await?.id)
}
