//! Read-only queries against the account: listings, lookups and selection.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{BoxApi, SelectionStore};
use crate::domain::{BoxId, JiffyBox, JiffyError};

/// Catalog listings passed through without decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Plans,
    Distributions,
}

/// All boxes of the account, sorted by id.
///
/// # Errors
///
/// Fails on API errors and when the listing is not a collection of boxes.
pub async fn list_boxes(api: &impl BoxApi) -> Result<Vec<JiffyBox>> {
    let reply = api.list_boxes().await.context("listing JiffyBoxes")?;
    Ok(reply.into_box_list()?)
}

/// Raw `result` of a plan or distribution listing.
///
/// # Errors
///
/// Fails on API errors.
pub async fn list_catalog(api: &impl BoxApi, catalog: Catalog) -> Result<serde_json::Value> {
    let reply = match catalog {
        Catalog::Plans => api.list_plans().await.context("listing plans")?,
        Catalog::Distributions => api
            .list_distributions()
            .await
            .context("listing distributions")?,
    };
    Ok(reply.result)
}

/// Current snapshot of box `id`.
///
/// # Errors
///
/// Fails with `UnexpectedResponse` when the box does not exist.
pub async fn show(api: &impl BoxApi, id: BoxId) -> Result<JiffyBox> {
    let reply = api
        .get_box(id)
        .await
        .with_context(|| format!("reading JiffyBox {id}"))?;
    reply
        .into_box_if_present()?
        .ok_or_else(|| JiffyError::UnexpectedResponse(format!("JiffyBox {id} not found")).into())
}

/// Box with the lowest id.
///
/// # Errors
///
/// Fails with `UnexpectedResponse` when the account has no boxes.
pub async fn find_first(api: &impl BoxApi) -> Result<JiffyBox> {
    list_boxes(api)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| JiffyError::UnexpectedResponse("the account has no JiffyBoxes".to_string()).into())
}

/// Box named exactly `name`; the highest id wins when names repeat.
///
/// # Errors
///
/// Fails with `UnexpectedResponse` when no box has that name.
pub async fn find_by_name(api: &impl BoxApi, name: &str) -> Result<JiffyBox> {
    list_boxes(api)
        .await?
        .into_iter()
        .rev()
        .find(|b| b.name == name)
        .ok_or_else(|| JiffyError::UnexpectedResponse(format!("no JiffyBox named '{name}'")).into())
}

/// Write the public address of box `id` for other tooling to pick up.
///
/// # Errors
///
/// Fails with `Configuration` when the box has no public address and when
/// the selection cannot be written.
pub async fn select(
    api: &impl BoxApi,
    store: &impl SelectionStore,
    id: BoxId,
) -> Result<(JiffyBox, PathBuf)> {
    let chosen = show(api, id).await?;
    let address = chosen.public_address().ok_or_else(|| {
        JiffyError::Configuration(format!("JiffyBox {id} has no public address"))
    })?;
    let path = store.save(address).context("saving selection")?;
    tracing::info!(%id, address, path = %path.display(), "box selected");
    Ok((chosen, path))
}
