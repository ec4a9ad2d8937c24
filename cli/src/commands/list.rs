//! `jiffyi list [boxes|plans|distributions]`

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::app::AppContext;
use crate::application::ports::BoxApi;
use crate::application::services::inventory::{self, Catalog};
use crate::output::progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Boxes,
    Plans,
    Distributions,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum, default_value_t = ListKind::Boxes)]
    pub kind: ListKind,
}

/// Run `jiffyi list`.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched.
pub async fn run(app: &AppContext, api: &impl BoxApi, args: &ListArgs) -> Result<()> {
    let spinner = progress::spinner(&app.output, "fetching from the JiffyBox API...");
    let (catalog, title) = match args.kind {
        ListKind::Boxes => {
            let boxes = inventory::list_boxes(api).await;
            spinner.finish_and_clear();
            return app.renderer().render_box_list(&boxes?);
        }
        ListKind::Plans => (Catalog::Plans, "Plans"),
        ListKind::Distributions => (Catalog::Distributions, "Distributions"),
    };
    let result = inventory::list_catalog(api, catalog).await;
    spinner.finish_and_clear();
    app.renderer().render_catalog(title, &result?)
}
