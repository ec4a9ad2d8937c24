//! mockall doubles for the synchronous ports.
//!
//! Async ports use the hand-written fakes in `helpers`.

use std::path::PathBuf;

use jiffy_cli::application::ports::{ScriptCatalog, SelectionStore};
use mockall::mock;

mock! {
    pub Scripts {}
    impl ScriptCatalog for Scripts {
        fn find(&self, file_name: &str) -> anyhow::Result<Option<PathBuf>>;
    }
}

mock! {
    pub Selection {}
    impl SelectionStore for Selection {
        fn save(&self, address: &str) -> anyhow::Result<PathBuf>;
    }
}
