use std::collections::BTreeSet;

use crate::domain::error::JiffyError;
use crate::domain::jiffybox::BoxId;

/// Box ids that must never be started, stopped, frozen, thawed or deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedIds(BTreeSet<BoxId>);

impl ProtectedIds {
    #[must_use]
    pub fn contains(&self, id: BoxId) -> bool {
        self.0.contains(&id)
    }

    /// Fails when `id` is protected.
    ///
    /// # Errors
    ///
    /// Returns `JiffyError::ProtectedResource` for protected ids.
    pub fn guard(&self, id: BoxId) -> Result<(), JiffyError> {
        if self.contains(id) {
            return Err(JiffyError::ProtectedResource(id));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<BoxId> for ProtectedIds {
    fn from_iter<I: IntoIterator<Item = BoxId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
