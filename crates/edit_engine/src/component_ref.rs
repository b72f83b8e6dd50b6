//! Lazily resolved references from commands to components

use crate::{EditError, Result};
use doc_model::{ComponentId, Document};

/// A command's handle on a component.
///
/// Commands rebuilt from envelopes start out `Unresolved` and become
/// `Resolved` the first time they touch a document that holds the id.
/// Resolution happens at most once; later calls only check that the target is
/// still present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentRef {
    Unresolved(ComponentId),
    Resolved(ComponentId),
}

impl ComponentRef {
    pub fn id(&self) -> &ComponentId {
        match self {
            ComponentRef::Unresolved(id) | ComponentRef::Resolved(id) => id,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ComponentRef::Resolved(_))
    }

    /// Bind to the component in `document`.
    ///
    /// Returns true on the call that performed the resolution. Fails with
    /// [`EditError::DanglingReference`] if `document` has no such component,
    /// leaving the reference unchanged.
    pub fn resolve(&mut self, document: &Document) -> Result<bool> {
        if !document.contains(self.id()) {
            return Err(EditError::DanglingReference(self.id().clone()));
        }
        match self {
            ComponentRef::Resolved(_) => Ok(false),
            ComponentRef::Unresolved(id) => {
                *self = ComponentRef::Resolved(id.clone());
                Ok(true)
            }
        }
    }
}
