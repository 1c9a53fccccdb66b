//! Error types for the reconciler.

use thiserror::Error;

/// Structural failures raised by the builder and by `Vdom::patch`.
///
/// Diffing is not transactional: when a patch call fails, mutations already
/// issued for earlier siblings stay applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VdomError {
    #[error("invalid vnode shape: {reason}")]
    InvalidVNodeShape { reason: String },

    /// `patch` was called with an old root that is neither a live node known
    /// to the host nor a descriptor that was bound to a live node.
    #[error("patch target has no live node")]
    MissingSameNodeTarget,

    /// A `remove` hook dropped its completion callback without calling it.
    /// Never returned from `patch`; used for diagnostics only. The live node
    /// stays attached and `destroy` never fires for it.
    #[error("remove callback dropped without being invoked")]
    RemovalCallbackNotInvoked,
}

impl VdomError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        VdomError::InvalidVNodeShape {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VdomError>;
