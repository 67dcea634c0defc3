//! Error types for malformed attribute and dispatch inputs.

use thiserror::Error;

/// Error raised when a name falls outside one of the closed sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbacError {
    #[error("Unknown clearance level: '{0}'")]
    UnknownClearance(String),

    #[error("Unknown module: '{0}'")]
    UnknownModule(String),

    #[error("Unknown action: '{0}'")]
    UnknownAction(String),

    #[error(transparent)]
    Rbac(#[from] cmlre_rbac::RbacError),
}
