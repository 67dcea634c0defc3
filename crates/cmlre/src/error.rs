//! Error types for the facade crate.

use thiserror::Error;

use crate::access::AccessError;

#[derive(Debug, Error)]
pub enum CmlreError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Session(#[from] cmlre_session::SessionError),

    #[error(transparent)]
    Store(#[from] cmlre_session::StoreError),

    #[error(transparent)]
    Audit(#[from] cmlre_audit::AuditError),
}

pub type Result<T> = std::result::Result<T, CmlreError>;
