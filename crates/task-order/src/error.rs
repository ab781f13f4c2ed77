//! Error types shared by the ordering workflows.

use thiserror::Error;

/// Failures reported by a remote item source.
///
/// Fetch failures leave the persisted order untouched; mutation failures
/// are rolled back by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("could not load tasks: {0}")]
    Fetch(String),
    #[error("could not update task: {0}")]
    Mutation(String),
}

/// Failures writing a persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderStoreError {
    #[error("order storage unavailable")]
    Unavailable,
    #[error("order could not be encoded: {0}")]
    Encode(String),
    #[error("order could not be written: {0}")]
    Write(String),
}
