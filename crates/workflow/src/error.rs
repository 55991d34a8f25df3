//! Workflow error types.

use domain::DomainError;
use store::StoreError;
use thiserror::Error;

/// Errors surfaced by the orchestration layer.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Persistence failure or a rule rejection raised inside the store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A domain rule rejected the request.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The payment gateway rejected or failed an invoice request.
    #[error("payment gateway error: {0}")]
    Gateway(String),
}

impl WorkflowError {
    /// Returns the underlying domain rejection, if any, unwrapping rule
    /// violations that surfaced through the store.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            WorkflowError::Domain(err) => Some(err),
            WorkflowError::Store(StoreError::Domain(err)) => Some(err),
            _ => None,
        }
    }

    /// Returns true if the error is an entity-not-found rejection.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WorkflowError::Store(
                StoreError::ProductNotFound(_)
                    | StoreError::OrderNotFound(_)
                    | StoreError::PaymentNotFound(_)
            )
        )
    }
}
