use thiserror::Error;

/// Failures reported by a [`SceneHost`](crate::host::SceneHost) operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("node {0} does not exist")]
    NodeNotFound(String),

    #[error("node {0} has already been removed")]
    NodeRemoved(String),

    #[error("merge needs at least 2 nodes, got {0}")]
    MergeTooFew(usize),

    #[error("{operation} rejected: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },
}

impl HostError {
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        HostError::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}
