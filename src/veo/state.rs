use crate::{
    models::{GeneratedVideo, Operation, OperationError, OperationHandle},
    veo::extractor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoResponse,
    NoVideo,
}

/// Lifecycle of a remote generation job. Each transition is a pure function
/// of the latest operation snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationState {
    Submitted(OperationHandle),
    Pending(OperationHandle),
    Succeeded(GeneratedVideo),
    Empty(EmptyReason),
    Filtered(String),
    Failed(OperationError),
}

impl OperationState {
    /// State right after the submit call returned.
    pub fn submitted(operation: Operation) -> Self {
        if operation.is_done() {
            extractor::classify(&operation)
        } else {
            OperationState::Submitted(operation.handle())
        }
    }

    /// State after a status query.
    pub fn observe(operation: Operation) -> Self {
        if operation.is_done() {
            extractor::classify(&operation)
        } else {
            OperationState::Pending(operation.handle())
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            OperationState::Submitted(_) | OperationState::Pending(_)
        )
    }

    pub fn handle(&self) -> Option<&OperationHandle> {
        match self {
            OperationState::Submitted(handle) | OperationState::Pending(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationState::Submitted(_) => "submitted",
            OperationState::Pending(_) => "pending",
            OperationState::Succeeded(_) => "done-success",
            OperationState::Empty(_) => "done-empty",
            OperationState::Filtered(_) => "done-filtered",
            OperationState::Failed(_) => "done-error",
        }
    }
}
