//! Core domain errors.

use thiserror::Error;

use crate::{RejectedUpdate, TaskId};

/// Core domain errors for Taskboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Status column outside the fixed enumeration.
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// Position that is not a finite integer.
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// Some updates in a batch were persisted and some were not.
    ///
    /// `rejected` holds the items of the same batch that never reached the
    /// store because they failed validation.
    #[error("Partial update failure: {} of {} updates failed", failed.len(), failed.len() + applied.len())]
    PartialUpdateFailure {
        failed: Vec<TaskId>,
        applied: Vec<TaskId>,
        rejected: Vec<RejectedUpdate>,
    },

    /// Acting identity is not a member of the workspace.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Acting identity lacks the role required for the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Shorthand for a missing task.
    pub fn task_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            kind: "Task",
            id: id.to_string(),
        }
    }

    /// Shorthand for any other missing record.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidColumn(_) => "invalid_column",
            Self::InvalidPosition(_) => "invalid_position",
            Self::PartialUpdateFailure { .. } => "partial_update_failure",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_message_counts() {
        let err = CoreError::PartialUpdateFailure {
            failed: vec![TaskId::new("b")],
            applied: vec![TaskId::new("a"), TaskId::new("c")],
            rejected: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "Partial update failure: 1 of 3 updates failed"
        );
        assert_eq!(err.code(), "partial_update_failure");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            CoreError::task_not_found("t-1").to_string(),
            "Task not found: t-1"
        );
    }
}
