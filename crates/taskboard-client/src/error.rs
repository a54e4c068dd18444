//! Error types for the client.

use thiserror::Error;

use taskboard_core::wire::RejectedItem;
use taskboard_core::{CoreError, TaskId};

/// Errors that can occur when using the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to establish connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body.
    #[error("API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Some task updates in a batch were not persisted.
    #[error("partial update failure: {} task(s) not saved", failed.len())]
    PartialUpdate {
        failed: Vec<TaskId>,
        applied: Vec<TaskId>,
        /// Items of the same batch that failed validation.
        rejected: Vec<RejectedItem>,
    },

    /// Bulk items the server refused to apply.
    #[error("server rejected updates for: {}", task_ids.join(", "))]
    Rejected { task_ids: Vec<String> },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Local planning failed before anything was sent.
    #[error(transparent)]
    Planning(#[from] CoreError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
