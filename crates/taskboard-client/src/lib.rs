//! Client library for the Taskboard API.
//!
//! [`HttpClient`] wraps the REST endpoints; [`BoardSession`] drives the
//! optimistic plan / render / persist / rollback loop a board UI needs.

pub mod error;
pub mod http;
pub mod session;

pub use error::ClientError;
pub use http::HttpClient;
pub use session::BoardSession;
