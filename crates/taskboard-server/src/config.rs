//! Server configuration.

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address.
    pub http_bind_addr: String,

    /// Maximum number of tasks returned by a listing.
    pub list_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_bind_addr: "[::1]:8080".to_string(),
            list_limit: 100,
        }
    }
}
