//! Configuration options for the ServiHogar client

use std::time::Duration;

/// Configuration options for the ServiHogar client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whether to persist the session to the configured store
    pub persist_session: bool,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Path of the login endpoint on the API
    pub auth_path: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            persist_session: true,
            request_timeout: Some(Duration::from_secs(30)),
            auth_path: "/auth/login".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the login endpoint path
    pub fn with_auth_path(mut self, value: &str) -> Self {
        self.auth_path = value.to_string();
        self
    }
}
