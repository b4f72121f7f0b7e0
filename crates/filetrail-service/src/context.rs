//! Request context carrying the pre-resolved acting user.

use serde::{Deserialize, Serialize};

use filetrail_core::types::UserId;

/// Context for the current request.
///
/// Identity is resolved by the caller before the engine is invoked; every
/// operation records *who* acted from this context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// IP address of the request origin, when known.
    pub ip_address: Option<String>,
    /// User-Agent header value, when known.
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Creates a context for `user_id` with no client metadata.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Attach client metadata recorded with downloads.
    pub fn with_client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}
