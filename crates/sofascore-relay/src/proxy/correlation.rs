//! Request id generation for matching responses to log lines.

use uuid::Uuid;

/// Response header carrying the id recorded on the request span.
pub const REQUEST_ID_HEADER: &str = "x-relay-request-id";

/// Generate a new request id (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
