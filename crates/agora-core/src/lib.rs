//! Core types and error definitions shared by the Agora crates.
//!
//! # Main types
//!
//! - [`AgoraError`] — Unified error enum for storage, records and configuration.
//! - [`AgoraResult`] — Convenience alias for `Result<T, AgoraError>`.
//! - [`Role`] — Author of a conversation turn (user or system).
//! - [`Message`] — A single turn in the coordinator's conversation log.

/// Error type and result alias.
pub mod error;
/// Conversation turn types.
pub mod message;

pub use error::{AgoraError, AgoraResult};
pub use message::{Message, Role};

use chrono::{SecondsFormat, Utc};

/// Current UTC time as an ISO-8601 string with microsecond precision and a
/// trailing `Z`, e.g. `2025-03-01T09:30:12.123456Z`.
pub fn now_ts() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ts_is_utc_iso8601() {
        let ts = now_ts();
        assert!(ts.ends_with('Z'));
        assert!(ts.contains('T'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
