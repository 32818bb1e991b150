//! Core identifier and value types.
//!
//! This module provides:
//! - [`EntryId`] — Unique identifier of a single entry
//! - [`ThreadId`] — Identifier shared by every entry of one causal chain
//! - [`Environment`] — Deployment environment an entry was produced in

use crate::error::{Result, TraceError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

/// Identifier of a causal thread of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub Uuid);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A root entry opens a thread named after itself.
impl From<EntryId> for ThreadId {
    fn from(id: EntryId) -> Self {
        Self(id.0)
    }
}

/// Deployment environment of the producing application.
///
/// Serialized lowercase; parsing, including from JSON, ignores case and
/// surrounding whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Environment {
    /// Local development
    #[default]
    Dev,
    /// Production
    Prod,
    /// Test runs
    Test,
}

impl Environment {
    /// Returns the string representation of this environment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            "test" => Ok(Self::Test),
            _ => Err(TraceError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = TraceError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Nanoseconds since the Unix epoch, saturating outside the `i64` range.
pub(crate) fn unix_nanos(time: DateTime<Utc>) -> i64 {
    time.timestamp_nanos_opt().unwrap_or_else(|| {
        if time.timestamp() < 0 {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

pub(crate) fn from_unix_nanos(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    // ===========================================
    // Identifier Tests
    // ===========================================

    #[test]
    fn root_thread_matches_entry_id() {
        let id = EntryId(Uuid::new_v4());
        let thread = ThreadId::from(id);
        assert_eq!(thread.0, id.0);
        assert_eq!(thread.to_string(), id.to_string());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&EntryId(uuid)).expect("serialize");
        assert_eq!(json, format!("\"{uuid}\""));

        let parsed: ThreadId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, ThreadId(uuid));
    }

    // ===========================================
    // Environment Tests
    // ===========================================

    #[test]
    fn environment_defaults_to_dev() {
        assert_eq!(Environment::default(), Environment::Dev);
    }

    #[test_case("dev", Environment::Dev ; "dev")]
    #[test_case("prod", Environment::Prod ; "prod")]
    #[test_case("test", Environment::Test ; "test")]
    #[test_case("PROD", Environment::Prod ; "uppercase")]
    #[test_case(" test ", Environment::Test ; "padded")]
    fn environment_parses(input: &str, expected: Environment) {
        assert_eq!(input.parse::<Environment>().ok(), Some(expected));
    }

    #[test]
    fn environment_rejects_unknown() {
        let result = "staging".parse::<Environment>();
        assert!(matches!(result, Err(TraceError::InvalidEnvironment(ref s)) if s == "staging"));
    }

    #[test_case("\"dev\"", Environment::Dev ; "lowercase")]
    #[test_case("\"PROD\"", Environment::Prod ; "uppercase")]
    #[test_case("\" Test \"", Environment::Test ; "padded mixed case")]
    fn environment_deserializes_like_from_str(json: &str, expected: Environment) {
        let parsed: Environment = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn environment_deserialize_rejects_unknown() {
        let err = serde_json::from_str::<Environment>("\"staging\"").err();
        assert!(err.is_some_and(|e| e.to_string().contains("unknown environment: staging")));
    }

    #[test]
    fn environment_serialization() {
        let json = serde_json::to_string(&Environment::Prod).expect("serialize");
        assert_eq!(json, "\"prod\"");
        assert_eq!(Environment::Test.to_string(), "test");
    }

    // ===========================================
    // Time Conversion Tests
    // ===========================================

    #[test]
    fn nanos_round_trip() {
        let now = Utc::now();
        assert_eq!(from_unix_nanos(unix_nanos(now)), now);
    }

    #[test]
    fn nanos_saturate_out_of_range() {
        let far_future = DateTime::<Utc>::MAX_UTC;
        let far_past = DateTime::<Utc>::MIN_UTC;
        assert_eq!(unix_nanos(far_future), i64::MAX);
        assert_eq!(unix_nanos(far_past), i64::MIN);
    }
}
