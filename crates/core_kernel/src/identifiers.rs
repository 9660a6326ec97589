//! Typed identifiers
//!
//! Claims and audit events are keyed by time-ordered UUIDv7 values wrapped in
//! newtypes, so a claim id can never be passed where an audit id is expected.
//! The display form carries a short prefix (`CLM-…`, `AUD-…`); parsing
//! accepts it with or without the prefix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! time_ordered_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new identifier stamped with the current time
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Creation time embedded in a v7 identifier
            pub fn timestamp(&self) -> Option<DateTime<Utc>> {
                let (secs, nanos) = self.0.get_timestamp()?.to_unix();
                DateTime::from_timestamp(i64::try_from(secs).ok()?, nanos)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new_v7()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Uuid::parse_str(raw).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

time_ordered_id!(
    /// Surrogate key of a stored claim
    ClaimId => "CLM"
);
time_ordered_id!(
    /// Correlates the audit log line of one API request
    AuditEventId => "AUD"
);
