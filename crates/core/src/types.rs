//! Shared identifier and timestamp types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// All server-side primary keys are 64-bit integers.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Kind discriminator for inventory records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "CONTAINER")]
    Container,
    #[serde(rename = "SUBSAMPLE")]
    SubSample,
    #[serde(rename = "SAMPLE")]
    Sample,
    #[serde(rename = "SAMPLE_TEMPLATE")]
    Template,
    #[serde(rename = "BENCH")]
    Bench,
}

impl RecordKind {
    /// Global-id prefix for this kind, as used on the wire.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Container => "IC",
            Self::SubSample => "SS",
            Self::Sample => "SA",
            Self::Template => "IT",
            Self::Bench => "BE",
        }
    }

    /// All kinds, in prefix-matching order.
    pub const ALL: [RecordKind; 5] = [
        Self::Container,
        Self::SubSample,
        Self::Sample,
        Self::Template,
        Self::Bench,
    ];

    /// Whether records of this kind can themselves hold other records.
    pub fn is_container_like(self) -> bool {
        matches!(self, Self::Container | Self::Bench)
    }
}

/// Globally unique record identifier: a kind prefix followed by a numeric id,
/// e.g. `IC123` (container), `SS42` (subsample), `BE9` (workbench).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalId {
    pub kind: RecordKind,
    pub id: DbId,
}

impl GlobalId {
    pub fn new(kind: RecordKind, id: DbId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.id)
    }
}

impl FromStr for GlobalId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for kind in RecordKind::ALL {
            if let Some(rest) = s.strip_prefix(kind.prefix()) {
                let id = rest.parse::<DbId>().map_err(|_| {
                    CoreError::Validation(format!("Invalid global id: '{s}'"))
                })?;
                return Ok(Self { kind, id });
            }
        }
        Err(CoreError::Validation(format!(
            "Unknown global id prefix: '{s}'"
        )))
    }
}

impl Serialize for GlobalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GlobalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
