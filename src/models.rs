use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Online,
    Offline,
}

impl Status {
    pub fn from_reachable(is_online: bool) -> Self {
        if is_online {
            Status::Online
        } else {
            Status::Offline
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Online => write!(f, "online"),
            Status::Offline => write!(f, "offline"),
        }
    }
}

/// Last known status of one target, as stored in the state file.
///
/// `changed_at` stays a raw RFC 3339 string: cycles that re-confirm an
/// unchanged status must carry the stored timestamp through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub status: Status,
    pub changed_at: String,
}

/// Outcome of comparing a fresh observation against the stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateComparison {
    pub changed: bool,
    pub is_first_observation: bool,
    pub current_status: Status,
    pub previous_status: Option<Status>,
    pub duration_seconds: u64,
    pub next_record: PersistedRecord,
}

/// Per-target persisted records, keyed by target id. The BTreeMap keeps the
/// serialized state file in stable key order.
pub type RuntimeState = BTreeMap<String, PersistedRecord>;
