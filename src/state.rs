use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::models::{PersistedRecord, RuntimeState, Status};

/// Load the persisted state file. A missing, unreadable or malformed file
/// degrades to an empty map, and a malformed entry is dropped without
/// invalidating the rest.
pub fn load_state(path: &Path) -> RuntimeState {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return RuntimeState::new(),
    };

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(_) => return RuntimeState::new(),
    };

    let Value::Object(entries) = parsed else {
        return RuntimeState::new();
    };

    let mut state = RuntimeState::new();
    for (target_id, value) in entries {
        if let Some(record) = coerce_record(&value) {
            state.insert(target_id, record);
        }
    }
    state
}

fn coerce_record(value: &Value) -> Option<PersistedRecord> {
    let status = match value.get("status").and_then(Value::as_str) {
        Some("online") => Status::Online,
        Some("offline") => Status::Offline,
        _ => return None,
    };
    let changed_at = value.get("changed_at")?.as_str()?.to_string();
    Some(PersistedRecord { status, changed_at })
}

/// Persist the state atomically: write a sibling temp file, then rename it
/// over the target so a crash mid-write never leaves a truncated file.
pub fn save_state(path: &Path, state: &RuntimeState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory {}", parent.display())
            })?;
        }
    }

    let payload =
        serde_json::to_string_pretty(state).context("Failed to serialize state")?;

    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    fs::write(&temp_path, payload)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
