use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{error, info, warn};

use crate::api::{Notifier, TelegramNotifier};
use crate::config::{load_runtime_config, RuntimeConfig};
use crate::message::format_status_message;
use crate::models::{PersistedRecord, RuntimeState, StateComparison, Status};
use crate::probe::{Prober, TcpProber};
use crate::state::{load_state, save_state};

/// Compare a fresh reachability observation against the stored record and
/// prepare the record the next cycle should see.
///
/// A missing previous record is a first observation, never a status flip:
/// the new observation is captured without producing a notification-worthy
/// change. Total over its inputs, never fails.
pub fn compare_states(
    previous: Option<&PersistedRecord>,
    is_online: bool,
    now: DateTime<Utc>,
) -> StateComparison {
    let current_status = Status::from_reachable(is_online);

    let Some(previous) = previous else {
        return StateComparison {
            changed: false,
            is_first_observation: true,
            current_status,
            previous_status: None,
            duration_seconds: 0,
            next_record: PersistedRecord {
                status: current_status,
                changed_at: now.to_rfc3339(),
            },
        };
    };

    if current_status == previous.status {
        return StateComparison {
            changed: false,
            is_first_observation: false,
            current_status,
            previous_status: Some(previous.status),
            duration_seconds: 0,
            next_record: previous.clone(),
        };
    }

    let previous_changed_at = parse_changed_at(&previous.changed_at, now);
    let duration_seconds = (now - previous_changed_at).num_seconds().max(0) as u64;

    StateComparison {
        changed: true,
        is_first_observation: false,
        current_status,
        previous_status: Some(previous.status),
        duration_seconds,
        next_record: PersistedRecord {
            status: current_status,
            changed_at: now.to_rfc3339(),
        },
    }
}

/// Stored timestamps are RFC 3339; a value without an offset is assumed to
/// already be UTC. Anything unparsable falls back to `now`, which collapses
/// the computed duration to zero for that one comparison.
fn parse_changed_at(raw: &str, fallback: DateTime<Utc>) -> DateTime<Utc> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }
    fallback
}

/// Run one monitoring pass over every configured target, in config order.
///
/// Returns whether any target's persisted record was replaced. A failed
/// delivery leaves the old record in place so the change is still detected
/// and the notification retried on the next cycle.
pub async fn run_cycle(
    config: &RuntimeConfig,
    state: &mut RuntimeState,
    prober: &dyn Prober,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> bool {
    let mut changed_any = false;

    for target in &config.targets {
        let is_online = prober
            .probe(&target.host, target.port, config.check_timeout())
            .await;
        let comparison = compare_states(state.get(&target.id), is_online, now);

        if comparison.is_first_observation {
            info!("[{}] first observation: {}", target.id, comparison.current_status);
            state.insert(target.id.clone(), comparison.next_record);
            changed_any = true;
            continue;
        }

        if !comparison.changed {
            info!("[{}] no change: {}", target.id, comparison.current_status);
            continue;
        }

        if let Some(previous_status) = comparison.previous_status {
            let note = format!(
                "[{}] {}: {} -> {}",
                target.id, target.name, previous_status, comparison.current_status
            );
            if is_online {
                warn!("{}", note);
            } else {
                error!("{}", note);
            }
        }

        let text = format_status_message(
            &target.name,
            is_online,
            comparison.duration_seconds,
            now,
            config.timezone(),
        );
        if !notifier.notify(&target.chat_id, &text).await {
            warn!("[{}] delivery failed, keeping previous status for retry", target.id);
            continue;
        }

        state.insert(target.id.clone(), comparison.next_record);
        changed_any = true;
        info!("[{}] status change notified", target.id);
    }

    changed_any
}

/// One full pass with file-backed state: load, run, persist only when
/// something changed.
pub async fn run_once(config: &RuntimeConfig) -> Result<()> {
    let notifier = TelegramNotifier::new(config.telegram_bot_token.clone())?;
    let mut state = load_state(&config.state_path);

    let changed_any = run_cycle(config, &mut state, &TcpProber, &notifier, Utc::now()).await;
    if changed_any {
        save_state(&config.state_path, &state)?;
    }
    Ok(())
}

/// Reload the configuration and run one cycle every `check_interval_seconds`,
/// so target edits apply without a restart.
pub async fn run_forever(config_path: &Path) -> Result<()> {
    loop {
        let config = load_runtime_config(config_path)?;
        run_once(&config).await?;
        tokio::time::sleep(Duration::from_secs(config.check_interval_seconds)).await;
    }
}
