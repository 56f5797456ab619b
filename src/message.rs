use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Build the operator-facing notification for a status transition. The time
/// label is rendered in the configured timezone, the duration covers how long
/// the target spent in its previous state.
pub fn format_status_message(
    target_name: &str,
    is_online: bool,
    duration_seconds: u64,
    now: DateTime<Utc>,
    tz: Tz,
) -> String {
    let time_label = now.with_timezone(&tz).format("%H:%M");
    let duration_text = format_duration(duration_seconds);

    if is_online {
        format!(
            "✅ {target_name}: об'єкт знову в мережі о {time_label}.\nДо цього був недоступний: {duration_text}."
        )
    } else {
        format!(
            "⚠️ {target_name}: об'єкт недоступний з {time_label}.\nДо цього був доступний: {duration_text}."
        )
    }
}

/// Compact day/hour/minute label. Sub-minute precision is never shown; the
/// minutes segment is always present, hours appear when hours or days are
/// non-zero.
pub fn format_duration(total_seconds: u64) -> String {
    let total_minutes = total_seconds / 60;
    let days = total_minutes / (24 * 60);
    let remainder = total_minutes % (24 * 60);
    let hours = remainder / 60;
    let minutes = remainder % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days} д"));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{hours} год"));
    }
    parts.push(format!("{minutes} хв"));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn duration_discards_leftover_seconds() {
        assert_eq!(format_duration(9993), "2 год 46 хв");
        assert_eq!(format_duration(59), "0 хв");
    }

    #[test]
    fn duration_zero_renders_explicit_minutes() {
        assert_eq!(format_duration(0), "0 хв");
    }

    #[test]
    fn duration_omits_days_and_hours_when_zero() {
        assert_eq!(format_duration(1800), "30 хв");
        assert_eq!(format_duration(3660), "1 год 1 хв");
    }

    #[test]
    fn duration_keeps_zero_hours_between_days_and_minutes() {
        // 1450 minutes: one day plus ten minutes, no full hour in between.
        assert_eq!(format_duration(87_000), "1 д 0 год 10 хв");
        assert_eq!(format_duration(90_000), "1 д 1 год 0 хв");
    }

    #[test]
    fn online_message_embeds_name_time_and_duration() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 12, 30, 0).unwrap();

        let message =
            format_status_message("Квартира", true, 3660, now, chrono_tz::Europe::Kyiv);

        assert!(message.contains("Квартира"));
        assert!(message.contains("знову в мережі"));
        // 12:30 UTC is 14:30 in Kyiv in February.
        assert!(message.contains("14:30"));
        assert!(message.contains("1 год 1 хв"));
    }

    #[test]
    fn offline_message_uses_the_outage_framing() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 12, 30, 0).unwrap();

        let message =
            format_status_message("Дача", false, 1800, now, chrono_tz::Europe::Kyiv);

        assert!(message.contains("Дача"));
        assert!(message.contains("недоступний з"));
        assert!(message.contains("30 хв"));
    }
}
