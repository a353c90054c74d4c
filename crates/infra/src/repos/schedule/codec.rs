//! On-disk layout of the schedule store. The entry value is a camelCase
//! JSON document and the last-armed value an ISO-8601 timestamp string, so
//! the store stays readable without the notifier or the engine running.

use chrono::NaiveDateTime;
use pillbox_domain::{
    Cadence, NotificationId, Recurrence, ScheduleEntry, DEFAULT_DAY_OF_MONTH, DEFAULT_DAY_OF_WEEK,
    DEFAULT_HOUR, DEFAULT_MINUTE,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub(super) const ENTRY_KEY_PREFIX: &str = "notification_";
pub(super) const LAST_ARMED_KEY_PREFIX: &str = "last_scheduled_";

const LAST_ARMED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub(super) fn entry_key(id: NotificationId) -> String {
    format!("{}{}", ENTRY_KEY_PREFIX, id)
}

pub(super) fn last_armed_key(id: NotificationId) -> String {
    format!("{}{}", LAST_ARMED_KEY_PREFIX, id)
}

pub(super) fn id_from_entry_key(key: &str) -> Option<NotificationId> {
    key.strip_prefix(ENTRY_KEY_PREFIX)?.parse().ok()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationConfigRaw {
    id: i64,
    title: String,
    body: String,
    schedule_config: ScheduleConfigRaw,
    reminder_by: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ScheduleConfigRaw {
    #[serde(skip_serializing_if = "Option::is_none")]
    hour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minute: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    day_of_week: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    every: Option<u32>,
}

pub(super) fn encode_entry(entry: &ScheduleEntry) -> anyhow::Result<String> {
    let recurrence = &entry.recurrence;
    let (reminder_by, day_of_week, day) = match recurrence.cadence {
        Cadence::Hour => ("hour", None, None),
        Cadence::Day => ("day", None, None),
        Cadence::Week { day_of_week } => ("week", Some(day_of_week), None),
        Cadence::Month { day_of_month } => ("month", None, Some(day_of_month)),
    };
    let raw = NotificationConfigRaw {
        id: entry.id.inner(),
        title: entry.title.clone(),
        body: entry.body.clone(),
        schedule_config: ScheduleConfigRaw {
            hour: Some(recurrence.hour),
            minute: Some(recurrence.minute),
            day_of_week,
            day,
            every: Some(recurrence.every),
        },
        reminder_by: reminder_by.to_string(),
    };
    Ok(serde_json::to_string(&raw)?)
}

/// Decodes a stored entry. Missing time fields fall back to safe defaults;
/// an unknown recurrence unit falls back to the daily cadence.
pub(super) fn decode_entry(raw: &str) -> anyhow::Result<ScheduleEntry> {
    let raw: NotificationConfigRaw = serde_json::from_str(raw)?;
    let config = &raw.schedule_config;
    let cadence = match raw.reminder_by.as_str() {
        "hour" => Cadence::Hour,
        "day" => Cadence::Day,
        "week" => Cadence::Week {
            day_of_week: config.day_of_week.unwrap_or(DEFAULT_DAY_OF_WEEK),
        },
        "month" => Cadence::Month {
            day_of_month: config.day.unwrap_or(DEFAULT_DAY_OF_MONTH),
        },
        unknown => {
            warn!(
                "Stored notification {} has unknown recurrence unit {:?}, falling back to daily",
                raw.id, unknown
            );
            Cadence::Day
        }
    };
    let recurrence = Recurrence {
        cadence,
        hour: config.hour.unwrap_or(DEFAULT_HOUR),
        minute: config.minute.unwrap_or(DEFAULT_MINUTE),
        every: config.every.unwrap_or(1),
    };
    Ok(ScheduleEntry::new(
        NotificationId::new(raw.id),
        raw.title,
        raw.body,
        recurrence,
    ))
}

pub(super) fn encode_last_armed(armed_at: NaiveDateTime) -> String {
    armed_at.format(LAST_ARMED_FORMAT).to_string()
}

pub(super) fn decode_last_armed(raw: &str) -> anyhow::Result<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(raw, LAST_ARMED_FORMAT)?)
}
