use crate::date::{get_month_length, shift_months};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOUR: u32 = 9;
pub const DEFAULT_MINUTE: u32 = 0;
/// `1` is Monday in the `0 = Sunday` weekday numbering used here.
pub const DEFAULT_DAY_OF_WEEK: u32 = 1;
pub const DEFAULT_DAY_OF_MONTH: u32 = 1;

/// The granularity at which a reminder repeats. The unit specific anchor
/// lives inside its variant so that descriptors with meaningless field
/// combinations cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "lowercase")]
pub enum Cadence {
    Hour,
    Day,
    /// `day_of_week` is `0..=6` where `0` is Sunday
    Week { day_of_week: u32 },
    /// `day_of_month` is `1..=31` and is clamped to the length of the
    /// target month
    Month { day_of_month: u32 },
}

/// Declarative spec of a repeating reminder schedule: a cadence, a wall
/// clock target time of day and how many cadence units lie between
/// occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(flatten)]
    pub cadence: Cadence,
    pub hour: u32,
    pub minute: u32,
    pub every: u32,
}

impl Recurrence {
    pub fn hourly(hour: u32, minute: u32, every: u32) -> Self {
        Self {
            cadence: Cadence::Hour,
            hour,
            minute,
            every,
        }
    }

    pub fn daily(hour: u32, minute: u32) -> Self {
        Self {
            cadence: Cadence::Day,
            hour,
            minute,
            every: 1,
        }
    }

    pub fn weekly(day_of_week: u32, hour: u32, minute: u32) -> Self {
        Self {
            cadence: Cadence::Week { day_of_week },
            hour,
            minute,
            every: 1,
        }
    }

    pub fn monthly(day_of_month: u32, hour: u32, minute: u32) -> Self {
        Self {
            cadence: Cadence::Month { day_of_month },
            hour,
            minute,
            every: 1,
        }
    }

    /// The wall clock instant of the next occurrence strictly after `now`.
    ///
    /// Total function: out of range fields fall back to safe defaults and
    /// the result is clamped into `(now, now + 365 days]`, so a malformed
    /// descriptor can never produce an alert that fires in the past or
    /// never fires at all.
    pub fn next_occurrence(&self, now: NaiveDateTime) -> NaiveDateTime {
        let every = self.every.max(1) as i64;
        let hour = if self.hour <= 23 {
            self.hour
        } else {
            DEFAULT_HOUR
        };
        let minute = if self.minute <= 59 {
            self.minute
        } else {
            DEFAULT_MINUTE
        };
        let today = now.date();
        // Cannot fail for the clamped hour and minute
        let same_day_target = today.and_hms_opt(hour, minute, 0).unwrap_or(now);

        let candidate = match self.cadence {
            Cadence::Hour => {
                // Anchored at `hour:minute`, stepping whole multiples of
                // `every` hours until the future is reached
                let mut target = same_day_target;
                while target <= now {
                    target = target + Duration::hours(every);
                }
                target
            }
            Cadence::Day => {
                if same_day_target <= now {
                    same_day_target + Duration::days(every)
                } else {
                    same_day_target
                }
            }
            Cadence::Week { day_of_week } => {
                let target_dow = if day_of_week <= 6 {
                    day_of_week
                } else {
                    DEFAULT_DAY_OF_WEEK
                };
                let current_dow = today.weekday().num_days_from_sunday();
                let offset = (target_dow as i64 - current_dow as i64).rem_euclid(7);
                if offset == 0 && same_day_target <= now {
                    // Same weekday but the time already passed, never fire
                    // today
                    same_day_target + Duration::days(7 * every)
                } else {
                    same_day_target + Duration::days(offset)
                }
            }
            Cadence::Month { day_of_month } => {
                let day = if (1..=31).contains(&day_of_month) {
                    day_of_month
                } else {
                    DEFAULT_DAY_OF_MONTH
                };
                let this_month = month_target(today.year(), today.month(), day, hour, minute);
                if this_month <= now {
                    let (year, month) = shift_months(today.year(), today.month(), every as u32);
                    month_target(year, month, day, hour, minute)
                } else {
                    this_month
                }
            }
        };

        clamp_to_window(candidate, now)
    }
}

fn month_target(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    let day = day.min(get_month_length(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        // Unreachable with clamped inputs; the caller's window clamp turns
        // this into a near-future instant anyway
        .unwrap_or_else(|| NaiveDateTime::from_timestamp(0, 0))
}

fn clamp_to_window(candidate: NaiveDateTime, now: NaiveDateTime) -> NaiveDateTime {
    if candidate <= now {
        now + Duration::minutes(2)
    } else if candidate > now + Duration::days(365) {
        now + Duration::minutes(1)
    } else {
        candidate
    }
}
