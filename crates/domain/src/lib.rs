mod date;
mod notification;
mod recurrence;
mod reminder;
mod shared;

pub use date::{get_month_length, is_leap_year, shift_months};
pub use notification::{ArmedRequest, ChannelConfig, ScheduleEntry};
pub use recurrence::{
    Cadence, Recurrence, DEFAULT_DAY_OF_MONTH, DEFAULT_DAY_OF_WEEK, DEFAULT_HOUR, DEFAULT_MINUTE,
};
pub use reminder::{NewReminder, Reminder};
pub use shared::entity::{Entity, InvalidIDError, NotificationId};
