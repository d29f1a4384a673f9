use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::{RepeatPattern, Schedule, WeekDay};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReminderUnit {
    Minutes,
    Hours,
    Days,
}

impl ReminderUnit {
    pub fn span(self, value: u32) -> Duration {
        let value = i64::from(value);
        match self {
            ReminderUnit::Minutes => Duration::minutes(value),
            ReminderUnit::Hours => Duration::hours(value),
            ReminderUnit::Days => Duration::days(value),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomReminder {
    pub value: u32,
    pub unit: ReminderUnit,
}

/// How far ahead of the scheduled instant a task reminder fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReminderOffset {
    OnTime,
    Minutes5,
    Minutes10,
    Minutes30,
    Hour1,
    Hours2,
    DayBefore9am,
    Custom(CustomReminder),
}

impl ReminderOffset {
    /// The seven fixed choices offered before "custom".
    pub const FIXED: [ReminderOffset; 7] = [
        ReminderOffset::OnTime,
        ReminderOffset::Minutes5,
        ReminderOffset::Minutes10,
        ReminderOffset::Minutes30,
        ReminderOffset::Hour1,
        ReminderOffset::Hours2,
        ReminderOffset::DayBefore9am,
    ];

    /// Instant at which a reminder with this offset fires.
    pub fn fire_time(&self, schedule: &Schedule) -> DateTime<Utc> {
        let at = schedule.instant();
        match self {
            ReminderOffset::OnTime => at,
            ReminderOffset::Minutes5 => at - Duration::minutes(5),
            ReminderOffset::Minutes10 => at - Duration::minutes(10),
            ReminderOffset::Minutes30 => at - Duration::minutes(30),
            ReminderOffset::Hour1 => at - Duration::hours(1),
            ReminderOffset::Hours2 => at - Duration::hours(2),
            ReminderOffset::DayBefore9am => {
                let eve = schedule.date() - Duration::days(1);
                Utc.from_utc_datetime(&eve.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()))
            }
            ReminderOffset::Custom(custom) => at - custom.unit.span(custom.value),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskReminder {
    pub id: Uuid,
    pub offset: ReminderOffset,
}

impl TaskReminder {
    pub fn new(offset: ReminderOffset) -> Self {
        Self {
            id: Uuid::new_v4(),
            offset,
        }
    }
}

/// A habit reminder always fires at a fixed clock time; `days` is only
/// carried for weekly repeats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HabitReminder {
    pub id: Uuid,
    pub time: NaiveTime,
    pub repeat: RepeatPattern,
    pub days: Vec<WeekDay>,
}

/// Produce the reminder record for a confirmed picker time.
pub fn build_reminder(time: NaiveTime, repeat: RepeatPattern, days: &[WeekDay]) -> HabitReminder {
    HabitReminder {
        id: Uuid::new_v4(),
        time,
        repeat,
        days: if repeat == RepeatPattern::Weekly {
            days.to_vec()
        } else {
            Vec::new()
        },
    }
}

/// A custom offset is acceptable only if it fits strictly inside the gap
/// between now and the scheduled instant. No schedule means nothing to
/// measure against, so the reminder is rejected.
pub fn validate_custom_reminder(
    value: u32,
    unit: ReminderUnit,
    schedule: Option<&Schedule>,
    now: DateTime<Utc>,
) -> bool {
    let Some(schedule) = schedule else {
        return false;
    };
    schedule.instant().signed_duration_since(now) > unit.span(value)
}

/// Reminders listed anywhere are shown in clock order; the sort is stable so
/// same-time reminders keep their insertion order.
pub fn sort_reminders(reminders: &[HabitReminder]) -> Vec<HabitReminder> {
    let mut sorted = reminders.to_vec();
    sorted.sort_by_key(|reminder| reminder.time);
    sorted
}
