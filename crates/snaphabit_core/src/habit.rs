use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reminder::HabitReminder;
use crate::schedule::WeekDay;
use crate::storage::Identified;
use crate::tag::Tag;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Habit {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub reminders: Vec<HabitReminder>,
    pub scheduled_days: Vec<WeekDay>,
    pub concluded: bool,
    pub concluded_at: Option<DateTime<Utc>>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
}

impl Habit {
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }

    /// A concluded habit is retired for good, as opposed to a day's
    /// completion which resets with the schedule.
    pub fn conclude(&mut self, now: DateTime<Utc>) {
        self.concluded = true;
        self.concluded_at = Some(now);
    }
}

impl Identified for Habit {
    fn id(&self) -> Uuid {
        self.id
    }
}
