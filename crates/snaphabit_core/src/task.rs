use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reminder::TaskReminder;
use crate::schedule::Schedule;
use crate::storage::Identified;
use crate::tag::Tag;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubTask {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
}

impl SubTask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub sub_tasks: Vec<SubTask>,
    pub reminders: Vec<TaskReminder>,
    pub schedule: Option<Schedule>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
}

impl Task {
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }
}

impl Identified for Task {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Blank sub-task rows are an editing artifact and never persist.
pub fn normalize_sub_tasks(texts: &[String]) -> Vec<SubTask> {
    texts
        .iter()
        .filter(|text| !text.trim().is_empty())
        .map(|text| SubTask::new(text.trim()))
        .collect()
}
