use parking_lot::RwLock;

use crate::reminder::{HabitReminder, TaskReminder};
use crate::schedule::{Schedule, WeekDay};
use crate::tag::Tag;

/// An in-progress entity accumulated across editor visits. The canonical
/// empty value is `Default`; all mutation happens through a patch merge.
pub trait Draftable: Clone + Default {
    type Patch;

    /// Shallow merge: present patch fields win, absent fields are untouched.
    fn apply(&mut self, patch: Self::Patch);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub reminders: Vec<TaskReminder>,
    pub sub_tasks: Vec<String>,
    pub schedule: Option<Schedule>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub reminders: Option<Vec<TaskReminder>>,
    pub sub_tasks: Option<Vec<String>>,
    /// Outer `None` leaves the schedule alone; `Some(None)` clears it.
    pub schedule: Option<Option<Schedule>>,
}

impl Draftable for TaskDraft {
    type Patch = TaskPatch;

    fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(reminders) = patch.reminders {
            self.reminders = reminders;
        }
        if let Some(sub_tasks) = patch.sub_tasks {
            self.sub_tasks = sub_tasks;
        }
        if let Some(schedule) = patch.schedule {
            self.schedule = schedule;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub reminders: Vec<HabitReminder>,
    pub scheduled_days: Vec<WeekDay>,
}

#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub reminders: Option<Vec<HabitReminder>>,
    pub scheduled_days: Option<Vec<WeekDay>>,
}

impl Draftable for HabitDraft {
    type Patch = HabitPatch;

    fn apply(&mut self, patch: HabitPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(reminders) = patch.reminders {
            self.reminders = reminders;
        }
        if let Some(scheduled_days) = patch.scheduled_days {
            self.scheduled_days = scheduled_days;
        }
    }
}

/// Signalled by the sheet controller when the overlay fully closes, so no
/// stale draft survives a closed sheet. Keeps the controller ignorant of
/// draft internals.
pub trait DraftReset: Send + Sync {
    fn reset_draft(&self);
}

/// One shared draft per entity kind. Sub-editors read and merge through this
/// store; nobody assigns fields directly.
pub struct DraftStore<D: Draftable> {
    draft: RwLock<D>,
}

impl<D: Draftable> DraftStore<D> {
    pub fn new() -> Self {
        Self {
            draft: RwLock::new(D::default()),
        }
    }

    pub fn snapshot(&self) -> D {
        self.draft.read().clone()
    }

    pub fn update(&self, patch: D::Patch) {
        self.draft.write().apply(patch);
    }

    pub fn reset(&self) {
        *self.draft.write() = D::default();
    }
}

impl<D: Draftable> Default for DraftStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Draftable + Send + Sync> DraftReset for DraftStore<D> {
    fn reset_draft(&self) {
        self.reset();
    }
}
