use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::draft::{DraftStore, HabitDraft, HabitPatch, TaskDraft, TaskPatch};
use crate::habit::Habit;
use crate::reminder::{validate_custom_reminder, HabitReminder, ReminderOffset, TaskReminder};
use crate::schedule::{Schedule, WeekDay};
use crate::sheet::{SheetContent, SheetContext, SheetController};
use crate::storage::Store;
use crate::tag::Tag;
use crate::task::{normalize_sub_tasks, Task};

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("a title is required")]
    EmptyTitle,
    #[error("a tag name cannot be blank")]
    BlankTag,
    #[error("the reminder does not fit before the scheduled time")]
    InvalidReminder,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Glue between the task draft, the persistence contract and the sheet
/// controller. Reads the draft on save, persists, and tells the controller
/// what to show next.
pub struct TaskCommitter {
    store: Arc<dyn Store<Task>>,
    draft: Arc<DraftStore<TaskDraft>>,
}

impl TaskCommitter {
    pub fn new(store: Arc<dyn Store<Task>>, draft: Arc<DraftStore<TaskDraft>>) -> Self {
        Self { store, draft }
    }

    /// Create-flow save from the task form. An empty trimmed title rejects
    /// with no side effect at all; a persistence failure keeps the draft and
    /// the sheet exactly as they were so the user can retry.
    pub fn commit(&self, sheet: &mut SheetController) -> Result<Task, CommitError> {
        let draft = self.draft.snapshot();
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(CommitError::EmptyTitle);
        }

        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: draft.description,
            sub_tasks: normalize_sub_tasks(&draft.sub_tasks),
            reminders: draft.reminders,
            schedule: draft.schedule,
            completed: false,
            completed_at: None,
            tags: draft.tags,
        };
        let task = self.store.create(task).map_err(|err| {
            warn!(%err, "task create failed; keeping draft");
            CommitError::Store(err)
        })?;

        self.draft.reset();
        sheet.dismiss();
        info!(id = %task.id, "task committed");
        Ok(task)
    }

    /// Calendar confirm. In edit mode the task is updated in place and its
    /// detail view re-projected; in create mode the choice lands in the
    /// draft and the form comes back.
    pub fn save_schedule(
        &self,
        sheet: &mut SheetController,
        schedule: Schedule,
        reminders: Vec<TaskReminder>,
        now: DateTime<Utc>,
    ) -> Result<(), CommitError> {
        for reminder in &reminders {
            if let ReminderOffset::Custom(custom) = reminder.offset {
                if !validate_custom_reminder(custom.value, custom.unit, Some(&schedule), now) {
                    return Err(CommitError::InvalidReminder);
                }
            }
        }

        let editing = sheet
            .context()
            .filter(|ctx| ctx.is_task_edit())
            .and_then(|ctx| ctx.task.clone());
        if let Some(mut task) = editing {
            task.schedule = Some(schedule);
            task.reminders = reminders;
            self.store.update(task.clone()).map_err(|err| {
                warn!(id = %task.id, %err, "task schedule update failed");
                CommitError::Store(err)
            })?;
            sheet.project(SheetContent::TaskDetail, SheetContext::for_task(task));
        } else {
            self.draft.update(TaskPatch {
                schedule: Some(Some(schedule)),
                reminders: Some(reminders),
                ..Default::default()
            });
            sheet.project(SheetContent::TaskForm, SheetContext::default());
        }
        Ok(())
    }

    /// Tag-picker confirm for the task family, with the same edit/create
    /// routing as the calendar.
    pub fn save_tags(
        &self,
        sheet: &mut SheetController,
        tags: Vec<Tag>,
    ) -> Result<(), CommitError> {
        let editing = sheet
            .context()
            .filter(|ctx| ctx.is_task_edit())
            .and_then(|ctx| ctx.task.clone());
        if let Some(mut task) = editing {
            task.tags = tags;
            self.store.update(task.clone()).map_err(|err| {
                warn!(id = %task.id, %err, "task tag update failed");
                CommitError::Store(err)
            })?;
            sheet.project(SheetContent::TaskDetail, SheetContext::for_task(task));
        } else {
            self.draft.update(TaskPatch {
                tags: Some(tags),
                ..Default::default()
            });
            sheet.project(SheetContent::TaskForm, SheetContext::default());
        }
        Ok(())
    }

    pub fn set_completed(
        &self,
        task: &Task,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<Task, CommitError> {
        let mut updated = task.clone();
        updated.set_completed(completed, now);
        self.store.update(updated.clone())?;
        Ok(updated)
    }

    pub fn delete(&self, sheet: &mut SheetController, id: Uuid) -> Result<(), CommitError> {
        self.store.delete(id)?;
        sheet.dismiss();
        info!(%id, "task deleted");
        Ok(())
    }
}

pub struct HabitCommitter {
    store: Arc<dyn Store<Habit>>,
    draft: Arc<DraftStore<HabitDraft>>,
}

impl HabitCommitter {
    pub fn new(store: Arc<dyn Store<Habit>>, draft: Arc<DraftStore<HabitDraft>>) -> Self {
        Self { store, draft }
    }

    pub fn commit(&self, sheet: &mut SheetController) -> Result<Habit, CommitError> {
        let draft = self.draft.snapshot();
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(CommitError::EmptyTitle);
        }

        let habit = Habit {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: draft.description,
            reminders: draft.reminders,
            scheduled_days: draft.scheduled_days,
            concluded: false,
            concluded_at: None,
            completed: false,
            completed_at: None,
            tags: draft.tags,
        };
        let habit = self.store.create(habit).map_err(|err| {
            warn!(%err, "habit create failed; keeping draft");
            CommitError::Store(err)
        })?;

        self.draft.reset();
        sheet.dismiss();
        info!(id = %habit.id, "habit committed");
        Ok(habit)
    }

    /// Day-schedule confirm: merge the selection into the draft and bring
    /// the habit form back. Nothing persists until the form itself commits.
    pub fn save_day_schedule(
        &self,
        sheet: &mut SheetController,
        days: Vec<WeekDay>,
        reminders: Vec<HabitReminder>,
    ) {
        self.draft.update(HabitPatch {
            scheduled_days: Some(days),
            reminders: Some(reminders),
            ..Default::default()
        });
        sheet.project(SheetContent::HabitForm, SheetContext::default());
    }

    /// Tag-picker confirm for the habit family.
    pub fn save_tags(
        &self,
        sheet: &mut SheetController,
        tags: Vec<Tag>,
    ) -> Result<(), CommitError> {
        let editing = sheet
            .context()
            .filter(|ctx| ctx.is_habit_edit())
            .and_then(|ctx| ctx.habit.clone());
        if let Some(mut habit) = editing {
            habit.tags = tags;
            self.store.update(habit.clone()).map_err(|err| {
                warn!(id = %habit.id, %err, "habit tag update failed");
                CommitError::Store(err)
            })?;
            sheet.project(SheetContent::HabitDetail, SheetContext::for_habit(habit));
        } else {
            self.draft.update(HabitPatch {
                tags: Some(tags),
                ..Default::default()
            });
            sheet.project(SheetContent::HabitForm, SheetContext::default());
        }
        Ok(())
    }

    pub fn set_completed(
        &self,
        habit: &Habit,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<Habit, CommitError> {
        let mut updated = habit.clone();
        updated.set_completed(completed, now);
        self.store.update(updated.clone())?;
        Ok(updated)
    }

    pub fn conclude(&self, habit: &Habit, now: DateTime<Utc>) -> Result<Habit, CommitError> {
        let mut updated = habit.clone();
        updated.conclude(now);
        self.store.update(updated.clone())?;
        Ok(updated)
    }

    pub fn delete(&self, sheet: &mut SheetController, id: Uuid) -> Result<(), CommitError> {
        self.store.delete(id)?;
        sheet.dismiss();
        info!(%id, "habit deleted");
        Ok(())
    }
}

pub struct TagCommitter {
    store: Arc<dyn Store<Tag>>,
}

impl TagCommitter {
    pub fn new(store: Arc<dyn Store<Tag>>) -> Self {
        Self { store }
    }

    /// Create a tag from the standalone editor. When the editor was opened
    /// from the tag picker the picker comes back with the new tag available;
    /// opened from a screen, the overlay just closes.
    pub fn create(&self, sheet: &mut SheetController, name: &str) -> Result<Tag, CommitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CommitError::BlankTag);
        }
        let tag = self.store.create(Tag::new(name)).map_err(|err| {
            warn!(%err, "tag create failed");
            CommitError::Store(err)
        })?;

        let back_to_picker =
            sheet.context().and_then(|ctx| ctx.return_to) == Some(SheetContent::TagPicker);
        if back_to_picker {
            let prior = sheet.context().cloned().unwrap_or_default();
            let carried = SheetContext {
                task: prior.task,
                habit: prior.habit,
                ..Default::default()
            };
            sheet.project(SheetContent::TagPicker, carried);
        } else {
            sheet.dismiss();
        }
        info!(id = %tag.id, name = %tag.name, "tag created");
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::{CustomReminder, ReminderUnit};
    use crate::storage::MemoryStore;
    use anyhow::bail;
    use chrono::{Duration, NaiveDate, TimeZone};

    struct OfflineStore;

    impl Store<Task> for OfflineStore {
        fn list(&self) -> anyhow::Result<Vec<Task>> {
            bail!("store offline")
        }
        fn create(&self, _entity: Task) -> anyhow::Result<Task> {
            bail!("store offline")
        }
        fn update(&self, _entity: Task) -> anyhow::Result<()> {
            bail!("store offline")
        }
        fn delete(&self, _id: Uuid) -> anyhow::Result<()> {
            bail!("store offline")
        }
    }

    fn task_fixture() -> (SheetController, Arc<DraftStore<TaskDraft>>, Arc<MemoryStore<Task>>) {
        let draft = Arc::new(DraftStore::<TaskDraft>::new());
        let store = Arc::new(MemoryStore::<Task>::new());
        let sheet = SheetController::new().with_draft_sink(draft.clone());
        (sheet, draft, store)
    }

    #[test]
    fn whitespace_title_rejects_without_side_effects() {
        let (mut sheet, draft, store) = task_fixture();
        let committer = TaskCommitter::new(store.clone(), draft.clone());
        sheet.project(SheetContent::TaskForm, SheetContext::default());
        draft.update(TaskPatch {
            title: Some("   ".into()),
            description: Some("still here".into()),
            ..Default::default()
        });

        let err = committer.commit(&mut sheet).unwrap_err();
        assert!(matches!(err, CommitError::EmptyTitle));
        assert!(store.list().unwrap().is_empty());
        assert_eq!(draft.snapshot().description, "still here");
        assert_eq!(sheet.content(), Some(SheetContent::TaskForm));
    }

    #[test]
    fn commit_trims_filters_and_closes() {
        let (mut sheet, draft, store) = task_fixture();
        let committer = TaskCommitter::new(store.clone(), draft.clone());
        sheet.project(SheetContent::TaskForm, SheetContext::default());
        draft.update(TaskPatch {
            title: Some("  Water the garden  ".into()),
            sub_tasks: Some(vec!["front beds".into(), "  ".into()]),
            ..Default::default()
        });

        let task = committer.commit(&mut sheet).unwrap();
        assert_eq!(task.title, "Water the garden");
        assert_eq!(task.sub_tasks.len(), 1);
        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(draft.snapshot(), TaskDraft::default());
        assert_eq!(sheet.content(), None);
        assert!(!sheet.is_visible());
    }

    #[test]
    fn persistence_failure_keeps_draft_and_sheet() {
        let draft = Arc::new(DraftStore::<TaskDraft>::new());
        let mut sheet = SheetController::new().with_draft_sink(draft.clone());
        let committer = TaskCommitter::new(Arc::new(OfflineStore), draft.clone());
        sheet.project(SheetContent::TaskForm, SheetContext::default());
        draft.update(TaskPatch {
            title: Some("Backup laptop".into()),
            ..Default::default()
        });

        let err = committer.commit(&mut sheet).unwrap_err();
        assert!(matches!(err, CommitError::Store(_)));
        assert_eq!(draft.snapshot().title, "Backup laptop");
        assert_eq!(sheet.content(), Some(SheetContent::TaskForm));
        assert!(sheet.is_visible());
    }

    #[test]
    fn calendar_save_in_create_mode_lands_in_the_draft() {
        let (mut sheet, draft, store) = task_fixture();
        let committer = TaskCommitter::new(store, draft.clone());
        sheet.project(SheetContent::TaskForm, SheetContext::default());
        sheet.project(SheetContent::Calendar, SheetContext::default());

        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap();
        committer
            .save_schedule(&mut sheet, Schedule::AllDay(date), Vec::new(), now)
            .unwrap();

        assert_eq!(draft.snapshot().schedule, Some(Schedule::AllDay(date)));
        assert_eq!(sheet.content(), Some(SheetContent::TaskForm));
    }

    #[test]
    fn calendar_save_in_edit_mode_updates_and_shows_the_detail() {
        let (mut sheet, draft, store) = task_fixture();
        let committer = TaskCommitter::new(store.clone(), draft.clone());
        draft.update(TaskPatch {
            title: Some("Dentist".into()),
            ..Default::default()
        });
        let task = committer.commit(&mut sheet).unwrap();

        sheet.project(SheetContent::TaskDetail, SheetContext::for_task(task.clone()));
        sheet.project(
            SheetContent::Calendar,
            SheetContext::for_task(task.clone()).returning_to(SheetContent::TaskDetail),
        );

        let at = Utc.with_ymd_and_hms(2025, 10, 3, 14, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap();
        committer
            .save_schedule(&mut sheet, Schedule::Timed(at), Vec::new(), now)
            .unwrap();

        assert_eq!(sheet.content(), Some(SheetContent::TaskDetail));
        let shown = sheet.context().unwrap().task.as_ref().unwrap();
        assert_eq!(shown.id, task.id);
        assert_eq!(shown.schedule, Some(Schedule::Timed(at)));
        assert_eq!(
            store.list().unwrap()[0].schedule,
            Some(Schedule::Timed(at))
        );
        // The shared draft was never involved in the edit flow.
        assert_eq!(draft.snapshot().schedule, None);
    }

    #[test]
    fn unfit_custom_reminder_rejects_the_calendar_save() {
        let (mut sheet, draft, store) = task_fixture();
        let committer = TaskCommitter::new(store, draft.clone());
        sheet.project(SheetContent::Calendar, SheetContext::default());

        let now = Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap();
        let soon = Schedule::Timed(now + Duration::minutes(10));
        let reminder = TaskReminder::new(ReminderOffset::Custom(CustomReminder {
            value: 30,
            unit: ReminderUnit::Minutes,
        }));

        let err = committer
            .save_schedule(&mut sheet, soon, vec![reminder], now)
            .unwrap_err();
        assert!(matches!(err, CommitError::InvalidReminder));
        assert_eq!(draft.snapshot().schedule, None);
        assert_eq!(sheet.content(), Some(SheetContent::Calendar));
    }

    #[test]
    fn habit_day_schedule_merges_into_the_draft() {
        let draft = Arc::new(DraftStore::<HabitDraft>::new());
        let store = Arc::new(MemoryStore::<Habit>::new());
        let mut sheet = SheetController::new().with_draft_sink(draft.clone());
        let committer = HabitCommitter::new(store, draft.clone());

        sheet.project(SheetContent::HabitForm, SheetContext::default());
        sheet.project(
            SheetContent::HabitDaySchedule,
            SheetContext::default().returning_to(SheetContent::HabitForm),
        );
        let days = vec![WeekDay::Tuesday, WeekDay::Saturday];
        committer.save_day_schedule(&mut sheet, days.clone(), Vec::new());

        assert_eq!(draft.snapshot().scheduled_days, days);
        assert_eq!(sheet.content(), Some(SheetContent::HabitForm));
        assert!(sheet.is_visible());
    }

    #[test]
    fn tag_created_from_the_picker_returns_to_the_picker() {
        let store = Arc::new(MemoryStore::<Tag>::new());
        let committer = TagCommitter::new(store.clone());
        let mut sheet = SheetController::new();
        sheet.project(
            SheetContent::TagEditor,
            SheetContext::default().returning_to(SheetContent::TagPicker),
        );

        committer.create(&mut sheet, " errands ").unwrap();
        assert_eq!(sheet.content(), Some(SheetContent::TagPicker));
        assert_eq!(store.list().unwrap()[0].name, "errands");
    }

    #[test]
    fn tag_created_from_a_screen_closes_the_sheet() {
        let committer = TagCommitter::new(Arc::new(MemoryStore::<Tag>::new()));
        let mut sheet = SheetController::new();
        sheet.project(
            SheetContent::TagEditor,
            SheetContext::default().from_source("tagsScreen"),
        );

        committer.create(&mut sheet, "home").unwrap();
        assert_eq!(sheet.content(), None);
        assert!(!sheet.is_visible());
    }

    #[test]
    fn blank_tag_name_is_rejected() {
        let store = Arc::new(MemoryStore::<Tag>::new());
        let committer = TagCommitter::new(store.clone());
        let mut sheet = SheetController::new();
        sheet.project(SheetContent::TagEditor, SheetContext::default());

        let err = committer.create(&mut sheet, "  ").unwrap_err();
        assert!(matches!(err, CommitError::BlankTag));
        assert!(store.list().unwrap().is_empty());
        assert_eq!(sheet.content(), Some(SheetContent::TagEditor));
    }
}
