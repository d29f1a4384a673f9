pub mod commit;
pub mod draft;
pub mod habit;
pub mod reminder;
pub mod schedule;
pub mod sheet;
pub mod storage;
pub mod tag;
pub mod task;

pub use crate::commit::{CommitError, HabitCommitter, TagCommitter, TaskCommitter};
pub use crate::draft::{DraftReset, DraftStore, HabitDraft, HabitPatch, TaskDraft, TaskPatch};
pub use crate::sheet::{Dismissal, SheetContent, SheetContext, SheetController};
pub use crate::storage::{Identified, MemoryStore, Store};
