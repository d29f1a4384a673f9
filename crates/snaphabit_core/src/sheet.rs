use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::DraftReset;
use crate::habit::Habit;
use crate::tag::Tag;
use crate::task::Task;

/// Which editor occupies the one overlay surface. The controller keeps at
/// most one of these active, so two simultaneous primaries cannot be
/// represented at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SheetContent {
    TaskForm,
    HabitForm,
    Calendar,
    HabitDaySchedule,
    TagEditor,
    TagPicker,
    TaskDetail,
    HabitDetail,
}

impl SheetContent {
    /// Satellites are sub-steps of a form flow; dismissing one hands control
    /// back to its owner instead of closing the overlay.
    pub fn is_satellite(self) -> bool {
        match self {
            SheetContent::Calendar | SheetContent::HabitDaySchedule | SheetContent::TagPicker => {
                true
            }
            SheetContent::TaskForm
            | SheetContent::HabitForm
            | SheetContent::TagEditor
            | SheetContent::TaskDetail
            | SheetContent::HabitDetail => false,
        }
    }

    pub fn is_primary(self) -> bool {
        !self.is_satellite()
    }

    /// Owner a satellite falls back to when its projection carried no
    /// explicit `return_to`. Primaries map to themselves; dismissal closes
    /// them rather than routing anywhere.
    pub fn fallback_parent(self) -> SheetContent {
        match self {
            SheetContent::Calendar | SheetContent::TagPicker => SheetContent::TaskForm,
            SheetContent::HabitDaySchedule => SheetContent::HabitForm,
            SheetContent::TaskForm
            | SheetContent::HabitForm
            | SheetContent::TagEditor
            | SheetContent::TaskDetail
            | SheetContent::HabitDetail => self,
        }
    }
}

/// Payload attached to a projection. Set on every `project`, cleared when
/// the overlay fully closes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetContext {
    pub task: Option<Task>,
    pub habit: Option<Habit>,
    pub tag: Option<Tag>,
    pub return_to: Option<SheetContent>,
    pub source: Option<String>,
}

impl SheetContext {
    pub fn for_task(task: Task) -> Self {
        Self {
            task: Some(task),
            ..Default::default()
        }
    }

    pub fn for_habit(habit: Habit) -> Self {
        Self {
            habit: Some(habit),
            ..Default::default()
        }
    }

    pub fn for_tag(tag: Tag) -> Self {
        Self {
            tag: Some(tag),
            ..Default::default()
        }
    }

    pub fn returning_to(mut self, content: SheetContent) -> Self {
        self.return_to = Some(content);
        self
    }

    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Edit mode is structural: an entity payload plus a detail-view return
    /// target, never a separate flag.
    pub fn is_task_edit(&self) -> bool {
        self.task.is_some() && self.return_to == Some(SheetContent::TaskDetail)
    }

    pub fn is_habit_edit(&self) -> bool {
        self.habit.is_some() && self.return_to == Some(SheetContent::HabitDetail)
    }
}

/// What a `dismiss` did, so a presentation layer can sequence its own
/// close/open animation from this completion event instead of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// A satellite handed control back; the overlay stayed up.
    ReturnedTo(SheetContent),
    /// A primary closed the overlay entirely.
    Closed,
    /// Nothing was being shown.
    Idle,
}

/// Process-wide owner of the overlay surface: which content is projected,
/// its context payload, and whether the surface is visible. Constructed once
/// and passed by reference to every consumer.
pub struct SheetController {
    content: Option<SheetContent>,
    context: Option<SheetContext>,
    visible: bool,
    draft_sinks: Vec<Arc<dyn DraftReset>>,
}

impl SheetController {
    pub fn new() -> Self {
        Self {
            content: None,
            context: None,
            visible: false,
            draft_sinks: Vec::new(),
        }
    }

    /// Register a draft store to be reset whenever the overlay fully closes.
    pub fn with_draft_sink(mut self, sink: Arc<dyn DraftReset>) -> Self {
        self.draft_sinks.push(sink);
        self
    }

    pub fn content(&self) -> Option<SheetContent> {
        self.content
    }

    pub fn context(&self) -> Option<&SheetContext> {
        self.context.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Project `content` onto the overlay. Content and context are committed
    /// to state before the surface is marked visible, so a renderer that
    /// reacts to visibility always observes the final projection.
    pub fn project(&mut self, content: SheetContent, context: SheetContext) {
        debug!(?content, "projecting sheet content");
        self.content = Some(content);
        self.context = Some(context);
        self.visible = true;
    }

    /// Guarded re-projection for anything deferred by the presentation
    /// layer: a no-op unless the overlay still shows `expected`.
    pub fn project_if(
        &mut self,
        expected: SheetContent,
        content: SheetContent,
        context: SheetContext,
    ) -> bool {
        if self.content != Some(expected) {
            debug!(?expected, current = ?self.content, "stale re-projection dropped");
            return false;
        }
        self.project(content, context);
        true
    }

    /// Dismiss the current content. Satellites re-project their owner with
    /// the overlay still up; primaries fully close the overlay and reset
    /// every registered draft store.
    pub fn dismiss(&mut self) -> Dismissal {
        let Some(current) = self.content else {
            return Dismissal::Idle;
        };

        if current.is_satellite() {
            let context = self.context.take().unwrap_or_default();
            let target = context.return_to.unwrap_or_else(|| current.fallback_parent());
            // Entity payloads ride along so a detail view keeps its subject;
            // the routing fields are spent.
            let carried = SheetContext {
                task: context.task,
                habit: context.habit,
                ..Default::default()
            };
            debug!(from = ?current, to = ?target, "satellite dismissed");
            self.content = Some(target);
            self.context = Some(carried);
            Dismissal::ReturnedTo(target)
        } else {
            debug!(from = ?current, "sheet closed");
            self.visible = false;
            self.content = None;
            self.context = None;
            for sink in &self.draft_sinks {
                sink.reset_draft();
            }
            Dismissal::Closed
        }
    }
}

impl Default for SheetController {
    fn default() -> Self {
        Self::new()
    }
}
