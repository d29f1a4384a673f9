use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use snaphabit_core::habit::Habit;
use snaphabit_core::storage::{Identified, Store};
use snaphabit_core::tag::Tag;
use snaphabit_core::task::Task;

use crate::stats::StatsLedger;

/// One whole-collection JSON file, cached in memory and rewritten on every
/// mutation. The file is written before the cache is swapped, so a failed
/// write leaves both the file and the cache at their prior state.
pub struct JsonCollection<T> {
    path: PathBuf,
    entries: RwLock<Vec<T>>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + Identified,
{
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries: Vec<T> = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), count = entries.len(), "collection opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn find(&self, id: Uuid) -> Option<T> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.id() == id)
            .cloned()
    }

    fn persist(&self, entries: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl<T> Store<T> for JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + Identified + Send + Sync,
{
    fn list(&self) -> Result<Vec<T>> {
        Ok(self.entries.read().clone())
    }

    fn create(&self, entity: T) -> Result<T> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        next.push(entity.clone());
        self.persist(&next)?;
        *entries = next;
        Ok(entity)
    }

    fn update(&self, entity: T) -> Result<()> {
        let mut entries = self.entries.write();
        let position = entries
            .iter()
            .position(|existing| existing.id() == entity.id())
            .ok_or_else(|| anyhow!("no entity with id {}", entity.id()))?;
        let mut next = entries.clone();
        next[position] = entity;
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        next.retain(|existing| existing.id() != id);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

/// Task collection plus usage counters. Counter writes are advisory and
/// never fail the underlying operation.
pub struct TaskStore {
    collection: JsonCollection<Task>,
    stats: Arc<StatsLedger>,
}

impl TaskStore {
    pub fn open(dir: &Path, stats: Arc<StatsLedger>) -> Result<Self> {
        Ok(Self {
            collection: JsonCollection::open(dir.join("tasks.json"))?,
            stats,
        })
    }

    fn record(&self, outcome: Result<()>) {
        if let Err(err) = outcome {
            warn!(%err, "statistics update failed");
        }
    }
}

impl Store<Task> for TaskStore {
    fn list(&self) -> Result<Vec<Task>> {
        self.collection.list()
    }

    fn create(&self, entity: Task) -> Result<Task> {
        let created = self.collection.create(entity)?;
        self.record(self.stats.record_task_created());
        Ok(created)
    }

    fn update(&self, entity: Task) -> Result<()> {
        let freshly_completed = entity.completed
            && self
                .collection
                .find(entity.id())
                .is_some_and(|prior| !prior.completed);
        self.collection.update(entity)?;
        if freshly_completed {
            self.record(self.stats.record_task_completed());
        }
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.collection.delete(id)?;
        self.record(self.stats.record_task_deleted());
        Ok(())
    }
}

pub struct HabitStore {
    collection: JsonCollection<Habit>,
    stats: Arc<StatsLedger>,
}

impl HabitStore {
    pub fn open(dir: &Path, stats: Arc<StatsLedger>) -> Result<Self> {
        Ok(Self {
            collection: JsonCollection::open(dir.join("habits.json"))?,
            stats,
        })
    }

    fn record(&self, outcome: Result<()>) {
        if let Err(err) = outcome {
            warn!(%err, "statistics update failed");
        }
    }
}

impl Store<Habit> for HabitStore {
    fn list(&self) -> Result<Vec<Habit>> {
        self.collection.list()
    }

    fn create(&self, entity: Habit) -> Result<Habit> {
        let created = self.collection.create(entity)?;
        self.record(self.stats.record_habit_created());
        Ok(created)
    }

    fn update(&self, entity: Habit) -> Result<()> {
        let freshly_completed = entity.completed
            && self
                .collection
                .find(entity.id())
                .is_some_and(|prior| !prior.completed);
        self.collection.update(entity)?;
        if freshly_completed {
            self.record(self.stats.record_habit_completed());
        }
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.collection.delete(id)?;
        self.record(self.stats.record_habit_deleted());
        Ok(())
    }
}

/// Tags carry no usage counters; the collection is the store.
pub type TagStore = JsonCollection<Tag>;
