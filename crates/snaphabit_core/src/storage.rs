use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use uuid::Uuid;

pub trait Identified {
    fn id(&self) -> Uuid;
}

/// Persistence contract per entity kind. Implementations live outside the
/// core; every operation may fail, and a failure means "did not complete" —
/// callers keep their prior state.
pub trait Store<T>: Send + Sync {
    fn list(&self) -> Result<Vec<T>>;
    fn create(&self, entity: T) -> Result<T>;
    fn update(&self, entity: T) -> Result<()>;
    fn delete(&self, id: Uuid) -> Result<()>;
}

/// Whole-collection store kept in memory. Backs the core's own tests; real
/// deployments use a file-backed implementation of the same contract.
pub struct MemoryStore<T> {
    entries: RwLock<Vec<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Identified + Send + Sync> Store<T> for MemoryStore<T> {
    fn list(&self) -> Result<Vec<T>> {
        Ok(self.entries.read().clone())
    }

    fn create(&self, entity: T) -> Result<T> {
        self.entries.write().push(entity.clone());
        Ok(entity)
    }

    fn update(&self, entity: T) -> Result<()> {
        let mut entries = self.entries.write();
        let slot = entries
            .iter_mut()
            .find(|existing| existing.id() == entity.id())
            .ok_or_else(|| anyhow!("no entity with id {}", entity.id()))?;
        *slot = entity;
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.entries.write().retain(|existing| existing.id() != id);
        Ok(())
    }
}
