pub mod json;
pub mod stats;

pub use crate::json::{HabitStore, JsonCollection, TagStore, TaskStore};
pub use crate::stats::{StatsLedger, UsageStats};

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

/// Where the JSON collections live. `SNAPHABIT_DATA_DIR` overrides the
/// default local directory.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("SNAPHABIT_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        config
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".snaphabit"),
        }
    }
}

/// The full set of collaborator stores backing one data directory.
pub struct Stores {
    pub tasks: Arc<TaskStore>,
    pub habits: Arc<HabitStore>,
    pub tags: Arc<TagStore>,
    pub stats: Arc<StatsLedger>,
}

impl Stores {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let dir = &config.data_dir;
        info!(data_dir = %dir.display(), "opening stores");
        let stats = Arc::new(StatsLedger::open(dir.join("statistics.json"))?);
        Ok(Self {
            tasks: Arc::new(TaskStore::open(dir, stats.clone())?),
            habits: Arc::new(HabitStore::open(dir, stats.clone())?),
            tags: Arc::new(TagStore::open(dir.join("tags.json"))?),
            stats,
        })
    }
}
