use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Running usage counters shown on the statistics screen.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageStats {
    pub tasks_created: u64,
    pub tasks_completed: u64,
    pub tasks_deleted: u64,
    pub habits_created: u64,
    pub habits_completed: u64,
    pub habits_deleted: u64,
}

pub struct StatsLedger {
    path: PathBuf,
    stats: RwLock<UsageStats>,
}

impl StatsLedger {
    pub fn open(path: PathBuf) -> Result<Self> {
        let stats = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        } else {
            UsageStats::default()
        };
        Ok(Self {
            path,
            stats: RwLock::new(stats),
        })
    }

    pub fn snapshot(&self) -> UsageStats {
        *self.stats.read()
    }

    fn bump(&self, apply: impl FnOnce(&mut UsageStats)) -> Result<()> {
        let mut stats = self.stats.write();
        let mut next = *stats;
        apply(&mut next);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&next)?;
        fs::write(&self.path, raw).with_context(|| format!("writing {}", self.path.display()))?;
        *stats = next;
        Ok(())
    }

    pub fn record_task_created(&self) -> Result<()> {
        self.bump(|stats| stats.tasks_created += 1)
    }

    pub fn record_task_completed(&self) -> Result<()> {
        self.bump(|stats| stats.tasks_completed += 1)
    }

    pub fn record_task_deleted(&self) -> Result<()> {
        self.bump(|stats| stats.tasks_deleted += 1)
    }

    pub fn record_habit_created(&self) -> Result<()> {
        self.bump(|stats| stats.habits_created += 1)
    }

    pub fn record_habit_completed(&self) -> Result<()> {
        self.bump(|stats| stats.habits_completed += 1)
    }

    pub fn record_habit_deleted(&self) -> Result<()> {
        self.bump(|stats| stats.habits_deleted += 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn counters_survive_a_reopen() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("statistics.json");

        let ledger = StatsLedger::open(path.clone()).unwrap();
        ledger.record_habit_created().unwrap();
        ledger.record_habit_created().unwrap();
        ledger.record_habit_deleted().unwrap();

        let reopened = StatsLedger::open(path).unwrap();
        let stats = reopened.snapshot();
        assert_eq!(stats.habits_created, 2);
        assert_eq!(stats.habits_deleted, 1);
        assert_eq!(stats.tasks_created, 0);
    }
}
