//! In-memory Weight Store backed by `DashMap`.

use async_trait::async_trait;
use dashmap::DashMap;
use migration_control_sdk::{MigrationTarget, WeightRecord};
use parking_lot::RwLock;

use crate::domain::store::{WeightStore, WeightUpdate};

/// `DashMap` entries hold their shard's write lock for the duration of an
/// update, which gives the single-writer-per-key guarantee.
#[derive(Default)]
pub struct InMemoryWeightStore {
    records: DashMap<MigrationTarget, WeightRecord>,
    lock_flag: RwLock<Option<bool>>,
}

impl InMemoryWeightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WeightStore for InMemoryWeightStore {
    async fn get(&self, target: &MigrationTarget) -> anyhow::Result<Option<WeightRecord>> {
        Ok(self.records.get(target).map(|r| r.value().clone()))
    }

    async fn update(
        &self,
        target: &MigrationTarget,
        update: WeightUpdate,
    ) -> anyhow::Result<WeightRecord> {
        let mut entry = self
            .records
            .entry(target.clone())
            .or_insert_with(|| WeightRecord::inactive(target.clone()));
        let next = update.apply(entry.value().clone());
        *entry.value_mut() = next.clone();
        Ok(next)
    }

    async fn lock_flag(&self) -> anyhow::Result<Option<bool>> {
        Ok(*self.lock_flag.read())
    }

    async fn set_lock_flag(&self, locked: bool) -> anyhow::Result<()> {
        *self.lock_flag.write() = Some(locked);
        Ok(())
    }
}
