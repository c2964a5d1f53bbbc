//! Weight Store port.

use async_trait::async_trait;
use migration_control_sdk::{MigrationTarget, WeightRecord};

/// Mutation applied to a target's record in a single store write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightUpdate {
    /// `active = true`, weight untouched.
    Activate,
    /// `active = false` and `weight = 0` together.
    Deactivate,
    /// Overwrite the weight, activity untouched. The value is already validated.
    SetWeight(u8),
}

impl WeightUpdate {
    #[must_use]
    pub fn apply(self, mut record: WeightRecord) -> WeightRecord {
        match self {
            Self::Activate => record.active = true,
            Self::Deactivate => {
                record.active = false;
                record.weight = 0;
            }
            Self::SetWeight(weight) => record.weight = weight,
        }
        record
    }
}

/// Key-value store holding one [`WeightRecord`] per target plus the last
/// lock flag acknowledged by the Gateway.
///
/// Implementations must make [`WeightStore::update`] atomic per target: two
/// concurrent updates on the same key never interleave.
#[async_trait]
pub trait WeightStore: Send + Sync {
    /// Record of `target`, or `None` if it was never written.
    async fn get(&self, target: &MigrationTarget) -> anyhow::Result<Option<WeightRecord>>;

    /// Read-modify-write of a whole record. Missing records start from
    /// [`WeightRecord::inactive`].
    async fn update(
        &self,
        target: &MigrationTarget,
        update: WeightUpdate,
    ) -> anyhow::Result<WeightRecord>;

    /// Last lock flag reflected from the Gateway, `None` if never observed.
    async fn lock_flag(&self) -> anyhow::Result<Option<bool>>;

    async fn set_lock_flag(&self, locked: bool) -> anyhow::Result<()>;
}
