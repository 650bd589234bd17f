mod inmemory;
mod postgres;

use crate::repos::shared::query_structs::{DueCapsulesQuery, ReminderCandidatesQuery};
pub use inmemory::InMemoryCapsuleRepo;
pub use postgres::PostgresCapsuleRepo;

use capsule_scheduler_domain::{Capsule, CapsuleStatus, ReminderTimeframe, ID};

#[async_trait::async_trait]
pub trait ICapsuleRepo: Send + Sync {
    async fn insert(&self, capsule: &Capsule) -> anyhow::Result<()>;
    async fn find(&self, capsule_id: &ID) -> Option<Capsule>;
    async fn find_due(&self, query: DueCapsulesQuery) -> anyhow::Result<Vec<Capsule>>;
    async fn find_reminder_candidates(
        &self,
        query: ReminderCandidatesQuery,
    ) -> anyhow::Result<Vec<Capsule>>;
    /// Sets status `delivered` and `delivered_ts`, clears the failure reason
    async fn mark_delivered(&self, capsule_id: &ID, delivered_ts: i64) -> anyhow::Result<()>;
    /// Sets status `failed` and overwrites the failure reason
    async fn mark_failed(&self, capsule_id: &ID, reason: &str) -> anyhow::Result<()>;
    /// Appends the reminder marker unless it is already present
    async fn add_notification_sent(
        &self,
        capsule_id: &ID,
        timeframe: ReminderTimeframe,
    ) -> anyhow::Result<()>;
    async fn count_by_status(&self, status: CapsuleStatus) -> anyhow::Result<i64>;
    /// Counts scheduled capsules with a delivery timestamp before `now`
    async fn count_overdue(&self, now: i64) -> anyhow::Result<i64>;
}
