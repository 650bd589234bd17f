use super::ICapsuleRepo;
use crate::repos::shared::{
    inmemory_repo::*,
    query_structs::{DueCapsulesQuery, ReminderCandidatesQuery},
};
use capsule_scheduler_domain::{Capsule, CapsuleStatus, ReminderTimeframe, ID};

pub struct InMemoryCapsuleRepo {
    capsules: std::sync::Mutex<Vec<Capsule>>,
}

impl InMemoryCapsuleRepo {
    pub fn new() -> Self {
        Self {
            capsules: std::sync::Mutex::new(Vec::new()),
        }
    }
}

fn not_found(capsule_id: &ID) -> anyhow::Error {
    anyhow::anyhow!("Capsule with id: {} was not found", capsule_id)
}

#[async_trait::async_trait]
impl ICapsuleRepo for InMemoryCapsuleRepo {
    async fn insert(&self, capsule: &Capsule) -> anyhow::Result<()> {
        insert(capsule, &self.capsules);
        Ok(())
    }

    async fn find(&self, capsule_id: &ID) -> Option<Capsule> {
        find(capsule_id, &self.capsules)
    }

    async fn find_due(&self, query: DueCapsulesQuery) -> anyhow::Result<Vec<Capsule>> {
        let res = find_by(
            &self.capsules,
            |c| c.status == query.status && c.is_due(query.due_before),
            query.limit,
        );
        Ok(res)
    }

    async fn find_reminder_candidates(
        &self,
        query: ReminderCandidatesQuery,
    ) -> anyhow::Result<Vec<Capsule>> {
        let res = find_by(
            &self.capsules,
            |c| c.needs_reminder(query.timeframe, query.now),
            query.limit,
        );
        Ok(res)
    }

    async fn mark_delivered(&self, capsule_id: &ID, delivered_ts: i64) -> anyhow::Result<()> {
        if update(capsule_id, &self.capsules, |c| c.mark_delivered(delivered_ts)) {
            Ok(())
        } else {
            Err(not_found(capsule_id))
        }
    }

    async fn mark_failed(&self, capsule_id: &ID, reason: &str) -> anyhow::Result<()> {
        if update(capsule_id, &self.capsules, |c| c.mark_failed(reason)) {
            Ok(())
        } else {
            Err(not_found(capsule_id))
        }
    }

    async fn add_notification_sent(
        &self,
        capsule_id: &ID,
        timeframe: ReminderTimeframe,
    ) -> anyhow::Result<()> {
        if update(capsule_id, &self.capsules, |c| {
            c.notifications_sent.insert(timeframe);
        }) {
            Ok(())
        } else {
            Err(not_found(capsule_id))
        }
    }

    async fn count_by_status(&self, status: CapsuleStatus) -> anyhow::Result<i64> {
        Ok(count_by(&self.capsules, |c| c.status == status) as i64)
    }

    async fn count_overdue(&self, now: i64) -> anyhow::Result<i64> {
        Ok(count_by(&self.capsules, |c| c.is_overdue(now)) as i64)
    }
}
