use anyhow::bail;
use capsule_scheduler_domain::{Capsule, CapsuleStatus, ReminderTimeframe, ID};
use capsule_scheduler_infra::{
    CapsuleContext, DueCapsulesQuery, ICapsuleRepo, ISys, InMemoryEmailDispatcher,
    InMemorySmsDispatcher, ReminderCandidatesQuery,
};
use std::sync::Arc;

pub const MINUTE: i64 = 1000 * 60;

pub struct StaticTimeSys(pub i64);

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.0
    }
}

pub struct TestContext {
    pub ctx: CapsuleContext,
    pub email: Arc<InMemoryEmailDispatcher>,
    pub sms: Arc<InMemorySmsDispatcher>,
}

/// Inmemory context frozen at `now` with dispatchers the test keeps a handle to
pub fn setup(now: i64) -> TestContext {
    let mut ctx = CapsuleContext::create_inmemory();
    let email = Arc::new(InMemoryEmailDispatcher::new());
    let sms = Arc::new(InMemorySmsDispatcher::new());
    ctx.dispatchers.email = email.clone();
    ctx.dispatchers.sms = sms.clone();
    ctx.sys = Arc::new(StaticTimeSys(now));

    TestContext { ctx, email, sms }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreOutage {
    /// Every query and every write fails
    Everything,
    /// Queries succeed and every write fails
    Writes,
}

/// Capsule store that is down, wrapping the store that was in place so a test
/// can seed it before the outage
pub struct UnavailableCapsuleRepo {
    inner: Arc<dyn ICapsuleRepo>,
    outage: StoreOutage,
}

impl UnavailableCapsuleRepo {
    fn check(&self, outage: StoreOutage) -> anyhow::Result<()> {
        if self.outage == StoreOutage::Everything || self.outage == outage {
            bail!("Capsule store is unavailable");
        }
        Ok(())
    }

    fn check_read(&self) -> anyhow::Result<()> {
        self.check(StoreOutage::Everything)
    }

    fn check_write(&self) -> anyhow::Result<()> {
        self.check(StoreOutage::Writes)
    }
}

/// Replaces the capsule store of `ctx` with one suffering from `outage`
pub fn break_capsule_store(ctx: &mut CapsuleContext, outage: StoreOutage) {
    let inner = ctx.repos.capsules.clone();
    ctx.repos.capsules = Arc::new(UnavailableCapsuleRepo { inner, outage });
}

#[async_trait::async_trait]
impl ICapsuleRepo for UnavailableCapsuleRepo {
    async fn insert(&self, capsule: &Capsule) -> anyhow::Result<()> {
        self.check_write()?;
        self.inner.insert(capsule).await
    }

    async fn find(&self, capsule_id: &ID) -> Option<Capsule> {
        self.check_read().ok()?;
        self.inner.find(capsule_id).await
    }

    async fn find_due(&self, query: DueCapsulesQuery) -> anyhow::Result<Vec<Capsule>> {
        self.check_read()?;
        self.inner.find_due(query).await
    }

    async fn find_reminder_candidates(
        &self,
        query: ReminderCandidatesQuery,
    ) -> anyhow::Result<Vec<Capsule>> {
        self.check_read()?;
        self.inner.find_reminder_candidates(query).await
    }

    async fn mark_delivered(&self, capsule_id: &ID, delivered_ts: i64) -> anyhow::Result<()> {
        self.check_write()?;
        self.inner.mark_delivered(capsule_id, delivered_ts).await
    }

    async fn mark_failed(&self, capsule_id: &ID, reason: &str) -> anyhow::Result<()> {
        self.check_write()?;
        self.inner.mark_failed(capsule_id, reason).await
    }

    async fn add_notification_sent(
        &self,
        capsule_id: &ID,
        timeframe: ReminderTimeframe,
    ) -> anyhow::Result<()> {
        self.check_write()?;
        self.inner.add_notification_sent(capsule_id, timeframe).await
    }

    async fn count_by_status(&self, status: CapsuleStatus) -> anyhow::Result<i64> {
        self.check_read()?;
        self.inner.count_by_status(status).await
    }

    async fn count_overdue(&self, now: i64) -> anyhow::Result<i64> {
        self.check_read()?;
        self.inner.count_overdue(now).await
    }
}
