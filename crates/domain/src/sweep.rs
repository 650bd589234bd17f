use crate::{reminder::ReminderTimeframe, shared::entity::ID};

/// The outcome of one scheduler sweep over a batch of `Capsule`s
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport<F> {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: Vec<F>,
}

impl<F> Default for SweepReport<F> {
    fn default() -> Self {
        Self {
            processed: 0,
            succeeded: 0,
            failed: Vec::new(),
        }
    }
}

/// Delivery and retry sweeps report the failed `Capsule`s
pub type DeliverySweepReport = SweepReport<ID>;

/// Reminder sweeps report failures per (`Capsule`, `ReminderTimeframe`)
pub type ReminderSweepReport = SweepReport<FailedReminder>;

#[derive(Debug, Clone, PartialEq)]
pub struct FailedReminder {
    pub capsule_id: ID,
    pub timeframe: ReminderTimeframe,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub scheduled: i64,
    pub delivered: i64,
    pub failed: i64,
    /// Scheduled capsules with a delivery date in the past
    pub overdue: i64,
}
