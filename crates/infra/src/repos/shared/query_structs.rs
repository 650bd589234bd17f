use capsule_scheduler_domain::{CapsuleStatus, ReminderTimeframe};

/// Finds `Capsule`s with the given status that unlocked at or before `due_before`
#[derive(Debug, Clone)]
pub struct DueCapsulesQuery {
    pub status: CapsuleStatus,
    pub due_before: i64,
    pub limit: usize,
}

/// Finds scheduled `Capsule`s that unlock within `timeframe` from `now`,
/// that have not received the `timeframe` reminder and that have
/// received the reminder of the previous timeframe
#[derive(Debug, Clone)]
pub struct ReminderCandidatesQuery {
    pub timeframe: ReminderTimeframe,
    pub now: i64,
    pub limit: usize,
}

impl ReminderCandidatesQuery {
    pub fn window_end(&self) -> i64 {
        self.now + self.timeframe.millis_before_delivery()
    }
}
