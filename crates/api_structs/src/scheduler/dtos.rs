use capsule_scheduler_domain::{
    DeliveryStats, DeliverySweepReport, FailedReminder, ReminderSweepReport, ReminderTimeframe, ID,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySweepDTO {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: Vec<ID>,
}

impl DeliverySweepDTO {
    pub fn new(report: DeliverySweepReport) -> Self {
        Self {
            processed: report.processed,
            succeeded: report.succeeded,
            failed: report.failed,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailedReminderDTO {
    pub capsule_id: ID,
    pub timeframe: ReminderTimeframe,
}

impl FailedReminderDTO {
    pub fn new(failed: FailedReminder) -> Self {
        Self {
            capsule_id: failed.capsule_id,
            timeframe: failed.timeframe,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSweepDTO {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: Vec<FailedReminderDTO>,
}

impl ReminderSweepDTO {
    pub fn new(report: ReminderSweepReport) -> Self {
        Self {
            processed: report.processed,
            succeeded: report.succeeded,
            failed: report
                .failed
                .into_iter()
                .map(FailedReminderDTO::new)
                .collect(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatsDTO {
    pub scheduled: i64,
    pub delivered: i64,
    pub failed: i64,
    pub overdue: i64,
}

impl DeliveryStatsDTO {
    pub fn new(stats: DeliveryStats) -> Self {
        Self {
            scheduled: stats.scheduled,
            delivered: stats.delivered,
            failed: stats.failed,
            overdue: stats.overdue,
        }
    }
}
