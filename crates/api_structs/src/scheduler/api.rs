use crate::dtos::{DeliveryStatsDTO, DeliverySweepDTO, ReminderSweepDTO};
use capsule_scheduler_domain::{DeliveryStats, DeliverySweepReport, ReminderSweepReport};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySweepResponse {
    pub results: DeliverySweepDTO,
}

impl DeliverySweepResponse {
    pub fn new(report: DeliverySweepReport) -> Self {
        Self {
            results: DeliverySweepDTO::new(report),
        }
    }
}

pub mod run_delivery_sweep {
    use super::*;

    pub type APIResponse = DeliverySweepResponse;
}

pub mod run_retry_sweep {
    use super::*;

    pub type APIResponse = DeliverySweepResponse;
}

pub mod run_reminder_sweep {
    use super::*;

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub results: ReminderSweepDTO,
    }

    impl APIResponse {
        pub fn new(report: ReminderSweepReport) -> Self {
            Self {
                results: ReminderSweepDTO::new(report),
            }
        }
    }
}

pub mod get_delivery_stats {
    use super::*;

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub stats: DeliveryStatsDTO,
    }

    impl APIResponse {
        pub fn new(stats: DeliveryStats) -> Self {
            Self {
                stats: DeliveryStatsDTO::new(stats),
            }
        }
    }
}
