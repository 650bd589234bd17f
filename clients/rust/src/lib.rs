mod base;
mod capsule;
mod scheduler;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use capsule::CapsuleClient;
pub use capsule::CreateCapsuleInput;
pub use capsule_scheduler_api_structs::dtos::*;
pub use capsule_scheduler_domain::{CapsuleStatus, ContentType, ReminderTimeframe, ID};
use scheduler::SchedulerClient;
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use capsule_scheduler_api_structs::dtos::CapsuleDTO as Capsule;
pub use capsule_scheduler_api_structs::dtos::DeliveryStatsDTO as DeliveryStats;

/// Capsule Scheduler SDK
///
/// The SDK contains methods for interacting with the Capsule Scheduler
/// server API.
#[derive(Clone)]
pub struct CapsuleSDK {
    pub capsule: CapsuleClient,
    pub scheduler: SchedulerClient,
    pub status: StatusClient,
}

impl CapsuleSDK {
    pub fn new<T: Into<String>>(address: String, scheduler_key: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_api_key(scheduler_key.into());
        let base = Arc::new(base);
        let capsule = CapsuleClient::new(base.clone());
        let scheduler = SchedulerClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            capsule,
            scheduler,
            status,
        }
    }
}
