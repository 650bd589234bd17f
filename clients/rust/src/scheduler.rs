use crate::{APIResponse, BaseClient};
use capsule_scheduler_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

/// Triggers the scheduler sweeps. This is what the cron job calls.
#[derive(Clone)]
pub struct SchedulerClient {
    base: Arc<BaseClient>,
}

impl SchedulerClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn run_deliveries(&self) -> APIResponse<run_delivery_sweep::APIResponse> {
        self.base
            .post((), "scheduler/deliveries".into(), StatusCode::OK)
            .await
    }

    pub async fn run_retries(&self) -> APIResponse<run_retry_sweep::APIResponse> {
        self.base
            .post((), "scheduler/retries".into(), StatusCode::OK)
            .await
    }

    pub async fn run_reminders(&self) -> APIResponse<run_reminder_sweep::APIResponse> {
        self.base
            .post((), "scheduler/reminders".into(), StatusCode::OK)
            .await
    }

    pub async fn get_stats(&self) -> APIResponse<get_delivery_stats::APIResponse> {
        self.base
            .get("scheduler/stats".into(), StatusCode::OK)
            .await
    }
}
