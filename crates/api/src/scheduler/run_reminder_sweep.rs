use super::dispatch::send_pre_opening_notification;
use crate::{
    error::CapsuleError,
    shared::{
        auth::protect_scheduler_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use capsule_scheduler_api_structs::run_reminder_sweep::*;
use capsule_scheduler_domain::{FailedReminder, ReminderSweepReport, ReminderTimeframe};
use capsule_scheduler_infra::{CapsuleContext, ReminderCandidatesQuery};
use tracing::{error, info};

fn handle_error(e: UseCaseError) -> CapsuleError {
    match e {
        UseCaseError::StorageError => CapsuleError::InternalError,
    }
}

pub async fn run_reminder_sweep_controller(
    http_req: HttpRequest,
    ctx: web::Data<CapsuleContext>,
) -> Result<HttpResponse, CapsuleError> {
    protect_scheduler_route(&http_req, &ctx)?;

    let usecase = RunReminderSweepUseCase {
        limit: ctx.config.reminder_batch_limit,
    };

    execute(usecase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::new(report)))
        .map_err(handle_error)
}

/// Sends the pre-opening reminders that are due.
///
/// The timeframes are handled from the farthest to the closest and the store is
/// queried again for every timeframe, so a capsule that just got its `1hour`
/// reminder can get its `30min` reminder within the same sweep when it
/// unlocks that soon.
#[derive(Debug)]
pub struct RunReminderSweepUseCase {
    /// Max capsules per timeframe
    pub limit: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunReminderSweepUseCase {
    type Response = ReminderSweepReport;

    type Error = UseCaseError;

    const NAME: &'static str = "RunReminderSweep";

    async fn execute(&mut self, ctx: &CapsuleContext) -> Result<Self::Response, Self::Error> {
        let mut report = ReminderSweepReport::default();

        for timeframe in ReminderTimeframe::ALL {
            self.send_reminders(timeframe, &mut report, ctx)
                .await
                .map_err(|e| {
                    error!("Reminder sweep aborted at {}: {:?}", timeframe, e);
                    UseCaseError::StorageError
                })?;
        }

        info!(
            "Reminder sweep processed {} reminder(s): {} sent, {} failed",
            report.processed,
            report.succeeded,
            report.failed.len()
        );
        Ok(report)
    }
}

impl RunReminderSweepUseCase {
    async fn send_reminders(
        &self,
        timeframe: ReminderTimeframe,
        report: &mut ReminderSweepReport,
        ctx: &CapsuleContext,
    ) -> anyhow::Result<()> {
        let query = ReminderCandidatesQuery {
            timeframe,
            now: ctx.sys.get_timestamp_millis(),
            limit: self.limit,
        };
        let capsules = ctx.repos.capsules.find_reminder_candidates(query).await?;

        for capsule in capsules {
            report.processed += 1;
            match send_pre_opening_notification(&capsule, timeframe, ctx).await {
                Ok(_) => {
                    ctx.repos
                        .capsules
                        .add_notification_sent(&capsule.id, timeframe)
                        .await?;
                    report.succeeded += 1;
                }
                Err(e) => {
                    error!(
                        "Capsule {} did not get the {} reminder: {}",
                        capsule.id, timeframe, e
                    );
                    report.failed.push(FailedReminder {
                        capsule_id: capsule.id.clone(),
                        timeframe,
                    });
                }
            }
        }

        Ok(())
    }
}
