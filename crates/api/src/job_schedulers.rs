use crate::{
    scheduler::{
        run_delivery_sweep::RunDeliverySweepUseCase, run_reminder_sweep::RunReminderSweepUseCase,
        run_retry_sweep::RunRetrySweepUseCase,
    },
    shared::usecase::execute,
};
use actix_web::rt::time::{interval, sleep_until, Instant};
use capsule_scheduler_infra::CapsuleContext;
use std::time::Duration;
use tracing::info;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Runs every sweep on a fixed interval, starting at the next whole minute.
/// Used when no external cron job triggers the sweeps.
pub fn start_sweep_job_scheduler(ctx: CapsuleContext, interval_secs: u64) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);
        info!(
            "Sweeps will run every {} seconds, starting in {} seconds",
            interval_secs, secs_to_next_run
        );

        sleep_until(start).await;
        let mut sweep_interval = interval(Duration::from_secs(interval_secs.max(1)));
        loop {
            sweep_interval.tick().await;
            run_sweeps(&ctx).await;
        }
    });
}

/// Reminders go first so that a capsule unlocking right now is not
/// reminded after it has been delivered
async fn run_sweeps(ctx: &CapsuleContext) {
    let reminders = RunReminderSweepUseCase {
        limit: ctx.config.reminder_batch_limit,
    };
    let _ = execute(reminders, ctx).await;

    let deliveries = RunDeliverySweepUseCase {
        limit: ctx.config.delivery_batch_limit,
    };
    let _ = execute(deliveries, ctx).await;

    let retries = RunRetrySweepUseCase {
        limit: ctx.config.retry_batch_limit,
    };
    let _ = execute(retries, ctx).await;
}
