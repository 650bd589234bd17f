use super::run_delivery_sweep::sweep_due_capsules;
use crate::{
    error::CapsuleError,
    shared::{
        auth::protect_scheduler_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use capsule_scheduler_api_structs::run_retry_sweep::*;
use capsule_scheduler_domain::{CapsuleStatus, DeliverySweepReport};
use capsule_scheduler_infra::CapsuleContext;
use tracing::info;

fn handle_error(e: UseCaseError) -> CapsuleError {
    match e {
        UseCaseError::StorageError => CapsuleError::InternalError,
    }
}

pub async fn run_retry_sweep_controller(
    http_req: HttpRequest,
    ctx: web::Data<CapsuleContext>,
) -> Result<HttpResponse, CapsuleError> {
    protect_scheduler_route(&http_req, &ctx)?;

    let usecase = RunRetrySweepUseCase {
        limit: ctx.config.retry_batch_limit,
    };

    execute(usecase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::new(report)))
        .map_err(handle_error)
}

/// Attempts delivery again for every failed `Capsule`.
///
/// Only capsules that reached no recipient at all end up as failed,
/// so a retry never notifies a recipient twice.
#[derive(Debug)]
pub struct RunRetrySweepUseCase {
    pub limit: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunRetrySweepUseCase {
    type Response = DeliverySweepReport;

    type Error = UseCaseError;

    const NAME: &'static str = "RunRetrySweep";

    async fn execute(&mut self, ctx: &CapsuleContext) -> Result<Self::Response, Self::Error> {
        let report = sweep_due_capsules(CapsuleStatus::Failed, self.limit, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        info!(
            "Retry sweep processed {} capsule(s): {} delivered, {} still failing",
            report.processed,
            report.succeeded,
            report.failed.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::{break_capsule_store, setup, StoreOutage, TestContext, MINUTE};
    use capsule_scheduler_domain::{Capsule, ContentType};

    const NOW: i64 = 1000 * 60 * 60 * 24 * 365;

    fn capsule_factory(status: CapsuleStatus, email: &str) -> Capsule {
        let mut capsule = Capsule::new(ContentType::Voice, NOW - 10 * MINUTE, 0);
        capsule.creator_email = Some(email.into());
        match status {
            CapsuleStatus::Failed => capsule.mark_failed("Failed to deliver to any recipients: "),
            CapsuleStatus::Delivered => capsule.mark_delivered(NOW - 5 * MINUTE),
            CapsuleStatus::Scheduled => (),
        }
        capsule
    }

    #[actix_web::main]
    #[test]
    async fn retries_failed_capsules_only() {
        let TestContext { ctx, email, .. } = setup(NOW);
        let failed = capsule_factory(CapsuleStatus::Failed, "failed@example.com");
        let scheduled = capsule_factory(CapsuleStatus::Scheduled, "scheduled@example.com");
        let delivered = capsule_factory(CapsuleStatus::Delivered, "delivered@example.com");
        for capsule in [&failed, &scheduled, &delivered] {
            ctx.repos.capsules.insert(capsule).await.unwrap();
        }

        let mut usecase = RunRetrySweepUseCase { limit: 50 };
        let report = usecase.execute(&ctx).await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.succeeded, 1);

        let retried = ctx.repos.capsules.find(&failed.id).await.unwrap();
        assert_eq!(retried.status, CapsuleStatus::Delivered);
        assert_eq!(retried.delivered_ts, Some(NOW));
        assert!(retried.failure_reason.is_none());

        assert_eq!(
            ctx.repos.capsules.find(&scheduled.id).await.unwrap(),
            scheduled
        );
        assert_eq!(
            ctx.repos.capsules.find(&delivered.id).await.unwrap(),
            delivered
        );
        assert_eq!(email.sent().len(), 1);
        assert_eq!(email.sent_to("failed@example.com").len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn renewed_failure_overwrites_the_reason() {
        let TestContext { ctx, email, .. } = setup(NOW);
        email.fail_for("failed@example.com");
        let failed = capsule_factory(CapsuleStatus::Failed, "failed@example.com");
        ctx.repos.capsules.insert(&failed).await.unwrap();

        let mut usecase = RunRetrySweepUseCase { limit: 50 };
        let report = usecase.execute(&ctx).await.unwrap();
        assert_eq!(report.failed, vec![failed.id.clone()]);

        let capsule = ctx.repos.capsules.find(&failed.id).await.unwrap();
        assert_eq!(capsule.status, CapsuleStatus::Failed);
        assert_eq!(
            capsule.failure_reason.as_deref(),
            Some("Failed to deliver to any recipients: Email to failed@example.com: Mailbox unavailable: failed@example.com")
        );
    }

    #[actix_web::main]
    #[test]
    async fn unavailable_store_fails_the_retry() {
        let TestContext { ctx, .. } = setup(NOW);
        let failed = capsule_factory(CapsuleStatus::Failed, "failed@example.com");
        ctx.repos.capsules.insert(&failed).await.unwrap();

        for outage in [StoreOutage::Everything, StoreOutage::Writes] {
            let mut broken = ctx.clone();
            break_capsule_store(&mut broken, outage);
            let mut usecase = RunRetrySweepUseCase { limit: 50 };
            let res = usecase.execute(&broken).await;
            assert!(matches!(res, Err(UseCaseError::StorageError)));
        }

        let capsule = ctx.repos.capsules.find(&failed.id).await.unwrap();
        assert_eq!(capsule.status, CapsuleStatus::Failed);
    }
}
