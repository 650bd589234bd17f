use super::dispatch::deliver_capsule;
use crate::{
    error::CapsuleError,
    shared::{
        auth::protect_scheduler_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use capsule_scheduler_api_structs::run_delivery_sweep::*;
use capsule_scheduler_domain::{CapsuleStatus, DeliverySweepReport};
use capsule_scheduler_infra::{CapsuleContext, DueCapsulesQuery};
use tracing::{error, info};

fn handle_error(e: UseCaseError) -> CapsuleError {
    match e {
        UseCaseError::StorageError => CapsuleError::InternalError,
    }
}

pub async fn run_delivery_sweep_controller(
    http_req: HttpRequest,
    ctx: web::Data<CapsuleContext>,
) -> Result<HttpResponse, CapsuleError> {
    protect_scheduler_route(&http_req, &ctx)?;

    let usecase = RunDeliverySweepUseCase {
        limit: ctx.config.delivery_batch_limit,
    };

    execute(usecase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::new(report)))
        .map_err(handle_error)
}

/// Delivers every scheduled `Capsule` that has unlocked
#[derive(Debug)]
pub struct RunDeliverySweepUseCase {
    pub limit: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunDeliverySweepUseCase {
    type Response = DeliverySweepReport;

    type Error = UseCaseError;

    const NAME: &'static str = "RunDeliverySweep";

    async fn execute(&mut self, ctx: &CapsuleContext) -> Result<Self::Response, Self::Error> {
        let report = sweep_due_capsules(CapsuleStatus::Scheduled, self.limit, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        info!(
            "Delivery sweep processed {} capsule(s): {} delivered, {} failed",
            report.processed,
            report.succeeded,
            report.failed.len()
        );
        Ok(report)
    }
}

/// Attempts delivery of every `Capsule` with the given `status` that has unlocked
/// and records the outcome on the `Capsule`. Shared by the delivery and the retry sweep.
pub(crate) async fn sweep_due_capsules(
    status: CapsuleStatus,
    limit: usize,
    ctx: &CapsuleContext,
) -> anyhow::Result<DeliverySweepReport> {
    let query = DueCapsulesQuery {
        status,
        due_before: ctx.sys.get_timestamp_millis(),
        limit,
    };
    let capsules = ctx.repos.capsules.find_due(query).await.map_err(|e| {
        error!("Unable to query due capsules: {:?}", e);
        e
    })?;

    let mut report = DeliverySweepReport::default();
    for capsule in capsules {
        report.processed += 1;
        match deliver_capsule(&capsule, ctx).await {
            Ok(_) => {
                let delivered_ts = ctx.sys.get_timestamp_millis();
                ctx.repos
                    .capsules
                    .mark_delivered(&capsule.id, delivered_ts)
                    .await?;
                report.succeeded += 1;
            }
            Err(e) => {
                error!("Capsule {} could not be delivered: {}", capsule.id, e);
                ctx.repos
                    .capsules
                    .mark_failed(&capsule.id, &e.to_string())
                    .await?;
                report.failed.push(capsule.id.clone());
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::{break_capsule_store, setup, StoreOutage, TestContext, MINUTE};
    use capsule_scheduler_domain::{Capsule, ContentType};

    const NOW: i64 = 1000 * 60 * 60 * 24 * 365;

    fn capsule_factory(delivery_ts: i64, emails: &[&str]) -> Capsule {
        let mut capsule = Capsule::new(ContentType::Text, delivery_ts, 0);
        capsule.recipient_emails = emails.iter().map(|e| e.to_string()).collect();
        capsule
    }

    #[actix_web::main]
    #[test]
    async fn delivers_capsule_that_unlocked_two_minutes_ago() {
        let TestContext { ctx, email, .. } = setup(NOW);
        let capsule = capsule_factory(NOW - 2 * MINUTE, &["alice@example.com"]);
        ctx.repos.capsules.insert(&capsule).await.unwrap();

        let mut usecase = RunDeliverySweepUseCase { limit: 100 };
        let report = usecase.execute(&ctx).await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.succeeded, 1);
        assert!(report.failed.is_empty());

        let capsule = ctx.repos.capsules.find(&capsule.id).await.unwrap();
        assert_eq!(capsule.status, CapsuleStatus::Delivered);
        assert_eq!(capsule.delivered_ts, Some(NOW));
        assert!(capsule.failure_reason.is_none());
        assert_eq!(
            email.sent_to("alice@example.com")[0].subject,
            "Your Memory Capsule is Ready to Open!"
        );
    }

    #[actix_web::main]
    #[test]
    async fn leaves_future_capsules_alone() {
        let TestContext { ctx, email, .. } = setup(NOW);
        let capsule = capsule_factory(NOW + MINUTE, &["alice@example.com"]);
        ctx.repos.capsules.insert(&capsule).await.unwrap();

        let mut usecase = RunDeliverySweepUseCase { limit: 100 };
        let report = usecase.execute(&ctx).await.unwrap();

        assert_eq!(report.processed, 0);
        assert!(email.sent().is_empty());
        let capsule = ctx.repos.capsules.find(&capsule.id).await.unwrap();
        assert_eq!(capsule.status, CapsuleStatus::Scheduled);
    }

    #[actix_web::main]
    #[test]
    async fn one_of_two_recipients_succeeding_delivers_the_capsule() {
        let TestContext { ctx, email, .. } = setup(NOW);
        email.fail_for("bob@example.com");
        let capsule = capsule_factory(NOW, &["alice@example.com", "bob@example.com"]);
        ctx.repos.capsules.insert(&capsule).await.unwrap();

        let mut usecase = RunDeliverySweepUseCase { limit: 100 };
        let report = usecase.execute(&ctx).await.unwrap();
        assert_eq!(report.succeeded, 1);

        let capsule = ctx.repos.capsules.find(&capsule.id).await.unwrap();
        assert_eq!(capsule.status, CapsuleStatus::Delivered);
    }

    #[actix_web::main]
    #[test]
    async fn two_failing_recipients_fail_the_capsule() {
        let TestContext { ctx, email, .. } = setup(NOW);
        email.fail_for("alice@example.com");
        email.fail_for("bob@example.com");
        let capsule = capsule_factory(NOW, &["alice@example.com", "bob@example.com"]);
        ctx.repos.capsules.insert(&capsule).await.unwrap();

        let mut usecase = RunDeliverySweepUseCase { limit: 100 };
        let report = usecase.execute(&ctx).await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, vec![capsule.id.clone()]);

        let capsule = ctx.repos.capsules.find(&capsule.id).await.unwrap();
        assert_eq!(capsule.status, CapsuleStatus::Failed);
        assert!(capsule.delivered_ts.is_none());
        assert!(capsule
            .failure_reason
            .unwrap()
            .starts_with("Failed to deliver to any recipients: "));
    }

    #[actix_web::main]
    #[test]
    async fn capsule_without_recipients_is_failed() {
        let TestContext { ctx, .. } = setup(NOW);
        let capsule = capsule_factory(NOW, &[]);
        ctx.repos.capsules.insert(&capsule).await.unwrap();

        let mut usecase = RunDeliverySweepUseCase { limit: 100 };
        let report = usecase.execute(&ctx).await.unwrap();
        assert_eq!(report.failed.len(), 1);

        let capsule = ctx.repos.capsules.find(&capsule.id).await.unwrap();
        assert_eq!(
            capsule.failure_reason.as_deref(),
            Some("No recipient email or phone number available")
        );
    }

    #[actix_web::main]
    #[test]
    async fn second_sweep_does_not_notify_again() {
        let TestContext { ctx, email, .. } = setup(NOW);
        email.fail_for("bob@example.com");
        ctx.repos
            .capsules
            .insert(&capsule_factory(NOW - MINUTE, &["alice@example.com"]))
            .await
            .unwrap();
        ctx.repos
            .capsules
            .insert(&capsule_factory(NOW - MINUTE, &["bob@example.com"]))
            .await
            .unwrap();

        let mut usecase = RunDeliverySweepUseCase { limit: 100 };
        let report = usecase.execute(&ctx).await.unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed.len(), 1);

        let report = usecase.execute(&ctx).await.unwrap();
        assert_eq!(report.processed, 0);
        assert_eq!(email.sent().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn respects_the_batch_limit() {
        let TestContext { ctx, .. } = setup(NOW);
        for _ in 0..3 {
            ctx.repos
                .capsules
                .insert(&capsule_factory(NOW, &["alice@example.com"]))
                .await
                .unwrap();
        }

        let mut usecase = RunDeliverySweepUseCase { limit: 2 };
        assert_eq!(usecase.execute(&ctx).await.unwrap().processed, 2);
        assert_eq!(usecase.execute(&ctx).await.unwrap().processed, 1);
    }

    #[actix_web::main]
    #[test]
    async fn unavailable_store_fails_the_sweep() {
        let TestContext { mut ctx, email, .. } = setup(NOW);
        ctx.repos
            .capsules
            .insert(&capsule_factory(NOW, &["alice@example.com"]))
            .await
            .unwrap();
        break_capsule_store(&mut ctx, StoreOutage::Everything);

        let mut usecase = RunDeliverySweepUseCase { limit: 100 };
        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::StorageError)));
        assert!(email.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn unrecorded_delivery_fails_the_sweep() {
        let TestContext { mut ctx, email, .. } = setup(NOW);
        ctx.repos
            .capsules
            .insert(&capsule_factory(NOW, &["alice@example.com"]))
            .await
            .unwrap();
        break_capsule_store(&mut ctx, StoreOutage::Writes);

        let mut usecase = RunDeliverySweepUseCase { limit: 100 };
        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::StorageError)));
        // The notification went out but the capsule is still scheduled
        assert_eq!(email.sent_to("alice@example.com").len(), 1);
        let query = DueCapsulesQuery {
            status: CapsuleStatus::Scheduled,
            due_before: NOW,
            limit: 10,
        };
        let still_due = ctx.repos.capsules.find_due(query).await.unwrap();
        assert_eq!(still_due.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn unrecorded_failure_fails_the_sweep() {
        let TestContext { mut ctx, .. } = setup(NOW);
        ctx.repos
            .capsules
            .insert(&capsule_factory(NOW, &[]))
            .await
            .unwrap();
        break_capsule_store(&mut ctx, StoreOutage::Writes);

        let mut usecase = RunDeliverySweepUseCase { limit: 100 };
        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::StorageError)));
    }
}
