use crate::{
    error::CapsuleError,
    shared::{
        auth::protect_scheduler_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use capsule_scheduler_api_structs::get_delivery_stats::*;
use capsule_scheduler_domain::{CapsuleStatus, DeliveryStats};
use capsule_scheduler_infra::CapsuleContext;
use tracing::error;

fn handle_error(e: UseCaseError) -> CapsuleError {
    match e {
        UseCaseError::StorageError => CapsuleError::InternalError,
    }
}

pub async fn get_delivery_stats_controller(
    http_req: HttpRequest,
    ctx: web::Data<CapsuleContext>,
) -> Result<HttpResponse, CapsuleError> {
    protect_scheduler_route(&http_req, &ctx)?;

    execute(GetDeliveryStatsUseCase {}, &ctx)
        .await
        .map(|stats| HttpResponse::Ok().json(APIResponse::new(stats)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetDeliveryStatsUseCase {}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetDeliveryStatsUseCase {
    type Response = DeliveryStats;

    type Error = UseCaseError;

    const NAME: &'static str = "GetDeliveryStats";

    async fn execute(&mut self, ctx: &CapsuleContext) -> Result<Self::Response, Self::Error> {
        let repo = &ctx.repos.capsules;
        let now = ctx.sys.get_timestamp_millis();

        let stats = async {
            Ok::<_, anyhow::Error>(DeliveryStats {
                scheduled: repo.count_by_status(CapsuleStatus::Scheduled).await?,
                delivered: repo.count_by_status(CapsuleStatus::Delivered).await?,
                failed: repo.count_by_status(CapsuleStatus::Failed).await?,
                overdue: repo.count_overdue(now).await?,
            })
        }
        .await;

        stats.map_err(|e| {
            error!("Unable to count capsules: {:?}", e);
            UseCaseError::StorageError
        })
    }
}
