use crate::{
    error::CapsuleError,
    shared::{
        auth::protect_scheduler_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use capsule_scheduler_api_structs::get_capsule::*;
use capsule_scheduler_domain::{Capsule, ID};
use capsule_scheduler_infra::CapsuleContext;

fn handle_error(e: UseCaseError) -> CapsuleError {
    match e {
        UseCaseError::NotFound(capsule_id) => CapsuleError::NotFound(format!(
            "The capsule with id: {}, was not found.",
            capsule_id
        )),
    }
}

pub async fn get_capsule_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<CapsuleContext>,
) -> Result<HttpResponse, CapsuleError> {
    protect_scheduler_route(&http_req, &ctx)?;

    let usecase = GetCapsuleUseCase {
        capsule_id: path_params.capsule_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|capsule| HttpResponse::Ok().json(APIResponse::new(capsule)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetCapsuleUseCase {
    pub capsule_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetCapsuleUseCase {
    type Response = Capsule;

    type Error = UseCaseError;

    const NAME: &'static str = "GetCapsule";

    async fn execute(&mut self, ctx: &CapsuleContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .capsules
            .find(&self.capsule_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.capsule_id.clone()))
    }
}
