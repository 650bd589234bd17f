use crate::error::CapsuleError;
use actix_web::HttpRequest;
use capsule_scheduler_infra::CapsuleContext;

pub const SCHEDULER_KEY_HEADER: &str = "capsule-scheduler-key";

/// Only the cron trigger and operators that know the scheduler secret
/// are allowed to run sweeps and read capsules
pub fn protect_scheduler_route(
    http_req: &HttpRequest,
    ctx: &CapsuleContext,
) -> Result<(), CapsuleError> {
    let key = http_req
        .headers()
        .get(SCHEDULER_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match key {
        Some(key) if key == ctx.config.scheduler_secret_code => Ok(()),
        Some(_) => Err(CapsuleError::Unauthorized(format!(
            "Invalid value provided in the `{}` header",
            SCHEDULER_KEY_HEADER
        ))),
        None => Err(CapsuleError::Unauthorized(format!(
            "Missing the `{}` header",
            SCHEDULER_KEY_HEADER
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn rejects_missing_and_wrong_keys() {
        let ctx = CapsuleContext::create_inmemory();

        let req = TestRequest::default().to_http_request();
        assert!(protect_scheduler_route(&req, &ctx).is_err());

        let req = TestRequest::default()
            .insert_header((SCHEDULER_KEY_HEADER, "not-the-secret"))
            .to_http_request();
        assert!(protect_scheduler_route(&req, &ctx).is_err());

        let req = TestRequest::default()
            .insert_header((SCHEDULER_KEY_HEADER, ctx.config.scheduler_secret_code.clone()))
            .to_http_request();
        assert!(protect_scheduler_route(&req, &ctx).is_ok());
    }
}
