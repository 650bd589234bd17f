use capsule_scheduler_api::Application;
use capsule_scheduler_infra::{CapsuleContext, Config, InMemoryEmailDispatcher, InMemorySmsDispatcher};
use capsule_scheduler_sdk::CapsuleSDK;
use std::sync::Arc;

pub struct TestApp {
    pub config: Config,
    pub email: Arc<InMemoryEmailDispatcher>,
    pub sms: Arc<InMemorySmsDispatcher>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, CapsuleSDK, String) {
    let mut ctx = CapsuleContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.sweep_interval_secs = None;
    let email = Arc::new(InMemoryEmailDispatcher::new());
    let sms = Arc::new(InMemorySmsDispatcher::new());
    ctx.dispatchers.email = email.clone();
    ctx.dispatchers.sms = sms.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { config, email, sms };
    let sdk = CapsuleSDK::new(address.clone(), app.config.scheduler_secret_code.clone());
    (app, sdk, address)
}
