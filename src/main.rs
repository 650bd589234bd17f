mod telemetry;

use capsule_scheduler_api::Application;
use capsule_scheduler_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("capsule_scheduler_server".into(), "info".into());
    init_subscriber(subscriber)?;

    let context = setup_context().await?;

    let app = Application::new(context).await?;
    app.start().await?;
    Ok(())
}
