mod dispatch;
mod get_delivery_stats;
pub mod run_delivery_sweep;
pub mod run_reminder_sweep;
pub mod run_retry_sweep;

use actix_web::web;
use get_delivery_stats::get_delivery_stats_controller;
use run_delivery_sweep::run_delivery_sweep_controller;
use run_reminder_sweep::run_reminder_sweep_controller;
use run_retry_sweep::run_retry_sweep_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/scheduler/deliveries",
        web::post().to(run_delivery_sweep_controller),
    );
    cfg.route(
        "/scheduler/retries",
        web::post().to(run_retry_sweep_controller),
    );
    cfg.route(
        "/scheduler/reminders",
        web::post().to(run_reminder_sweep_controller),
    );
    cfg.route(
        "/scheduler/stats",
        web::get().to(get_delivery_stats_controller),
    );
}
