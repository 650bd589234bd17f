mod create_capsule;
mod get_capsule;

use actix_web::web;
use create_capsule::create_capsule_controller;
use get_capsule::get_capsule_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/capsules", web::post().to(create_capsule_controller));
    cfg.route(
        "/capsules/{capsule_id}",
        web::get().to(get_capsule_controller),
    );
}
