use super::maintenance::Maintenance;
use super::session;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;

/// Mounts the hosting endpoints onto an actix app.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(session::serve))
        .route("/healthz", web::get().to(healthz))
        .route("/maintenance", web::get().to(maintenance));
}

async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

async fn maintenance(state: web::Data<Maintenance>) -> impl Responder {
    HttpResponse::Ok().json(state.status())
}
