// Route exports
pub mod commute;

use actix_web::web;

pub use commute::{AppState, LOCATION_NOT_FOUND_MESSAGE};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(commute::configure),
    );
}
