//! API endpoint modules.

pub mod attachments;
pub mod cases;
pub mod health;
pub mod openapi;
pub mod plans;
pub mod result_steps;
pub mod results;
pub mod steps;
pub mod users;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

use actix_web::web;

/// Configure every versioned API route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    plans::configure_routes(cfg);
    cases::configure_routes(cfg);
    steps::configure_routes(cfg);
    results::configure_routes(cfg);
    result_steps::configure_routes(cfg);
    attachments::configure_routes(cfg);
    users::configure_routes(cfg);
}
