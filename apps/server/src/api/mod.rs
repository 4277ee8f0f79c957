//! API endpoint modules.

pub mod games;
pub mod health;
pub mod openapi;
pub mod rounds;
pub mod turns;

pub use games::configure_routes as configure_game_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use rounds::configure_routes as configure_round_routes;
pub use turns::configure_routes as configure_turn_routes;

use actix_web::web;

/// Register every `/api/v1` route on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_game_routes)
        .configure(configure_round_routes)
        .configure(configure_turn_routes);
}
