pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::configurator::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_snapshot).delete(handlers::handle_end_session),
        )
        // Dimension input
        .route(
            "/api/v1/sessions/:id/dimensions",
            put(handlers::handle_commit_dimensions),
        )
        .route(
            "/api/v1/sessions/:id/dimensions/input",
            post(handlers::handle_dimension_input),
        )
        .route(
            "/api/v1/sessions/:id/dimensions/reset",
            post(handlers::handle_reset_dimensions),
        )
        // Module allocation
        .route(
            "/api/v1/sessions/:id/palette",
            get(handlers::handle_get_palette),
        )
        .route(
            "/api/v1/sessions/:id/modules",
            post(handlers::handle_place_module).delete(handlers::handle_clear_wall),
        )
        .route(
            "/api/v1/sessions/:id/modules/:module_id",
            delete(handlers::handle_remove_module),
        )
        .route(
            "/api/v1/sessions/:id/accessories",
            post(handlers::handle_place_accessory),
        )
        // Completion
        .route(
            "/api/v1/sessions/:id/completion",
            get(handlers::handle_get_completion),
        )
        .with_state(state)
}
