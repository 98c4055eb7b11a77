pub mod catalog;
pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::guidance::handlers as guidance;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalogs
        .route("/api/v1/topics", get(catalog::handle_list_topics))
        .route("/api/v1/models", get(catalog::handle_list_models))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            put(session::handle_save_profile),
        )
        .route(
            "/api/v1/sessions/:id/history/clear",
            post(session::handle_clear_history),
        )
        .route(
            "/api/v1/sessions/:id/checklists/:key/:index",
            patch(session::handle_toggle_checklist),
        )
        .route("/api/v1/sessions/:id/usage", get(session::handle_usage))
        // Guidance
        .route(
            "/api/v1/sessions/:id/guidance",
            post(guidance::handle_guidance),
        )
        .route(
            "/api/v1/sessions/:id/exchanges/:n/export",
            get(guidance::handle_export),
        )
        .with_state(state)
}
