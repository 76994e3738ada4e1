use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/static/hub.css", get(handlers::styles))
        .route("/users/:uid", get(handlers::dashboard))
        .route("/api/password/check", post(handlers::check_password))
        .route("/api/users", post(handlers::create_user))
        .route(
            "/api/users/:uid",
            get(handlers::get_user).patch(handlers::patch_user),
        )
        .route("/api/users/:uid/data", delete(handlers::reset_user))
        .route("/api/users/:uid/challenges", post(handlers::add_challenge))
        .route(
            "/api/users/:uid/challenges/:id",
            delete(handlers::delete_challenge),
        )
        .route(
            "/api/users/:uid/challenges/:id/complete",
            post(handlers::complete_challenge),
        )
        .route(
            "/api/users/:uid/challenges/:id/log",
            put(handlers::edit_log).delete(handlers::delete_log),
        )
        .route(
            "/api/users/:uid/challenges/:id/duration",
            put(handlers::update_duration),
        )
        .route("/api/users/:uid/reflections", put(handlers::put_reflection))
        .route(
            "/api/users/:uid/history/reflections",
            get(handlers::reflection_history),
        )
        .route(
            "/api/users/:uid/history/challenges/:id",
            get(handlers::challenge_history),
        )
        .route("/api/users/:uid/analytics", get(handlers::get_analytics))
        .route(
            "/api/users/:uid/analytics/export",
            get(handlers::export_analytics),
        )
        .route(
            "/api/users/:uid/streak-goals",
            get(handlers::list_goals).post(handlers::add_goal),
        )
        .with_state(state)
}
