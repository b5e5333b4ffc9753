use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    apply_intent, commit_session, create_session, delete_session, get_catalog, get_session,
    load_session, update_profile,
};

pub fn init_structure_router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/sessions", post(create_session))
        .route("/sessions/load", post(load_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/intents", post(apply_intent))
        .route("/sessions/{id}/profile", put(update_profile))
        .route("/sessions/{id}/commit", post(commit_session))
}
