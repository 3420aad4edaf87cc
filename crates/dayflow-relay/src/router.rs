use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, state::RelayState};

/// Builds the relay router.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/authorize", get(handlers::authorize))
        .route("/callback", get(handlers::callback))
        .route("/token", post(handlers::token).put(handlers::refresh))
        .route("/userinfo", get(handlers::userinfo))
        .with_state(Arc::new(state))
}
