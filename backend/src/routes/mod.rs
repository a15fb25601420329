pub mod health;
pub mod single_player;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/single_player", single_player::routes())
}
