pub mod dto;
pub mod handlers;
pub mod providers;
pub mod services;
pub mod units;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::nutrients_routes())
}
