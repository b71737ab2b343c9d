use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, instrument};

use super::dto::NutrientsDecimal;
use super::services::NutrientsError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NutrientsQuery {
    /// Return decimals instead of the ×100 fixed-point integers.
    #[serde(default)]
    pub decimal: bool,
}

pub fn nutrients_routes() -> Router<AppState> {
    Router::new().route("/nutrients/:query", get(get_nutrients))
}

#[instrument(skip(state))]
pub async fn get_nutrients(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(q): Query<NutrientsQuery>,
) -> Result<Response, (StatusCode, String)> {
    match state.get_nutrients.execute(&query).await {
        Ok(nutrients) if q.decimal => {
            let decimals: Vec<NutrientsDecimal> =
                nutrients.into_iter().map(NutrientsDecimal::from).collect();
            Ok(Json(decimals).into_response())
        }
        Ok(nutrients) => Ok(Json(nutrients).into_response()),
        Err(NutrientsError::NotFound) => {
            Err((StatusCode::NOT_FOUND, "No nutrients found".into()))
        }
        Err(e @ NutrientsError::Internal(_)) => {
            error!(error = %e, "get_nutrients failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into()))
        }
    }
}
