use axum::extract::State;
use axum::Json;

use crate::gateway::QueryTarget;
use crate::rest::AppState;

pub async fn list_presets(State(state): State<AppState>) -> Json<Vec<QueryTarget>> {
    Json(state.presets.clone())
}
