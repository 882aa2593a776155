use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::gateway::QueryTarget;
use crate::rest::AppState;

#[derive(Deserialize)]
pub struct LiveQueryRequest {
    pub url: String,
    pub query: String,
}

/// Forward one expression to a Prometheus instance and relay the outcome.
/// Both success and typed failure come back as 200 with a terminal result;
/// only an unusable request body is a client error.
pub async fn live_query(
    State(state): State<AppState>,
    Json(body): Json<LiveQueryRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    if body.url.trim().is_empty() || body.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"valid": false, "error": "missing url or query"})),
        );
    }

    let target = QueryTarget {
        name: "ad-hoc".into(),
        url: body.url.clone(),
    };

    match state.gateway.run(&target, &body.query).await {
        Ok(success) => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "data": {
                    "status": success.status,
                    "data": {
                        "resultType": success.result_type,
                        "result": success.result,
                    },
                },
            })),
        ),
        Err(failure) => {
            tracing::warn!(kind = ?failure.kind, url = %body.url, "live query failed");
            (
                StatusCode::OK,
                Json(json!({"valid": false, "error": failure.message})),
            )
        }
    }
}
