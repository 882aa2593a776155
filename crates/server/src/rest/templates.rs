use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use promlint_core::validate_content;

use crate::rest::AppState;
use crate::store::TemplateRecord;

type Rejection = (StatusCode, Json<serde_json::Value>);

#[derive(Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

pub async fn list_templates(State(state): State<AppState>) -> Json<Vec<TemplateRecord>> {
    Json(state.templates.list())
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> Result<Json<TemplateRecord>, StatusCode> {
    state
        .templates
        .get(&template_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn create_template(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateRecord>), Rejection> {
    gate(&state, &headers)?;

    if body.name.trim().is_empty() {
        return Err(error_body(StatusCode::BAD_REQUEST, "name is required"));
    }
    if body.content.is_empty() {
        return Err(error_body(StatusCode::BAD_REQUEST, "content is required"));
    }
    check_content(&body.content)?;

    let now = now_ms();
    let record = TemplateRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name,
        description: body.description,
        content: body.content,
        created_at_ms: now,
        updated_at_ms: now,
    };
    state.templates.insert(record.clone());
    tracing::info!(id = %record.id, name = %record.name, "template created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateRecord>, Rejection> {
    gate(&state, &headers)?;

    let existing = state
        .templates
        .get(&template_id)
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "not found"))?;

    if let Some(ref content) = body.content {
        check_content(content)?;
    }

    let updated = TemplateRecord {
        id: existing.id.clone(),
        name: body.name.unwrap_or(existing.name),
        description: body.description.unwrap_or(existing.description),
        content: body.content.unwrap_or(existing.content),
        created_at_ms: existing.created_at_ms,
        updated_at_ms: now_ms(),
    };
    state.templates.update(updated.clone());
    Ok(Json(updated))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    state.admin.authorize(&headers)?;
    if state.templates.delete(&template_id) {
        tracing::info!(id = %template_id, "template deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

fn gate(state: &AppState, headers: &HeaderMap) -> Result<(), Rejection> {
    state
        .admin
        .authorize(headers)
        .map_err(|status| error_body(status, "admin authorization required"))
}

/// A template only enters the store once its document passes the engine;
/// the rejection carries the full report so the editor can show it.
fn check_content(content: &str) -> Result<(), Rejection> {
    let report = validate_content(content);
    if report.valid {
        Ok(())
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "valid": false,
                "errors": report.messages(),
                "promql_checked": report.promql_checked,
                "promql_invalid": report.promql_invalid,
            })),
        ))
    }
}

fn error_body(status: StatusCode, message: &str) -> Rejection {
    (status, Json(json!({"error": message})))
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
