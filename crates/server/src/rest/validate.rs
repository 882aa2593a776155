use axum::Json;
use serde::{Deserialize, Serialize};

use promlint_core::{promql, validate_content, ValidationReport};

#[derive(Deserialize)]
pub struct ValidateRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    pub promql_checked: usize,
    pub promql_invalid: usize,
}

impl From<ValidationReport> for ValidateResponse {
    fn from(report: ValidationReport) -> Self {
        Self {
            valid: report.valid,
            errors: report.messages(),
            promql_checked: report.promql_checked,
            promql_invalid: report.promql_invalid,
        }
    }
}

/// Full-document validation. Always answers with a complete report; a
/// document that does not parse still produces one, never an error status.
pub async fn validate_yaml(Json(body): Json<ValidateRequest>) -> Json<ValidateResponse> {
    let report = validate_content(&body.content);
    if !report.valid {
        tracing::info!(
            defects = report.defects.len(),
            promql_invalid = report.promql_invalid,
            "document failed validation"
        );
    }
    Json(report.into())
}

#[derive(Deserialize)]
pub struct CheckExprRequest {
    pub expr: String,
}

#[derive(Serialize)]
pub struct CheckExprResponse {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Lexical check of one bare expression, outside any document.
pub async fn validate_promql(Json(body): Json<CheckExprRequest>) -> Json<CheckExprResponse> {
    let errors: Vec<String> = promql::check(&body.expr)
        .into_iter()
        .map(|d| d.message)
        .collect();
    Json(CheckExprResponse {
        valid: errors.is_empty(),
        errors,
    })
}
