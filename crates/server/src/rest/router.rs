use axum::routing::{get, post};
use axum::Router;

use crate::auth::AdminGate;
use crate::gateway::{QueryGateway, QueryTarget};
use crate::store::TemplateStore;

use super::{health, presets, query, templates, validate};

#[derive(Clone)]
pub struct AppState {
    pub templates: TemplateStore,
    pub gateway: QueryGateway,
    pub presets: Vec<QueryTarget>,
    pub admin: AdminGate,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/api/validate", post(validate::validate_yaml))
        .route("/api/validate/promql", post(validate::validate_promql))
        .route("/api/query", post(query::live_query))
        .route("/api/presets", get(presets::list_presets))
        .route(
            "/api/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/templates/{template_id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .with_state(state)
}
