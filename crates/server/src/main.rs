use promlint_server::auth::AdminGate;
use promlint_server::config::ServerConfig;
use promlint_server::gateway::QueryGateway;
use promlint_server::rest::{self, AppState};
use promlint_server::store::TemplateStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        presets = config.presets.len(),
        gated = config.admin_token.is_some(),
        "configuration loaded"
    );

    let state = AppState {
        templates: TemplateStore::new(),
        gateway: QueryGateway::new(config.query_timeout),
        presets: config.presets.clone(),
        admin: AdminGate::new(config.admin_token.clone()),
    };
    let app = rest::router(state);
    let rest_addr = config.rest_addr;

    tracing::info!(%rest_addr, "REST server starting");
    let listener = tokio::net::TcpListener::bind(rest_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
