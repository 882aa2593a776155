use axum::http::{header, HeaderMap, StatusCode};

/// Gate consulted by the HTTP layer before any template mutation. With no
/// token configured the gate is open; with one configured, requests must
/// present it as a bearer token.
#[derive(Clone)]
pub struct AdminGate {
    token: Option<String>,
}

impl AdminGate {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn open() -> Self {
        Self { token: None }
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        let Some(expected) = &self.token else {
            return Ok(());
        };
        let provided = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        match provided {
            Some(token) if token == expected => Ok(()),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }
}
