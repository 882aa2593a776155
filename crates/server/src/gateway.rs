use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

const BODY_SNIPPET_LEN: usize = 200;

/// A Prometheus endpoint to query: a configured preset or an ad-hoc URL
/// typed by the operator. Ad-hoc targets are vetted per call and never
/// stored anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTarget {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuerySuccess {
    pub status: String,
    pub result_type: String,
    /// The upstream result exactly as received; the gateway never
    /// truncates, re-orders or reinterprets samples. Display trimming is
    /// the caller's business.
    pub result: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    InvalidTarget,
    Network,
    Timeout,
    Upstream,
    MalformedResponse,
}

#[derive(Debug, Clone)]
pub struct QueryFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl std::fmt::Display for QueryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for QueryFailure {}

/// Expected Prometheus instant-query envelope. Anything a 2xx body fails to
/// provide here counts as a malformed response.
#[derive(Deserialize)]
struct Envelope {
    status: String,
    data: EnvelopeData,
}

#[derive(Deserialize)]
struct EnvelopeData {
    #[serde(rename = "resultType")]
    result_type: String,
    result: serde_json::Value,
}

/// One bounded instant query per call against a vetted target. No retries,
/// no caching, no state shared between calls; dropping the returned future
/// aborts the outbound request.
#[derive(Clone)]
pub struct QueryGateway {
    client: Client,
    timeout: Duration,
}

impl QueryGateway {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    pub async fn run(
        &self,
        target: &QueryTarget,
        expr: &str,
    ) -> Result<QuerySuccess, QueryFailure> {
        let base = vet_target_url(&target.url)?;
        let endpoint = format!("{}/api/v1/query", base.trim_end_matches('/'));

        let resp = self
            .client
            .get(&endpoint)
            .query(&[("query", expr)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_failure(&e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(QueryFailure {
                kind: FailureKind::Upstream,
                message: format!("upstream returned {status}: {}", snippet(&body)),
            });
        }

        let body = resp.text().await.map_err(|e| transport_failure(&e))?;
        let envelope: Envelope = serde_json::from_str(&body).map_err(|_| QueryFailure {
            kind: FailureKind::MalformedResponse,
            message: "upstream response is not a Prometheus query envelope".into(),
        })?;

        Ok(QuerySuccess {
            status: envelope.status,
            result_type: envelope.data.result_type,
            result: envelope.data.result,
        })
    }
}

/// The URL may be operator-typed, so this is the safety boundary: only
/// http/https with a real host ever reaches the network.
fn vet_target_url(raw: &str) -> Result<String, QueryFailure> {
    let invalid = |message: String| QueryFailure {
        kind: FailureKind::InvalidTarget,
        message,
    };
    let url =
        Url::parse(raw.trim()).map_err(|_| invalid(format!("'{raw}' is not a valid URL")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!(
            "unsupported URL scheme '{}' (http or https required)",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("target URL has no host".into()));
    }
    Ok(url.as_str().to_string())
}

fn transport_failure(e: &reqwest::Error) -> QueryFailure {
    if e.is_timeout() {
        QueryFailure {
            kind: FailureKind::Timeout,
            message: "query timed out".into(),
        }
    } else {
        QueryFailure {
            kind: FailureKind::Network,
            message: format!("network error: {e}"),
        }
    }
}

fn snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        body.to_string()
    } else {
        let mut end = BODY_SNIPPET_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}
