use std::time::Duration;

use anyhow::{Context, Result};

use crate::output::{print_json, print_success, OutputMode};

const HUMAN_SAMPLE_LIMIT: usize = 5;

#[derive(clap::Args)]
pub struct QueryArgs {
    #[arg(long, help = "Prometheus base URL")]
    url: String,
    #[arg(help = "PromQL expression to run")]
    expr: String,
    #[arg(long, default_value_t = 10, help = "Request timeout in seconds")]
    timeout_secs: u64,
}

pub async fn execute(args: QueryArgs, mode: OutputMode) -> Result<()> {
    let endpoint = format!("{}/api/v1/query", args.url.trim_end_matches('/'));

    let client = reqwest::Client::new();
    let resp = client
        .get(&endpoint)
        .query(&[("query", args.expr.as_str())])
        .timeout(Duration::from_secs(args.timeout_secs))
        .send()
        .await
        .with_context(|| format!("querying {endpoint}"))?;
    if !resp.status().is_success() {
        anyhow::bail!("HTTP {}", resp.status());
    }
    let body: serde_json::Value = resp
        .json()
        .await
        .context("decoding Prometheus response")?;

    match mode {
        OutputMode::Json => print_json(&body)?,
        OutputMode::Human => {
            let result_type = body["data"]["resultType"].as_str().unwrap_or("unknown");
            print_success(&format!("query ok (result type: {result_type})"));
            if let Some(samples) = body["data"]["result"].as_array() {
                for sample in samples.iter().take(HUMAN_SAMPLE_LIMIT) {
                    println!("  {sample}");
                }
                if samples.len() > HUMAN_SAMPLE_LIMIT {
                    println!("  ... {} more", samples.len() - HUMAN_SAMPLE_LIMIT);
                }
            }
        }
    }

    Ok(())
}
