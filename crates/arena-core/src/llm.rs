use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Config for one Ollama-style `POST /api/generate` endpoint.
///
/// Each side of the match gets its own endpoint so the two agents can run
/// different models (or entirely different hosts).
#[derive(Debug, Clone)]
pub struct LlmEndpoint {
    /// Full endpoint URL, e.g. `http://127.0.0.1:11434/api/generate`.
    pub endpoint: String,
    pub model: String,
    /// Per-request deadline. Elapsing counts as a transport failure and
    /// feeds the fallback path; it never aborts the match.
    pub request_timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Sends a prompt to a generate endpoint and returns the raw response text.
pub async fn query_generate(
    client: &Client,
    prompt: &str,
    cfg: &LlmEndpoint,
) -> anyhow::Result<String> {
    let request = GenerateRequest {
        model: cfg.model.clone(),
        prompt: prompt.to_string(),
        stream: false,
    };

    let res = client
        .post(&cfg.endpoint)
        .timeout(cfg.request_timeout)
        .json(&request)
        .send()
        .await
        .context("generate request failed")?
        .error_for_status()
        .context("generate non-2xx response")?
        .json::<GenerateResponse>()
        .await
        .context("generate response decode failed")?;

    Ok(res.response)
}
