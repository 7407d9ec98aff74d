use crate::eval::protocol::{decode_results, EvalRequest, ExpressionResult};
use anyhow::{bail, Context, Result};

/// Transport seam for the evaluation round trip. The UI hands the real HTTP
/// implementation to the worker thread; tests substitute a stub.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, request: &EvalRequest) -> Result<Vec<ExpressionResult>>;
}

pub struct HttpEvaluator {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpEvaluator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Evaluator for HttpEvaluator {
    fn evaluate(&self, request: &EvalRequest) -> Result<Vec<ExpressionResult>> {
        let body = serde_json::to_string(request)?;
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .context("sending evaluation request")?;

        let status = response.status();
        if !status.is_success() {
            bail!("evaluation service returned {status}");
        }

        let text = response.text().context("reading evaluation response")?;
        decode_results(&text)
    }
}
