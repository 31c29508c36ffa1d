use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one logged LLM call. Exactly these three wire strings are valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    Timeout,
}

impl ResponseStatus {
    pub const ALL: [&'static str; 3] = ["success", "error", "timeout"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Success => "success",
            ResponseStatus::Error => "error",
            ResponseStatus::Timeout => "timeout",
        }
    }

    /// Strict parse; anything outside the enum is rejected.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "success" => Some(ResponseStatus::Success),
            "error" => Some(ResponseStatus::Error),
            "timeout" => Some(ResponseStatus::Timeout),
            _ => None,
        }
    }
}

/// Optional per-response evaluation scores (each nominally 0.0..1.0, not enforced).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub relevance_score: f64,
    pub accuracy_score: f64,
    pub coherence_score: f64,
    pub helpfulness_score: f64,
}

/// Error detail attached to failed calls. Presence is NOT cross-validated
/// against `status`; well-formed data carries it when status != success.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// One logged LLM API call.
///
/// Only the four gated fields are typed; everything else the document carried
/// (tokens, latency, cost, temperature, output text, metrics, error detail)
/// rides along in `extra` exactly as uploaded, with no coercion or defaulting.
/// The lenient accessors below read from `extra` without mutating it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: String,
    pub timestamp: String,
    pub model: String,
    pub status: ResponseStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseRecord {
    fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(Value::as_u64)
    }

    fn extra_f64(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(Value::as_f64)
    }

    fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    pub fn prompt_tokens(&self) -> Option<u64> {
        self.extra_u64("prompt_tokens")
    }

    pub fn completion_tokens(&self) -> Option<u64> {
        self.extra_u64("completion_tokens")
    }

    pub fn total_tokens(&self) -> Option<u64> {
        self.extra_u64("total_tokens")
    }

    pub fn latency_ms(&self) -> Option<f64> {
        self.extra_f64("latency_ms")
    }

    pub fn cost_usd(&self) -> Option<f64> {
        self.extra_f64("cost_usd")
    }

    pub fn temperature(&self) -> Option<f64> {
        self.extra_f64("temperature")
    }

    pub fn max_tokens(&self) -> Option<i64> {
        self.extra.get("max_tokens").and_then(Value::as_i64)
    }

    pub fn prompt_template(&self) -> Option<&str> {
        self.extra_str("prompt_template")
    }

    pub fn output_text(&self) -> Option<&str> {
        self.extra_str("output_text")
    }

    pub fn eval_metrics(&self) -> Option<EvalMetrics> {
        self.extra
            .get("eval_metrics")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn error_detail(&self) -> Option<ErrorDetail> {
        self.extra
            .get("error")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Top-level dataset container. Replaced wholesale on every selection change;
/// records are never mutated after load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResponseDataset {
    pub responses: Vec<ResponseRecord>,
}

impl ResponseDataset {
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}
