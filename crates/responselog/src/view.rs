use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::schema::{ResponseRecord, ResponseStatus};

/// Characters of `output_text` shown in a table cell before truncation.
pub const OUTPUT_PREVIEW_CHARS: usize = 120;

/// One point of the response-time chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: String,
    pub latency_ms: f64,
}

/// One table row, every field already rendered for display. Derived from a
/// record, never a mutation of it.
#[derive(Clone, Debug, Serialize)]
pub struct TableRow {
    pub id: String,
    pub timestamp: String,
    pub model: String,
    pub status: &'static str,
    pub prompt_tokens: String,
    pub completion_tokens: String,
    pub total_tokens: String,
    pub latency_ms: String,
    pub cost_usd: String,
    pub temperature: String,
    pub max_tokens: String,
    pub prompt_template: String,
    pub output_text: String,
    pub error: String,
}

/// Response-time series: success-status records that carry a latency value,
/// ascending by timestamp. Unparseable timestamps sort after parseable ones,
/// by their raw string.
pub fn latency_series(records: &[ResponseRecord]) -> Vec<ChartPoint> {
    let mut points: Vec<(Option<DateTime<FixedOffset>>, ChartPoint)> = records
        .iter()
        .filter(|r| r.status == ResponseStatus::Success)
        .filter_map(|r| {
            let latency_ms = r.latency_ms()?;
            Some((
                DateTime::parse_from_rfc3339(&r.timestamp).ok(),
                ChartPoint { timestamp: r.timestamp.clone(), latency_ms },
            ))
        })
        .collect();

    points.sort_by(|(a, pa), (b, pb)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => pa.timestamp.cmp(&pb.timestamp),
    });

    points.into_iter().map(|(_, p)| p).collect()
}

/// One row per record, in dataset order.
pub fn table_rows(records: &[ResponseRecord]) -> Vec<TableRow> {
    records.iter().map(table_row).collect()
}

fn table_row(r: &ResponseRecord) -> TableRow {
    TableRow {
        id: r.id.clone(),
        timestamp: r.timestamp.clone(),
        model: r.model.clone(),
        status: r.status.as_str(),
        prompt_tokens: opt_u64(r.prompt_tokens()),
        completion_tokens: opt_u64(r.completion_tokens()),
        total_tokens: opt_u64(r.total_tokens()),
        latency_ms: opt_num(r.latency_ms()),
        cost_usd: r.cost_usd().map(|c| format!("${c:.4}")).unwrap_or_else(dash),
        temperature: opt_num(r.temperature()),
        max_tokens: r.max_tokens().map(|v| v.to_string()).unwrap_or_else(dash),
        prompt_template: r.prompt_template().map(str::to_owned).unwrap_or_else(dash),
        output_text: r
            .output_text()
            .map(|t| truncate_chars(t, OUTPUT_PREVIEW_CHARS))
            .unwrap_or_else(dash),
        error: r
            .error_detail()
            .map(|e| format!("{}: {}", e.kind, e.message))
            .unwrap_or_else(dash),
    }
}

fn dash() -> String {
    "-".to_string()
}

fn opt_u64(v: Option<u64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(dash)
}

fn opt_num(v: Option<f64>) -> String {
    v.map(|n| {
        if n.fract() == 0.0 {
            format!("{n:.0}")
        } else {
            format!("{n}")
        }
    })
    .unwrap_or_else(dash)
}

// Char-boundary safe; byte slicing would panic on multibyte text.
fn truncate_chars(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }
    let mut out: String = s.chars().take(limit).collect();
    out.push_str("...");
    out
}
