use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use datasel::{SampleKind, Selection};

#[derive(Clone, Debug, Deserialize)]
pub struct SelectRequest {
    pub sample: SampleKind,
}

/// Current selection state as the front-end sees it.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub selection: Selection,
    pub records: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl Snapshot {
    pub fn of(store: &datasel::DatasetStore) -> Self {
        Self {
            selection: store.selection(),
            records: store.records().len(),
            loading: store.is_loading(),
            error: store.error().map(str::to_owned),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct UploadReceipt {
    pub id: Uuid,
    pub name: String,
    pub records: usize,
    pub fingerprint_hex: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}
