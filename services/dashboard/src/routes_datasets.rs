use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use datasel::content_fingerprint;
use datasel::Fetcher;
use responselog::{validate_upload, BytesFile};

use crate::state::SharedState;
use crate::types::{ApiError, SelectRequest, Snapshot, UploadReceipt};

pub async fn get_datasets(State(state): State<SharedState>) -> Json<Snapshot> {
    let store = state.store.read().await;
    Json(Snapshot::of(&store))
}

/// Select one of the two sample datasets. The store transitions immediately;
/// the fetch runs outside the lock and its result is applied only if the
/// ticket is still current (rapid reselection: last completed, still-relevant
/// fetch wins).
pub async fn post_select(
    State(state): State<SharedState>,
    Json(req): Json<SelectRequest>,
) -> (StatusCode, Json<Snapshot>) {
    let ticket = {
        let mut store = state.store.write().await;
        store.begin_sample(req.sample)
    };

    let result = state.fetcher.fetch(req.sample).await;
    let fetch_failed = result.is_err();
    if let Err(ref e) = result {
        warn!(sample = req.sample.fixture_name(), error = %e, "fixture fetch failed");
    }

    let mut store = state.store.write().await;
    let applied = store.apply_fetch(&ticket, result);
    if applied && !fetch_failed {
        info!(
            sample = req.sample.fixture_name(),
            records = store.records().len(),
            "sample selected"
        );
    }

    let status = if applied && fetch_failed {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Json(Snapshot::of(&store)))
}

/// Upload a custom dataset: multipart with a `file` field (filename gates
/// stage 1) and an optional `name` field for the receipt. A validation
/// failure leaves the current selection untouched and surfaces the exact
/// validator message.
pub async fn post_upload(
    State(state): State<SharedState>,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<UploadReceipt>), (StatusCode, Json<ApiError>)> {
    let mut name: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<bytes::Bytes> = None;

    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiError::new(e.to_string()))))?
    {
        match field.name() {
            Some("name") => {
                name = Some(field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, Json(ApiError::new(e.to_string())))
                })?)
            }
            Some("file") => {
                file_name = field.file_name().map(str::to_owned);
                file_bytes = Some(field.bytes().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, Json(ApiError::new(e.to_string())))
                })?);
            }
            _ => {}
        }
    }

    let bytes =
        file_bytes.ok_or((StatusCode::BAD_REQUEST, Json(ApiError::new("Missing file"))))?;
    if bytes.len() > state.cfg.max_upload_bytes {
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ApiError::new(format!(
                "File too large; limit is {} bytes",
                state.cfg.max_upload_bytes
            ))),
        ));
    }

    // Stage 1 gates on the uploaded filename; a file part without one cannot
    // pass the extension check.
    let file_name = file_name.or_else(|| name.clone()).unwrap_or_default();
    let source = BytesFile::new(file_name.clone(), bytes.to_vec());

    let dataset = match validate_upload(&source).await {
        Ok(dataset) => dataset,
        Err(e) => {
            warn!(file = %file_name, error = %e, "upload rejected");
            let mut store = state.store.write().await;
            store.record_validation_failure(&e);
            return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiError::new(e.to_string()))));
        }
    };

    let receipt = UploadReceipt {
        id: Uuid::new_v4(),
        name: name.unwrap_or_else(|| file_name.clone()),
        records: dataset.len(),
        fingerprint_hex: content_fingerprint(&bytes),
        uploaded_at: Utc::now(),
    };

    let mut store = state.store.write().await;
    store.apply_upload(dataset);
    info!(file = %file_name, records = receipt.records, "custom dataset active");

    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn post_reset(State(state): State<SharedState>) -> Json<Snapshot> {
    let mut store = state.store.write().await;
    store.reset();
    info!("selection reset");
    Json(Snapshot::of(&store))
}

pub async fn post_dismiss(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let mut store = state.store.write().await;
    let dismissed = store.take_error();
    Json(serde_json::json!({ "dismissed": dismissed }))
}
