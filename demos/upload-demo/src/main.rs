//! Upload pipeline walkthrough
//!
//! Shows:
//! 1. Wrong extension rejected at stage 1
//! 2. Broken JSON rejected at stage 2
//! 3. Bad record cited by position at stage 3
//! 4. Valid upload becomes the active dataset
//! 5. Reset returns to empty

use datasel::DatasetStore;
use responselog::{validate_upload, BytesFile};

#[tokio::main]
async fn main() {
    println!("=== Response-log upload demo ===\n");

    let mut store = DatasetStore::new();

    // 1. Wrong extension
    println!("Step 1: upload 'responses.txt'");
    let source = BytesFile::new("responses.txt", br#"{"responses":[]}"#.to_vec());
    let err = validate_upload(&source).await.unwrap_err();
    store.record_validation_failure(&err);
    println!("   rejected: {err}");
    println!("   selection unchanged: {:?}\n", store.selection());

    // 2. Broken JSON
    println!("Step 2: upload 'responses.json' with a syntax error");
    let source = BytesFile::new("responses.json", b"{\"responses\": [".to_vec());
    let err = validate_upload(&source).await.unwrap_err();
    println!("   rejected: {err}\n");

    // 3. Bad record
    println!("Step 3: upload a document whose second record has no model");
    let doc = serde_json::json!({
        "responses": [
            { "id": "a", "timestamp": "2025-03-01T10:00:00Z", "model": "gpt-4",
              "status": "success", "latency_ms": 640.2 },
            { "id": "b", "timestamp": "2025-03-01T10:01:00Z", "status": "error" }
        ]
    });
    let source = BytesFile::new("responses.json", serde_json::to_vec(&doc).unwrap());
    let err = validate_upload(&source).await.unwrap_err();
    println!("   rejected: {err}\n");

    // 4. Valid upload
    println!("Step 4: upload a well-formed document");
    let doc = serde_json::json!({
        "responses": [
            { "id": "a", "timestamp": "2025-03-01T10:00:00Z", "model": "gpt-4",
              "status": "success", "latency_ms": 640.2, "output_text": "Hello!" },
            { "id": "b", "timestamp": "2025-03-01T10:01:00Z", "model": "claude-3",
              "status": "timeout" }
        ]
    });
    let source = BytesFile::new("responses.json", serde_json::to_vec(&doc).unwrap());
    let dataset = validate_upload(&source).await.unwrap();
    store.apply_upload(dataset);
    println!("   accepted: {} records", store.records().len());
    println!("   selection: {:?}", store.selection());
    let series = responselog::latency_series(store.records());
    println!("   chart points (success only): {}\n", series.len());

    // 5. Reset
    println!("Step 5: reset");
    store.reset();
    println!("   selection: {:?}, records: {}", store.selection(), store.records().len());
}
