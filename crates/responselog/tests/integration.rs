use responselog::{validate_upload, BytesFile, ValidateError};

async fn run(name: &str, content: &str) -> Result<responselog::ResponseDataset, ValidateError> {
    let source = BytesFile::new(name, content.as_bytes().to_vec());
    validate_upload(&source).await
}

#[tokio::test]
async fn non_json_names_fail_regardless_of_content() {
    for name in ["log.txt", "log.jsonl", "log", "log.JSON", "log.Json"] {
        let err = run(name, r#"{"responses":[]}"#).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid file type. Please upload a .json file.");
    }
}

#[tokio::test]
async fn unparseable_content_fails_with_syntax_message() {
    for content in ["{not json", "", "{\"responses\": [", "{'responses': []}"] {
        let err = run("log.json", content).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON format. File contains syntax errors.");
    }
}

#[tokio::test]
async fn valid_json_without_responses_fails_schema() {
    let err = run("log.json", r#"{"items": []}"#).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid schema. Missing \"responses\" array.");

    // wrong top-level shape
    for content in ["[]", "42", "null", r#""hello""#, r#"{"responses": {}}"#] {
        let err = run("log.json", content).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid schema. Expected object with \"responses\" array."
        );
    }
}

#[tokio::test]
async fn first_bad_element_is_cited_with_position_and_field() {
    let good = r#"{"id":"a","timestamp":"2025-01-01T00:00:00Z","model":"gpt-4","status":"success"}"#;

    // element 3 omits "id"
    let doc = format!(
        r#"{{"responses":[{good},{good},{{"timestamp":"t","model":"m","status":"success"}}]}}"#
    );
    let err = run("log.json", &doc).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid schema. Response 3 missing \"id\" field.");

    // fields are checked in order: id, timestamp, model, status
    let cases = [
        (r#"{"timestamp":"t","model":"m","status":"success"}"#, "id"),
        (r#"{"id":"a","model":"m","status":"success"}"#, "timestamp"),
        (r#"{"id":"a","timestamp":"t","status":"success"}"#, "model"),
        (r#"{"id":"a","timestamp":"t","model":"m"}"#, "status"),
    ];
    for (element, field) in cases {
        let doc = format!(r#"{{"responses":[{element}]}}"#);
        let err = run("log.json", &doc).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Invalid schema. Response 1 missing \"{field}\" field.")
        );
    }
}

#[tokio::test]
async fn empty_or_mistyped_fields_are_invalid_not_missing() {
    let cases = [
        (r#"{"id":"","timestamp":"t","model":"m","status":"success"}"#, "id"),
        (r#"{"id":7,"timestamp":"t","model":"m","status":"success"}"#, "id"),
        (r#"{"id":"a","timestamp":"t","model":"m","status":"crashed"}"#, "status"),
        (r#"{"id":"a","timestamp":"t","model":"m","status":null}"#, "status"),
    ];
    for (element, field) in cases {
        let doc = format!(r#"{{"responses":[{element}]}}"#);
        let err = run("log.json", &doc).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Invalid schema. Response 1 invalid \"{field}\" field.")
        );
    }
}

#[tokio::test]
async fn valid_document_passes_through_unaltered() {
    let doc = r#"{"responses":[
        {"id":"a","timestamp":"2025-01-01T00:00:00Z","model":"gpt-4","status":"success",
         "prompt_tokens":10,"completion_tokens":20,"total_tokens":30,
         "latency_ms":812.3,"cost_usd":0.0042,"temperature":0.7,"max_tokens":1024,
         "prompt_template":"qa-v2","output_text":"hello",
         "eval_metrics":{"relevance_score":0.9,"accuracy_score":0.8,
                         "coherence_score":0.95,"helpfulness_score":0.85}},
        {"id":"b","timestamp":"2025-01-01T00:01:00Z","model":"claude-3","status":"error",
         "error":{"type":"rate_limit","message":"429"}},
        {"id":"c","timestamp":"2025-01-01T00:02:00Z","model":"some-unknown-model",
         "status":"timeout"}
    ]}"#;

    let dataset = run("log.json", doc).await.unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.responses[0].id, "a");
    assert_eq!(dataset.responses[0].prompt_tokens(), Some(10));
    assert_eq!(dataset.responses[0].eval_metrics().unwrap().relevance_score, 0.9);
    assert_eq!(dataset.responses[1].error_detail().unwrap().message, "429");
    // unknown model names are permitted
    assert_eq!(dataset.responses[2].model, "some-unknown-model");

    // no coercion: round-tripping yields the input value
    let reparsed: serde_json::Value = serde_json::from_str(doc).unwrap();
    assert_eq!(serde_json::to_value(&dataset).unwrap(), reparsed);
}

#[tokio::test]
async fn single_record_scenario_succeeds() {
    let doc = r#"{"responses":[{"id":"a","timestamp":"2025-01-01T00:00:00Z","model":"gpt-4","status":"success"}]}"#;
    let dataset = run("upload.json", doc).await.unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.responses[0].id, "a");
}

#[tokio::test]
async fn single_record_missing_id_scenario_fails() {
    let doc = r#"{"responses":[{"timestamp":"t","model":"m","status":"success"}]}"#;
    let err = run("upload.json", doc).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid schema. Response 1 missing \"id\" field.");
}

#[tokio::test]
async fn empty_responses_array_is_valid() {
    let dataset = run("empty.json", r#"{"responses":[]}"#).await.unwrap();
    assert!(dataset.is_empty());
}
