use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::schema::{ResponseDataset, ResponseStatus};

/// Upload validation failure. Every failure path is a value; the `Display`
/// strings are the exact user-facing notification texts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidateError {
    #[error("Invalid file type. Please upload a .json file.")]
    FileType,

    #[error("Invalid JSON format. File contains syntax errors.")]
    Syntax,

    #[error("Invalid schema. Expected object with \"responses\" array.")]
    NotResponsesObject,

    #[error("Invalid schema. Missing \"responses\" array.")]
    MissingResponses,

    #[error("Invalid schema. Response {position} missing \"{field}\" field.")]
    MissingField { position: usize, field: &'static str },

    #[error("Invalid schema. Response {position} invalid \"{field}\" field.")]
    InvalidField { position: usize, field: &'static str },
}

/// A candidate upload: a filename plus the ability to read its full text.
/// The read suspends; a read error is reported as a stage-2 syntax failure.
#[async_trait]
pub trait FileSource: Send + Sync {
    fn name(&self) -> &str;
    async fn read_text(&self) -> std::io::Result<String>;
}

/// In-memory upload, as delivered by a multipart body or a drag-drop buffer.
pub struct BytesFile {
    name: String,
    bytes: Vec<u8>,
}

impl BytesFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }
}

#[async_trait]
impl FileSource for BytesFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_text(&self) -> std::io::Result<String> {
        String::from_utf8(self.bytes.clone())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Stage 1: the filename must end with `.json`, case-sensitive.
pub fn check_extension(name: &str) -> Result<(), ValidateError> {
    if name.ends_with(".json") {
        Ok(())
    } else {
        Err(ValidateError::FileType)
    }
}

/// Stages 2 and 3: parse the text as JSON, then gate the shape.
///
/// The schema gate is intentionally shallow: per element it checks only the
/// four fields that distinguish monitoring data from arbitrary JSON (`id`,
/// `timestamp`, `model`, `status`, in that order), first failure wins, and
/// everything else passes through untouched.
pub fn parse_document(text: &str) -> Result<ResponseDataset, ValidateError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ValidateError::Syntax)?;
    check_shape(&value)?;

    // The gates above guarantee this cannot fail.
    serde_json::from_value(value).map_err(|_| ValidateError::Syntax)
}

/// All three gates in order, short-circuiting on the first failure.
pub async fn validate_upload(source: &dyn FileSource) -> Result<ResponseDataset, ValidateError> {
    check_extension(source.name())?;
    let text = source.read_text().await.map_err(|_| ValidateError::Syntax)?;
    parse_document(&text)
}

fn check_shape(value: &Value) -> Result<(), ValidateError> {
    let obj = value.as_object().ok_or(ValidateError::NotResponsesObject)?;
    let responses = obj.get("responses").ok_or(ValidateError::MissingResponses)?;
    let responses = responses.as_array().ok_or(ValidateError::NotResponsesObject)?;

    for (i, element) in responses.iter().enumerate() {
        check_element(i + 1, element)?;
    }
    Ok(())
}

const CHECKED_FIELDS: [&str; 4] = ["id", "timestamp", "model", "status"];

fn check_element(position: usize, element: &Value) -> Result<(), ValidateError> {
    // A non-object element cannot carry any field; report the first check.
    let obj = element.as_object().ok_or(ValidateError::MissingField {
        position,
        field: CHECKED_FIELDS[0],
    })?;

    for field in CHECKED_FIELDS {
        let value = obj
            .get(field)
            .ok_or(ValidateError::MissingField { position, field })?;

        let ok = match (field, value.as_str()) {
            ("status", Some(s)) => ResponseStatus::from_wire(s).is_some(),
            (_, Some(s)) => !s.is_empty(),
            (_, None) => false,
        };
        if !ok {
            return Err(ValidateError::InvalidField { position, field });
        }
    }
    Ok(())
}
