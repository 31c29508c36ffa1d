use serde::{Deserialize, Serialize};

use responselog::{ResponseDataset, ValidateError};

use crate::fetch::FetchError;

/// Message surfaced for any fetch-layer failure; fetch errors are not shown
/// verbatim to the user.
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to load sample dataset. Please try again.";

/// One of the two built-in sample datasets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    Short,
    Long,
}

impl SampleKind {
    /// Fixed fixture identifier consumed by the fetcher.
    pub fn fixture_name(&self) -> &'static str {
        match self {
            SampleKind::Short => "responses_short",
            SampleKind::Long => "responses_long",
        }
    }
}

/// Which dataset is currently presented. Exactly one at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Empty,
    Short,
    Long,
    Custom,
}

impl From<SampleKind> for Selection {
    fn from(kind: SampleKind) -> Self {
        match kind {
            SampleKind::Short => Selection::Short,
            SampleKind::Long => Selection::Long,
        }
    }
}

/// Request token handed out when a sample fetch begins. A result is applied
/// only while its ticket is still current; order of completion, not order of
/// initiation, decides the final state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    target: Selection,
    generation: u64,
}

/// Session-long selection state. Constructed explicitly and injected into
/// consumers; holds the resolved records, the loading flag, and the pending
/// user-facing error.
#[derive(Debug, Default)]
pub struct DatasetStore {
    selection: Selection,
    records: Option<ResponseDataset>,
    loading: bool,
    last_error: Option<String>,
    generation: u64,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Resolved records of the active dataset. Empty/absent while a sample
    /// fetch is pending or failed.
    pub fn records(&self) -> &[responselog::ResponseRecord] {
        self.records.as_ref().map(|d| d.responses.as_slice()).unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Dismiss and return the pending notification, if any.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Select a sample dataset. The selection transitions immediately; the
    /// records stay empty until the fetch started with the returned ticket
    /// completes. Reselecting invalidates any ticket still in flight.
    pub fn begin_sample(&mut self, kind: SampleKind) -> FetchTicket {
        self.selection = kind.into();
        self.records = None;
        self.loading = true;
        self.last_error = None;
        self.generation += 1;
        FetchTicket { target: self.selection, generation: self.generation }
    }

    /// Apply a completed fetch. Returns false, leaving the store untouched,
    /// when the ticket went stale (newer selection, upload, or reset).
    pub fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ResponseDataset, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation || ticket.target != self.selection {
            return false;
        }
        self.loading = false;
        match result {
            Ok(dataset) => {
                self.records = Some(dataset);
                self.last_error = None;
            }
            Err(_) => {
                // selection retained, records stay empty
                self.records = None;
                self.last_error = Some(FETCH_FAILURE_MESSAGE.to_string());
            }
        }
        true
    }

    /// Install an uploaded dataset. Only reachable through a successful
    /// validation; the records are held directly, no fetch involved.
    pub fn apply_upload(&mut self, dataset: ResponseDataset) {
        self.selection = Selection::Custom;
        self.records = Some(dataset);
        self.loading = false;
        self.last_error = None;
        self.generation += 1;
    }

    /// A failed validation surfaces its message and changes nothing else.
    pub fn record_validation_failure(&mut self, err: &ValidateError) {
        self.last_error = Some(err.to_string());
    }

    /// Back to no-dataset. In-flight fetches go stale; fetch-layer caches may
    /// survive (not user-visible).
    pub fn reset(&mut self) {
        self.selection = Selection::Empty;
        self.records = None;
        self.loading = false;
        self.last_error = None;
        self.generation += 1;
    }
}
