use std::path::{Path, PathBuf};

use async_trait::async_trait;

use datasel::{FetchError, Fetcher, SampleKind};
use responselog::ResponseDataset;

/// Fetches the sample fixtures from disk. A fixture goes through the same
/// parse-and-shape gates as an upload; a malformed fixture is a fetch error,
/// not a validation notification.
pub struct FileFetcher {
    dir: PathBuf,
}

impl FileFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn fixture_path(&self, kind: SampleKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.fixture_name()))
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, kind: SampleKind) -> Result<ResponseDataset, FetchError> {
        let path = self.fixture_path(kind);
        load_fixture(&path).await
    }
}

pub async fn load_fixture(path: &Path) -> Result<ResponseDataset, FetchError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FetchError::Unavailable(format!("{}: {e}", path.display())))?;

    responselog::parse_document(&text)
        .map_err(|e| FetchError::Malformed(format!("{}: {e}", path.display())))
}
