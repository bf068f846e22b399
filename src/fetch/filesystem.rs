//! Fetcher reading objects from a directory tree
//!
//! Objects live at `<root>/<bucket>/<key>`, so a bucket is a top-level
//! directory under the root and keys may contain `/`-separated subdirectories.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::traits::{ObjectBody, ObjectFetcher};
use crate::error::{FetchError, FetchResult};
use crate::location::ObjectLocation;

/// Fetcher rooted at a local directory
#[derive(Debug, Clone)]
pub struct FileSystemFetcher {
    root: PathBuf,
}

impl FileSystemFetcher {
    /// Create a fetcher serving objects below `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a location to a path, refusing anything that escapes the root
    pub fn object_path(&self, location: &ObjectLocation) -> FetchResult<PathBuf> {
        let mut path = self.root.clone();

        let mut bucket = Path::new(location.bucket()).components();
        match (bucket.next(), bucket.next()) {
            (Some(Component::Normal(part)), None) => path.push(part),
            _ => return Err(Self::rejected_segment(location, location.bucket())),
        }

        for segment in location.key().split('/') {
            if segment.is_empty() {
                continue;
            }
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(part)), None) => path.push(part),
                (Some(Component::CurDir), None) => {}
                _ => return Err(Self::rejected_segment(location, segment)),
            }
        }
        Ok(path)
    }

    fn rejected_segment(location: &ObjectLocation, segment: &str) -> FetchError {
        FetchError::malformed_uri(
            location.to_string(),
            format!("path segment '{segment}' is not allowed"),
        )
    }
}

#[async_trait]
impl ObjectFetcher for FileSystemFetcher {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    async fn open(&self, location: &ObjectLocation) -> FetchResult<ObjectBody> {
        let path = self.object_path(location)?;
        debug!("Opening {}", path.display());

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FetchError::NotFound {
                    location: location.clone(),
                    source: Some(Box::new(e)),
                });
            }
            Err(e) => {
                return Err(FetchError::remote(
                    location.clone(),
                    format!("cannot open {}", path.display()),
                    e,
                ));
            }
        };

        let metadata = file
            .metadata()
            .await
            .map_err(|e| FetchError::remote(location.clone(), "cannot stat object", e))?;
        if !metadata.is_file() {
            return Err(FetchError::not_found(location.clone()));
        }

        Ok(Box::pin(file))
    }
}
