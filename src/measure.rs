//! Asynchronous natural-size probing for slide images.
//!
//! Probes resolve out of order relative to navigation; the controller discards
//! results whose captured load id is no longer current.

use std::future::Future;
use std::path::PathBuf;

use crate::error::Error;

/// Resolves a slide's natural pixel dimensions from its public path.
pub trait DimensionProbe: Clone + Send + Sync + 'static {
    fn natural_size(
        &self,
        public_path: &str,
    ) -> impl Future<Output = Result<(u32, u32), Error>> + Send;
}

/// Probe backed by the files the lister serves. Reads only the image header.
#[derive(Debug, Clone)]
pub struct FileProbe {
    dir: PathBuf,
    route_prefix: String,
}

impl FileProbe {
    pub fn new(dir: impl Into<PathBuf>, route_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            route_prefix: route_prefix.into(),
        }
    }

    /// Map a public path back to the file it was listed from.
    fn resolve(&self, public_path: &str) -> PathBuf {
        let name = public_path
            .strip_prefix(self.route_prefix.as_str())
            .unwrap_or(public_path)
            .trim_start_matches('/');
        self.dir.join(name)
    }
}

impl DimensionProbe for FileProbe {
    async fn natural_size(&self, public_path: &str) -> Result<(u32, u32), Error> {
        let path = self.resolve(public_path);
        let dims = tokio::task::spawn_blocking(move || image::image_dimensions(&path))
            .await
            .map_err(|err| Error::Io(std::io::Error::other(err)))??;
        Ok(dims)
    }
}
