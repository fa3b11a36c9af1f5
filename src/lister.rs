//! Directory listing for the public screenshot gallery.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;
use walkdir::WalkDir;

/// Only files with this extension are listed; slide order is the
/// lexicographic order of their names.
pub const SCREENSHOT_EXT: &str = "png";

/// List the public paths of all `.png` files directly inside `dir`.
///
/// Entries are sorted lexicographically by file name and prefixed with
/// `route_prefix`. A missing directory or any listing error degrades to an
/// empty list; callers branch on emptiness, never on failure.
pub fn list_screenshots(dir: &Path, route_prefix: &str) -> Vec<String> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "screenshots directory missing; listing empty");
        return Vec::new();
    }

    let mut names: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
        .filter(|name| is_screenshot(name))
        .collect();
    names.sort();

    let prefix = route_prefix.trim_end_matches('/');
    names
        .into_iter()
        .map(|name| format!("{prefix}/{name}"))
        .collect()
}

fn is_screenshot(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SCREENSHOT_EXT))
}

/// Where the controller fetches its gallery from, exactly once per run.
pub trait ScreenshotSource: Send + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Source reading the same directory the listing endpoint serves.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    route_prefix: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, route_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            route_prefix: route_prefix.into(),
        }
    }
}

impl ScreenshotSource for DirectorySource {
    async fn fetch(&self) -> Result<Vec<String>> {
        let dir = self.dir.clone();
        let prefix = self.route_prefix.clone();
        let list = tokio::task::spawn_blocking(move || list_screenshots(&dir, &prefix)).await?;
        Ok(list)
    }
}
