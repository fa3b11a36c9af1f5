use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Directory of `.png` screenshots served by the gallery.
    pub screenshots_dir: PathBuf,
    /// Route segment prefixed to each file name to form its public path.
    pub route_prefix: String,
    /// Delay between automatic slide advances.
    #[serde(with = "humantime_serde")]
    pub autoplay_interval: Duration,
    /// Hard cap on the rendered slide width, in CSS pixels. Slides narrower
    /// than the cap keep their natural width (scale down only, never up).
    pub max_slide_width: f32,
    /// Public paths substituted when the initial gallery fetch fails.
    /// These name build-time assets; keeping the list in sync with the real
    /// directory is the deployer's job.
    pub fallback_screenshots: Vec<String>,
    /// Address the site server binds to.
    pub bind_address: SocketAddr,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.autoplay_interval > Duration::ZERO,
            "autoplay-interval must be positive"
        );
        ensure!(
            self.max_slide_width > 0.0,
            "max-slide-width must be positive"
        );
        ensure!(
            self.route_prefix.starts_with('/') && self.route_prefix.len() > 1,
            "route-prefix must begin with '/' and name a route segment"
        );
        Ok(self)
    }

    const fn default_autoplay_interval() -> Duration {
        Duration::from_secs(5)
    }

    const fn default_max_slide_width() -> f32 {
        600.0
    }

    fn default_fallback_screenshots() -> Vec<String> {
        (1..=4)
            .map(|i| format!("/screenshots/{i:02}-screenshot.png"))
            .collect()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            screenshots_dir: PathBuf::from("public/screenshots"),
            route_prefix: "/screenshots".to_string(),
            autoplay_interval: Self::default_autoplay_interval(),
            max_slide_width: Self::default_max_slide_width(),
            fallback_screenshots: Self::default_fallback_screenshots(),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}
