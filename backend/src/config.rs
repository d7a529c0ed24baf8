//! Service configuration.
//!
//! Read once at startup from the TOML file named by `ATTRACTIONS_CONFIG`
//! (`attractions.toml` by default). Every key is optional; a missing file means
//! all defaults.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "ATTRACTIONS_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "attractions.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file holding accepted attractions and titles.
    pub cache_path: PathBuf,
    /// Destination directory of the local sink.
    pub output_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Upper bound on a single fetched image body.
    pub max_image_bytes: u64,
    /// Size of the worker pool that fetches and transforms images.
    pub fetch_workers: usize,
    /// Minimum similarity for a cached title to be reported as a match.
    pub match_threshold: f64,
    pub image: ImageConfig,
}

/// Geometry and encoding of the processed photos.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    pub target_width: u32,
    pub aspect_width: u32,
    pub aspect_height: u32,
    pub jpeg_quality: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cache_path: PathBuf::from("./assets/cache.db"),
            output_dir: PathBuf::from("."),
            connect_timeout_secs: 5,
            request_timeout_secs: 15,
            max_image_bytes: 20 * 1024 * 1024,
            fetch_workers: 4,
            match_threshold: 0.5,
            image: ImageConfig::default(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            target_width: 1200,
            aspect_width: 3,
            aspect_height: 2,
            jpeg_quality: 80,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from `ATTRACTIONS_CONFIG` or the default file.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_file(Path::new(&path))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.fetch_workers == 0 {
            return Err(Error::Config("fetch_workers must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(Error::Config("match_threshold must lie in [0, 1]".into()));
        }
        let image = &self.image;
        if image.target_width == 0 || image.aspect_width == 0 || image.aspect_height == 0 {
            return Err(Error::Config("image dimensions must be positive".into()));
        }
        if image.jpeg_quality == 0 || image.jpeg_quality > 100 {
            return Err(Error::Config("jpeg_quality must lie in 1..=100".into()));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.image.target_width, 1200);
        assert_eq!(config.image.jpeg_quality, 80);
        assert_eq!(config.match_threshold, 0.5);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = AppConfig::from_toml(
            "port = 9000\noutput_dir = \"/tmp/out\"\n[image]\njpeg_quality = 90\n",
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.image.jpeg_quality, 90);
        assert_eq!(config.image.aspect_width, 3);
        assert_eq!(config.fetch_workers, 4);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            AppConfig::from_toml("prot = 1"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("fetch_workers = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("match_threshold = 1.5"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = AppConfig::from_file(Path::new("/nonexistent/attractions.toml")).unwrap();
        assert_eq!(config.host, "127.0.0.1");
    }
}
