//! Configuration file support for the face-metrics server.
//!
//! Supports TOML configuration from an explicit `--config` path or a
//! project-local `face-metrics.toml`, layered under CLI flags (flags win).

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener settings.
    pub server: ServerConfig,
    /// Cross-origin policy.
    pub cors: CorsConfig,
    /// Model location settings.
    pub models: ModelsConfig,
    /// Classical face detector tuning.
    pub detector: DetectorConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
        }
    }
}

/// Cross-origin policy. A fixed deployment policy, not per-request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// The front-end origin allowed to call the API.
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// Model location settings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Models directory override.
    pub dir: Option<PathBuf>,
    /// Explicit emotion model path (overrides the directory lookup).
    pub emotion: Option<PathBuf>,
    /// Explicit face-mesh model path.
    pub face_mesh: Option<PathBuf>,
    /// Explicit face detector model path.
    pub face_detector: Option<PathBuf>,
}

/// Classical face detector tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum detectable face edge, in pixels.
    pub min_face_size: u32,
    /// Detector score threshold.
    pub score_threshold: f64,
    /// Image pyramid scale factor.
    pub pyramid_scale_factor: f32,
    /// Sliding window step, in pixels.
    pub window_step: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let defaults = face_metrics_adapters::SeetaConfig::default();
        Self {
            min_face_size: defaults.min_face_size,
            score_threshold: defaults.score_threshold,
            pyramid_scale_factor: defaults.pyramid_scale_factor,
            window_step: defaults.window_step,
        }
    }
}

/// CLI flag values layered on top of file configuration.
#[derive(Debug, Default)]
pub struct CliOverrides {
    /// Bind address flag.
    pub host: Option<IpAddr>,
    /// Bind port flag.
    pub port: Option<u16>,
    /// Allowed CORS origin flag.
    pub origin: Option<String>,
    /// Models directory flag.
    pub models_dir: Option<PathBuf>,
}

/// Default project-local config filename.
const LOCAL_CONFIG_NAME: &str = "face-metrics.toml";

impl AppConfig {
    /// Loads configuration.
    ///
    /// With an explicit path, that file must exist and parse. Without one,
    /// a project-local `face-metrics.toml` is used when present, otherwise
    /// defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be read or a
    /// found file fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("loading config from {}", path.display());
            return Self::from_file(path);
        }

        let local = Path::new(LOCAL_CONFIG_NAME);
        if local.exists() {
            info!("loading project-local config {LOCAL_CONFIG_NAME}");
            return Self::from_file(local);
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Layers CLI flag values over this configuration. Set flags win;
    /// unset flags leave the file (or default) values untouched.
    pub fn apply_cli(&mut self, overrides: CliOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(origin) = overrides.origin {
            self.cors.allowed_origin = origin;
        }
        if let Some(dir) = overrides.models_dir {
            self.models.dir = Some(dir);
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }
}
