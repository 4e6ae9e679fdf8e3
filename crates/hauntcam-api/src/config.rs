//! Server configuration, read once from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use hauntcam_core::generative::ModelConfig;
use hauntcam_core::model::GameMode;
use hauntcam_gemini::client::DEFAULT_BASE_URL;

use crate::error::AppError;

/// Everything `main` needs to wire the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Bind address.
    pub addr: SocketAddr,
    /// Generative service key.
    pub gemini_api_key: String,
    /// Generative service endpoint.
    pub gemini_base_url: String,
    /// Per-call generative timeout.
    pub gemini_timeout: Duration,
    /// Scenario content directory.
    pub scenario_dir: PathBuf,
    /// Local blob directory.
    pub blob_root: PathBuf,
    /// Public prefix of blob references.
    pub blob_public_base_url: String,
    /// Key for signed blob references.
    pub blob_signing_secret: String,
    /// Mode for games created without one.
    pub default_mode: GameMode,
    /// Model per call site.
    pub models: ModelConfig,
    /// OTLP collector endpoint; tracing export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
        };
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_owned());

        let host = or_default("HOST", "0.0.0.0");
        let port: u16 = or_default("PORT", "3000")
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        let timeout_secs: u64 = or_default("GEMINI_TIMEOUT_SECS", "120")
            .parse()
            .map_err(|e| AppError::Config(format!("GEMINI_TIMEOUT_SECS must be a number: {e}")))?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "GEMINI_TIMEOUT_SECS must be positive".to_owned(),
            ));
        }

        let default_mode: GameMode = or_default("GAME_MODE", GameMode::ItemCatalog.as_str())
            .parse()
            .map_err(|e| AppError::Config(format!("GAME_MODE: {e}")))?;

        let defaults = ModelConfig::default();
        let models = ModelConfig {
            detector: or_default("DETECTOR_MODEL", &defaults.detector),
            synthesis: or_default("SYNTHESIS_MODEL", &defaults.synthesis),
            verifier: or_default("VERIFIER_MODEL", &defaults.verifier),
            judge: or_default("JUDGE_MODEL", &defaults.judge),
            image: or_default("IMAGE_MODEL", &defaults.image),
            text: or_default("TEXT_MODEL", &defaults.text),
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            addr,
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_base_url: or_default("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            gemini_timeout: Duration::from_secs(timeout_secs),
            scenario_dir: PathBuf::from(or_default("SCENARIO_DIR", "data/scenarios")),
            blob_root: PathBuf::from(or_default("BLOB_ROOT", "data/blobs")),
            blob_public_base_url: or_default("BLOB_PUBLIC_BASE_URL", "http://localhost:3000/blobs"),
            blob_signing_secret: required("BLOB_SIGNING_SECRET")?,
            default_mode,
            models,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}
