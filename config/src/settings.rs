//! Process settings resolved from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

/// Everything a maestro binary needs before serving requests.
///
/// Resolved once at startup; missing required keys are fatal there, so the
/// engine never has to handle absent credentials at request time.
#[derive(Clone, Debug)]
pub struct Settings {
    /// API key for the chat-completion backend. Required.
    pub openai_api_key: String,
    /// Model name passed to the backend. `MAESTRO_MODEL`, default `gpt-4o-mini`.
    pub model: String,
    /// Directory for per-invocation scratch files. `MAESTRO_SCRATCH_DIR`,
    /// default: the OS temp directory.
    pub scratch_dir: PathBuf,
    /// Lab-results document served at `GET /patient-data`.
    /// `MAESTRO_PATIENT_DATA`, default `data/patient_data.json`.
    pub patient_data: PathBuf,
    /// HTTP bind address. `MAESTRO_ADDR`, default `127.0.0.1:8000`.
    pub addr: SocketAddr,
}

impl Settings {
    /// Reads settings from the process environment. Call [`crate::load_env`] first.
    pub fn from_env() -> Result<Self, ConfigError> {
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingKey("OPENAI_API_KEY"))?;
        let model =
            std::env::var("MAESTRO_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let scratch_dir = std::env::var("MAESTRO_SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());
        let patient_data = std::env::var("MAESTRO_PATIENT_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/patient_data.json"));
        let addr = match std::env::var("MAESTRO_ADDR") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MAESTRO_ADDR",
                value: raw,
            })?,
            Err(_) => SocketAddr::from(([127, 0, 0, 1], 8000)),
        };
        Ok(Self {
            openai_api_key,
            model,
            scratch_dir,
            patient_data,
            addr,
        })
    }
}
