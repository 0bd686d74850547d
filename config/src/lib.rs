//! Load `.env` into the process environment and validate the settings maestro
//! binaries need at startup.
//!
//! Priority when applying: **existing env > .env** — a key already set in the
//! process environment is never overwritten, so deployments can override a
//! checked-in `.env` without editing it.

mod dotenv;
mod settings;

use std::path::Path;
use thiserror::Error;

pub use settings::Settings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
    #[error("missing required environment variable: {0}")]
    MissingKey(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Loads `.env` from `override_dir` (or the current directory) and sets each
/// key that is **not** already present in the process environment.
///
/// A missing `.env` file is not an error; binaries call this unconditionally
/// before [`Settings::from_env`].
pub fn load_env(override_dir: Option<&Path>) -> Result<(), ConfigError> {
    let map = dotenv::load_env_map(override_dir).map_err(ConfigError::DotenvRead)?;
    for (key, value) in map {
        if std::env::var(&key).is_err() {
            std::env::set_var(&key, value);
        }
    }
    Ok(())
}
