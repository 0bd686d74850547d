//! Parse a `.env` file into a key-value map; application (env-wins) happens in lib.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Path to `.env` under `override_dir` if given, else the current directory.
/// Returns `None` when the file does not exist.
fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Minimal `.env` parser: `KEY=VALUE` lines, `#` comment lines, surrounding
/// single or double quotes stripped (`\"` unescaped inside double quotes).
/// No multiline values or line continuations.
fn parse_dotenv(content: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim();
        let value = match value.as_bytes() {
            [b'"', .., b'"'] => value[1..value.len() - 1].replace("\\\"", "\""),
            [b'\'', .., b'\''] => value[1..value.len() - 1].to_string(),
            _ => value.to_string(),
        };
        out.insert(key.to_string(), value);
    }
    out
}

/// Loads `.env` into a map. A missing file yields an empty map.
pub(crate) fn load_env_map(override_dir: Option<&Path>) -> std::io::Result<HashMap<String, String>> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    Ok(parse_dotenv(&std::fs::read_to_string(path)?))
}
