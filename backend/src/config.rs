use crate::error::AppError;
use log::{info, warn};
use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "8080";
const DEFAULT_DATABASE: &str = "leaderboard.sqlite";
const DEFAULT_TEMP_DIR: &str = "temp";
const DEFAULT_MAX_UPLOAD_BYTES: &str = "10485760"; // 10 MB

const SECRET_NAME: &str = "API_SECRET_KEY";

/// Process-wide settings, read once in `main` and shared through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    /// Directory where uploads are staged while they are parsed.
    pub temp_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Bearer secret for `POST /api/upload`. `None` rejects every upload.
    pub api_secret_key: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let config = Self {
            host: try_load("LEADERBOARD_HOST", DEFAULT_HOST)?,
            port: try_load("LEADERBOARD_PORT", DEFAULT_PORT)?,
            database_path: try_load("LEADERBOARD_DATABASE", DEFAULT_DATABASE)?,
            temp_dir: try_load("LEADERBOARD_TEMP_DIR", DEFAULT_TEMP_DIR)?,
            max_upload_bytes: try_load("LEADERBOARD_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            api_secret_key: read_secret(SECRET_NAME),
        };

        if config.api_secret_key.is_none() {
            warn!("{SECRET_NAME} is not configured, every upload will be rejected");
        }
        Ok(config)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AppError::Config(format!("invalid {key}: {e}"))
        })
}

/// Reads a secret from the environment, falling back to a mounted
/// `/run/secrets/<name>` file.
fn read_secret(secret_name: &str) -> Option<String> {
    if let Some(value) = env::var(secret_name).ok().and_then(non_empty) {
        return Some(value);
    }

    let path = format!("/run/secrets/{secret_name}");
    match read_to_string(&path) {
        Ok(contents) => non_empty(contents),
        Err(e) => {
            info!("{secret_name} not in environment and {path} unreadable: {e}");
            None
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
