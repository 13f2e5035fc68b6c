use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const RETRY_TIME: u64 = 600;

const SETTINGS_FILE: &str = "homework_bot";
const ENV_PREFIX: &str = "HOMEWORK_BOT";

const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
const BOT_TOKEN: &str = "BOT_TOKEN";
const CHAT_ID: &str = "CHAT_ID";

/// Non-secret knobs. Every key has a default, so the settings file is optional.
#[derive(Deserialize, Debug)]
pub struct Settings {
    pub endpoint: String,
    pub telegram_api_url: String,
    pub retry_time: u64,
    pub request_timeout: Option<u64>,
    pub log_dir: PathBuf,
    pub log_file: String,
    pub full_log_file: String,
    pub log_max_bytes: usize,
    pub log_backups: usize,
}

impl Settings {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_time)
    }

    /// Falls back to the retry interval so a stalled request never outlives a cycle.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.unwrap_or(self.retry_time))
    }
}

/// Secrets read from the process environment. All three are required.
pub struct Credentials {
    pub practicum_token: String,
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("bot_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Credentials {
    /// Reads the secrets through `lookup`; empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = vec![];
        let mut read = |name: &'static str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };
        let practicum_token = read(PRACTICUM_TOKEN);
        let bot_token = read(BOT_TOKEN);
        let chat_id = read(CHAT_ID);

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }
        Ok(Credentials {
            practicum_token,
            bot_token,
            chat_id,
        })
    }
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    build_settings(config::File::with_name(SETTINGS_FILE).required(false))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    build_settings(config::File::from(path))
}

fn build_settings(
    file: config::File<config::FileSourceFile, config::FileFormat>,
) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("endpoint", DEFAULT_ENDPOINT)?
        .set_default("telegram_api_url", DEFAULT_TELEGRAM_API_URL)?
        .set_default("retry_time", RETRY_TIME as i64)?
        .set_default("log_dir", ".")?
        .set_default("log_file", "homework_bot.log")?
        .set_default("full_log_file", "main.log")?
        .set_default("log_max_bytes", 50_000_000i64)?
        .set_default("log_backups", 5i64)?
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}
