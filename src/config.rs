use std::path::PathBuf;
use std::time::Duration;

use crate::warehouse::SnowflakeConfig;

// ---------------------------------------------------------------------------
// Application configuration from environment variables
// ---------------------------------------------------------------------------

pub const DEFAULT_DATA_PATH: &str = "indian_forts.json";
pub const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Fort records file (`HERITAGE_DATA_PATH`).
    pub data_path: PathBuf,
    /// Bound on each image download (`HERITAGE_IMAGE_TIMEOUT_SECS`).
    pub image_timeout: Duration,
    /// `None` unless user, password and account are all set.
    pub warehouse: Option<SnowflakeConfig>,
}

impl AppConfig {
    /// Read from the process environment. Call after `.env` is loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        // Passwords are passed through untrimmed; only blankness is checked.
        let get_raw = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_path = get("HERITAGE_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let image_timeout_secs = match get("HERITAGE_IMAGE_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                log::warn!(
                    "HERITAGE_IMAGE_TIMEOUT_SECS={raw:?} is not a whole number; using {DEFAULT_IMAGE_TIMEOUT_SECS}"
                );
                DEFAULT_IMAGE_TIMEOUT_SECS
            }),
            None => DEFAULT_IMAGE_TIMEOUT_SECS,
        };

        let warehouse = match (
            get("SNOWFLAKE_USER"),
            get_raw("SNOWFLAKE_PASSWORD"),
            get("SNOWFLAKE_ACCOUNT"),
        ) {
            (Some(user), Some(password), Some(account)) => Some(SnowflakeConfig {
                account,
                user,
                password,
                warehouse: get("SNOWFLAKE_WAREHOUSE"),
                database: get("SNOWFLAKE_DATABASE"),
                schema: get("SNOWFLAKE_SCHEMA"),
                role: get("SNOWFLAKE_ROLE"),
                base_url: get("SNOWFLAKE_BASE_URL"),
            }),
            _ => {
                log::info!("Snowflake credentials not configured; statistics views are disabled");
                None
            }
        };

        Self {
            data_path,
            image_timeout: Duration::from_secs(image_timeout_secs),
            warehouse,
        }
    }
}
