use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::Decimal;
use crate::engine::TaxSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Where the bundled sample CSV is served from, if anywhere.
    pub sample_data_url: Option<String>,
    /// Local copy of the sample CSV. Takes precedence over the URL.
    pub sample_data_path: Option<PathBuf>,
    /// Tax assumptions used when a request does not supply its own.
    pub default_tax: TaxSettings,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            sample_data_url: None,
            sample_data_path: None,
            default_tax: TaxSettings::default(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = parse_or(&env_map, "PORT", defaults.port, "must be a valid u16")?;
        let max_upload_bytes = parse_or(
            &env_map,
            "MAX_UPLOAD_BYTES",
            defaults.max_upload_bytes,
            "must be a positive integer",
        )?;
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_UPLOAD_BYTES".to_string(),
                "must be a positive integer".to_string(),
            ));
        }

        let sample_data_url = env_map
            .get("SAMPLE_DATA_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let sample_data_path = env_map
            .get("SAMPLE_DATA_PATH")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let default_tax = TaxSettings::new(
            parse_decimal_or(&env_map, "TAX_SHORT_TERM_RATE", defaults.default_tax.short_term_rate)?,
            parse_decimal_or(&env_map, "TAX_LONG_TERM_RATE", defaults.default_tax.long_term_rate)?,
            parse_decimal_or(&env_map, "TAX_THRESHOLD_DAYS", defaults.default_tax.threshold_days)?,
        );
        default_tax
            .validate()
            .map_err(|e| ConfigError::InvalidValue("TAX_*".to_string(), e.to_string()))?;

        Ok(Config {
            port,
            sample_data_url,
            sample_data_path,
            default_tax,
            max_upload_bytes,
        })
    }
}

fn parse_or<T: FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
    reason: &str,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), reason.to_string())),
        None => Ok(default),
    }
}

fn parse_decimal_or(
    env_map: &HashMap<String, String>,
    key: &str,
    default: Decimal,
) -> Result<Decimal, ConfigError> {
    match env_map.get(key) {
        Some(raw) => Decimal::from_str_canonical(raw.trim()).map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), format!("must be a decimal number, got {}", raw))
        }),
        None => Ok(default),
    }
}
