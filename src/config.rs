//! Runtime configuration, read from the environment (and `.env`)

use std::env;

use crate::logging::LogFormat;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DATABASE_URL_VAR: &str = "COACH_DATABASE_URL";
const HISTORY_DAYS_VAR: &str = "COACH_HISTORY_DAYS";
const LOG_FORMAT_VAR: &str = "COACH_LOG_FORMAT";

const DEFAULT_DATABASE_URL: &str = "sqlite://workout-coach.db?mode=rwc";
/// Workout history handed to the recommendation engine
const DEFAULT_HISTORY_DAYS: i64 = 30;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {value}")]
  InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoachConfig {
  pub database_url: String,
  pub history_days: i64,
  pub log_format: LogFormat,
}

impl Default for CoachConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      history_days: DEFAULT_HISTORY_DAYS,
      log_format: LogFormat::Pretty,
    }
  }
}

impl CoachConfig {
  /// Load `.env` if present, then read the environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let database_url = env::var(DATABASE_URL_VAR).unwrap_or(defaults.database_url);

    let history_days = match env::var(HISTORY_DAYS_VAR) {
      Ok(raw) => match raw.trim().parse::<i64>() {
        Ok(days) if days > 0 => days,
        _ => {
          return Err(ConfigError::InvalidValue {
            var: HISTORY_DAYS_VAR,
            value: raw,
          })
        }
      },
      Err(_) => defaults.history_days,
    };

    let log_format = match env::var(LOG_FORMAT_VAR) {
      Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
        var: LOG_FORMAT_VAR,
        value: raw.clone(),
      })?,
      Err(_) => defaults.log_format,
    };

    Ok(Self {
      database_url,
      history_days,
      log_format,
    })
  }
}
