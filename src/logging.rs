//! Structured logging setup
//!
//! Filtering follows `RUST_LOG` (default `info`); the output format comes
//! from `CoachConfig::log_format`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  /// Human-readable, for local use
  Pretty,
  Compact,
  /// One JSON object per line
  Json,
}

impl std::str::FromStr for LogFormat {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "pretty" => Ok(Self::Pretty),
      "compact" => Ok(Self::Compact),
      "json" => Ok(Self::Json),
      _ => Err(format!("Unknown log format: {}", s)),
    }
  }
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable. Calling this twice is a no-op.
pub fn init(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let registry = tracing_subscriber::registry().with(filter);

  let result = match format {
    LogFormat::Pretty => registry
      .with(fmt::layer().pretty().with_writer(std::io::stderr))
      .try_init(),
    LogFormat::Compact => registry
      .with(fmt::layer().compact().with_writer(std::io::stderr))
      .try_init(),
    LogFormat::Json => registry
      .with(fmt::layer().json().with_writer(std::io::stderr))
      .try_init(),
  };

  if result.is_err() {
    tracing::debug!("Tracing subscriber already installed");
  }
}
