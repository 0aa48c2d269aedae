use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::advisor::{ArtifactPaths, FeedbackRules};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the advisor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub artifacts: ArtifactPaths,
    pub feedback: FeedbackRules,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value)?,
            Err(_) => LogFormat::Compact,
        };

        let defaults = ArtifactPaths::default();
        let artifacts = ArtifactPaths {
            model: env::var("ADVISOR_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model),
            preprocessor: env::var("ADVISOR_PREPROCESSOR_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.preprocessor),
        };

        let rules = FeedbackRules::default();
        let feedback = FeedbackRules {
            trend_buffer: parse_var("ADVISOR_TREND_BUFFER", rules.trend_buffer)?,
            study_hours_target: parse_var("ADVISOR_STUDY_HOURS_TARGET", rules.study_hours_target)?,
            attendance_target: parse_var("ADVISOR_ATTENDANCE_TARGET", rules.attendance_target)?,
            sleep_target: parse_var("ADVISOR_SLEEP_TARGET", rules.sleep_target)?,
            tutoring_target: parse_var("ADVISOR_TUTORING_TARGET", rules.tutoring_target)?,
        };
        if !feedback.trend_buffer.is_finite() || feedback.trend_buffer < 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "ADVISOR_TREND_BUFFER",
                value: feedback.trend_buffer.to_string(),
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            artifacts,
            feedback,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Output layout of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::InvalidValue {
                name: "APP_LOG_FORMAT",
                value: value.to_string(),
            }),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { name, value } => {
                write!(f, "{name} has an invalid value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const VARS: [&str; 12] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_LOG_FORMAT",
        "ADVISOR_MODEL_PATH",
        "ADVISOR_PREPROCESSOR_PATH",
        "ADVISOR_TREND_BUFFER",
        "ADVISOR_STUDY_HOURS_TARGET",
        "ADVISOR_ATTENDANCE_TARGET",
        "ADVISOR_SLEEP_TARGET",
        "ADVISOR_TUTORING_TARGET",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in VARS {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.artifacts, ArtifactPaths::default());
        assert_eq!(config.feedback, FeedbackRules::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_artifact_paths_and_thresholds() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADVISOR_MODEL_PATH", "/srv/models/regressor.json");
        env::set_var("ADVISOR_TREND_BUFFER", "1.5");
        env::set_var("ADVISOR_STUDY_HOURS_TARGET", "35");
        env::set_var("APP_LOG_FORMAT", "Pretty");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.artifacts.model,
            PathBuf::from("/srv/models/regressor.json")
        );
        assert_eq!(
            config.artifacts.preprocessor,
            ArtifactPaths::default().preprocessor
        );
        assert_eq!(config.feedback.trend_buffer, 1.5);
        assert_eq!(config.feedback.study_hours_target, 35);
        assert_eq!(config.feedback.attendance_target, 95);
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
        reset_env();
    }

    #[test]
    fn rejects_unparseable_thresholds() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADVISOR_ATTENDANCE_TARGET", "ninety");

        match AppConfig::load() {
            Err(ConfigError::InvalidValue { name, value }) => {
                assert_eq!(name, "ADVISOR_ATTENDANCE_TARGET");
                assert_eq!(value, "ninety");
            }
            other => panic!("expected invalid value error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_negative_trend_buffer() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADVISOR_TREND_BUFFER", "-1");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidValue {
                name: "ADVISOR_TREND_BUFFER",
                ..
            })
        ));
        reset_env();
    }
}
