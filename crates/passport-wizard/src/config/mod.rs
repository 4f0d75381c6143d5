use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::wizard::payment::DEFAULT_PAYMENT_AMOUNT;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub wizard: WizardSettings,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            wizard: WizardSettings::from_env()?,
        })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Mock delays and the demo payment amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSettings {
    pub submission_delay: Duration,
    pub payment_delay: Duration,
    pub payment_amount: u32,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            submission_delay: Duration::from_millis(3000),
            payment_delay: Duration::from_millis(2000),
            payment_amount: DEFAULT_PAYMENT_AMOUNT,
        }
    }
}

impl WizardSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            submission_delay: delay_from_env(
                "WIZARD_SUBMISSION_DELAY_MS",
                defaults.submission_delay,
            )?,
            payment_delay: delay_from_env("WIZARD_PAYMENT_DELAY_MS", defaults.payment_delay)?,
            payment_amount: match env::var("WIZARD_PAYMENT_AMOUNT") {
                Ok(raw) => raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigError::InvalidAmount)?,
                Err(_) => defaults.payment_amount,
            },
        })
    }

    /// Same settings with both mock delays shrunk to `delay`.
    pub fn with_delays(self, delay: Duration) -> Self {
        Self {
            submission_delay: delay,
            payment_delay: delay,
            ..self
        }
    }
}

fn delay_from_env(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidDelay { var }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDelay { var: &'static str },
    InvalidAmount,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDelay { var } => {
                write!(f, "{var} must be a whole number of milliseconds")
            }
            ConfigError::InvalidAmount => {
                write!(f, "WIZARD_PAYMENT_AMOUNT must be a non-negative whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDelay { .. }
            | ConfigError::InvalidAmount => None,
        }
    }
}
