use crate::workflows::roster::{FileRosterSource, RosterImporter, DEFAULT_HEADER_ROW};
use crate::workflows::training::ClassificationPolicy;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_ROSTER_PATH: &str = "data/registro_ta_ec.xlsx";

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
    pub roster: RosterConfig,
    pub classification: ClassificationPolicy,
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

        let roster_path = env::var("APP_ROSTER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ROSTER_PATH));
        let header_row = match env::var("APP_ROSTER_HEADER_ROW") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidHeaderRow)?,
            Err(_) => DEFAULT_HEADER_ROW,
        };

        let mut classification = ClassificationPolicy::strict();
        if let Ok(raw) = env::var("APP_NUMERIC_DATE_THRESHOLD") {
            classification = classification.with_numeric_date_threshold(parse_threshold(&raw)?);
        }
        if let Ok(raw) = env::var("APP_PENDING_MARKERS") {
            classification = classification.with_pending_markers(parse_markers(&raw));
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            roster: RosterConfig {
                path: roster_path,
                header_row,
            },
            classification,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the roster lives and how its sheet is laid out.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub path: PathBuf,
    pub header_row: usize,
}

impl RosterConfig {
    pub fn importer(&self) -> RosterImporter {
        RosterImporter::new(self.header_row)
    }

    pub fn source(&self) -> FileRosterSource {
        FileRosterSource::new(self.path.clone(), self.importer())
    }
}

/// `none`, `off` or `lenient` disable the numeric threshold entirely.
pub fn parse_threshold(raw: &str) -> Result<Option<f64>, ConfigError> {
    let value = raw.trim();
    match value.to_ascii_lowercase().as_str() {
        "none" | "off" | "lenient" => Ok(None),
        _ => value
            .parse::<f64>()
            .ok()
            .filter(|threshold| threshold.is_finite())
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidNumericThreshold {
                value: value.to_string(),
            }),
    }
}

pub fn parse_markers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|marker| !marker.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidHeaderRow,
    InvalidNumericThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidHeaderRow => {
                write!(f, "APP_ROSTER_HEADER_ROW must be a non-negative integer")
            }
            ConfigError::InvalidNumericThreshold { value } => write!(
                f,
                "APP_NUMERIC_DATE_THRESHOLD must be a number or 'none' (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidHeaderRow
            | ConfigError::InvalidNumericThreshold { .. } => None,
        }
    }
}
