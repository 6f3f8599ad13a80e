use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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
    pub screening: ScreeningConfig,
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

        let screening = ScreeningConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            screening,
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

/// Knobs for the screening wizard's simulated interactions.
#[derive(Debug, Clone)]
pub struct ScreeningConfig {
    /// Length of the simulated voice recording, in seconds.
    pub recording_seconds: u32,
    /// Artificial delay before results are produced, in milliseconds.
    pub processing_delay_ms: u64,
    /// Puzzle moves required before the puzzle counts as complete.
    pub min_puzzle_moves: u32,
}

impl ScreeningConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let recording_seconds = parse_env_u32("SCREENING_RECORDING_SECONDS", 30)?;
        let processing_delay_ms = parse_env_u64("SCREENING_PROCESSING_DELAY_MS", 3000)?;
        let min_puzzle_moves = parse_env_u32("SCREENING_MIN_PUZZLE_MOVES", 3)?;

        if min_puzzle_moves == 0 {
            return Err(ConfigError::InvalidScreeningValue {
                key: "SCREENING_MIN_PUZZLE_MOVES",
            });
        }

        Ok(Self {
            recording_seconds,
            processing_delay_ms,
            min_puzzle_moves,
        })
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            recording_seconds: 30,
            processing_delay_ms: 3000,
            min_puzzle_moves: 3,
        }
    }
}

fn parse_env_u32(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidScreeningValue { key }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidScreeningValue { key }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScreeningValue { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScreeningValue { key } => {
                write!(f, "{key} must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidScreeningValue { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("SCREENING_RECORDING_SECONDS");
        env::remove_var("SCREENING_PROCESSING_DELAY_MS");
        env::remove_var("SCREENING_MIN_PUZZLE_MOVES");
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
        assert_eq!(config.screening.recording_seconds, 30);
        assert_eq!(config.screening.processing_delay_ms, 3000);
        assert_eq!(config.screening.min_puzzle_moves, 3);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn screening_overrides_are_honored() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCREENING_RECORDING_SECONDS", "10");
        env::set_var("SCREENING_PROCESSING_DELAY_MS", "250");
        env::set_var("SCREENING_MIN_PUZZLE_MOVES", "5");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.screening.recording_seconds, 10);
        assert_eq!(config.screening.processing_delay(), Duration::from_millis(250));
        assert_eq!(config.screening.min_puzzle_moves, 5);
        reset_env();
    }

    #[test]
    fn zero_puzzle_moves_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCREENING_MIN_PUZZLE_MOVES", "0");
        let result = AppConfig::load();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidScreeningValue { key: "SCREENING_MIN_PUZZLE_MOVES" })
        ));
        reset_env();
    }
}
