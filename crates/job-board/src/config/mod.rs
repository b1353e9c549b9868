use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Every variable `AppConfig::load` reads.
pub const ENV_KEYS: [&str; 9] = [
    "APP_ENV",
    "APP_HOST",
    "APP_PORT",
    "APP_LOG_LEVEL",
    "APP_LOG_FORMAT",
    "APP_SESSION_PATH",
    "APP_STRICT_TRANSITIONS",
    "APP_REDIRECT_DELAY_MS",
    "APP_SIMULATED_DELAY_PERCENT",
];

/// Deployment stage; anything unrecognised counts as development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn detect(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the job board service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub session: SessionConfig,
    pub workflow: WorkflowConfig,
}

impl AppConfig {
    /// Reads `.env` when present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::detect(&env_or("APP_ENV", "development")),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig::from_env()?,
            session: SessionConfig {
                path: PathBuf::from(env_or("APP_SESSION_PATH", ".job-board-session.json")),
            },
            workflow: WorkflowConfig::from_env()?,
        })
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

fn env_number<T: FromStr>(key: &'static str, fallback: &str) -> Result<T, ConfigError> {
    let raw = env_or(key, fallback);
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
}

fn env_flag(key: &'static str, fallback: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(fallback);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { key, value: raw }),
    }
}

/// HTTP listener binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = env_or("APP_PORT", "3000")
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        Ok(Self {
            host: env_or("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    /// `localhost` is accepted as an alias for the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub format: LogFormat,
}

impl TelemetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            log_level: env_or("APP_LOG_LEVEL", "info"),
            format: env_or("APP_LOG_FORMAT", "compact").parse()?,
        })
    }
}

/// Where the signed-in user record survives restarts.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub path: PathBuf,
}

/// Knobs for the moderation workflow and its simulated timers.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Refuse actions the current status does not offer.
    pub strict_transitions: bool,
    /// Delay before the client is sent back to the admin dashboard after a user is deleted.
    pub redirect_delay: Duration,
    /// Percentage applied to every simulated delay; `0` makes them instant.
    pub simulated_delay_percent: u32,
}

impl WorkflowConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            strict_transitions: env_flag("APP_STRICT_TRANSITIONS", false)?,
            redirect_delay: Duration::from_millis(env_number("APP_REDIRECT_DELAY_MS", "2000")?),
            simulated_delay_percent: env_number("APP_SIMULATED_DELAY_PERCENT", "100")?,
        })
    }

    pub fn scaled(&self, base: Duration) -> Duration {
        base * self.simulated_delay_percent / 100
    }

    /// Configuration with instant timers, used by tests and the CLI demo.
    pub fn instant() -> Self {
        Self {
            simulated_delay_percent: 0,
            ..Self::default()
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            strict_transitions: false,
            redirect_delay: Duration::from_secs(2),
            simulated_delay_percent: 100,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidBool { key: &'static str, value: String },
    InvalidLogFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => f.write_str("APP_PORT must be a port number between 0 and 65535"),
            ConfigError::InvalidHost { source } => {
                write!(f, "APP_HOST is neither localhost nor an IP address ({source})")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer, got '{value}'")
            }
            ConfigError::InvalidBool { key, value } => {
                write!(f, "{key} must be true or false, got '{value}'")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json', got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
