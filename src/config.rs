use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; SeoPageAnalyzer/0.1)";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub fetch_timeout: Duration,
    pub connect_timeout: Duration,
    pub analyze_timeout: Duration,
    pub user_agent: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "5000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            fetch_timeout: seconds(&lookup, "FETCH_TIMEOUT_SECS", 10)?,
            connect_timeout: seconds(&lookup, "CONNECT_TIMEOUT_SECS", 5)?,
            analyze_timeout: seconds(&lookup, "ANALYZE_TIMEOUT_SECS", 30)?,
            user_agent: lookup("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            fetch_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            analyze_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match lookup(key) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e)))?,
        None => default,
    };

    if secs == 0 {
        return Err(AppError::ConfigError(format!("{} must be greater than zero", key)));
    }

    Ok(Duration::from_secs(secs))
}
