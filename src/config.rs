use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "provider-report";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> &'static str {
    "info,tower_http=warn"
}

/// Get the application data directory (~/.provider-report)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".provider-report")
}

/// Runtime configuration, resolved once at startup and passed explicitly
/// to every component that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Listen address for the HTTP API
    pub bind_addr: SocketAddr,
    /// Optional bearer token; when unset the API is open (the real
    /// authorization service sits in front of this process)
    pub api_token: Option<String>,
}

impl Config {
    /// Resolve configuration from the environment, falling back to defaults.
    ///
    /// - `PROVIDER_REPORT_DB`: database file path
    /// - `PROVIDER_REPORT_ADDR`: bind address (host:port)
    /// - `PROVIDER_REPORT_TOKEN`: bearer token for the auth boundary
    pub fn from_env() -> Self {
        let database_path = std::env::var("PROVIDER_REPORT_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_data_dir().join("provider-report.db"));

        let bind_addr = std::env::var("PROVIDER_REPORT_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

        let api_token = std::env::var("PROVIDER_REPORT_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        Self {
            database_path,
            bind_addr,
            api_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with(".provider-report"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_bind_addr_is_loopback() {
        let config = Config {
            database_path: app_data_dir().join("provider-report.db"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            api_token: None,
        };
        assert!(config.bind_addr.ip().is_loopback());
    }
}
