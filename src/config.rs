//! Server configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default per-observer outbound channel capacity.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;

/// Default name given to bins created without one.
pub const DEFAULT_BIN_NAME: &str = "New Bin";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Top-level server configuration.
///
/// Loaded once at startup via [`ServerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Capacity of each observer's outbound channel. An observer whose
    /// buffer fills up is disconnected.
    pub outbound_buffer: usize,

    /// Name given to bins created without one.
    pub default_bin_name: String,

    /// Maximum accepted bin name length, in characters.
    pub max_bin_name_len: usize,

    /// Timeout applied to HTTP requests.
    pub request_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            default_bin_name: DEFAULT_BIN_NAME.to_string(),
            max_bin_name_len: 100,
            request_timeout: Duration::from_secs(30),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// | Variable              | Default        |
    /// |-----------------------|----------------|
    /// | `LISTEN_ADDR`         | `0.0.0.0:3000` |
    /// | `PORT`                | used only when `LISTEN_ADDR` is unset |
    /// | `OUTBOUND_BUFFER`     | `256`          |
    /// | `DEFAULT_BIN_NAME`    | `New Bin`      |
    /// | `MAX_BIN_NAME_LEN`    | `100`          |
    /// | `REQUEST_TIMEOUT_SECS`| `30`           |
    /// | `LOG_FORMAT`          | `pretty`       |
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as a
    /// [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(addr) => addr.parse()?,
            Err(_) => SocketAddr::new(
                defaults.listen_addr.ip(),
                parse_env("PORT", defaults.listen_addr.port()),
            ),
        };

        let default_bin_name = std::env::var("DEFAULT_BIN_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.default_bin_name);

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            listen_addr,
            outbound_buffer: parse_env("OUTBOUND_BUFFER", defaults.outbound_buffer).max(1),
            default_bin_name,
            max_bin_name_len: parse_env("MAX_BIN_NAME_LEN", defaults.max_bin_name_len),
            request_timeout: Duration::from_secs(parse_env(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            log_format,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
