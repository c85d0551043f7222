use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: Data,
    pub server: Server,
    pub telemetry: Telemetry,
}

/// Where the backtester exports are read from and the JSON datasets go.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Data {
    /// Root of the exports, laid out as `{mode}/{COIN}-EMA{period}-{MODE}.csv`.
    pub source_dir: PathBuf,
    /// Directory of the converted `{COIN}-{period}-{mode}.json` files.
    pub output_dir: PathBuf,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("originData"),
            output_dir: PathBuf::from("data"),
        }
    }
}

/// Settings for the dashboard's HTTP API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Built front-end assets, served for every non-API path when set.
    pub static_dir: Option<PathBuf>,
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.address().parse()
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Telemetry {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub log_level: String,
    /// When set, logs are also written to a daily-rolling file here.
    pub log_dir: Option<PathBuf>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}
