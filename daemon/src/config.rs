//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use disperse_engine::EngineConfig;
use disperse_types::Address;
use disperse_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(String),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid genesis entry: {0}")]
    Genesis(String),

    #[error("host snapshot: {0}")]
    Snapshot(String),
}

/// Configuration for a disperse daemon.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; CLI flags
/// override individual fields afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address the contract is deployed at. Holds escrow and dispersal dust.
    #[serde(default = "default_contract_address")]
    pub contract_address: Address,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// LMDB directory for the escrow ledger and host snapshot. In-memory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub genesis: GenesisConfig,
}

/// Initial state of the development ledger.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(default)]
    pub native: Vec<Allocation>,

    #[serde(default)]
    pub tokens: Vec<TokenGenesis>,
}

/// A balance seeded at startup. Amounts are decimal strings so they can exceed `i64`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Allocation {
    pub account: Address,
    pub amount: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenGenesis {
    pub address: Address,
    pub symbol: String,
    #[serde(default)]
    pub balances: Vec<Allocation>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_contract_address() -> Address {
    let mut bytes = [0u8; 20];
    bytes[18] = 0xd1;
    bytes[19] = 0x5e;
    Address::new(bytes)
}

fn default_rpc_port() -> u16 {
    7080
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.contract_address.is_zero() {
            return Err(ConfigError::Parse("contract_address must not be the zero address".into()));
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            contract_address: default_contract_address(),
            rpc_port: default_rpc_port(),
            data_dir: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            engine: EngineConfig::default(),
            genesis: GenesisConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_port, 7080);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.engine.max_recipients, 256);
        assert!(config.data_dir.is_none());
        assert!(config.genesis.native.is_empty());
    }

    #[test]
    fn full_toml_parses() {
        let toml = r#"
            contract_address = "0x00000000000000000000000000000000000000cc"
            rpc_port = 9000
            data_dir = "/var/lib/disperse"
            log_format = "json"

            [engine]
            max_recipients = 10

            [[genesis.native]]
            account = "0x0101010101010101010101010101010101010101"
            amount = "10000000000000000000000"

            [[genesis.tokens]]
            address = "0x7070707070707070707070707070707070707070"
            symbol = "MOCK"
            balances = [
                { account = "0x0101010101010101010101010101010101010101", amount = "100" },
            ]
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.rpc_port, 9000);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.engine.max_recipients, 10);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/disperse")));
        assert_eq!(config.genesis.native[0].amount, "10000000000000000000000");
        assert_eq!(config.genesis.tokens[0].balances.len(), 1);
    }

    #[test]
    fn zero_contract_address_is_rejected() {
        let toml = r#"contract_address = "0x0000000000000000000000000000000000000000""#;
        assert!(matches!(DaemonConfig::from_toml_str(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaemonConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = DaemonConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.contract_address, config.contract_address);
        assert_eq!(parsed.rpc_port, config.rpc_port);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disperse.toml");
        std::fs::write(&path, "rpc_port = 1234\nlog_level = \"debug\"\n").unwrap();
        let config = DaemonConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.rpc_port, 1234);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_file_returns_io_error() {
        let result = DaemonConfig::from_toml_file(Path::new("/nonexistent/disperse.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
