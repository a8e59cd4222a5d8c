//! Arbitrum network configuration.

use std::env;
use std::fmt;
use std::time::Duration;

use client_blockchain_core::ChainConfig;
use session_core::{Address, ValidationError};

/// Circle USDC on Arbitrum Sepolia.
pub const SEPOLIA_USDC: &str = "0x75faf114eafb1BDbe2F0316DF893fd58CE46AA4d";

/// Native Circle USDC on Arbitrum One.
pub const ONE_USDC: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOZLOW_NETWORK: {0}. Must be sepolia, one, or local")]
    InvalidNetwork(String),

    #[error("Invalid {var}: {source}")]
    InvalidAddress {
        var: &'static str,
        source: ValidationError,
    },

    #[error("Invalid {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}

/// Arbitrum network types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbitrumNetwork {
    /// Arbitrum Sepolia testnet
    Sepolia,
    /// Arbitrum One mainnet
    One,
    /// Local nitro dev node
    Local,
}

impl ArbitrumNetwork {
    pub fn default_rpc_url(&self) -> &str {
        match self {
            ArbitrumNetwork::Sepolia => "https://sepolia-rollup.arbitrum.io/rpc",
            ArbitrumNetwork::One => "https://arb1.arbitrum.io/rpc",
            ArbitrumNetwork::Local => "http://127.0.0.1:8547",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            ArbitrumNetwork::Sepolia => 421_614,
            ArbitrumNetwork::One => 42_161,
            ArbitrumNetwork::Local => 412_346,
        }
    }

    /// Well-known USDC deployment, if the network has one.
    pub fn default_usdc(&self) -> Option<&'static str> {
        match self {
            ArbitrumNetwork::Sepolia => Some(SEPOLIA_USDC),
            ArbitrumNetwork::One => Some(ONE_USDC),
            ArbitrumNetwork::Local => None,
        }
    }
}

impl std::str::FromStr for ArbitrumNetwork {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sepolia" => Ok(ArbitrumNetwork::Sepolia),
            "one" | "mainnet" => Ok(ArbitrumNetwork::One),
            "local" => Ok(ArbitrumNetwork::Local),
            other => Err(ConfigError::InvalidNetwork(other.to_string())),
        }
    }
}

/// Arbitrum-specific configuration.
#[derive(Clone)]
pub struct ArbitrumConfig {
    /// Arbitrum network to connect to
    pub network: ArbitrumNetwork,

    /// Custom RPC endpoint URL (overrides network default)
    pub rpc_url: Option<String>,

    /// Deployed session contract
    pub contract_address: Option<Address>,

    /// Stablecoin used for stakes (overrides network default)
    pub usdc_address: Option<Address>,

    /// Hex-encoded signing key; without it the client is read-only
    pub private_key: Option<String>,

    /// Account to list sessions for when no key is configured
    pub account: Option<Address>,

    /// Delay between receipt polls
    pub receipt_poll_interval: Duration,

    /// Give up waiting for a receipt after this long
    pub receipt_timeout: Duration,
}

impl ArbitrumConfig {
    /// Create a new Arbitrum configuration.
    pub fn new(network: ArbitrumNetwork) -> Self {
        Self {
            network,
            rpc_url: None,
            contract_address: None,
            usdc_address: None,
            private_key: None,
            account: None,
            receipt_poll_interval: Duration::from_millis(1000),
            receipt_timeout: Duration::from_secs(120),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TOZLOW_NETWORK` - Network name (sepolia, one, local) (default: sepolia)
    /// - `TOZLOW_RPC_URL` - Custom RPC endpoint URL
    /// - `TOZLOW_CONTRACT_ADDRESS` - Deployed session contract
    /// - `TOZLOW_USDC_ADDRESS` - Stablecoin address (default: Circle USDC of the network)
    /// - `TOZLOW_PRIVATE_KEY` - Signing key, required for writes
    /// - `TOZLOW_ACCOUNT` - Account for read-only use
    /// - `TOZLOW_RECEIPT_POLL_MS` - Receipt poll interval (default: 1000)
    /// - `TOZLOW_RECEIPT_TIMEOUT_SECS` - Receipt wait limit (default: 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        let network: ArbitrumNetwork = env::var("TOZLOW_NETWORK")
            .unwrap_or_else(|_| "sepolia".to_string())
            .parse()?;

        let mut config = Self::new(network);
        config.rpc_url = env::var("TOZLOW_RPC_URL").ok();
        config.contract_address = read_address("TOZLOW_CONTRACT_ADDRESS")?;
        config.usdc_address = read_address("TOZLOW_USDC_ADDRESS")?;
        config.private_key = env::var("TOZLOW_PRIVATE_KEY").ok().filter(|k| !k.is_empty());
        config.account = read_address("TOZLOW_ACCOUNT")?;

        if let Some(millis) = read_number("TOZLOW_RECEIPT_POLL_MS")? {
            config.receipt_poll_interval = Duration::from_millis(millis);
        }
        if let Some(secs) = read_number("TOZLOW_RECEIPT_TIMEOUT_SECS")? {
            config.receipt_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set custom RPC URL.
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    pub fn with_contract_address(mut self, address: Address) -> Self {
        self.contract_address = Some(address);
        self
    }

    pub fn with_usdc_address(mut self, address: Address) -> Self {
        self.usdc_address = Some(address);
        self
    }

    pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    pub fn with_receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self
    }

    /// Get the RPC URL (custom or default for network).
    pub fn get_rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }

    /// Configured USDC address, or the network's well-known deployment.
    pub fn get_usdc_address(&self) -> Result<Address, ConfigError> {
        if let Some(address) = self.usdc_address {
            return Ok(address);
        }
        let default = self.network.default_usdc().ok_or_else(|| {
            ConfigError::Invalid("TOZLOW_USDC_ADDRESS is required on the local network".into())
        })?;
        default.parse().map_err(|source| ConfigError::InvalidAddress {
            var: "TOZLOW_USDC_ADDRESS",
            source,
        })
    }

    pub fn get_contract_address(&self) -> Result<Address, ConfigError> {
        self.contract_address
            .ok_or_else(|| ConfigError::Invalid("TOZLOW_CONTRACT_ADDRESS is required".into()))
    }
}

impl ChainConfig for ArbitrumConfig {
    fn network_name(&self) -> &str {
        match self.network {
            ArbitrumNetwork::Sepolia => "arbitrum-sepolia",
            ArbitrumNetwork::One => "arbitrum-one",
            ArbitrumNetwork::Local => "arbitrum-local",
        }
    }

    fn rpc_url(&self) -> &str {
        self.get_rpc_url()
    }

    fn validate(&self) -> Result<(), String> {
        let url = self.get_rpc_url();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("Invalid RPC URL format: {}", url));
        }

        let contract = self.get_contract_address().map_err(|e| e.to_string())?;
        if contract.is_zero() {
            return Err("Contract address cannot be the zero address".to_string());
        }

        self.get_usdc_address().map_err(|e| e.to_string())?;

        if self.receipt_poll_interval.is_zero() {
            return Err("Receipt poll interval must be greater than 0".to_string());
        }

        if let Some(ref key) = self.private_key {
            let hex_part = key.strip_prefix("0x").unwrap_or(key);
            if hex_part.len() != 64 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err("Private key must be 32 bytes of hex".to_string());
            }
        }

        Ok(())
    }
}

impl Default for ArbitrumConfig {
    fn default() -> Self {
        Self::new(ArbitrumNetwork::Sepolia)
    }
}

// Keeps the signing key out of logs.
impl fmt::Debug for ArbitrumConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArbitrumConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.get_rpc_url())
            .field("contract_address", &self.contract_address)
            .field("usdc_address", &self.usdc_address)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("account", &self.account)
            .field("receipt_poll_interval", &self.receipt_poll_interval)
            .field("receipt_timeout", &self.receipt_timeout)
            .finish()
    }
}

fn read_address(var: &'static str) -> Result<Option<Address>, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => value
            .parse()
            .map(Some)
            .map_err(|source| ConfigError::InvalidAddress { var, source }),
        _ => Ok(None),
    }
}

fn read_number(var: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x1111111111111111111111111111111111111111";

    fn configured() -> ArbitrumConfig {
        ArbitrumConfig::default().with_contract_address(CONTRACT.parse().unwrap())
    }

    #[test]
    fn sepolia_defaults() {
        let config = configured();
        assert_eq!(config.get_rpc_url(), "https://sepolia-rollup.arbitrum.io/rpc");
        assert_eq!(config.network.chain_id(), 421_614);
        assert_eq!(
            config.get_usdc_address().unwrap(),
            SEPOLIA_USDC.parse::<Address>().unwrap()
        );
        assert_eq!(config.network_name(), "arbitrum-sepolia");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn network_names_parse() {
        assert_eq!("Sepolia".parse::<ArbitrumNetwork>().unwrap(), ArbitrumNetwork::Sepolia);
        assert_eq!("one".parse::<ArbitrumNetwork>().unwrap(), ArbitrumNetwork::One);
        assert_eq!("local".parse::<ArbitrumNetwork>().unwrap(), ArbitrumNetwork::Local);
        assert!("goerli".parse::<ArbitrumNetwork>().is_err());
    }

    #[test]
    fn validation_catches_bad_settings() {
        assert!(ArbitrumConfig::default().validate().is_err());

        let bad_url = configured().with_rpc_url("ws://localhost:8547");
        assert!(bad_url.validate().is_err());

        let bad_key = configured().with_private_key("0x1234");
        assert!(bad_key.validate().is_err());

        let local = ArbitrumConfig::new(ArbitrumNetwork::Local)
            .with_contract_address(CONTRACT.parse().unwrap());
        assert!(local.validate().is_err());
        assert!(
            local
                .with_usdc_address(CONTRACT.parse().unwrap())
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn debug_redacts_private_key() {
        let config = configured().with_private_key(format!("0x{}", "ab".repeat(32)));
        let rendered = format!("{config:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("abab"));
    }
}
