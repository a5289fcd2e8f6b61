//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (the gateway API key, the master wallet address and key)
//! are referenced by env-var name in the config and resolved at
//! runtime via `std::env::var`.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub chain: ChainConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Delay between the end of one sweep cycle and the start of the next.
    pub cycle_interval_secs: u64,
    /// Minimum pending deposit balance for a wallet to be swept.
    pub collect_threshold: Decimal,
    /// Flat fee reserved in the deposit wallet to cover the transfer.
    pub transfer_fee: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub gateway_url: String,
    pub request_timeout_secs: u64,
    pub api_key_env: String,
    pub master_wallet_address_env: String,
    pub master_wallet_key_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub accounts_file: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
