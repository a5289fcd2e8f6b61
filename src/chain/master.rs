//! Master wallet resolution.
//!
//! The master wallet address and key live in the environment, named by
//! config. Resolution is done fresh on every call so the engine picks
//! up a rotated key at the next cycle without a restart.

use anyhow::Result;
use async_trait::async_trait;

use super::MasterWalletResolver;
use crate::config::{AppConfig, ChainConfig};
use crate::types::{MasterWallet, WalletCredential};

/// Environment-backed master wallet resolver.
pub struct EnvMasterWallet {
    address_env: String,
    key_env: String,
}

impl EnvMasterWallet {
    pub fn from_config(config: &ChainConfig) -> Self {
        Self {
            address_env: config.master_wallet_address_env.clone(),
            key_env: config.master_wallet_key_env.clone(),
        }
    }
}

#[async_trait]
impl MasterWalletResolver for EnvMasterWallet {
    async fn resolve(&self) -> Result<MasterWallet> {
        let address = AppConfig::resolve_env(&self.address_env)?;
        let key = AppConfig::resolve_env(&self.key_env)?;
        Ok(MasterWallet {
            address,
            key: WalletCredential::new(key),
        })
    }
}
