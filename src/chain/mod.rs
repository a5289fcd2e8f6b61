//! Chain access.
//!
//! Defines the narrow interfaces the sweep engine consumes and provides
//! implementations backed by the internal custody gateway:
//! - `WalletGateway`: HTTP client for transfers and balance reads
//! - `EnvMasterWallet`: master wallet resolution from the environment

pub mod gateway;
pub mod master;

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::types::{MasterWallet, TxReference, WalletCredential};

/// Sends funds out of a deposit wallet.
///
/// `send` resolves only once the gateway has accepted and confirmed
/// the transfer: a returned `TxReference` means the funds have left
/// the wallet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferService: Send + Sync {
    async fn send(
        &self,
        from: &WalletCredential,
        to_address: &str,
        amount: Decimal,
    ) -> Result<TxReference>;
}

/// Reads the current on-chain balance of a wallet address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceService: Send + Sync {
    async fn balance_of(&self, wallet_address: &str) -> Result<Decimal>;
}

/// Resolves the master wallet the sweep pays into.
///
/// Resolution happens once per cycle so a key rotation is picked up
/// without a restart.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MasterWalletResolver: Send + Sync {
    async fn resolve(&self) -> Result<MasterWallet>;
}
