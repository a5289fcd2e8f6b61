//! Persistence layer.
//!
//! Custodial accounts are kept in a JSON file. A relational store can
//! be swapped in later behind the same trait, but a flat file is
//! sufficient for the account list and balance updates the engine
//! needs.
//!
//! This module is the only place the deposit wallet key is written out
//! or read back; everywhere else it travels as a `WalletCredential`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{Account, WalletCredential};

/// Account persistence as seen by the sweep engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// All custodial accounts.
    async fn list_all(&self) -> Result<Vec<Account>>;

    /// Persist updated balances for an account. Returns `false` when
    /// the account is no longer present in the store.
    async fn update(&self, account: &Account) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// On-disk representation of an account.
#[derive(Debug, Serialize, Deserialize)]
struct AccountRecord {
    user_id: String,
    deposit_address: String,
    deposit_wallet_key: String,
    confirmed_balance: Decimal,
    pending_deposit_balance: Decimal,
}

impl AccountRecord {
    fn from_account(account: &Account) -> Self {
        Self {
            user_id: account.user_id.clone(),
            deposit_address: account.deposit_address.clone(),
            deposit_wallet_key: account.deposit_key.expose().to_string(),
            confirmed_balance: account.confirmed_balance,
            pending_deposit_balance: account.pending_deposit_balance,
        }
    }

    fn into_account(self) -> Account {
        Account {
            user_id: self.user_id,
            deposit_address: self.deposit_address,
            deposit_key: WalletCredential::new(self.deposit_wallet_key),
            confirmed_balance: self.confirmed_balance,
            pending_deposit_balance: self.pending_deposit_balance,
        }
    }
}

/// JSON-file-backed account store with atomic writes.
pub struct JsonAccountStore {
    path: PathBuf,
    /// Serializes file access across concurrent updates.
    file_lock: tokio::sync::Mutex<()>,
}

impl JsonAccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: tokio::sync::Mutex::new(()),
        }
    }

    fn read_records(&self) -> Result<Vec<AccountRecord>> {
        if !Path::new(&self.path).exists() {
            info!(path = %self.path.display(), "No account file found, starting empty");
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read accounts from {}", self.path.display()))?;
        let records: Vec<AccountRecord> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse accounts from {}", self.path.display()))?;
        Ok(records)
    }

    /// Write the full record set through a temp file and rename, so a
    /// crash mid-write never leaves a truncated account file.
    fn write_records(&self, records: &[AccountRecord]) -> Result<()> {
        let json =
            serde_json::to_string_pretty(records).context("Failed to serialise accounts")?;
        let temp_path = self.path.with_extension("temp");
        std::fs::write(&temp_path, &json)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = records.len(), "Accounts saved");
        Ok(())
    }
}

#[async_trait]
impl AccountStore for JsonAccountStore {
    async fn list_all(&self) -> Result<Vec<Account>> {
        let _held = self.file_lock.lock().await;
        let records = self.read_records()?;
        Ok(records.into_iter().map(AccountRecord::into_account).collect())
    }

    async fn update(&self, account: &Account) -> Result<bool> {
        let _held = self.file_lock.lock().await;
        let mut records = self.read_records()?;
        let Some(record) = records.iter_mut().find(|r| r.user_id == account.user_id) else {
            return Ok(false);
        };
        *record = AccountRecord::from_account(account);
        self.write_records(&records)?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
