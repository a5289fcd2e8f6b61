//! Shared types for the sweep engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that chain, storage, and
//! engine modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// A wallet signing credential.
///
/// Wraps the raw key material so it can never appear in logs or
/// `Debug` output. The only way to read it back is `expose()`, which
/// is restricted to the chain client and the storage layer.
#[derive(Clone)]
pub struct WalletCredential(SecretString);

impl WalletCredential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::new(raw.into()))
    }

    /// Reveal the raw key material. Call sites are the transfer
    /// signer and the persistence record, nothing else.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for WalletCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletCredential([REDACTED])")
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// A custodial account with its dedicated deposit wallet.
///
/// `confirmed_balance` is the ledger balance already credited to the
/// user. `pending_deposit_balance` is what currently sits in the
/// deposit wallet awaiting collection.
#[derive(Debug, Clone)]
pub struct Account {
    pub user_id: String,
    pub deposit_address: String,
    pub deposit_key: WalletCredential,
    pub confirmed_balance: Decimal,
    pub pending_deposit_balance: Decimal,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "account {} ({}) confirmed={} pending={}",
            self.user_id, self.deposit_address, self.confirmed_balance, self.pending_deposit_balance,
        )
    }
}

impl Account {
    /// Helper to build a test account with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        use rust_decimal_macros::dec;
        Account {
            user_id: "user-001".to_string(),
            deposit_address: "0xdeadbeef00000000000000000000000000000001".to_string(),
            deposit_key: WalletCredential::new("test-key-001"),
            confirmed_balance: dec!(10.0),
            pending_deposit_balance: dec!(0.5),
        }
    }
}

/// The master wallet deposits are swept into.
#[derive(Debug, Clone)]
pub struct MasterWallet {
    pub address: String,
    pub key: WalletCredential,
}

impl fmt::Display for MasterWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "master wallet {}", self.address)
    }
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

/// Reference to a confirmed on-chain transfer.
#[derive(Debug, Clone)]
pub struct TxReference {
    pub hash: String,
    pub confirmed_at: DateTime<Utc>,
}

impl TxReference {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            confirmed_at: Utc::now(),
        }
    }
}

impl fmt::Display for TxReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx {}", self.hash)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
