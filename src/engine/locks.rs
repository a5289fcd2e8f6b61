//! Per-wallet exclusion locks.
//!
//! The sweep path and any other process touching a deposit wallet
//! (withdrawal processing, balance audits) must serialize on the same
//! guard. The table hands out exactly one guard per wallet address;
//! entries are created on first use and kept for the life of the
//! process, so two callers asking for the same address always receive
//! the same mutex.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-wide registry of per-wallet guards.
pub struct WalletLockTable {
    guards: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl WalletLockTable {
    pub fn new() -> Self {
        Self {
            guards: Mutex::new(HashMap::new()),
        }
    }

    /// The guard for a wallet address, created atomically on first use.
    ///
    /// The guard is an async mutex: the critical section it protects
    /// awaits chain calls and must not block the runtime.
    pub fn guard_for(&self, wallet_address: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut guards = self.guards.lock().unwrap();
        guards
            .entry(wallet_address.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

impl Default for WalletLockTable {
    fn default() -> Self {
        Self::new()
    }
}
