//! One collect cycle.
//!
//! Walks every custodial account, sweeps eligible deposit wallets into
//! the master wallet under the wallet's exclusion guard, reconciles
//! mid-sweep deposits, and persists the new balances. A failure on one
//! wallet never stops the rest of the pass; only a missing account
//! list or master wallet aborts the cycle.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::chain::{BalanceService, MasterWalletResolver, TransferService};
use crate::engine::locks::WalletLockTable;
use crate::engine::policy::{InsufficientAfterFee, SweepDecision, SweepPolicy};
use crate::engine::reconcile::reconcile;
use crate::storage::AccountStore;
use crate::types::{Account, MasterWallet, TxReference};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failure that aborts the whole cycle before any wallet is touched.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("failed to list accounts: {0}")]
    AccountList(anyhow::Error),

    #[error("failed to resolve master wallet: {0}")]
    MasterWallet(anyhow::Error),
}

/// A failure confined to a single account.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    InsufficientAfterFee(#[from] InsufficientAfterFee),

    #[error("transfer failed: {0}")]
    Transfer(anyhow::Error),

    #[error("balance query failed: {0}")]
    BalanceQuery(anyhow::Error),

    #[error("persistence failed: {0}")]
    Persistence(anyhow::Error),
}

// ---------------------------------------------------------------------------
// Cycle report
// ---------------------------------------------------------------------------

/// A wallet successfully swept this cycle.
#[derive(Debug)]
pub struct SweptAccount {
    pub user_id: String,
    pub deposit_address: String,
    pub amount: Decimal,
    pub tx: TxReference,
    /// Amount credited for a deposit that landed mid-sweep. Zero when
    /// none was observed.
    pub deposit_during_sweep: Decimal,
}

/// A wallet whose sweep failed this cycle.
#[derive(Debug)]
pub struct FailedAccount {
    pub user_id: String,
    pub deposit_address: String,
    pub error: AccountError,
}

/// Summary of a single collect cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub accounts_seen: usize,
    pub skipped: usize,
    pub swept: Vec<SweptAccount>,
    pub failed: Vec<FailedAccount>,
    pub total_transferred: Decimal,
    pub deposits_during_sweep: Decimal,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seen={} swept={} skipped={} failed={} transferred={} mid_sweep_deposits={}",
            self.accounts_seen,
            self.swept.len(),
            self.skipped,
            self.failed.len(),
            self.total_transferred,
            self.deposits_during_sweep,
        )
    }
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// Runs collect cycles against the configured collaborators.
pub struct Collector {
    store: Arc<dyn AccountStore>,
    master: Arc<dyn MasterWalletResolver>,
    transfers: Arc<dyn TransferService>,
    balances: Arc<dyn BalanceService>,
    locks: Arc<WalletLockTable>,
    policy: SweepPolicy,
}

impl Collector {
    pub fn new(
        store: Arc<dyn AccountStore>,
        master: Arc<dyn MasterWalletResolver>,
        transfers: Arc<dyn TransferService>,
        balances: Arc<dyn BalanceService>,
        locks: Arc<WalletLockTable>,
        policy: SweepPolicy,
    ) -> Self {
        Self {
            store,
            master,
            transfers,
            balances,
            locks,
            policy,
        }
    }

    /// Run one full collect cycle over all accounts.
    pub async fn run(&self) -> Result<CycleReport, CycleError> {
        let started_at = Utc::now();
        info!("Running collect cycle");

        let accounts = self
            .store
            .list_all()
            .await
            .map_err(CycleError::AccountList)?;
        let master = self.master.resolve().await.map_err(CycleError::MasterWallet)?;

        let mut report = CycleReport {
            started_at,
            finished_at: started_at,
            accounts_seen: accounts.len(),
            skipped: 0,
            swept: Vec::new(),
            failed: Vec::new(),
            total_transferred: Decimal::ZERO,
            deposits_during_sweep: Decimal::ZERO,
        };

        for mut account in accounts {
            let amount = match self.policy.decide(account.pending_deposit_balance) {
                Ok(SweepDecision::Skip) => {
                    report.skipped += 1;
                    continue;
                }
                Ok(SweepDecision::Sweep { amount }) => amount,
                Err(e) => {
                    warn!(
                        user_id = %account.user_id,
                        wallet = %account.deposit_address,
                        error = %e,
                        "Sweep blocked"
                    );
                    report.failed.push(FailedAccount {
                        user_id: account.user_id.clone(),
                        deposit_address: account.deposit_address.clone(),
                        error: AccountError::InsufficientAfterFee(e),
                    });
                    continue;
                }
            };

            match self.sweep_account(&mut account, &master, amount).await {
                Ok(swept) => {
                    report.total_transferred += swept.amount;
                    report.deposits_during_sweep += swept.deposit_during_sweep;
                    report.swept.push(swept);
                }
                Err(e) => {
                    match &e {
                        AccountError::Persistence(_) => error!(
                            user_id = %account.user_id,
                            wallet = %account.deposit_address,
                            error = %e,
                            "Balances not persisted after sweep"
                        ),
                        _ => warn!(
                            user_id = %account.user_id,
                            wallet = %account.deposit_address,
                            error = %e,
                            "Sweep failed"
                        ),
                    }
                    report.failed.push(FailedAccount {
                        user_id: account.user_id.clone(),
                        deposit_address: account.deposit_address.clone(),
                        error: e,
                    });
                }
            }
        }

        report.finished_at = Utc::now();
        Ok(report)
    }

    /// Sweep one wallet under its exclusion guard.
    ///
    /// The guard is held across the transfer, the balance re-read, and
    /// the persistence write so nothing else can move funds in or out
    /// of the wallet's ledger entry in between.
    async fn sweep_account(
        &self,
        account: &mut Account,
        master: &MasterWallet,
        amount: Decimal,
    ) -> Result<SweptAccount, AccountError> {
        let guard = self.locks.guard_for(&account.deposit_address);
        let _held = guard.lock().await;

        let pre_sweep_pending = account.pending_deposit_balance;

        let tx = self
            .transfers
            .send(&account.deposit_key, &master.address, amount)
            .await
            .map_err(AccountError::Transfer)?;
        info!(
            user_id = %account.user_id,
            from = %account.deposit_address,
            to = %master.address,
            %amount,
            tx = %tx,
            "Swept deposit wallet"
        );

        let post_sweep_balance = self
            .balances
            .balance_of(&account.deposit_address)
            .await
            .map_err(AccountError::BalanceQuery)?;

        let outcome = reconcile(pre_sweep_pending, post_sweep_balance);
        if outcome.deposit_observed {
            info!(
                user_id = %account.user_id,
                wallet = %account.deposit_address,
                delta = %outcome.confirmed_delta,
                "Deposit arrived during sweep"
            );
        }
        account.confirmed_balance += outcome.confirmed_delta;
        account.pending_deposit_balance = outcome.new_pending;

        match self.store.update(account).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(AccountError::Persistence(anyhow::anyhow!(
                    "account no longer present in store"
                )))
            }
            Err(e) => return Err(AccountError::Persistence(e)),
        }

        Ok(SweptAccount {
            user_id: account.user_id.clone(),
            deposit_address: account.deposit_address.clone(),
            amount,
            tx,
            deposit_during_sweep: outcome.confirmed_delta,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
