//! Sweep eligibility and amount computation.
//!
//! Pure decision logic: given a wallet's pending deposit balance,
//! decide whether to sweep and how much to send. The transfer fee is
//! left behind in the deposit wallet to pay for the transaction.

use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Sweep policy configuration.
#[derive(Debug, Clone)]
pub struct SweepPolicy {
    /// Minimum pending balance for a wallet to be swept at all.
    pub collect_threshold: Decimal,
    /// Flat fee reserved to cover the sweep transaction.
    pub transfer_fee: Decimal,
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Outcome of evaluating a wallet's pending balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepDecision {
    /// Pending balance below the collect threshold; leave the wallet alone.
    Skip,
    /// Sweep `amount` (pending minus the transfer fee) to the master wallet.
    Sweep { amount: Decimal },
}

/// The pending balance cleared the threshold but does not cover the
/// transfer fee, so a sweep would send a non-positive amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pending balance {pending} does not cover transfer fee {fee}")]
pub struct InsufficientAfterFee {
    pub pending: Decimal,
    pub fee: Decimal,
}

impl SweepPolicy {
    pub fn new(collect_threshold: Decimal, transfer_fee: Decimal) -> Self {
        Self {
            collect_threshold,
            transfer_fee,
        }
    }

    /// Decide whether a wallet with the given pending balance should be
    /// swept. Threshold comparison is inclusive: a balance exactly at
    /// the threshold is eligible.
    pub fn decide(&self, pending: Decimal) -> Result<SweepDecision, InsufficientAfterFee> {
        if pending < self.collect_threshold {
            return Ok(SweepDecision::Skip);
        }
        let amount = pending - self.transfer_fee;
        if amount <= Decimal::ZERO {
            return Err(InsufficientAfterFee {
                pending,
                fee: self.transfer_fee,
            });
        }
        Ok(SweepDecision::Sweep { amount })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
