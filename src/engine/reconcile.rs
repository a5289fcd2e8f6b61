//! Post-sweep balance reconciliation.
//!
//! After a sweep transfer confirms, the deposit wallet is re-read.
//! Normally the remaining balance is just fee dust. If the balance is
//! instead *higher* than it was before the sweep, a deposit landed
//! while the transfer was in flight: the delta is credited to the
//! user's confirmed balance and the full re-read balance becomes the
//! new pending amount, to be collected on a later cycle.

use rust_decimal::Decimal;

/// Result of reconciling a wallet after a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Amount to add to the user's confirmed balance.
    pub confirmed_delta: Decimal,
    /// The wallet's new pending deposit balance.
    pub new_pending: Decimal,
    /// Whether a mid-sweep deposit was observed.
    pub deposit_observed: bool,
}

/// Reconcile the balance read after a sweep against the pending
/// balance captured before it.
pub fn reconcile(pre_sweep_pending: Decimal, post_sweep_balance: Decimal) -> Reconciliation {
    if post_sweep_balance > pre_sweep_pending {
        Reconciliation {
            confirmed_delta: post_sweep_balance - pre_sweep_pending,
            new_pending: post_sweep_balance,
            deposit_observed: true,
        }
    } else {
        Reconciliation {
            confirmed_delta: Decimal::ZERO,
            new_pending: post_sweep_balance,
            deposit_observed: false,
        }
    }
}
