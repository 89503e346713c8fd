//! Derived running-balance reconstruction.
//!
//! Authoritative balances live on each ledger row (`balance_after`, written
//! inside the atomic commit). The derivation here reconstructs them from the
//! snapshot quantity alone; it is kept for display verification and as a
//! cross-check that the log window is complete.

use crate::transaction::InventoryTransaction;

/// Reconstruct the balance immediately *after* each transaction.
///
/// `transactions_desc` must be ordered most-recent-first. Given the current
/// snapshot quantity `Q`:
///
/// ```text
/// B[0] = Q
/// B[i] = B[i-1] - T[i-1].quantity
/// ```
///
/// Undoing the more-recent transaction's delta yields the balance that
/// existed right after the next-older one. The recurrence is only correct
/// when the window has no gaps and `Q` equals the sum of all deltas to date.
pub fn running_balances(
    snapshot_quantity: i64,
    transactions_desc: &[InventoryTransaction],
) -> Vec<i64> {
    let mut balances = Vec::with_capacity(transactions_desc.len());
    let mut balance = snapshot_quantity;
    for tx in transactions_desc {
        balances.push(balance);
        balance -= tx.quantity;
    }
    balances
}

/// Index of the first transaction whose recorded `balance_after` disagrees
/// with the derived reconstruction, if any.
///
/// A divergence means the window is incomplete or the snapshot has drifted
/// from the ledger sum; either way the recorded balances are the ones to
/// trust and the drift should be surfaced for reconciliation.
pub fn first_divergence(
    snapshot_quantity: i64,
    transactions_desc: &[InventoryTransaction],
) -> Option<usize> {
    let derived = running_balances(snapshot_quantity, transactions_desc);
    transactions_desc
        .iter()
        .zip(derived.iter())
        .position(|(tx, b)| tx.balance_after != *b)
}
