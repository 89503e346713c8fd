//! Pure quantity math for adjustments and reversals.

use serde::{Deserialize, Serialize};

use millstock_core::{DomainError, DomainResult};

use crate::transaction::TransactionKind;

/// How an adjustment's magnitude is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustMode {
    /// Set quantity-on-hand to the magnitude.
    Set,
    /// Increase quantity-on-hand by the magnitude.
    Add,
    /// Decrease quantity-on-hand by the magnitude.
    Subtract,
}

/// Signed delta an adjustment produces against the current quantity.
pub fn adjustment_delta(mode: AdjustMode, magnitude: i64, current: i64) -> i64 {
    match mode {
        AdjustMode::Set => magnitude - current,
        AdjustMode::Add => magnitude,
        AdjustMode::Subtract => -magnitude,
    }
}

/// Signed delta a reversal writes for `quantity_to_reverse` units of a prior
/// entry whose signed quantity was `original_quantity`.
///
/// Supports partial reversal up to the magnitude of the original. The result
/// is the negation of the reversed portion: reversing 7 units of a `-7`
/// issue yields `+7`.
pub fn reversal_delta(original_quantity: i64, quantity_to_reverse: i64) -> DomainResult<i64> {
    if original_quantity == 0 {
        return Err(DomainError::validation(
            "cannot reverse a zero-quantity transaction",
        ));
    }
    if quantity_to_reverse <= 0 {
        return Err(DomainError::validation(
            "quantity to reverse must be positive",
        ));
    }
    if quantity_to_reverse > original_quantity.abs() {
        return Err(DomainError::validation(format!(
            "quantity to reverse ({quantity_to_reverse}) exceeds original magnitude ({})",
            original_quantity.abs()
        )));
    }
    Ok(-original_quantity.signum() * quantity_to_reverse)
}

/// Ledger kind for a reversal entry: `return` when the reversal restores
/// stock, `adjustment` when it removes stock.
pub fn reversal_kind(original_quantity: i64) -> TransactionKind {
    if original_quantity < 0 {
        TransactionKind::Return
    } else {
        TransactionKind::Adjustment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn set_mode_yields_difference_from_current() {
        assert_eq!(adjustment_delta(AdjustMode::Set, 50, 30), 20);
        assert_eq!(adjustment_delta(AdjustMode::Set, 30, 30), 0);
        assert_eq!(adjustment_delta(AdjustMode::Set, 0, 12), -12);
    }

    #[test]
    fn add_and_subtract_ignore_current() {
        assert_eq!(adjustment_delta(AdjustMode::Add, 5, 100), 5);
        assert_eq!(adjustment_delta(AdjustMode::Subtract, 5, 100), -5);
    }

    #[test]
    fn full_reversal_negates_the_original() {
        assert_eq!(reversal_delta(-7, 7).unwrap(), 7);
        assert_eq!(reversal_delta(7, 7).unwrap(), -7);
    }

    #[test]
    fn partial_reversal_negates_the_portion() {
        assert_eq!(reversal_delta(-10, 4).unwrap(), 4);
        assert_eq!(reversal_delta(10, 4).unwrap(), -4);
    }

    #[test]
    fn reversal_beyond_original_magnitude_is_rejected() {
        let err = reversal_delta(-7, 8).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("exceeds original magnitude")),
            _ => panic!("expected Validation"),
        }
    }

    #[test]
    fn non_positive_reversal_quantity_is_rejected() {
        assert!(reversal_delta(-7, 0).is_err());
        assert!(reversal_delta(-7, -2).is_err());
    }

    #[test]
    fn reversal_kind_depends_on_original_sign() {
        assert_eq!(reversal_kind(-7), TransactionKind::Return);
        assert_eq!(reversal_kind(7), TransactionKind::Adjustment);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a full reversal exactly cancels the original delta.
        #[test]
        fn full_reversal_cancels_original(original in -1_000_000i64..1_000_000i64) {
            prop_assume!(original != 0);
            let rev = reversal_delta(original, original.abs()).unwrap();
            prop_assert_eq!(original + rev, 0);
        }

        /// Property: `set` followed by applying the delta lands exactly on
        /// the requested magnitude.
        #[test]
        fn set_delta_lands_on_target(
            magnitude in -1_000_000i64..1_000_000i64,
            current in -1_000_000i64..1_000_000i64,
        ) {
            let delta = adjustment_delta(AdjustMode::Set, magnitude, current);
            prop_assert_eq!(current + delta, magnitude);
        }
    }
}
