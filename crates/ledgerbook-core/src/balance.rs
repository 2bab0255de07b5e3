//! # Balance Arithmetic
//!
//! Pure functions for derived-balance bookkeeping and invoice math.
//!
//! ## Derived Balance Tracking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Movement Delta Semantics                             │
//! │                                                                         │
//! │  Movement            Delta                    Example (balance = 10)    │
//! │  ────────            ─────                    ───────────────────────   │
//! │  IN qty=4            +4                       10 → 14                   │
//! │  OUT qty=3           −3                       10 → 7                    │
//! │  ADJUSTMENT qty=20   target − current = +10   10 → 20                   │
//! │                                                                         │
//! │  ADJUSTMENT is affine in the current balance: whatever the prior        │
//! │  state, balance_after always lands on the user-specified target.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is deterministic and stateless - given the same
//! inputs it always returns the same result. The store crate relies on that
//! when it recomputes balances inside a mutation session.

use crate::types::MovementType;

/// Computes the signed stock delta for a movement.
///
/// For `In`/`Out` the delta is affine in `quantity`; for `Adjustment` the
/// `quantity` argument is the target balance and the delta is
/// `target − current_balance`.
#[inline]
pub fn movement_delta(kind: MovementType, quantity: f64, current_balance: f64) -> f64 {
    match kind {
        MovementType::In => quantity,
        MovementType::Out => -quantity,
        MovementType::Adjustment => quantity - current_balance,
    }
}

/// Applies a movement to a balance, returning `(delta, new_balance)`.
#[inline]
pub fn apply_movement(kind: MovementType, quantity: f64, current_balance: f64) -> (f64, f64) {
    let delta = movement_delta(kind, quantity, current_balance);
    (delta, current_balance + delta)
}

/// Line total: `quantity × unit_price`.
#[inline]
pub fn line_total(quantity: f64, unit_price: f64) -> f64 {
    quantity * unit_price
}

/// Line profit: `quantity × (unit_price − buy_price)`.
#[inline]
pub fn line_profit(quantity: f64, unit_price: f64, buy_price: f64) -> f64 {
    quantity * (unit_price - buy_price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_and_out_deltas() {
        assert_eq!(movement_delta(MovementType::In, 4.0, 10.0), 4.0);
        assert_eq!(movement_delta(MovementType::Out, 3.0, 10.0), -3.0);
    }

    #[test]
    fn test_adjustment_hits_target_regardless_of_prior_state() {
        for current in [-5.0, 0.0, 7.0, 20.0, 100.0] {
            let (_, new_balance) = apply_movement(MovementType::Adjustment, 20.0, current);
            assert_eq!(new_balance, 20.0);
        }
    }

    #[test]
    fn test_adjustment_to_current_value_is_a_noop() {
        let (delta, new_balance) = apply_movement(MovementType::Adjustment, 20.0, 20.0);
        assert_eq!(delta, 0.0);
        assert_eq!(new_balance, 20.0);
    }

    #[test]
    fn test_line_math() {
        assert_eq!(line_total(3.0, 9.0), 27.0);
        assert_eq!(line_profit(3.0, 9.0, 5.0), 12.0);
    }

    #[test]
    fn test_running_balance_reconciles() {
        // Q0 + Σ deltas must equal the final balance at every step.
        let mut balance = 10.0;
        let moves = [
            (MovementType::Out, 3.0),
            (MovementType::In, 5.0),
            (MovementType::Adjustment, 20.0),
            (MovementType::Out, 4.0),
        ];

        let mut sum_of_deltas = 0.0;
        for (kind, qty) in moves {
            let (delta, new_balance) = apply_movement(kind, qty, balance);
            sum_of_deltas += delta;
            balance = new_balance;
        }

        assert_eq!(balance, 16.0);
        assert_eq!(10.0 + sum_of_deltas, balance);
    }
}
