//! Fee gate: balance/allowance preconditions for fee-bearing operations.

use serde::{Deserialize, Serialize};

use crate::types::{Balance, FEE_ASSET_DECIMALS};

/// Flat protocol fee charged on swap/bridge operations: 3 USDT, compared
/// in subunits.
pub const REQUIRED_FEE_SUBUNITS: Balance = 3 * 10u128.pow(FEE_ASSET_DECIMALS as u32);

/// Per-account fee readiness, recomputed on every refresh cycle and never
/// persisted across them.
///
/// The gate is advisory: it surfaces a warning but never blocks a
/// submission - the ledger enforces the real constraint. The default is
/// fail-closed because a false negative only shows a warning, while a
/// false positive would hide one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeStatus {
    pub balance: Balance,
    pub allowance: Balance,
    pub has_balance: bool,
    pub has_allowance: bool,
}

impl FeeStatus {
    pub fn from_amounts(balance: Balance, allowance: Balance) -> Self {
        Self {
            balance,
            allowance,
            has_balance: balance >= REQUIRED_FEE_SUBUNITS,
            has_allowance: allowance >= REQUIRED_FEE_SUBUNITS,
        }
    }

    /// The substitute when the fee read fails.
    pub fn fail_closed() -> Self {
        Self::default()
    }

    pub fn needs_warning(&self) -> bool {
        !self.has_balance || !self.has_allowance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fee_is_three_usdt() {
        assert_eq!(REQUIRED_FEE_SUBUNITS, 3_000_000);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let exact = FeeStatus::from_amounts(REQUIRED_FEE_SUBUNITS, REQUIRED_FEE_SUBUNITS);
        assert!(exact.has_balance);
        assert!(exact.has_allowance);
        assert!(!exact.needs_warning());

        let short = FeeStatus::from_amounts(REQUIRED_FEE_SUBUNITS - 1, REQUIRED_FEE_SUBUNITS);
        assert!(!short.has_balance);
        assert!(short.needs_warning());
    }

    #[test]
    fn test_warning_on_either_missing_side() {
        let no_allowance = FeeStatus::from_amounts(REQUIRED_FEE_SUBUNITS * 2, 0);
        assert!(no_allowance.has_balance);
        assert!(!no_allowance.has_allowance);
        assert!(no_allowance.needs_warning());
    }

    #[test]
    fn test_fail_closed_default() {
        let status = FeeStatus::fail_closed();
        assert_eq!(status.balance, 0);
        assert_eq!(status.allowance, 0);
        assert!(!status.has_balance);
        assert!(!status.has_allowance);
        assert!(status.needs_warning());
    }
}
