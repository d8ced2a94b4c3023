//! Farming pool snapshot types and pending-reward aggregation.

use serde::{Deserialize, Serialize};

use crate::types::{Address, Balance};

/// One LP-farming pool as last reported by the ledger.
///
/// Rebuilt wholesale on every refresh; the per-account fields default to
/// zero when their read failed, so aggregation never has to special-case a
/// missing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmPool {
    /// Ledger pool index, stable per deployment.
    pub id: u32,
    pub name: String,
    pub lp_token: Address,
    /// Allocation weight (allocation points). Weight 0 earns nothing.
    pub weight: u64,
    pub active: bool,
    /// Total LP tokens staked in the pool, in subunits.
    pub total_staked: Balance,
    /// The context account's staked LP amount, in subunits.
    pub user_staked: Balance,
    /// The context account's pending ESR reward, in subunits.
    pub pending_reward: Balance,
}

impl FarmPool {
    /// True if the pool participates in emissions at all.
    pub fn earns_emissions(&self) -> bool {
        self.active && self.weight > 0
    }

    pub fn has_pending_reward(&self) -> bool {
        self.pending_reward > 0
    }
}

/// Sum of pending rewards across pools.
///
/// Per-pool read failures were already defaulted to zero at the gateway
/// edge, so one bad pool never poisons the aggregate.
pub fn total_pending(pools: &[FarmPool]) -> Balance {
    pools
        .iter()
        .fold(0, |sum, p| sum.saturating_add(p.pending_reward))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(id: u32, pending: Balance) -> FarmPool {
        FarmPool {
            id,
            name: format!("POOL-{id}"),
            lp_token: Address::from([id as u8; 20]),
            weight: 100,
            active: true,
            total_staked: 0,
            user_staked: 0,
            pending_reward: pending,
        }
    }

    #[test]
    fn test_total_pending_sums_all_pools() {
        let pools = vec![pool(0, 10), pool(1, 25), pool(2, 5)];
        assert_eq!(total_pending(&pools), 40);
    }

    #[test]
    fn test_total_pending_tolerates_defaulted_pools() {
        // Pool 1's user_farm_info read failed upstream and was defaulted
        // to zero; the aggregate still reflects the other pools.
        let pools = vec![pool(0, 10), pool(1, 0), pool(2, 5)];
        assert_eq!(total_pending(&pools), 15);
    }

    #[test]
    fn test_total_pending_empty() {
        assert_eq!(total_pending(&[]), 0);
    }

    #[test]
    fn test_total_pending_saturates() {
        let pools = vec![pool(0, Balance::MAX), pool(1, 1)];
        assert_eq!(total_pending(&pools), Balance::MAX);
    }

    #[test]
    fn test_earns_emissions() {
        let mut p = pool(0, 0);
        assert!(p.earns_emissions());
        p.weight = 0;
        assert!(!p.earns_emissions());
        p.weight = 100;
        p.active = false;
        assert!(!p.earns_emissions());
    }
}
