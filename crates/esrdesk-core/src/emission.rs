//! Emission share and APR calculations for farming pools.

use serde::{Deserialize, Serialize};

use crate::amount::to_display;
use crate::farm::FarmPool;
use crate::types::{Balance, ESR_DECIMALS, LP_DECIMALS};

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// ESR price used for APR, pending a price oracle. Documented
/// simplification: 1 ESR = 1 unit of account.
pub const REWARD_ASSET_PRICE: f64 = 1.0;

/// Protocol-wide emission figures, the denominator source for every APR.
///
/// Replaced wholesale on a successful refresh; a failed refresh leaves the
/// previous snapshot in place (initially all zeros).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionSnapshot {
    pub total_pools: u32,
    /// Sum of ACTIVE pools' allocation weights.
    pub total_active_weight: u64,
    /// ESR emitted per second, protocol wide, in subunits.
    pub emission_per_second: Balance,
    /// Aggregate value locked across pools, in subunits.
    pub total_value_locked: Balance,
}

/// A pool's fraction of total emissions, in [0, 1].
///
/// Inactive and zero-weight pools earn 0 regardless of stake; a zero
/// denominator yields 0 rather than NaN.
pub fn emission_share(pool: &FarmPool, snapshot: &EmissionSnapshot) -> f64 {
    if !pool.earns_emissions() || snapshot.total_active_weight == 0 {
        return 0.0;
    }
    pool.weight as f64 / snapshot.total_active_weight as f64
}

/// Annualized percentage return for a pool, derived from the current
/// emission rate and the pool's TVL:
///
/// ```text
/// emission_per_day  = emission_per_second * 86_400
/// pool_emission_day = emission_per_day * share
/// daily_return      = (pool_emission_day * price) / total_staked
/// apr               = daily_return * 365 * 100
/// ```
///
/// Never negative, never NaN or infinite: every degenerate denominator
/// normalizes to 0.
pub fn pool_apr(pool: &FarmPool, snapshot: &EmissionSnapshot) -> f64 {
    let share = emission_share(pool, snapshot);
    if share == 0.0 {
        return 0.0;
    }
    let total_staked = to_display(pool.total_staked, LP_DECIMALS);
    if total_staked == 0.0 {
        return 0.0;
    }

    let emission_per_day = to_display(snapshot.emission_per_second, ESR_DECIMALS) * SECONDS_PER_DAY;
    let pool_emission_per_day = emission_per_day * share;
    let daily_return_rate = (pool_emission_per_day * REWARD_ASSET_PRICE) / total_staked;
    let apr = daily_return_rate * DAYS_PER_YEAR * 100.0;

    if apr.is_finite() && apr > 0.0 { apr } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;
    use approx::assert_relative_eq;

    fn esr(units: u128) -> Balance {
        units * 10u128.pow(ESR_DECIMALS as u32)
    }

    fn lp(units: u128) -> Balance {
        units * 10u128.pow(LP_DECIMALS as u32)
    }

    fn pool(weight: u64, active: bool, total_staked: Balance) -> FarmPool {
        FarmPool {
            id: 0,
            name: "ESR-USDT".into(),
            lp_token: Address::from([0u8; 20]),
            weight,
            active,
            total_staked,
            user_staked: 0,
            pending_reward: 0,
        }
    }

    fn snapshot(total_active_weight: u64, emission_per_second: Balance) -> EmissionSnapshot {
        EmissionSnapshot {
            total_pools: 4,
            total_active_weight,
            emission_per_second,
            total_value_locked: 0,
        }
    }

    #[test]
    fn test_share_basic() {
        let snap = snapshot(200, esr(2));
        assert_relative_eq!(emission_share(&pool(50, true, 0), &snap), 0.25);
        assert_relative_eq!(emission_share(&pool(200, true, 0), &snap), 1.0);
    }

    #[test]
    fn test_shares_of_active_pools_sum_to_one() {
        let weights = [50u64, 30, 100, 20];
        let snap = snapshot(weights.iter().sum(), esr(1));
        let total: f64 = weights
            .iter()
            .map(|&w| emission_share(&pool(w, true, 0), &snap))
            .sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inactive_or_zero_weight_pool_has_no_share() {
        let snap = snapshot(200, esr(2));
        assert_eq!(emission_share(&pool(50, false, 0), &snap), 0.0);
        assert_eq!(emission_share(&pool(0, true, 0), &snap), 0.0);
    }

    #[test]
    fn test_share_zero_denominator() {
        let snap = snapshot(0, esr(2));
        assert_eq!(emission_share(&pool(50, true, 0), &snap), 0.0);
    }

    #[test]
    fn test_apr_worked_example() {
        // weight 50 of 200, 2 ESR/s, 1000 LP staked:
        // share 0.25, pool emission/day 43_200, daily return 43.2,
        // APR 1_576_800%.
        let snap = snapshot(200, esr(2));
        let p = pool(50, true, lp(1000));
        assert_relative_eq!(emission_share(&p, &snap), 0.25);
        assert_relative_eq!(pool_apr(&p, &snap), 1_576_800.0, epsilon = 1e-6);
    }

    #[test]
    fn test_apr_zero_cases() {
        // Each degenerate denominator yields 0, never NaN or infinity.
        let p = pool(50, true, lp(1000));
        assert_eq!(pool_apr(&p, &snapshot(200, 0)), 0.0);
        assert_eq!(pool_apr(&p, &snapshot(0, esr(2))), 0.0);
        assert_eq!(pool_apr(&pool(50, true, 0), &snapshot(200, esr(2))), 0.0);
        assert_eq!(pool_apr(&pool(0, true, lp(10)), &snapshot(200, esr(2))), 0.0);
        assert_eq!(
            pool_apr(&pool(50, false, lp(10)), &snapshot(200, esr(2))),
            0.0
        );
    }

    #[test]
    fn test_apr_is_finite_for_extreme_inputs() {
        let p = pool(u64::MAX, true, 1);
        let snap = snapshot(u64::MAX, Balance::MAX);
        let apr = pool_apr(&p, &snap);
        assert!(apr.is_finite());
        assert!(apr >= 0.0);
    }
}
