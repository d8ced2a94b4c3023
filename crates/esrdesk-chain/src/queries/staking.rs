//! ESR staking queries.

use serde::Deserialize;
use serde_json::json;

use crate::RouterClient;
use crate::error::GatewayError;
use esrdesk_core::{
    Address, StakePosition, StakingStats, amount::parse_units, types::ESR_DECIMALS,
    types::FEE_ASSET_DECIMALS,
};

#[derive(Debug, Deserialize)]
struct WireStakeInfo {
    amount: String,
    staked_at: u64,
    lock_ends_at: u64,
    pending_rewards: String,
}

#[derive(Debug, Deserialize)]
struct WireStakingStats {
    total_staked: String,
    total_stakers: u32,
    total_rewards_distributed: String,
    reward_pool: String,
    /// Percentage figure, display only.
    current_apr: String,
    last_distribution: u64,
}

fn position_from_wire(w: WireStakeInfo) -> Result<StakePosition, GatewayError> {
    Ok(StakePosition {
        amount: parse_units(&w.amount, ESR_DECIMALS)?,
        staked_at: w.staked_at,
        lock_ends_at: w.lock_ends_at,
        pending_reward: parse_units(&w.pending_rewards, FEE_ASSET_DECIMALS)?,
    })
}

fn stats_from_wire(w: WireStakingStats) -> Result<StakingStats, GatewayError> {
    let current_apr = w
        .current_apr
        .parse::<f64>()
        .map_err(|e| GatewayError::InvalidData(format!("current_apr: {e}")))?;

    Ok(StakingStats {
        total_staked: parse_units(&w.total_staked, ESR_DECIMALS)?,
        total_stakers: w.total_stakers,
        total_rewards_distributed: parse_units(&w.total_rewards_distributed, FEE_ASSET_DECIMALS)?,
        reward_pool: parse_units(&w.reward_pool, FEE_ASSET_DECIMALS)?,
        current_apr: if current_apr.is_finite() && current_apr > 0.0 {
            current_apr
        } else {
            0.0
        },
        last_distribution: w.last_distribution,
    })
}

impl RouterClient {
    /// Get one account's stake position. The ledger computes
    /// `lock_ends_at`; the client never derives it locally.
    pub async fn fetch_stake_info(&self, account: Address) -> Result<StakePosition, GatewayError> {
        let wire: WireStakeInfo = self.call("esr_stakeInfo", json!([account])).await?;
        position_from_wire(wire)
    }

    /// Get aggregate staking-product figures.
    pub async fn fetch_staking_stats(&self) -> Result<StakingStats, GatewayError> {
        let wire: WireStakingStats = self.call("esr_stakingStats", json!([])).await?;
        stats_from_wire(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_wire() {
        let wire: WireStakeInfo = serde_json::from_str(
            r#"{
                "amount": "250",
                "staked_at": 1700000000,
                "lock_ends_at": 1700604800,
                "pending_rewards": "12.5"
            }"#,
        )
        .unwrap();

        let position = position_from_wire(wire).unwrap();
        assert_eq!(position.amount, 250 * 10u128.pow(18));
        assert_eq!(position.lock_ends_at, 1_700_604_800);
        assert_eq!(position.pending_reward, 12_500_000);
    }

    #[test]
    fn test_stats_from_wire_sanitizes_apr() {
        let make = |apr: &str| -> WireStakingStats {
            serde_json::from_str(&format!(
                r#"{{
                    "total_staked": "1000",
                    "total_stakers": 5,
                    "total_rewards_distributed": "300",
                    "reward_pool": "45",
                    "current_apr": "{apr}",
                    "last_distribution": 0
                }}"#
            ))
            .unwrap()
        };

        assert_eq!(stats_from_wire(make("12.5")).unwrap().current_apr, 12.5);
        assert_eq!(stats_from_wire(make("NaN")).unwrap().current_apr, 0.0);
        assert_eq!(stats_from_wire(make("inf")).unwrap().current_apr, 0.0);
        assert_eq!(stats_from_wire(make("-4")).unwrap().current_apr, 0.0);
        assert!(stats_from_wire(make("not a number")).is_err());
    }
}
