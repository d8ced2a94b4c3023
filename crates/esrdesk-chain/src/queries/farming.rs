//! Farming pool queries.

use serde::Deserialize;
use serde_json::json;

use crate::RouterClient;
use crate::error::GatewayError;
use crate::gateway::UserFarmInfo;
use esrdesk_core::{
    Address, EmissionSnapshot, FarmPool, amount::parse_units, types::ESR_DECIMALS,
    types::LP_DECIMALS,
};

/// One pool row as the router reports it. Amounts are decimal strings.
#[derive(Debug, Deserialize)]
struct WirePool {
    id: u32,
    name: String,
    lp_token: Address,
    alloc_point: u64,
    is_active: bool,
    total_staked: String,
}

#[derive(Debug, Deserialize)]
struct WireFarmingStats {
    total_pools: u32,
    total_alloc_point: u64,
    esr_per_second: String,
    total_value_locked: String,
}

#[derive(Debug, Deserialize)]
struct WireUserFarmInfo {
    amount: String,
    pending_rewards: String,
}

fn pool_from_wire(p: WirePool) -> Result<FarmPool, GatewayError> {
    Ok(FarmPool {
        id: p.id,
        name: p.name,
        lp_token: p.lp_token,
        weight: p.alloc_point,
        active: p.is_active,
        total_staked: parse_units(&p.total_staked, LP_DECIMALS)?,
        user_staked: 0,
        pending_reward: 0,
    })
}

fn stats_from_wire(w: WireFarmingStats) -> Result<EmissionSnapshot, GatewayError> {
    Ok(EmissionSnapshot {
        total_pools: w.total_pools,
        total_active_weight: w.total_alloc_point,
        emission_per_second: parse_units(&w.esr_per_second, ESR_DECIMALS)?,
        total_value_locked: parse_units(&w.total_value_locked, LP_DECIMALS)?,
    })
}

impl RouterClient {
    /// Get all farming pools in ledger index order. Per-account fields are
    /// zero; they are filled by `fetch_user_farm_info` per pool.
    pub async fn fetch_pools(&self) -> Result<Vec<FarmPool>, GatewayError> {
        let wire: Vec<WirePool> = self.call("esr_listPools", json!([])).await?;

        let mut pools = wire
            .into_iter()
            .map(pool_from_wire)
            .collect::<Result<Vec<_>, _>>()?;

        // Ledger index order is the display order.
        pools.sort_by_key(|p| p.id);

        tracing::debug!("Fetched {} farming pools", pools.len());
        Ok(pools)
    }

    /// Get protocol-wide emission figures.
    pub async fn fetch_farming_stats(&self) -> Result<EmissionSnapshot, GatewayError> {
        let wire: WireFarmingStats = self.call("esr_farmingStats", json!([])).await?;
        stats_from_wire(wire)
    }

    /// Get one account's stake and pending reward in one pool.
    pub async fn fetch_user_farm_info(
        &self,
        pool_id: u32,
        account: Address,
    ) -> Result<UserFarmInfo, GatewayError> {
        let wire: WireUserFarmInfo = self
            .call("esr_userFarmInfo", json!([pool_id, account]))
            .await?;
        Ok(UserFarmInfo {
            staked: parse_units(&wire.amount, LP_DECIMALS)?,
            pending_reward: parse_units(&wire.pending_rewards, ESR_DECIMALS)?,
        })
    }

    /// Get the protocol owner account, for the distribute-rewards
    /// capability check.
    pub async fn fetch_protocol_owner(&self) -> Result<Address, GatewayError> {
        let owner: Address = self.call("esr_owner", json!([])).await?;
        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_from_wire() {
        let wire: WirePool = serde_json::from_str(
            r#"{
                "id": 2,
                "name": "ESR-USDT",
                "lp_token": "0x00112233445566778899aabbccddeeff00112233",
                "alloc_point": 50,
                "is_active": true,
                "total_staked": "1000.5"
            }"#,
        )
        .unwrap();

        let pool = pool_from_wire(wire).unwrap();
        assert_eq!(pool.id, 2);
        assert_eq!(pool.weight, 50);
        assert!(pool.active);
        assert_eq!(pool.total_staked, 1_000_500_000_000_000_000_000);
        // Per-account fields are filled by a separate, later fetch.
        assert_eq!(pool.user_staked, 0);
        assert_eq!(pool.pending_reward, 0);
    }

    #[test]
    fn test_pool_from_wire_rejects_bad_amount() {
        let wire: WirePool = serde_json::from_str(
            r#"{
                "id": 0,
                "name": "BAD",
                "lp_token": "0x00112233445566778899aabbccddeeff00112233",
                "alloc_point": 0,
                "is_active": false,
                "total_staked": "12,5"
            }"#,
        )
        .unwrap();
        assert!(pool_from_wire(wire).is_err());
    }

    #[test]
    fn test_stats_from_wire() {
        let wire: WireFarmingStats = serde_json::from_str(
            r#"{
                "total_pools": 4,
                "total_alloc_point": 200,
                "esr_per_second": "2",
                "total_value_locked": "0"
            }"#,
        )
        .unwrap();

        let stats = stats_from_wire(wire).unwrap();
        assert_eq!(stats.total_active_weight, 200);
        assert_eq!(stats.emission_per_second, 2 * 10u128.pow(18));
        assert_eq!(stats.total_value_locked, 0);
    }
}
