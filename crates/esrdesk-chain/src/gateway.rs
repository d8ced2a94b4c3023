//! The ledger gateway seam.
//!
//! Everything the client knows about the chain comes through this trait.
//! The scheduler depends on the trait, not on `RouterClient`, so refresh
//! logic is tested against a scripted in-memory gateway.

use async_trait::async_trait;

use crate::RouterClient;
use crate::error::GatewayError;
use esrdesk_core::{
    Address, Balance, ChainContext, EmissionSnapshot, FarmPool, FeeStatus, StakePosition,
    StakingStats,
};

/// Per-account farming figures for one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFarmInfo {
    pub staked: Balance,
    pub pending_reward: Balance,
}

/// Confirmation of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
}

/// All remote ledger operations the client consumes.
///
/// Reads are stateless and may fail at any time; callers substitute the
/// documented defaults. Writes either confirm with a receipt or fail
/// without any local state mutation.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    // Farming reads
    async fn list_pools(&self) -> Result<Vec<FarmPool>, GatewayError>;
    async fn farming_stats(&self) -> Result<EmissionSnapshot, GatewayError>;
    async fn user_farm_info(
        &self,
        pool_id: u32,
        account: Address,
    ) -> Result<UserFarmInfo, GatewayError>;

    // Farming writes
    async fn deposit(
        &self,
        from: Address,
        pool_id: u32,
        amount: Balance,
    ) -> Result<TxReceipt, GatewayError>;
    async fn withdraw(
        &self,
        from: Address,
        pool_id: u32,
        amount: Balance,
    ) -> Result<TxReceipt, GatewayError>;
    async fn harvest(&self, from: Address, pool_id: u32) -> Result<TxReceipt, GatewayError>;
    async fn harvest_all(&self, from: Address) -> Result<TxReceipt, GatewayError>;

    // Staking reads
    async fn stake_info(&self, account: Address) -> Result<StakePosition, GatewayError>;
    async fn staking_stats(&self) -> Result<StakingStats, GatewayError>;

    // Staking writes
    async fn stake_esr(&self, from: Address, amount: Balance) -> Result<TxReceipt, GatewayError>;
    async fn unstake_esr(&self, from: Address, amount: Balance) -> Result<TxReceipt, GatewayError>;
    async fn claim_all_rewards(&self, from: Address) -> Result<TxReceipt, GatewayError>;
    async fn distribute_rewards(&self, from: Address) -> Result<TxReceipt, GatewayError>;

    // Fee gate and authorization
    async fn check_fee_requirements(&self, account: Address) -> Result<FeeStatus, GatewayError>;
    async fn protocol_owner(&self) -> Result<Address, GatewayError>;
}

/// Validate that a context carries an account, for account-scoped calls.
pub fn require_account(ctx: &ChainContext) -> Result<Address, GatewayError> {
    ctx.account
        .ok_or_else(|| GatewayError::InvalidData("operation requires a connected account".into()))
}

#[async_trait]
impl LedgerGateway for RouterClient {
    async fn list_pools(&self) -> Result<Vec<FarmPool>, GatewayError> {
        self.fetch_pools().await
    }

    async fn farming_stats(&self) -> Result<EmissionSnapshot, GatewayError> {
        self.fetch_farming_stats().await
    }

    async fn user_farm_info(
        &self,
        pool_id: u32,
        account: Address,
    ) -> Result<UserFarmInfo, GatewayError> {
        self.fetch_user_farm_info(pool_id, account).await
    }

    async fn deposit(
        &self,
        from: Address,
        pool_id: u32,
        amount: Balance,
    ) -> Result<TxReceipt, GatewayError> {
        self.submit_deposit(from, pool_id, amount).await
    }

    async fn withdraw(
        &self,
        from: Address,
        pool_id: u32,
        amount: Balance,
    ) -> Result<TxReceipt, GatewayError> {
        self.submit_withdraw(from, pool_id, amount).await
    }

    async fn harvest(&self, from: Address, pool_id: u32) -> Result<TxReceipt, GatewayError> {
        self.submit_harvest(from, pool_id).await
    }

    async fn harvest_all(&self, from: Address) -> Result<TxReceipt, GatewayError> {
        self.submit_harvest_all(from).await
    }

    async fn stake_info(&self, account: Address) -> Result<StakePosition, GatewayError> {
        self.fetch_stake_info(account).await
    }

    async fn staking_stats(&self) -> Result<StakingStats, GatewayError> {
        self.fetch_staking_stats().await
    }

    async fn stake_esr(&self, from: Address, amount: Balance) -> Result<TxReceipt, GatewayError> {
        self.submit_stake(from, amount).await
    }

    async fn unstake_esr(&self, from: Address, amount: Balance) -> Result<TxReceipt, GatewayError> {
        self.submit_unstake(from, amount).await
    }

    async fn claim_all_rewards(&self, from: Address) -> Result<TxReceipt, GatewayError> {
        self.submit_claim_all(from).await
    }

    async fn distribute_rewards(&self, from: Address) -> Result<TxReceipt, GatewayError> {
        self.submit_distribute(from).await
    }

    async fn check_fee_requirements(&self, account: Address) -> Result<FeeStatus, GatewayError> {
        self.fetch_fee_status(account).await
    }

    async fn protocol_owner(&self) -> Result<Address, GatewayError> {
        self.fetch_protocol_owner().await
    }
}
