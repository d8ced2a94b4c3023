//! Mutating ledger operations.
//!
//! The router holds the signing session for the connected wallet; this
//! client submits intents and waits for the confirmation receipt. A
//! rejected or failed submission surfaces as `GatewayError::Rejected` and
//! never mutates local state - the follow-up refresh reconciles whatever
//! the ledger actually committed.

use serde::Deserialize;
use serde_json::json;

use crate::RouterClient;
use crate::error::GatewayError;
use crate::gateway::TxReceipt;
use esrdesk_core::{Address, Balance, amount::format_units, types::ESR_DECIMALS, types::LP_DECIMALS};

#[derive(Debug, Deserialize)]
struct WireReceipt {
    tx_hash: String,
    status: WireTxStatus,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum WireTxStatus {
    Confirmed,
    Reverted,
}

impl RouterClient {
    /// Submit one mutating call and wait for its receipt.
    async fn submit(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<TxReceipt, GatewayError> {
        let receipt: WireReceipt = self.call(method, params).await?;
        if receipt.status == WireTxStatus::Reverted {
            return Err(GatewayError::Rejected(format!(
                "{} reverted in {}",
                method, receipt.tx_hash
            )));
        }
        tracing::info!("{} confirmed in {}", method, receipt.tx_hash);
        Ok(TxReceipt {
            tx_hash: receipt.tx_hash,
        })
    }

    pub async fn submit_deposit(
        &self,
        from: Address,
        pool_id: u32,
        amount: Balance,
    ) -> Result<TxReceipt, GatewayError> {
        self.submit(
            "esr_deposit",
            json!([from, pool_id, format_units(amount, LP_DECIMALS)]),
        )
        .await
    }

    pub async fn submit_withdraw(
        &self,
        from: Address,
        pool_id: u32,
        amount: Balance,
    ) -> Result<TxReceipt, GatewayError> {
        self.submit(
            "esr_withdraw",
            json!([from, pool_id, format_units(amount, LP_DECIMALS)]),
        )
        .await
    }

    pub async fn submit_harvest(
        &self,
        from: Address,
        pool_id: u32,
    ) -> Result<TxReceipt, GatewayError> {
        self.submit("esr_harvest", json!([from, pool_id])).await
    }

    pub async fn submit_harvest_all(&self, from: Address) -> Result<TxReceipt, GatewayError> {
        self.submit("esr_harvestAll", json!([from])).await
    }

    pub async fn submit_stake(
        &self,
        from: Address,
        amount: Balance,
    ) -> Result<TxReceipt, GatewayError> {
        self.submit(
            "esr_stake",
            json!([from, format_units(amount, ESR_DECIMALS)]),
        )
        .await
    }

    pub async fn submit_unstake(
        &self,
        from: Address,
        amount: Balance,
    ) -> Result<TxReceipt, GatewayError> {
        self.submit(
            "esr_unstake",
            json!([from, format_units(amount, ESR_DECIMALS)]),
        )
        .await
    }

    pub async fn submit_claim_all(&self, from: Address) -> Result<TxReceipt, GatewayError> {
        self.submit("esr_claimAllRewards", json!([from])).await
    }

    pub async fn submit_distribute(&self, from: Address) -> Result<TxReceipt, GatewayError> {
        self.submit("esr_distributeRewards", json!([from])).await
    }
}
