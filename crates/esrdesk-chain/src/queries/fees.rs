//! Fee gate queries.

use serde::Deserialize;
use serde_json::json;

use crate::RouterClient;
use crate::error::GatewayError;
use esrdesk_core::{Address, FeeStatus, amount::parse_units, types::FEE_ASSET_DECIMALS};

#[derive(Debug, Deserialize)]
struct WireFeeStatus {
    balance: String,
    allowance: String,
}

impl RouterClient {
    /// Get an account's fee-asset balance and protocol allowance.
    ///
    /// Callers substitute `FeeStatus::fail_closed()` on error; the gate
    /// only ever surfaces a warning, it never blocks a submission.
    pub async fn fetch_fee_status(&self, account: Address) -> Result<FeeStatus, GatewayError> {
        let wire: WireFeeStatus = self.call("esr_feeRequirements", json!([account])).await?;
        Ok(FeeStatus::from_amounts(
            parse_units(&wire.balance, FEE_ASSET_DECIMALS)?,
            parse_units(&wire.allowance, FEE_ASSET_DECIMALS)?,
        ))
    }
}
