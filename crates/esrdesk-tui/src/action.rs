//! Messages between the UI loop and the chain task.

use crate::sync::{FarmSnapshot, RefreshReason, StakeSnapshot};
use esrdesk_core::{Address, Balance, ChainContext, ConnectionStatus};

/// A mutating ledger operation requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    Deposit { pool_id: u32, amount: Balance },
    Withdraw { pool_id: u32, amount: Balance },
    Harvest { pool_id: u32 },
    HarvestAll,
    Stake { amount: Balance },
    Unstake { amount: Balance },
    ClaimRewards,
    Distribute,
}

impl MutationOp {
    /// Get display label for notices.
    pub fn label(&self) -> &'static str {
        match self {
            MutationOp::Deposit { .. } => "Stake LP tokens",
            MutationOp::Withdraw { .. } => "Unstake LP tokens",
            MutationOp::Harvest { .. } => "Harvest",
            MutationOp::HarvestAll => "Harvest all",
            MutationOp::Stake { .. } => "Stake ESR",
            MutationOp::Unstake { .. } => "Unstake ESR",
            MutationOp::ClaimRewards => "Claim rewards",
            MutationOp::Distribute => "Distribute rewards",
        }
    }
}

/// State updates flowing from the chain task to the UI.
#[derive(Debug, Clone)]
pub enum Action {
    UpdateConnectionStatus(ConnectionStatus),
    /// Committed (non-stale) farming refresh result.
    CommitFarm(FarmSnapshot),
    /// Committed (non-stale) staking refresh result.
    CommitStake(StakeSnapshot),
    /// Protocol owner, resolved once per connection for the admin
    /// capability check. None when the read failed.
    SetProtocolOwner(Option<Address>),
    /// A mutating call settled. `Err` carries the user-facing message;
    /// displayed values stay untouched either way until the follow-up
    /// refresh lands.
    MutationSettled {
        op: MutationOp,
        result: Result<String, String>,
    },
}

/// Requests flowing from the UI to the chain task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Account or network context changed: invalidate every in-flight
    /// cycle and refresh immediately.
    SetContext(ChainContext),
    /// Start a refresh outside the periodic timer.
    Refresh(RefreshReason),
    /// Submit a mutating operation.
    Mutate(MutationOp),
}
