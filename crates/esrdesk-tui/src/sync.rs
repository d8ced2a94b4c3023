//! Refresh scheduling and reconciliation against the remote ledger.
//!
//! Every refresh cycle takes a monotonically increasing ticket when it
//! starts. A completed cycle commits only if no cycle with a newer ticket
//! has committed before it and no context change invalidated it - the
//! most recently *started* refresh wins, regardless of completion order.
//!
//! Within a cycle every sub-fetch degrades to its documented default on
//! failure; a cycle as a whole never fails.

use std::time::Duration;

use esrdesk_chain::LedgerGateway;
use esrdesk_core::{
    ChainContext, EmissionSnapshot, FarmPool, FeeStatus, StakePosition, StakingStats,
};

/// Fixed period of the background refresh timer.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Why a refresh cycle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    Startup,
    Periodic,
    Manual,
    AfterMutation,
    ContextChange,
}

/// Ticket identifying one refresh cycle by its start order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    seq: u64,
}

/// Single-writer reconciliation for one surface's refresh cycles.
///
/// `begin` hands out tickets in start order; `try_commit` accepts a
/// completed cycle only if its ticket is newer than the last committed
/// one and not older than the invalidation barrier. `invalidate` (on a
/// context change) fences off every cycle already in flight.
#[derive(Debug, Default)]
pub struct RefreshTracker {
    next_seq: u64,
    committed: Option<u64>,
    barrier: u64,
    in_flight: usize,
}

impl RefreshTracker {
    pub fn begin(&mut self, reason: RefreshReason) -> RefreshTicket {
        self.next_seq += 1;
        self.in_flight += 1;
        tracing::debug!("refresh #{} started ({:?})", self.next_seq, reason);
        RefreshTicket { seq: self.next_seq }
    }

    /// Record a completed cycle. Returns true if its result may be
    /// committed to surface state.
    pub fn try_commit(&mut self, ticket: RefreshTicket) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if ticket.seq < self.barrier {
            tracing::debug!("refresh #{} dropped (invalidated by context change)", ticket.seq);
            return false;
        }
        if self.committed.is_some_and(|c| c >= ticket.seq) {
            tracing::debug!("refresh #{} dropped (newer refresh already committed)", ticket.seq);
            return false;
        }
        self.committed = Some(ticket.seq);
        true
    }

    /// Fence off every cycle started before now. Used when the account or
    /// network context changes: stale results for the old context must
    /// never land in state rebuilt for the new one.
    pub fn invalidate(&mut self) {
        self.barrier = self.next_seq + 1;
    }

    /// True while any cycle is outstanding. The periodic timer coalesces
    /// its tick into a no-op in that case.
    pub fn has_in_flight(&self) -> bool {
        self.in_flight > 0
    }
}

/// Result of one farming refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct FarmSnapshot {
    pub pools: Vec<FarmPool>,
    /// None when the stats read failed: the surface keeps the previous
    /// snapshot rather than zeroing a healthy display.
    pub stats: Option<EmissionSnapshot>,
}

/// Result of one staking refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct StakeSnapshot {
    pub position: StakePosition,
    pub stats: Option<StakingStats>,
    pub fee_status: FeeStatus,
}

/// Pull everything the farming surface displays.
///
/// Pool list and stats come first; per-account fields are fetched only
/// afterwards, against the pool list of this same cycle. A failed
/// per-pool read leaves that pool's account fields at zero and never
/// aborts the rest.
pub async fn refresh_farm(gateway: &dyn LedgerGateway, ctx: ChainContext) -> FarmSnapshot {
    let stats = match gateway.farming_stats().await {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!("Could not load farming stats, keeping previous: {}", e);
            None
        }
    };

    let mut pools = match gateway.list_pools().await {
        Ok(pools) => pools,
        Err(e) => {
            tracing::warn!("Could not load pool list, showing none: {}", e);
            Vec::new()
        }
    };

    if let Some(account) = ctx.account {
        for pool in &mut pools {
            match gateway.user_farm_info(pool.id, account).await {
                Ok(info) => {
                    pool.user_staked = info.staked;
                    pool.pending_reward = info.pending_reward;
                }
                Err(e) => {
                    tracing::warn!("Could not load farm info for pool {}: {}", pool.id, e);
                }
            }
        }
    }

    FarmSnapshot { pools, stats }
}

/// Pull everything the staking surface displays.
pub async fn refresh_stake(gateway: &dyn LedgerGateway, ctx: ChainContext) -> StakeSnapshot {
    let stats = match gateway.staking_stats().await {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!("Could not load staking stats, keeping previous: {}", e);
            None
        }
    };

    let (position, fee_status) = match ctx.account {
        Some(account) => {
            let position = match gateway.stake_info(account).await {
                Ok(position) => position,
                Err(e) => {
                    tracing::warn!("Could not load stake info, using defaults: {}", e);
                    StakePosition::default()
                }
            };
            let fee_status = match gateway.check_fee_requirements(account).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!("Could not check fee requirements: {}", e);
                    FeeStatus::fail_closed()
                }
            };
            (position, fee_status)
        }
        None => (StakePosition::default(), FeeStatus::fail_closed()),
    };

    StakeSnapshot {
        position,
        stats,
        fee_status,
    }
}
