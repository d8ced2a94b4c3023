//! Single-stake ESR position: lock gating, eligibility, admission checks.

use serde::{Deserialize, Serialize};

use crate::types::{Balance, ESR_DECIMALS};

/// Lock period applied by the ledger to every stake: 7 days.
pub const LOCK_PERIOD_SECS: u64 = 7 * 24 * 60 * 60;

/// Minimum stake, in whole ESR (display units).
pub const MIN_STAKE_ESR: u64 = 100;

/// Minimum stake in subunits.
pub const MIN_STAKE_SUBUNITS: Balance = MIN_STAKE_ESR as Balance * 10u128.pow(ESR_DECIMALS as u32);

/// The context account's stake position, one per account.
///
/// `lock_ends_at` is always `staked_at + LOCK_PERIOD_SECS` as computed by
/// the ledger; the client displays it and never recomputes it. A second
/// stake adds to `amount` and keeps the original lock end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePosition {
    /// Staked ESR in subunits. Monotonically non-negative; may reach zero
    /// while remaining a position.
    pub amount: Balance,
    /// Unix seconds of the first stake, 0 if never staked.
    pub staked_at: u64,
    /// Unix seconds at which the lock expires, 0 if never staked.
    pub lock_ends_at: u64,
    /// Pending USDT reward in subunits.
    pub pending_reward: Balance,
}

impl StakePosition {
    pub fn has_stake(&self) -> bool {
        self.amount > 0
    }

    pub fn has_pending_reward(&self) -> bool {
        self.pending_reward > 0
    }

    /// Unstaking is allowed once the lock has elapsed and there is
    /// something to unstake.
    pub fn is_eligible_to_unstake(&self, now: u64) -> bool {
        self.lock_ends_at > 0 && now >= self.lock_ends_at && self.amount > 0
    }

    /// Lock state for display. Remaining time floor-divides into whole
    /// days and hours.
    pub fn lock_status(&self, now: u64) -> LockStatus {
        if self.lock_ends_at == 0 {
            return LockStatus::NeverStaked;
        }
        if now >= self.lock_ends_at {
            return LockStatus::Unlocked;
        }
        let remaining = self.lock_ends_at - now;
        LockStatus::Locked {
            days: remaining / 86_400,
            hours: (remaining % 86_400) / 3_600,
        }
    }
}

/// Displayable lock state: "N/A" before any stake, "Unlocked" once the
/// period has elapsed, "Nd Nh" while counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    NeverStaked,
    Unlocked,
    Locked { days: u64, hours: u64 },
}

impl std::fmt::Display for LockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockStatus::NeverStaked => write!(f, "N/A"),
            LockStatus::Unlocked => write!(f, "Unlocked"),
            LockStatus::Locked { days, hours } => write!(f, "{}d {}h", days, hours),
        }
    }
}

/// Local admission failures, rejected before any ledger round-trip.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("minimum stake is {MIN_STAKE_ESR} ESR")]
    BelowMinimumStake,
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("stake is still locked or there is no active stake")]
    NotUnlockable,
}

/// Client-side check before a stake submission. The ledger is still the
/// final authority and may reject for its own reasons.
pub fn check_stake(amount: Balance) -> Result<(), PreconditionError> {
    if amount < MIN_STAKE_SUBUNITS {
        return Err(PreconditionError::BelowMinimumStake);
    }
    Ok(())
}

/// Client-side check before an unstake submission, against the cached
/// position.
pub fn check_unstake(
    position: &StakePosition,
    amount: Balance,
    now: u64,
) -> Result<(), PreconditionError> {
    if amount == 0 {
        return Err(PreconditionError::ZeroAmount);
    }
    if !position.is_eligible_to_unstake(now) {
        return Err(PreconditionError::NotUnlockable);
    }
    Ok(())
}

/// Aggregate staking-product figures as last reported by the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StakingStats {
    pub total_staked: Balance,
    pub total_stakers: u32,
    pub total_rewards_distributed: Balance,
    /// Collected fees not yet distributed to stakers.
    pub reward_pool: Balance,
    pub current_apr: f64,
    /// Unix seconds of the last reward distribution, 0 if never.
    pub last_distribution: u64,
}

/// Human form of "how long ago", for the last-distribution readout.
pub fn format_time_ago(now: u64, timestamp: u64) -> String {
    if timestamp == 0 {
        return "Never".into();
    }
    let seconds = now.saturating_sub(timestamp);
    if seconds < 60 {
        "Just now".into()
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: u64 = 1_700_000_000;

    fn position(amount: Balance, staked_at: u64) -> StakePosition {
        StakePosition {
            amount,
            staked_at,
            lock_ends_at: if staked_at == 0 {
                0
            } else {
                staked_at + LOCK_PERIOD_SECS
            },
            pending_reward: 0,
        }
    }

    #[test]
    fn test_lock_period_is_seven_days() {
        assert_eq!(LOCK_PERIOD_SECS, 604_800);
    }

    #[test]
    fn test_eligibility_boundary() {
        let p = position(1, T);
        // One second before the lock ends: not eligible, "0d 0h" remaining.
        assert!(!p.is_eligible_to_unstake(T + 604_799));
        assert_eq!(p.lock_status(T + 604_799).to_string(), "0d 0h");
        // At exactly lock end: eligible, unlocked.
        assert!(p.is_eligible_to_unstake(T + 604_800));
        assert_eq!(p.lock_status(T + 604_800), LockStatus::Unlocked);
    }

    #[test]
    fn test_zero_amount_never_eligible() {
        let p = position(0, T);
        assert!(!p.is_eligible_to_unstake(T + LOCK_PERIOD_SECS));
        assert!(!p.is_eligible_to_unstake(u64::MAX));
    }

    #[test]
    fn test_never_staked_is_na() {
        let p = StakePosition::default();
        assert!(!p.is_eligible_to_unstake(T));
        assert_eq!(p.lock_status(T), LockStatus::NeverStaked);
        assert_eq!(p.lock_status(T).to_string(), "N/A");
    }

    #[test]
    fn test_lock_status_floor_division() {
        let p = position(1, T);
        // 3 days, 5 hours, 59 minutes remaining floors to "3d 5h".
        let now = p.lock_ends_at - (3 * 86_400 + 5 * 3_600 + 59 * 60);
        assert_eq!(p.lock_status(now).to_string(), "3d 5h");
    }

    #[test]
    fn test_check_stake_minimum() {
        let esr = |units: u128| units * 10u128.pow(ESR_DECIMALS as u32);
        assert_eq!(check_stake(esr(99)), Err(PreconditionError::BelowMinimumStake));
        assert_eq!(check_stake(esr(100) - 1), Err(PreconditionError::BelowMinimumStake));
        assert_eq!(check_stake(esr(100)), Ok(()));
        assert_eq!(check_stake(esr(5_000)), Ok(()));
    }

    #[test]
    fn test_check_unstake() {
        let p = position(10, T);
        assert_eq!(
            check_unstake(&p, 0, T + LOCK_PERIOD_SECS),
            Err(PreconditionError::ZeroAmount)
        );
        assert_eq!(
            check_unstake(&p, 5, T + 1),
            Err(PreconditionError::NotUnlockable)
        );
        assert_eq!(check_unstake(&p, 5, T + LOCK_PERIOD_SECS), Ok(()));
    }

    #[test]
    fn test_restake_preserves_lock_end() {
        // A second stake adds to the amount; the ledger keeps the original
        // lock end and the client displays it as-is.
        let mut p = position(MIN_STAKE_SUBUNITS, T);
        let original_lock = p.lock_ends_at;
        p.amount += MIN_STAKE_SUBUNITS;
        assert_eq!(p.lock_ends_at, original_lock);
        assert!(p.is_eligible_to_unstake(original_lock));
    }

    #[test]
    fn test_format_time_ago() {
        assert_eq!(format_time_ago(T, 0), "Never");
        assert_eq!(format_time_ago(T, T - 30), "Just now");
        assert_eq!(format_time_ago(T, T - 120), "2m ago");
        assert_eq!(format_time_ago(T, T - 7_200), "2h ago");
        assert_eq!(format_time_ago(T, T - 200_000), "2d ago");
    }
}
