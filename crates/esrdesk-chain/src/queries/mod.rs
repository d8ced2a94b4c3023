pub mod farming;
pub mod fees;
pub mod staking;
