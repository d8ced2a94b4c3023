//! Application state and logic.

use crossterm::event::{KeyCode, KeyEvent};

use crate::action::{Action, MutationOp, Request};
use crate::log_buffer::LogBuffer;
use crate::sync::RefreshReason;
use esrdesk_core::{
    Address, ChainContext, ConnectionStatus, EmissionSnapshot, FarmPool, FeeStatus, Network,
    StakePosition, StakingStats, amount::parse_units, check_stake, check_unstake, total_pending,
    types::ESR_DECIMALS, types::LP_DECIMALS,
};

/// Current view/tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Farm,
    Stake,
}

impl View {
    pub fn all() -> &'static [View] {
        &[View::Farm, View::Stake]
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Farm => "LP Farming",
            View::Stake => "ESR Staking",
        }
    }

    pub fn next(&self) -> View {
        match self {
            View::Farm => View::Stake,
            View::Stake => View::Farm,
        }
    }
}

/// What an open amount/address prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Deposit { pool_id: u32 },
    Withdraw { pool_id: u32 },
    StakeEsr,
    UnstakeEsr,
    Account,
}

impl InputKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputKind::Deposit { .. } => "LP amount to stake",
            InputKind::Withdraw { .. } => "LP amount to unstake",
            InputKind::StakeEsr => "ESR amount to stake (min 100)",
            InputKind::UnstakeEsr => "ESR amount to unstake",
            InputKind::Account => "Account address (0x...)",
        }
    }
}

/// An open input prompt and its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInput {
    pub kind: InputKind,
    pub buffer: String,
}

/// One-line status message shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn err(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Farming surface state, rebuilt wholesale from committed refreshes.
#[derive(Debug, Default)]
pub struct FarmSurface {
    pub pools: Vec<FarmPool>,
    pub stats: EmissionSnapshot,
    pub selected: usize,
}

impl FarmSurface {
    pub fn selected_pool(&self) -> Option<&FarmPool> {
        self.pools.get(self.selected)
    }

    fn select_next(&mut self) {
        if !self.pools.is_empty() {
            self.selected = (self.selected + 1) % self.pools.len();
        }
    }

    fn select_prev(&mut self) {
        if !self.pools.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.pools.len() - 1);
        }
    }
}

/// Staking surface state.
#[derive(Debug, Default)]
pub struct StakeSurface {
    pub position: StakePosition,
    pub stats: StakingStats,
    pub fee_status: FeeStatus,
}

/// Application state.
pub struct App {
    pub network: Network,
    pub account: Option<Address>,
    pub connection_status: ConnectionStatus,
    pub current_view: View,
    pub farm: FarmSurface,
    pub stake: StakeSurface,
    /// Protocol owner, for the distribute-rewards capability.
    pub owner: Option<Address>,
    /// The in-flight mutating operation, if any.
    pub pending_mutation: Option<MutationOp>,
    pub input: Option<PendingInput>,
    pub notice: Option<Notice>,
    pub log_buffer: LogBuffer,
    pub show_logs: bool,
    pub should_quit: bool,
    /// Wall clock in unix seconds, advanced on every tick. All lock and
    /// "time ago" readouts derive from this.
    pub now: u64,
}

impl App {
    pub fn new(network: Network, account: Option<Address>, log_buffer: LogBuffer, now: u64) -> Self {
        Self {
            network,
            account,
            connection_status: ConnectionStatus::Disconnected,
            current_view: View::default(),
            farm: FarmSurface::default(),
            stake: StakeSurface::default(),
            owner: None,
            pending_mutation: None,
            input: None,
            notice: None,
            log_buffer,
            show_logs: false,
            should_quit: false,
            now,
        }
    }

    pub fn context(&self) -> ChainContext {
        ChainContext::new(self.network, self.account)
    }

    /// The distribute control is enabled only for the resolved protocol
    /// owner - no hardcoded address comparison.
    pub fn is_admin(&self) -> bool {
        matches!((self.owner, self.account), (Some(owner), Some(account)) if owner == account)
    }

    pub fn tick(&mut self, now: u64) {
        self.now = now;
    }

    /// Apply a state update from the chain task.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::UpdateConnectionStatus(status) => {
                self.connection_status = status;
            }
            Action::CommitFarm(snapshot) => {
                self.farm.pools = snapshot.pools;
                if let Some(stats) = snapshot.stats {
                    self.farm.stats = stats;
                }
                if self.farm.selected >= self.farm.pools.len() {
                    self.farm.selected = self.farm.pools.len().saturating_sub(1);
                }
            }
            Action::CommitStake(snapshot) => {
                self.stake.position = snapshot.position;
                if let Some(stats) = snapshot.stats {
                    self.stake.stats = stats;
                }
                self.stake.fee_status = snapshot.fee_status;
            }
            Action::SetProtocolOwner(owner) => {
                self.owner = owner;
            }
            Action::MutationSettled { op, result } => {
                self.pending_mutation = None;
                self.notice = Some(match result {
                    Ok(tx_hash) => Notice::ok(format!("{} confirmed ({})", op.label(), tx_hash)),
                    Err(message) => Notice::err(format!("{} failed: {}", op.label(), message)),
                });
            }
        }
    }

    /// Handle a key press. Returns a request for the chain task when the
    /// key leads to one.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Request> {
        if self.input.is_some() {
            return self.handle_input_key(key);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => {
                self.current_view = self.current_view.next();
                None
            }
            KeyCode::Char('1') => {
                self.current_view = View::Farm;
                None
            }
            KeyCode::Char('2') => {
                self.current_view = View::Stake;
                None
            }
            KeyCode::Char('l') => {
                self.show_logs = !self.show_logs;
                None
            }
            KeyCode::Char('r') => Some(Request::Refresh(RefreshReason::Manual)),
            KeyCode::Char('x') => {
                self.open_input(InputKind::Account);
                None
            }
            _ => match self.current_view {
                View::Farm => self.handle_farm_key(key),
                View::Stake => self.handle_stake_key(key),
            },
        }
    }

    fn handle_farm_key(&mut self, key: KeyEvent) -> Option<Request> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.farm.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.farm.select_prev();
                None
            }
            KeyCode::Char('s') => {
                let pool = self.farm.selected_pool()?;
                if !pool.active {
                    self.notice = Some(Notice::err("Pool is inactive"));
                    return None;
                }
                let pool_id = pool.id;
                self.open_mutation_input(InputKind::Deposit { pool_id });
                None
            }
            KeyCode::Char('w') => {
                let pool_id = self.farm.selected_pool()?.id;
                self.open_mutation_input(InputKind::Withdraw { pool_id });
                None
            }
            KeyCode::Char('h') => {
                let pool = self.farm.selected_pool()?;
                if !pool.has_pending_reward() {
                    return None;
                }
                let pool_id = pool.id;
                self.request_mutation(MutationOp::Harvest { pool_id })
            }
            KeyCode::Char('a') => {
                if total_pending(&self.farm.pools) == 0 {
                    return None;
                }
                self.request_mutation(MutationOp::HarvestAll)
            }
            _ => None,
        }
    }

    fn handle_stake_key(&mut self, key: KeyEvent) -> Option<Request> {
        match key.code {
            KeyCode::Char('s') => {
                self.open_mutation_input(InputKind::StakeEsr);
                None
            }
            KeyCode::Char('u') => {
                self.open_mutation_input(InputKind::UnstakeEsr);
                None
            }
            KeyCode::Char('c') => {
                if !self.stake.position.has_pending_reward() {
                    return None;
                }
                self.request_mutation(MutationOp::ClaimRewards)
            }
            KeyCode::Char('d') => {
                if !self.is_admin() {
                    return None;
                }
                self.request_mutation(MutationOp::Distribute)
            }
            _ => None,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Request> {
        match key.code {
            KeyCode::Esc => {
                self.input = None;
                None
            }
            KeyCode::Enter => {
                let input = self.input.take()?;
                self.submit_input(input)
            }
            KeyCode::Backspace => {
                if let Some(input) = self.input.as_mut() {
                    input.buffer.pop();
                }
                None
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.input.as_mut() {
                    let ok = match input.kind {
                        InputKind::Account => c.is_ascii_hexdigit() || c == 'x' || c == 'X',
                        _ => c.is_ascii_digit() || c == '.',
                    };
                    if ok {
                        input.buffer.push(c);
                    }
                }
                None
            }
            _ => None,
        }
    }

    fn open_input(&mut self, kind: InputKind) {
        self.input = Some(PendingInput {
            kind,
            buffer: String::new(),
        });
    }

    fn open_mutation_input(&mut self, kind: InputKind) {
        if self.account.is_none() {
            self.notice = Some(Notice::err("Connect an account first (press x)"));
            return;
        }
        if self.pending_mutation.is_some() {
            self.notice = Some(Notice::err("Another operation is still pending"));
            return;
        }
        self.open_input(kind);
    }

    /// Run local admission checks and turn a submitted prompt into a
    /// request. Precondition failures surface immediately, with no
    /// ledger round-trip.
    fn submit_input(&mut self, input: PendingInput) -> Option<Request> {
        match input.kind {
            InputKind::Account => match input.buffer.parse::<Address>() {
                Ok(account) => {
                    self.account = Some(account);
                    self.notice = Some(Notice::ok(format!("Watching {}", account.short())));
                    Some(Request::SetContext(self.context()))
                }
                Err(e) => {
                    self.notice = Some(Notice::err(e.to_string()));
                    None
                }
            },
            InputKind::Deposit { pool_id } => {
                let amount = self.parse_amount(&input.buffer, LP_DECIMALS)?;
                self.request_mutation(MutationOp::Deposit { pool_id, amount })
            }
            InputKind::Withdraw { pool_id } => {
                let amount = self.parse_amount(&input.buffer, LP_DECIMALS)?;
                self.request_mutation(MutationOp::Withdraw { pool_id, amount })
            }
            InputKind::StakeEsr => {
                let amount = self.parse_amount(&input.buffer, ESR_DECIMALS)?;
                if let Err(e) = check_stake(amount) {
                    self.notice = Some(Notice::err(e.to_string()));
                    return None;
                }
                self.request_mutation(MutationOp::Stake { amount })
            }
            InputKind::UnstakeEsr => {
                let amount = self.parse_amount(&input.buffer, ESR_DECIMALS)?;
                if let Err(e) = check_unstake(&self.stake.position, amount, self.now) {
                    self.notice = Some(Notice::err(e.to_string()));
                    return None;
                }
                self.request_mutation(MutationOp::Unstake { amount })
            }
        }
    }

    fn parse_amount(&mut self, buffer: &str, decimals: u8) -> Option<u128> {
        match parse_units(buffer, decimals) {
            Ok(0) => {
                self.notice = Some(Notice::err("Amount must be greater than zero"));
                None
            }
            Ok(amount) => Some(amount),
            Err(e) => {
                self.notice = Some(Notice::err(e.to_string()));
                None
            }
        }
    }

    fn request_mutation(&mut self, op: MutationOp) -> Option<Request> {
        if self.account.is_none() {
            self.notice = Some(Notice::err("Connect an account first (press x)"));
            return None;
        }
        if self.pending_mutation.is_some() {
            self.notice = Some(Notice::err("Another operation is still pending"));
            return None;
        }
        self.pending_mutation = Some(op);
        self.notice = None;
        Some(Request::Mutate(op))
    }
}
