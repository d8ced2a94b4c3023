//! esrdesk - terminal client for the ESR protocol's farming and staking.

mod action;
mod app;
mod config;
mod event;
mod log_buffer;
mod sync;
mod tui;
mod ui;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use action::{Action, MutationOp, Request};
use app::App;
use clap::Parser;
use color_eyre::Result;
use event::{Event, EventHandler};
use log_buffer::{LogBuffer, LogBufferLayer};
use sync::{REFRESH_INTERVAL, RefreshReason, RefreshTicket, RefreshTracker};
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tui::Tui;

use esrdesk_chain::{GatewayError, LedgerGateway, RouterClient, TxReceipt, require_account};
use esrdesk_core::{Address, ChainContext, ConnectionStatus, Network};

/// esrdesk - terminal client for ESR LP farming and single-stake.
#[derive(Parser, Debug)]
#[command(name = "esrdesk")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network to connect to
    #[arg(short, long, default_value = "sepolia")]
    network: NetworkArg,

    /// Custom router endpoint URL
    #[arg(long = "router-url")]
    router_url: Option<String>,

    /// Account address to watch (0x...)
    #[arg(short, long)]
    account: Option<String>,
}

/// Network argument that can be parsed from string.
#[derive(Debug, Clone)]
struct NetworkArg(Network);

impl std::str::FromStr for NetworkArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ethereum" | "eth" => Ok(NetworkArg(Network::Ethereum)),
            "bsc" | "bnb" => Ok(NetworkArg(Network::Bsc)),
            "polygon" | "matic" => Ok(NetworkArg(Network::Polygon)),
            "sepolia" => Ok(NetworkArg(Network::Sepolia)),
            "bsc-testnet" | "chapel" => Ok(NetworkArg(Network::BscTestnet)),
            "amoy" => Ok(NetworkArg(Network::Amoy)),
            _ => Err(format!(
                "Unknown network '{}'. Valid options: ethereum, bsc, polygon, sepolia, bsc-testnet, amoy",
                s
            )),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install()?;

    // Log into a shared buffer rendered by the UI's log pane.
    let log_buffer = LogBuffer::new();
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("esrdesk_tui=info".parse()?)
        .add_directive("esrdesk_chain=info".parse()?)
        .add_directive("esrdesk_core=info".parse()?);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(LogBufferLayer::new(log_buffer.clone()))
        .init();

    let network = args.network.0;

    let mut app_config = config::load_config().unwrap_or_default();

    // CLI account takes precedence over the saved one.
    let account = args
        .account
        .as_deref()
        .or(app_config.last_account.as_deref())
        .and_then(|s| match s.parse::<Address>() {
            Ok(account) => Some(account),
            Err(e) => {
                tracing::warn!("Ignoring invalid account {}: {}", s, e);
                None
            }
        });
    let router_url = args.router_url.or_else(|| app_config.router_endpoint.clone());

    const ACTION_CHANNEL_CAPACITY: usize = 100;
    let (action_tx, mut action_rx) = mpsc::channel::<Action>(ACTION_CHANNEL_CAPACITY);
    const REQUEST_CHANNEL_CAPACITY: usize = 50;
    let (request_tx, request_rx) = mpsc::channel::<Request>(REQUEST_CHANNEL_CAPACITY);

    let mut app = App::new(network, account, log_buffer, unix_now());

    // The chain task owns the gateway and the refresh trackers.
    let ctx = app.context();
    tokio::spawn(chain_task(network, router_url, ctx, action_tx, request_rx));

    let mut tui = Tui::new()?;
    tui.enter()?;
    let mut events = EventHandler::new(250);

    // Main loop
    loop {
        tui.draw(|frame| ui::render(frame, &app))?;

        tokio::select! {
            event = events.next() => {
                match event? {
                    Event::Tick => app.tick(unix_now()),
                    Event::Key(key) => {
                        if let Some(request) = app.handle_key(key) {
                            if let Request::SetContext(new_ctx) = &request {
                                app_config.last_account = new_ctx.account.map(|a| a.to_string());
                                if let Err(e) = config::save_config(&app_config) {
                                    tracing::warn!("Failed to save config: {}", e);
                                }
                            }
                            let _ = request_tx.send(request).await;
                        }
                    }
                    Event::Resize(_, _) => {
                        // Handled automatically by ratatui on the next draw.
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.handle_action(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    tui.exit()?;

    Ok(())
}

/// Completion messages from spawned refresh cycles and mutations back to
/// the scheduler.
enum CycleDone {
    Farm(RefreshTicket, sync::FarmSnapshot),
    Stake(RefreshTicket, sync::StakeSnapshot),
    Mutation,
}

/// Background task owning the router connection and refresh scheduling.
///
/// Cycles run as spawned tasks: a hung call delays only its own cycle and
/// never blocks the timer's next firing. Completions come back through
/// `done_rx` and commit only if their ticket survives the tracker's
/// stale-response check. The task (and with it the timer) ends when the
/// UI drops its request channel.
async fn chain_task(
    network: Network,
    router_url: Option<String>,
    mut ctx: ChainContext,
    action_tx: mpsc::Sender<Action>,
    mut request_rx: mpsc::Receiver<Request>,
) {
    let _ = action_tx
        .send(Action::UpdateConnectionStatus(ConnectionStatus::Connecting))
        .await;

    let gateway: Arc<dyn LedgerGateway> =
        match RouterClient::connect(network, router_url.as_deref()).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::error!("Failed to connect to router: {}", e);
                let _ = action_tx
                    .send(Action::UpdateConnectionStatus(ConnectionStatus::Error(
                        e.to_string(),
                    )))
                    .await;
                return;
            }
        };

    let _ = action_tx
        .send(Action::UpdateConnectionStatus(ConnectionStatus::Connected))
        .await;

    // Resolve the distribute capability once per connection.
    let owner = match gateway.protocol_owner().await {
        Ok(owner) => Some(owner),
        Err(e) => {
            tracing::warn!("Could not resolve protocol owner, admin controls hidden: {}", e);
            None
        }
    };
    let _ = action_tx.send(Action::SetProtocolOwner(owner)).await;

    const DONE_CHANNEL_CAPACITY: usize = 16;
    let (done_tx, mut done_rx) = mpsc::channel::<CycleDone>(DONE_CHANNEL_CAPACITY);
    let mut farm_tracker = RefreshTracker::default();
    let mut stake_tracker = RefreshTracker::default();

    let mut interval = tokio::time::interval(REFRESH_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick fires immediately; the startup refresh covers it.
    interval.tick().await;

    start_refresh(
        RefreshReason::Startup,
        &gateway,
        ctx,
        &mut farm_tracker,
        &mut stake_tracker,
        &done_tx,
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if farm_tracker.has_in_flight() || stake_tracker.has_in_flight() {
                    tracing::debug!("Scheduled refresh skipped: previous cycle still in flight");
                } else {
                    start_refresh(
                        RefreshReason::Periodic,
                        &gateway,
                        ctx,
                        &mut farm_tracker,
                        &mut stake_tracker,
                        &done_tx,
                    );
                }
            }
            request = request_rx.recv() => {
                match request {
                    None => break,
                    Some(Request::SetContext(new_ctx)) => {
                        ctx = new_ctx;
                        // Results fetched for the old context must never
                        // land in state rebuilt for the new one.
                        farm_tracker.invalidate();
                        stake_tracker.invalidate();
                        start_refresh(
                            RefreshReason::ContextChange,
                            &gateway,
                            ctx,
                            &mut farm_tracker,
                            &mut stake_tracker,
                            &done_tx,
                        );
                    }
                    Some(Request::Refresh(reason)) => {
                        start_refresh(
                            reason,
                            &gateway,
                            ctx,
                            &mut farm_tracker,
                            &mut stake_tracker,
                            &done_tx,
                        );
                    }
                    Some(Request::Mutate(op)) => {
                        let gateway = gateway.clone();
                        let action_tx = action_tx.clone();
                        let done_tx = done_tx.clone();
                        let ctx = ctx;
                        tokio::spawn(async move {
                            let result = match run_mutation(gateway.as_ref(), ctx, op).await {
                                Ok(receipt) => Ok(receipt.tx_hash),
                                Err(e) => {
                                    tracing::error!("{} failed: {}", op.label(), e);
                                    Err(e.to_string())
                                }
                            };
                            let _ = action_tx.send(Action::MutationSettled { op, result }).await;
                            // Success or failure, reconcile the display
                            // with whatever the ledger committed.
                            let _ = done_tx.send(CycleDone::Mutation).await;
                        });
                    }
                }
            }
            Some(done) = done_rx.recv() => {
                match done {
                    CycleDone::Farm(ticket, snapshot) => {
                        if farm_tracker.try_commit(ticket) {
                            let _ = action_tx.send(Action::CommitFarm(snapshot)).await;
                        }
                    }
                    CycleDone::Stake(ticket, snapshot) => {
                        if stake_tracker.try_commit(ticket) {
                            let _ = action_tx.send(Action::CommitStake(snapshot)).await;
                        }
                    }
                    CycleDone::Mutation => {
                        start_refresh(
                            RefreshReason::AfterMutation,
                            &gateway,
                            ctx,
                            &mut farm_tracker,
                            &mut stake_tracker,
                            &done_tx,
                        );
                    }
                }
            }
        }
    }
}

/// Start one refresh cycle per surface, each as its own task.
fn start_refresh(
    reason: RefreshReason,
    gateway: &Arc<dyn LedgerGateway>,
    ctx: ChainContext,
    farm_tracker: &mut RefreshTracker,
    stake_tracker: &mut RefreshTracker,
    done_tx: &mpsc::Sender<CycleDone>,
) {
    let farm_ticket = farm_tracker.begin(reason);
    let farm_gateway = gateway.clone();
    let farm_done = done_tx.clone();
    tokio::spawn(async move {
        let snapshot = sync::refresh_farm(farm_gateway.as_ref(), ctx).await;
        let _ = farm_done.send(CycleDone::Farm(farm_ticket, snapshot)).await;
    });

    let stake_ticket = stake_tracker.begin(reason);
    let stake_gateway = gateway.clone();
    let stake_done = done_tx.clone();
    tokio::spawn(async move {
        let snapshot = sync::refresh_stake(stake_gateway.as_ref(), ctx).await;
        let _ = stake_done.send(CycleDone::Stake(stake_ticket, snapshot)).await;
    });
}

/// Execute one mutating operation against the gateway.
async fn run_mutation(
    gateway: &dyn LedgerGateway,
    ctx: ChainContext,
    op: MutationOp,
) -> std::result::Result<TxReceipt, GatewayError> {
    let from = require_account(&ctx)?;
    match op {
        MutationOp::Deposit { pool_id, amount } => gateway.deposit(from, pool_id, amount).await,
        MutationOp::Withdraw { pool_id, amount } => gateway.withdraw(from, pool_id, amount).await,
        MutationOp::Harvest { pool_id } => gateway.harvest(from, pool_id).await,
        MutationOp::HarvestAll => gateway.harvest_all(from).await,
        MutationOp::Stake { amount } => gateway.stake_esr(from, amount).await,
        MutationOp::Unstake { amount } => gateway.unstake_esr(from, amount).await,
        MutationOp::ClaimRewards => gateway.claim_all_rewards(from).await,
        MutationOp::Distribute => gateway.distribute_rewards(from).await,
    }
}
