//! Rendering. Intentionally thin: all figures shown here are derived in
//! esrdesk-core from the last committed refresh.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table};

use crate::app::{App, View};
use crate::log_buffer::LogLevel;
use esrdesk_core::{
    amount::{format_fixed, to_display},
    emission::pool_apr,
    fee::REQUIRED_FEE_SUBUNITS,
    stake::format_time_ago,
    total_pending,
    types::{ESR_DECIMALS, FEE_ASSET_DECIMALS, LP_DECIMALS},
};

pub fn render(frame: &mut Frame, app: &App) {
    let log_height = if app.show_logs { 10 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(log_height),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.current_view {
        View::Farm => render_farm(frame, app, chunks[1]),
        View::Stake => render_stake(frame, app, chunks[1]),
    }
    if app.show_logs {
        render_logs(frame, app, chunks[2]);
    }
    render_footer(frame, app, chunks[3]);

    if app.input.is_some() {
        render_input_popup(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let account = app
        .account
        .map(|a| a.short())
        .unwrap_or_else(|| "no account".to_string());

    let tabs: Vec<Span> = View::all()
        .iter()
        .flat_map(|v| {
            let style = if *v == app.current_view {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(v.label(), style), Span::raw("  ")]
        })
        .collect();

    let mut line = vec![Span::raw(" ")];
    line.extend(tabs);
    line.push(Span::raw("| "));
    line.push(Span::raw(format!("{} ", app.network)));
    if app.network.is_testnet() {
        line.push(Span::styled("[testnet] ", Style::default().fg(Color::Magenta)));
    }
    line.push(Span::styled(
        format!("{} ", app.connection_status),
        Style::default().fg(Color::Cyan),
    ));
    line.push(Span::raw(format!("| {}", account)));
    if app.is_admin() {
        line.push(Span::styled(" [owner]", Style::default().fg(Color::Green)));
    }

    let header = Paragraph::new(Line::from(line))
        .block(Block::default().borders(Borders::ALL).title("esrdesk"));
    frame.render_widget(header, area);
}

fn render_farm(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let stats = &app.farm.stats;
    let pending = total_pending(&app.farm.pools);
    let summary = Line::from(vec![
        Span::raw(format!("Pools: {}  ", stats.total_pools)),
        Span::raw(format!("Total weight: {}  ", stats.total_active_weight)),
        Span::raw(format!(
            "ESR/s: {}  ",
            format_fixed(stats.emission_per_second, ESR_DECIMALS, 2)
        )),
        Span::raw(format!(
            "TVL: {}  ",
            format_fixed(stats.total_value_locked, LP_DECIMALS, 2)
        )),
        Span::styled(
            format!(
                "Total pending: {} ESR",
                format_fixed(pending, ESR_DECIMALS, 4)
            ),
            Style::default().fg(Color::Green),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title("Farming")),
        chunks[0],
    );

    let header = Row::new(["ID", "Pool", "Weight", "Status", "APR", "Total staked", "Your stake", "Pending ESR"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .farm
        .pools
        .iter()
        .enumerate()
        .map(|(i, pool)| {
            let apr = pool_apr(pool, stats);
            let status = if pool.active { "Active" } else { "Inactive" };
            let row = Row::new([
                pool.id.to_string(),
                pool.name.clone(),
                pool.weight.to_string(),
                status.to_string(),
                format!("{:.1}%", apr),
                format_fixed(pool.total_staked, LP_DECIMALS, 2),
                format_fixed(pool.user_staked, LP_DECIMALS, 4),
                format_fixed(pool.pending_reward, ESR_DECIMALS, 4),
            ]);
            if i == app.farm.selected {
                row.style(Style::default().bg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Pools"));
    frame.render_widget(table, chunks[1]);
}

fn render_stake(frame: &mut Frame, app: &App, area: Rect) {
    let fee_height = if app.stake.fee_status.needs_warning() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(fee_height),
            Constraint::Min(4),
        ])
        .split(area);

    let stats = &app.stake.stats;
    let summary = Line::from(vec![
        Span::styled(
            format!("APR: {:.1}%  ", stats.current_apr),
            Style::default().fg(Color::Green),
        ),
        Span::raw(format!(
            "Total staked: {} ESR  ",
            format_fixed(stats.total_staked, ESR_DECIMALS, 0)
        )),
        Span::raw(format!("Stakers: {}  ", stats.total_stakers)),
        Span::raw(format!(
            "Distributed: ${}  ",
            format_fixed(stats.total_rewards_distributed, FEE_ASSET_DECIMALS, 0)
        )),
        Span::raw(format!(
            "Reward pool: ${}  ",
            format_fixed(stats.reward_pool, FEE_ASSET_DECIMALS, 2)
        )),
        Span::raw(format!(
            "Last distribution: {}",
            format_time_ago(app.now, stats.last_distribution)
        )),
    ]);
    frame.render_widget(
        Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title("ESR Staking")),
        chunks[0],
    );

    if app.stake.fee_status.needs_warning() {
        let fee = &app.stake.fee_status;
        let warning = Line::from(vec![Span::styled(
            format!(
                "USDT fee required: ${} balance and approval needed | Balance: ${} Allowance: ${}",
                to_display(REQUIRED_FEE_SUBUNITS, FEE_ASSET_DECIMALS),
                format_fixed(fee.balance, FEE_ASSET_DECIMALS, 2),
                format_fixed(fee.allowance, FEE_ASSET_DECIMALS, 2),
            ),
            Style::default().fg(Color::Yellow),
        )]);
        frame.render_widget(
            Paragraph::new(warning).block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );
    }

    let position = &app.stake.position;
    let lock = position.lock_status(app.now);
    let lines = vec![
        Line::from(format!(
            "Staked amount:    {} ESR",
            format_fixed(position.amount, ESR_DECIMALS, 4)
        )),
        Line::from(format!("Lock status:      {}", lock)),
        Line::from(vec![
            Span::raw("Pending rewards:  "),
            Span::styled(
                format!("${}", format_fixed(position.pending_reward, FEE_ASSET_DECIMALS, 2)),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Terms: minimum 100 ESR, 7 day lock, USDT rewards from protocol fees",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Your Stake")),
        chunks[2],
    );
}

fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .log_buffer
        .tail(area.height.saturating_sub(2) as usize)
        .into_iter()
        .map(|l| {
            let color = match l.level {
                LogLevel::Error => Color::Red,
                LogLevel::Warn => Color::Yellow,
                LogLevel::Info => Color::Reset,
                LogLevel::Debug | LogLevel::Trace => Color::DarkGray,
            };
            Line::from(vec![
                Span::styled(format!("{:5} ", l.level.as_str()), Style::default().fg(color)),
                Span::raw(l.message),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Logs")),
        area,
    );
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        match app.current_view {
            View::Farm => " q quit | tab view | j/k select | s stake | w unstake | h harvest | a harvest all | r refresh | x account | l logs ",
            View::Stake => " q quit | tab view | s stake | u unstake | c claim | d distribute | r refresh | x account | l logs ",
        },
        Style::default().fg(Color::DarkGray),
    )];

    if let Some(op) = app.pending_mutation {
        spans.push(Span::styled(
            format!("[{} pending...] ", op.label()),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(notice) = &app.notice {
        let color = if notice.is_error { Color::Red } else { Color::Green };
        spans.push(Span::styled(notice.text.clone(), Style::default().fg(color)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_input_popup(frame: &mut Frame, app: &App) {
    let Some(input) = &app.input else { return };

    let area = centered_rect(50, 3, frame.area());
    frame.render_widget(Clear, area);
    let body = Line::from(vec![
        Span::raw(input.buffer.clone()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    frame.render_widget(
        Paragraph::new(body).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} (Enter to confirm, Esc to cancel) ", input.kind.prompt())),
        ),
        area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
