use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint, Rect, Alignment},
    widgets::{Block, Borders, BorderType, Paragraph, Wrap, Clear},
    style::{Style, Modifier},
    text::{Line, Span},
};

use crate::app::{App, InputMode, TxTab, TxView};
use crate::confirm::Confirmation;
use crate::constants::{chain::NETWORK_NAME, retry::MAX_NOT_FOUND};
use crate::fee::input_amount;
use crate::router::Route;
use crate::stats::{NetworkStats, StatField};
use crate::tx_tracker::TxPhase;
use crate::util_text::{format_difficulty, format_hashrate, format_htn, format_thousands, truncate_middle};

/// One label/value line of a card. `flash` names the field whose change highlights it.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
    pub flash: Option<StatField>,
}

fn row(label: &'static str, value: String) -> Row {
    Row { label, value, flash: None }
}

fn flash_row(label: &'static str, value: String, field: StatField) -> Row {
    Row { label, value, flash: Some(field) }
}

fn or_dash<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

/// Rows of the "Network Info" card
pub fn network_rows(stats: &NetworkStats) -> Vec<Row> {
    let dag = stats.snapshot;
    let mut rows = vec![
        row("Network name", NETWORK_NAME.to_string()),
        flash_row("Virtual DAA Score", or_dash(dag.map(|d| format_thousands(d.virtual_daa_score))), StatField::VirtualDaaScore),
        flash_row("Block height", or_dash(dag.map(|d| format_thousands(d.block_count))), StatField::BlockCount),
        row("Difficulty", or_dash(stats.difficulty.map(format_difficulty))),
        flash_row("Hashrate", or_dash(stats.hashrate.and_then(format_hashrate)), StatField::Hashrate),
        flash_row("Header count", or_dash(dag.map(|d| format_thousands(d.header_count))), StatField::HeaderCount),
        row("Mempool size", or_dash(stats.mempool_size.map(format_thousands))),
        row("Server version", stats.server_version.clone()),
    ];
    if stats.hard_fork.active {
        rows.push(flash_row("Hard Fork Date", or_dash(stats.hard_fork.eta_display()), StatField::HardForkEta));
        rows.push(row("Time to Fork", or_dash(stats.hard_fork.countdown())));
    }
    rows
}

/// Rows of the transaction summary card (empty until the transaction is loaded)
pub fn tx_rows(view: &TxView, blue_score: u64, show_additional: bool) -> Vec<Row> {
    let Some(tx) = view.tx.as_ref() else {
        return Vec::new();
    };
    let mut status = if tx.is_accepted { "accepted".to_string() } else { "not accepted".to_string() };
    match view.confirmation(blue_score) {
        Some(c @ (Confirmation::Count(_) | Confirmation::Finalized)) => {
            status.push_str(" · ");
            status.push_str(&c.to_string());
        }
        _ => {}
    }

    let mut rows = vec![
        row("Tx ID", tx.id.clone()),
        row("Subnetwork ID", tx.subnetwork_id.clone()),
        row("Status", status),
        row("Block Time", block_time_display(tx.block_time)),
        row("Mass", or_dash(tx.mass)),
    ];
    if let Some(fee) = view.fee_sompi() {
        rows.push(row("Transaction Fee", format_htn(fee)));
    }
    if show_additional {
        rows.push(row("Hash", tx.hash.clone()));
        rows.push(row("Accepting Block Hash", or_dash(tx.accepting_block_hash.clone())));
        rows.push(row("Block Hashes", format!("({})", tx.block_hashes.len())));
        for hash in &tx.block_hashes {
            rows.push(row("", hash.clone()));
        }
    }
    rows
}

/// Local "YYYY-MM-DD HH:MM:SS" for a millisecond timestamp
pub fn block_time_display(ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".into())
}

const OUTPOINT_WIDTH: usize = 23;

/// Lines of the Inputs tab
pub fn input_lines(view: &TxView) -> Vec<String> {
    let Some(tx) = view.tx.as_ref() else { return Vec::new() };
    if tx.inputs.is_empty() {
        return vec!["No inputs at this transaction".into()];
    }
    tx.inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let amount = input_amount(tx, i, &view.previous)
                .map(|a| format_htn(a as i128))
                .unwrap_or_else(|| "?".into());
            let from = view
                .previous
                .get(&input.previous_outpoint_hash)
                .and_then(|p| crate::fee::output_at(&p.outputs, input.previous_outpoint_index))
                .and_then(|o| o.script_public_key_address.clone())
                .unwrap_or_default();
            format!(
                "#{i}  {}:{}  {amount}  {from}",
                truncate_middle(&input.previous_outpoint_hash, OUTPOINT_WIDTH),
                input.previous_outpoint_index
            )
        })
        .collect()
}

/// Lines of the Outputs tab
pub fn output_lines(view: &TxView) -> Vec<String> {
    let Some(tx) = view.tx.as_ref() else { return Vec::new() };
    tx.outputs
        .iter()
        .map(|o| {
            format!(
                "#{}  {}  {}",
                o.index,
                format_htn(o.amount as i128),
                o.script_public_key_address.as_deref().unwrap_or("")
            )
        })
        .collect()
}

/// Message shown while no transaction is displayed
pub fn tx_placeholder(view: &TxView) -> Option<(String, String)> {
    if view.tx.is_some() {
        return None;
    }
    Some(match view.phase {
        TxPhase::GaveUp => (
            "Transaction not found".into(),
            format!("No transaction with id {} after {MAX_NOT_FOUND} attempts.", view.id),
        ),
        TxPhase::Failed => (
            "Could not load transaction".into(),
            "The explorer API did not answer. Press r to retry.".into(),
        ),
        _ => (
            format!("Loading Transaction {}/{MAX_NOT_FOUND}", view.not_found_retries),
            "Sometimes transactions need a few minutes to be added into the database. Please wait...".into(),
        ),
    })
}

// ===============================
// Top-level draw
// ===============================
pub fn draw(f:&mut Frame, app:&App){
    let goto = app.input_mode() == InputMode::Goto;

    let mut constraints: Vec<Constraint> = Vec::with_capacity(4);
    constraints.push(Constraint::Length(2));                    // header
    if goto { constraints.push(Constraint::Length(3)); }        // goto prompt
    constraints.push(Constraint::Min(0));                       // body
    constraints.push(Constraint::Length(1));                    // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app); idx += 1;
    if goto {
        goto_bar(f, chunks[idx], app); idx += 1;
    }
    match app.route() {
        Route::Dashboard => dashboard(f, chunks[idx], app),
        Route::Tx { .. } => tx_page(f, chunks[idx], app),
    }
    idx += 1;
    footer(f, chunks[idx], app);

    if app.toast_message().is_some() {
        draw_toast(f, app);
    }
}

// ===============================
// Header / Goto
// ===============================
fn header(f:&mut Frame, area:Rect, app:&App){
    let on_tx = matches!(app.route(), Route::Tx { .. });
    let titles = [("Network", !on_tx), ("Transaction", on_tx)];

    let mut spans = vec![Span::styled(" htnx ", Style::default().fg(app.theme().accent).add_modifier(Modifier::BOLD))];
    for (title, active) in titles {
        spans.push(Span::raw("│ "));
        if active {
            spans.push(Span::styled(title, Style::default().fg(app.theme().accent).add_modifier(Modifier::BOLD)));
        } else {
            spans.push(Span::styled(title, Style::default().fg(app.theme().text_dim)));
        }
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM).border_type(BorderType::Plain).border_style(Style::default().fg(app.theme().border)));
    f.render_widget(paragraph, area);
}

fn goto_bar(f:&mut Frame, area:Rect, app:&App){
    let paragraph = Paragraph::new(app.goto_query())
        .style(Style::default().fg(app.theme().accent))
        .block(Block::default()
            .title(" Open transaction (id or link) ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(app.theme().accent)));
    f.render_widget(paragraph, area);

    if area.width > 2 {
        let x = area.x + 1 + (app.goto_query().len().min((area.width.saturating_sub(2)) as usize) as u16);
        f.set_cursor_position((x, area.y + 1));
    }
}

// ===============================
// Dashboard
// ===============================
fn dashboard(f:&mut Frame, area:Rect, app:&App){
    let stats = app.stats();
    let mut title = " Network Info ".to_string();
    if stats.fetch_error {
        title = " Network Info · fetch error, showing last values ".into();
    }
    let card = card(app, title);

    if stats.is_loading {
        let loading = Paragraph::new("Loading network info…")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme().text_dim))
            .block(card);
        f.render_widget(loading, area);
        return;
    }

    let lines = rows_to_lines(app, &network_rows(stats));
    f.render_widget(Paragraph::new(lines).block(card), area);
}

// ===============================
// Transaction page
// ===============================
fn tx_page(f:&mut Frame, area:Rect, app:&App){
    let Some(view) = app.tx_view() else { return };

    if let Some((title, hint)) = tx_placeholder(view) {
        let color = if view.phase == TxPhase::GaveUp || view.phase == TxPhase::Failed {
            app.theme().error
        } else {
            app.theme().text
        };
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(Span::styled(hint, Style::default().fg(app.theme().text_dim))),
        ];
        let p = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(card(app, " Transaction Details ".into()));
        f.render_widget(p, area);
        return;
    }

    let rows = tx_rows(view, app.blue_score(), app.show_additional());
    let summary_height = (rows.len() as u16 + 2).min(area.height / 2).max(3);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(summary_height), Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let mut lines = rows_to_lines(app, &rows);
    if let Some(line) = lines.iter_mut().find(|l| l.spans.first().is_some_and(|s| s.content.starts_with("Status"))) {
        if let Some(value) = line.spans.last_mut() {
            let accepted = view.tx.as_ref().is_some_and(|t| t.is_accepted);
            value.style = Style::default().fg(if accepted { app.theme().ok } else { app.theme().error });
        }
    }
    f.render_widget(Paragraph::new(lines).block(card(app, " Transaction Details ".into())), parts[0]);

    tab_bar(f, parts[1], app);

    let (title, body) = match app.tab() {
        TxTab::Outputs => (format!(" Outputs ({}) ", view.tx.as_ref().map_or(0, |t| t.outputs.len())), output_lines(view)),
        TxTab::Inputs => (format!(" Inputs ({}) ", view.tx.as_ref().map_or(0, |t| t.inputs.len())), input_lines(view)),
    };
    let body: Vec<Line> = body.into_iter().map(Line::from).collect();
    let list = Paragraph::new(body)
        .scroll((app.scroll(), 0))
        .style(Style::default().fg(app.theme().text))
        .block(card(app, title));
    f.render_widget(list, parts[2]);
}

fn tab_bar(f:&mut Frame, area:Rect, app:&App){
    let mut spans = Vec::new();
    for (tab, label) in [(TxTab::Outputs, " Outputs "), (TxTab::Inputs, " Inputs ")] {
        if app.tab() == tab {
            spans.push(Span::styled(label, Style::default().bg(app.theme().accent).fg(app.theme().text).add_modifier(Modifier::BOLD)));
        } else {
            spans.push(Span::styled(label, Style::default().fg(app.theme().text_dim)));
        }
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

// ===============================
// Footer / Toast
// ===============================
fn footer(f:&mut Frame, area:Rect, app:&App){
    let keys = match (app.input_mode(), app.route()) {
        (InputMode::Goto, _) => "Enter open · Esc cancel",
        (_, Route::Dashboard) => "g open tx · q quit",
        (_, Route::Tx { .. }) => "Tab outputs/inputs · d details · ↑↓ scroll · r reload · h home · g open tx · q quit",
    };
    let p = Paragraph::new(keys).style(Style::default().fg(app.theme().text_dim));
    f.render_widget(p, area);
}

fn draw_toast(f:&mut Frame, app:&App){
    let Some(msg) = app.toast_message() else { return };
    let area = f.area();
    let width = (msg.len() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height.saturating_sub(4),
        width,
        height: 3.min(area.height),
    };
    f.render_widget(Clear, rect);
    let p = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme().text))
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).border_style(Style::default().fg(app.theme().accent)));
    f.render_widget(p, rect);
}

// ===============================
// Helpers
// ===============================
fn card(app:&App, title:String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme().border))
}

fn rows_to_lines(app:&App, rows:&[Row]) -> Vec<Line<'static>> {
    let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
    rows.iter().map(|r| {
        let flashing = r.flash.is_some_and(|field| app.is_highlighted(field));
        let value_style = if flashing {
            Style::default().fg(app.theme().flash).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme().text).add_modifier(Modifier::BOLD)
        };
        Line::from(vec![
            Span::styled(format!("{:<width$}  ", r.label), Style::default().fg(app.theme().text_dim)),
            Span::styled(r.value.clone(), value_style),
        ])
    }).collect()
}
