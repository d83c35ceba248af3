use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{columns, inner};

pub(super) fn draw_machine(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(5), // reels
            Constraint::Length(4), // last result
            Constraint::Min(0),
            Constraint::Length(4), // status bar
        ])
        .split(size);

    draw_header(f, app, chunks[0]);
    draw_reels(f, app, chunks[1]);
    draw_last_result(f, app, chunks[2]);
    draw_status(f, app, chunks[4]);
}

fn draw_header(f: &mut Frame, app: &AppState, area: Rect) {
    let state = app.session().state();
    let profit = state.profit();
    let profit_style = if profit >= 0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    let running = if state.running() {
        let left = app
            .session()
            .autospin()
            .remaining()
            .map(|n| format!(" ({n} left)"))
            .unwrap_or_default();
        Span::styled(
            format!("  RUNNING{left}"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw("")
    };
    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("Balance: {}   ", state.balance())),
            Span::styled(format!("({profit:+})"), profit_style),
        ]),
        Line::from(vec![
            Span::raw(format!("Bet: {}   Mode: {}", state.bet(), state.mode().label())),
            running,
        ]),
    ];
    if let Some(pool) = state.jackpot() {
        lines[0].spans.push(Span::styled(
            format!("   Jackpot: {pool}"),
            Style::default().fg(Color::Magenta),
        ));
    }
    let header =
        Paragraph::new(lines).block(Block::default().title("slots-rs").borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_reels(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().title("Reels").borders(Borders::ALL);
    f.render_widget(block, area);
    let n = app.session().machine().engine().reels();
    let symbols = app.reel_symbols();
    let winning = !app.animating() && app.session().state().last_win().is_some_and(|r| r.is_win());
    for (i, cell) in columns(inner(area), n).into_iter().enumerate() {
        let text = symbols.as_ref().and_then(|s| s.get(i)).map(|&id| app.glyph(id)).unwrap_or("?");
        let style = if winning {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let para = Paragraph::new(Line::from(Span::styled(text, style)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(para, cell);
    }
}

fn draw_last_result(f: &mut Frame, app: &AppState, area: Rect) {
    let lines = match app.session().state().last_win() {
        None => vec![Line::from("No spins yet. Press Space to spin.")],
        Some(r) => {
            let symbols: Vec<&str> =
                r.outcome.as_slice().iter().map(|&id| app.glyph(id)).collect();
            let verdict = match (r.jackpot, r.multiplier) {
                (Some(pool), _) => Span::styled(
                    format!("JACKPOT {} (pool {pool})", r.payout),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                ),
                (None, Some(m)) => Span::styled(
                    format!("Won {} (x{m})", r.payout),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                (None, None) => {
                    Span::styled("No win", Style::default().add_modifier(Modifier::DIM))
                }
            };
            vec![
                Line::from(format!("#{}  {}  bet {}", r.sequence, symbols.join(" "), r.bet)),
                Line::from(verdict),
            ]
        }
    };
    let para =
        Paragraph::new(lines).block(Block::default().title("Last spin").borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner(area));

    let left = match app.message() {
        Some((text, true)) => {
            Line::from(Span::styled(text.to_string(), Style::default().fg(Color::Red)))
        }
        Some((text, false)) => Line::from(text.to_string()),
        None => Line::from(""),
    };
    let right = vec![
        Line::from("Space spin • A auto • ↑/↓ bet • ←/→ mode"),
        Line::from("S stats • ? help • Q quit"),
    ];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );
}
