use crate::stats::Stats;
use crate::tui::app::{AppState, StatsTab};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::inner;

/// Sparkline multiplies each value by the bar height, so values are rescaled
/// into `0..=GRAPH_SCALE` first.
const GRAPH_SCALE: u64 = 1000;

pub(super) fn draw_stats(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(3)])
        .split(size);

    f.render_widget(
        Paragraph::new(tab_line(app.stats_tab()))
            .block(Block::default().title("Statistics").borders(Borders::ALL)),
        chunks[0],
    );

    let body = chunks[1];
    let block = Block::default().title(app.stats_tab().label()).borders(Borders::ALL);
    f.render_widget(block, body);
    let stats = app.session().stats();
    let area = inner(body);
    match app.stats_tab() {
        StatsTab::Summary => draw_lines(f, summary_lines(app, stats), area),
        StatsTab::History => draw_lines(f, history_lines(app, stats), area),
        StatsTab::Graph => draw_graph(f, stats, area),
    }

    let keys = Line::from(Span::styled(
        "←/→ tab • ↑/↓ scroll • A auto • S back • Q quit",
        Style::default().add_modifier(Modifier::DIM),
    ));
    f.render_widget(
        Paragraph::new(keys)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );
}

fn draw_lines(f: &mut Frame, lines: Vec<Line<'static>>, area: Rect) {
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn tab_line(active: StatsTab) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, tab) in StatsTab::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        let style = if tab == active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(tab.label(), style));
    }
    Line::from(spans)
}

fn summary_lines(app: &AppState, stats: &Stats) -> Vec<Line<'static>> {
    let state = app.session().state();
    let elapsed = app.started.elapsed().as_secs();
    let mut lines = vec![
        Line::from(format!("Session:      {:02}:{:02}", elapsed / 60, elapsed % 60)),
        Line::from(format!("Spins:        {}", stats.spins())),
        Line::from(format!("Wins:         {} ({:.1}%)", stats.wins(), stats.win_rate())),
        Line::from(format!("Wagered:      {}", stats.wagered())),
        Line::from(format!("Paid out:     {}", stats.won())),
        Line::from(format!("Net:          {:+}", stats.net())),
        Line::from(format!("Return:       {:.1}%", stats.return_rate())),
        Line::from(format!(
            "Balance:      {} (started {})",
            state.balance(),
            state.starting_balance()
        )),
    ];
    if stats.jackpots() > 0 {
        lines.push(Line::from(format!("Jackpots:     {}", stats.jackpots())));
    }
    lines.push(Line::from(""));
    match stats.biggest_win() {
        Some(best) => {
            let symbols: Vec<&str> =
                best.outcome.as_slice().iter().map(|&id| app.glyph(id)).collect();
            lines.push(Line::from(Span::styled(
                format!(
                    "Biggest win:  {} on spin #{}  {}",
                    best.payout,
                    best.sequence,
                    symbols.join(" ")
                ),
                Style::default().fg(Color::Green),
            )));
        }
        None => lines.push(Line::from("Biggest win:  none yet")),
    }
    lines
}

fn history_lines(app: &AppState, stats: &Stats) -> Vec<Line<'static>> {
    let entries = stats.recent_offset(AppState::HISTORY_PAGE_SIZE, app.history_offset());
    if entries.is_empty() {
        return vec![Line::from("No history yet.")];
    }
    entries
        .into_iter()
        .map(|r| {
            let symbols: Vec<&str> =
                r.outcome.as_slice().iter().map(|&id| app.glyph(id)).collect();
            let text = format!(
                "#{:<5} {}  bet {:<4} {:>+6}  bal {}",
                r.sequence,
                symbols.join(" "),
                r.bet,
                r.net(),
                r.balance_after
            );
            let style = if r.is_jackpot() {
                Style::default().fg(Color::Magenta)
            } else if r.is_win() {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(Span::styled(text, style))
        })
        .collect()
}

/// The newest `width` points of the trail with their low and high values.
fn trail_window(trail: &[u64], width: usize) -> (&[u64], u64, u64) {
    let shown = &trail[trail.len().saturating_sub(width.max(1))..];
    let lo = shown.iter().copied().min().unwrap_or(0);
    let hi = shown.iter().copied().max().unwrap_or(lo);
    (shown, lo, hi)
}

/// Height of each bar above the window's low point, in `0..=GRAPH_SCALE`.
fn scaled_bars(shown: &[u64], lo: u64, hi: u64) -> Vec<u64> {
    let span = u128::from(hi - lo).max(1);
    shown
        .iter()
        .map(|&v| (u128::from(v - lo) * u128::from(GRAPH_SCALE) / span) as u64)
        .collect()
}

fn draw_graph(f: &mut Frame, stats: &Stats, area: Rect) {
    let trail = stats.balance_trail();
    if trail.len() < 2 {
        f.render_widget(Paragraph::new("Spin a few times to see the balance graph."), area);
        return;
    }
    let (shown, lo, hi) = trail_window(&trail, area.width as usize);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let title = format!("Balance over the last {} spins", shown.len() - 1);
    f.render_widget(Paragraph::new(title), rows[0]);
    f.render_widget(Paragraph::new(format!("high {hi}")), rows[1]);
    let spark = Sparkline::default()
        .data(scaled_bars(shown, lo, hi))
        .max(GRAPH_SCALE)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(spark, rows[2]);
    f.render_widget(Paragraph::new(format!("low  {lo}")), rows[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spin::{ReelOutcome, SpinResult};
    use crate::symbols::SymbolId;
    use ratatui::backend::TestBackend;

    fn settled(sequence: u64, balance_after: u64) -> SpinResult {
        SpinResult {
            sequence,
            bet: 1,
            outcome: ReelOutcome::new(vec![SymbolId::Cherry; 3]),
            payout: 0,
            multiplier: None,
            jackpot: None,
            balance_after,
        }
    }

    #[test]
    fn window_keeps_the_newest_points() {
        let trail = [50, 10, 40, 30];
        assert_eq!(trail_window(&trail, 3), (&trail[1..], 10, 40));
        assert_eq!(trail_window(&trail, 0), (&trail[3..], 30, 30));
    }

    #[test]
    fn bars_span_low_to_high() {
        assert_eq!(scaled_bars(&[0, 5, 10], 0, 10), vec![0, 500, 1000]);
        assert_eq!(scaled_bars(&[7, 7], 7, 7), vec![0, 0]);
        assert_eq!(scaled_bars(&[0, u64::MAX], 0, u64::MAX), vec![0, GRAPH_SCALE]);
    }

    #[test]
    fn graph_draws_extreme_balances() {
        let mut stats = Stats::default();
        stats.record(settled(1, 0));
        stats.record(settled(2, u64::MAX));
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal.draw(|f| draw_graph(f, &stats, f.area())).unwrap();
        let text: String =
            terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains(&format!("high {}", u64::MAX)));
        assert!(text.contains("low  0"));
    }
}
