mod layout;
mod machine;
mod stats;

use crate::session::View;
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use layout::{centered_rect, inner};

pub fn draw(f: &mut Frame, app: &AppState) {
    match app.session().view() {
        View::Machine => machine::draw_machine(f, app),
        View::Stats => stats::draw_stats(f, app),
    }
    if app.help_open() {
        draw_help(f);
    }
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Machine:", bold)),
        Line::from("- Space: spin / start or stop a run"),
        Line::from("- A: toggle auto-spin"),
        Line::from("- Up / Down or + / -: bet up / down"),
        Line::from("- Left / Right: change mode"),
        Line::from("- G: emoji / ASCII symbols"),
        Line::from(""),
        Line::from(Span::styled("Stats:", bold)),
        Line::from("- Tab or S: open / close stats"),
        Line::from("- Left / Right: switch tab"),
        Line::from("- Up / Down: scroll history"),
        Line::from("- A: start / stop auto-spin"),
        Line::from(""),
        Line::from("- Q or Esc: quit"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}
