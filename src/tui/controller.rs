use crate::session::View;
use crate::tui::app::{AppState, InputAction};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick(Instant::now());
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Map a key to an input action. Returns true when the app should exit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Char('?')) {
        let _ = app.handle_input(InputAction::ToggleHelp);
        return false;
    }
    if app.help_open() {
        if matches!(code, KeyCode::Esc) {
            let _ = app.handle_input(InputAction::ToggleHelp);
        }
        return false;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            let _ = app.handle_input(InputAction::Quit);
            return true;
        }
        KeyCode::Tab | KeyCode::Char('s') | KeyCode::Char('S') => {
            let _ = app.handle_input(InputAction::ToggleStats);
        }
        KeyCode::Char('g') | KeyCode::Char('G') => {
            let _ = app.handle_input(InputAction::ToggleGlyphs);
        }
        // start and stop must work from either view
        KeyCode::Char('a') | KeyCode::Char('A') => {
            let _ = app.handle_input(InputAction::ToggleAuto);
        }
        _ => match app.session().view() {
            View::Machine => match code {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    let _ = app.handle_input(InputAction::Spin);
                }
                KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => {
                    let _ = app.handle_input(InputAction::BetUp);
                }
                KeyCode::Down | KeyCode::Char('-') | KeyCode::Char('_') => {
                    let _ = app.handle_input(InputAction::BetDown);
                }
                KeyCode::Right | KeyCode::Char('m') | KeyCode::Char('M') => {
                    let _ = app.handle_input(InputAction::ModeNext);
                }
                KeyCode::Left => {
                    let _ = app.handle_input(InputAction::ModePrev);
                }
                _ => {}
            },
            View::Stats => match code {
                KeyCode::Right => {
                    let _ = app.handle_input(InputAction::TabNext);
                }
                KeyCode::Left => {
                    let _ = app.handle_input(InputAction::TabPrev);
                }
                KeyCode::Up => {
                    let _ = app.handle_input(InputAction::HistoryUp);
                }
                KeyCode::Down => {
                    let _ = app.handle_input(InputAction::HistoryDown);
                }
                KeyCode::Char(' ') => {
                    let _ = app.handle_input(InputAction::Spin);
                }
                _ => {}
            },
        },
    }
    false
}
