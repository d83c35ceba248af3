use ratatui::backend::TestBackend;
use ratatui::Terminal;
use slots_rs::autospin::StopReason;
use slots_rs::config::GameConfig;
use slots_rs::game::{Direction, SpinMode};
use slots_rs::reel::ScriptedReel;
use slots_rs::session::{Command, Outcome, Session, View};
use slots_rs::spin::SpinError;
use slots_rs::symbols::SymbolId;
use slots_rs::tui::app::{AppState, InputAction};
use slots_rs::tui::ui;
use std::time::Instant;

fn session_with(script: Vec<SymbolId>, config: &GameConfig) -> Session {
    Session::from_config(config, Box::new(ScriptedReel::try_new(script).unwrap())).unwrap()
}

fn winning_session() -> Session {
    session_with(vec![SymbolId::Diamond], &GameConfig::default())
}

#[test]
fn last_win_survives_everything_but_a_spin() {
    let mut s = winning_session();
    let now = Instant::now();
    s.handle(Command::Spin, now).unwrap();
    let last = s.state().last_win().cloned();
    assert!(last.is_some());

    for cmd in [
        Command::ToggleStatsView,
        Command::ToggleStatsView,
        Command::Stop,
        Command::AdjustBet(Direction::Up),
        Command::AdjustBet(Direction::Down),
        Command::ChangeMode(Direction::Up),
        Command::ChangeMode(Direction::Down),
    ] {
        s.handle(cmd, now).unwrap();
        assert_eq!(s.state().last_win().cloned(), last, "changed by {cmd:?}");
    }
    assert_eq!(s.tick(now), Outcome::Nothing);
    assert_eq!(s.state().last_win().cloned(), last);

    s.handle(Command::Spin, now).unwrap();
    assert_ne!(s.state().last_win().cloned(), last);
}

#[test]
fn redraws_do_not_touch_state() {
    let mut app = AppState::new(winning_session(), 0);
    app.handle_input(InputAction::Spin);
    let before_state = app.session().state().clone();
    let before_stats = app.session().stats().clone();

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    for _ in 0..3 {
        terminal.draw(|f| ui::draw(f, &app)).unwrap();
        app.handle_input(InputAction::ToggleStats);
        app.handle_input(InputAction::TabNext);
    }
    terminal.draw(|f| ui::draw(f, &app)).unwrap();

    assert_eq!(app.session().state(), &before_state);
    assert_eq!(app.session().stats(), &before_stats);
}

#[test]
fn spin_key_stops_a_running_auto_spin() {
    let mut s = winning_session();
    let now = Instant::now();
    s.handle(Command::ChangeMode(Direction::Up), now).unwrap();
    assert_eq!(s.state().mode(), SpinMode::Auto);

    assert!(matches!(s.handle(Command::Spin, now).unwrap(), Outcome::Spun { .. }));
    assert!(s.state().running());
    assert_eq!(s.handle(Command::Spin, now).unwrap(), Outcome::Stopped(StopReason::Player));
    assert!(!s.state().running());
    assert_eq!(s.stats().spins(), 1);
}

#[test]
fn oversized_bet_is_a_non_fatal_error() {
    let config = GameConfig { initial_balance: 10, ..GameConfig::default() };
    let mut s = session_with(vec![SymbolId::Cherry, SymbolId::Lemon], &config);
    let now = Instant::now();
    s.handle(Command::Spin, now).unwrap();
    assert_eq!(s.state().balance(), 0);
    let err = s.handle(Command::Spin, now).unwrap_err();
    assert!(matches!(err, SpinError::InvalidBet { balance: 0, .. }));
    assert_eq!(s.stats().spins(), 1);
    // the session keeps accepting commands
    let out = s.handle(Command::ToggleStatsView, now).unwrap();
    assert_eq!(out, Outcome::ViewChanged(View::Stats));
}

#[test]
fn stats_count_matches_completed_spins() {
    let script = vec![SymbolId::Cherry, SymbolId::Lemon, SymbolId::Grape];
    let mut s = session_with(script, &GameConfig::default());
    let now = Instant::now();
    for _ in 0..12 {
        s.handle(Command::Spin, now).unwrap();
    }
    assert_eq!(s.stats().spins(), 12);
    assert_eq!(s.state().spins_completed(), 12);
    assert_eq!(s.stats().wagered(), 120);
}

#[test]
fn quit_stops_a_run() {
    let mut s = winning_session();
    let now = Instant::now();
    s.handle(Command::ToggleAutoSpin, now).unwrap();
    assert!(s.state().running());
    assert_eq!(s.handle(Command::Quit, now).unwrap(), Outcome::Quit);
    assert!(!s.state().running());
}
