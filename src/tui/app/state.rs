use crate::autospin::StopReason;
use crate::game::Direction;
use crate::session::{Command, Outcome, Session, View};
use crate::spin::SpinResult;
use crate::symbols::SymbolId;
use crate::tui::app::ReelAnimation;
use std::time::{Duration, Instant};
use tracing::warn;

/// Tabs of the statistics view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatsTab {
    #[default]
    Summary,
    History,
    Graph,
}

impl StatsTab {
    pub const ALL: [StatsTab; 3] = [StatsTab::Summary, StatsTab::History, StatsTab::Graph];

    pub const fn label(self) -> &'static str {
        match self {
            StatsTab::Summary => "Summary",
            StatsTab::History => "History",
            StatsTab::Graph => "Graph",
        }
    }

    fn next(self) -> Self {
        match self {
            StatsTab::Summary => StatsTab::History,
            StatsTab::History => StatsTab::Graph,
            StatsTab::Graph => StatsTab::Summary,
        }
    }

    fn prev(self) -> Self {
        match self {
            StatsTab::Summary => StatsTab::Graph,
            StatsTab::History => StatsTab::Summary,
            StatsTab::Graph => StatsTab::History,
        }
    }
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    Spin,
    ToggleAuto,
    BetUp,
    BetDown,
    ModeNext,
    ModePrev,
    ToggleStats,
    TabNext,
    TabPrev,
    HistoryUp,
    HistoryDown,
    ToggleHelp,
    ToggleGlyphs,
    Quit,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub started: Instant,
    session: Session,
    animation_frames: u32,
    animation: Option<ReelAnimation>,
    stats_tab: StatsTab,
    history_offset: usize,
    help_open: bool,
    ascii_glyphs: bool,
    message: Option<String>,
    message_is_error: bool,
    message_at: Option<Instant>,
}

impl AppState {
    pub const HISTORY_PAGE_SIZE: usize = 20;
    const MESSAGE_TTL: Duration = Duration::from_secs(3);

    pub fn new(session: Session, animation_frames: u32) -> Self {
        Self {
            started: Instant::now(),
            session,
            animation_frames,
            animation: None,
            stats_tab: StatsTab::Summary,
            history_offset: 0,
            help_open: false,
            ascii_glyphs: false,
            message: None,
            message_is_error: false,
            message_at: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stats_tab(&self) -> StatsTab {
        self.stats_tab
    }

    pub fn history_offset(&self) -> usize {
        self.history_offset
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn ascii_glyphs(&self) -> bool {
        self.ascii_glyphs
    }

    pub fn animating(&self) -> bool {
        self.animation.as_ref().is_some_and(|a| !a.done())
    }

    /// Returns the status message and whether it reports an error
    pub fn message(&self) -> Option<(&str, bool)> {
        self.message.as_deref().map(|m| (m, self.message_is_error))
    }

    /// Symbols to draw on the reels: the animation frame while spinning,
    /// otherwise the last settled outcome.
    pub fn reel_symbols(&self) -> Option<Vec<SymbolId>> {
        if let Some(anim) = self.animation.as_ref().filter(|a| !a.done()) {
            return Some(anim.current());
        }
        self.session.state().last_win().map(|r| r.outcome.as_slice().to_vec())
    }

    /// Display string for a symbol under the current glyph setting.
    pub fn glyph(&self, id: SymbolId) -> &'static str {
        if self.ascii_glyphs {
            id.ascii()
        } else {
            crate::symbols::symbol_glyph(id)
        }
    }

    /// A new run may not start until the last spin has finished displaying.
    /// Stopping a run is always allowed.
    fn reels_busy(&self) -> bool {
        self.animating() && !self.session.autospin().is_running()
    }

    fn set_message(&mut self, text: impl Into<String>, is_error: bool) {
        self.message = Some(text.into());
        self.message_is_error = is_error;
        self.message_at = Some(Instant::now());
    }

    fn clear_message(&mut self) {
        self.message = None;
        self.message_is_error = false;
        self.message_at = None;
    }

    fn command(&mut self, cmd: Command) -> bool {
        match self.session.handle(cmd, Instant::now()) {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(err) => {
                warn!(%err, "command rejected");
                self.set_message(format!("Cannot spin: {err}"), true);
                false
            }
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Nothing => false,
            Outcome::Spun { result, stopped } => {
                self.start_animation(&result);
                match stopped {
                    Some(reason) => self.set_message(stop_message(reason), false),
                    None => self.announce(&result),
                }
                true
            }
            Outcome::Stopped(reason) => {
                self.animation = None;
                self.set_message(stop_message(reason), false);
                true
            }
            Outcome::BetChanged(_) | Outcome::ViewChanged(_) => true,
            Outcome::ModeChanged(mode) => {
                self.set_message(format!("Mode: {}", mode.label()), false);
                true
            }
            Outcome::Quit => true,
        }
    }

    fn announce(&mut self, result: &SpinResult) {
        if let Some(pool) = result.jackpot {
            self.set_message(format!("JACKPOT! +{pool}"), false);
        } else if result.is_win() {
            self.set_message(format!("Win {}!", result.payout), false);
        } else {
            self.clear_message();
        }
    }

    fn start_animation(&mut self, result: &SpinResult) {
        let filler: Vec<SymbolId> = self.session.machine().engine().table().ids().collect();
        let target = result.outcome.as_slice().to_vec();
        self.animation = Some(ReelAnimation::new(target, filler, self.animation_frames));
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleHelp => {
                self.help_open = !self.help_open;
                false
            }
            InputAction::ToggleGlyphs => {
                self.ascii_glyphs = !self.ascii_glyphs;
                false
            }
            InputAction::Spin => {
                if self.reels_busy() {
                    return false;
                }
                self.command(Command::Spin)
            }
            InputAction::ToggleAuto => {
                if self.reels_busy() {
                    return false;
                }
                self.command(Command::ToggleAutoSpin)
            }
            InputAction::BetUp => self.command(Command::AdjustBet(Direction::Up)),
            InputAction::BetDown => self.command(Command::AdjustBet(Direction::Down)),
            InputAction::ModeNext => self.command(Command::ChangeMode(Direction::Up)),
            InputAction::ModePrev => self.command(Command::ChangeMode(Direction::Down)),
            InputAction::ToggleStats => {
                self.history_offset = 0;
                self.command(Command::ToggleStatsView)
            }
            InputAction::TabNext => {
                if self.session.view() == View::Stats {
                    self.stats_tab = self.stats_tab.next();
                }
                false
            }
            InputAction::TabPrev => {
                if self.session.view() == View::Stats {
                    self.stats_tab = self.stats_tab.prev();
                }
                false
            }
            InputAction::HistoryUp => {
                if self.session.view() == View::Stats && self.stats_tab == StatsTab::History {
                    let max_offset =
                        self.session.stats().history_len().saturating_sub(Self::HISTORY_PAGE_SIZE);
                    self.history_offset = (self.history_offset + 1).min(max_offset);
                }
                false
            }
            InputAction::HistoryDown => {
                if self.session.view() == View::Stats && self.history_offset > 0 {
                    self.history_offset -= 1;
                }
                false
            }
            InputAction::Quit => self.command(Command::Quit),
        }
    }

    /// Advance the animation and, once the reels have stopped, any running
    /// auto or multi-spin.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(at) = self.message_at {
            if now.saturating_duration_since(at) >= Self::MESSAGE_TTL {
                self.clear_message();
            }
        }
        if let Some(anim) = self.animation.as_mut() {
            if !anim.advance() {
                return;
            }
        }
        let outcome = self.session.tick(now);
        self.apply_outcome(outcome);
    }
}

fn stop_message(reason: StopReason) -> &'static str {
    match reason {
        StopReason::Player => "Auto-spin stopped",
        StopReason::Exhausted => "Run complete",
        StopReason::InsufficientFunds => "Insufficient funds: auto-spin stopped",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::reel::ScriptedReel;

    fn app(frames: u32) -> AppState {
        let source = Box::new(ScriptedReel::repeat(SymbolId::Grape));
        let session = Session::from_config(&GameConfig::default(), source).unwrap();
        AppState::new(session, frames)
    }

    #[test]
    fn manual_spin_is_ignored_while_reels_turn() {
        let mut app = app(4);
        assert!(app.handle_input(InputAction::Spin));
        assert!(app.animating());
        assert!(!app.handle_input(InputAction::Spin));
        assert_eq!(app.session().stats().spins(), 1);
    }

    #[test]
    fn auto_toggle_is_ignored_while_reels_turn() {
        let mut app = app(4);
        assert!(app.handle_input(InputAction::Spin));
        assert!(!app.handle_input(InputAction::ToggleAuto));
        assert!(!app.session().autospin().is_running());
        assert_eq!(app.session().stats().spins(), 1);

        let t = Instant::now() + Duration::from_secs(10);
        for _ in 0..4 {
            app.on_tick(t);
        }
        assert!(!app.animating());
        assert!(app.handle_input(InputAction::ToggleAuto));
        assert!(app.session().autospin().is_running());
        assert_eq!(app.session().stats().spins(), 2);
    }

    #[test]
    fn auto_toggle_stops_a_run_mid_animation() {
        let mut app = app(4);
        app.handle_input(InputAction::ToggleAuto);
        assert!(app.animating());
        assert!(app.handle_input(InputAction::ToggleAuto));
        assert!(!app.session().state().running());
    }

    #[test]
    fn auto_spin_waits_for_the_animation() {
        let mut app = app(3);
        app.handle_input(InputAction::ToggleAuto);
        let t = Instant::now() + Duration::from_secs(10);
        app.on_tick(t);
        app.on_tick(t);
        assert_eq!(app.session().stats().spins(), 1);
        app.on_tick(t);
        assert_eq!(app.session().stats().spins(), 2);
    }

    #[test]
    fn ascii_toggle_changes_glyphs() {
        let mut app = app(0);
        assert_eq!(app.glyph(SymbolId::Star), "🌟");
        app.handle_input(InputAction::ToggleGlyphs);
        assert_eq!(app.glyph(SymbolId::Star), "STR");
    }
}
