//! Command handling for one play session.
//!
//! The UI translates key presses into [`Command`]s and hands them to
//! [`Session::handle`]; the control loop calls [`Session::tick`] between
//! inputs. Everything the renderer needs is available through `&self`.

use crate::autospin::{AutoSpin, StopReason, Tick};
use crate::config::{ConfigError, GameConfig};
use crate::game::{Direction, GameState, SpinMode};
use crate::machine::Machine;
use crate::reel::ReelSource;
use crate::spin::{SpinError, SpinResult};
use crate::stats::Stats;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Spin in the current mode, or stop a run in progress.
    Spin,
    ToggleAutoSpin,
    AdjustBet(Direction),
    ChangeMode(Direction),
    ToggleStatsView,
    Stop,
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Machine,
    Stats,
}

/// Observable effect of a command or tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Nothing,
    Spun { result: SpinResult, stopped: Option<StopReason> },
    Stopped(StopReason),
    BetChanged(u64),
    ModeChanged(SpinMode),
    ViewChanged(View),
    Quit,
}

impl From<Tick> for Outcome {
    fn from(tick: Tick) -> Self {
        match tick {
            Tick::Idle | Tick::Waiting => Outcome::Nothing,
            Tick::Spun { result, stopped } => Outcome::Spun { result, stopped },
            Tick::Stopped(reason) => Outcome::Stopped(reason),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    machine: Machine,
    autospin: AutoSpin,
    view: View,
}

impl Session {
    pub fn new(machine: Machine, autospin: AutoSpin) -> Self {
        Self { machine, autospin, view: View::Machine }
    }

    /// Session over a fresh machine built from `config`.
    pub fn from_config(
        config: &GameConfig,
        source: Box<dyn ReelSource>,
    ) -> Result<Self, ConfigError> {
        let machine = Machine::from_config(config, source)?;
        Ok(Self::new(machine, AutoSpin::new(config.autospin_interval())))
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn state(&self) -> &GameState {
        self.machine.state()
    }

    pub fn stats(&self) -> &Stats {
        self.machine.stats()
    }

    pub fn autospin(&self) -> &AutoSpin {
        &self.autospin
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Apply one player command.
    ///
    /// Only a spin can fail; a rejected bet leaves the session unchanged.
    pub fn handle(&mut self, cmd: Command, now: Instant) -> Result<Outcome, SpinError> {
        debug!(?cmd, "command");
        match cmd {
            Command::Spin => {
                if self.autospin.stop(&mut self.machine) {
                    return Ok(Outcome::Stopped(StopReason::Player));
                }
                let mode = self.machine.state().mode();
                Ok(self.autospin.start(mode, &mut self.machine, now)?.into())
            }
            Command::ToggleAutoSpin => {
                if self.autospin.stop(&mut self.machine) {
                    return Ok(Outcome::Stopped(StopReason::Player));
                }
                let mode = match self.machine.state().mode() {
                    SpinMode::Manual => SpinMode::Auto,
                    other => other,
                };
                let tick = self.autospin.start(mode, &mut self.machine, now)?;
                self.machine.state_mut().set_mode(mode);
                Ok(tick.into())
            }
            Command::AdjustBet(dir) => {
                if self.machine.state_mut().adjust_bet(dir) {
                    Ok(Outcome::BetChanged(self.machine.state().bet()))
                } else {
                    Ok(Outcome::Nothing)
                }
            }
            Command::ChangeMode(dir) => {
                self.autospin.stop(&mut self.machine);
                let current = self.machine.state().mode();
                let mode = match dir {
                    Direction::Up => current.next(),
                    Direction::Down => current.prev(),
                };
                self.machine.state_mut().set_mode(mode);
                Ok(Outcome::ModeChanged(mode))
            }
            Command::ToggleStatsView => {
                self.view = match self.view {
                    View::Machine => View::Stats,
                    View::Stats => View::Machine,
                };
                Ok(Outcome::ViewChanged(self.view))
            }
            Command::Stop => {
                if self.autospin.stop(&mut self.machine) {
                    Ok(Outcome::Stopped(StopReason::Player))
                } else {
                    Ok(Outcome::Nothing)
                }
            }
            Command::Quit => {
                self.autospin.stop(&mut self.machine);
                Ok(Outcome::Quit)
            }
        }
    }

    /// Advance a running auto or multi-spin.
    pub fn tick(&mut self, now: Instant) -> Outcome {
        self.autospin.on_tick(&mut self.machine, now).into()
    }

    /// Replace player state and stats. Any run in progress is stopped first.
    pub fn restore(&mut self, mut state: GameState, stats: Stats) {
        self.autospin.stop(&mut self.machine);
        state.set_running(false);
        self.machine.restore(state, stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::ScriptedReel;
    use crate::symbols::SymbolId;

    fn session() -> Session {
        let script = ScriptedReel::try_new(vec![SymbolId::Cherry, SymbolId::Lemon]).unwrap();
        Session::from_config(&GameConfig::default(), Box::new(script)).unwrap()
    }

    #[test]
    fn toggle_auto_from_manual_switches_mode() {
        let mut s = session();
        let out = s.handle(Command::ToggleAutoSpin, Instant::now()).unwrap();
        assert!(matches!(out, Outcome::Spun { stopped: None, .. }));
        assert_eq!(s.state().mode(), SpinMode::Auto);
        assert!(s.state().running());
        let out = s.handle(Command::ToggleAutoSpin, Instant::now()).unwrap();
        assert_eq!(out, Outcome::Stopped(StopReason::Player));
        assert!(!s.state().running());
    }

    #[test]
    fn changing_mode_stops_a_run() {
        let mut s = session();
        s.handle(Command::ToggleAutoSpin, Instant::now()).unwrap();
        let out = s.handle(Command::ChangeMode(Direction::Up), Instant::now()).unwrap();
        assert_eq!(out, Outcome::ModeChanged(SpinMode::Multi5));
        assert!(!s.autospin().is_running());
        assert!(!s.state().running());
    }

    #[test]
    fn stop_when_idle_is_a_no_op() {
        let mut s = session();
        assert_eq!(s.handle(Command::Stop, Instant::now()).unwrap(), Outcome::Nothing);
    }

    #[test]
    fn bet_at_limit_reports_nothing() {
        let mut s = session();
        for _ in 0..20 {
            s.handle(Command::AdjustBet(Direction::Up), Instant::now()).unwrap();
        }
        assert_eq!(s.state().bet(), 100);
        let out = s.handle(Command::AdjustBet(Direction::Up), Instant::now()).unwrap();
        assert_eq!(out, Outcome::Nothing);
    }
}
