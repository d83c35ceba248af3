//! Auto and multi-spin controller.
//!
//! A small state machine driven by the control loop: [`AutoSpin::start`] moves
//! from idle to running and spins right away, [`AutoSpin::on_tick`] issues the
//! next spin once the interval has elapsed, and [`AutoSpin::stop`] returns to
//! idle immediately. The running flag on the engine is updated in the same
//! call that changes the controller state, so the display never lags behind.

use crate::engine::SlotEngine;
use crate::game::SpinMode;
use crate::spin::{SpinError, SpinResult};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoSpinState {
    #[default]
    Idle,
    Running {
        mode: SpinMode,
        /// Spins left to issue; `None` runs until stopped.
        remaining: Option<u32>,
    },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Player,
    Exhausted,
    InsufficientFunds,
}

/// What a controller step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Nothing is running.
    Idle,
    /// Running, but the next spin is not due yet.
    Waiting,
    /// A spin completed; `stopped` is set when it ended the run.
    Spun { result: SpinResult, stopped: Option<StopReason> },
    /// The run ended without spinning.
    Stopped(StopReason),
}

#[derive(Debug, Clone)]
pub struct AutoSpin {
    state: AutoSpinState,
    interval: Duration,
    next_at: Option<Instant>,
}

impl Default for AutoSpin {
    fn default() -> Self {
        Self::new(Duration::from_millis(400))
    }
}

impl AutoSpin {
    pub fn new(interval: Duration) -> Self {
        Self { state: AutoSpinState::Idle, interval, next_at: None }
    }

    pub fn state(&self) -> AutoSpinState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AutoSpinState::Running { .. })
    }

    /// Spins left in the current run, if it is bounded.
    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            AutoSpinState::Running { remaining, .. } => remaining,
            AutoSpinState::Idle => None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start a run in `mode` and issue its first spin.
    ///
    /// Manual mode performs a single spin and stays idle. Starting while a run
    /// is already in progress does nothing.
    pub fn start(
        &mut self,
        mode: SpinMode,
        engine: &mut dyn SlotEngine,
        now: Instant,
    ) -> Result<Tick, SpinError> {
        if self.is_running() {
            return Ok(Tick::Waiting);
        }
        if !engine.can_spin() {
            return Err(SpinError::InvalidBet { bet: engine.bet(), balance: engine.balance() });
        }
        if mode == SpinMode::Manual {
            let result = engine.spin()?;
            return Ok(Tick::Spun { result, stopped: None });
        }
        info!(mode = mode.label(), "auto-spin started");
        self.state = AutoSpinState::Running { mode, remaining: mode.spin_count() };
        engine.set_running(true);
        Ok(self.spin_once(engine, now))
    }

    /// Issue the next spin if one is due.
    pub fn on_tick(&mut self, engine: &mut dyn SlotEngine, now: Instant) -> Tick {
        if !self.is_running() {
            return Tick::Idle;
        }
        if self.next_at.is_some_and(|at| now < at) {
            return Tick::Waiting;
        }
        if !engine.can_spin() {
            self.finish(engine, StopReason::InsufficientFunds);
            return Tick::Stopped(StopReason::InsufficientFunds);
        }
        self.spin_once(engine, now)
    }

    /// Stop the current run. Returns false if nothing was running.
    pub fn stop(&mut self, engine: &mut dyn SlotEngine) -> bool {
        if !self.is_running() {
            return false;
        }
        self.finish(engine, StopReason::Player);
        true
    }

    fn spin_once(&mut self, engine: &mut dyn SlotEngine, now: Instant) -> Tick {
        let result = match engine.spin() {
            Ok(r) => r,
            Err(err) => {
                debug!(%err, "auto-spin halted by rejected spin");
                self.finish(engine, StopReason::InsufficientFunds);
                return Tick::Stopped(StopReason::InsufficientFunds);
            }
        };
        if let AutoSpinState::Running { remaining: Some(left), .. } = &mut self.state {
            *left = left.saturating_sub(1);
        }
        let stopped = if self.remaining() == Some(0) {
            Some(StopReason::Exhausted)
        } else if !engine.can_spin() {
            Some(StopReason::InsufficientFunds)
        } else {
            None
        };
        match stopped {
            Some(reason) => self.finish(engine, reason),
            None => self.next_at = Some(now + self.interval),
        }
        Tick::Spun { result, stopped }
    }

    fn finish(&mut self, engine: &mut dyn SlotEngine, reason: StopReason) {
        self.state = AutoSpinState::Idle;
        self.next_at = None;
        engine.set_running(false);
        info!(?reason, "auto-spin stopped");
    }
}
