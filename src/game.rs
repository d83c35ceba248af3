use crate::spin::{signed_diff, SpinResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How a spin command is carried out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinMode {
    /// One spin per command.
    #[default]
    Manual,
    /// Spins until stopped.
    Auto,
    /// Five spins, then stops.
    Multi5,
    /// Ten spins, then stops.
    Multi10,
}

impl SpinMode {
    pub const ALL: [SpinMode; 4] =
        [SpinMode::Manual, SpinMode::Auto, SpinMode::Multi5, SpinMode::Multi10];

    /// Number of spins one start issues; `None` means until stopped.
    pub const fn spin_count(self) -> Option<u32> {
        match self {
            SpinMode::Manual => Some(1),
            SpinMode::Auto => None,
            SpinMode::Multi5 => Some(5),
            SpinMode::Multi10 => Some(10),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SpinMode::Manual => "Manual",
            SpinMode::Auto => "Auto",
            SpinMode::Multi5 => "Multi-5",
            SpinMode::Multi10 => "Multi-10",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Bounds and step size for bet adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetLimits {
    pub min: u64,
    pub max: u64,
    pub step: u64,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self { min: 1, max: 100, step: 10 }
    }
}

impl BetLimits {
    /// Clamp to `[min, max]`, and to the balance when the balance allows at least `min`.
    pub fn clamp(&self, bet: u64, balance: u64) -> u64 {
        let upper = self.max.min(balance.max(self.min));
        bet.clamp(self.min, upper.max(self.min))
    }
}

/// The player's state for the lifetime of the process.
///
/// Only spins, bet adjustment, mode changes and the auto-spin controller mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) balance: u64,
    pub(crate) starting_balance: u64,
    pub(crate) bet: u64,
    pub(crate) limits: BetLimits,
    pub(crate) mode: SpinMode,
    pub(crate) running: bool,
    pub(crate) last_win: Option<SpinResult>,
    pub(crate) jackpot: Option<u64>,
    pub(crate) spins_completed: u64,
}

impl GameState {
    pub fn new(balance: u64, bet: u64, limits: BetLimits) -> Self {
        Self {
            balance,
            starting_balance: balance,
            bet: limits.clamp(bet, balance),
            limits,
            mode: SpinMode::Manual,
            running: false,
            last_win: None,
            jackpot: None,
            spins_completed: 0,
        }
    }

    /// Enable the progressive jackpot with an initial pool.
    pub fn with_jackpot(mut self, pool: u64) -> Self {
        self.jackpot = Some(pool);
        self
    }

    /// Returns the current balance
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Returns the balance the session started with
    pub fn starting_balance(&self) -> u64 {
        self.starting_balance
    }

    /// Returns the current bet
    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn limits(&self) -> BetLimits {
        self.limits
    }

    pub fn mode(&self) -> SpinMode {
        self.mode
    }

    /// Whether an auto or multi run is in progress
    pub fn running(&self) -> bool {
        self.running
    }

    /// The most recent completed spin, winning or not.
    pub fn last_win(&self) -> Option<&SpinResult> {
        self.last_win.as_ref()
    }

    /// Current jackpot pool, if the jackpot is enabled
    pub fn jackpot(&self) -> Option<u64> {
        self.jackpot
    }

    pub fn spins_completed(&self) -> u64 {
        self.spins_completed
    }

    /// Profit or loss relative to the starting balance.
    pub fn profit(&self) -> i64 {
        signed_diff(self.balance, self.starting_balance)
    }

    pub fn can_afford(&self, bet: u64) -> bool {
        bet > 0 && bet <= self.balance
    }

    /// Move the bet one step, clamped to the limits and the balance.
    /// Returns whether the bet changed.
    pub fn adjust_bet(&mut self, dir: Direction) -> bool {
        let step = self.limits.step.max(1);
        let target = match dir {
            Direction::Up => self.bet.saturating_add(step),
            Direction::Down => self.bet.saturating_sub(step),
        };
        let next = self.limits.clamp(target, self.balance);
        if next == self.bet {
            return false;
        }
        debug!(old = self.bet, new = next, "bet adjusted");
        self.bet = next;
        true
    }

    pub fn set_bet(&mut self, bet: u64) {
        self.bet = self.limits.clamp(bet, self.balance);
    }

    pub(crate) fn set_mode(&mut self, mode: SpinMode) {
        if self.mode != mode {
            info!(from = self.mode.label(), to = mode.label(), "spin mode changed");
        }
        self.mode = mode;
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1000, 10, BetLimits::default())
    }
}
