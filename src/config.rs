//! Game configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config file.
//! Problems found here are fatal and surface before the terminal is taken over.

use crate::game::BetLimits;
use crate::reel::{RandomReels, Reel, ReelDistribution, ReelSource};
use crate::spin::JackpotRules;
use crate::stats::DEFAULT_HISTORY_LIMIT;
use crate::symbols::{Symbol, SymbolId, SymbolTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Upper bound on the number of reels the display can lay out.
pub const MAX_REELS: usize = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("symbol table is empty")]
    EmptySymbolTable,
    #[error("symbol {symbol} has a zero multiplier")]
    InvalidMultiplier { symbol: SymbolId },
    #[error("symbol {symbol} appears more than once")]
    DuplicateSymbol { symbol: SymbolId },
    #[error("invalid reel weights: {0}")]
    InvalidWeights(String),
    #[error("invalid bet limits: min {min}, max {max}, default {default}")]
    InvalidBetLimits { min: u64, max: u64, default: u64 },
    #[error("reel count must be between 1 and {max}, got {got}")]
    InvalidReelCount { got: usize, max: usize },
    #[error("missing sound asset: {}", path.display())]
    MissingSoundAsset { path: PathBuf },
    #[error("unreadable sound asset {}: {reason}", path.display())]
    InvalidSoundAsset { path: PathBuf, reason: String },
    #[error("cannot read config {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },
    #[error("malformed config: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { enabled: false, dir: PathBuf::from("assets/sounds") }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub initial_balance: u64,
    pub default_bet: u64,
    pub bet_limits: BetLimits,
    pub reels: usize,
    /// Paytable; `None` uses the classic eight symbols.
    pub symbols: Option<Vec<Symbol>>,
    pub distribution: ReelDistribution,
    /// Spins kept in history; 0 keeps everything.
    pub history_limit: usize,
    pub autospin_interval_ms: u64,
    /// Animation frames shown per spin; 0 disables the animation.
    pub animation_frames: u32,
    /// Progressive jackpot; `None` disables it.
    pub jackpot: Option<JackpotRules>,
    pub sound: SoundConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1000,
            default_bet: 10,
            bet_limits: BetLimits::default(),
            reels: 3,
            symbols: None,
            distribution: ReelDistribution::Uniform,
            history_limit: DEFAULT_HISTORY_LIMIT,
            autospin_interval_ms: 400,
            animation_frames: 12,
            jackpot: None,
            sound: SoundConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig =
            serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read { path: path.to_path_buf(), reason: e.to_string() })?;
        Self::from_json_str(&text)
    }

    /// Check every invariant the game relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = self.bet_limits;
        if limits.min == 0
            || limits.min > limits.max
            || self.default_bet < limits.min
            || self.default_bet > limits.max
        {
            return Err(ConfigError::InvalidBetLimits {
                min: limits.min,
                max: limits.max,
                default: self.default_bet,
            });
        }
        if self.reels == 0 || self.reels > MAX_REELS {
            return Err(ConfigError::InvalidReelCount { got: self.reels, max: MAX_REELS });
        }
        let table = self.symbol_table()?;
        Reel::try_new(&table, &self.distribution)?;
        Ok(())
    }

    pub fn symbol_table(&self) -> Result<SymbolTable, ConfigError> {
        match &self.symbols {
            None => Ok(SymbolTable::classic()),
            Some(symbols) => SymbolTable::try_new(symbols.clone()),
        }
    }

    /// Switch to the rarity-weighted reel preset for the configured table.
    pub fn use_rarity_weights(&mut self) -> Result<(), ConfigError> {
        let table = self.symbol_table()?;
        self.distribution = ReelDistribution::rarity(&table);
        Ok(())
    }

    /// Random reel source over the configured table and distribution.
    pub fn random_source(&self, seed: Option<u64>) -> Result<Box<dyn ReelSource>, ConfigError> {
        let table = self.symbol_table()?;
        let reel = Reel::try_new(&table, &self.distribution)?;
        let reels = match seed {
            Some(seed) => RandomReels::seeded(reel, seed),
            None => RandomReels::from_entropy(reel),
        };
        debug!(seed = reels.seed(), "reels seeded");
        Ok(Box::new(reels))
    }

    pub fn autospin_interval(&self) -> Duration {
        Duration::from_millis(self.autospin_interval_ms)
    }
}
