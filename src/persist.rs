//! Saving and restoring a session as JSON.

use crate::game::{BetLimits, GameState, SpinMode};
use crate::session::Session;
use crate::spin::SpinResult;
use crate::stats::Stats;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

/// Bumped whenever the record layout changes incompatibly.
pub const RECORD_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed save file: {0}")]
    Format(#[from] serde_json::Error),
    #[error("save file version {found} is not supported (expected {expected})")]
    Incompatible { found: u32, expected: u32 },
}

/// Everything needed to rebuild the game state and stats on restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub version: u32,
    pub balance: u64,
    pub starting_balance: u64,
    pub bet: u64,
    pub mode: SpinMode,
    pub jackpot: Option<u64>,
    pub spins_completed: u64,
    pub last_win: Option<SpinResult>,
    pub stats: Stats,
}

impl SessionRecord {
    pub fn capture(session: &Session) -> Self {
        let state = session.state();
        Self {
            version: RECORD_VERSION,
            balance: state.balance(),
            starting_balance: state.starting_balance(),
            bet: state.bet(),
            mode: state.mode(),
            jackpot: state.jackpot(),
            spins_completed: state.spins_completed(),
            last_win: state.last_win().cloned(),
            stats: session.stats().clone(),
        }
    }

    /// Rebuild the game state under `limits` and install it with the stats.
    ///
    /// The jackpot pool is only restored when the current configuration has
    /// the jackpot enabled.
    pub fn restore(self, session: &mut Session, limits: BetLimits) {
        let saved_pool = self.jackpot;
        let jackpot = session.state().jackpot().map(|current| saved_pool.unwrap_or(current));
        let state = GameState {
            balance: self.balance,
            starting_balance: self.starting_balance,
            bet: limits.clamp(self.bet, self.balance),
            limits,
            mode: self.mode,
            running: false,
            last_win: self.last_win,
            jackpot,
            spins_completed: self.spins_completed,
        };
        info!(balance = state.balance, spins = state.spins_completed, "session restored");
        session.restore(state, self.stats);
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, PersistError> {
        let record: SessionRecord = serde_json::from_str(s)?;
        if record.version != RECORD_VERSION {
            return Err(PersistError::Incompatible {
                found: record.version,
                expected: RECORD_VERSION,
            });
        }
        Ok(record)
    }

    /// Write atomically: a sibling temp file is renamed over `path`.
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = self.to_json()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        info!(path = %path.display(), "session saved");
        Ok(())
    }

    /// Load a record; a missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>, PersistError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::reel::ScriptedReel;
    use crate::symbols::SymbolId;

    #[test]
    fn version_mismatch_is_rejected() {
        let config = GameConfig::default();
        let s = Session::from_config(&config, Box::new(ScriptedReel::repeat(SymbolId::Cherry)))
            .unwrap();
        let mut record = SessionRecord::capture(&s);
        record.version = RECORD_VERSION + 1;
        let json = record.to_json().unwrap();
        assert!(matches!(
            SessionRecord::from_json(&json),
            Err(PersistError::Incompatible { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn garbage_is_a_format_error() {
        assert!(matches!(SessionRecord::from_json("{ nope"), Err(PersistError::Format(_))));
    }
}
