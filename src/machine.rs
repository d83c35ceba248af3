//! The assembled slot machine: spin engine, player state, statistics and sound.

use crate::config::{ConfigError, GameConfig};
use crate::game::GameState;
use crate::reel::ReelSource;
use crate::sound::{SoundEffect, SoundManager};
use crate::spin::{SpinEngine, SpinError, SpinResult};
use crate::stats::Stats;

/// Owns everything a spin touches. A spin settles the balance, records the
/// result in the stats and triggers its sound before returning.
#[derive(Debug)]
pub struct Machine {
    engine: SpinEngine<Box<dyn ReelSource>>,
    state: GameState,
    stats: Stats,
    sound: SoundManager,
}

impl Machine {
    pub fn new(engine: SpinEngine<Box<dyn ReelSource>>, state: GameState, stats: Stats) -> Self {
        Self { engine, state, stats, sound: SoundManager::disabled() }
    }

    /// Build a machine from a validated config, drawing symbols from `source`.
    pub fn from_config(
        config: &GameConfig,
        source: Box<dyn ReelSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = SpinEngine::new(config.symbol_table()?, source, config.reels);
        let mut state =
            GameState::new(config.initial_balance, config.default_bet, config.bet_limits);
        if let Some(rules) = config.jackpot {
            engine = engine.with_jackpot(rules);
            state = state.with_jackpot(rules.seed);
        }
        Ok(Self::new(engine, state, Stats::with_history_limit(config.history_limit)))
    }

    pub fn with_sound(mut self, sound: SoundManager) -> Self {
        self.sound = sound;
        self
    }

    pub fn engine(&self) -> &SpinEngine<Box<dyn ReelSource>> {
        &self.engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn sound(&self) -> &SoundManager {
        &self.sound
    }

    /// Replace player state and stats, e.g. from a saved session.
    pub(crate) fn restore(&mut self, state: GameState, stats: Stats) {
        self.state = state;
        self.stats = stats;
    }

    /// Spin once at the current bet.
    pub fn spin(&mut self) -> Result<SpinResult, SpinError> {
        let bet = self.state.bet();
        let result = self.engine.spin(bet, &mut self.state)?;
        self.stats.record(result.clone());
        self.sound.play(SoundEffect::Spin);
        if let Some(effect) = SoundEffect::for_result(&result) {
            self.sound.play(effect);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::ScriptedReel;
    use crate::spin::JackpotRules;
    use crate::symbols::SymbolId;

    fn forced(id: SymbolId, config: &GameConfig) -> Machine {
        Machine::from_config(config, Box::new(ScriptedReel::repeat(id))).unwrap()
    }

    #[test]
    fn spin_updates_state_and_stats_together() {
        let config = GameConfig { initial_balance: 100, ..GameConfig::default() };
        let mut m = forced(SymbolId::Star, &config);
        let r = m.spin().unwrap();
        assert_eq!(r.payout, 500);
        assert_eq!(m.state().balance(), 590);
        assert_eq!(m.stats().spins(), 1);
        assert_eq!(m.stats().last(), Some(&r));
        assert!(!m.sound().enabled());
        assert_eq!(m.sound().failures(), 0);
    }

    #[test]
    fn rejected_spin_records_nothing() {
        let config = GameConfig {
            initial_balance: 5,
            default_bet: 10,
            ..GameConfig::default()
        };
        let mut m = forced(SymbolId::Star, &config);
        // bet is clamped to the balance at construction
        assert_eq!(m.state().bet(), 5);
        m.state_mut().bet = 10;
        assert!(matches!(m.spin(), Err(SpinError::InvalidBet { bet: 10, balance: 5 })));
        assert_eq!(m.state().balance(), 5);
        assert_eq!(m.stats().spins(), 0);
        assert!(m.state().last_win().is_none());
    }

    #[test]
    fn config_jackpot_seeds_the_pool() {
        let config = GameConfig {
            jackpot: Some(JackpotRules { seed: 250, increment: 5 }),
            ..GameConfig::default()
        };
        let mut m = forced(SymbolId::Lemon, &config);
        assert_eq!(m.state().jackpot(), Some(250));
        m.spin().unwrap();
        assert_eq!(m.state().jackpot(), Some(255));
    }
}
