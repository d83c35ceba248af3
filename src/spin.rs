use crate::game::GameState;
use crate::payout::evaluate_line;
use crate::reel::ReelSource;
use crate::symbols::{SymbolId, SymbolTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpinError {
    #[error("invalid bet {bet}: must be positive and at most the balance {balance}")]
    InvalidBet { bet: u64, balance: u64 },
}

/// Symbols landed on the payline, one per reel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReelOutcome(Vec<SymbolId>);

impl ReelOutcome {
    pub fn new(symbols: Vec<SymbolId>) -> Self {
        Self(symbols)
    }

    pub fn as_slice(&self) -> &[SymbolId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Glyphs joined by a space, e.g. "🍒 🍒 🍋".
    pub fn glyphs(&self) -> String {
        self.0.iter().map(|s| s.glyph()).collect::<Vec<_>>().join(" ")
    }
}

/// Record of one completed spin. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct SpinResult {
    /// 1-based spin number within the session.
    pub sequence: u64,
    pub bet: u64,
    pub outcome: ReelOutcome,
    /// Total credited for this spin, jackpot pool included.
    pub payout: u64,
    /// Matched symbol multiplier, when the line won.
    pub multiplier: Option<u64>,
    /// Pool amount paid on top of the line win, when the jackpot hit.
    pub jackpot: Option<u64>,
    /// Balance right after this spin settled.
    pub balance_after: u64,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.payout > 0
    }

    pub fn is_jackpot(&self) -> bool {
        self.jackpot.is_some()
    }

    /// Net change to the balance caused by this spin.
    pub fn net(&self) -> i64 {
        signed_diff(self.payout, self.bet)
    }
}

/// `gain - loss` as a signed amount, saturating at the `i64` bounds.
pub(crate) fn signed_diff(gain: u64, loss: u64) -> i64 {
    let diff = i128::from(gain) - i128::from(loss);
    i64::try_from(diff).unwrap_or(if diff > 0 { i64::MAX } else { i64::MIN })
}

/// Progressive jackpot parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JackpotRules {
    pub seed: u64,
    pub increment: u64,
}

/// Draws reel outcomes and settles them against a [`GameState`].
#[derive(Debug, Clone)]
pub struct SpinEngine<S> {
    table: SymbolTable,
    source: S,
    reels: usize,
    jackpot: Option<JackpotRules>,
}

impl<S: ReelSource> SpinEngine<S> {
    pub fn new(table: SymbolTable, source: S, reels: usize) -> Self {
        Self { table, source, reels: reels.max(1), jackpot: None }
    }

    pub fn with_jackpot(mut self, rules: JackpotRules) -> Self {
        self.jackpot = Some(rules);
        self
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn reels(&self) -> usize {
        self.reels
    }

    /// Perform one spin.
    ///
    /// Rejects a zero bet or a bet above the balance without touching `state`.
    /// Otherwise deducts the bet, credits the payout and records the result as
    /// `state.last_win`, all before returning.
    pub fn spin(&mut self, bet: u64, state: &mut GameState) -> Result<SpinResult, SpinError> {
        if !state.can_afford(bet) {
            warn!(bet, balance = state.balance, "spin rejected");
            return Err(SpinError::InvalidBet { bet, balance: state.balance });
        }

        let symbols: Vec<SymbolId> = (0..self.reels).map(|_| self.source.draw()).collect();
        let line = evaluate_line(&symbols, &self.table);
        let mut payout = line.map(|w| bet.saturating_mul(w.multiplier)).unwrap_or(0);

        let mut jackpot_paid = None;
        if let (Some(rules), Some(pool)) = (self.jackpot, state.jackpot) {
            let hit = line.is_some_and(|w| w.symbol == self.table.top_symbol());
            if hit {
                payout = payout.saturating_add(pool);
                jackpot_paid = Some(pool);
                state.jackpot = Some(rules.seed);
            } else {
                state.jackpot = Some(pool.saturating_add(rules.increment));
            }
        }

        // bet <= balance was checked above; a huge win pins the balance at u64::MAX
        let balance_after = (state.balance - bet).saturating_add(payout);
        state.balance = balance_after;
        state.spins_completed += 1;

        let result = SpinResult {
            sequence: state.spins_completed,
            bet,
            outcome: ReelOutcome::new(symbols),
            payout,
            multiplier: line.map(|w| w.multiplier),
            jackpot: jackpot_paid,
            balance_after,
        };
        debug!(
            seq = result.sequence,
            symbols = ?result.outcome.as_slice(),
            bet,
            payout,
            balance = balance_after,
            "spin settled"
        );
        state.last_win = Some(result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BetLimits;
    use crate::reel::ScriptedReel;

    fn engine(id: SymbolId) -> SpinEngine<ScriptedReel> {
        SpinEngine::new(SymbolTable::classic(), ScriptedReel::repeat(id), 3)
    }

    #[test]
    fn three_stars_pay_fifty_times() {
        let mut state = GameState::new(100, 10, BetLimits::default());
        let r = engine(SymbolId::Star).spin(10, &mut state).unwrap();
        assert_eq!(r.payout, 500);
        assert_eq!(state.balance(), 590);
        assert_eq!(state.last_win().map(|w| w.payout), Some(500));
        assert_eq!(r.sequence, 1);
    }

    #[test]
    fn losing_spin_still_becomes_last_result() {
        let script =
            ScriptedReel::try_new(vec![SymbolId::Cherry, SymbolId::Lemon, SymbolId::Star]).unwrap();
        let mut e = SpinEngine::new(SymbolTable::classic(), script, 3);
        let mut state = GameState::new(100, 10, BetLimits::default());
        let r = e.spin(10, &mut state).unwrap();
        assert!(!r.is_win());
        assert_eq!(state.balance(), 90);
        assert_eq!(state.last_win(), Some(&r));
    }

    #[test]
    fn zero_and_oversized_bets_are_rejected() {
        let mut state = GameState::new(5, 5, BetLimits::default());
        let before = state.clone();
        let mut e = engine(SymbolId::Star);
        assert_eq!(e.spin(0, &mut state), Err(SpinError::InvalidBet { bet: 0, balance: 5 }));
        assert_eq!(e.spin(10, &mut state), Err(SpinError::InvalidBet { bet: 10, balance: 5 }));
        assert_eq!(state, before);
    }

    #[test]
    fn jackpot_pool_grows_and_pays_out() {
        let rules = JackpotRules { seed: 1000, increment: 10 };
        let mut state = GameState::new(100, 10, BetLimits::default()).with_jackpot(1000);
        let mut miss = engine(SymbolId::Cherry).with_jackpot(rules);
        miss.spin(10, &mut state).unwrap();
        assert_eq!(state.jackpot(), Some(1010));

        let mut win = engine(SymbolId::Star).with_jackpot(rules);
        let r = win.spin(10, &mut state).unwrap();
        assert_eq!(r.jackpot, Some(1010));
        assert_eq!(r.payout, 500 + 1010);
        assert_eq!(state.jackpot(), Some(1000));
    }

    #[test]
    fn huge_win_saturates_the_balance() {
        let mut state = GameState::new(u64::MAX - 10, 10, BetLimits::default());
        let r = engine(SymbolId::Star).spin(10, &mut state).unwrap();
        assert_eq!(r.payout, 500);
        assert_eq!(state.balance(), u64::MAX);
        assert_eq!(r.balance_after, u64::MAX);
        assert_eq!(r.net(), 490);
    }

    #[test]
    fn net_saturates_instead_of_wrapping() {
        assert_eq!(signed_diff(u64::MAX, 0), i64::MAX);
        assert_eq!(signed_diff(0, u64::MAX), i64::MIN);
        assert_eq!(signed_diff(3, 10), -7);
    }

    #[test]
    fn jackpot_rules_without_pool_are_ignored() {
        let rules = JackpotRules { seed: 1000, increment: 10 };
        let mut state = GameState::new(100, 10, BetLimits::default());
        let r = engine(SymbolId::Star).with_jackpot(rules).spin(10, &mut state).unwrap();
        assert_eq!(r.jackpot, None);
        assert_eq!(r.payout, 500);
    }
}
