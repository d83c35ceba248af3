//! Session statistics.
//!
//! The tracker is append-only: [`Stats::record`] is the sole mutator and every
//! accessor takes `&self`, so rendering can never alter the numbers it shows.

use crate::spin::{signed_diff, SpinResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of spins kept in the history.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    spins: u64,
    wins: u64,
    jackpots: u64,
    wagered: u64,
    won: u64,
    biggest_win: Option<SpinResult>,
    history: VecDeque<SpinResult>,
    history_limit: usize,
}

impl Default for Stats {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl Stats {
    /// `limit == 0` keeps the whole history.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            spins: 0,
            wins: 0,
            jackpots: 0,
            wagered: 0,
            won: 0,
            biggest_win: None,
            history: VecDeque::new(),
            history_limit: limit,
        }
    }

    /// Fold a completed spin into the totals and history.
    pub fn record(&mut self, result: SpinResult) {
        self.spins += 1;
        self.wagered = self.wagered.saturating_add(result.bet);
        self.won = self.won.saturating_add(result.payout);
        if result.is_win() {
            self.wins += 1;
        }
        if result.is_jackpot() {
            self.jackpots += 1;
        }
        let beats_biggest = match &self.biggest_win {
            Some(best) => result.payout > best.payout,
            None => result.payout > 0,
        };
        if beats_biggest {
            self.biggest_win = Some(result.clone());
        }
        self.history.push_back(result);
        if self.history_limit > 0 {
            while self.history.len() > self.history_limit {
                self.history.pop_front();
            }
        }
    }

    /// Returns the number of completed spins
    pub fn spins(&self) -> u64 {
        self.spins
    }

    /// Returns the number of spins that paid out
    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn jackpots(&self) -> u64 {
        self.jackpots
    }

    /// Returns the total amount bet
    pub fn wagered(&self) -> u64 {
        self.wagered
    }

    /// Returns the total amount paid out
    pub fn won(&self) -> u64 {
        self.won
    }

    /// Net result across all recorded spins.
    pub fn net(&self) -> i64 {
        signed_diff(self.won, self.wagered)
    }

    /// Percentage of spins that paid out.
    pub fn win_rate(&self) -> f64 {
        if self.spins == 0 {
            return 0.0;
        }
        self.wins as f64 * 100.0 / self.spins as f64
    }

    /// Paid out as a percentage of wagered.
    pub fn return_rate(&self) -> f64 {
        if self.wagered == 0 {
            return 0.0;
        }
        self.won as f64 * 100.0 / self.wagered as f64
    }

    /// Largest single payout; the earliest spin wins ties.
    pub fn biggest_win(&self) -> Option<&SpinResult> {
        self.biggest_win.as_ref()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Retained history, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &SpinResult> + ExactSizeIterator {
        self.history.iter()
    }

    pub fn last(&self) -> Option<&SpinResult> {
        self.history.back()
    }

    /// Up to `n` most recent spins, newest first.
    pub fn recent(&self, n: usize) -> Vec<&SpinResult> {
        self.recent_offset(n, 0)
    }

    /// Up to `n` spins, newest first, skipping the `offset` newest.
    pub fn recent_offset(&self, n: usize, offset: usize) -> Vec<&SpinResult> {
        self.history.iter().rev().skip(offset).take(n).collect()
    }

    /// Balance before the oldest retained spin followed by the balance after each
    /// retained spin. Empty when nothing has been recorded.
    pub fn balance_trail(&self) -> Vec<u64> {
        let Some(first) = self.history.front() else {
            return Vec::new();
        };
        let opening = first.balance_after.saturating_sub(first.payout).saturating_add(first.bet);
        std::iter::once(opening).chain(self.history.iter().map(|r| r.balance_after)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spin::ReelOutcome;
    use crate::symbols::SymbolId;

    fn result(sequence: u64, bet: u64, payout: u64, balance_after: u64) -> SpinResult {
        SpinResult {
            sequence,
            bet,
            outcome: ReelOutcome::new(vec![SymbolId::Cherry; 3]),
            payout,
            multiplier: (payout > 0).then(|| payout / bet.max(1)),
            jackpot: None,
            balance_after,
        }
    }

    fn record_payouts(stats: &mut Stats, payouts: &[u64]) {
        let mut balance = 1000u64;
        for (i, &p) in payouts.iter().enumerate() {
            balance = balance - 1 + p;
            stats.record(result(i as u64 + 1, 1, p, balance));
        }
    }

    #[test]
    fn biggest_win_uses_strict_comparison() {
        let mut stats = Stats::default();
        record_payouts(&mut stats, &[0, 5, 5, 12, 3]);
        let best = stats.biggest_win().unwrap();
        assert_eq!(best.payout, 12);
        assert_eq!(best.sequence, 4);

        stats.record(result(6, 1, 12, 1000));
        assert_eq!(stats.biggest_win().unwrap().sequence, 4);
    }

    #[test]
    fn no_biggest_win_without_a_payout() {
        let mut stats = Stats::default();
        record_payouts(&mut stats, &[0, 0, 0]);
        assert!(stats.biggest_win().is_none());
        assert_eq!(stats.spins(), 3);
        assert_eq!(stats.win_rate(), 0.0);
    }

    #[test]
    fn totals_track_every_spin() {
        let mut stats = Stats::default();
        record_payouts(&mut stats, &[0, 2, 0, 3]);
        assert_eq!(stats.spins(), 4);
        assert_eq!(stats.wins(), 2);
        assert_eq!(stats.wagered(), 4);
        assert_eq!(stats.won(), 5);
        assert_eq!(stats.net(), 1);
        assert_eq!(stats.win_rate(), 50.0);
    }

    #[test]
    fn history_is_bounded_but_totals_are_not() {
        let mut stats = Stats::with_history_limit(3);
        record_payouts(&mut stats, &[0, 0, 9, 0, 0]);
        assert_eq!(stats.history_len(), 3);
        assert_eq!(stats.spins(), 5);
        assert_eq!(stats.biggest_win().unwrap().payout, 9);
        let seqs: Vec<u64> = stats.recent(10).iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![5, 4, 3]);
    }

    #[test]
    fn recent_offset_pages_from_newest() {
        let mut stats = Stats::default();
        record_payouts(&mut stats, &[0; 10]);
        let page: Vec<u64> = stats.recent_offset(3, 2).iter().map(|r| r.sequence).collect();
        assert_eq!(page, vec![8, 7, 6]);
    }

    #[test]
    fn balance_trail_starts_before_first_spin() {
        let mut stats = Stats::default();
        assert!(stats.balance_trail().is_empty());
        record_payouts(&mut stats, &[0, 5]);
        assert_eq!(stats.balance_trail(), vec![1000, 999, 1003]);
    }

    #[test]
    fn extreme_balances_do_not_overflow() {
        let mut stats = Stats::default();
        stats.record(result(1, 10, 500, u64::MAX));
        assert_eq!(stats.balance_trail(), vec![u64::MAX - 490, u64::MAX]);
        stats.record(result(2, 1, u64::MAX, u64::MAX));
        assert_eq!(stats.net(), i64::MAX);
    }

    #[test]
    fn readers_leave_stats_untouched() {
        let mut stats = Stats::default();
        record_payouts(&mut stats, &[0, 4, 1]);
        let before = stats.clone();
        let _ = stats.recent(2);
        let _ = stats.balance_trail();
        let _ = stats.win_rate();
        let _ = stats.biggest_win();
        assert_eq!(stats, before);
    }
}
