//! Payline evaluation.
//!
//! A line wins only when every reel shows the same symbol. Partial matches
//! (e.g. two of three) pay nothing.

use crate::symbols::{SymbolId, SymbolTable};

/// A winning payline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct LineWin {
    pub symbol: SymbolId,
    pub multiplier: u64,
}

/// Evaluate a payline against the table. Returns `None` for a losing line,
/// an empty line, or a symbol missing from the table.
///
/// ```
/// use slots_rs::payout::evaluate_line;
/// use slots_rs::symbols::{SymbolId, SymbolTable};
///
/// let table = SymbolTable::classic();
/// let win = evaluate_line(&[SymbolId::Dice; 3], &table).unwrap();
/// assert_eq!(win.multiplier, 20);
/// assert!(evaluate_line(&[SymbolId::Dice, SymbolId::Dice, SymbolId::Star], &table).is_none());
/// ```
pub fn evaluate_line(line: &[SymbolId], table: &SymbolTable) -> Option<LineWin> {
    let (&first, rest) = line.split_first()?;
    if rest.iter().any(|&s| s != first) {
        return None;
    }
    let multiplier = table.multiplier(first)?;
    Some(LineWin { symbol: first, multiplier })
}

/// Payout for `bet` on a line: `bet × multiplier`, or 0 for no win.
pub fn line_payout(bet: u64, line: &[SymbolId], table: &SymbolTable) -> u64 {
    evaluate_line(line, table).map(|w| bet.saturating_mul(w.multiplier)).unwrap_or(0)
}
