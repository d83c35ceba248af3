use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// Stable symbol identifiers, ordered from lowest to highest paying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SymbolId {
    Cherry = 0,
    Lemon = 1,
    Orange = 2,
    Grape = 3,
    Diamond = 4,
    Money = 5,
    Dice = 6,
    Star = 7,
}

impl SymbolId {
    pub const ALL: [SymbolId; 8] = [
        SymbolId::Cherry,
        SymbolId::Lemon,
        SymbolId::Orange,
        SymbolId::Grape,
        SymbolId::Diamond,
        SymbolId::Money,
        SymbolId::Dice,
        SymbolId::Star,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display glyph for this symbol. Total over every identifier.
    pub const fn glyph(self) -> &'static str {
        match self {
            SymbolId::Cherry => "🍒",
            SymbolId::Lemon => "🍋",
            SymbolId::Orange => "🍊",
            SymbolId::Grape => "🍇",
            SymbolId::Diamond => "💎",
            SymbolId::Money => "💰",
            SymbolId::Dice => "🎲",
            SymbolId::Star => "🌟",
        }
    }

    /// Fixed-width ASCII label for terminals without emoji support.
    pub const fn ascii(self) -> &'static str {
        match self {
            SymbolId::Cherry => "CHR",
            SymbolId::Lemon => "LEM",
            SymbolId::Orange => "ORG",
            SymbolId::Grape => "GRP",
            SymbolId::Diamond => "DIA",
            SymbolId::Money => "MNY",
            SymbolId::Dice => "DCE",
            SymbolId::Star => "STR",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SymbolId::Cherry => "Cherry",
            SymbolId::Lemon => "Lemon",
            SymbolId::Orange => "Orange",
            SymbolId::Grape => "Grape",
            SymbolId::Diamond => "Diamond",
            SymbolId::Money => "Money",
            SymbolId::Dice => "Dice",
            SymbolId::Star => "Star",
        }
    }

    /// Payout multiplier of the classic paytable.
    pub const fn default_multiplier(self) -> u64 {
        match self {
            SymbolId::Cherry => 2,
            SymbolId::Lemon => 3,
            SymbolId::Orange => 4,
            SymbolId::Grape => 5,
            SymbolId::Diamond => 10,
            SymbolId::Money => 15,
            SymbolId::Dice => 20,
            SymbolId::Star => 50,
        }
    }

    /// Rarity weight used by the weighted reel preset.
    pub const fn default_weight(self) -> u32 {
        match self {
            SymbolId::Cherry | SymbolId::Lemon => 5,
            SymbolId::Orange => 4,
            SymbolId::Grape | SymbolId::Diamond => 3,
            SymbolId::Money | SymbolId::Dice => 2,
            SymbolId::Star => 1,
        }
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SymbolParseError {
    #[error("invalid symbol: '{0}'")]
    Invalid(String),
}

impl FromStr for SymbolId {
    type Err = SymbolParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        SymbolId::ALL
            .into_iter()
            .find(|id| {
                id.name().eq_ignore_ascii_case(t)
                    || id.ascii().eq_ignore_ascii_case(t)
                    || id.glyph() == t
            })
            .ok_or_else(|| SymbolParseError::Invalid(s.to_string()))
    }
}

/// One entry of the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub multiplier: u64,
}

impl Symbol {
    pub const fn new(id: SymbolId, multiplier: u64) -> Self {
        Self { id, multiplier }
    }

    pub const fn glyph(&self) -> &'static str {
        self.id.glyph()
    }
}

/// Immutable mapping from symbol identifier to payout multiplier.
///
/// Built once at startup and validated: it is never empty, every multiplier is
/// positive and no identifier appears twice.
///
/// ```
/// use slots_rs::symbols::{SymbolId, SymbolTable};
///
/// let table = SymbolTable::classic();
/// assert_eq!(table.len(), 8);
/// assert_eq!(table.multiplier(SymbolId::Star), Some(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn try_new(symbols: Vec<Symbol>) -> Result<Self, ConfigError> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptySymbolTable);
        }
        for (i, s) in symbols.iter().enumerate() {
            if s.multiplier == 0 {
                return Err(ConfigError::InvalidMultiplier { symbol: s.id });
            }
            if symbols[..i].iter().any(|prev| prev.id == s.id) {
                return Err(ConfigError::DuplicateSymbol { symbol: s.id });
            }
        }
        Ok(Self { symbols })
    }

    /// The eight-symbol classic paytable.
    pub fn classic() -> Self {
        let symbols =
            SymbolId::ALL.iter().map(|&id| Symbol::new(id, id.default_multiplier())).collect();
        Self { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.symbols.iter().map(|s| s.id)
    }

    pub fn get(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.symbols.iter().any(|s| s.id == id)
    }

    pub fn multiplier(&self, id: SymbolId) -> Option<u64> {
        self.symbols.iter().find(|s| s.id == id).map(|s| s.multiplier)
    }

    /// Highest-paying symbol; ties resolve to the later table entry.
    pub fn top_symbol(&self) -> SymbolId {
        self.symbols
            .iter()
            .max_by_key(|s| s.multiplier)
            .map(|s| s.id)
            .unwrap_or(SymbolId::Star)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::classic()
    }
}

/// Display glyph lookup keyed by the stable identifier.
pub fn symbol_glyph(id: SymbolId) -> &'static str {
    id.glyph()
}
