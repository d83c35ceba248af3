use crate::config::ConfigError;
use crate::symbols::{SymbolId, SymbolTable};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability distribution of a reel over the symbol table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelDistribution {
    /// Every symbol equally likely.
    #[default]
    Uniform,
    /// One weight per symbol table entry, in table order.
    Weighted(Vec<u32>),
}

impl ReelDistribution {
    /// Rarity preset: cheap fruit common, the star rare.
    pub fn rarity(table: &SymbolTable) -> Self {
        ReelDistribution::Weighted(table.ids().map(SymbolId::default_weight).collect())
    }
}

#[derive(Debug, Clone)]
enum Sampler {
    Uniform,
    Weighted(WeightedIndex<u32>),
}

/// A single reel: draws one symbol per call according to its distribution.
/// Draws are independent; no state persists besides the caller's RNG.
#[derive(Debug, Clone)]
pub struct Reel {
    symbols: Vec<SymbolId>,
    sampler: Sampler,
}

impl Reel {
    pub fn try_new(
        table: &SymbolTable,
        distribution: &ReelDistribution,
    ) -> Result<Self, ConfigError> {
        if table.is_empty() {
            return Err(ConfigError::EmptySymbolTable);
        }
        let symbols: Vec<SymbolId> = table.ids().collect();
        let sampler = match distribution {
            ReelDistribution::Uniform => Sampler::Uniform,
            ReelDistribution::Weighted(weights) => {
                if weights.len() != symbols.len() {
                    return Err(ConfigError::InvalidWeights(format!(
                        "expected {} weights, got {}",
                        symbols.len(),
                        weights.len()
                    )));
                }
                let index = WeightedIndex::new(weights.iter().copied())
                    .map_err(|e| ConfigError::InvalidWeights(e.to_string()))?;
                Sampler::Weighted(index)
            }
        };
        Ok(Self { symbols, sampler })
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> SymbolId {
        let idx = match &self.sampler {
            Sampler::Uniform => rng.random_range(0..self.symbols.len()),
            Sampler::Weighted(index) => index.sample(rng),
        };
        self.symbols[idx]
    }

    pub fn symbols(&self) -> &[SymbolId] {
        &self.symbols
    }
}

/// Source of reel symbols for the spin engine.
pub trait ReelSource: fmt::Debug {
    /// Draw the next symbol.
    fn draw(&mut self) -> SymbolId;
}

/// Random reel source backed by a seedable ChaCha RNG.
///
/// The sequence is effectively infinite and restartable: [`RandomReels::restart`]
/// replays it from the seed it was created with.
///
/// ```
/// use slots_rs::reel::{RandomReels, Reel, ReelDistribution};
/// use slots_rs::symbols::SymbolTable;
///
/// let reel = Reel::try_new(&SymbolTable::classic(), &ReelDistribution::Uniform).unwrap();
/// let mut a = RandomReels::seeded(reel.clone(), 7);
/// let mut b = RandomReels::seeded(reel, 7);
/// let xs: Vec<_> = a.stream().take(6).collect();
/// let ys: Vec<_> = b.stream().take(6).collect();
/// assert_eq!(xs, ys);
/// ```
#[derive(Debug, Clone)]
pub struct RandomReels {
    reel: Reel,
    rng: ChaCha8Rng,
    seed: u64,
}

impl RandomReels {
    pub fn seeded(reel: Reel, seed: u64) -> Self {
        Self { reel, rng: ChaCha8Rng::seed_from_u64(seed), seed }
    }

    /// Seed from the operating system RNG.
    pub fn from_entropy(reel: Reel) -> Self {
        let seed = rand::rng().random::<u64>();
        Self::seeded(reel, seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from the original seed.
    pub fn restart(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    /// Lazy, unbounded stream of draws.
    pub fn stream(&mut self) -> impl Iterator<Item = SymbolId> + '_ {
        std::iter::from_fn(move || Some(ReelSource::draw(&mut *self)))
    }
}

impl ReelSource for RandomReels {
    fn draw(&mut self) -> SymbolId {
        self.reel.draw(&mut self.rng)
    }
}

/// Deterministic source that cycles through a fixed script of symbols.
/// Used for replays and for forcing outcomes in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedReel {
    script: Vec<SymbolId>,
    pos: usize,
}

impl ScriptedReel {
    pub fn try_new(script: Vec<SymbolId>) -> Result<Self, ConfigError> {
        if script.is_empty() {
            return Err(ConfigError::EmptySymbolTable);
        }
        Ok(Self { script, pos: 0 })
    }

    /// Every draw yields `id`.
    pub fn repeat(id: SymbolId) -> Self {
        Self { script: vec![id], pos: 0 }
    }
}

impl ReelSource for ScriptedReel {
    fn draw(&mut self) -> SymbolId {
        let id = self.script[self.pos % self.script.len()];
        self.pos = (self.pos + 1) % self.script.len();
        id
    }
}

impl<S: ReelSource + ?Sized> ReelSource for Box<S> {
    fn draw(&mut self) -> SymbolId {
        (**self).draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_reel(dist: &ReelDistribution) -> Reel {
        Reel::try_new(&SymbolTable::classic(), dist).unwrap()
    }

    #[test]
    fn restart_replays_the_same_sequence() {
        let mut r = RandomReels::seeded(classic_reel(&ReelDistribution::Uniform), 42);
        let first: Vec<_> = r.stream().take(20).collect();
        r.restart();
        let again: Vec<_> = r.stream().take(20).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn uniform_draws_cover_the_table() {
        let mut r = RandomReels::seeded(classic_reel(&ReelDistribution::Uniform), 3);
        let mut seen = [false; 8];
        for id in r.stream().take(2000) {
            seen[id.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn zero_weight_symbols_never_appear() {
        let mut weights = vec![1; 8];
        weights[SymbolId::Star.index()] = 0;
        let mut r = RandomReels::seeded(classic_reel(&ReelDistribution::Weighted(weights)), 9);
        assert!(r.stream().take(5000).all(|id| id != SymbolId::Star));
    }

    #[test]
    fn rarity_preset_favours_cheap_symbols() {
        let table = SymbolTable::classic();
        let mut r = RandomReels::seeded(classic_reel(&ReelDistribution::rarity(&table)), 11);
        let mut counts = [0u32; 8];
        for id in r.stream().take(20_000) {
            counts[id.index()] += 1;
        }
        assert!(counts[SymbolId::Cherry.index()] > counts[SymbolId::Star.index()] * 2);
    }

    #[test]
    fn bad_weights_are_configuration_errors() {
        let table = SymbolTable::classic();
        let short = Reel::try_new(&table, &ReelDistribution::Weighted(vec![1, 2]));
        assert!(matches!(short, Err(ConfigError::InvalidWeights(_))));
        let zero = Reel::try_new(&table, &ReelDistribution::Weighted(vec![0; 8]));
        assert!(matches!(zero, Err(ConfigError::InvalidWeights(_))));
    }

    #[test]
    fn scripted_reel_cycles() {
        let mut r =
            ScriptedReel::try_new(vec![SymbolId::Cherry, SymbolId::Star]).unwrap();
        assert_eq!(r.draw(), SymbolId::Cherry);
        assert_eq!(r.draw(), SymbolId::Star);
        assert_eq!(r.draw(), SymbolId::Cherry);
        assert!(ScriptedReel::try_new(Vec::new()).is_err());
    }
}
