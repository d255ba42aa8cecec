//! The [`Expander`] driver: memoized, seeded, level-by-level expansion.
//!
//! An expander owns its grammar, its random source, and an append-only cache
//! of every level computed so far (level 0 is the axiom). Requesting a level
//! grows the cache just far enough and never recomputes or re-draws for
//! levels already present, so for a fixed grammar and seed the full cache is
//! identical no matter in which order levels are queried.

use crate::context::ContextIndex;
use crate::grammar::{LSystem, Symbol, SymbolString};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Errors produced by [`Expander::expansion_for_level`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// The requested recursion level was negative. Levels arrive as signed
    /// integers because authoring frontends pass user input through
    /// unchecked.
    #[error("expansion level {0} is negative")]
    NegativeLevel(i32),
}

/// Random source owned by one driver. Tracks how many draws were consumed
/// so cache behavior is observable from tests.
#[derive(Debug)]
struct Stochastic {
    rng: StdRng,
    draws: u64,
}

impl Stochastic {
    fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Uniform draw in `0..n`. Only called for ambiguous positions, so the
    /// draw sequence is consumed level by level, left to right.
    fn pick(&mut self, n: usize) -> usize {
        self.draws += 1;
        self.rng.gen_range(0..n)
    }
}

/// Expands an L-System level by level, caching every expansion.
///
/// The expansion mode is fixed at construction: if the grammar's
/// [`ContextIndex`] contains at least one windowed rule, every pass runs
/// window matching; otherwise each symbol is rewritten by plain exact-key
/// lookup.
///
/// `expansion_for_level` takes `&mut self`; the exclusive borrow is the lock
/// guarding cache growth. Returned sequences borrow from the cache and are
/// never mutated after being appended. Two expanders never share a random
/// source; reproducibility requires the seed to be driver-local state.
#[derive(Debug)]
pub struct Expander {
    grammar: LSystem,
    /// `Some` iff the grammar has windowed rules; `None` selects the
    /// context-free fast path.
    contexts: Option<ContextIndex>,
    stochastic: Stochastic,
    /// Cached expansions, append-only. Index 0 is the axiom.
    cache: Vec<SymbolString>,
}

impl Expander {
    /// Creates an expander with a seed drawn from entropy.
    ///
    /// Use [`with_seed`](Self::with_seed) when the expansion must be
    /// reproducible.
    pub fn new(grammar: LSystem) -> Self {
        Self::with_seed(grammar, StdRng::from_entropy().r#gen())
    }

    /// Creates an expander resolving all ambiguous rewrites from `seed`.
    ///
    /// Two expanders built from the same grammar and seed produce identical
    /// sequences at every level, regardless of query order.
    pub fn with_seed(grammar: LSystem, seed: u64) -> Self {
        let index = ContextIndex::from_grammar(&grammar);
        let contexts = index.is_windowed().then_some(index);
        let cache = vec![grammar.axiom().clone()];
        Self {
            grammar,
            contexts,
            stochastic: Stochastic::seeded(seed),
            cache,
        }
    }

    /// Returns the expansion at the given recursion level.
    ///
    /// Level 0 is the axiom. Uncached levels are computed by applying one
    /// rewrite pass per level starting from the highest cached level; cached
    /// levels are returned as-is, consuming no further random draws.
    ///
    /// # Errors
    ///
    /// [`ExpandError::NegativeLevel`] if `level < 0`; the cache is left
    /// untouched.
    pub fn expansion_for_level(&mut self, level: i32) -> Result<&SymbolString, ExpandError> {
        if level < 0 {
            return Err(ExpandError::NegativeLevel(level));
        }
        let level = level as usize;
        while self.cache.len() <= level {
            let last = &self.cache[self.cache.len() - 1];
            let next = match &self.contexts {
                Some(index) => expand_windowed(index, last, &mut self.stochastic),
                None => expand_flat(&self.grammar, last, &mut self.stochastic),
            };
            tracing::debug!(
                level = self.cache.len(),
                symbols = next.len(),
                "expanded level"
            );
            self.cache.push(next);
        }
        Ok(&self.cache[level])
    }

    /// The grammar this expander was built from.
    pub fn grammar(&self) -> &LSystem {
        &self.grammar
    }

    /// Number of levels computed so far, axiom included.
    pub fn cached_levels(&self) -> usize {
        self.cache.len()
    }

    /// Number of random draws consumed so far.
    ///
    /// Draws happen only at ambiguous positions, so this also witnesses
    /// that cached queries perform no recomputation.
    pub fn draws(&self) -> u64 {
        self.stochastic.draws
    }

    /// Whether this expander runs window matching on every pass.
    pub fn is_windowed(&self) -> bool {
        self.contexts.is_some()
    }
}

/// One rewrite pass in context-free mode: exact-key lookup per symbol.
fn expand_flat(grammar: &LSystem, symbols: &[Symbol], stochastic: &mut Stochastic) -> SymbolString {
    let mut next = SymbolString::new();
    for symbol in symbols {
        let alternatives = grammar.replacements(symbol);
        match alternatives.len() {
            0 => next.push(symbol.clone()),
            1 => next.extend_from_slice(&alternatives[0]),
            n => next.extend_from_slice(&alternatives[stochastic.pick(n)]),
        }
    }
    next
}

/// One rewrite pass in context-aware mode.
///
/// Every rule is tested at every position; all firing rules pool their
/// alternatives into one candidate list, so overlapping or coinciding
/// patterns each contribute. The scan is deliberately exhaustive: a
/// one-rule-per-symbol map would lose that pooling.
fn expand_windowed(
    index: &ContextIndex,
    symbols: &[Symbol],
    stochastic: &mut Stochastic,
) -> SymbolString {
    let mut next = SymbolString::new();
    for at in 0..symbols.len() {
        let mut candidates: Vec<&SymbolString> = Vec::new();
        for rule in index.rules() {
            if let Some(alternatives) = rule.matches(symbols, at) {
                candidates.extend(alternatives.iter());
            }
        }
        match candidates.len() {
            0 => next.push(symbols[at].clone()),
            1 => next.extend_from_slice(candidates[0]),
            n => next.extend_from_slice(candidates[stochastic.pick(n)]),
        }
    }
    next
}
