//! Grammar data model: symbols, tokenization, and the [`LSystem`] rule table.
//!
//! An [`LSystem`] is the "Genotype" side of the pipeline: an axiom plus a
//! table mapping replacement keys to one or more alternative productions.
//! It is an already-parsed data structure; this crate never reads grammar
//! source files. Authoring tools populate it directly or via serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An atomic grammar symbol. Equality is exact string equality.
pub type Symbol = String;

/// An ordered sequence of symbols representing one generation's state.
pub type SymbolString = Vec<Symbol>;

/// Splits a symbol specification string into an ordered symbol sequence.
///
/// Symbols are separated by any run of whitespace; order is preserved.
/// An empty or all-whitespace input yields an empty sequence.
///
/// ```
/// use symbios_rewrite::tokenize;
/// assert_eq!(tokenize("F + F"), vec!["F", "+", "F"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(text: &str) -> SymbolString {
    text.split_whitespace().map(str::to_owned).collect()
}

/// A stochastic, optionally context-sensitive L-System grammar.
///
/// Replacement keys are raw specification strings. A single-symbol key such
/// as `"F"` is a plain context-free rule. A multi-symbol key such as
/// `"1 a F b"` encodes a context window: the leading integer is the index of
/// the replaced symbol within the remaining pattern (here `F` between `a`
/// and `b`). See [`ContextIndex::from_grammar`](crate::ContextIndex::from_grammar)
/// for how keys are interpreted.
///
/// Keys are held in a sorted map so that downstream rule order, and with it
/// the order in which stochastic draws are consumed, does not depend on
/// insertion order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LSystem {
    /// The initial symbol sequence, expansion level 0.
    axiom: SymbolString,

    /// Alternative productions per replacement key. An absent key means
    /// "copy the symbol through unchanged"; more than one alternative makes
    /// the rewrite stochastic.
    replacements: BTreeMap<String, Vec<SymbolString>>,
}

impl LSystem {
    /// Creates an empty grammar with an empty axiom and no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grammar whose axiom is tokenized from `text`.
    pub fn with_axiom(text: &str) -> Self {
        Self {
            axiom: tokenize(text),
            replacements: BTreeMap::new(),
        }
    }

    /// Replaces the axiom.
    pub fn set_axiom(&mut self, axiom: SymbolString) {
        self.axiom = axiom;
    }

    /// The initial symbol sequence (expansion level 0).
    pub fn axiom(&self) -> &SymbolString {
        &self.axiom
    }

    /// Appends one alternative production under `key`.
    ///
    /// Calling this repeatedly with the same key accumulates alternatives,
    /// turning the rule stochastic.
    pub fn push_replacement(&mut self, key: impl Into<String>, alternative: SymbolString) {
        self.replacements.entry(key.into()).or_default().push(alternative);
    }

    /// Convenience form of [`push_replacement`](Self::push_replacement) that
    /// tokenizes the production from text.
    pub fn push_replacement_str(&mut self, key: impl Into<String>, alternative: &str) {
        self.push_replacement(key, tokenize(alternative));
    }

    /// The alternative productions registered under exactly `symbol`.
    ///
    /// Returns an empty slice when the symbol has no rule, which the rewrite
    /// passes treat as "copy through unchanged".
    pub fn replacements(&self, symbol: &str) -> &[SymbolString] {
        self.replacements
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All raw replacement keys, in sorted order.
    ///
    /// Keys may embed a leading context-offset symbol; they are interpreted
    /// by [`ContextIndex::from_grammar`](crate::ContextIndex::from_grammar),
    /// not here.
    pub fn replacement_keys(&self) -> impl Iterator<Item = &str> {
        self.replacements.keys().map(String::as_str)
    }
}
