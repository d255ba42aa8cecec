//! Context-sensitive production rules and the per-grammar rule index.
//!
//! A [`ContextRule`] is a structured record: a window pattern, the offset of
//! the replaced symbol inside that window, and the candidate productions.
//! The textual `"offset pattern..."` key micro-format accepted by grammars
//! is parsed in exactly one place, [`ContextIndex::from_grammar`]; everything
//! downstream works on the structured form.

use crate::grammar::{LSystem, Symbol, SymbolString, tokenize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A context-sensitive production: fires at a position in a host sequence
/// iff the symbol window anchored there equals `pattern` exactly.
///
/// `center` is the index of the replaced symbol within the pattern. A
/// context-free rule is the degenerate case: a one-symbol pattern with
/// center 0. A center of `-1` is also legal and anchors the window strictly
/// to the right of the replaced symbol, so the symbol itself contributes
/// nothing to the match and is rewritten on pure right context.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawContextRule")]
pub struct ContextRule {
    pattern: SymbolString,
    center: i32,
    alternatives: Vec<SymbolString>,
}

impl ContextRule {
    /// Creates a structured context rule directly, bypassing the textual
    /// key format.
    ///
    /// `center` must lie in `-1..pattern.len()`; anything else could never
    /// fire meaningfully and is rejected.
    pub fn new(
        pattern: SymbolString,
        center: i32,
        alternatives: Vec<SymbolString>,
    ) -> Option<Self> {
        if pattern.is_empty() || center < -1 || center as i64 >= pattern.len() as i64 {
            return None;
        }
        Some(Self {
            pattern,
            center,
            alternatives,
        })
    }

    /// The window pattern this rule matches against.
    pub fn pattern(&self) -> &[Symbol] {
        &self.pattern
    }

    /// Offset of the replaced symbol within the pattern; `-1` anchors the
    /// pattern one symbol to the right.
    pub fn center(&self) -> i32 {
        self.center
    }

    /// The candidate productions for the replaced symbol.
    pub fn alternatives(&self) -> &[SymbolString] {
        &self.alternatives
    }

    /// Tests this rule at position `at` of `symbols`.
    ///
    /// The window is `[at - center, at - center + pattern.len())`. A window
    /// that would extend before index 0 or past the end of `symbols` never
    /// fires; that is a non-match, not an error. Returns the candidate
    /// productions on a match.
    pub fn matches(&self, symbols: &[Symbol], at: usize) -> Option<&[SymbolString]> {
        let start = at as i64 - self.center as i64;
        if start < 0 {
            return None;
        }
        let start = start as usize;
        let window = symbols.get(start..start + self.pattern.len())?;
        if window == self.pattern.as_slice() {
            Some(&self.alternatives)
        } else {
            None
        }
    }
}

impl fmt::Display for ContextRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] at {} with {} alternative(s)",
            self.pattern.join(" "),
            self.center,
            self.alternatives.len()
        )
    }
}

/// Unvalidated mirror of [`ContextRule`] used during deserialization so that
/// stored rules go through the same center check as [`ContextRule::new`].
#[derive(Deserialize)]
struct RawContextRule {
    pattern: SymbolString,
    center: i32,
    alternatives: Vec<SymbolString>,
}

impl TryFrom<RawContextRule> for ContextRule {
    type Error = String;

    fn try_from(raw: RawContextRule) -> Result<Self, Self::Error> {
        let center = raw.center;
        ContextRule::new(raw.pattern, raw.center, raw.alternatives).ok_or_else(|| {
            format!("context rule center {center} must lie in -1..pattern length")
        })
    }
}

/// All context rules derived from one grammar, built once per driver.
#[derive(Clone, Debug, Default)]
pub struct ContextIndex {
    rules: Vec<ContextRule>,
    windowed: bool,
}

impl ContextIndex {
    /// Interprets every replacement key of `grammar` and collects the
    /// resulting context rules.
    ///
    /// Per key, after tokenizing:
    /// - 0 symbols: the key is discarded.
    /// - 1 symbol: registered as a degenerate rule (pattern = that symbol,
    ///   center 0).
    /// - 2+ symbols: the first symbol must parse as an integer offset in
    ///   `-1..remaining pattern length`; the rule is then registered with
    ///   the remaining symbols as pattern and that offset as center. If the
    ///   parse fails or the offset is out of range the whole key is
    ///   **silently discarded**, so in windowed mode its raw alternatives
    ///   become unreachable. Longstanding authoring-format quirk; kept
    ///   as-is rather than guessing a fallback.
    ///
    /// The index counts as windowed only if at least one multi-symbol key
    /// registered successfully. Otherwise the grammar is purely
    /// context-free and drivers take the fast lookup path.
    pub fn from_grammar(grammar: &LSystem) -> Self {
        let mut rules = Vec::new();
        let mut windowed = false;

        for key in grammar.replacement_keys() {
            let mut pattern = tokenize(key);
            let center = match pattern.len() {
                0 => continue,
                1 => 0,
                _ => {
                    let Ok(center) = pattern[0].parse::<i32>() else {
                        continue;
                    };
                    if center < -1 || center as i64 >= pattern.len() as i64 - 1 {
                        continue;
                    }
                    pattern.remove(0);
                    windowed = true;
                    center
                }
            };
            rules.push(ContextRule {
                pattern,
                center,
                alternatives: grammar.replacements(key).to_vec(),
            });
        }

        tracing::debug!(
            rules = rules.len(),
            windowed,
            "built context index"
        );
        Self { rules, windowed }
    }

    /// The registered rules, in deterministic (sorted-key) order.
    pub fn rules(&self) -> &[ContextRule] {
        &self.rules
    }

    /// Whether any windowed (multi-symbol) rule registered. When false the
    /// grammar has no context-sensitive productions and window matching is
    /// unnecessary.
    pub fn is_windowed(&self) -> bool {
        self.windowed
    }
}
