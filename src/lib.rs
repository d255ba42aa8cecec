//! # symbios-rewrite
//!
//! A sovereign expansion crate for L-System grammars: feed it an axiom plus
//! replacement rules, ask for a recursion level, and get back the symbol
//! sequence produced by rewriting every symbol level by level.
//!
//! It decouples grammar authoring from downstream interpretation (turtle
//! rendering, robot blueprints, audio, ...): the engine consumes an
//! already-parsed [`LSystem`] and exposes exactly one query,
//! [`Expander::expansion_for_level`]. Rules may be context-free or
//! context-sensitive, ambiguity between alternative productions is resolved
//! by a seeded per-driver random source, and every computed level is cached
//! so repeated queries never redo work.

pub mod context;
pub mod expander;
pub mod grammar;

pub use context::*;
pub use expander::*;
pub use grammar::*;
