//! # Semantic Analysis
//!
//! This module turns parsed Python statements into [`SymbolRecord`]s: the
//! statement classifier decides what kind of symbol a statement introduces,
//! the scope-aware extractor walks its definition for external reads, and
//! the record builders tie the two together with the correct
//! initially-bound name set per kind.
//!
//! [`Analyzer`] is the configured entry point; [`ParseCache`] is an
//! optional structural-hash-keyed memo on top of it.

pub mod analyzer;
pub mod cache;
pub mod classifier;
pub mod extractor;
pub mod lookup;
pub mod record;

pub use analyzer::Analyzer;
pub use cache::ParseCache;
pub use classifier::StatementKind;
pub use extractor::DependencyExtractor;
pub use lookup::{ModuleSymbolLookup, StaticModuleIndex};
pub use record::{RecordStatus, SymbolKind, SymbolRecord};
