//! # symdep-base
//!
//! Core library for Python statement classification, scope analysis, and
//! dependency extraction.
//!
//! Given a fragment of Python source, `symdep` determines what the fragment
//! *defines* (a function, class, variable, or import) and what it *requires*
//! from its enclosing environment (free names and attribute paths such as
//! `math.sin`). Callers use the resulting [`SymbolRecord`]s as edges into
//! their own symbol table to drive incremental re-evaluation; this crate
//! never executes code and builds no graph of its own.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic    → classifier, scope-aware extractor, record builders,
//!               Analyzer façade, hash-keyed ParseCache
//!   ↓
//! fingerprint → structural hashing (position-free AST dump + blake3)
//!   ↓
//! parser      → source → AST: parsing, statement splitting, error snippets
//!   ↓
//! base        → primitives (DependencyPath)
//! error       → AnalysisError taxonomy
//! ```

// ============================================================================
// MODULES (dependency order: error/base → parser → fingerprint → semantic)
// ============================================================================

/// Error taxonomy shared by every layer
pub mod error;

/// Foundation types: DependencyPath
pub mod base;

/// Parsing layer: source text to AST, statement splitting
pub mod parser;

/// Structural hashing: formatting-insensitive content digests
pub mod fingerprint;

/// Semantic analysis: classification, dependency extraction, records
pub mod semantic;

// Re-export the working surface
pub use base::DependencyPath;
pub use error::{AnalysisError, AnalysisResult};
pub use fingerprint::{hash_or_raw, structural_hash};
pub use parser::split_statements;
pub use semantic::{
    Analyzer, DependencyExtractor, ModuleSymbolLookup, ParseCache, RecordStatus, StatementKind,
    StaticModuleIndex, SymbolKind, SymbolRecord,
};
