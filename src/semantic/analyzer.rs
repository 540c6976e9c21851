use rustc_hash::FxHashSet;
use tracing::debug;

use crate::base::DependencyPath;
use crate::error::{AnalysisError, AnalysisResult};
use crate::fingerprint;
use crate::parser::{parse_block, parse_expression, split_statements};
use crate::semantic::classifier::{ClassifyContext, classify_stmt};
use crate::semantic::extractor::DependencyExtractor;
use crate::semantic::lookup::ModuleSymbolLookup;
use crate::semantic::record::SymbolRecord;

/// Entry point for classification: holds the injected configuration (an
/// optional built-in name set and an optional wildcard-import lookup) and
/// turns source text into [`SymbolRecord`]s.
///
/// An `Analyzer` keeps no per-call state; every call parses fresh and may
/// run concurrently with any other call on the same instance.
///
/// ```
/// use symdep::Analyzer;
///
/// let analyzer = Analyzer::new();
/// let records = analyzer.parse_single("def f(x): return x + y").unwrap();
/// assert_eq!(records[0].name, "f");
/// assert_eq!(records[0].dependencies[0], "y");
/// ```
#[derive(Default)]
pub struct Analyzer {
    builtins: FxHashSet<String>,
    lookup: Option<Box<dyn ModuleSymbolLookup>>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress dependencies rooted at any of `names`.
    ///
    /// The set is injected rather than taken from a host runtime, so
    /// output never depends on the environment the analyzer happens to
    /// run in. With no set configured, every read name is reported.
    pub fn with_builtins(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.builtins = names.into_iter().map(Into::into).collect();
        self
    }

    /// Configure the collaborator that resolves wildcard imports. Without
    /// one, `from m import *` fails with
    /// [`AnalysisError::UnresolvableWildcard`].
    pub fn with_module_lookup(mut self, lookup: impl ModuleSymbolLookup + 'static) -> Self {
        self.lookup = Some(Box::new(lookup));
        self
    }

    /// Classify text containing exactly one statement.
    ///
    /// Imports naming several modules still expand to several records;
    /// the arity requirement is on statements, not records.
    pub fn parse_single(&self, code: &str) -> AnalysisResult<Vec<SymbolRecord>> {
        let body = parse_block(code)?;
        if body.len() != 1 {
            return Err(AnalysisError::Arity { found: body.len() });
        }

        let ctx = ClassifyContext {
            code,
            ambient: &self.builtins,
            lookup: self.lookup.as_deref(),
        };
        classify_stmt(&body[0], &ctx)
    }

    /// Split a block into statements and classify each, concatenating the
    /// records.
    ///
    /// Fail-fast: the first statement that fails aborts the whole call
    /// with that statement's error, and no partial list is returned.
    /// Callers wanting partial results should `split` themselves and call
    /// [`parse_single`](Self::parse_single) per fragment.
    pub fn parse_multiple(&self, code: &str) -> AnalysisResult<Vec<SymbolRecord>> {
        let mut records = Vec::new();
        for fragment in split_statements(code)? {
            records.extend(self.parse_single(&fragment)?);
        }
        debug!("[analyze] classified {} records from block", records.len());
        Ok(records)
    }

    /// Extract the external reads of a single expression (watch
    /// expressions, cell formulas) against the configured built-in set.
    pub fn expression_dependencies(&self, code: &str) -> AnalysisResult<Vec<DependencyPath>> {
        let expr = parse_expression(code)?;
        Ok(DependencyExtractor::extract_expr(
            &expr,
            self.builtins.iter().cloned(),
        ))
    }

    /// See [`crate::parser::split_statements`].
    pub fn split_statements(&self, code: &str) -> AnalysisResult<Vec<String>> {
        split_statements(code)
    }

    /// See [`crate::fingerprint::structural_hash`].
    pub fn structural_hash(&self, code: &str) -> AnalysisResult<String> {
        fingerprint::structural_hash(code)
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("builtins", &self.builtins.len())
            .field("lookup", &self.lookup.is_some())
            .finish()
    }
}
