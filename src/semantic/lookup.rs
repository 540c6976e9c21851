use rustc_hash::FxHashMap;

/// Module-name to public-symbol-names lookup, injected by the embedder.
///
/// The only consumer is wildcard-import expansion: `from m import *`
/// becomes one record per name this lookup reports for `m`. The core never
/// imports or introspects modules itself, so classification stays
/// deterministic and hermetic; without a lookup, wildcard imports are
/// rejected.
pub trait ModuleSymbolLookup: Send + Sync {
    /// The publicly exposed names of `module`, or `None` when the module
    /// is unknown to this lookup.
    fn public_symbols(&self, module: &str) -> Option<Vec<String>>;
}

/// A map-backed [`ModuleSymbolLookup`] for embedders with a precomputed
/// module index, and for tests.
#[derive(Debug, Default)]
pub struct StaticModuleIndex {
    modules: FxHashMap<String, Vec<String>>,
}

impl StaticModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a module's public symbol list.
    pub fn insert(
        &mut self,
        module: impl Into<String>,
        symbols: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.modules
            .insert(module.into(), symbols.into_iter().map(Into::into).collect());
    }
}

impl ModuleSymbolLookup for StaticModuleIndex {
    fn public_symbols(&self, module: &str) -> Option<Vec<String>> {
        self.modules.get(module).cloned()
    }
}
