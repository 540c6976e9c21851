use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::AnalysisResult;
use crate::fingerprint::hash_or_raw;
use crate::semantic::analyzer::Analyzer;
use crate::semantic::record::SymbolRecord;

/// Memoizes [`Analyzer::parse_single`] results, keyed by structural hash.
///
/// Keying on structure rather than raw text means reformatting a fragment
/// (whitespace, comments) hits the same entry. The lock is held across a
/// miss's compute, so each key is parsed at most once no matter how many
/// threads race on it. Failed parses are never stored; they re-run on the
/// next request with the same error.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: Mutex<FxHashMap<String, Arc<Vec<SymbolRecord>>>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `code` by structural hash, classifying and storing on a
    /// miss.
    pub fn get_or_parse(
        &self,
        analyzer: &Analyzer,
        code: &str,
    ) -> AnalysisResult<Arc<Vec<SymbolRecord>>> {
        let key = hash_or_raw(code);

        let mut entries = self.entries.lock();
        if let Some(hit) = entries.get(&key) {
            debug!("[cache] hit for {key}");
            return Ok(Arc::clone(hit));
        }

        let records = Arc::new(analyzer.parse_single(code)?);
        entries.insert(key, Arc::clone(&records));
        Ok(records)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every stored entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reformatted_fragment_hits_the_same_entry() {
        let analyzer = Analyzer::new();
        let cache = ParseCache::new();

        let first = cache.get_or_parse(&analyzer, "x = a + b").unwrap();
        let second = cache.get_or_parse(&analyzer, "x  =  a + b  # sum").unwrap();

        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failures_are_not_cached() {
        let analyzer = Analyzer::new();
        let cache = ParseCache::new();

        assert!(cache.get_or_parse(&analyzer, "for x in y: pass").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_the_cache() {
        let analyzer = Analyzer::new();
        let cache = ParseCache::new();
        cache.get_or_parse(&analyzer, "x = 1").unwrap();

        cache.clear();
        assert!(cache.is_empty());
    }
}
