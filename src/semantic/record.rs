use crate::base::DependencyPath;

/// What kind of namespace entry a classified statement introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    Function,
    Class,
    Variable,
    Import,
    ImportFrom,
}

impl SymbolKind {
    /// Stable string form, e.g. for logging or display.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "Function",
            Self::Class => "Class",
            Self::Variable => "Variable",
            Self::Import => "Import",
            Self::ImportFrom => "ImportFrom",
        }
    }
}

/// Outcome slot on a record.
///
/// Classification itself propagates failures as errors; this slot lets an
/// embedder carry a downstream outcome (say, an evaluation error) on the
/// record without a side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordStatus {
    #[default]
    Success,
    Failed,
}

/// One symbol introduced by a classified statement: its name, kind, the
/// external names/attribute paths its definition reads, and its canonical
/// source text.
///
/// For `Variable` records, `content` is the right-hand-side expression
/// text, not the whole assignment. `dependencies` never contains the
/// record's own `name`, names bound inside the definition, or (when a
/// built-in set is configured) any path rooted at a built-in name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolRecord {
    pub name: String,
    pub kind: SymbolKind,
    pub dependencies: Vec<DependencyPath>,
    pub content: String,
    pub status: RecordStatus,
    pub message: String,
}

impl SymbolRecord {
    /// Build a happy-path record: `Success` status, empty message.
    pub(crate) fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        dependencies: Vec<DependencyPath>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            dependencies,
            content: content.into(),
            status: RecordStatus::Success,
            message: String::new(),
        }
    }

    /// Mark this record as failed with a caller-side message (for
    /// embedders recording an evaluation outcome on the symbol).
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = RecordStatus::Failed;
        self.message = message.into();
    }

    pub fn is_success(&self) -> bool {
        self.status == RecordStatus::Success
    }

    /// Whether `path` (or a prefix of it) appears among the dependencies.
    pub fn depends_on(&self, path: &DependencyPath) -> bool {
        self.dependencies.iter().any(|dep| dep == path || dep.is_prefix_of(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_start_successful() {
        let record = SymbolRecord::new("x", SymbolKind::Variable, vec![], "1");
        assert!(record.is_success());
        assert!(record.message.is_empty());
    }

    #[test]
    fn mark_failed_sets_status_and_message() {
        let mut record = SymbolRecord::new("x", SymbolKind::Variable, vec![], "1");
        record.mark_failed("division by zero");
        assert!(!record.is_success());
        assert_eq!(record.message, "division by zero");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn records_round_trip_through_json() {
        let record = SymbolRecord::new(
            "r",
            SymbolKind::Variable,
            vec![DependencyPath::new("a"), DependencyPath::new("a.b")],
            "a.b + 1",
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: SymbolRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn depends_on_matches_prefixes() {
        let record = SymbolRecord::new(
            "r",
            SymbolKind::Variable,
            vec![DependencyPath::new("a"), DependencyPath::new("a.b")],
            "a.b",
        );
        assert!(record.depends_on(&DependencyPath::new("a.b.c")));
        assert!(!record.depends_on(&DependencyPath::new("z")));
    }
}
