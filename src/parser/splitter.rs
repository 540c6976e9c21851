use super::parse::{node_source, parse_block};
use crate::error::AnalysisResult;

/// Split a block of source into its top-level statement substrings.
///
/// Each entry is trimmed of surrounding whitespace and independently
/// re-parseable; order matches source order. Fails with a syntax error
/// (carrying the block text) when the block does not parse.
pub fn split_statements(code: &str) -> AnalysisResult<Vec<String>> {
    let body = parse_block(code)?;

    Ok(body
        .iter()
        .map(|stmt| node_source(code, stmt).trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_statements() {
        let parts = split_statements("import os\nx = 1\n").unwrap();
        assert_eq!(parts, vec!["import os", "x = 1"]);
    }

    #[test]
    fn keeps_compound_statements_whole() {
        let code = "def f():\n    return 1\n\nx = f()";
        let parts = split_statements(code).unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("def f():"));
        assert_eq!(parts[1], "x = f()");
    }

    #[test]
    fn split_output_reparses() {
        let code = "class C:\n    value = 1\n\ny = [i for i in range(3)]";
        for part in split_statements(code).unwrap() {
            assert!(parse_block(&part).is_ok(), "fragment should reparse: {part}");
        }
    }

    #[test]
    fn semicolon_separated_statements_split() {
        let parts = split_statements("x = 1; y = 2").unwrap();
        assert_eq!(parts, vec!["x = 1", "y = 2"]);
    }
}
