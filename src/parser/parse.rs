use rustpython_parser::ast::{self, Ranged};
use rustpython_parser::{Parse, ParseError};

use crate::error::{AnalysisError, AnalysisResult};

/// Parse a block of source into its top-level statements.
pub fn parse_block(code: &str) -> AnalysisResult<Vec<ast::Stmt>> {
    ast::Suite::parse(code, "<symdep>").map_err(|err| enrich(code, &err))
}

/// Parse a single expression (eval mode).
pub fn parse_expression(code: &str) -> AnalysisResult<ast::Expr> {
    ast::Expr::parse(code, "<symdep>").map_err(|err| enrich(code, &err))
}

/// Slice a node's source segment out of the original text.
pub fn node_source<'a>(code: &'a str, node: &impl Ranged) -> &'a str {
    let range = node.range();
    &code[usize::from(range.start())..usize::from(range.end())]
}

fn enrich(code: &str, err: &ParseError) -> AnalysisError {
    AnalysisError::syntax(err.to_string(), code.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_block_returns_statements_in_order() {
        let body = parse_block("x = 1\ny = 2").unwrap();
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn syntax_error_carries_snippet() {
        let err = parse_block("def f(:").unwrap_err();
        assert!(err.to_string().contains("def f(:"));
    }

    #[test]
    fn node_source_slices_statement_text() {
        let code = "x = 1\ny = a + b";
        let body = parse_block(code).unwrap();
        assert_eq!(node_source(code, &body[1]), "y = a + b");
    }
}
