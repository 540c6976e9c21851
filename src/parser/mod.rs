//! Parsing layer: Python source text to AST.
//!
//! Every other module consumes the Python AST through this one. It owns:
//! - block and expression parsing with enriched syntax errors (the
//!   offending source text travels with the error, not just a parser
//!   message)
//! - splitting a block into its top-level statement substrings
//! - slicing a node's source segment back out of the original text
//!
//! The AST itself comes from `rustpython-parser`; nothing here interprets
//! it beyond byte ranges.

mod parse;
mod splitter;

pub use parse::{node_source, parse_block, parse_expression};
pub use splitter::split_statements;
