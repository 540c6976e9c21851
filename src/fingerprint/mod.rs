//! Structural hashing: formatting-insensitive content digests.
//!
//! Two fragments that differ only in whitespace, comments, or source
//! position hash identically; any structural difference changes the digest.
//! The digest is the blake3 hash of a canonical serialization of the parsed
//! tree that carries node kinds, identifiers, literals, and nesting, but no
//! positions.
//!
//! Callers memoizing classification results key their cache on this hash
//! rather than on raw text, so reformatting a fragment never invalidates
//! an entry.

mod dump;

use crate::error::AnalysisResult;
use crate::parser::parse_block;

/// Hash the structure of a block of Python source.
///
/// Fails with a syntax error when the text does not parse; callers that
/// need a key even for invalid text should use [`hash_or_raw`].
pub fn structural_hash(code: &str) -> AnalysisResult<String> {
    let body = parse_block(code)?;
    let canonical = dump::dump_module(&body);
    Ok(digest(canonical.as_bytes()))
}

/// Hash the structure of a block, falling back to hashing the raw text
/// when the block does not parse.
///
/// The fallback means syntactically invalid fragments still get a stable
/// cache key, at the cost of formatting sensitivity for those fragments
/// only.
pub fn hash_or_raw(code: &str) -> String {
    match structural_hash(code) {
        Ok(digest) => digest,
        Err(_) => digest(code.as_bytes()),
    }
}

fn digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_and_comments_do_not_change_the_hash() {
        let a = structural_hash("x = a + b").unwrap();
        let b = structural_hash("x  =  a + b  # sum").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn position_does_not_change_the_hash() {
        let a = structural_hash("x = 1").unwrap();
        let b = structural_hash("\n\n\nx = 1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn structural_change_changes_the_hash() {
        let a = structural_hash("x = a + b").unwrap();
        let b = structural_hash("x = a - b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn renamed_identifier_changes_the_hash() {
        let a = structural_hash("x = f(1)").unwrap();
        let b = structural_hash("y = f(1)").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hashing_is_deterministic() {
        let code = "def f(x):\n    return x + y";
        assert_eq!(structural_hash(code).unwrap(), structural_hash(code).unwrap());
    }

    #[test]
    fn invalid_text_falls_back_to_raw_hash() {
        let key = hash_or_raw("def f(:");
        assert_eq!(key, hash_or_raw("def f(:"));
        assert_ne!(key, hash_or_raw("def g(:"));
    }
}
