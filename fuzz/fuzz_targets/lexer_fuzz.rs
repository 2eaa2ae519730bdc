//! Fuzz test for the MBEL lexer
//!
//! This fuzz target tests the lexer with arbitrary byte sequences to find:
//! - Panics or crashes
//! - Infinite loops
//! - Memory safety issues
//!
//! Run with: cargo +nightly fuzz run lexer_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use mbel_syntax::{tokenize, TokenKind};

fuzz_target!(|data: &[u8]| {
    // Try to interpret the bytes as UTF-8
    // The lexer should handle any valid UTF-8 string without panicking
    if let Ok(input) = std::str::from_utf8(data) {
        let (tokens, errors) = tokenize(input);

        // Basic invariants that should always hold:
        // 1. We should always get at least one token (Eof)
        assert!(!tokens.is_empty(), "Tokenization should produce at least Eof");

        // 2. The last token should always be Eof
        assert_eq!(
            tokens.last().unwrap().kind,
            TokenKind::Eof,
            "Last token should always be Eof"
        );

        // 3. Positions should be ordered and contained in the source
        for token in &tokens {
            assert!(token.span.start.offset <= token.span.end.offset);
            assert!(token.span.end.offset <= input.len());
            assert!(token.span.start.line >= 1, "Line numbers should be >= 1");
            assert!(token.span.start.column >= 1, "Column numbers should be >= 1");
        }
        for error in &errors {
            assert!(error.span.end.offset <= input.len());
        }
    }
});
