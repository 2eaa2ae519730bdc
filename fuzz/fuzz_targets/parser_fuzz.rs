//! Fuzz test for the MBEL parser
//!
//! This fuzz target tests the parser with arbitrary byte sequences to find:
//! - Panics or crashes
//! - Infinite loops
//! - Memory safety issues
//!
//! Run with: cargo +nightly fuzz run parser_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use mbel_syntax::parse;

fuzz_target!(|data: &[u8]| {
    // Try to interpret the bytes as UTF-8
    // The parser should handle any valid UTF-8 string without panicking;
    // malformed input yields errors, never a crash
    if let Ok(input) = std::str::from_utf8(data) {
        let result = parse(input);

        // Every statement span lies inside the source
        for statement in &result.document.statements {
            let span = statement.span();
            assert!(span.start.offset <= span.end.offset);
            assert!(span.end.offset <= input.len());
        }

        // Every reported error has valid location info
        for error in result.errors() {
            assert!(error.span.start.line >= 1, "Error line should be >= 1");
            assert!(error.span.start.column >= 1, "Error column should be >= 1");
            assert!(!error.message.is_empty(), "Error message should not be empty");
        }
    }
});
