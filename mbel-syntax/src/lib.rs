//! MBEL Syntax - Lexer, Parser, and AST
//!
//! This crate turns MBEL notation text into a structured document. The MBEL
//! notation records project knowledge: features, dependencies, decisions,
//! semantic anchors, heat metadata, and component intents.
//!
//! Architecture:
//! ```text
//! MBEL Source (.mbel file)
//!     ↓
//! Lexer (tokenize)
//!     ↓
//! Parser (build Document)
//!     ↓
//! Printer (for round-trip testing)
//! ```
//!
//! Lexing and parsing are both non-fatal: errors are collected alongside the
//! output and a fully malformed source still yields an empty document.

pub mod lexer;
pub mod parser;
pub mod printer;

// Re-export key types for convenience
pub use lexer::*;
pub use parser::*;
