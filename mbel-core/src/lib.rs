//! MBEL Core - Shared Data Types
//!
//! Pure data structures with no behavior beyond small accessors. All other
//! crates depend on this. This crate contains ONLY data types - no lexing,
//! parsing, or query logic.

// Core modules
mod position;
mod diagnostic;
mod fileref;
pub mod codes;

// Re-export position types
pub use position::*;

// Re-export diagnostic types
pub use diagnostic::*;

// Re-export file reference types
pub use fileref::*;
