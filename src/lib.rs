//! PCOS - Static analyzer for PCOS-structured stylesheets
//!
//! This crate re-exports all layers of the analyzer for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: pcos_analysis   - Selector grammar, registry, conformance, reporting
//! Layer 1: pcos_syntax     - Lexer, parser, doc tags, declarations
//! Layer 0: pcos_foundation - Core types (Span, FileId, Diagnostic, Error)
//! ```

pub use pcos_analysis as analysis;
pub use pcos_foundation as foundation;
pub use pcos_syntax as syntax;
