//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Span, FileId, Diagnostic, AnalysisConfig, and Error.

mod config;
mod diagnostics;
mod errors;
