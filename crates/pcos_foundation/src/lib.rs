//! Core types shared by every layer of the PCOS analyzer.
//!
//! This crate provides:
//! - [`Span`] / [`SourceSpan`] - Source positions
//! - [`FileId`] - Opaque path-like file identifiers
//! - [`Diagnostic`] - Ordered, immutable findings with severity and code
//! - [`AnalysisConfig`] - The settings record consumed by the analyzer
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod file;
pub mod span;

pub use config::AnalysisConfig;
pub use diagnostic::{Diagnostic, DiagnosticCode, RelatedSpan, Severity};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use file::{FileId, SourceSpan};
pub use span::Span;
