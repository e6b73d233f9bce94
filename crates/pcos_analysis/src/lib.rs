//! Project-level analysis of PCOS stylesheets.
//!
//! This crate provides:
//! - [`selector`] - Class name grammar validation
//! - [`ProjectRegistry`] / [`RegistryBuilder`] - Import traversal and the name index
//! - [`conformance`] - `@implements` contract checking
//! - [`Report`] - Ordered diagnostics, exit codes, and text output
//! - [`Analyzer`] - The full pipeline
//!
//! # Example
//!
//! ```
//! use pcos_analysis::{AnalysisInput, Analyzer, ExitPolicy};
//!
//! let input = AnalysisInput::new().with_entry_source("main.scss", ".button {}");
//! let report = Analyzer::default().analyze(&input).unwrap();
//! assert_eq!(report.exit_code(ExitPolicy::FailOnError), 1);
//! assert!(report.render_text().contains("error[missing-prefix]"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cancel;
pub mod conformance;
pub mod engine;
pub mod registry;
pub mod report;
pub mod selector;
#[cfg(feature = "serde")]
pub mod snapshot;

pub use cancel::CancellationToken;
pub use engine::{AnalysisInput, Analyzer};
pub use registry::{DeclRef, ProjectRegistry, RegistryBuilder};
pub use report::{DiagnosticReporter, ExitPolicy, Report};
pub use selector::{ClassName, Violation, parse_class_name, validate_class_name, validate_selector};

pub use pcos_foundation::{AnalysisConfig, Diagnostic, DiagnosticCode, Severity};
