//! Lexer, parser, and doc-comment extraction for PCOS stylesheets.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of stylesheet source
//! - [`Parser`] - Parsing tokens into a tolerant block/at-rule tree
//! - [`doc`] - Structured doc-tag extraction and [`render`] for the reverse
//! - [`declaration`] - Lifting a parsed file into named [`Declaration`]s
//!
//! # Example
//!
//! ```
//! use pcos_foundation::FileId;
//! use pcos_syntax::{parse_source_file, DeclKind};
//!
//! let parsed = parse_source_file(
//!     FileId::new("button.scss"),
//!     "/** @implements i-themeable */\n.c-button { &__icon { } }",
//! )
//! .unwrap();
//! let button = &parsed.file.declarations[0];
//! assert_eq!(button.name, "c-button");
//! assert_eq!(button.kind, DeclKind::Component);
//! assert_eq!(button.children[0].name, "c-button__icon");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod declaration;
pub mod doc;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod token;


pub use ast::{Node, Stylesheet};
pub use declaration::{
    Declaration, ImportRef, IncludeRef, Nesting, ParsedFile, SourceFile, parse_source_file,
};
pub use doc::{DeclKind, DocBlock, DocExtraction, extract_doc};
pub use lexer::Lexer;
pub use parser::{Parser, parse};
pub use render::render_doc;
pub use token::{Token, TokenKind};
