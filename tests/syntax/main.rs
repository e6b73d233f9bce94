//! Integration tests for Layer 1: Syntax
//!
//! Tests for the lexer, parser, doc-tag extraction, and declarations.

mod parser;
