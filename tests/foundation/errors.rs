//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use pcos_foundation::{Error, ErrorContext, ErrorKind, FileId, Span};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_parse_captures_position_and_line() {
    let source = ".a {}\n.b {\n";
    let err = Error::parse("unclosed block", Span::new(9, 10, 2, 4), source);
    match &err.kind {
        ErrorKind::ParseError {
            message,
            line,
            column,
            context,
        } => {
            assert_eq!(message, "unclosed block");
            assert_eq!((*line, *column), (2, 4));
            assert_eq!(context, ".b {");
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
    assert_eq!(err.parse_position(), Some((2, 4)));
}

#[test]
fn error_parse_past_last_line_has_empty_context() {
    let err = Error::parse("eof", Span::new(0, 0, 9, 1), "x");
    assert!(matches!(&err.kind, ErrorKind::ParseError { context, .. } if context.is_empty()));
}

#[test]
fn error_cancelled() {
    let err = Error::cancelled();
    assert!(matches!(err.kind, ErrorKind::Cancelled));
    assert_eq!(err.parse_position(), None);
}

// =============================================================================
// Error Display
// =============================================================================

#[test]
fn error_display_parse() {
    let err = Error::parse("stray `}`", Span::new(0, 1, 3, 7), "");
    assert_eq!(format!("{err}"), "parse error at 3:7: stray `}`");
}

#[test]
fn error_display_serialization() {
    let err = Error::new(ErrorKind::SerializationError("bad marker".to_string()));
    assert_eq!(format!("{err}"), "serialization error: bad marker");
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_with_context() {
    let err = Error::cancelled().with_context(
        ErrorContext::new()
            .with_file(FileId::new("main.scss"))
            .with_stage("registry"),
    );
    assert_eq!(err.file().map(FileId::as_str), Some("main.scss"));
    let context = err.context.as_ref().unwrap();
    assert_eq!(context.file.as_ref().map(FileId::as_str), Some("main.scss"));
    assert_eq!(context.stage.as_deref(), Some("registry"));
    let shown = format!("{context}");
    assert!(shown.contains("main.scss"));
    assert!(shown.contains("registry"));
}

#[test]
fn error_without_context() {
    let err = Error::cancelled();
    assert!(err.context.is_none());
    assert!(err.file().is_none());
}
