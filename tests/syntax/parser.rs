//! Integration tests for the parser
//!
//! Tests parsing of whole stylesheets to the structural tree.

use pcos_foundation::ErrorKind;
use pcos_syntax::ast::{ImportKind, OrphanReason};
use pcos_syntax::{Node, parse};

const SHEET: &str = "@use 'settings';

/// Card container.
.c-card {
  padding: 1rem;

  /** Card title. */
  &__title { font-weight: bold; }

  @media (min-width: 40em) {
    &--wide { width: 100%; }
  }
}

@media print {
  /** Hidden when printing. */
  .u-print-hidden { display: none; }
}
";

#[test]
fn parse_realistic_sheet() {
    let sheet = parse(SHEET).unwrap();
    assert_eq!(sheet.nodes.len(), 3);
    assert!(sheet.orphan_comments.is_empty());

    match &sheet.nodes[0] {
        Node::Import(import) => {
            assert_eq!(import.kind, ImportKind::Use);
            assert_eq!(import.targets[0].path, "settings");
        }
        other => panic!("expected import, got {other:?}"),
    }

    let card = &sheet.nodes[1];
    assert_eq!(card.doc().map(|d| d.text.as_str()), Some("/// Card container."));
    // Node spans start at the selector; the doc comment keeps its own span.
    assert_eq!(card.span().line, 4);
    assert_eq!(card.doc().map(|d| d.span.line), Some(3));
    assert_eq!(card.children().len(), 2);
    assert!(card.children()[0].doc().is_some());

    match &sheet.nodes[2] {
        Node::AtRule(media) => {
            assert_eq!(media.keyword, "media");
            assert_eq!(media.prelude, "print");
            let body = media.body.as_ref().unwrap();
            assert!(body[0].doc().is_some());
        }
        other => panic!("expected at-rule, got {other:?}"),
    }
}

#[test]
fn parse_spans_nest() {
    let sheet = parse(SHEET).unwrap();
    let card = sheet.nodes[1].span();
    for child in sheet.nodes[1].children() {
        let span = child.span();
        assert!(span.start >= card.start && span.end <= card.end);
    }
}

#[test]
fn parse_documented_statement_is_orphaned() {
    let sheet = parse("/** Spacing scale. */\n$space: 4px;\n").unwrap();
    assert_eq!(sheet.orphan_comments.len(), 1);
    assert_eq!(sheet.orphan_comments[0].reason, OrphanReason::NotDeclarable);
}

#[test]
fn parse_error_positions() {
    for (source, position) in [
        (".a {\n", (1, 4)),
        (".a { color: red; }}", (1, 19)),
        ("\n\n  /* open", (3, 3)),
    ] {
        let err = parse(source).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ParseError { .. }), "{source:?}");
        assert_eq!(err.parse_position(), Some(position), "{source:?}");
    }
}

#[test]
fn parse_empty_and_comment_only() {
    assert!(parse("").unwrap().nodes.is_empty());
    let sheet = parse("// just a note\n/* banner */\n").unwrap();
    assert!(sheet.nodes.is_empty());
    assert!(sheet.orphan_comments.is_empty());
}
