//! Token types for stylesheet source.
//!
//! Tokens are the output of the lexer and input to the parser.

use pcos_foundation::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true if this token ends a statement or opens/closes a block.
    #[must_use]
    pub const fn is_statement_boundary(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LBrace | TokenKind::RBrace | TokenKind::Semicolon | TokenKind::Eof
        )
    }
}

/// How a comment was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */`
    Block,
    /// `/** ... */`
    Doc,
    /// One or more consecutive `///` lines.
    DocLine,
}

/// Token types for stylesheet source.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Structure
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `,`
    Comma,

    // Words
    /// At-keyword like `@mixin` (stored without the `@`).
    AtKeyword(String),
    /// Identifier or selector word like `c-button__icon` or `hover`.
    Ident(String),
    /// Variable reference like `$primary` (stored without the `$`).
    Variable(String),
    /// Interpolation like `#{$name}` (stored without the delimiters).
    Interpolation(String),
    /// Balanced parenthesised text like `($a, $b: 1)` (stored without the parens).
    ParamList(String),
    /// Quoted string literal (unescaped value).
    String(String),
    /// Any other single character: `.`, `&`, `>`, `%`, `#`, `*`, ...
    Delim(char),

    // Meta
    /// Comment text, delimiters included.
    Comment {
        /// Raw comment text as written.
        text: String,
        /// How the comment was written.
        style: CommentStyle,
    },
    /// End of input
    Eof,
    /// Lexer error; the span starts at the opening delimiter.
    Error(String),
}

impl TokenKind {
    /// Returns true if this token is a comment.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::Comment { .. })
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::AtKeyword(_) => "at-keyword",
            Self::Ident(_) => "identifier",
            Self::Variable(_) => "variable",
            Self::Interpolation(_) => "interpolation",
            Self::ParamList(_) => "parameter list",
            Self::String(_) => "string",
            Self::Delim(_) => "delimiter",
            Self::Comment { .. } => "comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
