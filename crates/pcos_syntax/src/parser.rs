//! Structural parser for stylesheet source.
//!
//! The parser converts a stream of tokens into a [`Stylesheet`] tree of rule
//! blocks, at-rules, imports, and includes. Comments are attached in a single
//! forward pass: the parser carries one pending comment and hands it to the
//! next declarable node, or records it as an orphan when something else
//! intervenes.

use pcos_foundation::{Error, Result, Span};

use crate::ast::{
    AtRuleNode, DocComment, ImportKind, ImportNode, ImportTarget, IncludeNode, Node,
    OrphanComment, OrphanReason, RuleNode, Stylesheet,
};
use crate::lexer::Lexer;
use crate::token::{CommentStyle, Token, TokenKind};

/// A comment waiting for the node it documents.
struct PendingComment {
    comment: DocComment,
    style: CommentStyle,
}

/// Parser for stylesheet source.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Span of the most recently consumed token.
    previous: Span,
    /// Source text (for selector slices and error messages).
    source: &'src str,
    /// Comments that never attached.
    orphans: Vec<OrphanComment>,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Span::at_start(),
            source,
            orphans: Vec::new(),
        }
    }

    /// Parses the whole source.
    ///
    /// # Errors
    /// Returns a parse error for an unterminated comment, string, parameter
    /// list, interpolation, or block, and for a stray `}`. The error is
    /// positioned at the opening delimiter.
    pub fn parse_stylesheet(mut self) -> Result<Stylesheet> {
        let nodes = self.parse_items(None)?;
        Ok(Stylesheet {
            nodes,
            orphan_comments: self.orphans,
        })
    }

    /// Parses items until the closing brace of `open` (or end of input at top level).
    fn parse_items(&mut self, open: Option<Span>) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut pending: Option<PendingComment> = None;

        loop {
            match &self.current.kind {
                TokenKind::Comment { text, style } => {
                    let (text, style) = (text.clone(), *style);
                    if let Some(previous) = pending.take() {
                        self.orphan(previous, OrphanReason::Superseded);
                    }
                    pending = Some(PendingComment {
                        comment: DocComment {
                            text,
                            span: self.current.span,
                        },
                        style,
                    });
                    self.advance();
                }
                TokenKind::Eof => {
                    if let Some(open) = open {
                        return Err(self.error_at(open, "unclosed block"));
                    }
                    break;
                }
                TokenKind::RBrace => {
                    if open.is_none() {
                        return Err(self.error_at(self.current.span, "unexpected '}'"));
                    }
                    self.advance();
                    break;
                }
                TokenKind::Error(msg) => {
                    let msg = msg.clone();
                    return Err(self.error_at(self.current.span, &msg));
                }
                TokenKind::Semicolon => self.advance(),
                TokenKind::AtKeyword(keyword) => {
                    let keyword = keyword.clone();
                    let node = self.parse_at_rule(&keyword, &mut pending)?;
                    nodes.push(node);
                }
                _ => {
                    if let Some(node) = self.parse_rule_or_statement(&mut pending)? {
                        nodes.push(node);
                    }
                }
            }
        }

        if let Some(previous) = pending.take() {
            self.orphan(previous, OrphanReason::Trailing);
        }
        Ok(nodes)
    }

    /// Parses a rule block, or consumes a property/statement and returns `None`.
    fn parse_rule_or_statement(
        &mut self,
        pending: &mut Option<PendingComment>,
    ) -> Result<Option<Node>> {
        let start = self.current.span;
        let prelude_end = self.skip_prelude()?;

        if self.current.kind == TokenKind::LBrace {
            let open = self.current.span;
            self.advance();
            let children = self.parse_items(Some(open))?;
            let selector = normalize_whitespace(&self.source[start.start..prelude_end.end]);
            let span = start.to(self.previous_span());
            return Ok(Some(Node::Rule(RuleNode {
                selector,
                doc: pending.take().map(|p| p.comment),
                children,
                span,
            })));
        }

        // Property or other statement.
        if self.current.kind == TokenKind::Semicolon {
            self.advance();
        }
        if let Some(previous) = pending.take() {
            self.orphan(previous, OrphanReason::NotDeclarable);
        }
        Ok(None)
    }

    /// Parses any at-rule starting at the current `AtKeyword`.
    fn parse_at_rule(
        &mut self,
        keyword: &str,
        pending: &mut Option<PendingComment>,
    ) -> Result<Node> {
        let start = self.current.span;
        self.advance(); // consume keyword

        if let Some(kind) = ImportKind::from_keyword(keyword) {
            let node = self.parse_import(kind, start)?;
            if let Some(previous) = pending.take() {
                self.orphan(previous, OrphanReason::NotDeclarable);
            }
            return Ok(node);
        }
        if keyword == "include" {
            let node = self.parse_include(start)?;
            if let Some(previous) = pending.take() {
                self.orphan(previous, OrphanReason::NotDeclarable);
            }
            return Ok(node);
        }

        let prelude_start = self.current.span;
        let mut name = None;
        let mut params = None;
        if let TokenKind::Ident(ident) = &self.current.kind {
            name = Some(ident.clone());
            self.advance();
            if let TokenKind::ParamList(raw) = &self.current.kind {
                params = Some(raw.clone());
            }
        }
        let prelude_end = self.skip_prelude()?;
        let prelude = if prelude_end.end > prelude_start.start {
            normalize_whitespace(&self.source[prelude_start.start..prelude_end.end])
        } else {
            String::new()
        };

        let body = self.parse_optional_block()?;
        let doc = pending.take().map(|p| p.comment);
        Ok(Node::AtRule(AtRuleNode {
            keyword: keyword.to_string(),
            name,
            params,
            prelude,
            doc,
            body,
            span: start.to(self.previous_span()),
        }))
    }

    /// Parses the rest of `@import`/`@use`/`@forward`.
    fn parse_import(&mut self, kind: ImportKind, start: Span) -> Result<Node> {
        let mut targets = Vec::new();
        while !self.current.is_statement_boundary() {
            match &self.current.kind {
                TokenKind::String(path) => {
                    targets.push(ImportTarget {
                        plain_css: is_plain_css_import(path),
                        path: path.clone(),
                        span: self.current.span,
                    });
                    self.advance();
                }
                TokenKind::Ident(ident) if ident == "url" => {
                    let span = self.current.span;
                    self.advance();
                    if let TokenKind::ParamList(raw) = &self.current.kind {
                        let path = raw.trim().trim_matches(['"', '\'']).to_string();
                        targets.push(ImportTarget {
                            path,
                            plain_css: true,
                            span: span.to(self.current.span),
                        });
                        self.advance();
                    }
                }
                TokenKind::Error(msg) => {
                    let msg = msg.clone();
                    return Err(self.error_at(self.current.span, &msg));
                }
                _ => self.advance(),
            }
        }
        if self.current.kind == TokenKind::LBrace {
            // `@use 'x' with (...)` never has a block; tolerate one anyway.
            self.parse_optional_block()?;
        } else if self.current.kind == TokenKind::Semicolon {
            self.advance();
        }
        Ok(Node::Import(ImportNode {
            kind,
            targets,
            span: start.to(self.previous_span()),
        }))
    }

    /// Parses the rest of `@include name(args) [{ ... }]`.
    fn parse_include(&mut self, start: Span) -> Result<Node> {
        let mut name = String::new();
        let mut args = None;
        if let TokenKind::Ident(ident) = &self.current.kind {
            name = ident.clone();
            self.advance();
            // Module-qualified mixins: `theme.c-button`.
            while self.current.kind == TokenKind::Delim('.') {
                self.advance();
                if let TokenKind::Ident(part) = &self.current.kind {
                    name.push('.');
                    name.push_str(part);
                    self.advance();
                }
            }
            if let TokenKind::ParamList(raw) = &self.current.kind {
                args = Some(raw.clone());
            }
        }
        self.skip_prelude()?;
        let body = self.parse_optional_block()?;
        Ok(Node::Include(IncludeNode {
            name,
            args,
            body,
            span: start.to(self.previous_span()),
        }))
    }

    /// Parses `{ ... }` if present, otherwise consumes a terminating `;`.
    fn parse_optional_block(&mut self) -> Result<Option<Vec<Node>>> {
        match self.current.kind {
            TokenKind::LBrace => {
                let open = self.current.span;
                self.advance();
                Ok(Some(self.parse_items(Some(open))?))
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Skips tokens up to the next `{`, `;`, `}`, or end of input.
    ///
    /// Comments inside a prelude are skipped. Returns the span of the last
    /// prelude token (or the current span if the prelude is empty).
    fn skip_prelude(&mut self) -> Result<Span> {
        let mut last = Span::new(
            self.current.span.start,
            self.current.span.start,
            self.current.span.line,
            self.current.span.column,
        );
        while !self.current.is_statement_boundary() {
            if let TokenKind::Error(msg) = &self.current.kind {
                let msg = msg.clone();
                return Err(self.error_at(self.current.span, &msg));
            }
            if !self.current.kind.is_comment() {
                last = self.current.span;
            }
            self.advance();
        }
        Ok(last)
    }

    /// Advances to the next token, remembering the one just consumed.
    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.previous = std::mem::replace(&mut self.current, next).span;
    }

    fn previous_span(&self) -> Span {
        self.previous
    }

    fn orphan(&mut self, pending: PendingComment, reason: OrphanReason) {
        // Plain block comments are section banners more often than docs; only
        // doc-style comments are reported unless another comment displaced them.
        if reason == OrphanReason::Superseded || pending.style != CommentStyle::Block {
            self.orphans.push(OrphanComment {
                span: pending.comment.span,
                reason,
            });
        }
    }

    /// Creates an error at the given span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::parse(message, span, self.source)
    }
}

/// Parses stylesheet source into a tree.
///
/// # Errors
/// Returns an error if the source contains an unterminated construct.
pub fn parse(source: &str) -> Result<Stylesheet> {
    Parser::new(source).parse_stylesheet()
}

/// Collapses whitespace runs to single spaces and trims the ends.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true for imports the stylesheet compiler leaves as plain CSS.
fn is_plain_css_import(path: &str) -> bool {
    path.ends_with(".css")
        || path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
}
