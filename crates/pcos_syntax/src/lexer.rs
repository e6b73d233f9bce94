//! Lexer for stylesheet source.
//!
//! The lexer converts source text into a stream of tokens. It understands just
//! enough of SCSS-flavoured CSS to keep block structure, comments, strings, and
//! parameter lists apart; values are left as loose identifier/delimiter runs.

use pcos_foundation::Span;

use crate::token::{CommentStyle, Token, TokenKind};

/// Lexer for stylesheet source.
///
/// The lexer iterates through source text and produces tokens. It is lazy and
/// finite; construct a new lexer to restart from the beginning.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
    /// Set once `Eof` has been produced by the iterator.
    finished: bool,
}

/// Saved lexer position for bounded lookahead.
#[derive(Clone, Copy)]
struct Checkpoint<'src> {
    rest: &'src str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Returns the next token from the source.
    ///
    /// Returns `Eof` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, Span::new(start, start, start_line, start_column));
        };

        let kind = match c {
            '{' => {
                self.advance();
                TokenKind::LBrace
            }
            '}' => {
                self.advance();
                TokenKind::RBrace
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            ':' => {
                self.advance();
                TokenKind::Colon
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            '/' if self.rest.starts_with("///") => self.scan_doc_lines(),
            '/' if self.rest.starts_with("/*") => self.scan_block_comment(),
            '"' | '\'' => self.scan_string(c),
            '(' => self.scan_param_list(),
            '#' if self.rest.starts_with("#{") => self.scan_interpolation(),
            '@' => self.scan_prefixed(TokenKind::AtKeyword, '@'),
            '$' => self.scan_prefixed(TokenKind::Variable, '$'),
            c if is_ident_char(c) || c == '\\' => TokenKind::Ident(self.scan_ident_text()),
            c => {
                self.advance();
                TokenKind::Delim(c)
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column)
                .with_end(self.line, self.column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// The final token is always `Eof`.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Advances past `n` characters.
    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn checkpoint(&self) -> Checkpoint<'src> {
        Checkpoint {
            rest: self.rest,
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint<'src>) {
        self.rest = checkpoint.rest;
        self.position = checkpoint.position;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
    }

    /// Skips whitespace and plain `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => self.advance(),
                Some('/') if self.rest.starts_with("//") && !is_doc_line(self.rest) => {
                    self.skip_to_line_end();
                }
                _ => break,
            }
        }
    }

    fn skip_to_line_end(&mut self) {
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Scans a run of `///` lines on consecutive lines into one comment.
    fn scan_doc_lines(&mut self) -> TokenKind {
        let start = self.position;
        let mut end;
        loop {
            self.skip_to_line_end();
            end = self.position;
            let before_lookahead = self.checkpoint();

            // A run continues only onto the very next line.
            if self.peek_char() == Some('\n') {
                self.advance();
                while matches!(self.peek_char(), Some(' ' | '\t' | '\r')) {
                    self.advance();
                }
                if is_doc_line(self.rest) {
                    continue;
                }
            }
            self.restore(before_lookahead);
            break;
        }
        let text = self.source_slice(start, end);
        TokenKind::Comment {
            text,
            style: CommentStyle::DocLine,
        }
    }

    /// Scans a `/* ... */` comment.
    fn scan_block_comment(&mut self) -> TokenKind {
        let start = self.position;
        let style = if self.rest.starts_with("/**") && !self.rest.starts_with("/**/") {
            CommentStyle::Doc
        } else {
            CommentStyle::Block
        };
        self.advance_n(2);
        loop {
            if self.rest.starts_with("*/") {
                self.advance_n(2);
                break;
            }
            if self.rest.is_empty() {
                return TokenKind::Error("unterminated comment".into());
            }
            self.advance();
        }
        TokenKind::Comment {
            text: self.source_slice(start, self.position),
            style,
        }
    }

    /// Scans a quoted string literal.
    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.advance(); // consume opening quote
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some(c) => {
                            self.advance();
                            text.push(c);
                        }
                        None => return TokenKind::Error("unterminated string literal".into()),
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => return TokenKind::Error("unterminated string literal".into()),
            }
        }
        TokenKind::String(text)
    }

    /// Scans a balanced `( ... )` group, respecting nested strings.
    fn scan_param_list(&mut self) -> TokenKind {
        self.advance(); // consume '('
        let inner_start = self.position;
        let mut depth = 1usize;
        loop {
            match self.peek_char() {
                Some('(') => {
                    depth += 1;
                    self.advance();
                }
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = self.source_slice(inner_start, self.position);
                        self.advance();
                        return TokenKind::ParamList(inner);
                    }
                    self.advance();
                }
                Some(q @ ('"' | '\'')) => {
                    if let TokenKind::Error(msg) = self.scan_string(q) {
                        return TokenKind::Error(msg);
                    }
                }
                Some(_) => self.advance(),
                None => return TokenKind::Error("unterminated parameter list".into()),
            }
        }
    }

    /// Scans a `#{ ... }` interpolation.
    fn scan_interpolation(&mut self) -> TokenKind {
        self.advance_n(2);
        let inner_start = self.position;
        let mut depth = 1usize;
        loop {
            match self.peek_char() {
                Some('{') => {
                    depth += 1;
                    self.advance();
                }
                Some('}') => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = self.source_slice(inner_start, self.position);
                        self.advance();
                        return TokenKind::Interpolation(inner);
                    }
                    self.advance();
                }
                Some(_) => self.advance(),
                None => return TokenKind::Error("unterminated interpolation".into()),
            }
        }
    }

    /// Scans `@name` or `$name`; a bare sigil becomes a delimiter.
    fn scan_prefixed(&mut self, make: fn(String) -> TokenKind, sigil: char) -> TokenKind {
        self.advance();
        match self.peek_char() {
            Some(c) if is_ident_char(c) => make(self.scan_ident_text()),
            _ => TokenKind::Delim(sigil),
        }
    }

    /// Scans identifier text, keeping backslash escapes verbatim.
    fn scan_ident_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\\' {
                self.advance();
                text.push('\\');
                if let Some(escaped) = self.peek_char() {
                    self.advance();
                    text.push(escaped);
                }
            } else if is_ident_char(c) {
                self.advance();
                text.push(c);
            } else {
                break;
            }
        }
        text
    }

    /// Returns owned source text between two absolute offsets.
    fn source_slice(&self, start: usize, end: usize) -> String {
        self.source[start..end].to_string()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
            return None;
        }
        Some(token)
    }
}

/// Returns true if `c` can appear in an identifier.
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Returns true if `rest` starts a `///` doc line (but not a `////` banner).
fn is_doc_line(rest: &str) -> bool {
    rest.starts_with("///") && !rest.starts_with("////")
}
