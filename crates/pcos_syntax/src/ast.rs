//! Parse tree for stylesheet source.
//!
//! The tree keeps only what the analyzer needs: rule blocks with their raw
//! selector text, at-rules with their prelude and parameter list, import and
//! include references, and the doc comment attached to each node. Property
//! declarations are consumed by the parser and dropped.

use pcos_foundation::Span;

/// A comment attached to a node as its documentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocComment {
    /// Raw comment text, delimiters included.
    pub text: String,
    /// Where the comment is.
    pub span: Span,
}

/// A nestable rule block: `selector { ... }`.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleNode {
    /// Raw selector text, whitespace-normalised.
    pub selector: String,
    /// Attached documentation, if any.
    pub doc: Option<DocComment>,
    /// Nested nodes in source order.
    pub children: Vec<Node>,
    /// Span from the first selector token to the closing brace.
    pub span: Span,
}

/// An at-rule other than imports and includes: `@mixin`, `@function`, `@media`, ...
#[derive(Clone, Debug, PartialEq)]
pub struct AtRuleNode {
    /// Keyword without the `@`.
    pub keyword: String,
    /// Leading identifier after the keyword (`c-button` in `@mixin c-button(...)`).
    pub name: Option<String>,
    /// Raw parameter list text, without parentheses.
    pub params: Option<String>,
    /// Full prelude text between the keyword and the block or `;`.
    pub prelude: String,
    /// Attached documentation, if any.
    pub doc: Option<DocComment>,
    /// Block contents; `None` for statement at-rules ending in `;`.
    pub body: Option<Vec<Node>>,
    /// Span from the keyword to the end of the block or `;`.
    pub span: Span,
}

/// Which import-like at-rule produced an [`ImportNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImportKind {
    /// `@import`
    Import,
    /// `@use`
    Use,
    /// `@forward`
    Forward,
}

impl ImportKind {
    /// Maps an at-keyword to an import kind.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "import" => Some(Self::Import),
            "use" => Some(Self::Use),
            "forward" => Some(Self::Forward),
            _ => None,
        }
    }
}

/// One target of an import-like at-rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportTarget {
    /// The target as written (`'components/button'` yields `components/button`).
    pub path: String,
    /// True for plain-CSS imports (`url(...)`, remote URLs, `.css` files).
    pub plain_css: bool,
    /// Span of the target string.
    pub span: Span,
}

/// `@import 'a', 'b';`, `@use 'a';`, or `@forward 'a';`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportNode {
    /// Which at-rule.
    pub kind: ImportKind,
    /// Targets in source order.
    pub targets: Vec<ImportTarget>,
    /// Span of the whole statement.
    pub span: Span,
}

/// `@include name(args);` or `@include name { ... }`.
#[derive(Clone, Debug, PartialEq)]
pub struct IncludeNode {
    /// Mixin name.
    pub name: String,
    /// Raw argument text, if any.
    pub args: Option<String>,
    /// Content block, if any.
    pub body: Option<Vec<Node>>,
    /// Span of the whole statement.
    pub span: Span,
}

/// A node of the parse tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Rule block.
    Rule(RuleNode),
    /// Generic at-rule.
    AtRule(AtRuleNode),
    /// Import-like at-rule.
    Import(ImportNode),
    /// Mixin include.
    Include(IncludeNode),
}

impl Node {
    /// Returns the node's span.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Rule(n) => n.span,
            Self::AtRule(n) => n.span,
            Self::Import(n) => n.span,
            Self::Include(n) => n.span,
        }
    }

    /// Returns the attached documentation, if any.
    #[must_use]
    pub fn doc(&self) -> Option<&DocComment> {
        match self {
            Self::Rule(n) => n.doc.as_ref(),
            Self::AtRule(n) => n.doc.as_ref(),
            Self::Import(_) | Self::Include(_) => None,
        }
    }

    /// Returns nested nodes, if the node has a block.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Rule(n) => &n.children,
            Self::AtRule(n) => n.body.as_deref().unwrap_or_default(),
            Self::Include(n) => n.body.as_deref().unwrap_or_default(),
            Self::Import(_) => &[],
        }
    }
}

/// Why a comment ended up unattached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrphanReason {
    /// Another comment followed before any declarable node.
    Superseded,
    /// A property or statement followed instead of a declarable node.
    NotDeclarable,
    /// The block or file ended.
    Trailing,
}

/// A comment that was not attached to any node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrphanComment {
    /// Where the comment is.
    pub span: Span,
    /// Why it was not attached.
    pub reason: OrphanReason,
}

/// A parsed stylesheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
    /// Comments that did not attach to a node.
    pub orphan_comments: Vec<OrphanComment>,
}
