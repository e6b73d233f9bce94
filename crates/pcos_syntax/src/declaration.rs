//! Declarations: the documented, named units a stylesheet defines.
//!
//! [`parse_source_file`] runs the whole per-file pipeline (lexing, parsing,
//! doc extraction) and lifts the parse tree into a [`SourceFile`] whose
//! top-level [`Declaration`]s are what the project registry indexes.
//!
//! A top-level node is declarable when it is:
//! - a rule whose selector names a class, or any documented rule;
//! - a `@mixin` or `@function` that is documented or carries a known type
//!   prefix (`c-`, `u-`);
//! - any node documented with `@type interface`.
//!
//! Rules inside conditional at-rules (`@media`, `@supports`, ...) count as
//! top-level.

use pcos_foundation::{Diagnostic, DiagnosticCode, ErrorContext, FileId, Result, SourceSpan, Span};
use tracing::{debug, instrument, trace};

use crate::ast::{AtRuleNode, DocComment, ImportKind, Node, OrphanReason, RuleNode, Stylesheet};
use crate::doc::{extract_doc, DeclKind, DocBlock, DocIssueKind};
use crate::parser::parse;

/// Where a declaration sits relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nesting {
    /// Top-level declaration.
    Root,
    /// `&__name` element child.
    Element,
    /// `&--name` modifier child.
    Modifier,
    /// Any other nested rule.
    Nested,
    /// An undocumented later rule block for the same top-level name
    /// (`.c-button:hover`, a `@media` override).
    Reopened,
}

/// A named unit of a stylesheet with its metadata.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    /// Declared or inferred kind.
    pub kind: DeclKind,
    /// Declared name (`c-button`, `c-button__icon`, ...).
    pub name: String,
    /// Raw selector or at-rule prelude.
    pub signature: String,
    /// Where the declaration is.
    pub span: SourceSpan,
    /// Extracted doc metadata.
    pub doc: Option<DocBlock>,
    /// Nested declarations in source order.
    pub children: Vec<Declaration>,
    /// Relation to the parent.
    pub nesting: Nesting,
    /// Mixins included directly in this declaration's block.
    pub includes: Vec<String>,
}

impl Declaration {
    /// Returns true if the declaration is an interface.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == DeclKind::Interface
    }

    /// Modifier names from the doc block and from `&--x` children, including
    /// those of reopened blocks.
    #[must_use]
    pub fn modifier_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .doc
            .iter()
            .flat_map(|doc| doc.modifiers.iter().map(|m| m.name.as_str()))
            .collect();
        let reopened = self
            .children
            .iter()
            .filter(|c| c.nesting == Nesting::Reopened)
            .flat_map(|c| c.children.iter());
        for child in self.children.iter().chain(reopened) {
            if child.nesting != Nesting::Modifier {
                continue;
            }
            if let Some((_, modifier)) = child.name.rsplit_once("--") {
                if !names.contains(&modifier) {
                    names.push(modifier);
                }
            }
        }
        names
    }

    /// Visits this declaration and all descendants, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Declaration)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// One import target of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportRef {
    /// Target as written.
    pub target: String,
    /// Which at-rule imported it.
    pub kind: ImportKind,
    /// Plain-CSS imports are never followed.
    pub plain_css: bool,
    /// Where the target string is.
    pub span: SourceSpan,
}

/// One `@include` anywhere in a file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IncludeRef {
    /// Mixin name.
    pub name: String,
    /// Where the include is.
    pub span: SourceSpan,
}

/// A parsed source file. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceFile {
    /// File identifier.
    pub id: FileId,
    /// Raw text.
    pub text: String,
    /// Top-level declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Import targets in source order.
    pub imports: Vec<ImportRef>,
    /// Includes in source order.
    pub includes: Vec<IncludeRef>,
}

/// A source file plus the diagnostics found while building it.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedFile {
    /// The file.
    pub file: SourceFile,
    /// Orphan comments and doc-tag problems.
    pub diagnostics: Vec<Diagnostic>,
}

/// At-rules whose bodies are transparent for declaration purposes.
const CONDITIONAL_AT_RULES: &[&str] = &["media", "supports", "layer", "container", "at-root"];

/// Parses a file and extracts its declarations.
///
/// # Errors
/// Returns a parse error if the text contains an unterminated construct or
/// unbalanced braces, with the file id in its context. No partial file is
/// produced in that case.
#[instrument(skip(id, text), fields(file = %id, bytes = text.len()))]
pub fn parse_source_file(id: FileId, text: &str) -> Result<ParsedFile> {
    let stylesheet = parse(text).map_err(|err| {
        err.with_context(ErrorContext::new().with_file(id.clone()).with_stage("parse"))
    })?;
    let mut builder = FileBuilder::new(id.clone());
    builder.orphans(&stylesheet);
    builder.top_level(&stylesheet.nodes);

    let FileBuilder {
        declarations,
        imports,
        includes,
        diagnostics,
        ..
    } = builder;
    debug!(
        declarations = declarations.len(),
        imports = imports.len(),
        diagnostics = diagnostics.len(),
        "file parsed"
    );
    Ok(ParsedFile {
        file: SourceFile {
            id,
            text: text.to_string(),
            declarations,
            imports,
            includes,
        },
        diagnostics,
    })
}

/// Accumulates the pieces of a [`SourceFile`].
struct FileBuilder {
    id: FileId,
    declarations: Vec<Declaration>,
    imports: Vec<ImportRef>,
    includes: Vec<IncludeRef>,
    diagnostics: Vec<Diagnostic>,
}

impl FileBuilder {
    fn new(id: FileId) -> Self {
        Self {
            id,
            declarations: Vec::new(),
            imports: Vec::new(),
            includes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn source_span(&self, span: Span) -> SourceSpan {
        SourceSpan::new(self.id.clone(), span)
    }

    fn orphans(&mut self, stylesheet: &Stylesheet) {
        for orphan in &stylesheet.orphan_comments {
            let message = match orphan.reason {
                OrphanReason::Superseded => "comment is followed by another comment and documents nothing",
                OrphanReason::NotDeclarable => "doc comment is not followed by a declaration",
                OrphanReason::Trailing => "doc comment at the end of a block documents nothing",
            };
            let span = self.source_span(orphan.span);
            self.diagnostics
                .push(Diagnostic::info(DiagnosticCode::OrphanComment, message, span));
        }
    }

    fn top_level(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Rule(rule) => {
                    let doc = self.doc(rule.doc.as_ref());
                    let class = first_class_name(&rule.selector);
                    if doc.is_none() {
                        if let Some(index) = class.and_then(|name| self.reopened(name)) {
                            self.reopen(index, rule);
                            continue;
                        }
                    }
                    if doc.is_some() || class.is_some() {
                        let declaration = self.rule_declaration(rule, doc);
                        self.declarations.push(declaration);
                    } else {
                        self.collect_references(&rule.children);
                    }
                }
                Node::AtRule(at) => self.top_level_at_rule(at),
                Node::Import(import) => {
                    for target in &import.targets {
                        self.imports.push(ImportRef {
                            target: target.path.clone(),
                            kind: import.kind,
                            plain_css: target.plain_css,
                            span: self.source_span(target.span),
                        });
                    }
                }
                Node::Include(include) => {
                    self.record_include(&include.name, include.span);
                    if let Some(body) = &include.body {
                        self.collect_references(body);
                    }
                }
            }
        }
    }

    fn top_level_at_rule(&mut self, at: &AtRuleNode) {
        let is_callable = matches!(at.keyword.as_str(), "mixin" | "function");
        let prefixed = at.name.as_deref().and_then(type_prefix).is_some();

        if (is_callable && (at.doc.is_some() || prefixed))
            || at.doc.as_ref().is_some_and(|doc| extract_doc(&doc.text).block.is_interface())
        {
            let doc = self.doc(at.doc.as_ref());
            let declaration = self.at_rule_declaration(at, doc);
            self.declarations.push(declaration);
            return;
        }

        if let Some(doc) = &at.doc {
            let span = self.source_span(doc.span);
            self.diagnostics.push(Diagnostic::info(
                DiagnosticCode::OrphanComment,
                format!("doc comment on @{} does not document a declaration", at.keyword),
                span,
            ));
        }
        if let Some(body) = &at.body {
            if CONDITIONAL_AT_RULES.contains(&at.keyword.as_str()) {
                self.top_level(body);
            } else {
                self.collect_references(body);
            }
        }
    }

    /// Extracts a doc block and turns its issues into diagnostics.
    fn doc(&mut self, comment: Option<&DocComment>) -> Option<DocBlock> {
        let comment = comment?;
        let extraction = extract_doc(&comment.text);
        for issue in extraction.issues {
            let code = match issue.kind {
                DocIssueKind::MalformedTag => DiagnosticCode::MalformedTag,
                DocIssueKind::DuplicateTag => DiagnosticCode::DuplicateTag,
            };
            let span = self.source_span(issue.locate(comment.span));
            self.diagnostics.push(Diagnostic::warning(code, issue.message, span));
        }
        Some(extraction.block)
    }

    fn rule_declaration(&mut self, rule: &RuleNode, doc: Option<DocBlock>) -> Declaration {
        let name = doc
            .as_ref()
            .and_then(|d| d.name.clone())
            .or_else(|| first_class_name(&rule.selector).map(str::to_string))
            .unwrap_or_else(|| rule.selector.clone());
        let kind = infer_kind(doc.as_ref(), &name, false);
        trace!(%name, ?kind, "rule declaration");

        let mut declaration = Declaration {
            kind,
            name,
            signature: rule.selector.clone(),
            span: self.source_span(rule.span),
            doc,
            children: Vec::new(),
            nesting: Nesting::Root,
            includes: Vec::new(),
        };
        self.block_contents(&rule.children, &mut declaration);
        declaration
    }

    /// Index of an earlier rule declaration in this file named `name`.
    fn reopened(&self, name: &str) -> Option<usize> {
        self.declarations
            .iter()
            .position(|d| d.name == name && !d.signature.starts_with('@'))
    }

    /// Folds an undocumented rule block into the declaration it reopens.
    fn reopen(&mut self, index: usize, rule: &RuleNode) {
        let Some(original) = self.declarations.get(index) else {
            return;
        };
        let mut reopened = Declaration {
            kind: original.kind,
            name: original.name.clone(),
            signature: rule.selector.clone(),
            span: self.source_span(rule.span),
            doc: None,
            children: Vec::new(),
            nesting: Nesting::Reopened,
            includes: Vec::new(),
        };
        trace!(name = %reopened.name, selector = %rule.selector, "rule block reopened");
        self.block_contents(&rule.children, &mut reopened);
        if let Some(original) = self.declarations.get_mut(index) {
            original.includes.append(&mut reopened.includes);
            original.children.push(reopened);
        }
    }

    fn at_rule_declaration(&mut self, at: &AtRuleNode, doc: Option<DocBlock>) -> Declaration {
        let name = doc
            .as_ref()
            .and_then(|d| d.name.clone())
            .or_else(|| at.name.clone())
            .unwrap_or_else(|| at.prelude.clone());
        let kind = infer_kind(doc.as_ref(), &name, at.keyword == "function");
        trace!(%name, ?kind, keyword = %at.keyword, "at-rule declaration");

        let mut declaration = Declaration {
            kind,
            name,
            signature: format!("@{} {}", at.keyword, at.prelude).trim_end().to_string(),
            span: self.source_span(at.span),
            doc,
            children: Vec::new(),
            nesting: Nesting::Root,
            includes: Vec::new(),
        };
        if let Some(body) = &at.body {
            self.block_contents(body, &mut declaration);
        }
        declaration
    }

    /// Collects children and includes from a declaration's block.
    fn block_contents(&mut self, nodes: &[Node], parent: &mut Declaration) {
        for node in nodes {
            match node {
                Node::Rule(rule) => {
                    let child = self.child_declaration(rule, parent);
                    parent.children.push(child);
                }
                Node::Include(include) => {
                    parent.includes.push(include.name.clone());
                    self.record_include(&include.name, include.span);
                    if let Some(body) = &include.body {
                        self.block_contents(body, parent);
                    }
                }
                Node::AtRule(at) => {
                    if let Some(body) = &at.body {
                        self.block_contents(body, parent);
                    }
                }
                Node::Import(_) => {}
            }
        }
    }

    fn child_declaration(&mut self, rule: &RuleNode, parent: &Declaration) -> Declaration {
        let doc = self.doc(rule.doc.as_ref());
        let (nesting, suffix_name) = match bem_suffix(&rule.selector) {
            Some(("__", part)) => (Nesting::Element, Some(format!("{}__{part}", parent.name))),
            Some((_, part)) => (Nesting::Modifier, Some(format!("{}--{part}", parent.name))),
            None => (Nesting::Nested, None),
        };
        let name = doc
            .as_ref()
            .and_then(|d| d.name.clone())
            .or(suffix_name)
            .or_else(|| first_class_name(&rule.selector).map(str::to_string))
            .unwrap_or_else(|| rule.selector.clone());
        let kind = doc.as_ref().and_then(|d| d.kind).unwrap_or(parent.kind);

        let mut declaration = Declaration {
            kind,
            name,
            signature: rule.selector.clone(),
            span: self.source_span(rule.span),
            doc,
            children: Vec::new(),
            nesting,
            includes: Vec::new(),
        };
        self.block_contents(&rule.children, &mut declaration);
        declaration
    }

    /// Records includes below a node that is not itself a declaration.
    fn collect_references(&mut self, nodes: &[Node]) {
        for node in nodes {
            if let Node::Include(include) = node {
                self.record_include(&include.name, include.span);
            }
            self.collect_references(node.children());
        }
    }

    fn record_include(&mut self, name: &str, span: Span) {
        let span = self.source_span(span);
        self.includes.push(IncludeRef {
            name: name.to_string(),
            span,
        });
    }
}

/// Returns `("__", "icon")` for `&__icon...`, `("--", "large")` for `&--large...`.
fn bem_suffix(selector: &str) -> Option<(&'static str, &str)> {
    let rest = selector.strip_prefix('&')?;
    let (marker, rest) = if let Some(rest) = rest.strip_prefix("__") {
        ("__", rest)
    } else {
        ("--", rest.strip_prefix("--")?)
    };
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let part = &rest[..end];
    (!part.is_empty()).then_some((marker, part))
}

/// The first `.class` name in a selector.
#[must_use]
pub fn first_class_name(selector: &str) -> Option<&str> {
    let mut rest = selector;
    while let Some(dot) = rest.find('.') {
        let after = &rest[dot + 1..];
        let end = after
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '\\'))
            .unwrap_or(after.len());
        if end > 0 && !after.starts_with(|c: char| c.is_ascii_digit()) {
            return Some(&after[..end]);
        }
        rest = after;
    }
    None
}

/// The type prefix of a name (`c` for `c-button`), if it is a known one.
fn type_prefix(name: &str) -> Option<DeclKind> {
    name.split_once('-').and_then(|(prefix, _)| DeclKind::from_prefix(prefix))
}

fn infer_kind(doc: Option<&DocBlock>, name: &str, is_function: bool) -> DeclKind {
    if let Some(kind) = doc.and_then(|d| d.kind) {
        return kind;
    }
    if let Some(kind) = type_prefix(name) {
        return kind;
    }
    if is_function && doc.is_some_and(|d| d.returns.is_some()) {
        return DeclKind::Object;
    }
    DeclKind::Unknown
}
