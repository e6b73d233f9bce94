//! Selector grammar validation.
//!
//! Class names follow
//!
//! ```text
//! selector      := prefix "-" [namespace "-"] block modifier? element?
//! prefix        := allowed prefix ("c" | "u" by default)
//! block/element := lowercase-hyphenated-identifier
//! modifier      := "--" lowercase-hyphenated-identifier
//! element       := "__" lowercase-hyphenated-identifier modifier?
//! ```
//!
//! Each rule reports at most one [`Violation`] per selector, with a
//! mechanically derived suggestion when one exists.

use pcos_foundation::{AnalysisConfig, Diagnostic, DiagnosticCode, SourceSpan};
use pcos_syntax::{DeclKind, Declaration, Nesting};

/// One `__element` of a class name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementPart {
    /// Element name.
    pub name: String,
    /// `--modifier`s attached to the element.
    pub modifiers: Vec<String>,
}

/// A class name split into its grammar parts.
///
/// Parsing is total: malformed names still decompose, and validation reports
/// what is wrong with the parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassName {
    /// Type prefix as written, when the name has one (`c` in `c-button`).
    pub prefix: Option<String>,
    /// Namespace segment, when it is one of the configured namespaces.
    pub namespace: Option<String>,
    /// Block name.
    pub block: String,
    /// `--modifier`s attached to the block.
    pub modifiers: Vec<String>,
    /// `__element`s in order.
    pub elements: Vec<ElementPart>,
}

impl ClassName {
    /// Reassembles the class name (without a leading `.`).
    #[must_use]
    pub fn to_class_string(&self) -> String {
        let mut out = String::new();
        if let Some(prefix) = &self.prefix {
            out.push_str(prefix);
            out.push('-');
        }
        if let Some(namespace) = &self.namespace {
            out.push_str(namespace);
            out.push('-');
        }
        out.push_str(&self.block);
        for modifier in &self.modifiers {
            out.push_str("--");
            out.push_str(modifier);
        }
        for element in &self.elements {
            out.push_str("__");
            out.push_str(&element.name);
            for modifier in &element.modifiers {
                out.push_str("--");
                out.push_str(modifier);
            }
        }
        out
    }

    /// Every segment in source order.
    fn segments(&self) -> impl Iterator<Item = &str> {
        self.prefix
            .iter()
            .chain(self.namespace.iter())
            .chain(std::iter::once(&self.block))
            .chain(self.modifiers.iter())
            .map(String::as_str)
            .chain(self.elements.iter().flat_map(|e| {
                std::iter::once(e.name.as_str()).chain(e.modifiers.iter().map(String::as_str))
            }))
    }

    fn map_segments(&self, fix: impl Fn(&str) -> String) -> Self {
        Self {
            prefix: self.prefix.as_deref().map(&fix),
            namespace: self.namespace.as_deref().map(&fix),
            block: fix(&self.block),
            modifiers: self.modifiers.iter().map(|m| fix(m)).collect(),
            elements: self
                .elements
                .iter()
                .map(|e| ElementPart {
                    name: fix(&e.name),
                    modifiers: e.modifiers.iter().map(|m| fix(m)).collect(),
                })
                .collect(),
        }
    }

    /// Keeps the first `max` elements and joins the rest onto the last kept
    /// one (or onto the block) with `-`.
    #[must_use]
    pub fn flatten_elements(&self, max: usize) -> Self {
        let mut flattened = self.clone();
        if self.elements.len() <= max {
            return flattened;
        }
        let extras = flattened.elements.split_off(max);
        let extra_names = extras.iter().map(|e| e.name.as_str());
        let extra_modifiers = extras.iter().flat_map(|e| e.modifiers.iter().cloned());
        match flattened.elements.last_mut() {
            Some(last) => {
                last.name = std::iter::once(last.name.as_str())
                    .chain(extra_names)
                    .collect::<Vec<_>>()
                    .join("-");
                last.modifiers.extend(extra_modifiers);
            }
            None => {
                flattened.block = std::iter::once(flattened.block.as_str())
                    .chain(extra_names)
                    .collect::<Vec<_>>()
                    .join("-");
                flattened.modifiers.extend(extra_modifiers);
            }
        }
        flattened
    }
}

/// Splits a class name into its grammar parts. A leading `.` is ignored.
#[must_use]
pub fn parse_class_name(name: &str, config: &AnalysisConfig) -> ClassName {
    let name = name.strip_prefix('.').unwrap_or(name);
    let mut parts = name.split("__");
    let head_part = parts.next().unwrap_or_default();
    let elements = parts
        .map(|part| {
            let mut pieces = part.split("--");
            ElementPart {
                name: pieces.next().unwrap_or_default().to_string(),
                modifiers: pieces.map(str::to_string).collect(),
            }
        })
        .collect();

    let mut pieces = head_part.split("--");
    let head = pieces.next().unwrap_or_default();
    let modifiers = pieces.map(str::to_string).collect();

    let (prefix, rest) = match head.split_once('-') {
        Some((prefix, rest))
            if config.is_allowed_prefix(&prefix.to_ascii_lowercase()) || is_single_letter(prefix) =>
        {
            (Some(prefix.to_string()), rest)
        }
        _ => (None, head),
    };
    let (namespace, block) = match rest.split_once('-') {
        Some((namespace, block)) if prefix.is_some() && config.namespaces.contains(namespace) => {
            (Some(namespace.to_string()), block)
        }
        _ => (None, rest),
    };

    ClassName {
        prefix,
        namespace,
        block: block.to_string(),
        modifiers,
        elements,
    }
}

/// A grammar rule broken by a class name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Which rule.
    pub code: DiagnosticCode,
    /// What is wrong.
    pub message: String,
    /// Replacement class name, when one can be derived.
    pub suggestion: Option<String>,
}

impl Violation {
    /// The message leads with the rule name, so each violation names its rule.
    fn new(code: DiagnosticCode, detail: String, suggestion: Option<String>) -> Self {
        Self {
            code,
            message: format!("{}: {detail}", code.rule_name()),
            suggestion,
        }
    }

    /// Turns the violation into an error diagnostic at `span`.
    #[must_use]
    pub fn into_diagnostic(self, span: SourceSpan) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code, self.message, span);
        match self.suggestion {
            Some(suggestion) => diagnostic.with_suggestion(suggestion),
            None => diagnostic,
        }
    }
}

/// Validates one class name for a declaration of the given kind.
#[must_use]
pub fn validate_class_name(name: &str, kind: DeclKind, config: &AnalysisConfig) -> Vec<Violation> {
    let name = name.strip_prefix('.').unwrap_or(name);
    let class = parse_class_name(name, config);
    let expected = expected_prefix(kind, config);
    let mut violations = Vec::new();

    match &class.prefix {
        None => violations.push(Violation::new(
            DiagnosticCode::MissingPrefix,
            format!("`{name}` should start with `{expected}-`"),
            Some(format!("{expected}-{name}")),
        )),
        Some(prefix) => {
            let lower = prefix.to_ascii_lowercase();
            if !config.is_allowed_prefix(&lower) {
                let allowed = config
                    .allowed_prefixes
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                violations.push(Violation::new(
                    DiagnosticCode::UnknownPrefix,
                    format!("`{name}` uses `{prefix}-`; allowed prefixes: {allowed}"),
                    Some(format!("{expected}{}", &name[prefix.len()..])),
                ));
            } else if let Some(kind_prefix) = kind_prefix(kind) {
                if matches!(lower.as_str(), "c" | "u") && lower != kind_prefix {
                    violations.push(Violation::new(
                        DiagnosticCode::PrefixKindMismatch,
                        format!("`{name}` is a {kind} but uses the `{lower}-` prefix"),
                        Some(format!("{kind_prefix}{}", &name[prefix.len()..])),
                    ));
                }
            }
        }
    }

    if let Some(segment) = class.segments().find(|s| !is_valid_segment(s)) {
        let fixed = class.map_segments(|s| s.to_lowercase().replace('_', "-"));
        let suggestion = fixed
            .segments()
            .all(is_valid_segment)
            .then(|| fixed.to_class_string());
        let shown = if segment.is_empty() { "(empty)" } else { segment };
        violations.push(Violation::new(
            DiagnosticCode::InvalidSegment,
            format!("`{name}` has segment `{shown}`; segments must be lowercase-hyphenated"),
            suggestion,
        ));
    }

    let max = config.max_element_nesting_depth;
    if class.elements.len() > max {
        violations.push(element_depth_violation(name, &class, max));
    }

    if class.modifiers.len() > 1 || class.elements.iter().any(|e| e.modifiers.len() > 1) {
        violations.push(Violation::new(
            DiagnosticCode::MultipleModifiers,
            format!("`{name}` applies more than one modifier to the same block or element"),
            None,
        ));
    }

    violations
}

fn element_depth_violation(name: &str, class: &ClassName, max: usize) -> Violation {
    Violation::new(
        DiagnosticCode::ElementDepth,
        format!(
            "`{name}` nests {} elements; at most {max} allowed",
            class.elements.len()
        ),
        Some(class.flatten_elements(max).to_class_string()),
    )
}

/// Validates every class in a selector.
///
/// Pseudo-classes and attribute selectors are ignored. A selector without any
/// class is checked by its first bare identifier. Each rule is reported at
/// most once for the whole selector.
#[must_use]
pub fn validate_selector(selector: &str, kind: DeclKind, config: &AnalysisConfig) -> Vec<Violation> {
    let mut names = class_names(selector);
    if names.is_empty() {
        names.extend(first_identifier(selector));
    }

    let mut violations: Vec<Violation> = Vec::new();
    for name in names {
        for violation in validate_class_name(name, kind, config) {
            if !violations.iter().any(|v| v.code == violation.code) {
                violations.push(violation);
            }
        }
    }
    violations
}

/// Runs the grammar checks that apply to a top-level declaration.
///
/// Rule selectors are validated when they contain a class (or always, with
/// bare-selector validation enabled). Mixins and functions are validated by
/// name when they are components or utilities. Interfaces and objects follow
/// their own naming and are skipped. Reopened blocks have their selectors
/// validated too. Element nesting of children is checked structurally.
#[must_use]
pub fn check_declaration(declaration: &Declaration, config: &AnalysisConfig) -> Vec<Diagnostic> {
    let kind = declaration.kind;
    let violations = match kind {
        DeclKind::Interface | DeclKind::Object => Vec::new(),
        _ if declaration.signature.starts_with('@') => {
            if matches!(kind, DeclKind::Component | DeclKind::Utility) {
                validate_class_name(&declaration.name, kind, config)
            } else {
                Vec::new()
            }
        }
        _ => {
            if class_names(&declaration.signature).is_empty() && !config.validate_bare_selectors {
                Vec::new()
            } else {
                validate_selector(&declaration.signature, kind, config)
            }
        }
    };

    let mut diagnostics: Vec<Diagnostic> = violations
        .into_iter()
        .map(|v| v.into_diagnostic(declaration.span.clone()))
        .collect();
    if !matches!(kind, DeclKind::Interface | DeclKind::Object) {
        for reopened in declaration
            .children
            .iter()
            .filter(|c| c.nesting == Nesting::Reopened)
        {
            diagnostics.extend(
                validate_selector(&reopened.signature, kind, config)
                    .into_iter()
                    .map(|v| v.into_diagnostic(reopened.span.clone())),
            );
        }
    }
    // A rule written as an element already sits one level down.
    let depth = if declaration.signature.starts_with('@') {
        0
    } else {
        parse_class_name(&declaration.name, config).elements.len()
    };
    check_element_nesting(declaration, depth, config, &mut diagnostics);
    diagnostics
}

/// Reports element children nested deeper than the configured maximum.
fn check_element_nesting(
    declaration: &Declaration,
    depth: usize,
    config: &AnalysisConfig,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for child in &declaration.children {
        let child_depth = match child.nesting {
            Nesting::Element => depth + 1,
            Nesting::Modifier | Nesting::Reopened => depth,
            Nesting::Root | Nesting::Nested => 0,
        };
        if child.nesting == Nesting::Element && child_depth > config.max_element_nesting_depth {
            let class = parse_class_name(&child.name, config);
            let violation = if class.elements.len() > config.max_element_nesting_depth {
                element_depth_violation(&child.name, &class, config.max_element_nesting_depth)
            } else {
                Violation::new(
                    DiagnosticCode::ElementDepth,
                    format!(
                        "element `{}` is nested {child_depth} levels deep; at most {} allowed",
                        child.name, config.max_element_nesting_depth
                    ),
                    None,
                )
            };
            diagnostics.push(violation.into_diagnostic(child.span.clone()));
        }
        check_element_nesting(child, child_depth, config, diagnostics);
    }
}

/// Class names in a selector, skipping attribute and interpolation contents.
#[must_use]
pub fn class_names(selector: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut chars = selector.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '[' => {
                for (_, c) in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                }
            }
            '#' if chars.peek().is_some_and(|&(_, c)| c == '{') => {
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                }
            }
            '.' => {
                let start = i + 1;
                let rest = &selector[start..];
                let len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
                if len > 0 && !rest.starts_with(|c: char| c.is_ascii_digit()) {
                    names.push(&rest[..len]);
                }
            }
            _ => {}
        }
    }
    names
}

fn first_identifier(selector: &str) -> Option<&str> {
    selector.split(|c: char| !is_ident_char(c)).find(|s| !s.is_empty())
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn is_single_letter(text: &str) -> bool {
    let mut chars = text.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
}

fn is_valid_segment(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_lowercase())
        && !segment.ends_with('-')
        && segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn kind_prefix(kind: DeclKind) -> Option<&'static str> {
    match kind {
        DeclKind::Component => Some("c"),
        DeclKind::Utility => Some("u"),
        _ => None,
    }
}

/// The prefix a missing or unknown prefix should be replaced with.
fn expected_prefix(kind: DeclKind, config: &AnalysisConfig) -> String {
    let preferred = if kind == DeclKind::Utility { "u" } else { "c" };
    if config.is_allowed_prefix(preferred) {
        return preferred.to_string();
    }
    config
        .allowed_prefixes
        .iter()
        .next()
        .cloned()
        .unwrap_or_else(|| preferred.to_string())
}
