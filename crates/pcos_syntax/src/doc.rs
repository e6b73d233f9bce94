//! Doc-comment tag extraction.
//!
//! A doc comment is free description text followed by `@tag` lines:
//!
//! ```text
//! /**
//!  * Primary call to action.
//!  *
//!  * @type component
//!  * @implements i-themeable
//!  * @param {color} $accent - Highlight colour
//!  * @param {length} [$radius=4px] - Corner radius
//!  * @modifier large - Bigger padding
//!  */
//! ```
//!
//! Extraction never fails. Lines that do not fit the tag grammar are reported
//! as [`DocIssue`]s and skipped; everything else in the block is still read.

use std::collections::BTreeMap;

use pcos_foundation::Span;

/// Declaration kinds a doc block can name with `@type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeclKind {
    /// `c-` blocks.
    Component,
    /// `u-` single-purpose classes.
    Utility,
    /// Value-producing helpers such as functions.
    Object,
    /// Contracts other declarations implement.
    Interface,
    /// Nothing could be inferred.
    Unknown,
}

impl DeclKind {
    /// Parses the `@type` keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "component" => Some(Self::Component),
            "utility" => Some(Self::Utility),
            "object" => Some(Self::Object),
            "interface" => Some(Self::Interface),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Infers a kind from a type prefix (`c` or `u`).
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "c" => Some(Self::Component),
            "u" => Some(Self::Utility),
            _ => None,
        }
    }

    /// The keyword as written after `@type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Utility => "utility",
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A documented `@param`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    /// Name without the leading `$`.
    pub name: String,
    /// Contents of the `{type}` tag.
    pub ty: Option<String>,
    /// Bracketed or defaulted.
    pub optional: bool,
    /// Default value text.
    pub default: Option<String>,
    /// Text after the `-`.
    pub description: String,
}

/// A documented `@prop`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prop {
    /// Name without the leading `$`.
    pub name: String,
    /// Contents of the `{type}` tag.
    pub ty: Option<String>,
    /// Text after the `-`.
    pub description: String,
}

/// A documented `@modifier`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    /// Name without the leading `--`.
    pub name: String,
    /// Text after the `-`.
    pub description: String,
}

/// Structured content of one doc comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocBlock {
    /// `@type`
    pub kind: Option<DeclKind>,
    /// `@name`
    pub name: Option<String>,
    /// Free text before the first tag, one entry per line joined with `\n`.
    pub description: String,
    /// `@param` entries in source order.
    pub params: Vec<Param>,
    /// `@prop` entries in source order.
    pub props: Vec<Prop>,
    /// `@modifier` entries in source order.
    pub modifiers: Vec<Modifier>,
    /// `@implements`
    pub implements: Option<String>,
    /// `@returns`
    pub returns: Option<String>,
    /// Unrecognised tags, keyed by tag name without `@`.
    pub extensions: BTreeMap<String, Vec<String>>,
}

impl DocBlock {
    /// Returns true if the block declares itself an interface.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == Some(DeclKind::Interface)
    }

    /// Returns true if a param or prop with this name exists.
    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name) || self.props.iter().any(|p| p.name == name)
    }

    /// Returns the type tag of the named param or prop.
    #[must_use]
    pub fn member_type(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.ty.as_deref())
            .or_else(|| self.props.iter().find(|p| p.name == name).map(|p| p.ty.as_deref()))
            .flatten()
    }
}

/// What was wrong with a doc line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocIssueKind {
    /// The line does not fit the tag grammar.
    MalformedTag,
    /// A singular tag appeared more than once.
    DuplicateTag,
}

/// A problem found while extracting a doc block.
///
/// Positions are relative to the raw comment text: `line` counts from zero at
/// the comment's first line, `column` is 1-based within that raw line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocIssue {
    /// What went wrong.
    pub kind: DocIssueKind,
    /// Human-readable explanation.
    pub message: String,
    /// Line offset from the start of the comment.
    pub line: u32,
    /// Column of the tag within its raw line.
    pub column: u32,
    /// Byte offset of the tag within the raw comment.
    pub offset: usize,
    /// Byte length of the offending line content.
    pub len: usize,
}

impl DocIssue {
    /// Places the issue in the file, given the comment's own span.
    #[must_use]
    pub fn locate(&self, comment: Span) -> Span {
        let start = comment.start + self.offset;
        let (line, column) = if self.line == 0 {
            (comment.line, comment.column + self.column - 1)
        } else {
            (comment.line + self.line, self.column)
        };
        #[allow(clippy::cast_possible_truncation)]
        let width = self.len as u32;
        Span::new(start, start + self.len, line, column).with_end(line, column + width)
    }
}

/// Result of [`extract_doc`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocExtraction {
    /// The structured block.
    pub block: DocBlock,
    /// Problems found along the way.
    pub issues: Vec<DocIssue>,
}

/// One normalised line of comment content.
struct ContentLine<'a> {
    text: &'a str,
    line: u32,
    column: u32,
    offset: usize,
}

/// Where continuation text goes.
#[derive(Clone)]
enum LastTag {
    Description,
    Param(usize),
    Prop(usize),
    Modifier(usize),
    Returns,
    Extension(String),
    /// After `@type`, `@name`, or `@implements`, which take no continuation.
    Closed(String),
    /// After a malformed tag; its continuation is dropped with it.
    Discarded,
}

/// Extracts the structured doc block from raw comment text.
#[must_use]
pub fn extract_doc(raw: &str) -> DocExtraction {
    let mut extraction = DocExtraction::default();
    let mut description: Vec<&str> = Vec::new();
    let mut last = LastTag::Description;

    for content in content_lines(raw) {
        let text = content.text;
        if text.starts_with('@') {
            last = apply_tag(&mut extraction, &content);
            continue;
        }
        match &last {
            LastTag::Description => description.push(text),
            _ if text.is_empty() => {}
            LastTag::Param(i) => append(&mut extraction.block.params[*i].description, text),
            LastTag::Prop(i) => append(&mut extraction.block.props[*i].description, text),
            LastTag::Modifier(i) => append(&mut extraction.block.modifiers[*i].description, text),
            LastTag::Returns => {
                if let Some(returns) = extraction.block.returns.as_mut() {
                    append(returns, text);
                }
            }
            LastTag::Extension(key) => {
                if let Some(value) = extraction
                    .block
                    .extensions
                    .get_mut(key)
                    .and_then(|values| values.last_mut())
                {
                    append(value, text);
                }
            }
            LastTag::Closed(tag) => extraction.issues.push(issue(
                DocIssueKind::MalformedTag,
                format!("text after @{tag} belongs to no tag; move it into the description"),
                &content,
            )),
            LastTag::Discarded => {}
        }
    }

    while description.first().is_some_and(|l| l.is_empty()) {
        description.remove(0);
    }
    while description.last().is_some_and(|l| l.is_empty()) {
        description.pop();
    }
    extraction.block.description = description.join("\n");
    extraction
}

fn append(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

/// Strips comment delimiters and leading asterisks from every line.
fn content_lines(raw: &str) -> Vec<ContentLine<'_>> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    for (index, raw_line) in raw.split('\n').enumerate() {
        let mut rest = raw_line.trim_start();
        for opener in ["///", "/**", "/*"] {
            if let Some(stripped) = rest.strip_prefix(opener) {
                rest = stripped;
                break;
            }
        }
        rest = rest.trim_end();
        if let Some(stripped) = rest.strip_suffix("*/") {
            rest = stripped;
        }
        let leading = rest.trim_start();
        if let Some(stripped) = leading.strip_prefix('*') {
            rest = stripped;
        }
        let text = rest.trim();
        let offset_in_line = if text.is_empty() {
            0
        } else {
            text.as_ptr() as usize - raw_line.as_ptr() as usize
        };
        #[allow(clippy::cast_possible_truncation)]
        let (line, column) = (index as u32, raw_line[..offset_in_line].chars().count() as u32 + 1);
        lines.push(ContentLine {
            text,
            line,
            column,
            offset: line_start + offset_in_line,
        });
        line_start += raw_line.len() + 1;
    }
    lines
}

/// Applies one `@tag` line and reports where continuation text belongs.
fn apply_tag(extraction: &mut DocExtraction, content: &ContentLine<'_>) -> LastTag {
    let text = content.text;
    let (tag, rest) = match text[1..].split_once(char::is_whitespace) {
        Some((tag, rest)) => (tag, rest.trim()),
        None => (&text[1..], ""),
    };
    let block = &mut extraction.block;

    let outcome: Result<LastTag, String> = match tag {
        "" => Err("empty tag name".to_string()),
        "type" => match DeclKind::from_keyword(first_word(rest)) {
            Some(kind) => {
                let previous = block.kind.replace(kind);
                duplicate_check(&mut extraction.issues, previous.is_some(), tag, content);
                Ok(LastTag::Closed(tag.to_string()))
            }
            None if rest.is_empty() => Err("@type needs a declaration kind".to_string()),
            None => Err(format!("unknown declaration kind '{}'", first_word(rest))),
        },
        "name" => single_word(rest, tag).map(|name| {
            let previous = block.name.replace(name);
            duplicate_check(&mut extraction.issues, previous.is_some(), tag, content);
            LastTag::Closed(tag.to_string())
        }),
        "implements" => single_word(rest, tag).map(|name| {
            let name = name.trim_start_matches('.').to_string();
            let previous = block.implements.replace(name);
            duplicate_check(&mut extraction.issues, previous.is_some(), tag, content);
            LastTag::Closed(tag.to_string())
        }),
        "returns" => {
            if rest.is_empty() {
                Err("@returns needs a value".to_string())
            } else {
                let previous = block.returns.replace(rest.to_string());
                duplicate_check(&mut extraction.issues, previous.is_some(), tag, content);
                Ok(LastTag::Returns)
            }
        }
        "param" => parse_entry(rest).map(|entry| {
            block.params.push(Param {
                optional: entry.optional || entry.default.is_some(),
                name: entry.name,
                ty: entry.ty,
                default: entry.default,
                description: entry.description,
            });
            LastTag::Param(block.params.len() - 1)
        }),
        "prop" => parse_entry(rest).and_then(|entry| {
            if entry.optional || entry.default.is_some() {
                return Err(format!("@prop '{}' cannot be optional or defaulted", entry.name));
            }
            block.props.push(Prop {
                name: entry.name,
                ty: entry.ty,
                description: entry.description,
            });
            Ok(LastTag::Prop(block.props.len() - 1))
        }),
        "modifier" => parse_modifier(rest).map(|modifier| {
            block.modifiers.push(modifier);
            LastTag::Modifier(block.modifiers.len() - 1)
        }),
        other => {
            block
                .extensions
                .entry(other.to_string())
                .or_default()
                .push(rest.to_string());
            Ok(LastTag::Extension(other.to_string()))
        }
    };

    match outcome {
        Ok(last) => last,
        Err(message) => {
            extraction.issues.push(issue(DocIssueKind::MalformedTag, message, content));
            LastTag::Discarded
        }
    }
}

fn duplicate_check(issues: &mut Vec<DocIssue>, repeated: bool, tag: &str, content: &ContentLine<'_>) {
    if repeated {
        issues.push(issue(
            DocIssueKind::DuplicateTag,
            format!("@{tag} appears more than once; the last value is used"),
            content,
        ));
    }
}

fn issue(kind: DocIssueKind, message: String, content: &ContentLine<'_>) -> DocIssue {
    DocIssue {
        kind,
        message,
        line: content.line,
        column: content.column,
        offset: content.offset,
        len: content.text.len(),
    }
}

fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or_default()
}

fn single_word(rest: &str, tag: &str) -> Result<String, String> {
    let mut words = rest.split_whitespace();
    match (words.next(), words.next()) {
        (Some(word), None) => Ok(word.to_string()),
        (None, _) => Err(format!("@{tag} needs a name")),
        (Some(_), Some(_)) => Err(format!("@{tag} takes a single name")),
    }
}

/// The shared shape of `@param` and `@prop` lines.
struct Entry {
    name: String,
    ty: Option<String>,
    optional: bool,
    default: Option<String>,
    description: String,
}

/// Parses `[{type}] name-part [= default] [- description]`.
fn parse_entry(text: &str) -> Result<Entry, String> {
    let mut rest = text.trim();

    let mut ty = None;
    if let Some(after_brace) = rest.strip_prefix('{') {
        let close = after_brace
            .find('}')
            .ok_or_else(|| "unclosed '{' in type".to_string())?;
        let inner = after_brace[..close].trim();
        if inner.is_empty() {
            return Err("empty type".to_string());
        }
        ty = Some(inner.to_string());
        rest = after_brace[close + 1..].trim_start();
    }

    let (name_part, optional, after) = if let Some(after_bracket) = rest.strip_prefix('[') {
        let close = after_bracket
            .find(']')
            .ok_or_else(|| "unclosed '[' in name".to_string())?;
        (&after_bracket[..close], true, &after_bracket[close + 1..])
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (&rest[..end], false, &rest[end..])
    };

    let (name, mut default) = match name_part.split_once('=') {
        Some((name, default)) => {
            let default = default.trim();
            if default.is_empty() {
                return Err("empty default value".to_string());
            }
            (name.trim(), Some(default.to_string()))
        }
        None => (name_part.trim(), None),
    };
    let name = normalize_name(name)?;

    let mut after = after.trim();
    // `$size = 2px - Size`: a spaced default runs up to the ` - ` separator.
    if default.is_none() && !optional {
        if let Some(value) = after.strip_prefix('=') {
            let (value, rest) = match value.find(" - ") {
                Some(index) => (&value[..index], &value[index + 1..]),
                None => (value, ""),
            };
            let value = value.trim();
            if value.is_empty() {
                return Err("empty default value".to_string());
            }
            default = Some(value.to_string());
            after = rest.trim();
        }
    }
    let description = after.strip_prefix('-').map_or(after, str::trim_start);

    Ok(Entry {
        name,
        ty,
        optional,
        default,
        description: description.to_string(),
    })
}

/// Parses `name [- description]` for `@modifier`.
fn parse_modifier(text: &str) -> Result<Modifier, String> {
    let text = text.trim();
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let raw = text[..end].trim_start_matches("--");
    if raw.is_empty() {
        return Err("@modifier needs a name".to_string());
    }
    if !raw.chars().all(is_name_char) {
        return Err(format!("invalid modifier name '{raw}'"));
    }
    let after = text[end..].trim();
    let description = after.strip_prefix('-').map_or(after, str::trim_start);
    Ok(Modifier {
        name: raw.to_string(),
        description: description.to_string(),
    })
}

fn normalize_name(name: &str) -> Result<String, String> {
    let name = name.strip_prefix('$').unwrap_or(name);
    if name.is_empty() {
        return Err("missing name".to_string());
    }
    if !name.chars().all(is_name_char) {
        return Err(format!("invalid name '{name}'"));
    }
    Ok(name.to_string())
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
