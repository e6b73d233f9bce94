//! Renders a [`DocBlock`] back to comment text.
//!
//! The output is canonical: extracting it again with
//! [`extract_doc`](crate::doc::extract_doc) yields an equal block.
//!
//! # Example
//!
//! ```
//! use pcos_syntax::doc::{extract_doc, DeclKind, DocBlock};
//! use pcos_syntax::render::render_doc;
//!
//! let block = DocBlock {
//!     kind: Some(DeclKind::Interface),
//!     description: "Themeable surface.".to_string(),
//!     ..DocBlock::default()
//! };
//! let text = render_doc(&block);
//! assert_eq!(text, "/**\n * Themeable surface.\n *\n * @type interface\n */");
//! assert_eq!(extract_doc(&text).block, block);
//! ```

use std::fmt::Write;

use crate::doc::{DocBlock, Modifier, Param, Prop};

/// Comment syntax used for rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DocStyle {
    /// `/** ... */` with a leading ` * ` on each line.
    #[default]
    Block,
    /// One `///` line per content line.
    Lines,
}

/// Renders a doc block as a `/** ... */` comment.
#[must_use]
pub fn render_doc(block: &DocBlock) -> String {
    render_doc_with_style(block, DocStyle::Block)
}

/// Renders a doc block in the given comment style.
#[must_use]
pub fn render_doc_with_style(block: &DocBlock, style: DocStyle) -> String {
    let mut renderer = DocRenderer::default();
    renderer.render(block);
    renderer.finish(style)
}

/// Renderer state: content lines without comment decoration.
#[derive(Default)]
struct DocRenderer {
    lines: Vec<String>,
}

impl DocRenderer {
    fn render(&mut self, block: &DocBlock) {
        if !block.description.is_empty() {
            self.lines.extend(block.description.lines().map(str::to_string));
        }

        let mut tags = Vec::new();
        if let Some(kind) = block.kind {
            tags.push(format!("@type {kind}"));
        }
        if let Some(name) = &block.name {
            tags.push(format!("@name {name}"));
        }
        if let Some(implements) = &block.implements {
            tags.push(format!("@implements {implements}"));
        }
        tags.extend(block.params.iter().map(render_param));
        tags.extend(block.props.iter().map(render_prop));
        tags.extend(block.modifiers.iter().map(render_modifier));
        if let Some(returns) = &block.returns {
            tags.push(format!("@returns {returns}"));
        }
        for (key, values) in &block.extensions {
            for value in values {
                tags.push(tag_line(key, value));
            }
        }

        if !tags.is_empty() {
            if !self.lines.is_empty() {
                self.lines.push(String::new());
            }
            self.lines.extend(tags);
        }
    }

    fn finish(self, style: DocStyle) -> String {
        let mut output = String::new();
        match style {
            DocStyle::Block => {
                output.push_str("/**");
                for line in &self.lines {
                    if line.is_empty() {
                        output.push_str("\n *");
                    } else {
                        let _ = write!(output, "\n * {line}");
                    }
                }
                output.push_str("\n */");
            }
            DocStyle::Lines => {
                if self.lines.is_empty() {
                    output.push_str("///");
                }
                for (i, line) in self.lines.iter().enumerate() {
                    if i > 0 {
                        output.push('\n');
                    }
                    if line.is_empty() {
                        output.push_str("///");
                    } else {
                        let _ = write!(output, "/// {line}");
                    }
                }
            }
        }
        output
    }
}

fn tag_line(tag: &str, rest: &str) -> String {
    if rest.is_empty() {
        format!("@{tag}")
    } else {
        format!("@{tag} {rest}")
    }
}

fn push_type(out: &mut String, ty: Option<&str>) {
    if let Some(ty) = ty {
        let _ = write!(out, "{{{ty}}} ");
    }
}

fn push_description(out: &mut String, description: &str) {
    if !description.is_empty() {
        let _ = write!(out, " - {description}");
    }
}

fn render_param(param: &Param) -> String {
    let mut out = String::from("@param ");
    push_type(&mut out, param.ty.as_deref());
    match (&param.default, param.optional) {
        (Some(default), _) => {
            let _ = write!(out, "[{}={default}]", param.name);
        }
        (None, true) => {
            let _ = write!(out, "[{}]", param.name);
        }
        (None, false) => out.push_str(&param.name),
    }
    push_description(&mut out, &param.description);
    out
}

fn render_prop(prop: &Prop) -> String {
    let mut out = String::from("@prop ");
    push_type(&mut out, prop.ty.as_deref());
    out.push_str(&prop.name);
    push_description(&mut out, &prop.description);
    out
}

fn render_modifier(modifier: &Modifier) -> String {
    let mut out = format!("@modifier {}", modifier.name);
    push_description(&mut out, &modifier.description);
    out
}
