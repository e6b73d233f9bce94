//! File identifiers and file-qualified spans.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A path-like identifier for one stylesheet handed to the analyzer.
///
/// The analyzer never touches the file system; ids are opaque keys into the
/// caller's source map. Ordering is lexicographic, which makes diagnostic
/// output stable.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileId(String);

impl FileId {
    /// Creates a file id from any path-like string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the directory part of the id (everything before the last `/`).
    ///
    /// Returns an empty string for ids without a directory.
    #[must_use]
    pub fn directory(&self) -> &str {
        self.0.rfind('/').map_or("", |idx| &self.0[..idx])
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A span qualified by the file it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceSpan {
    /// The owning file.
    pub file: FileId,
    /// Position within the file.
    pub span: Span,
}

impl SourceSpan {
    /// Creates a new file-qualified span.
    #[must_use]
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }

    /// Sort key: file, then line, then column.
    #[must_use]
    pub fn sort_key(&self) -> (&FileId, u32, u32) {
        (&self.file, self.span.line, self.span.column)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.span.line, self.span.column)
    }
}
