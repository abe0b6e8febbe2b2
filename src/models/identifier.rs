//! Model identifier parsing.
//!
//! Identifiers follow the local-runtime convention `<parent>:<tag>`, e.g.
//! `llama3.1:latest` or `qwen2.5:7b`. Both lookups (context size and
//! tokenizer family) split on the first separator.

use std::fmt;

/// Separator between parent model name and variant tag
pub const SEPARATOR: char = ':';

/// A model identifier split into parent name and optional variant tag
///
/// # Examples
/// ```
/// use localgrid::models::ModelId;
///
/// let id = ModelId::parse("llama3.1:latest");
/// assert_eq!(id.parent(), "llama3.1");
/// assert_eq!(id.tag(), Some("latest"));
///
/// // Only the first separator splits
/// let id = ModelId::parse("hf.co/org/model:Q4:K_M");
/// assert_eq!(id.tag(), Some("Q4:K_M"));
///
/// // No separator, no tag
/// assert_eq!(ModelId::parse("mistral").tag(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId<'a> {
    parent: &'a str,
    tag: Option<&'a str>,
}

impl<'a> ModelId<'a> {
    /// Split an identifier on its first separator
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(SEPARATOR) {
            Some((parent, tag)) => Self {
                parent,
                tag: Some(tag),
            },
            None => Self {
                parent: raw,
                tag: None,
            },
        }
    }

    /// Parent model name (everything before the first separator)
    pub fn parent(&self) -> &'a str {
        self.parent
    }

    /// Variant tag (everything after the first separator)
    pub fn tag(&self) -> Option<&'a str> {
        self.tag
    }

    /// Parent and tag, only when the identifier carried a separator
    pub fn parts(&self) -> Option<(&'a str, &'a str)> {
        self.tag.map(|tag| (self.parent, tag))
    }
}

impl fmt::Display for ModelId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            Some(tag) => write!(f, "{}{}{}", self.parent, SEPARATOR, tag),
            None => f.write_str(self.parent),
        }
    }
}
