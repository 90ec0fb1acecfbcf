//! Documentation comments attached to interface items.

use crate::ident::Identifier;
use serde::{Deserialize, Serialize};

/// Inline documentation content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// Inline code.
    Code(String),
    /// Emphasized text.
    Emphasis(Vec<Inline>),
    /// Bold text.
    Bold(Vec<Inline>),
    /// A link to an external URL.
    Link {
        /// Target URL.
        target: String,
        /// Link text; the URL is shown when empty.
        #[serde(default)]
        content: Vec<Inline>,
    },
    /// A cross-reference to a declaration.
    Reference {
        /// Referenced declaration.
        target: Identifier,
        /// Replacement text; the declaration's name is shown when empty.
        #[serde(default)]
        content: Vec<Inline>,
    },
}

/// A documentation tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// `@open`: the enclosing include is expanded by default.
    Open,
    /// `@closed`: the enclosing include is collapsed by default.
    Closed,
    /// `@inline`: the enclosing include is rendered as if written in place.
    Inline,
    /// `@author`.
    Author(String),
    /// `@deprecated`.
    Deprecated(Vec<Inline>),
    /// `@since`.
    Since(String),
    /// `@version`.
    Version(String),
    /// `@return`.
    Return(Vec<Inline>),
}

/// A block of documentation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    /// A paragraph.
    Paragraph(Vec<Inline>),
    /// A section heading.
    Heading {
        /// Heading level, 1 being the topmost inside a page.
        level: u8,
        /// Explicit label used as the heading's anchor.
        #[serde(default)]
        label: Option<String>,
        /// Heading text.
        text: Vec<Inline>,
    },
    /// A code block.
    CodeBlock(String),
    /// Verbatim text.
    Verbatim(String),
    /// A bulleted or numbered list.
    List {
        /// Whether the list is numbered.
        #[serde(default)]
        ordered: bool,
        /// List items.
        items: Vec<Vec<Block>>,
    },
    /// A tag.
    Tag(Tag),
}

/// The documentation attached to one item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Docs(pub Vec<Block>);

impl Docs {
    /// Documentation with no content.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// A single paragraph of plain text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self(vec![Block::Paragraph(vec![Inline::Text(text.into())])])
    }

    /// Append a block.
    #[must_use]
    pub fn with(mut self, block: Block) -> Self {
        self.0.push(block);
        self
    }

    /// The blocks in order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    /// Returns true when no block would render.
    ///
    /// Tags that only steer rendering (`@open`, `@closed`, `@inline`) do not
    /// count as content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|block| {
            matches!(block, Block::Tag(Tag::Open | Tag::Closed | Tag::Inline))
        })
    }

    /// Returns true if the given tag is present.
    #[must_use]
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.0
            .iter()
            .any(|block| matches!(block, Block::Tag(t) if t == tag))
    }

    /// The leading paragraph, used as a synopsis in listings.
    #[must_use]
    pub fn synopsis(&self) -> Option<&Block> {
        self.0.iter().find(|block| matches!(block, Block::Paragraph(_)))
    }
}

/// A documentation item in a signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocComment {
    /// A free-standing documentation block.
    Docs(Docs),
    /// The stop marker `(**/**)`, toggling visibility of later comments.
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_tags_are_not_content() {
        let docs = Docs::empty().with(Block::Tag(Tag::Inline));
        assert!(docs.is_empty());
        assert!(docs.has_tag(&Tag::Inline));
        assert!(!docs.has_tag(&Tag::Open));
    }

    #[test]
    fn test_synopsis_skips_headings() {
        let docs = Docs::empty()
            .with(Block::Heading {
                level: 1,
                label: None,
                text: vec![Inline::Text("Title".into())],
            })
            .with(Block::Paragraph(vec![Inline::Text("First.".into())]));

        assert!(matches!(docs.synopsis(), Some(Block::Paragraph(_))));
        assert!(!docs.is_empty());
    }
}
