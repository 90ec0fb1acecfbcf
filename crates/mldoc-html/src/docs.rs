//! Documentation comments to markup.

use crate::generator::Generator;
use crate::markup::{div, text, Markup, Node};
use crate::tree::TocEntry;
use mldoc_interface::{Block, Docs, Inline, Tag};

/// Plain text of inline content, used for heading anchors and the TOC.
pub fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(s) | Inline::Code(s) => out.push_str(s),
            Inline::Emphasis(children) | Inline::Bold(children) => {
                out.push_str(&inline_text(children));
            }
            Inline::Link { target, content } if content.is_empty() => out.push_str(target),
            Inline::Reference { target, content } if content.is_empty() => {
                out.push_str(target.name());
            }
            Inline::Link { content, .. } | Inline::Reference { content, .. } => {
                out.push_str(&inline_text(content));
            }
        }
    }
    out
}

/// Anchor of a heading: its explicit label, or a slug of its text.
pub fn heading_anchor(label: Option<&str>, inlines: &[Inline]) -> String {
    if let Some(label) = label {
        return label.to_string();
    }
    let mut slug = String::new();
    for c in inline_text(inlines).chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Table-of-contents entries for the headings in `docs`.
pub fn toc_entries(docs: &Docs) -> Vec<TocEntry> {
    docs.blocks()
        .iter()
        .filter_map(|block| match block {
            Block::Heading { level, label, text } => Some(TocEntry {
                level: *level,
                anchor: heading_anchor(label.as_deref(), text),
                text: inline_text(text),
            }),
            _ => None,
        })
        .collect()
}

impl Generator<'_> {
    /// Render a full documentation comment.
    pub fn docs(&mut self, docs: &Docs) -> Markup {
        let mut out = Vec::new();
        for block in docs.blocks() {
            if let Some(node) = self.block(block) {
                out.push(node);
            }
        }
        out
    }

    /// Render only the first paragraph of a documentation comment.
    pub fn synopsis(&mut self, docs: &Docs) -> Markup {
        match docs.synopsis() {
            Some(block) => self.block(block).into_iter().collect(),
            None => Vec::new(),
        }
    }

    fn blocks(&mut self, blocks: &[Block]) -> Markup {
        blocks.iter().filter_map(|block| self.block(block)).collect()
    }

    fn block(&mut self, block: &Block) -> Option<Node> {
        let node = match block {
            Block::Paragraph(inlines) => Node::Paragraph(self.inlines(inlines)),
            Block::Heading {
                level,
                label,
                text: content,
            } => Node::Heading {
                level: *level,
                id: Some(heading_anchor(label.as_deref(), content)),
                children: self.inlines(content),
            },
            Block::CodeBlock(code) => Node::Pre(code.clone()),
            Block::Verbatim(verbatim) => div("verbatim", vec![Node::Pre(verbatim.clone())]),
            Block::List { ordered, items } => Node::List {
                ordered: *ordered,
                items: items.iter().map(|item| self.blocks(item)).collect(),
            },
            Block::Tag(tag) => return self.tag(tag),
        };
        Some(node)
    }

    fn tag(&mut self, tag: &Tag) -> Option<Node> {
        let (name, content) = match tag {
            Tag::Open | Tag::Closed | Tag::Inline => return None,
            Tag::Author(author) => ("author", vec![text(author.clone())]),
            Tag::Since(version) => ("since", vec![text(version.clone())]),
            Tag::Version(version) => ("version", vec![text(version.clone())]),
            Tag::Deprecated(inlines) => ("deprecated", self.inlines(inlines)),
            Tag::Return(inlines) => ("returns", self.inlines(inlines)),
        };
        let mut paragraph = vec![Node::Bold(vec![text(name)])];
        if !content.is_empty() {
            paragraph.push(text(" "));
            paragraph.extend(content);
        }
        Some(div(
            format!("at-tag {name}"),
            vec![Node::Paragraph(paragraph)],
        ))
    }

    fn inlines(&mut self, inlines: &[Inline]) -> Markup {
        inlines.iter().map(|inline| self.inline(inline)).collect()
    }

    fn inline(&mut self, inline: &Inline) -> Node {
        match inline {
            Inline::Text(s) => text(s.clone()),
            Inline::Code(s) => Node::Code(vec![text(s.clone())]),
            Inline::Emphasis(children) => Node::Emphasis(self.inlines(children)),
            Inline::Bold(children) => Node::Bold(self.inlines(children)),
            Inline::Link { target, content } => Node::Link {
                href: target.clone(),
                children: if content.is_empty() {
                    vec![text(target.clone())]
                } else {
                    self.inlines(content)
                },
            },
            Inline::Reference { target, content } => {
                let children = if content.is_empty() {
                    vec![Node::Code(vec![text(target.name())])]
                } else {
                    self.inlines(content)
                };
                let from = self.tree.current();
                match self.resolver.href(&from, target, false) {
                    Ok(href) => Node::Link { href, children },
                    Err(err) => {
                        self.warn(format!("unresolved reference `{target}`: {err}"));
                        Node::Span {
                            class: "xref-unresolved".to_string(),
                            children,
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::plain_text;
    use crate::resolve::{PackageTable, UrlResolver};
    use crate::RenderConfig;
    use mldoc_interface::Identifier;

    #[test]
    fn test_heading_slug() {
        let text = vec![Inline::Text("Basic  Operations!".into())];
        assert_eq!(heading_anchor(None, &text), "basic-operations");
        assert_eq!(heading_anchor(Some("ops"), &text), "ops");
    }

    #[test]
    fn test_toc_entries() {
        let docs = Docs::text("Intro.").with(Block::Heading {
            level: 2,
            label: None,
            text: vec![Inline::Text("Iterators".into())],
        });
        let toc = toc_entries(&docs);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].anchor, "iterators");
        assert_eq!(toc[0].level, 2);
    }

    #[test]
    fn test_policy_tags_render_nothing() {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let config = RenderConfig::default();
        let mut gen = Generator::new(&resolver, &config);

        let docs = Docs::text("Body.")
            .with(Block::Tag(Tag::Inline))
            .with(Block::Tag(Tag::Since("1.2".into())));
        let out = gen.docs(&docs);
        assert_eq!(out.len(), 2);
        assert_eq!(plain_text(&out), "Body.since 1.2");
    }

    #[test]
    fn test_unresolved_reference_degrades() {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let config = RenderConfig::default();
        let mut gen = Generator::new(&resolver, &config);

        let docs = Docs(vec![Block::Paragraph(vec![Inline::Reference {
            target: Identifier::core_type("int"),
            content: vec![],
        }])]);
        let out = gen.docs(&docs);
        assert_eq!(plain_text(&out), "int");
        assert_eq!(gen.into_warnings().len(), 1);
    }
}
