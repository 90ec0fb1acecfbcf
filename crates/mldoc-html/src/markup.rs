//! Markup nodes produced by the renderer.
//!
//! The renderer never writes bytes. It assembles ordered sequences of
//! [`Node`]s: keywords, text, links and a handful of block containers
//! (spec blocks, tables, collapsible details). The [`crate::html`] module
//! serializes them.

/// Non-breaking space, used where a type application must not wrap.
pub const NBSP: &str = "\u{a0}";

/// An ordered sequence of nodes.
pub type Markup = Vec<Node>;

/// One table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Anchor of the row, if it could be computed.
    pub id: Option<String>,
    /// Cells in order.
    pub cells: Vec<Cell>,
}

/// One table cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Space-separated CSS classes.
    pub class: String,
    /// Cell content.
    pub children: Markup,
}

/// A markup node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Plain text.
    Text(String),
    /// A language keyword.
    Keyword(String),
    /// A hyperlink.
    Link {
        /// Target, relative to the current page.
        href: String,
        /// Link content.
        children: Markup,
    },
    /// Self-link to an in-page anchor.
    Anchor(String),
    /// A classed inline span.
    Span {
        /// Space-separated CSS classes.
        class: String,
        /// Span content.
        children: Markup,
    },
    /// Inline code.
    Code(Markup),
    /// Emphasis.
    Emphasis(Markup),
    /// Bold.
    Bold(Markup),
    /// A paragraph.
    Paragraph(Markup),
    /// A heading.
    Heading {
        /// Heading level.
        level: u8,
        /// Anchor of the heading.
        id: Option<String>,
        /// Heading content.
        children: Markup,
    },
    /// Preformatted text.
    Pre(String),
    /// A list.
    List {
        /// Numbered or bulleted.
        ordered: bool,
        /// Item contents.
        items: Vec<Markup>,
    },
    /// A block container.
    Div {
        /// Space-separated CSS classes.
        class: String,
        /// Anchor of the block.
        id: Option<String>,
        /// Block content.
        children: Markup,
    },
    /// A table of anchored rows.
    Table {
        /// Space-separated CSS classes.
        class: String,
        /// Rows in order.
        rows: Vec<Row>,
    },
    /// A collapsible block.
    Details {
        /// Whether the block starts expanded.
        open: bool,
        /// Always-visible summary.
        summary: Markup,
        /// Collapsible content.
        body: Markup,
    },
}

/// Plain text node.
pub fn text(s: impl Into<String>) -> Node {
    Node::Text(s.into())
}

/// Keyword node.
pub fn keyword(s: impl Into<String>) -> Node {
    Node::Keyword(s.into())
}

/// The arrow of function types.
pub fn arrow() -> Node {
    Node::Span {
        class: "arrow".to_string(),
        children: vec![text("->")],
    }
}

/// A block container without anchor.
pub fn div(class: impl Into<String>, children: Markup) -> Node {
    Node::Div {
        class: class.into(),
        id: None,
        children,
    }
}

/// Wrap `inner` in parentheses.
pub fn parenthesize(inner: Markup) -> Markup {
    let mut out = Vec::with_capacity(inner.len() + 2);
    out.push(text("("));
    out.extend(inner);
    out.push(text(")"));
    out
}

/// Concatenate rendered parts, inserting `sep` between them.
pub fn join(parts: Vec<Markup>, sep: &[Node]) -> Markup {
    let mut out = Vec::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(sep);
        }
        out.extend(part);
    }
    out
}

/// A declaration block: anchored definition followed by its documentation.
pub fn spec(kind: &str, anchor: Option<String>, def: Markup, doc: Markup) -> Node {
    let mut head = Vec::with_capacity(def.len() + 1);
    if let Some(anchor) = &anchor {
        head.push(Node::Anchor(anchor.clone()));
    }
    head.extend(def);

    let mut children = vec![Node::Div {
        class: format!("spec {kind}"),
        id: anchor,
        children: head,
    }];
    if !doc.is_empty() {
        children.push(div("spec-doc", doc));
    }
    div("odoc-spec", children)
}

/// Accumulates a definition mixing inline code and block nodes.
///
/// Inline tokens are buffered and flushed into a single [`Node::Code`]
/// whenever a block (such as a constructor table) is pushed.
#[derive(Debug, Default)]
pub struct DefBuilder {
    nodes: Markup,
    pending: Markup,
}

impl DefBuilder {
    /// Start an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append inline tokens.
    pub fn inline(&mut self, tokens: impl IntoIterator<Item = Node>) {
        self.pending.extend(tokens);
    }

    /// Append a block node.
    pub fn block(&mut self, node: Node) {
        self.flush();
        self.nodes.push(node);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.nodes.push(Node::Code(std::mem::take(&mut self.pending)));
        }
    }

    /// Finish the definition.
    pub fn finish(mut self) -> Markup {
        self.flush();
        self.nodes
    }
}

/// The text content of a node sequence, ignoring structure.
///
/// Table rows are separated by a single space.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    out
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(s) | Node::Keyword(s) | Node::Pre(s) => out.push_str(s),
            Node::Anchor(_) => {}
            Node::Link { children, .. }
            | Node::Span { children, .. }
            | Node::Code(children)
            | Node::Emphasis(children)
            | Node::Bold(children)
            | Node::Paragraph(children)
            | Node::Heading { children, .. }
            | Node::Div { children, .. } => collect_text(children, out),
            Node::List { items, .. } => {
                for item in items {
                    collect_text(item, out);
                }
            }
            Node::Table { rows, .. } => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    for cell in &row.cells {
                        collect_text(&cell.children, out);
                    }
                }
            }
            Node::Details { summary, body, .. } => {
                collect_text(summary, out);
                collect_text(body, out);
            }
        }
    }
}

/// Visit every node depth-first.
pub fn walk<'a>(nodes: &'a [Node], f: &mut impl FnMut(&'a Node)) {
    for node in nodes {
        f(node);
        match node {
            Node::Link { children, .. }
            | Node::Span { children, .. }
            | Node::Code(children)
            | Node::Emphasis(children)
            | Node::Bold(children)
            | Node::Paragraph(children)
            | Node::Heading { children, .. }
            | Node::Div { children, .. } => walk(children, f),
            Node::List { items, .. } => {
                for item in items {
                    walk(item, f);
                }
            }
            Node::Table { rows, .. } => {
                for row in rows {
                    for cell in &row.cells {
                        walk(&cell.children, f);
                    }
                }
            }
            Node::Details { summary, body, .. } => {
                walk(summary, f);
                walk(body, f);
            }
            Node::Text(_) | Node::Keyword(_) | Node::Anchor(_) | Node::Pre(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_def_builder_flushes_around_blocks() {
        let mut def = DefBuilder::new();
        def.inline([keyword("type"), text(" t = ")]);
        def.block(Node::Table {
            class: "variant".into(),
            rows: vec![],
        });
        def.inline([text(" ]")]);

        let nodes = def.finish();
        assert_eq!(nodes.len(), 3);
        assert!(matches!(nodes[0], Node::Code(_)));
        assert!(matches!(nodes[1], Node::Table { .. }));
        assert!(matches!(nodes[2], Node::Code(_)));
    }

    #[test]
    fn test_plain_text() {
        let nodes = vec![Node::Code(vec![
            keyword("val"),
            text(" x : "),
            Node::Link {
                href: "#type-t".into(),
                children: vec![text("t")],
            },
        ])];
        assert_eq!(plain_text(&nodes), "val x : t");
    }

    #[test]
    fn test_join() {
        let parts = vec![vec![text("a")], vec![text("b")], vec![text("c")]];
        assert_eq!(plain_text(&join(parts, &[text(" * ")])), "a * b * c");
    }
}
