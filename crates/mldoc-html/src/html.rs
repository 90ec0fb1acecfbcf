//! HTML serialization and site writing.

use crate::error::RenderResult;
use crate::markup::{Node, Row};
use crate::tree::Page;
use camino::Utf8Path;
use serde::Serialize;
use std::fmt::Write as _;
use tera::{Context, Tera};

const PAGE_TEMPLATE: &str = include_str!("../templates/page.html");
const STYLESHEET: &str = include_str!("../assets/odoc.css");

/// Escape for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Serialize markup to HTML.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes);
    out
}

fn write_nodes(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        write_node(out, node);
    }
}

fn open_tag(out: &mut String, tag: &str, class: Option<&str>, id: Option<&str>) {
    out.push('<');
    out.push_str(tag);
    if let Some(class) = class {
        let _ = write!(out, " class=\"{}\"", escape_html(class));
    }
    if let Some(id) = id {
        let _ = write!(out, " id=\"{}\"", escape_html(id));
    }
    out.push('>');
}

fn wrapped(out: &mut String, tag: &str, class: Option<&str>, id: Option<&str>, children: &[Node]) {
    open_tag(out, tag, class, id);
    write_nodes(out, children);
    let _ = write!(out, "</{tag}>");
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(s) => out.push_str(&escape_html(s)),
        Node::Keyword(s) => {
            let _ = write!(out, "<span class=\"keyword\">{}</span>", escape_html(s));
        }
        Node::Link { href, children } => {
            let _ = write!(out, "<a href=\"{}\">", escape_html(href));
            write_nodes(out, children);
            out.push_str("</a>");
        }
        Node::Anchor(anchor) => {
            let _ = write!(out, "<a href=\"#{}\" class=\"anchor\"></a>", escape_html(anchor));
        }
        Node::Span { class, children } => wrapped(out, "span", Some(class.as_str()), None, children),
        Node::Code(children) => wrapped(out, "code", None, None, children),
        Node::Emphasis(children) => wrapped(out, "em", None, None, children),
        Node::Bold(children) => wrapped(out, "b", None, None, children),
        Node::Paragraph(children) => wrapped(out, "p", None, None, children),
        Node::Heading { level, id, children } => {
            let tag = format!("h{}", (*level).clamp(1, 6));
            wrapped(out, &tag, None, id.as_deref(), children);
        }
        Node::Pre(s) => {
            let _ = write!(out, "<pre>{}</pre>", escape_html(s));
        }
        Node::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let _ = write!(out, "<{tag}>");
            for item in items {
                wrapped(out, "li", None, None, item);
            }
            let _ = write!(out, "</{tag}>");
        }
        Node::Div { class, id, children } => {
            wrapped(out, "div", Some(class.as_str()), id.as_deref(), children);
        }
        Node::Table { class, rows } => {
            open_tag(out, "table", Some(class.as_str()), None);
            for row in rows {
                write_row(out, row);
            }
            out.push_str("</table>");
        }
        Node::Details {
            open,
            summary,
            body,
        } => {
            out.push_str(if *open { "<details open>" } else { "<details>" });
            wrapped(out, "summary", None, None, summary);
            write_nodes(out, body);
            out.push_str("</details>");
        }
    }
}

fn write_row(out: &mut String, row: &Row) {
    let class = row.id.as_ref().map(|_| "anchored");
    open_tag(out, "tr", class, row.id.as_deref());
    for cell in &row.cells {
        wrapped(out, "td", Some(cell.class.as_str()), None, &cell.children);
    }
    out.push_str("</tr>");
}

#[derive(Serialize)]
struct Crumb {
    name: String,
    href: String,
}

/// Writes page trees to disk through the page template.
pub struct HtmlWriter {
    tera: Tera,
}

impl HtmlWriter {
    /// Compile the page template.
    pub fn new() -> RenderResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template("page.html", PAGE_TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Render one page (without its children) to a full HTML document.
    pub fn render_page(&self, page: &Page) -> RenderResult<String> {
        let depth = page.path.len();
        // Crumbs for every ancestor below the package directory.
        let breadcrumbs: Vec<Crumb> = page
            .path
            .iter()
            .enumerate()
            .take(depth.saturating_sub(1))
            .skip(1)
            .map(|(i, segment)| Crumb {
                name: segment.clone(),
                href: format!("{}index.html", "../".repeat(depth - 1 - i)),
            })
            .collect();

        let mut context = Context::new();
        context.insert("title", &page.title);
        context.insert("name", &page.name);
        context.insert("root", &"../".repeat(depth));
        context.insert("breadcrumbs", &breadcrumbs);
        context.insert("header", &to_html(&page.header));
        context.insert("toc", &page.toc);
        context.insert("body", &to_html(&page.body));

        Ok(self.tera.render("page.html", &context)?)
    }

    /// Write `page` and all pages below it under `out_dir`, plus the
    /// shared stylesheet. Returns the number of pages written.
    pub fn write_site(&self, page: &Page, out_dir: &Utf8Path) -> RenderResult<usize> {
        std::fs::create_dir_all(out_dir)?;
        std::fs::write(out_dir.join("odoc.css"), STYLESHEET)?;
        self.write_tree(page, out_dir)
    }

    fn write_tree(&self, page: &Page, out_dir: &Utf8Path) -> RenderResult<usize> {
        let file = out_dir.join(page.file());
        if let Some(dir) = file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&file, self.render_page(page)?)?;
        tracing::debug!(file = %file, "wrote page");

        let mut written = 1;
        for child in &page.children {
            written += self.write_tree(child, out_dir)?;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{keyword, spec, text, Cell};
    use crate::tree::{PageKind, PagePath, TocEntry};
    use camino::Utf8PathBuf;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && \"c\""), "a &lt; b &amp;&amp; &quot;c&quot;");
    }

    #[test]
    fn test_spec_block() {
        let node = spec(
            "value",
            Some("val-x".into()),
            vec![Node::Code(vec![keyword("val"), text(" x : 'a")])],
            vec![],
        );
        assert_eq!(
            to_html(&[node]),
            "<div class=\"odoc-spec\"><div class=\"spec value\" id=\"val-x\">\
             <a href=\"#val-x\" class=\"anchor\"></a>\
             <code><span class=\"keyword\">val</span> x : &#x27;a</code></div></div>"
        );
    }

    #[test]
    fn test_rows_without_anchor_are_plain() {
        let table = Node::Table {
            class: "variant".into(),
            rows: vec![Row {
                id: None,
                cells: vec![Cell {
                    class: "def constructor".into(),
                    children: vec![text("| A")],
                }],
            }],
        };
        assert_eq!(
            to_html(&[table]),
            "<table class=\"variant\"><tr><td class=\"def constructor\">| A</td></tr></table>"
        );
    }

    fn page(path: &[&str], children: Vec<Page>) -> Page {
        let path: PagePath = path.iter().map(|s| s.to_string()).collect();
        Page {
            name: path.last().cloned().unwrap_or_default(),
            kind: PageKind::Module,
            path,
            title: "Module A".into(),
            header: vec![],
            toc: vec![TocEntry {
                level: 2,
                anchor: "intro".into(),
                text: "Intro".into(),
            }],
            body: vec![text("<body>")],
            children,
        }
    }

    #[test]
    fn test_write_site() {
        let dir = tempfile::tempdir().unwrap();
        let out = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let root = page(&["pkg", "A"], vec![page(&["pkg", "A", "M"], vec![])]);

        let writer = HtmlWriter::new().unwrap();
        assert_eq!(writer.write_site(&root, &out).unwrap(), 2);

        let html = std::fs::read_to_string(out.join("pkg/A/M/index.html")).unwrap();
        assert!(html.contains("&lt;body&gt;"));
        assert!(html.contains("href=\"#intro\""));
        assert!(html.contains("href=\"../../../odoc.css\""));
        assert!(html.contains("<a href=\"../index.html\">A</a>"));
        assert!(out.join("odoc.css").exists());
    }
}
