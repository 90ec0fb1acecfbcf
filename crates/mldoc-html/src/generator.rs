//! Rendering context shared by every formatter.
//!
//! A [`Generator`] owns the site-tree stack and the diagnostics of one
//! render. The formatters for types, declarations, module types, classes,
//! documentation and signatures are `impl Generator` blocks in their own
//! modules.

use crate::config::RenderConfig;
use crate::error::{RenderResult, Warning};
use crate::markup::{text, Markup, Node};
use crate::resolve::LinkResolver;
use crate::tree::{Page, PageKind, SiteTree, TocEntry};
use mldoc_interface::{Fragment, Identifier, Path};

/// Output of rendering a signature (or any other page body).
#[derive(Debug, Default)]
pub(crate) struct Rendered {
    /// Body nodes for the current page.
    pub body: Markup,
    /// Headings found in documentation comments.
    pub toc: Vec<TocEntry>,
    /// Child pages created while rendering.
    pub pages: Vec<Page>,
}

impl Rendered {
    pub fn push(&mut self, node: Node) {
        self.body.push(node);
    }

    /// Splice `other` into `self`, as if rendered in place.
    pub fn append(&mut self, other: Rendered) {
        self.body.extend(other.body);
        self.toc.extend(other.toc);
        self.pages.extend(other.pages);
    }
}

/// Renderer state for one root.
pub(crate) struct Generator<'a> {
    pub(crate) resolver: &'a dyn LinkResolver,
    pub(crate) config: &'a RenderConfig,
    pub(crate) tree: SiteTree,
    warnings: Vec<Warning>,
}

impl<'a> Generator<'a> {
    pub fn new(resolver: &'a dyn LinkResolver, config: &'a RenderConfig) -> Self {
        Self {
            resolver,
            config,
            tree: SiteTree::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a recoverable problem on the current page.
    pub fn warn(&mut self, message: String) {
        let page = self.tree.url();
        tracing::warn!(page = %page, "{message}");
        self.warnings.push(Warning { page, message });
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// Run `f` inside a new page scope.
    ///
    /// The scope is left on every exit path, including when `f` fails.
    pub fn in_page<T>(
        &mut self,
        kind: PageKind,
        name: &str,
        f: impl FnOnce(&mut Self) -> RenderResult<T>,
    ) -> RenderResult<T> {
        let handle = self.tree.enter(kind, name);
        let result = f(self);
        let left = self.tree.leave(handle);
        let value = result?;
        left?;
        Ok(value)
    }

    /// Link to a child page about to be produced under the current page.
    pub fn child_link(&self, kind: PageKind, name: &str, label: &str) -> Node {
        Node::Link {
            href: kind.child_href(name, self.config.semantic_uris),
            children: vec![text(label)],
        }
    }

    /// Render a path, degrading to its plain text when it cannot be linked.
    pub fn path(&mut self, path: &Path, stop_before: bool) -> Markup {
        let from = self.tree.current();
        match self.resolver.resolve_path(&from, path, stop_before) {
            Ok(markup) => markup,
            Err(err) => {
                self.warn(format!("cannot link path `{path}`: {err}"));
                vec![text(path.to_string())]
            }
        }
    }

    /// Render a fragment relative to `base`, degrading to plain text.
    pub fn fragment(&mut self, base: &Identifier, fragment: &Fragment) -> Markup {
        let from = self.tree.current();
        match self.resolver.resolve_fragment(&from, base, fragment) {
            Ok(markup) => markup,
            Err(err) => {
                self.warn(format!("cannot link fragment `{fragment}`: {err}"));
                vec![text(fragment.to_string())]
            }
        }
    }

    /// Anchor of a declaration head, if it has one.
    pub fn anchor(&mut self, id: &Identifier) -> Option<String> {
        match self.resolver.resolve_identifier(id) {
            Ok(resolved) => Some(resolved.anchor),
            Err(err) => {
                self.warn(format!("no anchor for `{id}`: {err}"));
                None
            }
        }
    }
}
