//! Site-tree builder.
//!
//! [`SiteTree`] keeps the stack of pages currently being built. Entering a
//! node that owns an expansion pushes a scope; leaving it pops the scope.
//! The stack determines where the page lands in the site and is the origin
//! of every relative link emitted while the scope is open.

use crate::error::{RenderError, RenderResult};
use crate::markup::Markup;
use serde::Serialize;
use smallvec::SmallVec;

/// The URL segments of a page, from the package down.
pub type PagePath = SmallVec<[String; 8]>;

/// The kind of a page scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Package grouping.
    Package,
    /// Compilation unit.
    Unit,
    /// Standalone documentation page.
    Page,
    /// Module expansion.
    Module,
    /// Module type expansion.
    ModuleType,
    /// Class expansion.
    Class,
    /// Class type expansion.
    ClassType,
    /// Functor argument expansion.
    Argument,
}

impl PageKind {
    /// URL segment for a page of this kind.
    ///
    /// Non-module kinds carry a prefix so that a module and a module type
    /// (or class, or argument) of the same name never share a segment.
    /// Argument names are expected to already carry their position.
    #[must_use]
    pub fn segment(self, name: &str) -> String {
        match self {
            Self::Package | Self::Unit | Self::Page | Self::Module => name.to_string(),
            Self::ModuleType => format!("module-type-{name}"),
            Self::Class => format!("class-{name}"),
            Self::ClassType => format!("class-type-{name}"),
            Self::Argument => format!("argument-{name}"),
        }
    }

    /// Href from a parent page to its child page of this kind.
    #[must_use]
    pub fn child_href(self, name: &str, semantic_uris: bool) -> String {
        let mut href = self.segment(name);
        href.push('/');
        if !semantic_uris {
            href.push_str("index.html");
        }
        href
    }

    /// Title prefix of pages of this kind.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Package => "Package",
            Self::Unit | Self::Module => "Module",
            Self::Page => "Page",
            Self::ModuleType => "Module type",
            Self::Class => "Class",
            Self::ClassType => "Class type",
            Self::Argument => "Parameter",
        }
    }
}

/// A heading listed in a page's table of contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level.
    pub level: u8,
    /// Anchor of the heading.
    pub anchor: String,
    /// Heading text.
    pub text: String,
}

/// A generated page and the pages nested below it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// URL segment of this page.
    pub name: String,
    /// Kind of the page.
    pub kind: PageKind,
    /// Full URL path, package first.
    pub path: PagePath,
    /// Page title.
    pub title: String,
    /// Documentation leading the page.
    pub header: Markup,
    /// Table of contents.
    pub toc: Vec<TocEntry>,
    /// Page body.
    pub body: Markup,
    /// Child pages.
    pub children: Vec<Page>,
}

impl Page {
    /// Relative file path of this page inside the output directory.
    #[must_use]
    pub fn file(&self) -> String {
        let mut file = self.path.join("/");
        file.push_str("/index.html");
        file
    }

    /// Total number of pages in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Page::count).sum::<usize>()
    }

    /// Find a direct child by segment.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Page> {
        self.children.iter().find(|page| page.name == name)
    }
}

#[derive(Clone, Debug)]
struct Scope {
    kind: PageKind,
    segment: String,
}

/// Handle returned by [`SiteTree::enter`], consumed by [`SiteTree::leave`].
#[derive(Debug)]
#[must_use = "every entered scope must be left"]
pub struct ScopeHandle {
    depth: usize,
    segment: String,
}

/// The stack of pages under construction.
#[derive(Debug, Default)]
pub struct SiteTree {
    stack: SmallVec<[Scope; 8]>,
}

impl SiteTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a page scope.
    pub fn enter(&mut self, kind: PageKind, name: &str) -> ScopeHandle {
        let segment = kind.segment(name);
        self.stack.push(Scope {
            kind,
            segment: segment.clone(),
        });
        tracing::debug!(page = %self.url(), "enter");
        ScopeHandle {
            depth: self.stack.len(),
            segment,
        }
    }

    /// Close the innermost scope.
    ///
    /// Fails if the stack is empty or the handle does not belong to the
    /// innermost scope.
    pub fn leave(&mut self, handle: ScopeHandle) -> RenderResult<()> {
        let matches = self.stack.len() == handle.depth
            && self
                .stack
                .last()
                .map_or(false, |scope| scope.segment == handle.segment);
        if !matches {
            return Err(RenderError::invariant(
                self.url(),
                format!(
                    "unbalanced page scope `{}` at depth {} (stack depth {})",
                    handle.segment,
                    handle.depth,
                    self.stack.len()
                ),
            ));
        }
        tracing::debug!(page = %self.url(), "leave");
        self.stack.pop();
        Ok(())
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns true when no scope is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// URL segments of the current page.
    #[must_use]
    pub fn current(&self) -> PagePath {
        self.stack.iter().map(|scope| scope.segment.clone()).collect()
    }

    /// The current page as a `/`-separated string, for diagnostics.
    #[must_use]
    pub fn url(&self) -> String {
        self.current().join("/")
    }

    /// Package the current scope's content into a page.
    pub fn make(
        &self,
        title: String,
        header: Markup,
        toc: Vec<TocEntry>,
        body: Markup,
        children: Vec<Page>,
    ) -> RenderResult<Page> {
        let scope = self
            .stack
            .last()
            .ok_or_else(|| RenderError::invariant("site tree", "page made outside any scope"))?;
        Ok(Page {
            name: scope.segment.clone(),
            kind: scope.kind,
            path: self.current(),
            title,
            header,
            toc,
            body,
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_leave() {
        let mut tree = SiteTree::new();
        let pkg = tree.enter(PageKind::Package, "pkg");
        let unit = tree.enter(PageKind::Unit, "Foo");
        let mt = tree.enter(PageKind::ModuleType, "S");

        assert_eq!(tree.url(), "pkg/Foo/module-type-S");
        assert_eq!(tree.depth(), 3);

        tree.leave(mt).unwrap();
        tree.leave(unit).unwrap();
        tree.leave(pkg).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_leave_out_of_order_fails() {
        let mut tree = SiteTree::new();
        let outer = tree.enter(PageKind::Module, "A");
        let inner = tree.enter(PageKind::Module, "B");

        assert!(tree.leave(outer).is_err());
        tree.leave(inner).unwrap();
    }

    #[test]
    fn test_segments_are_kind_qualified() {
        assert_eq!(PageKind::Module.segment("M"), "M");
        assert_eq!(PageKind::ModuleType.segment("M"), "module-type-M");
        assert_eq!(PageKind::Class.segment("c"), "class-c");
        assert_eq!(PageKind::ClassType.segment("c"), "class-type-c");
        assert_eq!(PageKind::Argument.segment("2-X"), "argument-2-X");
    }

    #[test]
    fn test_make_outside_scope_fails() {
        let tree = SiteTree::new();
        assert!(tree
            .make(String::new(), vec![], vec![], vec![], vec![])
            .is_err());
    }

    #[test]
    fn test_child_href() {
        assert_eq!(PageKind::Class.child_href("c", false), "class-c/index.html");
        assert_eq!(PageKind::Module.child_href("M", true), "M/");
    }
}
