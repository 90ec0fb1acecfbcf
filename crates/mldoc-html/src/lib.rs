//! Signature renderer and site-tree builder for mldoc.
//!
//! This crate turns resolved interface trees into a tree of documentation
//! pages. Each compilation unit becomes a page; every module, module type,
//! functor argument, class and class type that carries an expansion becomes
//! a child page, linked from the declaration that introduces it.
//!
//! # Overview
//!
//! - [`Renderer`] drives one root through the entity dispatcher
//! - [`SiteTree`] tracks the page stack while rendering
//! - [`LinkResolver`] maps identifiers and paths to relative links
//! - [`HtmlWriter`] serializes the resulting [`Page`] tree to disk
//!
//! Rendering never aborts on a missing link: the affected text is shown
//! without one and a [`Warning`] is recorded. Structural problems in the
//! input (see [`RenderError::InvariantViolation`]) abort the unit.
//!
//! # Example
//!
//! ```ignore
//! use camino::Utf8Path;
//! use mldoc_html::{HtmlWriter, PackageTable, RenderConfig, Renderer, UrlResolver};
//!
//! let packages = PackageTable::new().with("Foo", "foo");
//! let config = RenderConfig::default();
//! let resolver = UrlResolver::new(&packages, config.semantic_uris);
//! let unit = Renderer::new(&resolver, &packages, &config).render(&root)?;
//! HtmlWriter::new()?.write_site(&unit.page, Utf8Path::new("_html"))?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod html;
pub mod markup;
pub mod resolve;
pub mod tree;
pub mod url;
pub mod visibility;

mod class;
mod decl;
mod docs;
mod entity;
mod generator;
mod module_type;
mod type_expr;

pub use config::RenderConfig;
pub use error::{RenderError, RenderResult, ResolveError, Warning};
pub use html::{escape_html, to_html, HtmlWriter};
pub use markup::{Cell, Markup, Node, Row};
pub use module_type::substitution_base;
pub use resolve::{LinkResolver, PackageResolver, PackageTable, ResolvedAnchor, UrlResolver};
pub use tree::{Page, PageKind, PagePath, ScopeHandle, SiteTree, TocEntry};
pub use type_expr::{format_params, Delim};
pub use visibility::{CommentVisibility, Visibility};

use generator::Generator;
use mldoc_interface::Root;

/// The page tree and diagnostics of one rendered root.
#[derive(Debug)]
pub struct RenderedUnit {
    /// Package the root belongs to.
    pub package: String,
    /// Page of the root, with every expansion page below it.
    pub page: Page,
    /// Recoverable problems met while rendering.
    pub warnings: Vec<Warning>,
}

/// Renders roots into page trees.
pub struct Renderer<'a> {
    resolver: &'a dyn LinkResolver,
    packages: &'a dyn PackageResolver,
    config: &'a RenderConfig,
}

impl<'a> Renderer<'a> {
    /// Create a renderer.
    pub fn new(
        resolver: &'a dyn LinkResolver,
        packages: &'a dyn PackageResolver,
        config: &'a RenderConfig,
    ) -> Self {
        Self {
            resolver,
            packages,
            config,
        }
    }

    /// Render one root.
    ///
    /// Each call starts from an empty site tree and must leave it empty.
    pub fn render(&self, root: &Root) -> RenderResult<RenderedUnit> {
        let package = self.packages.package_name(root.id());
        tracing::info!(package = %package, root = %root.id(), "rendering");

        let mut gen = Generator::new(self.resolver, self.config);
        let page = gen.root(&package, root)?;
        if !gen.tree.is_empty() {
            return Err(RenderError::invariant(
                gen.tree.url(),
                format!("{} page scopes left open", gen.tree.depth()),
            ));
        }

        let warnings = gen.into_warnings();
        tracing::debug!(
            pages = page.count(),
            warnings = warnings.len(),
            "rendered {}",
            root.id()
        );
        Ok(RenderedUnit {
            package,
            page,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mldoc_interface::{CompilationUnit, DocPage, Docs, Identifier, Signature};

    #[test]
    fn test_render_empty_unit() {
        let packages = PackageTable::new().with("Foo", "foo");
        let config = RenderConfig::default();
        let resolver = UrlResolver::new(&packages, false);
        let root = Root::Unit(CompilationUnit::module(
            Identifier::root("Foo"),
            Docs::text("Top."),
            Signature::default(),
        ));

        let unit = Renderer::new(&resolver, &packages, &config)
            .render(&root)
            .unwrap();

        assert_eq!(unit.package, "foo");
        assert_eq!(unit.page.path.as_slice(), ["foo", "Foo"]);
        assert_eq!(unit.page.title, "Module Foo");
        assert_eq!(unit.page.file(), "foo/Foo/index.html");
        assert!(unit.warnings.is_empty());
    }

    #[test]
    fn test_render_doc_page() {
        let packages = PackageTable::new();
        let config = RenderConfig::default();
        let resolver = UrlResolver::new(&packages, false);
        let root = Root::Page(DocPage {
            name: Identifier::page("index"),
            content: Docs::text("Welcome."),
        });

        let unit = Renderer::new(&resolver, &packages, &config)
            .render(&root)
            .unwrap();

        assert_eq!(unit.package, "index");
        assert_eq!(unit.page.file(), "index/index/index.html");
        assert_eq!(markup::plain_text(&unit.page.body), "Welcome.");
    }
}
