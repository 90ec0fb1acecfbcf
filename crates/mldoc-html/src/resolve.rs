//! Link and package resolution.
//!
//! The renderer never computes URLs itself. Every hyperlink goes through a
//! [`LinkResolver`], and every root identifier is mapped to its package
//! through a [`PackageResolver`]. [`UrlResolver`] is the default
//! implementation, following the directory layout of [`crate::url`].

use crate::error::ResolveError;
use crate::markup::{text, Markup, Node};
use crate::tree::PagePath;
use crate::url;
use mldoc_interface::{
    Fragment, Identifier, IdentifierKind, Path, PolymorphicVariantElement, ResolvedPath, TypeExpr,
};
use rustc_hash::FxHashMap;

/// Maps root identifiers to the package they are published in.
pub trait PackageResolver {
    /// The package name of the unit (or page) that `id` belongs to.
    fn package_name(&self, id: &Identifier) -> String;
}

/// Package lookup table. Roots not listed form a package of their own name.
#[derive(Clone, Debug, Default)]
pub struct PackageTable {
    packages: FxHashMap<String, String>,
}

impl PackageTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `root` as part of `package`.
    pub fn insert(&mut self, root: impl Into<String>, package: impl Into<String>) {
        self.packages.insert(root.into(), package.into());
    }

    /// Builder form of [`PackageTable::insert`].
    #[must_use]
    pub fn with(mut self, root: impl Into<String>, package: impl Into<String>) -> Self {
        self.insert(root, package);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PackageTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (root, package) in iter {
            table.insert(root, package);
        }
        table
    }
}

impl PackageResolver for PackageTable {
    fn package_name(&self, id: &Identifier) -> String {
        let root = id.root_of().unwrap_or(id);
        self.packages
            .get(root.name())
            .cloned()
            .unwrap_or_else(|| root.name().to_string())
    }
}

/// Anchor and CSS kind class of a declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAnchor {
    /// In-page anchor.
    pub anchor: String,
    /// CSS class of the declaration kind.
    pub kind: &'static str,
}

/// Turns identifiers, paths and fragments into links.
///
/// Implementors provide [`LinkResolver::href`] and
/// [`LinkResolver::resolve_identifier`]; the path and fragment renderers are
/// built on top of them.
pub trait LinkResolver {
    /// Href of `id`, relative to the page `from`.
    ///
    /// With `stop_before`, page-owning targets are reached through their
    /// parent page and anchor.
    fn href(&self, from: &PagePath, id: &Identifier, stop_before: bool)
        -> Result<String, ResolveError>;

    /// Anchor and kind class of a declaration.
    fn resolve_identifier(&self, id: &Identifier) -> Result<ResolvedAnchor, ResolveError>;

    /// Render a path, linking the parts that resolve.
    ///
    /// Predefined types and unresolved roots render as plain text.
    fn resolve_path(
        &self,
        from: &PagePath,
        path: &Path,
        stop_before: bool,
    ) -> Result<Markup, ResolveError> {
        match path {
            Path::Resolved(resolved) => {
                let id = resolved.identifier();
                if matches!(
                    id.kind,
                    IdentifierKind::CoreType | IdentifierKind::CoreException
                ) {
                    return Ok(vec![text(resolved.to_string())]);
                }
                let href = self.href(from, &id, stop_before)?;
                Ok(vec![Node::Link {
                    href,
                    children: vec![text(resolved.to_string())],
                }])
            }
            Path::Root(name) | Path::Forward(name) => Ok(vec![text(name.clone())]),
            Path::Dot(prefix, name) => {
                let mut out = self.resolve_path(from, prefix, true)?;
                out.push(text(format!(".{name}")));
                Ok(out)
            }
            Path::Apply(functor, argument) => {
                let mut out = self.resolve_path(from, functor, stop_before)?;
                out.push(text("("));
                out.extend(self.resolve_path(from, argument, false)?);
                out.push(text(")"));
                Ok(out)
            }
        }
    }

    /// Render a fragment relative to the signature `base`.
    fn resolve_fragment(
        &self,
        from: &PagePath,
        base: &Identifier,
        fragment: &Fragment,
    ) -> Result<Markup, ResolveError> {
        match fragment {
            Fragment::Resolved(resolved) => {
                let href = self.href(from, &resolved.identifier(base), true)?;
                Ok(vec![Node::Link {
                    href,
                    children: vec![text(resolved.to_string())],
                }])
            }
            Fragment::Root => Ok(Vec::new()),
            Fragment::Dot(..) => Ok(vec![text(fragment.to_string())]),
        }
    }

    /// Anchor of one row of a polymorphic variant declared as type `type_id`.
    ///
    /// Constructor rows are anchored by their tag. Inherited rows are
    /// anchored by the last component of the inherited type's path when it
    /// resolved; other rows have no anchor.
    fn resolve_variant_row(
        &self,
        type_id: &Identifier,
        element: &PolymorphicVariantElement,
    ) -> Result<String, ResolveError> {
        let type_anchor = self.resolve_identifier(type_id)?.anchor;
        match element {
            PolymorphicVariantElement::Constructor { name, .. } => {
                Ok(format!("{type_anchor}.{name}"))
            }
            PolymorphicVariantElement::Type(TypeExpr::Constr(Path::Resolved(path), _)) => {
                let name = match path {
                    ResolvedPath::Identifier(id) => id.name().to_string(),
                    ResolvedPath::Dot { name, .. } => name.clone(),
                    ResolvedPath::Apply { .. } => {
                        return Err(ResolveError::Unresolved(path.to_string()))
                    }
                };
                Ok(format!("{type_anchor}.{name}"))
            }
            PolymorphicVariantElement::Type(other) => {
                Err(ResolveError::Unresolved(format!("{other:?}")))
            }
        }
    }
}

/// Resolver producing relative links in the [`crate::url`] layout.
pub struct UrlResolver<'a> {
    packages: &'a dyn PackageResolver,
    semantic_uris: bool,
}

impl<'a> UrlResolver<'a> {
    /// Create a resolver over a package table.
    #[must_use]
    pub fn new(packages: &'a dyn PackageResolver, semantic_uris: bool) -> Self {
        Self {
            packages,
            semantic_uris,
        }
    }
}

impl LinkResolver for UrlResolver<'_> {
    fn href(
        &self,
        from: &PagePath,
        id: &Identifier,
        stop_before: bool,
    ) -> Result<String, ResolveError> {
        let target = url::from_identifier(id, stop_before, self.packages)?;
        Ok(url::relative_href(from, &target, self.semantic_uris))
    }

    fn resolve_identifier(&self, id: &Identifier) -> Result<ResolvedAnchor, ResolveError> {
        Ok(ResolvedAnchor {
            anchor: url::anchor(id)?,
            kind: url::kind_class(id.kind),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::plain_text;
    use mldoc_interface::ResolvedFragment;

    fn here() -> PagePath {
        ["A", "A"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_package_table_falls_back_to_root_name() {
        let table = PackageTable::new().with("Stdlib", "stdlib");
        let id = Identifier::root("Stdlib").module("List");

        assert_eq!(table.package_name(&id), "stdlib");
        assert_eq!(table.package_name(&Identifier::root("Foo")), "Foo");
    }

    #[test]
    fn test_resolved_path_links_whole_text() {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let t = Identifier::root("A").module("M").type_("t");
        let path = Path::Resolved(
            ResolvedPath::Identifier(Identifier::root("A").module("M"))
                .dot(IdentifierKind::Type, "t"),
        );

        let out = resolver.resolve_path(&here(), &path, false).unwrap();
        assert_eq!(plain_text(&out), "M.t");
        match &out[0] {
            Node::Link { href, .. } => assert_eq!(href, "M/index.html#type-t"),
            other => panic!("expected a link, got {other:?}"),
        }
        assert_eq!(resolver.resolve_identifier(&t).unwrap().kind, "type");
    }

    #[test]
    fn test_core_type_renders_as_text() {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let out = resolver
            .resolve_path(&here(), &Path::resolved(Identifier::core_type("int")), false)
            .unwrap();
        assert_eq!(out, vec![text("int")]);
    }

    #[test]
    fn test_unresolved_dot_keeps_prefix_link() {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let path = Path::resolved(Identifier::root("A").module("M")).dot("u");

        let out = resolver.resolve_path(&here(), &path, false).unwrap();
        assert_eq!(plain_text(&out), "M.u");
        assert!(matches!(&out[0], Node::Link { href, .. } if href == "#module-M"));
    }

    #[test]
    fn test_fragment_links_through_base() {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let base = Identifier::root("A").module_type("S");
        let frag = Fragment::Resolved(ResolvedFragment::new(IdentifierKind::Type, "t"));

        let out = resolver.resolve_fragment(&here(), &base, &frag).unwrap();
        assert!(matches!(
            &out[0],
            Node::Link { href, .. } if href == "module-type-S/index.html#type-t"
        ));
    }

    #[test]
    fn test_variant_rows() {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let t = Identifier::root("A").type_("t");

        let tag = PolymorphicVariantElement::Constructor {
            name: "Red".into(),
            arguments: vec![],
            doc: Default::default(),
        };
        assert_eq!(resolver.resolve_variant_row(&t, &tag).unwrap(), "type-t.Red");

        let inherited = PolymorphicVariantElement::Type(TypeExpr::constr(
            Path::resolved(Identifier::root("A").type_("u")),
            vec![],
        ));
        assert_eq!(
            resolver.resolve_variant_row(&t, &inherited).unwrap(),
            "type-t.u"
        );

        let unknown = PolymorphicVariantElement::Type(TypeExpr::var("a"));
        assert!(resolver.resolve_variant_row(&t, &unknown).is_err());
    }
}
