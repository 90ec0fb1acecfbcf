//! URL scheme of generated sites.
//!
//! Every page-owning declaration (unit, module, module type, functor
//! argument, class, class type) maps to a directory; every other declaration
//! maps to an anchor on the page of its nearest page-owning ancestor.

use crate::error::ResolveError;
use crate::resolve::PackageResolver;
use crate::tree::{PageKind, PagePath};
use mldoc_interface::{Identifier, IdentifierKind};

/// Location of a declaration in the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Url {
    /// Page holding the declaration.
    pub page: PagePath,
    /// Anchor on that page, if the declaration is not the page itself.
    pub anchor: Option<String>,
    /// CSS class describing the declaration kind.
    pub kind: &'static str,
}

/// CSS class for declarations of the given kind.
#[must_use]
pub const fn kind_class(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Root | IdentifierKind::Module => "module",
        IdentifierKind::Page => "page",
        IdentifierKind::Argument { .. } => "argument",
        IdentifierKind::ModuleType => "module-type",
        IdentifierKind::Type | IdentifierKind::CoreType => "type",
        IdentifierKind::Constructor => "constructor",
        IdentifierKind::Field => "field",
        IdentifierKind::Extension => "extension",
        IdentifierKind::Exception | IdentifierKind::CoreException => "exception",
        IdentifierKind::Value => "value",
        IdentifierKind::Class => "class",
        IdentifierKind::ClassType => "class-type",
        IdentifierKind::Method => "method",
        IdentifierKind::InstanceVariable => "instance-variable",
    }
}

/// Page kind and page name for a page-owning identifier.
fn page_scope(id: &Identifier) -> Option<(PageKind, String)> {
    let name = id.name().to_string();
    let scope = match id.kind {
        IdentifierKind::Root => (PageKind::Unit, name),
        IdentifierKind::Page => (PageKind::Page, name),
        IdentifierKind::Module => (PageKind::Module, name),
        IdentifierKind::ModuleType => (PageKind::ModuleType, name),
        IdentifierKind::Argument { position } => (PageKind::Argument, format!("{position}-{name}")),
        IdentifierKind::Class => (PageKind::Class, name),
        IdentifierKind::ClassType => (PageKind::ClassType, name),
        _ => return None,
    };
    Some(scope)
}

/// The in-page anchor of a declaration.
pub fn anchor(id: &Identifier) -> Result<String, ResolveError> {
    let name = id.name();
    let anchor = match id.kind {
        IdentifierKind::Module => format!("module-{name}"),
        IdentifierKind::ModuleType => format!("module-type-{name}"),
        IdentifierKind::Argument { position } => format!("argument-{position}-{name}"),
        IdentifierKind::Type => format!("type-{name}"),
        IdentifierKind::Constructor | IdentifierKind::Field => {
            let parent = id
                .parent()
                .ok_or_else(|| ResolveError::no_anchor(id.kind, name))?;
            format!("{}.{name}", anchor(parent)?)
        }
        IdentifierKind::Extension => format!("extension-{name}"),
        IdentifierKind::Exception => format!("exception-{name}"),
        IdentifierKind::Value => format!("val-{name}"),
        IdentifierKind::Class => format!("class-{name}"),
        IdentifierKind::ClassType => format!("class-type-{name}"),
        IdentifierKind::Method => format!("method-{name}"),
        IdentifierKind::InstanceVariable => format!("val-{name}"),
        IdentifierKind::Root
        | IdentifierKind::Page
        | IdentifierKind::CoreType
        | IdentifierKind::CoreException => return Err(ResolveError::no_anchor(id.kind, name)),
    };
    Ok(anchor)
}

/// URL segments of the page owned by `id`.
pub fn page(id: &Identifier, packages: &dyn PackageResolver) -> Result<PagePath, ResolveError> {
    let (kind, name) =
        page_scope(id).ok_or_else(|| ResolveError::no_page(id.kind, id.name()))?;
    let mut path = match (id.kind, id.parent()) {
        (IdentifierKind::Root | IdentifierKind::Page, _) => {
            let mut path = PagePath::new();
            path.push(packages.package_name(id));
            path
        }
        (_, Some(parent)) => page(parent, packages)?,
        (_, None) => return Err(ResolveError::no_page(id.kind, id.name())),
    };
    path.push(kind.segment(&name));
    Ok(path)
}

/// Locate a declaration.
///
/// With `stop_before`, a page-owning declaration is located through its
/// parent page and anchor rather than its own page.
pub fn from_identifier(
    id: &Identifier,
    stop_before: bool,
    packages: &dyn PackageResolver,
) -> Result<Url, ResolveError> {
    let kind = kind_class(id.kind);
    match id.kind {
        IdentifierKind::Root | IdentifierKind::Page => Ok(Url {
            page: page(id, packages)?,
            anchor: None,
            kind,
        }),
        IdentifierKind::CoreType | IdentifierKind::CoreException => {
            Err(ResolveError::no_page(id.kind, id.name()))
        }
        k if k.owns_page() && !stop_before => Ok(Url {
            page: page(id, packages)?,
            anchor: None,
            kind,
        }),
        _ => {
            let mut container = id.parent();
            while let Some(candidate) = container {
                if candidate.kind.owns_page() {
                    break;
                }
                container = candidate.parent();
            }
            let container = container.ok_or_else(|| ResolveError::no_page(id.kind, id.name()))?;
            Ok(Url {
                page: page(container, packages)?,
                anchor: Some(anchor(id)?),
                kind,
            })
        }
    }
}

/// Href of `to` relative to the page `from`.
#[must_use]
pub fn relative_href(from: &[String], to: &Url, semantic_uris: bool) -> String {
    if from == to.page.as_slice() {
        return match &to.anchor {
            Some(anchor) => format!("#{anchor}"),
            None if semantic_uris => "./".to_string(),
            None => "index.html".to_string(),
        };
    }

    let common = from
        .iter()
        .zip(to.page.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut href = String::new();
    for _ in common..from.len() {
        href.push_str("../");
    }
    for segment in &to.page[common..] {
        href.push_str(segment);
        href.push('/');
    }
    if !semantic_uris {
        href.push_str("index.html");
    }
    if let Some(anchor) = &to.anchor {
        href.push('#');
        href.push_str(anchor);
    }
    href
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::PackageTable;

    fn path(segments: &[&str]) -> PagePath {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_anchor_of_constructor_and_field() {
        let t = Identifier::root("A").type_("t");
        assert_eq!(anchor(&t.constructor("C")).unwrap(), "type-t.C");
        assert_eq!(anchor(&t.constructor("C").field("f")).unwrap(), "type-t.C.f");
        assert!(anchor(&Identifier::root("A")).is_err());
    }

    #[test]
    fn test_page_of_nested_declarations() {
        let packages = PackageTable::default().with("A", "pkg");
        let arg = Identifier::root("A").module("F").argument(1, "X");

        assert_eq!(
            page(&arg, &packages).unwrap(),
            path(&["pkg", "A", "F", "argument-1-X"])
        );
        assert!(page(&Identifier::root("A").value("x"), &packages).is_err());
    }

    #[test]
    fn test_stop_before_links_through_parent() {
        let packages = PackageTable::default();
        let m = Identifier::root("A").module("M");

        let own = from_identifier(&m, false, &packages).unwrap();
        assert_eq!(own.page, path(&["A", "A", "M"]));
        assert_eq!(own.anchor, None);

        let parent = from_identifier(&m, true, &packages).unwrap();
        assert_eq!(parent.page, path(&["A", "A"]));
        assert_eq!(parent.anchor.as_deref(), Some("module-M"));
    }

    #[test]
    fn test_core_types_have_no_url() {
        let packages = PackageTable::default();
        assert!(from_identifier(&Identifier::core_type("int"), false, &packages).is_err());
    }

    #[test]
    fn test_relative_href() {
        let to = Url {
            page: path(&["pkg", "A", "M"]),
            anchor: Some("type-t".into()),
            kind: "type",
        };

        assert_eq!(
            relative_href(&path(&["pkg", "A"]), &to, false),
            "M/index.html#type-t"
        );
        assert_eq!(
            relative_href(&path(&["pkg", "A", "N"]), &to, false),
            "../M/index.html#type-t"
        );
        assert_eq!(relative_href(&path(&["pkg", "A", "M"]), &to, false), "#type-t");
        assert_eq!(relative_href(&path(&["pkg", "B"]), &to, true), "../A/M/#type-t");
    }
}
