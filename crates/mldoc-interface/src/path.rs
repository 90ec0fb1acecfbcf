//! Paths and fragments.
//!
//! A [`Path`] is a qualified reference written in an interface, such as
//! `List.t` or `F(X).t`. When the extraction step managed to resolve it, the
//! path carries the [`Identifier`] it points to. A [`Fragment`] is a
//! reference relative to an enclosing signature, used on the left-hand side
//! of `with` substitutions and package constraints.

use crate::ident::{Identifier, IdentifierKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A path whose target is known.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedPath {
    /// Direct reference to a declaration, displayed by its bare name.
    Identifier(Identifier),
    /// A component projected out of a resolved module path.
    Dot {
        /// The module the component is taken from.
        parent: Box<ResolvedPath>,
        /// Kind of the projected component.
        kind: IdentifierKind,
        /// Name of the projected component.
        name: String,
    },
    /// Functor application; resolves to the functor's own declaration.
    Apply {
        /// The applied functor.
        functor: Box<ResolvedPath>,
        /// The argument module.
        argument: Box<Path>,
    },
}

impl ResolvedPath {
    /// Project a named component out of this path.
    #[must_use]
    pub fn dot(self, kind: IdentifierKind, name: impl Into<String>) -> Self {
        Self::Dot {
            parent: Box::new(self),
            kind,
            name: name.into(),
        }
    }

    /// The identifier this path points to.
    #[must_use]
    pub fn identifier(&self) -> Identifier {
        match self {
            Self::Identifier(id) => id.clone(),
            Self::Dot { parent, kind, name } => parent.identifier().child(*kind, name.clone()),
            Self::Apply { functor, .. } => functor.identifier(),
        }
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(id) => f.write_str(id.name()),
            Self::Dot { parent, name, .. } => write!(f, "{parent}.{name}"),
            Self::Apply { functor, argument } => write!(f, "{functor}({argument})"),
        }
    }
}

/// A qualified reference, resolved or not.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Path {
    /// A path with a known target.
    Resolved(ResolvedPath),
    /// An unresolved root module name.
    Root(String),
    /// A forward reference to a module not yet declared.
    Forward(String),
    /// Projection out of a (possibly partially resolved) module path.
    Dot(Box<Path>, String),
    /// Unresolved functor application.
    Apply(Box<Path>, Box<Path>),
}

impl Path {
    /// A resolved path pointing straight at `id`.
    #[must_use]
    pub fn resolved(id: Identifier) -> Self {
        Self::Resolved(ResolvedPath::Identifier(id))
    }

    /// An unresolved root.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self::Root(name.into())
    }

    /// Unresolved projection `self.name`.
    #[must_use]
    pub fn dot(self, name: impl Into<String>) -> Self {
        Self::Dot(Box::new(self), name.into())
    }

    /// The resolved target, when there is one.
    #[must_use]
    pub fn as_resolved(&self) -> Option<&ResolvedPath> {
        match self {
            Self::Resolved(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(r) => write!(f, "{r}"),
            Self::Root(name) | Self::Forward(name) => f.write_str(name),
            Self::Dot(parent, name) => write!(f, "{parent}.{name}"),
            Self::Apply(functor, argument) => write!(f, "{functor}({argument})"),
        }
    }
}

/// A fragment whose target inside the base signature is known.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedFragment {
    /// Kind of the designated component.
    pub kind: IdentifierKind,
    /// Name of the designated component.
    pub name: String,
    /// Enclosing module fragment; `None` means the base signature itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<ResolvedFragment>>,
}

impl ResolvedFragment {
    /// A component directly inside the base signature.
    #[must_use]
    pub fn new(kind: IdentifierKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            parent: None,
        }
    }

    /// A component nested inside this (module) fragment.
    #[must_use]
    pub fn child(self, kind: IdentifierKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            parent: Some(Box::new(self)),
        }
    }

    /// The identifier designated by this fragment relative to `base`.
    #[must_use]
    pub fn identifier(&self, base: &Identifier) -> Identifier {
        let parent = match &self.parent {
            Some(parent) => parent.identifier(base),
            None => base.clone(),
        };
        parent.child(self.kind, self.name.clone())
    }
}

impl fmt::Display for ResolvedFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{parent}.")?;
        }
        f.write_str(&self.name)
    }
}

/// A reference relative to an enclosing signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    /// A fragment with a known target.
    Resolved(ResolvedFragment),
    /// The enclosing signature itself.
    Root,
    /// Unresolved projection.
    Dot(Box<Fragment>, String),
}

impl Fragment {
    /// Unresolved fragment `name` directly under the base signature.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Dot(Box::new(Self::Root), name.into())
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(r) => write!(f, "{r}"),
            Self::Root => Ok(()),
            Self::Dot(parent, name) => match parent.as_ref() {
                Self::Root => f.write_str(name),
                parent => write!(f, "{parent}.{name}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_path_text() {
        let list = Identifier::root("Stdlib").module("List");
        let path = ResolvedPath::Identifier(list.clone()).dot(IdentifierKind::Type, "t");

        assert_eq!(path.to_string(), "List.t");
        assert_eq!(path.identifier(), list.type_("t"));
    }

    #[test]
    fn test_apply_resolves_to_functor() {
        let functor = Identifier::root("Stdlib").module("Map").module("Make");
        let path = ResolvedPath::Apply {
            functor: Box::new(ResolvedPath::Identifier(functor.clone())),
            argument: Box::new(Path::root("String")),
        };

        assert_eq!(path.to_string(), "Make(String)");
        assert_eq!(path.identifier(), functor);
    }

    #[test]
    fn test_fragment_text() {
        let frag = Fragment::Dot(Box::new(Fragment::name("M")), "t".into());
        assert_eq!(frag.to_string(), "M.t");

        let base = Identifier::root("A").module_type("S");
        let resolved = ResolvedFragment::new(IdentifierKind::Module, "M").child(IdentifierKind::Type, "t");
        assert_eq!(resolved.to_string(), "M.t");
        assert_eq!(resolved.identifier(&base), base.module("M").type_("t"));
    }
}
