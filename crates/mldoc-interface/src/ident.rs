//! Identifiers for declared entities.
//!
//! An [`Identifier`] names one declaration and remembers the chain of
//! enclosing declarations it lives in. Identifiers are produced by the
//! extraction step and never change afterwards; the renderer only reads them
//! to compute page locations, anchors and display names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of entity an identifier refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// A compilation unit root.
    Root,
    /// A standalone documentation page.
    Page,
    /// A module.
    Module,
    /// A functor argument, with its 1-based position.
    Argument {
        /// Position of the argument in the functor's parameter list.
        position: usize,
    },
    /// A module type.
    ModuleType,
    /// A type declaration.
    Type,
    /// A predefined type such as `int`.
    CoreType,
    /// A variant constructor.
    Constructor,
    /// A record field.
    Field,
    /// An extension constructor.
    Extension,
    /// An exception.
    Exception,
    /// A predefined exception such as `Not_found`.
    CoreException,
    /// A value or external.
    Value,
    /// A class.
    Class,
    /// A class type.
    ClassType,
    /// A method of a class or class type.
    Method,
    /// An instance variable of a class or class type.
    InstanceVariable,
}

impl IdentifierKind {
    /// Returns true for kinds whose expansion may live on a page of its own.
    #[must_use]
    pub const fn owns_page(self) -> bool {
        matches!(
            self,
            Self::Root
                | Self::Page
                | Self::Module
                | Self::Argument { .. }
                | Self::ModuleType
                | Self::Class
                | Self::ClassType
        )
    }

    /// Short lowercase label used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Page => "page",
            Self::Module => "module",
            Self::Argument { .. } => "argument",
            Self::ModuleType => "module type",
            Self::Type => "type",
            Self::CoreType => "core type",
            Self::Constructor => "constructor",
            Self::Field => "field",
            Self::Extension => "extension",
            Self::Exception => "exception",
            Self::CoreException => "core exception",
            Self::Value => "value",
            Self::Class => "class",
            Self::ClassType => "class type",
            Self::Method => "method",
            Self::InstanceVariable => "instance variable",
        }
    }
}

/// A stable, kind-tagged reference to a declared entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// What kind of entity this is.
    pub kind: IdentifierKind,
    /// The declared name.
    pub name: String,
    /// The enclosing declaration, absent for roots, pages and core entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Identifier>>,
}

impl Identifier {
    fn top(kind: IdentifierKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            parent: None,
        }
    }

    /// Create the identifier of a compilation unit.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self::top(IdentifierKind::Root, name)
    }

    /// Create the identifier of a standalone documentation page.
    #[must_use]
    pub fn page(name: impl Into<String>) -> Self {
        Self::top(IdentifierKind::Page, name)
    }

    /// Create the identifier of a predefined type.
    #[must_use]
    pub fn core_type(name: impl Into<String>) -> Self {
        Self::top(IdentifierKind::CoreType, name)
    }

    /// Create a child identifier of the given kind under `self`.
    #[must_use]
    pub fn child(&self, kind: IdentifierKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            parent: Some(Box::new(self.clone())),
        }
    }

    /// Child module.
    #[must_use]
    pub fn module(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Module, name)
    }

    /// Child module type.
    #[must_use]
    pub fn module_type(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::ModuleType, name)
    }

    /// Functor argument at the given 1-based position.
    #[must_use]
    pub fn argument(&self, position: usize, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Argument { position }, name)
    }

    /// Child type.
    #[must_use]
    pub fn type_(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Type, name)
    }

    /// Constructor of the type `self`.
    #[must_use]
    pub fn constructor(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Constructor, name)
    }

    /// Field of the type (or inline record constructor) `self`.
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Field, name)
    }

    /// Extension constructor declared in `self`.
    #[must_use]
    pub fn extension(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Extension, name)
    }

    /// Exception declared in `self`.
    #[must_use]
    pub fn exception(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Exception, name)
    }

    /// Value declared in `self`.
    #[must_use]
    pub fn value(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Value, name)
    }

    /// Class declared in `self`.
    #[must_use]
    pub fn class(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Class, name)
    }

    /// Class type declared in `self`.
    #[must_use]
    pub fn class_type(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::ClassType, name)
    }

    /// Method of the class `self`.
    #[must_use]
    pub fn method(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::Method, name)
    }

    /// Instance variable of the class `self`.
    #[must_use]
    pub fn instance_variable(&self, name: impl Into<String>) -> Self {
        self.child(IdentifierKind::InstanceVariable, name)
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enclosing declaration, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Identifier> {
        self.parent.as_deref()
    }

    /// The compilation unit root this identifier belongs to.
    ///
    /// Returns `None` for core entities and pages, which have no root.
    #[must_use]
    pub fn root_of(&self) -> Option<&Identifier> {
        let mut current = self;
        loop {
            match current.parent() {
                Some(parent) => current = parent,
                None if current.kind == IdentifierKind::Root => return Some(current),
                None => return None,
            }
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent() {
            write!(f, "{parent}.")?;
        }
        f.write_str(&self.name)
    }
}
