//! Resolved interface trees for mldoc.
//!
//! This crate defines the input of the documentation renderer: the public
//! surface of compiled modules, with every path already resolved as far as
//! the extraction step could manage. The tree is immutable once built; the
//! renderer only reads it.
//!
//! # Structure
//!
//! - [`ident`]: kind-tagged identifiers of declarations
//! - [`path`]: qualified paths and signature-relative fragments
//! - [`types`]: type expressions and type declarations
//! - [`signature`]: signature items, modules, module types and classes
//! - [`doc`]: documentation comments
//!
//! # Exchange Format
//!
//! Units are exchanged as JSON documents. A file holds either a compiled
//! unit or a standalone page:
//!
//! ```json
//! { "unit": { "id": { "kind": "root", "name": "Foo" }, "content": { "module": [] } } }
//! ```

#![warn(missing_docs)]

pub mod doc;
pub mod ident;
pub mod path;
pub mod signature;
pub mod types;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use doc::{Block, DocComment, Docs, Inline, Tag};
pub use ident::{Identifier, IdentifierKind};
pub use path::{Fragment, Path, ResolvedFragment, ResolvedPath};
pub use signature::{
    Class, ClassDecl, ClassSignature, ClassSignatureItem, ClassType, ClassTypeExpr, Exception,
    Extension, ExtensionConstructor, External, FunctorArgument, Include, InstanceVariable, Method,
    Module, ModuleDecl, ModuleExpansion, ModuleSubstitution, ModuleType, ModuleTypeExpr,
    Recursive, Signature, SignatureItem, Substitution, Value,
};
pub use types::{
    Constructor, ConstructorArgs, Field, Label, Object, ObjectField, Package, ParamDesc,
    PolymorphicVariant, PolymorphicVariantElement, PolymorphicVariantKind, TypeDecl, TypeEquation,
    TypeExpr, TypeParam, TypeRepresentation, Variance,
};

/// Errors that can occur while loading interface trees.
#[derive(Debug, Error)]
pub enum InterfaceError {
    /// IO error.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File being read or written.
        path: Utf8PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Malformed JSON.
    #[error("invalid interface file {path}: {source}")]
    Json {
        /// File being read.
        path: Utf8PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The root identifier has the wrong kind.
    #[error("expected a {expected} identifier for `{name}`, found a {found}")]
    WrongRootKind {
        /// Expected kind label.
        expected: &'static str,
        /// Kind label found.
        found: &'static str,
        /// Identifier name.
        name: String,
    },
}

/// Result type for interface operations.
pub type InterfaceResult<T> = Result<T, InterfaceError>;

/// A module packed into a pack unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packed {
    /// Identifier of the packed module.
    pub id: Identifier,
    /// Path of the unit it stands for.
    pub path: Path,
}

/// What a compilation unit contains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitContent {
    /// An ordinary module signature.
    Module(Signature),
    /// A list of packed modules.
    Pack(Vec<Packed>),
}

/// A compiled module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Root identifier.
    pub id: Identifier,
    /// Top-of-file documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Unit content.
    pub content: UnitContent,
}

impl CompilationUnit {
    /// Create a module unit.
    #[must_use]
    pub fn module(id: Identifier, doc: Docs, signature: Signature) -> Self {
        Self {
            id,
            doc,
            content: UnitContent::Module(signature),
        }
    }
}

/// A standalone documentation page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocPage {
    /// Page identifier.
    pub name: Identifier,
    /// Page content.
    pub content: Docs,
}

/// A root input of the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Root {
    /// A compiled module or pack.
    Unit(CompilationUnit),
    /// A documentation page.
    Page(DocPage),
}

impl Root {
    /// The root identifier.
    #[must_use]
    pub fn id(&self) -> &Identifier {
        match self {
            Self::Unit(unit) => &unit.id,
            Self::Page(page) => &page.name,
        }
    }

    /// Check that the root identifier has the kind its content requires.
    pub fn validate(&self) -> InterfaceResult<()> {
        let (expected, id) = match self {
            Self::Unit(unit) => (IdentifierKind::Root, &unit.id),
            Self::Page(page) => (IdentifierKind::Page, &page.name),
        };
        if id.kind == expected {
            Ok(())
        } else {
            Err(InterfaceError::WrongRootKind {
                expected: expected.label(),
                found: id.kind.label(),
                name: id.name.clone(),
            })
        }
    }

    /// Read a root from a JSON file.
    pub fn load(path: &Utf8Path) -> InterfaceResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| InterfaceError::Io {
            path: path.to_owned(),
            source,
        })?;
        let root: Self = serde_json::from_str(&text).map_err(|source| InterfaceError::Json {
            path: path.to_owned(),
            source,
        })?;
        root.validate()?;
        Ok(root)
    }

    /// Write a root to a JSON file.
    pub fn save(&self, path: &Utf8Path) -> InterfaceResult<()> {
        let text = serde_json::to_string_pretty(self).map_err(|source| InterfaceError::Json {
            path: path.to_owned(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| InterfaceError::Io {
            path: path.to_owned(),
            source,
        })
    }
}
