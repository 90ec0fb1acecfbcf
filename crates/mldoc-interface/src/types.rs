//! Type expressions and type declarations.

use crate::doc::Docs;
use crate::ident::Identifier;
use crate::path::{Fragment, Path};
use serde::{Deserialize, Serialize};

/// An argument label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// `l:t`
    Label(String),
    /// `?l:t`
    Optional(String),
}

/// How a polymorphic variant bounds its set of tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolymorphicVariantKind {
    /// `[ ... ]`
    Fixed,
    /// `[> ... ]`
    Open,
    /// `[< ... > tags ]`, with the tags that must be present.
    Closed(Vec<String>),
}

/// One row of a polymorphic variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolymorphicVariantElement {
    /// An inherited row, such as `| t`.
    Type(TypeExpr),
    /// A tag, such as `` `A of int ``.
    Constructor {
        /// Tag name without the backquote.
        name: String,
        /// Argument conjunction; empty for constant tags.
        #[serde(default)]
        arguments: Vec<TypeExpr>,
        /// Documentation of the tag.
        #[serde(default)]
        doc: Docs,
    },
}

/// A polymorphic variant type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolymorphicVariant {
    /// Bound on the tag set.
    pub kind: PolymorphicVariantKind,
    /// Rows in declaration order.
    pub elements: Vec<PolymorphicVariantElement>,
}

/// A field of an object type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectField {
    /// `name : t`
    Method {
        /// Method name.
        name: String,
        /// Method type.
        type_: TypeExpr,
    },
    /// An inherited object type.
    Inherit(TypeExpr),
}

/// An object type `< m : t; .. >`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    /// Fields in declaration order.
    pub fields: Vec<ObjectField>,
    /// Whether the row is open (`..`).
    #[serde(default)]
    pub open: bool,
}

/// A first-class module type `(module S with type t = u)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// The packaged module type.
    pub path: Path,
    /// Type constraints, relative to the packaged module type.
    #[serde(default)]
    pub substitutions: Vec<(Fragment, TypeExpr)>,
}

/// A type expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    /// Type variable `'a`.
    Var(String),
    /// Wildcard `_`.
    Any,
    /// `t as 'a`
    Alias(Box<TypeExpr>, String),
    /// `[label:] a -> b`
    Arrow(Option<Label>, Box<TypeExpr>, Box<TypeExpr>),
    /// `a * b`
    Tuple(Vec<TypeExpr>),
    /// Applied type constructor `(a, b) t`.
    Constr(Path, Vec<TypeExpr>),
    /// Polymorphic variant.
    PolymorphicVariant(PolymorphicVariant),
    /// Object type.
    Object(Object),
    /// Class type `#c`.
    Class(Path, Vec<TypeExpr>),
    /// Explicit quantification `'a 'b. t`.
    Poly(Vec<String>, Box<TypeExpr>),
    /// First-class module.
    Package(Package),
}

impl TypeExpr {
    /// Type variable.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Unlabelled arrow.
    #[must_use]
    pub fn arrow(from: TypeExpr, to: TypeExpr) -> Self {
        Self::Arrow(None, Box::new(from), Box::new(to))
    }

    /// Labelled arrow.
    #[must_use]
    pub fn labelled(label: Label, from: TypeExpr, to: TypeExpr) -> Self {
        Self::Arrow(Some(label), Box::new(from), Box::new(to))
    }

    /// Applied constructor.
    #[must_use]
    pub fn constr(path: Path, args: Vec<TypeExpr>) -> Self {
        Self::Constr(path, args)
    }

    /// A reference to a predefined type such as `int`.
    #[must_use]
    pub fn core(name: &str) -> Self {
        Self::Constr(Path::resolved(Identifier::core_type(name)), Vec::new())
    }
}

/// Variance annotation on a type parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    /// `+'a`
    Pos,
    /// `-'a`
    Neg,
}

/// Name of a type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamDesc {
    /// `_`
    Any,
    /// `'a`
    Var(String),
}

/// A type parameter in a declaration head.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    /// Parameter name.
    pub desc: ParamDesc,
    /// Variance annotation.
    #[serde(default)]
    pub variance: Option<Variance>,
}

impl TypeParam {
    /// Invariant parameter `'name`.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self {
            desc: ParamDesc::Var(name.into()),
            variance: None,
        }
    }
}

/// The equation part of a type declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEquation {
    /// Declared parameters.
    #[serde(default)]
    pub params: Vec<TypeParam>,
    /// Whether the declaration is `private`.
    #[serde(default)]
    pub private: bool,
    /// Right-hand side alias, if any.
    #[serde(default)]
    pub manifest: Option<TypeExpr>,
    /// `constraint a = b` clauses.
    #[serde(default)]
    pub constraints: Vec<(TypeExpr, TypeExpr)>,
}

/// A record field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field identifier.
    pub id: Identifier,
    /// Field documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Whether the field is `mutable`.
    #[serde(default)]
    pub mutable: bool,
    /// Field type.
    pub type_: TypeExpr,
}

/// Arguments of a constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorArgs {
    /// Positional arguments; empty for constant constructors.
    Tuple(Vec<TypeExpr>),
    /// Inline record.
    Record(Vec<Field>),
}

impl Default for ConstructorArgs {
    fn default() -> Self {
        Self::Tuple(Vec::new())
    }
}

/// A variant, extension or exception constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    /// Constructor identifier.
    pub id: Identifier,
    /// Constructor documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Argument shape.
    #[serde(default)]
    pub args: ConstructorArgs,
    /// Explicit result type, present on GADT-style constructors.
    #[serde(default)]
    pub res: Option<TypeExpr>,
}

/// The representation of a type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRepresentation {
    /// Variant type.
    Variant(Vec<Constructor>),
    /// Record type.
    Record(Vec<Field>),
    /// Extensible variant `..`.
    Extensible,
}

/// A type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Type identifier.
    pub id: Identifier,
    /// Type documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Parameters, manifest and constraints.
    #[serde(default)]
    pub equation: TypeEquation,
    /// Representation, absent for abstract types and pure aliases.
    #[serde(default)]
    pub representation: Option<TypeRepresentation>,
}
