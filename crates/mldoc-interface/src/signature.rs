//! Signatures and the items they contain.

use crate::doc::{DocComment, Docs};
use crate::ident::Identifier;
use crate::path::{Fragment, Path};
use crate::types::{Constructor, ConstructorArgs, Label, TypeDecl, TypeEquation, TypeExpr, TypeParam};
use serde::{Deserialize, Serialize};

/// Position of a declaration inside a recursive group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recursive {
    /// A lone declaration.
    #[default]
    Ordinary,
    /// First declaration of a recursive group.
    Rec,
    /// Subsequent declaration of a group (`and`).
    And,
    /// Explicitly non-recursive (`type nonrec`).
    Nonrec,
}

/// How a module is declared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleDecl {
    /// `module M = P`
    Alias(Path),
    /// `module M : S`
    ModuleType(ModuleTypeExpr),
}

/// A functor parameter `(X : S)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctorArgument {
    /// Argument identifier; must be of kind argument.
    pub id: Identifier,
    /// Declared module type of the argument.
    pub expr: ModuleTypeExpr,
    /// Expansion of the argument's signature.
    #[serde(default)]
    pub expansion: Option<ModuleExpansion>,
}

/// The navigable content of a module, module type or functor argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleExpansion {
    /// The declared type is already a signature; reuse it.
    AlreadyASig,
    /// An explicit signature.
    Signature(Signature),
    /// A functor: parameters (`None` for `()`) and result signature.
    Functor(Vec<Option<FunctorArgument>>, Signature),
}

/// One constraint of a `with` restriction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Substitution {
    /// `module M = P`
    ModuleEq(Fragment, ModuleDecl),
    /// `type t = u`
    TypeEq(Fragment, TypeEquation),
    /// `module M := P`
    ModuleSubst(Fragment, Path),
    /// `type t := u`
    TypeSubst(Fragment, TypeEquation),
}

/// A module type expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleTypeExpr {
    /// A named module type.
    Path(Path),
    /// An inline `sig ... end`.
    Signature(Signature),
    /// `functor (X : S) -> T`, or `functor () -> T`.
    Functor(Option<Box<FunctorArgument>>, Box<ModuleTypeExpr>),
    /// `S with ...`
    With(Box<ModuleTypeExpr>, Vec<Substitution>),
    /// `module type of M`
    TypeOf(Box<ModuleDecl>),
}

/// A module declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module identifier.
    pub id: Identifier,
    /// Module documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Declared type.
    pub type_: ModuleDecl,
    /// Expansion, present when the module gets its own page.
    #[serde(default)]
    pub expansion: Option<ModuleExpansion>,
}

/// A module type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleType {
    /// Module type identifier.
    pub id: Identifier,
    /// Module type documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Definition; absent for abstract module types.
    #[serde(default)]
    pub expr: Option<ModuleTypeExpr>,
    /// Expansion, present when the module type gets its own page.
    #[serde(default)]
    pub expansion: Option<ModuleExpansion>,
}

/// `module M := P`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSubstitution {
    /// Substituted module.
    pub id: Identifier,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Replacement module.
    pub manifest: Path,
}

/// A constructor added by a type extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionConstructor {
    /// Constructor identifier.
    pub id: Identifier,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Argument shape.
    #[serde(default)]
    pub args: ConstructorArgs,
    /// Explicit result type.
    #[serde(default)]
    pub res: Option<TypeExpr>,
}

/// `type t += A | B`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// The extended type.
    pub type_path: Path,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Parameters repeated from the extended type.
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    /// Whether the extension is `private`.
    #[serde(default)]
    pub private: bool,
    /// Added constructors.
    pub constructors: Vec<ExtensionConstructor>,
}

/// `exception E of t`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    /// Exception identifier.
    pub id: Identifier,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Argument shape.
    #[serde(default)]
    pub args: ConstructorArgs,
    /// Explicit result type.
    #[serde(default)]
    pub res: Option<TypeExpr>,
}

impl Exception {
    /// View the exception as a constructor for shared rendering.
    #[must_use]
    pub fn as_constructor(&self) -> Constructor {
        Constructor {
            id: self.id.clone(),
            doc: self.doc.clone(),
            args: self.args.clone(),
            res: self.res.clone(),
        }
    }
}

/// `val x : t`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    /// Value identifier.
    pub id: Identifier,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Value type.
    pub type_: TypeExpr,
}

/// `external x : t = "prim"`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct External {
    /// Value identifier.
    pub id: Identifier,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Value type.
    pub type_: TypeExpr,
    /// Primitive names.
    pub primitives: Vec<String>,
}

/// A class type expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassTypeExpr {
    /// `[params] path`
    Constr(Path, Vec<TypeExpr>),
    /// `object ... end`
    Signature(ClassSignature),
}

/// The type of a class, possibly taking arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassDecl {
    /// A class type.
    ClassType(ClassTypeExpr),
    /// `[label:] t -> decl`
    Arrow(Option<Label>, TypeExpr, Box<ClassDecl>),
}

/// A method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method identifier.
    pub id: Identifier,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Whether the method is `private`.
    #[serde(default)]
    pub private: bool,
    /// Whether the method is `virtual`.
    #[serde(default)]
    pub virtual_: bool,
    /// Method type.
    pub type_: TypeExpr,
}

/// An instance variable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceVariable {
    /// Variable identifier.
    pub id: Identifier,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Whether the variable is `mutable`.
    #[serde(default)]
    pub mutable: bool,
    /// Whether the variable is `virtual`.
    #[serde(default)]
    pub virtual_: bool,
    /// Variable type.
    pub type_: TypeExpr,
}

/// An item of a class signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassSignatureItem {
    /// `method m : t`
    Method(Method),
    /// `val v : t`
    InstanceVariable(InstanceVariable),
    /// `constraint a = b`
    Constraint(TypeExpr, TypeExpr),
    /// `inherit c`
    Inherit(ClassTypeExpr),
    /// Documentation or stop marker.
    Comment(DocComment),
}

/// The body of a class or class type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSignature {
    /// Explicit self type.
    #[serde(default)]
    pub self_: Option<TypeExpr>,
    /// Items in order.
    pub items: Vec<ClassSignatureItem>,
}

/// A class declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Class identifier.
    pub id: Identifier,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Whether the class is `virtual`.
    #[serde(default)]
    pub virtual_: bool,
    /// Type parameters.
    #[serde(default)]
    pub params: Vec<TypeParam>,
    /// Class type.
    pub type_: ClassDecl,
    /// Expansion, present when the class gets its own page.
    #[serde(default)]
    pub expansion: Option<ClassSignature>,
}

/// A class type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassType {
    /// Class type identifier.
    pub id: Identifier,
    /// Documentation.
    #[serde(default)]
    pub doc: Docs,
    /// Whether the class type is `virtual`.
    #[serde(default)]
    pub virtual_: bool,
    /// Type parameters.
    #[serde(default)]
    pub params: Vec<TypeParam>,
    /// Definition.
    pub expr: ClassTypeExpr,
    /// Expansion, present when the class type gets its own page.
    #[serde(default)]
    pub expansion: Option<ClassSignature>,
}

/// `include S`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    /// The signature the include appears in.
    pub parent: Identifier,
    /// Documentation; may carry `@open`, `@closed` or `@inline`.
    #[serde(default)]
    pub doc: Docs,
    /// What is included.
    pub decl: ModuleDecl,
    /// The included items.
    pub expansion: Signature,
}

/// An item of a signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureItem {
    /// A module.
    Module(Recursive, Module),
    /// A module type.
    ModuleType(ModuleType),
    /// A module substitution.
    ModuleSubstitution(ModuleSubstitution),
    /// A type declaration.
    Type(Recursive, TypeDecl),
    /// A type substitution `type t := u`.
    TypeSubstitution(TypeDecl),
    /// A type extension.
    TypeExtension(Extension),
    /// An exception.
    Exception(Exception),
    /// A value.
    Value(Value),
    /// An external.
    External(External),
    /// A class.
    Class(Recursive, Class),
    /// A class type.
    ClassType(Recursive, ClassType),
    /// An include.
    Include(Include),
    /// Documentation or stop marker.
    Comment(DocComment),
}

/// An ordered list of signature items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(pub Vec<SignatureItem>);

impl Signature {
    /// A signature with the given items.
    #[must_use]
    pub fn new(items: Vec<SignatureItem>) -> Self {
        Self(items)
    }

    /// The items in order.
    #[must_use]
    pub fn items(&self) -> &[SignatureItem] {
        &self.0
    }

    /// Number of stop markers directly in this signature.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.0
            .iter()
            .filter(|item| matches!(item, SignatureItem::Comment(DocComment::Stop)))
            .count()
    }
}

impl From<Vec<SignatureItem>> for Signature {
    fn from(items: Vec<SignatureItem>) -> Self {
        Self(items)
    }
}
