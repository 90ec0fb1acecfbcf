//! Module-type expressions and `with` substitutions.

use crate::error::{RenderError, RenderResult};
use crate::generator::Generator;
use crate::markup::{arrow, join, keyword, text, Markup};
use crate::type_expr::{format_params, Delim};
use mldoc_interface::{Identifier, ModuleDecl, ModuleTypeExpr, Path, Substitution, TypeEquation};

/// The signature that `with` substitutions on `expr` are relative to.
///
/// Only three shapes are traced: a resolved module type path, a nested
/// restriction, and `module type of` a resolved alias or a module type.
/// Everything else falls back to `default`.
#[must_use]
pub fn substitution_base(expr: &ModuleTypeExpr, default: &Identifier) -> Identifier {
    match expr {
        ModuleTypeExpr::Path(Path::Resolved(path)) => path.identifier(),
        ModuleTypeExpr::With(inner, _) => substitution_base(inner, default),
        ModuleTypeExpr::TypeOf(decl) => match decl.as_ref() {
            ModuleDecl::Alias(Path::Resolved(path)) => path.identifier(),
            ModuleDecl::ModuleType(inner) => substitution_base(inner, default),
            ModuleDecl::Alias(_) => default.clone(),
        },
        ModuleTypeExpr::Path(_) | ModuleTypeExpr::Signature(_) | ModuleTypeExpr::Functor(..) => {
            default.clone()
        }
    }
}

impl Generator<'_> {
    /// Render a module-type expression. Structural signatures are elided.
    pub fn mty(&mut self, base: &Identifier, expr: &ModuleTypeExpr) -> RenderResult<Markup> {
        let markup = match expr {
            ModuleTypeExpr::Path(path) => self.path(path, true),
            ModuleTypeExpr::Signature(_) => vec![keyword("sig"), text(" ... "), keyword("end")],
            ModuleTypeExpr::Functor(None, result) => {
                let mut out = vec![keyword("functor"), text(" () "), arrow(), text(" ")];
                out.extend(self.mty(base, result)?);
                out
            }
            ModuleTypeExpr::Functor(Some(arg), result) => {
                let mut out = vec![
                    keyword("functor"),
                    text(" ("),
                    text(arg.id.name()),
                    text(" : "),
                ];
                out.extend(self.mty(base, &arg.expr)?);
                out.extend([text(") "), arrow(), text(" ")]);
                out.extend(self.mty(base, result)?);
                out
            }
            ModuleTypeExpr::With(inner, substitutions) => {
                let mut out = self.mty(base, inner)?;
                let scope = substitution_base(inner, base);
                let parts = substitutions
                    .iter()
                    .map(|subst| self.substitution(&scope, subst))
                    .collect::<RenderResult<Vec<_>>>()?;
                out.extend([text(" "), keyword("with"), text(" ")]);
                out.extend(join(parts, &[keyword(" and ")]));
                out
            }
            ModuleTypeExpr::TypeOf(decl) => {
                let mut out = vec![keyword("module type of"), text(" ")];
                out.extend(self.module_decl_body(base, decl)?);
                out
            }
        };
        Ok(markup)
    }

    /// ` = P` for aliases, ` : S` for module types.
    pub fn module_decl(&mut self, base: &Identifier, decl: &ModuleDecl) -> RenderResult<Markup> {
        let mut out = vec![text(match decl {
            ModuleDecl::Alias(_) => " = ",
            ModuleDecl::ModuleType(_) => " : ",
        })];
        out.extend(self.module_decl_body(base, decl)?);
        Ok(out)
    }

    /// The right-hand side of a module declaration.
    pub fn module_decl_body(
        &mut self,
        base: &Identifier,
        decl: &ModuleDecl,
    ) -> RenderResult<Markup> {
        match decl {
            ModuleDecl::Alias(path) => Ok(self.path(path, true)),
            ModuleDecl::ModuleType(expr) => self.mty(base, expr),
        }
    }

    fn substitution(&mut self, base: &Identifier, subst: &Substitution) -> RenderResult<Markup> {
        let markup = match subst {
            Substitution::ModuleEq(fragment, decl) => {
                let mut out = vec![keyword("module"), text(" ")];
                out.extend(self.fragment(base, fragment));
                out.push(text(" = "));
                out.extend(self.module_decl_body(base, decl)?);
                out
            }
            Substitution::ModuleSubst(fragment, path) => {
                let mut out = vec![keyword("module"), text(" ")];
                out.extend(self.fragment(base, fragment));
                out.push(text(" := "));
                out.extend(self.path(path, true));
                out
            }
            Substitution::TypeEq(fragment, eq) => {
                let name = self.fragment(base, fragment);
                let mut out = type_eq_head(name, eq);
                if let Some(manifest) = &eq.manifest {
                    out.push(text(" = "));
                    if eq.private {
                        out.push(keyword("private "));
                    }
                    out.extend(self.type_expr(manifest, false));
                }
                out.extend(self.constraints(&eq.constraints));
                out
            }
            Substitution::TypeSubst(fragment, eq) => {
                let manifest = eq.manifest.as_ref().ok_or_else(|| {
                    RenderError::invariant(
                        self.tree.url(),
                        format!("destructive substitution of type `{fragment}` has no manifest"),
                    )
                })?;
                let name = self.fragment(base, fragment);
                let mut out = type_eq_head(name, eq);
                out.push(text(" := "));
                out.extend(self.type_expr(manifest, false));
                out
            }
        };
        Ok(markup)
    }
}

fn type_eq_head(name: Markup, eq: &TypeEquation) -> Markup {
    let mut out = vec![
        keyword("type"),
        text(" "),
        text(format_params(&eq.params, Delim::Parens)),
    ];
    out.extend(name);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{plain_text, walk, Node};
    use crate::resolve::{PackageTable, UrlResolver};
    use crate::tree::PageKind;
    use crate::RenderConfig;
    use mldoc_interface::{
        Fragment, FunctorArgument, IdentifierKind, ResolvedFragment, ResolvedPath, Signature,
        TypeExpr,
    };

    fn with_generator<T>(f: impl FnOnce(&mut Generator<'_>) -> T) -> T {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let config = RenderConfig::default();
        let mut gen = Generator::new(&resolver, &config);
        let _package = gen.tree.enter(PageKind::Package, "A");
        let _unit = gen.tree.enter(PageKind::Unit, "A");
        f(&mut gen)
    }

    fn s() -> Identifier {
        Identifier::root("A").module_type("S")
    }

    fn type_eq(ty: TypeExpr) -> TypeEquation {
        TypeEquation {
            manifest: Some(ty),
            ..TypeEquation::default()
        }
    }

    #[test]
    fn test_base_of_resolved_path() {
        let default = Identifier::root("A").module("M");
        let expr = ModuleTypeExpr::Path(Path::resolved(s()));
        assert_eq!(substitution_base(&expr, &default), s());
    }

    #[test]
    fn test_base_through_nested_restriction() {
        let default = Identifier::root("A").module("M");
        let inner = ModuleTypeExpr::With(Box::new(ModuleTypeExpr::Path(Path::resolved(s()))), vec![]);
        let expr = ModuleTypeExpr::With(Box::new(inner), vec![]);
        assert_eq!(substitution_base(&expr, &default), s());
    }

    #[test]
    fn test_base_through_module_type_of() {
        let default = Identifier::root("A").module("M");
        let n = Identifier::root("A").module("N");

        let alias = ModuleTypeExpr::TypeOf(Box::new(ModuleDecl::Alias(Path::resolved(n.clone()))));
        assert_eq!(substitution_base(&alias, &default), n);

        let wrapped = ModuleTypeExpr::TypeOf(Box::new(ModuleDecl::ModuleType(
            ModuleTypeExpr::Path(Path::resolved(s())),
        )));
        assert_eq!(substitution_base(&wrapped, &default), s());
    }

    #[test]
    fn test_base_falls_back_to_default() {
        let default = Identifier::root("A").module("M");
        let unresolved = ModuleTypeExpr::Path(Path::root("S"));
        let application = ModuleTypeExpr::TypeOf(Box::new(ModuleDecl::Alias(Path::Apply(
            Box::new(Path::root("F")),
            Box::new(Path::root("X")),
        ))));
        let structural = ModuleTypeExpr::Signature(Signature::default());

        assert_eq!(substitution_base(&unresolved, &default), default);
        assert_eq!(substitution_base(&application, &default), default);
        assert_eq!(substitution_base(&structural, &default), default);
    }

    #[test]
    fn test_with_links_fragments_into_base() {
        let expr = ModuleTypeExpr::With(
            Box::new(ModuleTypeExpr::Path(Path::resolved(s()))),
            vec![
                Substitution::TypeEq(
                    Fragment::Resolved(ResolvedFragment::new(IdentifierKind::Type, "t")),
                    type_eq(TypeExpr::core("int")),
                ),
                Substitution::ModuleSubst(Fragment::name("X"), Path::root("Y")),
            ],
        );
        let default = Identifier::root("A").module("M");
        let out = with_generator(|gen| gen.mty(&default, &expr).unwrap());

        assert_eq!(plain_text(&out), "S with type t = int and module X := Y");
        let mut hrefs = Vec::new();
        walk(&out, &mut |node| {
            if let Node::Link { href, .. } = node {
                hrefs.push(href.clone());
            }
        });
        assert_eq!(
            hrefs,
            vec!["#module-type-S", "module-type-S/index.html#type-t"]
        );
    }

    #[test]
    fn test_destructive_type_substitution_requires_manifest() {
        let expr = ModuleTypeExpr::With(
            Box::new(ModuleTypeExpr::Path(Path::resolved(s()))),
            vec![Substitution::TypeSubst(Fragment::name("t"), TypeEquation::default())],
        );
        let default = Identifier::root("A").module("M");
        let result = with_generator(|gen| gen.mty(&default, &expr));
        assert!(matches!(result, Err(RenderError::InvariantViolation { .. })));
    }

    #[test]
    fn test_functor_types() {
        let arg = FunctorArgument {
            id: Identifier::root("A").module_type("F").argument(1, "X"),
            expr: ModuleTypeExpr::Path(Path::Resolved(ResolvedPath::Identifier(s()))),
            expansion: None,
        };
        let expr = ModuleTypeExpr::Functor(
            Some(Box::new(arg)),
            Box::new(ModuleTypeExpr::Functor(
                None,
                Box::new(ModuleTypeExpr::Signature(Signature::default())),
            )),
        );
        let default = Identifier::root("A").module_type("F");
        let out = with_generator(|gen| gen.mty(&default, &expr).unwrap());
        assert_eq!(
            plain_text(&out),
            "functor (X : S) -> functor () -> sig ... end"
        );
    }
}
