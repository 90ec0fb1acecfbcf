//! Type expression formatter.
//!
//! Parenthesization is decided top-down: each recursive call receives a
//! `needs_parens` flag from its parent and only arrows, tuples and aliases
//! honour it.

use crate::generator::Generator;
use crate::markup::{arrow, join, keyword, parenthesize, text, Markup, NBSP};
use mldoc_interface::{
    Fragment, Identifier, Label, Object, ObjectField, Package, ParamDesc, PolymorphicVariant,
    PolymorphicVariantElement, PolymorphicVariantKind, TypeExpr, TypeParam, Variance,
};

/// Delimiters around a multi-argument type application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delim {
    /// `(a, b) t`, for ordinary types.
    Parens,
    /// `[a, b] c`, for class types.
    Brackets,
}

impl Delim {
    const fn open(self) -> &'static str {
        match self {
            Self::Parens => "(",
            Self::Brackets => "[",
        }
    }

    const fn close(self) -> &'static str {
        match self {
            Self::Parens => ")",
            Self::Brackets => "]",
        }
    }
}

/// `l:` or `?l:`.
pub fn label(label: &Label) -> Markup {
    match label {
        Label::Label(name) => vec![text(format!("{name}:"))],
        Label::Optional(name) => vec![text(format!("?{name}:"))],
    }
}

fn format_param(param: &TypeParam) -> String {
    let desc = match &param.desc {
        ParamDesc::Any => "_".to_string(),
        ParamDesc::Var(name) => format!("'{name}"),
    };
    match param.variance {
        None => desc,
        Some(Variance::Pos) => format!("+{desc}"),
        Some(Variance::Neg) => format!("-{desc}"),
    }
}

/// Parameters of a declaration head, including the trailing separator.
///
/// A single parenthesized parameter is written bare, followed by a plain
/// space. Bracketed parameters are always bracketed.
pub fn format_params(params: &[TypeParam], delim: Delim) -> String {
    match (params, delim) {
        ([], _) => String::new(),
        ([param], Delim::Parens) => format!("{} ", format_param(param)),
        (params, delim) => {
            let list = params.iter().map(format_param).collect::<Vec<_>>().join(", ");
            format!("{}{list}{}{NBSP}", delim.open(), delim.close())
        }
    }
}

impl Generator<'_> {
    /// Render a type expression.
    pub fn type_expr(&mut self, ty: &TypeExpr, needs_parens: bool) -> Markup {
        match ty {
            TypeExpr::Var(name) => vec![text(format!("'{name}"))],
            TypeExpr::Any => vec![text("_")],
            TypeExpr::Alias(inner, name) => {
                let mut out = self.type_expr(inner, true);
                out.push(keyword(" as "));
                out.push(text(format!("'{name}")));
                wrap(out, needs_parens)
            }
            TypeExpr::Arrow(lbl, src, dst) => {
                let mut out = lbl.as_ref().map(label).unwrap_or_default();
                out.extend(self.type_expr(src, true));
                out.push(text(" "));
                out.push(arrow());
                out.push(text(" "));
                out.extend(self.type_expr(dst, false));
                wrap(out, needs_parens)
            }
            TypeExpr::Tuple(elements) => {
                let parts = elements
                    .iter()
                    .map(|element| self.type_expr(element, true))
                    .collect();
                wrap(join(parts, &[text(" * ")]), needs_parens)
            }
            TypeExpr::Constr(path, args) => {
                let link = self.path(path, false);
                self.format_type_path(Delim::Parens, args, link)
            }
            TypeExpr::PolymorphicVariant(variant) => self.inline_variant(variant),
            TypeExpr::Object(object) => self.object(object),
            TypeExpr::Class(path, args) => {
                let mut link = vec![text("#")];
                link.extend(self.path(path, false));
                self.format_type_path(Delim::Brackets, args, link)
            }
            TypeExpr::Poly(vars, body) => {
                let vars = vars
                    .iter()
                    .map(|v| format!("'{v}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let mut out = vec![text(format!("{vars}. "))];
                out.extend(self.type_expr(body, false));
                out
            }
            TypeExpr::Package(package) => self.package(package),
        }
    }

    /// Lay out a type application.
    ///
    /// No arguments: the path alone. One argument: the argument, a space,
    /// the path. Several: a delimited comma list, then a non-breaking space.
    pub fn format_type_path(&mut self, delim: Delim, args: &[TypeExpr], path: Markup) -> Markup {
        match args {
            [] => path,
            [arg] => {
                let mut out = self.type_expr(arg, true);
                out.push(text(" "));
                out.extend(path);
                out
            }
            args => {
                let parts = args.iter().map(|arg| self.type_expr(arg, false)).collect();
                let mut out = vec![text(delim.open())];
                out.extend(join(parts, &[text(format!(",{NBSP}"))]));
                out.push(text(format!("{}{NBSP}", delim.close())));
                out.extend(path);
                out
            }
        }
    }

    /// `` `A of t * u ``.
    pub(crate) fn variant_tag(&mut self, name: &str, arguments: &[TypeExpr]) -> Markup {
        let mut out = vec![text(format!("`{name}"))];
        if !arguments.is_empty() {
            out.push(text(" "));
            out.push(keyword("of"));
            out.push(text(" "));
            let parts = arguments.iter().map(|arg| self.type_expr(arg, true)).collect();
            out.extend(join(parts, &[text(" * ")]));
        }
        out
    }

    fn inline_variant(&mut self, variant: &PolymorphicVariant) -> Markup {
        let parts = variant
            .elements
            .iter()
            .map(|element| match element {
                PolymorphicVariantElement::Type(ty) => self.type_expr(ty, false),
                PolymorphicVariantElement::Constructor {
                    name, arguments, ..
                } => self.variant_tag(name, arguments),
            })
            .collect();
        let (open, close) = variant_delims(&variant.kind);
        let mut out = vec![text(open)];
        out.extend(join(parts, &[text(" | ")]));
        out.push(text(close));
        out
    }

    fn object(&mut self, object: &Object) -> Markup {
        let parts: Vec<Markup> = object
            .fields
            .iter()
            .map(|field| match field {
                ObjectField::Method { name, type_ } => {
                    let mut out = vec![text(format!("{name} : "))];
                    out.extend(self.type_expr(type_, false));
                    out
                }
                ObjectField::Inherit(ty) => self.type_expr(ty, false),
            })
            .collect();
        let empty = parts.is_empty();
        if empty && !object.open {
            return vec![text("<>")];
        }
        let mut out = vec![text("< ")];
        out.extend(join(parts, &[text("; ")]));
        if object.open {
            out.push(text(if empty { ".." } else { "; .." }));
        }
        out.push(text(" >"));
        out
    }

    fn package(&mut self, package: &Package) -> Markup {
        let mut out = vec![text("("), keyword("module"), text(" ")];
        out.extend(self.path(&package.path, false));
        if !package.substitutions.is_empty() {
            let base = package.path.as_resolved().map(|p| p.identifier());
            out.push(text(" "));
            out.push(keyword("with"));
            out.push(text(" "));
            let parts = package
                .substitutions
                .iter()
                .map(|(fragment, ty)| {
                    let mut part = vec![keyword("type"), text(" ")];
                    part.extend(self.fragment_or_text(base.as_ref(), fragment));
                    part.push(text(" = "));
                    part.extend(self.type_expr(ty, false));
                    part
                })
                .collect();
            out.extend(join(parts, &[keyword(" and ")]));
        }
        out.push(text(")"));
        out
    }

    /// ` constraint t1 = t2` for each pair.
    pub fn constraints(&mut self, constraints: &[(TypeExpr, TypeExpr)]) -> Markup {
        let mut out = Vec::new();
        for (lhs, rhs) in constraints {
            out.push(text(" "));
            out.push(keyword("constraint"));
            out.push(text(" "));
            out.extend(self.type_expr(lhs, false));
            out.push(text(" = "));
            out.extend(self.type_expr(rhs, false));
        }
        out
    }

    /// A fragment for the left-hand side of a type constraint.
    pub(crate) fn fragment_or_text(
        &mut self,
        base: Option<&Identifier>,
        fragment: &Fragment,
    ) -> Markup {
        match base {
            Some(base) => self.fragment(base, fragment),
            None => vec![text(fragment.to_string())],
        }
    }
}

/// Opening and closing text of a polymorphic variant.
pub(crate) fn variant_delims(kind: &PolymorphicVariantKind) -> (&'static str, String) {
    match kind {
        PolymorphicVariantKind::Fixed => ("[ ", " ]".to_string()),
        PolymorphicVariantKind::Open => ("[> ", " ]".to_string()),
        PolymorphicVariantKind::Closed(present) if present.is_empty() => ("[< ", " ]".to_string()),
        PolymorphicVariantKind::Closed(present) => {
            let tags = present
                .iter()
                .map(|tag| format!("`{tag}"))
                .collect::<Vec<_>>()
                .join(" ");
            ("[< ", format!(" > {tags} ]"))
        }
    }
}

fn wrap(markup: Markup, needs_parens: bool) -> Markup {
    if needs_parens {
        parenthesize(markup)
    } else {
        markup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::plain_text;
    use crate::resolve::{PackageTable, UrlResolver};
    use crate::RenderConfig;
    use mldoc_interface::Path;

    fn render(ty: &TypeExpr) -> String {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let config = RenderConfig::default();
        let mut gen = Generator::new(&resolver, &config);
        plain_text(&gen.type_expr(ty, false))
    }

    fn local(name: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::constr(Path::resolved(Identifier::root("A").type_(name)), args)
    }

    #[test]
    fn test_arrows_nest_to_the_right() {
        let f = TypeExpr::arrow(
            TypeExpr::arrow(TypeExpr::var("a"), TypeExpr::var("b")),
            TypeExpr::arrow(TypeExpr::core("int"), TypeExpr::var("b")),
        );
        assert_eq!(render(&f), "('a -> 'b) -> int -> 'b");
    }

    #[test]
    fn test_labels() {
        let f = TypeExpr::labelled(
            Label::Optional("sep".into()),
            TypeExpr::core("string"),
            TypeExpr::labelled(Label::Label("f".into()), TypeExpr::core("int"), TypeExpr::core("unit")),
        );
        assert_eq!(render(&f), "?sep:string -> f:int -> unit");
    }

    #[test]
    fn test_tuple_elements_are_parenthesized() {
        let t = TypeExpr::Tuple(vec![
            TypeExpr::core("int"),
            TypeExpr::Tuple(vec![TypeExpr::var("a"), TypeExpr::var("b")]),
        ]);
        assert_eq!(render(&t), "int * ('a * 'b)");
    }

    #[test]
    fn test_application_layouts() {
        assert_eq!(render(&local("t", vec![])), "t");
        assert_eq!(render(&local("t", vec![TypeExpr::var("a")])), "'a t");
        assert_eq!(
            render(&local("t", vec![TypeExpr::var("a"), TypeExpr::var("b")])),
            "('a,\u{a0}'b)\u{a0}t"
        );
        assert_eq!(
            render(&local(
                "list",
                vec![TypeExpr::arrow(TypeExpr::var("a"), TypeExpr::var("b"))]
            )),
            "('a -> 'b) list"
        );
    }

    #[test]
    fn test_polymorphic_variant_inline() {
        let v = TypeExpr::PolymorphicVariant(PolymorphicVariant {
            kind: PolymorphicVariantKind::Closed(vec!["A".into()]),
            elements: vec![
                PolymorphicVariantElement::Constructor {
                    name: "A".into(),
                    arguments: vec![],
                    doc: Default::default(),
                },
                PolymorphicVariantElement::Constructor {
                    name: "B".into(),
                    arguments: vec![TypeExpr::core("int"), TypeExpr::core("bool")],
                    doc: Default::default(),
                },
            ],
        });
        assert_eq!(render(&v), "[< `A | `B of int * bool > `A ]");
    }

    #[test]
    fn test_object_and_poly() {
        let o = TypeExpr::Object(Object {
            fields: vec![ObjectField::Method {
                name: "m".into(),
                type_: TypeExpr::core("int"),
            }],
            open: true,
        });
        assert_eq!(render(&o), "< m : int; .. >");

        let closed = TypeExpr::Object(Object {
            fields: vec![],
            open: false,
        });
        assert_eq!(render(&closed), "<>");
        let open = TypeExpr::Object(Object {
            fields: vec![],
            open: true,
        });
        assert_eq!(render(&open), "< .. >");

        let p = TypeExpr::Poly(
            vec!["a".into()],
            Box::new(TypeExpr::arrow(TypeExpr::var("a"), TypeExpr::var("a"))),
        );
        assert_eq!(render(&p), "'a. 'a -> 'a");
    }

    #[test]
    fn test_format_params() {
        let a = TypeParam::var("a");
        let b = TypeParam {
            desc: ParamDesc::Any,
            variance: Some(Variance::Neg),
        };
        assert_eq!(format_params(&[], Delim::Parens), "");
        assert_eq!(format_params(&[a.clone()], Delim::Parens), "'a ");
        assert_eq!(format_params(&[a.clone(), b], Delim::Parens), "('a, -_)\u{a0}");
        assert_eq!(format_params(&[a], Delim::Brackets), "['a]\u{a0}");
    }
}
