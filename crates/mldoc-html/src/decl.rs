//! Type declarations, constructors, records and the other one-line items.
//!
//! Constructor, field and polymorphic variant rows are anchored through the
//! link resolver. A row whose anchor cannot be computed keeps its text and
//! loses only the anchor; the failure is recorded as a warning.

use crate::generator::Generator;
use crate::markup::{arrow, join, keyword, spec, text, Cell, DefBuilder, Markup, Node, Row};
use crate::type_expr::{format_params, variant_delims, Delim};
use crate::url::kind_class;
use mldoc_interface::{
    Constructor, ConstructorArgs, Docs, Exception, Extension, External, Field, Identifier,
    PolymorphicVariant, PolymorphicVariantElement, Recursive, TypeDecl, TypeExpr,
    TypeRepresentation, Value,
};

impl Generator<'_> {
    /// Anchor and kind class for a table row, or `None` for the anchor when
    /// it cannot be computed.
    fn row_anchor(&mut self, id: &Identifier) -> (Option<String>, &'static str) {
        match self.resolver.resolve_identifier(id) {
            Ok(resolved) => (Some(resolved.anchor), resolved.kind),
            Err(err) => {
                self.warn(format!("row `{id}` rendered without anchor: {err}"));
                (None, kind_class(id.kind))
            }
        }
    }

    fn doc_cell(&mut self, docs: &Docs) -> Option<Cell> {
        if docs.is_empty() {
            return None;
        }
        Some(Cell {
            class: "doc".to_string(),
            children: self.docs(docs),
        })
    }

    fn row(&mut self, anchor: Option<String>, kind: &str, def: Markup, docs: &Docs) -> Row {
        let mut children = Vec::with_capacity(def.len() + 1);
        if let Some(anchor) = &anchor {
            children.push(Node::Anchor(anchor.clone()));
        }
        children.extend(def);

        let mut cells = vec![Cell {
            class: format!("def {kind}"),
            children,
        }];
        cells.extend(self.doc_cell(docs));
        Row { id: anchor, cells }
    }

    /// A constructor: name, argument shape and optional result type.
    ///
    /// A result type makes the constructor GADT-style: arguments follow `:`
    /// instead of `of` and the result follows an arrow, or a plain `:` when
    /// there are no arguments.
    pub fn constructor(
        &mut self,
        def: &mut DefBuilder,
        id: &Identifier,
        args: &ConstructorArgs,
        res: Option<&TypeExpr>,
    ) {
        def.inline([Node::Span {
            class: kind_class(id.kind).to_string(),
            children: vec![text(id.name())],
        }]);

        let is_gadt = res.is_some();
        let separator = || {
            if is_gadt {
                text(":")
            } else {
                keyword("of")
            }
        };
        match args {
            ConstructorArgs::Tuple(elements) if elements.is_empty() => {}
            ConstructorArgs::Tuple(elements) => {
                let parts = elements
                    .iter()
                    .map(|element| self.type_expr(element, true))
                    .collect();
                def.inline([text(" "), separator(), text(" ")]);
                def.inline(join(parts, &[text(" * ")]));
            }
            ConstructorArgs::Record(fields) => {
                def.inline([text(" "), separator(), text(" ")]);
                self.record(def, fields);
            }
        }

        if let Some(res) = res {
            let constant = matches!(args, ConstructorArgs::Tuple(elements) if elements.is_empty());
            def.inline([text(" ")]);
            def.inline([if constant { text(":") } else { arrow() }]);
            def.inline([text(" ")]);
            def.inline(self.type_expr(res, false));
        }
    }

    /// `{ f : t; ... }` as an anchored table.
    pub fn record(&mut self, def: &mut DefBuilder, fields: &[Field]) {
        let rows = fields.iter().map(|field| self.field_row(field)).collect();
        def.inline([text("{")]);
        def.block(Node::Table {
            class: "record".to_string(),
            rows,
        });
        def.inline([text("}")]);
    }

    fn field_row(&mut self, field: &Field) -> Row {
        let (anchor, kind) = self.row_anchor(&field.id);
        let mut code = Vec::new();
        if field.mutable {
            code.push(keyword("mutable "));
        }
        code.push(Node::Span {
            class: kind.to_string(),
            children: vec![text(field.id.name())],
        });
        code.push(text(" : "));
        code.extend(self.type_expr(&field.type_, false));
        code.push(text(";"));
        self.row(anchor, kind, vec![Node::Code(code)], &field.doc)
    }

    fn variant(&mut self, def: &mut DefBuilder, constructors: &[Constructor]) {
        let mut rows = Vec::with_capacity(constructors.len());
        for cstr in constructors {
            let (anchor, kind) = self.row_anchor(&cstr.id);
            let mut row_def = DefBuilder::new();
            row_def.inline([text("| ")]);
            self.constructor(&mut row_def, &cstr.id, &cstr.args, cstr.res.as_ref());
            rows.push(self.row(anchor, kind, row_def.finish(), &cstr.doc));
        }
        def.block(Node::Table {
            class: "variant".to_string(),
            rows,
        });
    }

    /// A polymorphic variant declared as a type manifest, one row per tag.
    fn polymorphic_variant(
        &mut self,
        def: &mut DefBuilder,
        type_id: &Identifier,
        variant: &PolymorphicVariant,
    ) {
        let empty = Docs::empty();
        let mut rows = Vec::with_capacity(variant.elements.len());
        for element in &variant.elements {
            let (kind, case, docs) = match element {
                PolymorphicVariantElement::Type(ty) => ("type", self.type_expr(ty, false), &empty),
                PolymorphicVariantElement::Constructor {
                    name,
                    arguments,
                    doc,
                } => ("constructor", self.variant_tag(name, arguments), doc),
            };
            let mut code = vec![text("| ")];
            code.extend(case);

            let anchor = match self.resolver.resolve_variant_row(type_id, element) {
                Ok(anchor) => Some(anchor),
                Err(err) => {
                    self.warn(format!("variant row of `{type_id}` rendered without anchor: {err}"));
                    None
                }
            };
            rows.push(self.row(anchor, kind, vec![Node::Code(code)], docs));
        }

        let (open, close) = variant_delims(&variant.kind);
        def.inline([text(open)]);
        def.block(Node::Table {
            class: "variant".to_string(),
            rows,
        });
        def.inline([text(close)]);
    }

    /// A type declaration or, with `substitution`, a destructive
    /// substitution item (`type t := ...`).
    pub fn type_decl(&mut self, recursive: Recursive, decl: &TypeDecl, substitution: bool) -> Node {
        let equation = &decl.equation;
        let head = match recursive {
            Recursive::Ordinary | Recursive::Rec => "type",
            Recursive::And => "and",
            Recursive::Nonrec => "type nonrec",
        };
        let eq = if substitution { " := " } else { " = " };

        let mut def = DefBuilder::new();
        def.inline([
            keyword(head),
            text(" "),
            text(format_params(&equation.params, Delim::Parens)),
            text(decl.id.name()),
        ]);

        match &equation.manifest {
            Some(TypeExpr::PolymorphicVariant(variant)) => {
                def.inline([text(eq)]);
                if equation.private {
                    def.inline([keyword("private ")]);
                }
                self.polymorphic_variant(&mut def, &decl.id, variant);
            }
            Some(manifest) => {
                def.inline([text(eq)]);
                if equation.private {
                    def.inline([keyword("private ")]);
                }
                def.inline(self.type_expr(manifest, false));
            }
            None => {}
        }

        if let Some(repr) = &decl.representation {
            def.inline([text(" = ")]);
            if equation.private && equation.manifest.is_none() {
                def.inline([keyword("private ")]);
            }
            match repr {
                TypeRepresentation::Extensible => def.inline([text("..")]),
                TypeRepresentation::Variant(constructors) => self.variant(&mut def, constructors),
                TypeRepresentation::Record(fields) => self.record(&mut def, fields),
            }
        }

        def.inline(self.constraints(&equation.constraints));

        let anchor = self.anchor(&decl.id);
        let doc = self.docs(&decl.doc);
        spec("type", anchor, def.finish(), doc)
    }

    /// `type ('a) p += C | D`.
    pub fn extension(&mut self, ext: &Extension) -> Node {
        let mut def = DefBuilder::new();
        def.inline([
            keyword("type"),
            text(" "),
            text(format_params(&ext.type_params, Delim::Parens)),
        ]);
        def.inline(self.path(&ext.type_path, false));
        def.inline([text(" += ")]);
        if ext.private {
            def.inline([keyword("private ")]);
        }

        let mut rows = Vec::with_capacity(ext.constructors.len());
        for cstr in &ext.constructors {
            let (anchor, kind) = self.row_anchor(&cstr.id);
            let mut row_def = DefBuilder::new();
            row_def.inline([text("| ")]);
            self.constructor(&mut row_def, &cstr.id, &cstr.args, cstr.res.as_ref());
            rows.push(self.row(anchor, kind, row_def.finish(), &cstr.doc));
        }
        def.block(Node::Table {
            class: "extension".to_string(),
            rows,
        });

        let doc = self.docs(&ext.doc);
        spec("extension", None, def.finish(), doc)
    }

    pub fn exception(&mut self, exn: &Exception) -> Node {
        let cstr = exn.as_constructor();
        let mut def = DefBuilder::new();
        def.inline([keyword("exception"), text(" ")]);
        self.constructor(&mut def, &cstr.id, &cstr.args, cstr.res.as_ref());

        let anchor = self.anchor(&exn.id);
        let doc = self.docs(&exn.doc);
        spec("exception", anchor, def.finish(), doc)
    }

    pub fn value(&mut self, value: &Value) -> Node {
        let mut code = vec![keyword("val"), text(" "), text(value.id.name()), text(" : ")];
        code.extend(self.type_expr(&value.type_, false));

        let anchor = self.anchor(&value.id);
        let doc = self.docs(&value.doc);
        spec("value", anchor, vec![Node::Code(code)], doc)
    }

    pub fn external(&mut self, ext: &External) -> Node {
        let mut code = vec![keyword("external"), text(" "), text(ext.id.name()), text(" : ")];
        code.extend(self.type_expr(&ext.type_, false));
        let primitives = ext
            .primitives
            .iter()
            .map(|p| format!("\"{p}\""))
            .collect::<Vec<_>>()
            .join(" ");
        code.push(text(format!(" = {primitives}")));

        let anchor = self.anchor(&ext.id);
        let doc = self.docs(&ext.doc);
        spec("external", anchor, vec![Node::Code(code)], doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::plain_text;
    use crate::resolve::{PackageTable, UrlResolver};
    use crate::RenderConfig;
    use mldoc_interface::{Path, TypeEquation, TypeParam};

    fn with_generator<T>(f: impl FnOnce(&mut Generator<'_>) -> T) -> T {
        let packages = PackageTable::new();
        let resolver = UrlResolver::new(&packages, false);
        let config = RenderConfig::default();
        let mut gen = Generator::new(&resolver, &config);
        f(&mut gen)
    }

    fn render_constructor(id: &Identifier, args: ConstructorArgs, res: Option<TypeExpr>) -> String {
        with_generator(|gen| {
            let mut def = DefBuilder::new();
            gen.constructor(&mut def, id, &args, res.as_ref());
            plain_text(&def.finish())
        })
    }

    fn t() -> Identifier {
        Identifier::root("A").type_("t")
    }

    fn t_expr() -> TypeExpr {
        TypeExpr::constr(Path::resolved(t()), vec![])
    }

    #[test]
    fn test_plain_constructor_uses_of() {
        let args = ConstructorArgs::Tuple(vec![TypeExpr::core("int"), TypeExpr::core("int")]);
        assert_eq!(
            render_constructor(&t().constructor("Foo"), args, None),
            "Foo of int * int"
        );
    }

    #[test]
    fn test_gadt_constructor_uses_colon_and_arrow() {
        let args = ConstructorArgs::Tuple(vec![TypeExpr::core("int")]);
        assert_eq!(
            render_constructor(&t().constructor("Foo"), args, Some(t_expr())),
            "Foo : int -> t"
        );
    }

    #[test]
    fn test_constant_gadt_constructor() {
        assert_eq!(
            render_constructor(&t().constructor("Nil"), ConstructorArgs::default(), Some(t_expr())),
            "Nil : t"
        );
    }

    #[test]
    fn test_gadt_arguments_are_parenthesized() {
        let args = ConstructorArgs::Tuple(vec![
            TypeExpr::arrow(TypeExpr::var("a"), TypeExpr::var("b")),
            TypeExpr::var("a"),
        ]);
        assert_eq!(
            render_constructor(&t().constructor("Map"), args, Some(t_expr())),
            "Map : ('a -> 'b) * 'a -> t"
        );
    }

    #[test]
    fn test_variant_table_rows_are_anchored() {
        let decl = TypeDecl {
            id: t(),
            doc: Docs::empty(),
            equation: TypeEquation::default(),
            representation: Some(TypeRepresentation::Variant(vec![
                Constructor {
                    id: t().constructor("A"),
                    doc: Docs::text("The A case."),
                    args: ConstructorArgs::default(),
                    res: None,
                },
                Constructor {
                    id: t().constructor("B"),
                    doc: Docs::empty(),
                    args: ConstructorArgs::Tuple(vec![TypeExpr::core("int")]),
                    res: None,
                },
            ])),
        };
        let node = with_generator(|gen| gen.type_decl(Recursive::Ordinary, &decl, false));

        let mut ids = Vec::new();
        crate::markup::walk(std::slice::from_ref(&node), &mut |n| {
            if let Node::Table { rows, .. } = n {
                ids.extend(rows.iter().map(|row| row.id.clone()));
            }
        });
        assert_eq!(
            ids,
            vec![Some("type-t.A".to_string()), Some("type-t.B".to_string())]
        );
        assert_eq!(
            plain_text(std::slice::from_ref(&node)),
            "type t = | AThe A case. | B of int"
        );
    }

    #[test]
    fn test_type_head_with_params_and_private() {
        let decl = TypeDecl {
            id: t(),
            doc: Docs::empty(),
            equation: TypeEquation {
                params: vec![TypeParam::var("a"), TypeParam::var("b")],
                private: true,
                manifest: Some(TypeExpr::Tuple(vec![TypeExpr::var("a"), TypeExpr::var("b")])),
                constraints: vec![],
            },
            representation: None,
        };
        let node = with_generator(|gen| gen.type_decl(Recursive::Nonrec, &decl, false));
        assert_eq!(
            plain_text(std::slice::from_ref(&node)),
            "type nonrec ('a, 'b)\u{a0}t = private 'a * 'b"
        );
    }

    #[test]
    fn test_external() {
        let ext = External {
            id: Identifier::root("A").value("length"),
            doc: Docs::empty(),
            type_: TypeExpr::arrow(TypeExpr::core("string"), TypeExpr::core("int")),
            primitives: vec!["%string_length".into()],
        };
        let node = with_generator(|gen| gen.external(&ext));
        assert_eq!(
            plain_text(std::slice::from_ref(&node)),
            "external length : string -> int = \"%string_length\""
        );
    }
}
