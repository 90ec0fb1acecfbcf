//! Classes, class types and class signatures.

use crate::docs::toc_entries;
use crate::error::{RenderError, RenderResult};
use crate::generator::{Generator, Rendered};
use crate::markup::{arrow, div, keyword, spec, text, Markup, Node};
use crate::tree::{Page, PageKind};
use crate::type_expr::{format_params, label, Delim};
use crate::visibility::CommentVisibility;
use mldoc_interface::{
    Class, ClassDecl, ClassSignature, ClassSignatureItem, ClassType, ClassTypeExpr, DocComment,
    Docs, Identifier, InstanceVariable, Method, Recursive, TypeParam,
};

fn class_head(head: &str, virtual_: bool, params: &[TypeParam]) -> Markup {
    let mut out = vec![keyword(head), text(" ")];
    if virtual_ {
        out.push(keyword("virtual"));
        out.push(text(" "));
    }
    if !params.is_empty() {
        out.push(text(format_params(params, Delim::Brackets)));
    }
    out
}

impl Generator<'_> {
    /// `c` or `['a] c`, with `object ... end` for inline signatures.
    pub fn class_type_expr(&mut self, expr: &ClassTypeExpr) -> Markup {
        match expr {
            ClassTypeExpr::Constr(path, args) => {
                let link = self.path(path, false);
                self.format_type_path(Delim::Brackets, args, link)
            }
            ClassTypeExpr::Signature(_) => {
                vec![keyword("object"), text(" ... "), keyword("end")]
            }
        }
    }

    fn class_decl(&mut self, decl: &ClassDecl) -> Markup {
        match decl {
            ClassDecl::ClassType(expr) => self.class_type_expr(expr),
            ClassDecl::Arrow(lbl, src, dst) => {
                let mut out = lbl.as_ref().map(label).unwrap_or_default();
                out.extend(self.type_expr(src, true));
                out.extend([text(" "), arrow(), text(" ")]);
                out.extend(self.class_decl(dst));
                out
            }
        }
    }

    fn class_page(
        &mut self,
        kind: PageKind,
        id: &Identifier,
        doc: &Docs,
        sig: &ClassSignature,
    ) -> RenderResult<Page> {
        let title = format!("{} {id}", kind.title());
        let header = self.docs(doc);
        let mut toc = toc_entries(doc);
        let rendered = self.class_signature(sig)?;
        toc.extend(rendered.toc);
        self.tree.make(title, header, toc, rendered.body, rendered.pages)
    }

    fn class_name(
        &mut self,
        kind: PageKind,
        id: &Identifier,
        doc: &Docs,
        expansion: Option<&ClassSignature>,
    ) -> RenderResult<(Node, Markup, Option<Page>)> {
        let name = id.name();
        match expansion {
            None => Ok((text(name), self.docs(doc), None)),
            Some(sig) => {
                let page = self.in_page(kind, name, |gen| gen.class_page(kind, id, doc, sig))?;
                Ok((self.child_link(kind, name, name), self.synopsis(doc), Some(page)))
            }
        }
    }

    /// `class virtual ['a] c : decl`.
    pub fn class(
        &mut self,
        recursive: Recursive,
        class: &Class,
    ) -> RenderResult<(Node, Option<Page>)> {
        let head = match recursive {
            Recursive::Ordinary | Recursive::Rec | Recursive::Nonrec => "class",
            Recursive::And => "and",
        };
        let mut code = class_head(head, class.virtual_, &class.params);
        let decl = self.class_decl(&class.type_);
        let (name, doc, page) =
            self.class_name(PageKind::Class, &class.id, &class.doc, class.expansion.as_ref())?;
        code.push(name);
        code.push(text(" : "));
        code.extend(decl);

        let anchor = self.anchor(&class.id);
        Ok((spec("class", anchor, vec![Node::Code(code)], doc), page))
    }

    /// `class type virtual ['a] c = expr`.
    pub fn class_type(
        &mut self,
        recursive: Recursive,
        class_type: &ClassType,
    ) -> RenderResult<(Node, Option<Page>)> {
        let head = match recursive {
            Recursive::Ordinary | Recursive::Rec | Recursive::Nonrec => "class type",
            Recursive::And => "and",
        };
        let mut code = class_head(head, class_type.virtual_, &class_type.params);
        let expr = self.class_type_expr(&class_type.expr);
        let (name, doc, page) = self.class_name(
            PageKind::ClassType,
            &class_type.id,
            &class_type.doc,
            class_type.expansion.as_ref(),
        )?;
        code.push(name);
        code.push(text(" = "));
        code.extend(expr);

        let anchor = self.anchor(&class_type.id);
        Ok((spec("class-type", anchor, vec![Node::Code(code)], doc), page))
    }

    fn method(&mut self, method: &Method) -> Node {
        let mut code = vec![keyword("method"), text(" ")];
        if method.private {
            code.extend([keyword("private"), text(" ")]);
        }
        if method.virtual_ {
            code.extend([keyword("virtual"), text(" ")]);
        }
        code.push(text(method.id.name()));
        code.push(text(" : "));
        code.extend(self.type_expr(&method.type_, false));

        let anchor = self.anchor(&method.id);
        let doc = self.docs(&method.doc);
        spec("method", anchor, vec![Node::Code(code)], doc)
    }

    fn instance_variable(&mut self, var: &InstanceVariable) -> Node {
        let mut code = vec![keyword("val"), text(" ")];
        if var.mutable {
            code.extend([keyword("mutable"), text(" ")]);
        }
        if var.virtual_ {
            code.extend([keyword("virtual"), text(" ")]);
        }
        code.push(text(var.id.name()));
        code.push(text(" : "));
        code.extend(self.type_expr(&var.type_, false));

        let anchor = self.anchor(&var.id);
        let doc = self.docs(&var.doc);
        spec("instance-variable", anchor, vec![Node::Code(code)], doc)
    }

    /// Render the body of a class or class type.
    ///
    /// Documentation comments follow the same stop-marker visibility as
    /// module signatures, scoped to this class signature.
    pub fn class_signature(&mut self, sig: &ClassSignature) -> RenderResult<Rendered> {
        let mut out = Rendered::default();
        let mut visibility = CommentVisibility::new();

        for item in &sig.items {
            match item {
                ClassSignatureItem::Method(method) => {
                    let node = self.method(method);
                    out.push(node);
                }
                ClassSignatureItem::InstanceVariable(var) => {
                    let node = self.instance_variable(var);
                    out.push(node);
                }
                ClassSignatureItem::Constraint(lhs, rhs) => {
                    let mut code = vec![keyword("constraint"), text(" ")];
                    code.extend(self.type_expr(lhs, false));
                    code.push(text(" = "));
                    code.extend(self.type_expr(rhs, false));
                    out.push(spec("constraint", None, vec![Node::Code(code)], Vec::new()));
                }
                ClassSignatureItem::Inherit(ClassTypeExpr::Signature(_)) => {
                    return Err(RenderError::invariant(
                        self.tree.url(),
                        "class signature inherits an inline object signature",
                    ));
                }
                ClassSignatureItem::Inherit(expr) => {
                    let mut code = vec![keyword("inherit"), text(" ")];
                    code.extend(self.class_type_expr(expr));
                    out.push(spec("inherit", None, vec![Node::Code(code)], Vec::new()));
                }
                ClassSignatureItem::Comment(DocComment::Stop) => visibility.stop(),
                ClassSignatureItem::Comment(DocComment::Docs(docs)) => {
                    if visibility.is_visible() {
                        out.toc.extend(toc_entries(docs));
                        let body = self.docs(docs);
                        if !body.is_empty() {
                            out.push(div("odoc-comment", body));
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}
