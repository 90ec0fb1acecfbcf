//! Entity dispatcher.
//!
//! Maps every signature item to its markup. Modules, module types, functor
//! arguments, classes and class types that carry an expansion get a page of
//! their own: the scope is entered, the expansion rendered into a child
//! page, the scope left, and the item's name in the parent becomes a link
//! to that page. Without an expansion the name stays plain text and no page
//! is produced.

use crate::docs::toc_entries;
use crate::error::{RenderError, RenderResult};
use crate::generator::{Generator, Rendered};
use crate::markup::{div, keyword, spec, text, Markup, Node};
use crate::tree::{Page, PageKind};
use crate::visibility::CommentVisibility;
use mldoc_interface::{
    CompilationUnit, DocComment, DocPage, Docs, FunctorArgument, Identifier, IdentifierKind,
    Include, Module, ModuleDecl, ModuleExpansion, ModuleSubstitution, ModuleType, ModuleTypeExpr,
    Recursive, Root, Signature, SignatureItem, Tag, UnitContent,
};

/// An expansion with the "reuse my own signature" sentinel resolved.
#[derive(Clone, Copy)]
enum Expansion<'e> {
    Signature(&'e Signature),
    Functor(&'e [Option<FunctorArgument>], &'e Signature),
}

impl Generator<'_> {
    /// Resolve the sentinel against the declared module type `own`.
    fn expansion<'e>(
        &self,
        id: &Identifier,
        expansion: &'e ModuleExpansion,
        own: Option<&'e ModuleTypeExpr>,
    ) -> RenderResult<Expansion<'e>> {
        match expansion {
            ModuleExpansion::AlreadyASig => match own {
                Some(ModuleTypeExpr::Signature(sig)) => Ok(Expansion::Signature(sig)),
                _ => Err(RenderError::invariant(
                    self.tree.url(),
                    format!("`{id}` reuses its declared signature, but it is not declared with one"),
                )),
            },
            ModuleExpansion::Signature(sig) => Ok(Expansion::Signature(sig)),
            ModuleExpansion::Functor(args, result) => Ok(Expansion::Functor(args, result)),
        }
    }

    /// Render an expansion as the page of the current scope.
    fn expansion_page(
        &mut self,
        title: String,
        doc: &Docs,
        expansion: Expansion<'_>,
    ) -> RenderResult<Page> {
        let header = self.docs(doc);
        let mut toc = toc_entries(doc);
        let rendered = match expansion {
            Expansion::Signature(sig) => self.signature(sig)?,
            Expansion::Functor(args, result) => self.functor_expansion(args, result)?,
        };
        toc.extend(rendered.toc);
        self.tree.make(title, header, toc, rendered.body, rendered.pages)
    }

    /// Render a signature, item by item.
    ///
    /// Documentation comments are subject to the stop-marker visibility of
    /// this signature only; declarations always render.
    pub fn signature(&mut self, sig: &Signature) -> RenderResult<Rendered> {
        let mut out = Rendered::default();
        self.signature_items(sig, &mut CommentVisibility::new(), &mut out)?;
        Ok(out)
    }

    /// Render the items of `sig` into `out` under an existing visibility
    /// state. Inlined includes share the state of the enclosing signature.
    fn signature_items(
        &mut self,
        sig: &Signature,
        visibility: &mut CommentVisibility,
        out: &mut Rendered,
    ) -> RenderResult<()> {
        for item in sig.items() {
            match item {
                SignatureItem::Module(recursive, module) => {
                    let (node, page) = self.module(*recursive, module)?;
                    out.push(node);
                    out.pages.extend(page);
                }
                SignatureItem::ModuleType(module_type) => {
                    let (node, page) = self.module_type(module_type)?;
                    out.push(node);
                    out.pages.extend(page);
                }
                SignatureItem::ModuleSubstitution(subst) => {
                    let node = self.module_substitution(subst);
                    out.push(node);
                }
                SignatureItem::Type(recursive, decl) => {
                    let node = self.type_decl(*recursive, decl, false);
                    out.push(node);
                }
                SignatureItem::TypeSubstitution(decl) => {
                    let node = self.type_decl(Recursive::Ordinary, decl, true);
                    out.push(node);
                }
                SignatureItem::TypeExtension(ext) => {
                    let node = self.extension(ext);
                    out.push(node);
                }
                SignatureItem::Exception(exn) => {
                    let node = self.exception(exn);
                    out.push(node);
                }
                SignatureItem::Value(value) => {
                    let node = self.value(value);
                    out.push(node);
                }
                SignatureItem::External(ext) => {
                    let node = self.external(ext);
                    out.push(node);
                }
                SignatureItem::Class(recursive, class) => {
                    let (node, page) = self.class(*recursive, class)?;
                    out.push(node);
                    out.pages.extend(page);
                }
                SignatureItem::ClassType(recursive, class_type) => {
                    let (node, page) = self.class_type(*recursive, class_type)?;
                    out.push(node);
                    out.pages.extend(page);
                }
                SignatureItem::Include(include) if include.doc.has_tag(&Tag::Inline) => {
                    self.signature_items(&include.expansion, visibility, out)?;
                }
                SignatureItem::Include(include) => {
                    let rendered = self.include(include)?;
                    out.append(rendered);
                }
                SignatureItem::Comment(DocComment::Stop) => visibility.stop(),
                SignatureItem::Comment(DocComment::Docs(docs)) => {
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
        Ok(())
    }

    /// The name of a page-owning item: a link when an expansion page was
    /// produced, plain text otherwise. Documentation shown in the parent is
    /// shortened to its synopsis when the full text leads the child page.
    fn head(
        &mut self,
        kind: PageKind,
        name: &str,
        doc: &Docs,
        page: Option<&Page>,
    ) -> (Node, Markup) {
        match page {
            Some(_) => (self.child_link(kind, name, name), self.synopsis(doc)),
            None => (text(name), self.docs(doc)),
        }
    }

    fn module(&mut self, recursive: Recursive, module: &Module) -> RenderResult<(Node, Option<Page>)> {
        let name = module.id.name();
        let decl = self.module_decl(&module.id, &module.type_)?;

        let page = match &module.expansion {
            None => None,
            Some(expansion) => {
                let own = match &module.type_ {
                    ModuleDecl::ModuleType(expr) => Some(expr),
                    ModuleDecl::Alias(_) => None,
                };
                let expansion = self.expansion(&module.id, expansion, own)?;
                let title = format!("{} {}", PageKind::Module.title(), module.id);
                Some(self.in_page(PageKind::Module, name, |gen| {
                    gen.expansion_page(title, &module.doc, expansion)
                })?)
            }
        };
        let (name_node, doc) = self.head(PageKind::Module, name, &module.doc, page.as_ref());

        let head = match recursive {
            Recursive::Ordinary | Recursive::Nonrec => "module",
            Recursive::Rec => "module rec",
            Recursive::And => "and",
        };
        let mut code = vec![keyword(head), text(" "), name_node];
        code.extend(decl);

        let anchor = self.anchor(&module.id);
        Ok((spec("module", anchor, vec![Node::Code(code)], doc), page))
    }

    fn module_type(&mut self, module_type: &ModuleType) -> RenderResult<(Node, Option<Page>)> {
        let name = module_type.id.name();
        let mut tail = Vec::new();
        if let Some(expr) = &module_type.expr {
            tail.push(text(" = "));
            tail.extend(self.mty(&module_type.id, expr)?);
        }

        let page = match &module_type.expansion {
            None => None,
            Some(expansion) => {
                let expansion =
                    self.expansion(&module_type.id, expansion, module_type.expr.as_ref())?;
                let title = format!("{} {}", PageKind::ModuleType.title(), module_type.id);
                Some(self.in_page(PageKind::ModuleType, name, |gen| {
                    gen.expansion_page(title, &module_type.doc, expansion)
                })?)
            }
        };
        let (name_node, doc) =
            self.head(PageKind::ModuleType, name, &module_type.doc, page.as_ref());

        let mut code = vec![keyword("module type"), text(" "), name_node];
        code.extend(tail);

        let anchor = self.anchor(&module_type.id);
        Ok((spec("module-type", anchor, vec![Node::Code(code)], doc), page))
    }

    fn module_substitution(&mut self, subst: &ModuleSubstitution) -> Node {
        let mut code = vec![
            keyword("module"),
            text(" "),
            text(subst.id.name()),
            text(" := "),
        ];
        code.extend(self.path(&subst.manifest, true));

        let anchor = self.anchor(&subst.id);
        let doc = self.docs(&subst.doc);
        spec("module-substitution", anchor, vec![Node::Code(code)], doc)
    }

    /// Parameters and result of a functor expansion.
    ///
    /// Arguments are numbered by their 1-based position in the parameter
    /// list; elided arguments keep their position but render nothing.
    fn functor_expansion(
        &mut self,
        args: &[Option<FunctorArgument>],
        result: &Signature,
    ) -> RenderResult<Rendered> {
        let mut out = Rendered::default();
        let mut params = Vec::new();
        for (index, arg) in args.iter().enumerate() {
            let Some(arg) = arg else { continue };
            let (item, page) = self.functor_argument(index + 1, arg)?;
            params.push(item);
            out.pages.extend(page);
        }
        let sig = self.signature(result)?;

        out.push(Node::Heading {
            level: 3,
            id: Some("parameters".to_string()),
            children: vec![text("Parameters")],
        });
        out.push(Node::List {
            ordered: false,
            items: params,
        });
        out.push(Node::Heading {
            level: 3,
            id: Some("signature".to_string()),
            children: vec![text("Signature")],
        });
        out.append(sig);
        Ok(out)
    }

    fn functor_argument(
        &mut self,
        position: usize,
        arg: &FunctorArgument,
    ) -> RenderResult<(Markup, Option<Page>)> {
        match arg.id.kind {
            IdentifierKind::Argument { position: declared } if declared == position => {}
            IdentifierKind::Argument { position: declared } => {
                return Err(RenderError::invariant(
                    self.tree.url(),
                    format!(
                        "functor argument `{}` at position {position} claims position {declared}",
                        arg.id
                    ),
                ));
            }
            other => {
                return Err(RenderError::invariant(
                    self.tree.url(),
                    format!(
                        "functor argument `{}` has a {} identifier",
                        arg.id,
                        other.label()
                    ),
                ));
            }
        }

        let name = arg.id.name();
        let page_name = format!("{position}-{name}");
        let mty = self.mty(&arg.id, &arg.expr)?;

        let page = match &arg.expansion {
            None => None,
            Some(expansion) => {
                let expansion = self.expansion(&arg.id, expansion, Some(&arg.expr))?;
                let title = format!("{} {}", PageKind::Argument.title(), arg.id);
                Some(self.in_page(PageKind::Argument, &page_name, |gen| {
                    gen.expansion_page(title, &Docs::empty(), expansion)
                })?)
            }
        };
        let name_node = match page {
            Some(_) => self.child_link(PageKind::Argument, &page_name, name),
            None => text(name),
        };

        let mut code = vec![name_node, text(" : ")];
        code.extend(mty);
        let anchor = self.anchor(&arg.id);
        Ok((vec![spec("argument", anchor, vec![Node::Code(code)], Vec::new())], page))
    }

    /// Render a collapsible include.
    ///
    /// The block is expanded when tagged `@open`, or when the default is
    /// open and the include is not tagged `@closed`. Its items get their own
    /// comment visibility. `@inline` includes never get here: their items
    /// are spliced into the enclosing signature.
    fn include(&mut self, include: &Include) -> RenderResult<Rendered> {
        let open = include.doc.has_tag(&Tag::Open)
            || (self.config.default_open && !include.doc.has_tag(&Tag::Closed));

        let mut summary = vec![keyword("include"), text(" ")];
        summary.extend(self.module_decl_body(&include.parent, &include.decl)?);
        let doc = self.docs(&include.doc);
        let inner = self.signature(&include.expansion)?;

        let mut children = Vec::new();
        if !doc.is_empty() {
            children.push(div("spec-doc", doc));
        }
        children.push(Node::Details {
            open,
            summary: vec![Node::Code(summary)],
            body: inner.body,
        });
        Ok(Rendered {
            body: vec![div("spec include", children)],
            toc: inner.toc,
            pages: inner.pages,
        })
    }

    /// Render a root unit or page inside its package.
    pub fn root(&mut self, package: &str, root: &Root) -> RenderResult<Page> {
        self.in_page(PageKind::Package, package, |gen| match root {
            Root::Unit(unit) => {
                gen.in_page(PageKind::Unit, unit.id.name(), |gen| gen.unit(unit))
            }
            Root::Page(page) => {
                gen.in_page(PageKind::Page, page.name.name(), |gen| gen.doc_page(page))
            }
        })
    }

    fn unit(&mut self, unit: &CompilationUnit) -> RenderResult<Page> {
        let header = self.docs(&unit.doc);
        let mut toc = toc_entries(&unit.doc);
        let title = format!("{} {}", PageKind::Unit.title(), unit.id);

        let rendered = match &unit.content {
            UnitContent::Module(sig) => self.signature(sig)?,
            UnitContent::Pack(packed) => {
                let mut out = Rendered::default();
                for item in packed {
                    let mut code = vec![
                        keyword("module"),
                        text(" "),
                        text(item.id.name()),
                        text(" = "),
                    ];
                    code.extend(self.path(&item.path, false));
                    let anchor = self.anchor(&item.id);
                    out.push(spec("module", anchor, vec![Node::Code(code)], Vec::new()));
                }
                out
            }
        };
        toc.extend(rendered.toc);
        self.tree.make(title, header, toc, rendered.body, rendered.pages)
    }

    fn doc_page(&mut self, page: &DocPage) -> RenderResult<Page> {
        let body = self.docs(&page.content);
        let toc = toc_entries(&page.content);
        self.tree
            .make(page.name.name().to_string(), Vec::new(), toc, body, Vec::new())
    }
}
