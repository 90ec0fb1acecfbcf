//! Property tests for comment visibility, scope nesting and links.

use mldoc_html::markup::{plain_text, walk};
use mldoc_html::url::{relative_href, Url};
use mldoc_html::{Node, PackageTable, PageKind, PagePath, RenderConfig, Renderer, SiteTree, UrlResolver};
use mldoc_interface::{
    CompilationUnit, DocComment, Docs, Identifier, Module, ModuleDecl, ModuleExpansion,
    ModuleTypeExpr, Recursive, Root, Signature, SignatureItem,
};
use proptest::prelude::*;

fn render_unit(items: Vec<SignatureItem>) -> mldoc_html::RenderedUnit {
    let packages = PackageTable::new();
    let config = RenderConfig::default();
    let resolver = UrlResolver::new(&packages, false);
    let root = Root::Unit(CompilationUnit::module(
        Identifier::root("A"),
        Docs::empty(),
        Signature::new(items),
    ));
    Renderer::new(&resolver, &packages, &config)
        .render(&root)
        .unwrap()
}

fn comments(nodes: &[Node]) -> Vec<String> {
    let mut out = Vec::new();
    walk(nodes, &mut |node| {
        if let Node::Div {
            class, children, ..
        } = node
        {
            if class == "odoc-comment" {
                out.push(plain_text(children));
            }
        }
    });
    out
}

/// A chain of modules nested `depth` deep, each with an expansion.
fn nested(parent: &Identifier, depth: usize) -> Vec<SignatureItem> {
    if depth == 0 {
        return Vec::new();
    }
    let id = parent.module(format!("M{depth}"));
    let inner = nested(&id, depth - 1);
    vec![SignatureItem::Module(
        Recursive::Ordinary,
        Module {
            id,
            doc: Docs::empty(),
            type_: ModuleDecl::ModuleType(ModuleTypeExpr::Signature(Signature::new(inner))),
            expansion: Some(ModuleExpansion::AlreadyASig),
        },
    )]
}

fn segment() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c"]).prop_map(str::to_string)
}

proptest! {
    // A comment renders iff an even number of stop markers precede it.
    #[test]
    fn comment_visible_after_even_stops(stops in prop::collection::vec(any::<bool>(), 0..24)) {
        let mut items = Vec::new();
        let mut expected = Vec::new();
        let mut seen = 0usize;
        for (i, is_stop) in stops.iter().enumerate() {
            if *is_stop {
                seen += 1;
                items.push(SignatureItem::Comment(DocComment::Stop));
            } else {
                let text = format!("c{i}");
                if seen % 2 == 0 {
                    expected.push(text.clone());
                }
                items.push(SignatureItem::Comment(DocComment::Docs(Docs::text(text))));
            }
        }

        let unit = render_unit(items);
        prop_assert_eq!(comments(&unit.page.body), expected);
    }

    // Entering and leaving in reverse order always empties the tree.
    #[test]
    fn scopes_balance(names in prop::collection::vec("[A-Z][a-z]{0,4}", 0..12)) {
        let mut tree = SiteTree::new();
        let mut handles = Vec::new();
        for name in &names {
            handles.push(tree.enter(PageKind::Module, name));
        }
        prop_assert_eq!(tree.depth(), names.len());
        prop_assert_eq!(tree.current().join("/"), names.join("/"));

        while let Some(handle) = handles.pop() {
            prop_assert!(tree.leave(handle).is_ok());
        }
        prop_assert!(tree.is_empty());
    }

    // Every nested expansion yields exactly one page, one level deeper.
    #[test]
    fn nested_expansions_make_one_page_each(depth in 0usize..8) {
        let unit = render_unit(nested(&Identifier::root("A"), depth));
        prop_assert_eq!(unit.page.count(), depth + 1);

        let mut page = &unit.page;
        while let Some(child) = page.children.first() {
            prop_assert_eq!(child.path.len(), page.path.len() + 1);
            page = child;
        }
        prop_assert_eq!(page.path.len(), depth + 2);
        prop_assert!(unit.warnings.is_empty());
    }

    // A relative href climbs out of the source page exactly as far as the
    // common prefix requires.
    #[test]
    fn relative_href_climbs_to_common_prefix(
        from in prop::collection::vec(segment(), 1..5),
        to in prop::collection::vec(segment(), 1..5),
    ) {
        let target = Url {
            page: to.iter().cloned().collect::<PagePath>(),
            anchor: Some("val-x".to_string()),
            kind: "value",
        };
        let href = relative_href(&from, &target, false);

        if from == to {
            prop_assert_eq!(href, "#val-x");
        } else {
            let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
            let ups = href.matches("../").count();
            prop_assert_eq!(ups, from.len() - common);
            let expected_tail = format!("{}/index.html#val-x", to[common..].join("/"));
            prop_assert!(href.ends_with(&expected_tail) || common == to.len());
        }
    }
}
