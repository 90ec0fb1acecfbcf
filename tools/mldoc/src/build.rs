//! Site build.
//!
//! 1. Find interface files (`*.json`) under the inputs
//! 2. Render every root into a page tree
//! 3. Write the pages below the output directory
//!
//! A unit that fails to load or render is reported and skipped; the rest of
//! the site is still written.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use mldoc_html::{HtmlWriter, Page, PackageTable, RenderConfig, RenderedUnit, Renderer, UrlResolver};
use mldoc_interface::Root;
use std::fmt::Write as _;
use walkdir::WalkDir;

/// Build configuration.
pub struct BuildConfig {
    /// Interface files or directories holding them.
    pub inputs: Vec<Utf8PathBuf>,
    /// Output directory.
    pub output: Utf8PathBuf,
    /// Rendering options.
    pub render: RenderConfig,
    /// Root to package assignments.
    pub packages: PackageTable,
}

/// What a build produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Units written.
    pub units: usize,
    /// Pages written.
    pub pages: usize,
    /// Warnings recorded.
    pub warnings: usize,
    /// Units skipped because of an error.
    pub failed: usize,
}

/// Run the build.
pub fn run(config: &BuildConfig) -> Result<BuildSummary> {
    let files = find_interface_files(&config.inputs)?;
    tracing::info!("Found {} interface files", files.len());

    let writer = HtmlWriter::new()?;
    let mut summary = BuildSummary::default();
    for result in render_files(config, &files) {
        let unit = match result {
            Ok(unit) => unit,
            Err(e) => {
                tracing::error!("{e:#}");
                summary.failed += 1;
                continue;
            }
        };
        for warning in &unit.warnings {
            tracing::debug!("{warning}");
        }
        let pages = writer
            .write_site(&unit.page, &config.output)
            .with_context(|| format!("failed to write {}", unit.page.file()))?;
        summary.units += 1;
        summary.pages += pages;
        summary.warnings += unit.warnings.len();
    }

    tracing::info!(
        "Wrote {} pages for {} units to {} ({} warnings)",
        summary.pages,
        summary.units,
        config.output,
        summary.warnings
    );
    Ok(summary)
}

/// Render every file without writing anything.
pub fn render_files<'a>(
    config: &'a BuildConfig,
    files: &'a [Utf8PathBuf],
) -> impl Iterator<Item = Result<RenderedUnit>> + 'a {
    let resolver = UrlResolver::new(&config.packages, config.render.semantic_uris);
    files.iter().map(move |file| {
        tracing::debug!("Processing {file}");
        let root = Root::load(file)?;
        Renderer::new(&resolver, &config.packages, &config.render)
            .render(&root)
            .with_context(|| format!("failed to render {file}"))
    })
}

/// The page tree of every input.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TreeListing {
    /// One line per page, children indented under their parent.
    pub text: String,
    /// Units skipped because of an error.
    pub failed: usize,
}

/// List the page tree of every input. Failing units are reported and
/// skipped, as in [`run`].
pub fn tree(config: &BuildConfig) -> Result<TreeListing> {
    let files = find_interface_files(&config.inputs)?;
    let mut listing = TreeListing::default();
    for result in render_files(config, &files) {
        match result {
            Ok(unit) => format_tree(&unit.page, 0, &mut listing.text),
            Err(e) => {
                tracing::error!("{e:#}");
                listing.failed += 1;
            }
        }
    }
    Ok(listing)
}

fn format_tree(page: &Page, depth: usize, out: &mut String) {
    let _ = writeln!(out, "{}{}  {}", "  ".repeat(depth), page.file(), page.title);
    for child in &page.children {
        format_tree(child, depth + 1, out);
    }
}

/// Find all interface files, sorted.
pub fn find_interface_files(inputs: &[Utf8PathBuf]) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let Some(path) = Utf8Path::from_path(entry.path()) else {
                    tracing::warn!("Skipping non-UTF-8 path {:?}", entry.path());
                    continue;
                };
                if path.is_file() && is_interface_file(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            anyhow::bail!("input not found: {input}");
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_interface_file(path: &Utf8Path) -> bool {
    path.extension() == Some("json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mldoc_interface::{
        CompilationUnit, Docs, Identifier, Module, ModuleDecl, ModuleExpansion, ModuleTypeExpr,
        Recursive, Signature, SignatureItem,
    };

    fn utf8(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    fn unit_with_module(name: &str) -> Root {
        let root = Identifier::root(name);
        let m = root.module("M");
        Root::Unit(CompilationUnit::module(
            root,
            Docs::empty(),
            Signature::new(vec![SignatureItem::Module(
                Recursive::Ordinary,
                Module {
                    id: m,
                    doc: Docs::empty(),
                    type_: ModuleDecl::ModuleType(ModuleTypeExpr::Signature(Signature::default())),
                    expansion: Some(ModuleExpansion::AlreadyASig),
                },
            )]),
        ))
    }

    fn config(inputs: Vec<Utf8PathBuf>, output: Utf8PathBuf) -> BuildConfig {
        BuildConfig {
            inputs,
            output,
            render: RenderConfig::default(),
            packages: PackageTable::new().with("Foo", "foo"),
        }
    }

    #[test]
    fn test_build_writes_pages_and_skips_broken_units() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let input_dir = utf8(&input);

        unit_with_module("Foo").save(&input_dir.join("foo.json")).unwrap();
        std::fs::write(input_dir.join("broken.json"), "{").unwrap();
        std::fs::write(input_dir.join("notes.txt"), "ignored").unwrap();

        let summary = run(&config(vec![input_dir], utf8(&output))).unwrap();
        assert_eq!(
            summary,
            BuildSummary {
                units: 1,
                pages: 2,
                warnings: 0,
                failed: 1,
            }
        );
        assert!(utf8(&output).join("foo/Foo/index.html").is_file());
        assert!(utf8(&output).join("foo/Foo/M/index.html").is_file());
        assert!(utf8(&output).join("odoc.css").is_file());
    }

    #[test]
    fn test_tree_lists_pages() {
        let input = tempfile::tempdir().unwrap();
        let file = utf8(&input).join("foo.json");
        unit_with_module("Foo").save(&file).unwrap();

        let listing = tree(&config(vec![file], Utf8PathBuf::from("_html"))).unwrap();
        assert_eq!(
            listing.text,
            "foo/Foo/index.html  Module Foo\n  foo/Foo/M/index.html  Module Foo.M\n"
        );
        assert_eq!(listing.failed, 0);
    }

    #[test]
    fn test_tree_skips_broken_units() {
        let input = tempfile::tempdir().unwrap();
        let input_dir = utf8(&input);
        std::fs::write(input_dir.join("a_broken.json"), "{").unwrap();
        unit_with_module("Foo").save(&input_dir.join("foo.json")).unwrap();

        let listing = tree(&config(vec![input_dir], Utf8PathBuf::from("_html"))).unwrap();
        assert_eq!(listing.failed, 1);
        assert!(listing.text.starts_with("foo/Foo/index.html  Module Foo\n"));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let input = tempfile::tempdir().unwrap();
        let missing = utf8(&input).join("nope");
        assert!(find_interface_files(&[missing]).is_err());
    }
}
