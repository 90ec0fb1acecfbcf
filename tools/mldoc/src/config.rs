//! The `mldoc.toml` configuration file.
//!
//! ```toml
//! [render]
//! default_open = true
//! semantic_uris = false
//!
//! [packages]
//! Stdlib = "stdlib"
//! ```

use anyhow::{Context, Result};
use camino::Utf8Path;
use mldoc_html::{PackageTable, RenderConfig};
use serde::{Deserialize, Serialize};
use rustc_hash::FxHashMap;

/// Contents of `mldoc.toml`. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering options.
    pub render: RenderConfig,
    /// Root module name to package name.
    pub packages: FxHashMap<String, String>,
}

impl Config {
    /// Load a configuration file.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        Self::parse(&content).with_context(|| format!("invalid config file {path}"))
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Add `ROOT=PKG` assignments given on the command line.
    pub fn add_packages<'a>(&mut self, assignments: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for assignment in assignments {
            let (root, package) = assignment
                .split_once('=')
                .filter(|(root, package)| !root.is_empty() && !package.is_empty())
                .with_context(|| format!("expected ROOT=PKG, got `{assignment}`"))?;
            self.packages.insert(root.to_string(), package.to_string());
        }
        Ok(())
    }

    /// The package resolver backed by the `[packages]` table.
    #[must_use]
    pub fn package_table(&self) -> PackageTable {
        self.packages
            .iter()
            .map(|(root, package)| (root.as_str(), package.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mldoc_html::PackageResolver;
    use mldoc_interface::Identifier;

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
            [render]
            default_open = true

            [packages]
            Stdlib = "stdlib"
            "#,
        )
        .unwrap();

        assert!(config.render.default_open);
        assert!(!config.render.semantic_uris);
        assert_eq!(config.packages.get("Stdlib").map(String::as_str), Some("stdlib"));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_add_packages() {
        let mut config = Config::default();
        config.add_packages(["Foo=foo", "Bar=bar"]).unwrap();
        assert!(config.add_packages(["Baz"]).is_err());
        assert!(config.add_packages(["=baz"]).is_err());

        let table = config.package_table();
        assert_eq!(table.package_name(&Identifier::root("Foo").module("M")), "foo");
        assert_eq!(table.package_name(&Identifier::root("Qux")), "Qux");
    }
}
