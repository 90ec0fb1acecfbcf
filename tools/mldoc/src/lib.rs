//! mldoc: documentation site generator for resolved module interfaces.
//!
//! The command-line front end of [`mldoc_html`]. It loads interface trees
//! exchanged as JSON, applies the `mldoc.toml` configuration and writes the
//! rendered site.
//!
//! - [`config`]: the `mldoc.toml` file
//! - [`build`]: file discovery, rendering and site writing

#![warn(missing_docs)]

pub mod build;
pub mod config;
