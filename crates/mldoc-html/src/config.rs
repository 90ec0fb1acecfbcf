//! Renderer configuration.

use serde::{Deserialize, Serialize};

/// Options that apply to a whole rendering run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Expand includes that carry neither `@open` nor `@closed`.
    pub default_open: bool,
    /// Link to directories (`M/`) instead of files (`M/index.html`).
    pub semantic_uris: bool,
}
