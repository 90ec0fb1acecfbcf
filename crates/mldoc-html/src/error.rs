//! Errors and diagnostics of the renderer.

use mldoc_interface::IdentifierKind;
use thiserror::Error;

/// A link or anchor could not be computed.
///
/// These failures are recoverable: the affected text renders without a link.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The identifier kind has no in-page anchor.
    #[error("no anchor for {kind} `{name}`")]
    NoAnchor {
        /// Kind label.
        kind: &'static str,
        /// Identifier name.
        name: String,
    },

    /// No page contains the identifier.
    #[error("no page for {kind} `{name}`")]
    NoPage {
        /// Kind label.
        kind: &'static str,
        /// Identifier name.
        name: String,
    },

    /// The row or reference has no resolvable target.
    #[error("unresolved target: {0}")]
    Unresolved(String),
}

impl ResolveError {
    pub(crate) fn no_anchor(kind: IdentifierKind, name: &str) -> Self {
        Self::NoAnchor {
            kind: kind.label(),
            name: name.to_string(),
        }
    }

    pub(crate) fn no_page(kind: IdentifierKind, name: &str) -> Self {
        Self::NoPage {
            kind: kind.label(),
            name: name.to_string(),
        }
    }
}

/// Fatal rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The interface tree breaks one of its own structural rules.
    ///
    /// This points at a bug in the extraction step; the unit is not emitted.
    #[error("malformed interface in {context}: {detail}")]
    InvariantViolation {
        /// Where the violation was detected.
        context: String,
        /// What was wrong.
        detail: String,
    },

    /// Page template failure.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// IO error while writing pages.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub(crate) fn invariant(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            context: context.into(),
            detail: detail.into(),
        }
    }
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// A recoverable problem met while rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    /// URL path of the page being rendered.
    pub page: String,
    /// What went wrong.
    pub message: String,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.page, self.message)
    }
}
