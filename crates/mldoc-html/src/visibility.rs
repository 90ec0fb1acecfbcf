//! Visibility of documentation comments inside one signature.
//!
//! A stop marker `(**/**)` hides the free-standing documentation comments
//! that follow it, until the next stop marker shows them again. Declarations
//! are not affected. The state starts visible for every signature traversal
//! and is never shared between signatures.

/// Current visibility of documentation comments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Comments render.
    #[default]
    Visible,
    /// Comments are dropped.
    Hidden,
}

impl Visibility {
    /// The state after one stop marker.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Visible => Self::Hidden,
            Self::Hidden => Self::Visible,
        }
    }
}

/// Tracks comment visibility across one signature traversal.
#[derive(Debug, Default)]
pub struct CommentVisibility {
    state: Visibility,
}

impl CommentVisibility {
    /// Fresh state, visible.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stop marker.
    pub fn stop(&mut self) {
        self.state = self.state.toggled();
    }

    /// Returns true while comments render.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state == Visibility::Visible
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> Visibility {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_visible() {
        assert!(CommentVisibility::new().is_visible());
    }

    #[test]
    fn test_stop_toggles() {
        let mut vis = CommentVisibility::new();
        vis.stop();
        assert_eq!(vis.state(), Visibility::Hidden);
        vis.stop();
        assert_eq!(vis.state(), Visibility::Visible);
    }
}
