// src/ui/redraw.rs
//! Redraw levels
//!
//! Every element record carries a pending [`Redraw`] level. State changes
//! raise it; the redraw pass consumes it. A `Full` redraw repaints the whole
//! element including frame and background. An `Incremental` redraw lets the
//! element repaint only the part that depends on its value (gauge fill,
//! checkbox mark, slider track, stepper readout).

/// Pending redraw level of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Redraw {
    #[default]
    None,
    Incremental,
    Full,
}

impl Redraw {
    /// Combine two requests; the stronger one wins.
    pub fn merge(self, other: Redraw) -> Redraw {
        self.max(other)
    }

    pub fn is_needed(self) -> bool {
        self != Redraw::None
    }

    pub fn is_full(self) -> bool {
        self == Redraw::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_strongest() {
        assert_eq!(Redraw::None.merge(Redraw::Incremental), Redraw::Incremental);
        assert_eq!(Redraw::Full.merge(Redraw::Incremental), Redraw::Full);
        assert_eq!(Redraw::Incremental.merge(Redraw::None), Redraw::Incremental);
        assert!(!Redraw::None.is_needed());
        assert!(Redraw::Incremental.is_needed());
    }
}
