//! Resource tracks (HP and WP).
//!
//! A track is a numeric value clamped between zero and a maximum.

use serde::{Deserialize, Serialize};

/// A numeric resource clamped to `0..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Current value.
    pub current: i32,
    /// Maximum value.
    pub max: i32,
}

impl Track {
    /// Create a new track starting at its maximum value.
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// Create a track with a starting value, clamped into range.
    pub fn with_current(current: i32, max: i32) -> Self {
        let max = max.max(0);
        Self {
            current: current.clamp(0, max),
            max,
        }
    }

    /// Adjust the track by a delta, clamping to bounds. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.current = self.current.saturating_add(delta).clamp(0, self.max);
        self.current
    }

    /// Raise the track to its maximum.
    pub fn fill(&mut self) {
        self.current = self.max;
    }

    /// Returns true if the track is at zero.
    pub fn is_empty(&self) -> bool {
        self.current <= 0
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_at_max() {
        let t = Track::new(10);
        assert_eq!(t.current, 10);
        assert_eq!(t.max, 10);
        assert!(!t.is_empty());
    }

    #[test]
    fn with_current_clamps_initial() {
        assert_eq!(Track::with_current(100, 10).current, 10);
        assert_eq!(Track::with_current(-3, 10).current, 0);
    }

    #[test]
    fn adjust_clamps_both_ways() {
        let mut t = Track::new(5);
        assert_eq!(t.adjust(10), 5);
        assert_eq!(t.adjust(-20), 0);
        assert!(t.is_empty());
        assert_eq!(t.adjust(i32::MAX), 5);
        assert_eq!(t.adjust(i32::MIN), 0);
    }

    #[test]
    fn fill_restores_max() {
        let mut t = Track::with_current(2, 10);
        t.fill();
        assert_eq!(t.current, 10);
        t.fill();
        assert_eq!(t.current, 10);
    }

    #[test]
    fn display() {
        assert_eq!(Track::with_current(3, 10).to_string(), "3/10");
    }
}
