use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open source offset interval `[start, end)`.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True when `other` lies entirely inside `self` (equal ranges included).
    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn intersects(&self, other: TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.start, self.end)
    }
}

impl From<std::ops::Range<u32>> for TextRange {
    fn from(r: std::ops::Range<u32>) -> Self {
        Self::new(r.start, r.end)
    }
}

/// Zero-based line and column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_containment() {
        let r = TextRange::new(3, 7);
        assert!(!r.contains(2));
        assert!(r.contains(3));
        assert!(r.contains(6));
        assert!(!r.contains(7));
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn test_empty_range_contains_nothing() {
        let r = TextRange::new(5, 5);
        assert!(r.is_empty());
        assert!(!r.contains(5));
    }

    #[test]
    fn test_range_nesting() {
        let outer = TextRange::new(0, 10);
        assert!(outer.contains_range(TextRange::new(2, 4)));
        assert!(outer.contains_range(outer));
        assert!(!outer.contains_range(TextRange::new(8, 12)));
        assert!(outer.intersects(TextRange::new(8, 12)));
        assert!(!outer.intersects(TextRange::new(10, 12)));
    }
}
