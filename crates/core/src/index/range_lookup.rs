//! Innermost-range point queries over disjoint-or-nested ranges.

use crate::error::{CoreError, Result};
use semascope_api::models::TextRange;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Piece<V> {
    end: u32,
    /// Span of the input range this piece was cut from.
    origin: TextRange,
    value: V,
}

/// Maps an offset to the value of the innermost input range containing it.
///
/// Input ranges must be pairwise disjoint or nested; partial overlap is not
/// supported. Insertion order does not matter. The structure is rebuilt from
/// scratch when a file is re-indexed.
#[derive(Debug, Clone)]
pub struct NestedRangeLookup<V> {
    pieces: BTreeMap<u32, Piece<V>>,
}

impl<V> Default for NestedRangeLookup<V> {
    fn default() -> Self {
        Self {
            pieces: BTreeMap::new(),
        }
    }
}

impl<V: Clone> NestedRangeLookup<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<I>(ranges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (TextRange, V)>,
    {
        let mut lookup = Self::new();
        for (range, value) in ranges {
            lookup.insert(range, value)?;
        }
        Ok(lookup)
    }

    /// Insert `range` tagged with `value`.
    ///
    /// Zero-width ranges are dropped. A range whose start lies after its end
    /// is a bug in the caller and is rejected.
    pub fn insert(&mut self, range: TextRange, value: V) -> Result<()> {
        if range.start > range.end {
            return Err(CoreError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.is_empty() {
            return Ok(());
        }
        let (start, end) = (range.start, range.end);

        let mut keys: Vec<u32> = Vec::new();
        if let Some((&k, piece)) = self.pieces.range(..start).next_back() {
            if piece.end > start {
                keys.push(k);
            }
        }
        keys.extend(self.pieces.range(start..end).map(|(&k, _)| k));

        let mut cursor = start;
        for key in keys {
            let Some(piece) = self.pieces.remove(&key) else {
                continue;
            };

            if key < start {
                self.put(key, start, piece.origin, piece.value.clone());
            }

            let inner_start = key.max(start);
            let inner_end = piece.end.min(end);
            if cursor < inner_start {
                self.put(cursor, inner_start, range, value.clone());
            }

            // An enclosing (or identical) origin loses to the new range;
            // pieces cut from ranges nested inside it stay.
            if piece.origin.contains_range(range) {
                self.put(inner_start, inner_end, range, value.clone());
            } else {
                self.put(inner_start, inner_end, piece.origin, piece.value.clone());
            }

            if piece.end > end {
                self.put(end, piece.end, piece.origin, piece.value);
            }
            cursor = inner_end;
        }
        if cursor < end {
            self.put(cursor, end, range, value);
        }

        self.coalesce();
        Ok(())
    }

    fn put(&mut self, start: u32, end: u32, origin: TextRange, value: V) {
        if start < end {
            self.pieces.insert(start, Piece { end, origin, value });
        }
    }

    /// Merge adjacent pieces cut from the same input range.
    fn coalesce(&mut self) {
        let pieces = std::mem::take(&mut self.pieces);
        let mut last: Option<(u32, Piece<V>)> = None;
        for (start, piece) in pieces {
            if let Some((_, prev)) = last.as_mut() {
                if prev.end == start && prev.origin == piece.origin {
                    prev.end = piece.end;
                    continue;
                }
            }
            if let Some((s, p)) = last.replace((start, piece)) {
                self.pieces.insert(s, p);
            }
        }
        if let Some((s, p)) = last {
            self.pieces.insert(s, p);
        }
    }
}

impl<V> NestedRangeLookup<V> {
    /// Value of the innermost range containing `offset`.
    pub fn query(&self, offset: u32) -> Option<&V> {
        self.pieces
            .range(..=offset)
            .next_back()
            .filter(|(_, piece)| offset < piece.end)
            .map(|(_, piece)| &piece.value)
    }

    /// Resolved intervals in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (TextRange, &V)> {
        self.pieces
            .iter()
            .map(|(&start, piece)| (TextRange::new(start, piece.end), &piece.value))
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}
