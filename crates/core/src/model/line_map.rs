use semascope_api::models::LineCol;

/// Conversion between byte offsets and zero-based line/column positions.
///
/// Columns count bytes from the start of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    line_starts: Vec<u32>,
    len: u32,
}

impl Default for LineMap {
    fn default() -> Self {
        Self {
            line_starts: vec![0],
            len: 0,
        }
    }
}

impl LineMap {
    pub fn from_text(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Build from precomputed line start offsets, as delivered by a parser
    /// that already scanned the text.
    pub fn from_line_starts(mut line_starts: Vec<u32>, len: u32) -> Self {
        if line_starts.first() != Some(&0) {
            line_starts.insert(0, 0);
        }
        line_starts.sort_unstable();
        line_starts.dedup();
        Self { line_starts, len }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Offset of a position, or `None` when the line does not exist.
    /// Columns past the end of a line are clamped to it.
    pub fn offset(&self, pos: LineCol) -> Option<u32> {
        let start = *self.line_starts.get(pos.line as usize)?;
        let line_end = self
            .line_starts
            .get(pos.line as usize + 1)
            .map(|next| next - 1)
            .unwrap_or(self.len);
        Some((start + pos.col).min(line_end))
    }

    pub fn line_col(&self, offset: u32) -> LineCol {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|start| *start <= offset) - 1;
        LineCol::new(line as u32, offset - self.line_starts[line])
    }
}
