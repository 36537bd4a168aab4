use serde::{Deserialize, Serialize};

/// Zero-based line and UTF-16 column, the way editors count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub line: u32,
    pub col: u32,
}

pub struct LineMap {
    line_starts: Vec<usize>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// `offset` must lie on a char boundary of `text`.
    pub fn offset_to_point(&self, text: &str, offset: usize) -> Point {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => Point {
                line: line as u32,
                col: 0,
            },
            Err(next_line_idx) => {
                let line = next_line_idx - 1;
                let line_start = self.line_starts[line];
                let col = text[line_start..offset].encode_utf16().count();
                Point {
                    line: line as u32,
                    col: col as u32,
                }
            }
        }
    }

    /// Position just past the last character.
    pub fn end_point(&self, text: &str) -> Point {
        self.offset_to_point(text, text.len())
    }
}
