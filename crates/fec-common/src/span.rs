use std::fmt;

use serde::Serialize;

/// Identifies a source file within the compilation's source map.
///
/// Index into a driver-owned table of file paths; `FileId(0)` is conventionally
/// the crate root (or `-` for standard input, per spec.md's CLI surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FileId(pub u32);

impl FileId {
    pub const ROOT: FileId = FileId(0);
}

/// A source position: `(filename, start_line, start_col, end_line, end_col)`.
///
/// Lines and columns are 1-based. Column counting is byte-offset within the
/// current line (not a codepoint count), matching the lexer's contract.
/// Created by the lexer, propagated unchanged by the parser, and preserved by
/// lowering -- every AST and HIR node carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub file: FileId,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(file: FileId, start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            file,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// A zero-width span at a single position, used for synthetic nodes
    /// introduced by lowering (e.g. the fresh label on a desugared `while`).
    pub fn point(file: FileId, line: u32, col: u32) -> Self {
        Self::new(file, line, col, line, col)
    }

    /// Merge two spans into one that covers both. Both must belong to the
    /// same file.
    pub fn merge(self, other: Span) -> Span {
        debug_assert_eq!(self.file, other.file, "cannot merge spans across files");
        let (start_line, start_col) = if (self.start_line, self.start_col) <= (other.start_line, other.start_col) {
            (self.start_line, self.start_col)
        } else {
            (other.start_line, other.start_col)
        };
        let (end_line, end_col) = if (self.end_line, self.end_col) >= (other.end_line, other.end_col) {
            (self.end_line, self.end_col)
        } else {
            (other.end_line, other.end_col)
        };
        Span {
            file: self.file,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// Tracks line-start byte offsets for a single source file so the lexer can
/// convert its running byte cursor into `(line, col)` pairs as it scans,
/// without a second pass over the text.
#[derive(Debug, Default)]
pub struct LineTracker {
    line: u32,
    line_start_byte: u32,
}

impl LineTracker {
    pub fn new() -> Self {
        Self {
            line: 1,
            line_start_byte: 0,
        }
    }

    /// Column (1-based, byte offset within the line) for the given absolute
    /// byte offset.
    pub fn col(&self, byte_offset: u32) -> u32 {
        byte_offset - self.line_start_byte + 1
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Record that a `\n` byte was just consumed at `byte_offset_after`, the
    /// absolute byte offset immediately following it.
    pub fn newline(&mut self, byte_offset_after: u32) {
        self.line += 1;
        self.line_start_byte = byte_offset_after;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_takes_the_union() {
        let a = Span::new(FileId::ROOT, 1, 1, 1, 5);
        let b = Span::new(FileId::ROOT, 1, 3, 2, 1);
        let m = a.merge(b);
        assert_eq!(m, Span::new(FileId::ROOT, 1, 1, 2, 1));
    }

    #[test]
    fn line_tracker_tracks_columns() {
        let mut t = LineTracker::new();
        assert_eq!(t.col(0), 1);
        assert_eq!(t.col(4), 5);
        t.newline(5);
        assert_eq!(t.line(), 2);
        assert_eq!(t.col(5), 1);
        assert_eq!(t.col(8), 4);
    }
}
