//! Source location information for nodes.

use std::fmt;

/// Start position of a node in the original source text.
///
/// Recorded from the parser marker of the event that opened the node, and
/// reported in conversion errors so a human can find the offending scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    /// Byte offset from start of source (0-based)
    pub offset: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters not bytes)
    pub col: usize,
}

impl SourceInfo {
    pub fn new(offset: usize, line: usize, col: usize) -> Self {
        Self { offset, line, col }
    }

    /// Create a SourceInfo from a yaml-rust2::Marker.
    pub fn from_marker(marker: &yaml_rust2::scanner::Marker) -> Self {
        Self {
            offset: marker.index(),
            // yaml-rust2 lines are already 1-based, columns are 0-based
            line: marker.line(),
            col: marker.col() + 1,
        }
    }
}

impl Default for SourceInfo {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            col: 1,
        }
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let info = SourceInfo::default();
        assert_eq!(info.offset, 0);
        assert_eq!(info.line, 1);
        assert_eq!(info.col, 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceInfo::new(10, 2, 5).to_string(), "line 2, column 5");
    }
}
