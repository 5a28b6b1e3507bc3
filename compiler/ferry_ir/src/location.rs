//! Source positions.
//!
//! The front end resolves byte offsets to line/column pairs before handing
//! the tree over; the backend only ever prints them.

use std::fmt;

/// A 1-based line/column position in the program's source file.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLoc {
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    /// Position for synthesized nodes that have no source text.
    pub const SYNTHETIC: SourceLoc = SourceLoc { line: 0, column: 0 };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        SourceLoc { line, column }
    }

    #[inline]
    pub const fn is_synthetic(self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

impl fmt::Debug for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
