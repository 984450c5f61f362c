//! Section nesting levels
//!
//! The tracker keeps an unsigned depth counter (0 = chapter) and maps it to a
//! sectioning command through a fixed ordered table. Depths past the end of the
//! table reuse the deepest command, so arbitrarily deep nesting still produces
//! valid markup while begin/end pairs stay balanced on the raw counter.

use std::fmt;
use thiserror::Error;

/// Errors raised by the level tracker
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// A section was ended at depth 0 (more ends than begins)
    #[error("cannot end a section: no section is open above the chapter level")]
    Underflow,
}

/// Structural nesting level, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NestingLevel {
    Chapter,
    Section,
    Subsection,
    SubSubsection,
    Paragraph,
    SubParagraph,
}

impl NestingLevel {
    /// All levels in depth order
    pub const ALL: [NestingLevel; 6] = [
        NestingLevel::Chapter,
        NestingLevel::Section,
        NestingLevel::Subsection,
        NestingLevel::SubSubsection,
        NestingLevel::Paragraph,
        NestingLevel::SubParagraph,
    ];

    /// The deepest level; deeper nesting reuses it
    pub const DEEPEST: NestingLevel = NestingLevel::SubParagraph;

    /// Level for a raw depth, saturating at [`NestingLevel::DEEPEST`]
    pub fn from_depth(depth: usize) -> Self {
        Self::ALL[depth.min(Self::ALL.len() - 1)]
    }

    /// Depth of this level (0 = chapter)
    pub fn depth(self) -> usize {
        self as usize
    }

    /// LaTeX command name, without the backslash
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Section => "section",
            Self::Subsection => "subsection",
            Self::SubSubsection => "subsubsection",
            Self::Paragraph => "paragraph",
            Self::SubParagraph => "subparagraph",
        }
    }

    /// Run-in headings that get `\hfill` and a blank line after the title
    pub fn is_run_in(self) -> bool {
        matches!(self, Self::Paragraph | Self::SubParagraph)
    }
}

impl fmt::Display for NestingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_name())
    }
}

/// Depth counter for open sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTracker {
    depth: usize,
}

impl LevelTracker {
    /// Start tracking at `start`
    pub fn new(start: NestingLevel) -> Self {
        Self {
            depth: start.depth(),
        }
    }

    /// Level the next section will open at
    pub fn current(&self) -> NestingLevel {
        NestingLevel::from_depth(self.depth)
    }

    /// Raw depth, which may exceed the deepest level
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Open a section: returns the level to emit and moves one level deeper
    pub fn descend(&mut self) -> NestingLevel {
        let level = self.current();
        self.depth += 1;
        level
    }

    /// Close a section
    ///
    /// # Returns
    /// * `Ok(())` - Moved one level up
    /// * `Err(LevelError::Underflow)` - Already at depth 0; the depth is unchanged
    pub fn ascend(&mut self) -> Result<(), LevelError> {
        self.depth = self.depth.checked_sub(1).ok_or(LevelError::Underflow)?;
        Ok(())
    }
}
