//! Append-only text buffer with bookmarks
//!
//! Every component writes through a [`TextSink`]. Besides appending, the sink
//! can hand out a [`Bookmark`] for the current end of the buffer and later
//! insert text at that position, shifting everything written after it.

use thiserror::Error;

/// Errors raised by bookmark insertion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The bookmark points past the end of the buffer
    #[error("bookmark {position} is out of range for a buffer of {len} bytes")]
    BookmarkOutOfRange {
        /// Requested byte position
        position: usize,
        /// Buffer length at the time of the insert
        len: usize,
    },

    /// The bookmark points inside a multi-byte character
    #[error("bookmark {position} does not fall on a character boundary")]
    NotCharBoundary {
        /// Requested byte position
        position: usize,
    },
}

/// A byte position in a [`TextSink`]
///
/// Bookmarks are plain positions: inserting text before a bookmark does not
/// move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bookmark(usize);

impl Bookmark {
    /// Bookmark at an explicit byte position
    pub fn at(position: usize) -> Self {
        Self(position)
    }

    /// The byte position this bookmark refers to
    pub fn position(self) -> usize {
        self.0
    }
}

/// Growable character buffer
#[derive(Debug, Clone, Default)]
pub struct TextSink {
    buf: String,
}

impl TextSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    pub fn append_line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Append `c` repeated `count` times
    pub fn append_char(&mut self, c: char, count: usize) {
        self.buf.extend(std::iter::repeat(c).take(count));
    }

    /// Bookmark the current end of the buffer
    pub fn bookmark(&self) -> Bookmark {
        Bookmark(self.buf.len())
    }

    /// Insert `text` at `bookmark`, shifting later content
    ///
    /// # Returns
    /// * `Ok(())` - Text inserted
    /// * `Err(SinkError)` - The bookmark is past the end or inside a character;
    ///   the buffer is left untouched
    pub fn insert_at(&mut self, bookmark: Bookmark, text: &str) -> Result<(), SinkError> {
        let position = bookmark.position();
        if position > self.buf.len() {
            return Err(SinkError::BookmarkOutOfRange {
                position,
                len: self.buf.len(),
            });
        }
        if !self.buf.is_char_boundary(position) {
            return Err(SinkError::NotCharBoundary { position });
        }
        self.buf.insert_str(position, text);
        Ok(())
    }

    /// Whether the buffer is empty or already ends with a newline
    pub fn ends_with_newline(&self) -> bool {
        self.buf.is_empty() || self.buf.ends_with('\n')
    }

    /// Append a newline unless the buffer already ends with one
    pub fn ensure_newline(&mut self) {
        if !self.ends_with_newline() {
            self.buf.push('\n');
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Copy of the buffer contents
    pub fn render(&self) -> String {
        self.buf.clone()
    }

    /// Consume the sink, returning its contents
    pub fn into_string(self) -> String {
        self.buf
    }
}
