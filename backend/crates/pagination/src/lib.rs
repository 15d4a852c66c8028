//! Offset/count page windows shared by matchmaking endpoints.
//!
//! Clients ask for `count` items starting at a zero-based `offset`. A
//! [`PageWindow`] validates that request once at the edge so services only
//! ever handle well-formed windows, and it owns the slicing rule: a window
//! that starts past the end of the available items is a client error rather
//! than an empty success.
//!
//! # Example
//!
//! ```
//! use pagination::PageWindow;
//!
//! let ranked = ["ada", "brook", "cleo", "dev"];
//! let window = PageWindow::new(2, 1).expect("valid window");
//!
//! assert_eq!(window.end(), 3);
//! assert_eq!(window.slice(&ranked).expect("in range"), &["brook", "cleo"]);
//! ```

use serde::Serialize;
use thiserror::Error;

const DEFAULT_COUNT_ITEMS: u16 = 10;
const DEFAULT_OFFSET_ITEMS: u16 = 0;

/// Number of items returned when a client omits `count`.
pub const DEFAULT_COUNT: i64 = DEFAULT_COUNT_ITEMS as i64;

/// Offset used when a client omits `offset`.
pub const DEFAULT_OFFSET: i64 = DEFAULT_OFFSET_ITEMS as i64;

/// Errors raised while validating or applying a page window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageWindowError {
    /// `count` was zero or negative.
    #[error("count must be greater than zero, got {count}")]
    InvalidCount {
        /// The rejected count.
        count: i64,
    },
    /// `offset` was negative.
    #[error("offset must not be negative, got {offset}")]
    InvalidOffset {
        /// The rejected offset.
        offset: i64,
    },
    /// `offset` points past the last available item.
    #[error("offset {offset} is beyond the {available} available items")]
    OffsetOutOfRange {
        /// The requested offset.
        offset: usize,
        /// How many items were available.
        available: usize,
    },
}

/// A validated `[offset, offset + count)` window.
///
/// Only [`PageWindow::new`] and [`Default`] build one; it serialises for
/// responses but is never deserialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageWindow {
    count: usize,
    offset: usize,
}

impl PageWindow {
    /// Validate raw client input.
    ///
    /// # Errors
    ///
    /// Returns [`PageWindowError::InvalidCount`] when `count <= 0` and
    /// [`PageWindowError::InvalidOffset`] when `offset < 0`.
    pub fn new(count: i64, offset: i64) -> Result<Self, PageWindowError> {
        if count <= 0 {
            return Err(PageWindowError::InvalidCount { count });
        }
        if offset < 0 {
            return Err(PageWindowError::InvalidOffset { offset });
        }
        let checked_count =
            usize::try_from(count).map_err(|_| PageWindowError::InvalidCount { count })?;
        let checked_offset =
            usize::try_from(offset).map_err(|_| PageWindowError::InvalidOffset { offset })?;
        Ok(Self {
            count: checked_count,
            offset: checked_offset,
        })
    }

    /// Number of items requested.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Zero-based index of the first requested item.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Exclusive end of the window (`offset + count`, saturating).
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.count)
    }

    /// Whether the whole window lies within the first `limit` items.
    #[must_use]
    pub fn fits_within(&self, limit: usize) -> bool {
        self.end() <= limit
    }

    /// Borrow the part of `items` covered by this window.
    ///
    /// The window is clamped to the available length. An offset at or past
    /// the end is rejected, except for offset zero which yields an empty
    /// page when there is nothing to show.
    ///
    /// # Errors
    ///
    /// Returns [`PageWindowError::OffsetOutOfRange`] when the window starts
    /// past the last item.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> Result<&'a [T], PageWindowError> {
        let available = items.len();
        if self.offset > 0 && self.offset >= available {
            return Err(PageWindowError::OffsetOutOfRange {
                offset: self.offset,
                available,
            });
        }
        let end = self.end().min(available);
        Ok(items.get(self.offset..end).unwrap_or_default())
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            count: usize::from(DEFAULT_COUNT_ITEMS),
            offset: usize::from(DEFAULT_OFFSET_ITEMS),
        }
    }
}
