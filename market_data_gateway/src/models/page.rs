//! One batch of bars returned by a single paginated retrieval.

use std::num::NonZeroU32;

use crate::models::bar::Bar;

/// Bars satisfying one page request, plus whether another page may exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The 1-based page index this batch satisfies.
    pub page: NonZeroU32,
    /// Bars in ascending time order.
    pub bars: Vec<Bar>,
    /// `true` when the batch was full, i.e. a following page may exist.
    pub has_more: bool,
}

impl Page {
    /// Builds a page, deriving `has_more` from how full the batch is.
    ///
    /// A full batch (`bars.len() >= page_size`) may be followed by another page;
    /// a short or empty one is the last.
    pub fn from_bars(page: NonZeroU32, bars: Vec<Bar>, page_size: NonZeroU32) -> Self {
        let has_more = bars.len() >= page_size.get() as usize;
        Self {
            page,
            bars,
            has_more,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Record offset of the first bar on `page`: `(page - 1) * page_size`.
pub fn page_offset(page: NonZeroU32, page_size: NonZeroU32) -> u64 {
    u64::from(page.get() - 1) * u64::from(page_size.get())
}
