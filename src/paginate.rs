//! Blog listing pagination.
//!
//! Splits an ordered collection into fixed-size pages and computes the
//! navigation links between them. Every page of a listing is described up
//! front, once per build; rendering a given page is a lookup by index into
//! the returned sequence, never a re-invocation.
//!
//! ## Routes
//!
//! For a listing rooted at `/blog`:
//!
//! ```text
//! page 1  →  /blog
//! page 2  →  /blog/2
//! page 3  →  /blog/3
//! ```
//!
//! ## Empty Collections
//!
//! An empty collection yields zero pages, so `total_pages == ceil(len / size)`
//! holds for every input. Callers that need the root route to exist anyway
//! (the blog listing does) render their own placeholder page.

use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaginateError {
    #[error("Invalid page size {0}: must be at least 1")]
    InvalidPageSize(usize),
}

/// One page of a paginated listing: its slice of items plus navigation state.
#[derive(Debug, PartialEq, Eq)]
pub struct PageDescriptor<'a, T> {
    /// 1-based page number.
    pub index: usize,
    /// Contiguous sub-slice of the full collection.
    pub items: &'a [T],
    /// Number of pages in the whole listing.
    pub total_pages: usize,
    root: &'a str,
}

impl<T> PageDescriptor<'_, T> {
    pub fn is_current(&self, candidate: usize) -> bool {
        candidate == self.index
    }

    /// Route of another page in the same listing.
    pub fn link_target(&self, candidate: usize) -> String {
        link_target(self.root, candidate)
    }

    /// Route of this page.
    pub fn route(&self) -> String {
        self.link_target(self.index)
    }

    /// All page numbers of the listing, for rendering a page strip.
    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages
    }
}

/// Partition `items` into pages of at most `page_size` elements.
///
/// Order is preserved and the last page may be short. Fails with
/// [`PaginateError::InvalidPageSize`] when `page_size` is zero.
pub fn paginate<'a, T>(
    items: &'a [T],
    page_size: usize,
    root: &'a str,
) -> Result<Vec<PageDescriptor<'a, T>>, PaginateError> {
    let total_pages = page_count(items.len(), page_size)?;
    Ok(items
        .chunks(page_size)
        .enumerate()
        .map(|(i, chunk)| PageDescriptor {
            index: i + 1,
            items: chunk,
            total_pages,
            root,
        })
        .collect())
}

/// Number of pages needed for `item_count` items: `ceil(item_count / page_size)`.
pub fn page_count(item_count: usize, page_size: usize) -> Result<usize, PaginateError> {
    if page_size == 0 {
        return Err(PaginateError::InvalidPageSize(page_size));
    }
    Ok(item_count.div_ceil(page_size))
}

/// Route of page `index` in a listing rooted at `root`.
///
/// Page 1 is the root itself; page `n > 1` is `root/n`. Index 0 is not a
/// valid page number and maps to the root as well.
///
/// Page 1 returns `root` unchanged, trailing slash included. Later pages trim
/// trailing slashes before appending `/n`, so `"/blog/"` links page 2 as
/// `"/blog/2"`. Configured routes never end in `/`, so both shapes agree there.
pub fn link_target(root: &str, index: usize) -> String {
    if index <= 1 {
        root.to_string()
    } else {
        format!("{}/{}", root.trim_end_matches('/'), index)
    }
}

/// Look up a page by its 1-based index.
pub fn page_at<'p, 'a, T>(
    pages: &'p [PageDescriptor<'a, T>],
    index: usize,
) -> Option<&'p PageDescriptor<'a, T>> {
    index.checked_sub(1).and_then(|i| pages.get(i))
}
