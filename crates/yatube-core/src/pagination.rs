//! Page-number pagination shared by every listing.
//!
//! A requested page number comes straight from the `page` query parameter.
//! Anything that is not an integer resolves to the first page, and integers
//! outside `1..=num_pages` resolve to the last page. An empty listing still
//! has one (empty) page.

use serde::Serialize;

/// Page size used by all post listings.
pub const POSTS_PER_PAGE: usize = 10;

/// Resolves requested page numbers against a listing of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
}

/// The slice of a listing a resolved page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number.
    pub number: u64,
    pub num_pages: u64,
    /// Total records in the listing.
    pub count: u64,
    pub offset: u64,
    pub limit: u64,
}

/// A bounded slice of an ordered listing plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
}

impl Paginator {
    /// A zero page size is treated as one record per page.
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1) as u64,
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn num_pages(&self, count: u64) -> u64 {
        count.div_ceil(self.per_page).max(1)
    }

    /// Resolve a raw page parameter to a valid 1-based page number.
    pub fn resolve(&self, count: u64, raw: Option<&str>) -> u64 {
        let num_pages = self.num_pages(count);
        let Some(raw) = raw.map(str::trim) else {
            return 1;
        };

        match raw.parse::<i64>() {
            Ok(n) if n >= 1 && (n as u64) <= num_pages => n as u64,
            Ok(_) => num_pages,
            // Integers too large for i64 are still out of range.
            Err(_) if is_integer_literal(raw) => num_pages,
            Err(_) => 1,
        }
    }

    /// Resolve a raw page parameter to the offset/limit window it covers.
    pub fn window(&self, count: u64, raw: Option<&str>) -> PageWindow {
        let number = self.resolve(count, raw);
        let offset = (number - 1) * self.per_page;

        PageWindow {
            number,
            num_pages: self.num_pages(count),
            count,
            offset,
            limit: self.per_page.min(count.saturating_sub(offset)),
        }
    }

    /// Slice an already ordered, fully loaded listing.
    pub fn paginate<T>(&self, items: Vec<T>, raw: Option<&str>) -> Page<T> {
        let window = self.window(items.len() as u64, raw);
        let items = items
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect();

        Page::from_window(window, self.per_page, items)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl<T> Page<T> {
    /// Wrap the records a repository fetched for `window`.
    pub fn from_window(window: PageWindow, per_page: u64, items: Vec<T>) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            per_page,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then_some(self.number - 1)
    }

    /// Convert the records while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_page_counts_cover_every_record() {
        for per_page in 1..=7 {
            let paginator = Paginator::new(per_page);
            for n in 0..40usize {
                let num_pages = paginator.num_pages(n as u64);
                assert_eq!(num_pages, (n.div_ceil(per_page)).max(1) as u64);

                let mut seen = Vec::new();
                for number in 1..=num_pages {
                    let page = paginator.paginate(records(n), Some(&number.to_string()));
                    assert_eq!(page.number, number);
                    if number < num_pages {
                        assert_eq!(page.len(), per_page);
                    } else {
                        assert!(page.len() <= per_page);
                    }
                    seen.extend(page.items);
                }
                assert_eq!(seen, records(n));
            }
        }
    }

    #[test]
    fn test_second_page_of_thirteen() {
        let page = Paginator::default().paginate(records(13), Some("2"));
        assert_eq!(page.items, vec![10, 11, 12]);
        assert!(page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.previous_page_number(), Some(1));
        assert_eq!(page.next_page_number(), None);
    }

    #[test]
    fn test_missing_or_garbage_page_is_first() {
        let paginator = Paginator::default();
        for raw in [None, Some(""), Some("abc"), Some("2.5"), Some("1e3")] {
            assert_eq!(paginator.resolve(25, raw), 1, "raw = {raw:?}");
        }
        assert_eq!(paginator.resolve(25, Some(" 2 ")), 2);
    }

    #[test]
    fn test_out_of_range_page_is_last() {
        let paginator = Paginator::default();
        for raw in ["0", "-1", "4", "99999999999999999999999"] {
            assert_eq!(paginator.resolve(25, Some(raw)), 3, "raw = {raw}");
        }
    }

    #[test]
    fn test_empty_listing_has_one_empty_page() {
        let page = Paginator::default().paginate(Vec::<u8>::new(), Some("5"));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.is_empty());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_window_limits_last_page() {
        let window = Paginator::default().window(13, Some("2"));
        assert_eq!(window.offset, 10);
        assert_eq!(window.limit, 3);
        assert_eq!(window.num_pages, 2);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Paginator::new(2).paginate(records(5), Some("2"));
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![20, 30]);
        assert_eq!(mapped.number, 2);
        assert_eq!(mapped.num_pages, 3);
        assert_eq!(mapped.count, 5);
    }
}
