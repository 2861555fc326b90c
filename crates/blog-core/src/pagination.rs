//! Page arithmetic for post listings.
//!
//! Out-of-range page numbers are clamped rather than rejected: anything below
//! one (or unparsable) is page one, anything past the end is the last page.
//! An empty listing still has one, empty, page.

use serde::Serialize;

/// Default number of posts on one listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// The page number a client asked for, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest(i64);

impl PageRequest {
    pub fn first() -> Self {
        Self(1)
    }

    pub fn number(n: i64) -> Self {
        Self(n)
    }

    /// Parse the raw `page` query parameter. Missing or non-numeric means page
    /// one; a number too large for `i64` is still past the end and clamps later.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return Self::first();
        };

        match raw.parse::<i64>() {
            Ok(n) => Self(n),
            Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => Self(i64::MAX),
            Err(_) => Self::first(),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
}

impl Paginator {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.per_page).max(1)
    }

    /// Resolve a request against the current item count.
    pub fn window(&self, total_items: u64, request: PageRequest) -> PageWindow {
        let total_pages = self.total_pages(total_items);
        let number = (request.0.max(1) as u64).min(total_pages);

        PageWindow {
            number,
            total_pages,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

/// A resolved page: which slice of the listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub total_pages: u64,
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            page_number: self.number,
            has_next: self.number < self.total_pages,
            has_previous: self.number > 1,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            has_next: self.has_next,
            has_previous: self.has_previous,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_parameter() {
        assert_eq!(PageRequest::parse(None), PageRequest::first());
        assert_eq!(PageRequest::parse(Some("abc")), PageRequest::first());
        assert_eq!(PageRequest::parse(Some("")), PageRequest::first());
        assert_eq!(PageRequest::parse(Some(" 3 ")), PageRequest::number(3));
        assert_eq!(PageRequest::parse(Some("-2")), PageRequest::number(-2));
    }

    #[test]
    fn test_zero_and_negative_pages_clamp_to_first() {
        let paginator = Paginator::new(10);
        let first = paginator.window(35, PageRequest::first());

        assert_eq!(paginator.window(35, PageRequest::number(0)), first);
        assert_eq!(paginator.window(35, PageRequest::number(-7)), first);
        assert_eq!(paginator.window(35, PageRequest::parse(Some("x"))), first);
        assert_eq!(first.offset, 0);
    }

    #[test]
    fn test_page_past_end_clamps_to_last() {
        let paginator = Paginator::new(10);
        let window = paginator.window(35, PageRequest::number(99));

        assert_eq!(window.number, 4);
        assert_eq!(window.total_pages, 4);
        assert_eq!(window.offset, 30);

        let huge = PageRequest::parse(Some("99999999999999999999"));
        let window = paginator.window(35, huge);
        assert_eq!(window.number, 4);
        assert_eq!(window.offset, 30);
    }

    #[test]
    fn test_empty_listing_has_single_page() {
        let paginator = Paginator::new(10);
        let page = paginator
            .window(0, PageRequest::number(5))
            .into_page(Vec::<u8>::new());

        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_page_flags() {
        let paginator = Paginator::new(2);
        let middle = paginator
            .window(5, PageRequest::number(2))
            .into_page(vec![3, 4]);

        assert!(middle.has_next);
        assert!(middle.has_previous);
        assert_eq!(middle.total_pages, 3);

        let last = paginator.window(5, PageRequest::number(3)).into_page(vec![5]);
        assert!(!last.has_next);
        assert!(last.has_previous);
    }

    #[test]
    fn test_zero_page_size_is_bumped_to_one() {
        assert_eq!(Paginator::new(0).per_page(), 1);
    }
}
