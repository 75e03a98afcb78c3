//! Page-number pagination over ordered collections.
//!
//! Pages are 1-indexed. A missing or malformed page number resolves to the
//! first page; any integer outside `1..=num_pages`, however large, resolves
//! to the last page.
//! An empty collection still has a single, empty page.

use serde::Serialize;

/// Default number of posts shown on one feed page.
pub const POSTS_PER_PAGE: u64 = 10;

/// Resolves requested page numbers against a total count.
#[derive(Debug, Clone, Copy)]
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

    pub fn num_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page).max(1)
    }

    /// Resolve the raw `page` query value into a window over `total` items.
    pub fn window(&self, total: u64, requested: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = match requested.map(str::trim) {
            None => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 && (n as u64) <= num_pages => n as u64,
                Ok(_) => num_pages,
                Err(_) if is_integer(raw) => num_pages,
                Err(_) => 1,
            },
        };

        PageWindow {
            number,
            num_pages,
            per_page: self.per_page,
            total,
        }
    }
}

/// An integer too large for `i64` still names a page, just not an existing one.
fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

/// A resolved page position: which slice of the collection to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// Attach the loaded items to this window.
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            window: self,
        }
    }
}

/// One page of a paginated collection.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

impl<T> Page<T> {
    pub fn number(&self) -> u64 {
        self.window.number
    }

    pub fn num_pages(&self) -> u64 {
        self.window.num_pages
    }

    pub fn total(&self) -> u64 {
        self.window.total
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.window.number < self.window.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.window.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.window.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.window.number - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator() -> Paginator {
        Paginator::new(POSTS_PER_PAGE)
    }

    #[test]
    fn test_first_page_is_full_and_second_holds_the_rest() {
        let first = paginator().window(13, None);
        assert_eq!(first.number, 1);
        assert_eq!(first.num_pages, 2);
        assert_eq!((first.offset(), first.limit()), (0, 10));

        let second = paginator().window(13, Some("2"));
        assert_eq!(second.number, 2);
        assert_eq!(second.offset(), 10);
    }

    #[test]
    fn test_out_of_range_pages_go_to_last_page() {
        assert_eq!(paginator().window(25, Some("99")).number, 3);
        assert_eq!(paginator().window(25, Some("0")).number, 3);
        assert_eq!(paginator().window(25, Some("-4")).number, 3);
    }

    #[test]
    fn test_integers_beyond_i64_go_to_last_page() {
        assert_eq!(paginator().window(25, Some("99999999999999999999")).number, 3);
        assert_eq!(paginator().window(25, Some("-99999999999999999999")).number, 3);
        assert_eq!(paginator().window(25, Some("1.5")).number, 1);
        assert_eq!(paginator().window(25, Some("+")).number, 1);
    }

    #[test]
    fn test_malformed_page_goes_to_first_page() {
        assert_eq!(paginator().window(25, Some("abc")).number, 1);
        assert_eq!(paginator().window(25, Some("")).number, 1);
        assert_eq!(paginator().window(25, Some(" 2 ")).number, 2);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let window = paginator().window(0, Some("5"));
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 1);

        let page = window.into_page(Vec::<u8>::new());
        assert!(page.is_empty());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_page_navigation_numbers() {
        let page = paginator().window(30, Some("2")).into_page(vec![0; 10]);
        assert_eq!(page.previous_page_number(), Some(1));
        assert_eq!(page.next_page_number(), Some(3));

        let last = paginator().window(30, Some("3")).into_page(vec![0; 10]);
        assert_eq!(last.next_page_number(), None);
    }

    #[test]
    fn test_exact_multiple_has_no_partial_page() {
        assert_eq!(paginator().num_pages(20), 2);
        assert_eq!(paginator().num_pages(21), 3);
    }
}
