use std::num::IntErrorKind;

use serde::Serialize;

/// Posts shown per listing page unless configured otherwise.
pub const DEFAULT_PER_PAGE: u64 = 3;

/// Splits `count` items into pages of `per_page`.
///
/// An empty result set still has one (empty) page, so page 1 is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(count: u64, per_page: u64) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn num_pages(&self) -> u64 {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(self.per_page)
        }
    }

    /// Normalize a raw `page` query value into a page number.
    ///
    /// Missing or non-integer values give page 1. Integers outside
    /// `1..=num_pages` give the last page.
    pub fn resolve(&self, raw: Option<&str>) -> u64 {
        let Some(raw) = raw else {
            return 1;
        };

        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 1 && n.unsigned_abs() <= self.num_pages() => n.unsigned_abs(),
            Ok(_) => self.num_pages(),
            Err(e)
                if matches!(
                    e.kind(),
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                ) =>
            {
                self.num_pages()
            }
            Err(_) => 1,
        }
    }

    /// Offset of the first item on page `number`.
    pub fn offset(&self, number: u64) -> u64 {
        number.saturating_sub(1) * self.per_page
    }

    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            num_pages: self.num_pages(),
            count: self.count,
        }
    }
}

/// One page of results plus the metadata needed to render navigation.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_pages_rounds_up() {
        assert_eq!(Paginator::new(7, 3).num_pages(), 3);
        assert_eq!(Paginator::new(6, 3).num_pages(), 2);
        assert_eq!(Paginator::new(1, 3).num_pages(), 1);
    }

    #[test]
    fn empty_result_has_one_page() {
        let paginator = Paginator::new(0, 3);
        assert_eq!(paginator.num_pages(), 1);
        assert_eq!(paginator.resolve(Some("1")), 1);
        assert_eq!(paginator.resolve(Some("4")), 1);
    }

    #[test]
    fn missing_or_garbage_page_is_first_page() {
        let paginator = Paginator::new(10, 3);
        assert_eq!(paginator.resolve(None), 1);
        assert_eq!(paginator.resolve(Some("abc")), 1);
        assert_eq!(paginator.resolve(Some("")), 1);
        assert_eq!(paginator.resolve(Some("2.5")), 1);
    }

    #[test]
    fn out_of_range_page_is_last_page() {
        let paginator = Paginator::new(10, 3);
        assert_eq!(paginator.resolve(Some("5")), 4);
        assert_eq!(paginator.resolve(Some("999")), 4);
        assert_eq!(paginator.resolve(Some("0")), 4);
        assert_eq!(paginator.resolve(Some("-2")), 4);
        assert_eq!(paginator.resolve(Some("99999999999999999999")), 4);
    }

    #[test]
    fn valid_page_is_kept() {
        let paginator = Paginator::new(10, 3);
        assert_eq!(paginator.resolve(Some("2")), 2);
        assert_eq!(paginator.resolve(Some(" 3 ")), 3);
        assert_eq!(paginator.offset(3), 6);
    }

    #[test]
    fn page_navigation() {
        let paginator = Paginator::new(7, 3);

        let first = paginator.page(1, vec![1, 2, 3]);
        assert!(!first.has_previous());
        assert_eq!(first.next_page_number(), Some(2));

        let last = paginator.page(3, vec![7]);
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.previous_page_number(), Some(2));
    }
}
