//! Page granularity used to chunk element positions for parallel decomposition.
//!
//! A page is a power-of-two aligned block of positions. Range traversal never yields
//! a run that crosses a page boundary, and range splitting always cuts at a page
//! boundary, so two halves of a split never touch the same page.

use std::ops::Range;

use crate::{Result, error::Error, verify_arg};

/// Default number of bits in a page offset (1024 positions per page).
pub const DEFAULT_PAGE_BITS: u32 = 10;

/// Largest accepted page size exponent.
pub const MAX_PAGE_BITS: u32 = 24;

/// Environment variable consulted by [`PageLayout::from_env`].
pub const PAGE_BITS_ENV_VAR: &str = "ELEMKIT_PAGE_BITS";

/// Power-of-two page granularity over a position universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageLayout {
    page_bits: u32,
}

impl PageLayout {
    /// Creates a page layout with `1 << page_bits` positions per page.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` error if `page_bits` is not in `1..=MAX_PAGE_BITS`.
    pub fn new(page_bits: u32) -> Result<PageLayout> {
        verify_arg!(page_bits, page_bits >= 1);
        verify_arg!(page_bits, page_bits <= MAX_PAGE_BITS);
        Ok(PageLayout { page_bits })
    }

    /// Reads the page size exponent from the `ELEMKIT_PAGE_BITS` environment variable,
    /// falling back to [`DEFAULT_PAGE_BITS`] when the variable is not set.
    ///
    /// # Errors
    ///
    /// Returns an error when the variable is set but does not hold a valid exponent.
    pub fn from_env() -> Result<PageLayout> {
        match std::env::var(PAGE_BITS_ENV_VAR) {
            Ok(value) => {
                let bits = value.trim().parse::<u32>().map_err(|e| {
                    Error::invalid_arg(PAGE_BITS_ENV_VAR, format!("'{value}': {e}"))
                })?;
                PageLayout::new(bits)
            }
            Err(_) => Ok(PageLayout::default()),
        }
    }

    #[inline]
    pub fn page_bits(&self) -> u32 {
        self.page_bits
    }

    #[inline]
    pub fn page_size(&self) -> u64 {
        1u64 << self.page_bits
    }

    /// Returns the page number that contains `pos`.
    #[inline]
    pub fn page_of(&self, pos: u64) -> u64 {
        pos >> self.page_bits
    }

    /// Returns the first position of the given page.
    #[inline]
    pub fn page_start(&self, page: u64) -> u64 {
        page << self.page_bits
    }

    /// Returns the first page boundary strictly greater than `pos`.
    #[inline]
    pub fn page_end_after(&self, pos: u64) -> u64 {
        (self.page_of(pos) + 1) << self.page_bits
    }

    /// Returns the range of page numbers touched by the position range.
    ///
    /// An empty position range touches no pages.
    pub fn pages_spanning(&self, positions: Range<u64>) -> Range<u64> {
        if positions.start >= positions.end {
            return 0..0;
        }
        self.page_of(positions.start)..self.page_of(positions.end - 1) + 1
    }

    /// Returns `true` if `a` and `b` fall into the same page.
    #[inline]
    pub fn same_page(&self, a: u64, b: u64) -> bool {
        self.page_of(a) == self.page_of(b)
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            page_bits: DEFAULT_PAGE_BITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_page_math() {
        let layout = PageLayout::new(5).unwrap();
        assert_eq!(layout.page_size(), 32);
        assert_eq!(layout.page_of(31), 0);
        assert_eq!(layout.page_of(32), 1);
        assert_eq!(layout.page_start(3), 96);
        assert_eq!(layout.page_end_after(0), 32);
        assert_eq!(layout.page_end_after(63), 64);
        assert_eq!(layout.pages_spanning(0..100), 0..4);
        assert_eq!(layout.pages_spanning(40..64), 1..2);
        assert_eq!(layout.pages_spanning(10..10), 0..0);
        assert!(layout.same_page(33, 63));
        assert!(!layout.same_page(31, 32));
    }

    #[test]
    fn test_invalid_page_bits() {
        assert!(PageLayout::new(0).is_err());
        assert!(PageLayout::new(MAX_PAGE_BITS + 1).is_err());
        assert_eq!(PageLayout::default().page_size(), 1024);
    }

    // The only test touching the variable, so no other test observes the changes.
    #[test]
    fn test_from_env() {
        let saved = std::env::var(PAGE_BITS_ENV_VAR).ok();

        unsafe { std::env::remove_var(PAGE_BITS_ENV_VAR) };
        assert_eq!(PageLayout::from_env().unwrap(), PageLayout::default());

        unsafe { std::env::set_var(PAGE_BITS_ENV_VAR, "12") };
        assert_eq!(PageLayout::from_env().unwrap().page_size(), 4096);
        unsafe { std::env::set_var(PAGE_BITS_ENV_VAR, " 6 ") };
        assert_eq!(PageLayout::from_env().unwrap().page_bits(), 6);

        unsafe { std::env::set_var(PAGE_BITS_ENV_VAR, "abc") };
        let err = PageLayout::from_env().unwrap_err();
        match err.kind() {
            ErrorKind::InvalidArgument { name, .. } => assert_eq!(name, PAGE_BITS_ENV_VAR),
            other => panic!("unexpected error kind: {other:?}"),
        }
        unsafe { std::env::set_var(PAGE_BITS_ENV_VAR, "40") };
        assert!(PageLayout::from_env().is_err());

        match saved {
            Some(value) => unsafe { std::env::set_var(PAGE_BITS_ENV_VAR, value) },
            None => unsafe { std::env::remove_var(PAGE_BITS_ENV_VAR) },
        }
    }
}
