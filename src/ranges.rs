//! Page selection module
//!
//! Accumulates and validates the page selections used when pulling pages from
//! a source document. Ranges are 1-based and inclusive, and the order they are
//! added is the order pages are read from the source.

use crate::error::{Error, Result};

/// An inclusive span of pages within a source document
///
/// Page numbers are 1-based. A single page is a range with start == end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    /// Create a range, validating that 1 <= start <= end
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start < 1 || end < start {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First page of the range (1-based)
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last page of the range (inclusive)
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of pages covered by this range
    pub fn page_count(&self) -> usize {
        (self.end - self.start + 1) as usize
    }
}

/// An ordered collection of page ranges for one source document
///
/// Ranges are applied literally and in insertion order; no deduplication or
/// overlap merging is performed, so the same source page may be selected more
/// than once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRangeSet {
    ranges: Vec<PageRange>,
}

impl PageRangeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inclusive range of pages
    ///
    /// Fails with `Error::InvalidRange` when start < 1 or end < start; on
    /// failure the set is left unchanged.
    pub fn add_range(&mut self, start: u32, end: u32) -> Result<()> {
        self.ranges.push(PageRange::new(start, end)?);
        Ok(())
    }

    /// Add a single page; equivalent to `add_range(page, page)`
    pub fn add_single_page(&mut self, page: u32) -> Result<()> {
        self.add_range(page, page)
    }

    /// True until the first successful add (there is no removal operation)
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of pages selected across all ranges
    pub fn total_page_count(&self) -> usize {
        self.ranges.iter().map(PageRange::page_count).sum()
    }

    /// Iterate the ranges in insertion order
    ///
    /// Restartable and non-destructive: every call replays the same sequence.
    pub fn ranges(&self) -> impl Iterator<Item = &PageRange> {
        self.ranges.iter()
    }
}

/// What to take from a source document
///
/// The whole-document case is an explicit variant rather than an empty range
/// set, so "caller forgot to add ranges" and "caller wants every page" stay
/// distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    /// Use every page of the source document
    WholeDocument,
    /// Use the pages named by the range set, in its insertion order
    Ranges(PageRangeSet),
}

impl PageSelection {
    /// Parse a selection expression into a PageSelection
    ///
    /// Supported formats:
    /// - `""` (empty) or `"all"` → whole document
    /// - `"4"` → single page 4
    /// - `"1-3"` → pages 1 through 3
    /// - `"1-3,5,7-9"` → combination, applied in the listed order
    pub fn parse(expr: &str) -> Result<Self> {
        let expr = expr.trim();

        if expr.is_empty() || expr.eq_ignore_ascii_case("all") {
            return Ok(Self::WholeDocument);
        }

        let mut set = PageRangeSet::new();
        for token in expr.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(Error::InvalidSpec(format!("empty page token in: {}", expr)));
            }

            if let Some((start_str, end_str)) = token.split_once('-') {
                let start = parse_page_number(start_str)?;
                let end = parse_page_number(end_str)?;
                set.add_range(start, end)?;
            } else {
                set.add_single_page(parse_page_number(token)?)?;
            }
        }

        Ok(Self::Ranges(set))
    }
}

/// Parse a single page number token
fn parse_page_number(s: &str) -> Result<u32> {
    s.trim()
        .parse()
        .map_err(|_| Error::InvalidSpec(format!("invalid page number: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_range_grows_total() {
        let mut set = PageRangeSet::new();
        set.add_range(1, 3).unwrap();
        assert_eq!(set.total_page_count(), 3);

        set.add_range(10, 10).unwrap();
        assert_eq!(set.total_page_count(), 4);
    }

    #[test]
    fn test_add_range_inverted_fails_and_leaves_set_unchanged() {
        let mut set = PageRangeSet::new();
        set.add_range(1, 3).unwrap();

        let result = set.add_range(5, 2);
        assert!(matches!(
            result,
            Err(Error::InvalidRange { start: 5, end: 2 })
        ));
        assert_eq!(set.total_page_count(), 3);
    }

    #[test]
    fn test_add_range_zero_page_fails() {
        let mut set = PageRangeSet::new();
        assert!(set.add_range(0, 3).is_err());
        assert!(set.add_single_page(0).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_single_page_equivalent_to_degenerate_range() {
        let mut a = PageRangeSet::new();
        a.add_single_page(7).unwrap();

        let mut b = PageRangeSet::new();
        b.add_range(7, 7).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.total_page_count(), b.total_page_count());
    }

    #[test]
    fn test_is_empty_flips_after_first_add() {
        let mut set = PageRangeSet::new();
        assert!(set.is_empty());

        set.add_single_page(1).unwrap();
        assert!(!set.is_empty());
    }

    #[test]
    fn test_ranges_preserve_insertion_order() {
        // Pages 1-3 then page 4, exactly as the replace sample builds them
        let mut set = PageRangeSet::new();
        set.add_range(1, 3).unwrap();
        set.add_single_page(4).unwrap();

        assert_eq!(set.total_page_count(), 4);
        let spans: Vec<(u32, u32)> = set.ranges().map(|r| (r.start(), r.end())).collect();
        assert_eq!(spans, vec![(1, 3), (4, 4)]);
    }

    #[test]
    fn test_ranges_iteration_is_restartable() {
        let mut set = PageRangeSet::new();
        set.add_range(2, 5).unwrap();
        set.add_single_page(9).unwrap();

        let first: Vec<_> = set.ranges().collect();
        let second: Vec<_> = set.ranges().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_overlapping_ranges_are_kept_literally() {
        let mut set = PageRangeSet::new();
        set.add_range(1, 4).unwrap();
        set.add_range(3, 5).unwrap();

        // No merging: 4 + 3 pages
        assert_eq!(set.total_page_count(), 7);
    }

    #[test]
    fn test_parse_whole_document() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::WholeDocument);
        assert_eq!(PageSelection::parse("All").unwrap(), PageSelection::WholeDocument);
        assert_eq!(PageSelection::parse("").unwrap(), PageSelection::WholeDocument);
        assert_eq!(PageSelection::parse("  ").unwrap(), PageSelection::WholeDocument);
    }

    #[test]
    fn test_parse_single_page() {
        match PageSelection::parse("4").unwrap() {
            PageSelection::Ranges(set) => {
                assert_eq!(set.total_page_count(), 1);
                let spans: Vec<_> = set.ranges().map(|r| (r.start(), r.end())).collect();
                assert_eq!(spans, vec![(4, 4)]);
            }
            _ => panic!("Expected Ranges"),
        }
    }

    #[test]
    fn test_parse_range_list() {
        match PageSelection::parse("1-3, 5, 7-9").unwrap() {
            PageSelection::Ranges(set) => {
                let spans: Vec<_> = set.ranges().map(|r| (r.start(), r.end())).collect();
                assert_eq!(spans, vec![(1, 3), (5, 5), (7, 9)]);
                assert_eq!(set.total_page_count(), 7);
            }
            _ => panic!("Expected Ranges"),
        }
    }

    #[test]
    fn test_parse_invalid() {
        assert!(PageSelection::parse("abc").is_err());
        assert!(PageSelection::parse("1-").is_err());
        assert!(PageSelection::parse("1,,3").is_err());
        assert!(PageSelection::parse("0-2").is_err()); // pages are 1-based
        assert!(PageSelection::parse("5-2").is_err()); // inverted span
    }
}
