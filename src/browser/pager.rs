use std::ops::Range;

use crate::error::InputError;

/// Page offset over a list of `total` items, `limit` at a time.
///
/// The offset counts pages, not items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    offset: usize,
    limit: usize,
    total: usize,
}

impl Pager {
    pub fn new(limit: usize) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            total: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Records a fresh item count and applies the clamp rule.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.clamp();
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
    }

    /// Restores a previously saved position as is. The next `set_total` or
    /// `clamp` brings it back in range.
    pub fn restore(&mut self, offset: usize, total: usize) {
        self.offset = offset;
        self.total = total;
    }

    /// Resets the offset to the first page when it starts at or past the end.
    /// Returns whether it had to.
    pub fn clamp(&mut self) -> bool {
        if self.offset > 0 && self.start() >= self.total {
            self.offset = 0;
            return true;
        }
        false
    }

    pub fn start(&self) -> usize {
        self.offset.saturating_mul(self.limit)
    }

    pub fn max_offset(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.total - 1) / self.limit
        }
    }

    pub fn page_count(&self) -> usize {
        self.max_offset() + 1
    }

    pub fn next(&mut self) -> bool {
        if self.offset < self.max_offset() {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.offset > 0 {
            self.offset -= 1;
            true
        } else {
            false
        }
    }

    /// Item indices of the current page.
    pub fn range(&self) -> Range<usize> {
        let start = self.start().min(self.total);
        let end = start.saturating_add(self.limit).min(self.total);
        start..end
    }

    /// `Page x/y` once there is more than one page.
    pub fn label(&self) -> Option<String> {
        if self.total <= self.limit {
            return None;
        }
        Some(format!("Page {}/{}", self.offset + 1, self.page_count()))
    }
}

/// Parses edit-field text for a page limit.
pub fn parse_limit(text: &str) -> Result<usize, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    if value <= 0 {
        return Err(InputError::NonPositive(value));
    }
    usize::try_from(value).map_err(|_| InputError::NotANumber(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(limit: usize, total: usize) -> Pager {
        let mut p = Pager::new(limit);
        p.set_total(total);
        p
    }

    #[test]
    fn walks_pages_and_stops_at_the_last() {
        let mut p = pager(20, 45);
        assert_eq!(p.range(), 0..20);
        assert!(p.next());
        assert_eq!(p.range(), 20..40);
        assert!(p.next());
        assert_eq!(p.range(), 40..45);
        assert!(!p.next());
        assert_eq!(p.offset(), 2);
        assert!(p.prev());
        assert_eq!(p.offset(), 1);
    }

    #[test]
    fn exact_multiple_has_no_empty_trailing_page() {
        let mut p = pager(10, 20);
        assert_eq!(p.max_offset(), 1);
        p.next();
        assert!(!p.next());
        assert_eq!(p.range(), 10..20);
    }

    #[test]
    fn shrinking_resets_to_first_page() {
        let mut p = pager(10, 50);
        p.next();
        p.next();
        p.set_total(15);
        assert_eq!(p.offset(), 0);
        // still in range: keep the offset
        let mut q = pager(10, 50);
        q.next();
        q.set_total(15);
        assert_eq!(q.offset(), 1);
    }

    #[test]
    fn empty_list_is_one_empty_page() {
        let p = pager(5, 0);
        assert_eq!(p.range(), 0..0);
        assert_eq!(p.page_count(), 1);
        assert_eq!(p.label(), None);
    }

    #[test]
    fn label_shows_position() {
        let mut p = pager(20, 45);
        p.next();
        assert_eq!(p.label().as_deref(), Some("Page 2/3"));
    }

    #[test]
    fn parse_limit_rejects_bad_text() {
        assert_eq!(parse_limit(" 15 "), Ok(15));
        assert_eq!(parse_limit(""), Err(InputError::Empty));
        assert_eq!(parse_limit("0"), Err(InputError::NonPositive(0)));
        assert_eq!(parse_limit("-3"), Err(InputError::NonPositive(-3)));
        assert_eq!(
            parse_limit("ten"),
            Err(InputError::NotANumber("ten".to_string()))
        );
    }
}
