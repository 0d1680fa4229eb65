/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// 1-based page request over an in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Pages below 1 are clamped to 1; a zero page size falls back to the default.
    pub fn new(page: Option<u64>, page_size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// `ceil(total / page_size)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size)
    }

    /// Returns the items of the current page.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let skip = (self.page - 1).saturating_mul(self.page_size);
        items
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(self.page_size).unwrap_or(usize::MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(Pagination::new(None, None), Pagination::default());
        assert_eq!(Pagination::new(Some(0), Some(0)).page, 1);
        assert_eq!(Pagination::new(Some(0), Some(0)).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination::new(Some(3), Some(25)).page_size, 25);
    }

    #[test]
    fn test_total_pages() {
        let pagination = Pagination::new(Some(1), Some(10));
        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(10), 1);
        assert_eq!(pagination.total_pages(11), 2);
        assert_eq!(pagination.total_pages(25), 3);
    }

    #[test]
    fn test_apply() {
        let items: Vec<u32> = (1..=25).collect();

        assert_eq!(Pagination::new(Some(1), Some(10)).apply(items.clone()), (1..=10).collect::<Vec<_>>());
        assert_eq!(Pagination::new(Some(3), Some(10)).apply(items.clone()), (21..=25).collect::<Vec<_>>());
        assert!(Pagination::new(Some(4), Some(10)).apply(items).is_empty());
    }
}
