//! Page arithmetic for paginated lists.

/// Position within a paginated result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(total: u64, page: u32, per_page: u32) -> Self {
        Self { total, page, per_page: per_page.max(1) }
    }

    /// `ceil(total / per_page)`, zero for an empty set.
    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        let pages = self.total.div_ceil(per_page);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Highest valid page. An empty set still has page 1.
    pub fn last_page(&self) -> u32 {
        self.total_pages().max(1)
    }

    /// Clamp a page into `[1, last_page]`.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.last_page())
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// The pager is only worth showing with more than one page.
    pub fn is_multi_page(&self) -> bool {
        self.total_pages() > 1
    }

    /// "Page {page} of {total_pages}".
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages())
    }
}
