//! Pagination
//!
//! Zero-based page requests and the page envelope returned by list queries.

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// `size` must be at least 1.
    pub fn new(page: u32, size: u32) -> Option<Self> {
        (size > 0).then_some(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row offset for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

/// One page of results plus totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(u64::from(request.size));
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
            first: request.page == 0,
            // page >= total_pages - 1, without underflow when there are no pages
            last: u64::from(request.page) + 1 >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(PageRequest::new(0, 0).is_none());
        assert_eq!(PageRequest::new(3, 20).unwrap().offset(), 60);
    }

    #[test]
    fn test_page_flags() {
        let page = Page::new(vec![1, 2], PageRequest::new(0, 2).unwrap(), 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.first);
        assert!(!page.last);

        let page = Page::new(vec![5], PageRequest::new(2, 2).unwrap(), 5);
        assert!(!page.first);
        assert!(page.last);

        // past the end still reports last
        let page: Page<i32> = Page::new(vec![], PageRequest::new(7, 2).unwrap(), 5);
        assert!(page.last);
    }

    #[test]
    fn test_empty_result() {
        let page: Page<i32> = Page::new(vec![], PageRequest::new(0, 20).unwrap(), 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.first);
        assert!(page.last);
    }

    #[test]
    fn test_map_keeps_totals() {
        let page = Page::new(vec![1, 2], PageRequest::new(0, 2).unwrap(), 4).map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.total_elements, 4);
        assert_eq!(page.total_pages, 2);
    }
}
