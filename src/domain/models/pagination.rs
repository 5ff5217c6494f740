use serde::Serialize;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

string_enum!(SortOrder {
    Asc => "ASC",
    Desc => "DESC",
});

impl SortOrder {
    /// Accepts either case, the way the query string usually arrives.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        raw.to_ascii_uppercase().parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: DEFAULT_PAGE_LIMIT }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page: page.max(1), limit: limit.clamp(1, MAX_PAGE_LIMIT) }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self { items, total, page: request.page, limit: request.limit }
    }

    pub fn total_pages(&self) -> i64 {
        if self.limit == 0 {
            return 0;
        }
        (self.total + self.limit as i64 - 1) / self.limit as i64
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_total_pages() {
        let req = PageRequest::new(3, 10);
        assert_eq!(req.offset(), 20);

        let page: Paginated<u8> = Paginated::new(vec![], 21, req);
        assert_eq!(page.total_pages(), 3);

        let empty: Paginated<u8> = Paginated::new(vec![], 0, req);
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn page_request_is_clamped() {
        let req = PageRequest::new(0, 1000);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn sort_order_accepts_lowercase() {
        assert_eq!(SortOrder::parse_loose("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse_loose("DESC"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse_loose("sideways"), None);
    }
}
