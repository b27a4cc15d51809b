use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

/// Raw `?page=&limit=` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// A normalised page request: `page` is 1-based, `limit` is within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, limit: Option<u64>, config: &AppConfig) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1));
        PageRequest { page, limit }
    }

    pub fn from_query(query: &PageQuery, config: &AppConfig) -> Self {
        Self::new(query.page, query.limit, config)
    }

    /// Items to skip before this page. Saturates for page numbers past the end.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.limit)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_is_clamped_to_config_bounds() {
        let config = AppConfig::for_tests();

        let req = PageRequest::new(Some(0), Some(500), &config);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, config.max_page_size);

        let req = PageRequest::new(None, None, &config);
        assert_eq!(req.limit, config.default_page_size);
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = PageRequest { page: 3, limit: 10 };
        assert_eq!(req.skip(), 20);
        assert_eq!(req.total_pages(0), 0);
        assert_eq!(req.total_pages(21), 3);
        assert_eq!(req.total_pages(30), 3);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let config = AppConfig::for_tests();

        let req = PageRequest::new(Some(u64::MAX), Some(10), &config);
        assert_eq!(req.page, u64::MAX);
        assert_eq!(req.skip(), u64::MAX);
    }
}
