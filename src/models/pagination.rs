// Offset pagination shared by every list endpoint

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Highest page whose offset still fits in an i64 at the largest page size
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl Pagination {
    /// Page number clamped to 1..=MAX_PAGE
    pub fn page(&self) -> i64 {
        self.page.clamp(1, MAX_PAGE)
    }

    /// Page size clamped to 1..=100
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// `{items, total, page, limit, total_pages}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        let limit = pagination.limit();
        Self {
            items,
            total,
            page: pagination.page(),
            limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!((p.page(), p.limit(), p.offset()), (1, 10, 0));
    }

    #[test]
    fn test_clamping() {
        let p = Pagination { page: 0, limit: 500 };
        assert_eq!((p.page(), p.limit()), (1, 100));

        let p = Pagination { page: 3, limit: 20 };
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let p = Pagination {
            page: i64::MAX,
            limit: 100,
        };
        assert_eq!(p.page(), MAX_PAGE);
        assert!(p.offset() >= 0);
        assert_eq!(p.offset(), (MAX_PAGE - 1) * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages() {
        let page = Paginated::new(vec![1, 2, 3], 21, Pagination { page: 1, limit: 10 });
        assert_eq!(page.total_pages, 3);

        let empty: Paginated<i32> = Paginated::new(vec![], 0, Pagination::default());
        assert_eq!(empty.total_pages, 0);
    }
}
