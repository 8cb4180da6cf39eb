use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageParams {
    /// Pick `page` and `limit` out of raw query pairs; malformed values are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => params.page = value.parse().ok(),
                "limit" => params.limit = value.parse().ok(),
                _ => {}
            }
        }
        params
    }
}

/// A resolved page window: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub const MAX_LIMIT: u32 = 100;

    pub fn resolve(params: PageParams, default_limit: u32) -> Self {
        let limit = params
            .limit
            .unwrap_or(default_limit)
            .clamp(1, Self::MAX_LIMIT);
        let page = params.page.unwrap_or(1).max(1);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// `next`/`previous` are rendered as query strings relative to the list endpoint.
    pub fn new(results: Vec<T>, count: i64, pagination: Pagination) -> Self {
        let shown = pagination.offset() + results.len() as i64;
        let next = (shown < count).then(|| link(pagination.page + 1, pagination.limit));
        let previous = (pagination.page > 1).then(|| link(pagination.page - 1, pagination.limit));

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

fn link(page: u32, limit: u32) -> String {
    format!("?page={}&limit={}", page, limit)
}
