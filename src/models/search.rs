use std::collections::HashMap;

use crate::error::ApiError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 5;

/// Filters, ordering and pagination taken from the query string.
/// Every field stays a raw string until the query is built, so a bad number
/// surfaces as a search failure rather than an event failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub search_term: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub order: Option<String>,
    pub search_tags: Option<String>,
    pub search_keywords: Option<String>,
}

/// Sort direction, interpolated into SQL text from this closed set only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `"a"` selects ascending; any other value, or none, selects descending.
    pub fn from_param(order: Option<&str>) -> Self {
        match order {
            Some("a") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl SearchRequest {
    /// Builds a request from the event's query-string map.
    /// Returns `None` when the map is absent or empty, which selects the latest-posts query.
    pub fn from_query_parameters(params: Option<&HashMap<String, String>>) -> Option<Self> {
        let params = params.filter(|p| !p.is_empty())?;
        let get = |key: &str| params.get(key).cloned();

        Some(SearchRequest {
            search_term: get("searchTerm"),
            page: get("page"),
            limit: get("limit"),
            order: get("order"),
            search_tags: get("searchTags"),
            search_keywords: get("searchKeywords"),
        })
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_param(self.order.as_deref())
    }

    pub fn page_number(&self) -> Result<i64, ApiError> {
        let page = parse_number("page", self.page.as_deref(), DEFAULT_PAGE)?;
        if page < 1 {
            return Err(ApiError::validation(format!("page must be at least 1, got {}", page)));
        }
        Ok(page)
    }

    pub fn page_size(&self) -> Result<i64, ApiError> {
        let limit = parse_number("limit", self.limit.as_deref(), DEFAULT_LIMIT)?;
        if limit < 0 {
            return Err(ApiError::validation(format!("limit cannot be negative, got {}", limit)));
        }
        Ok(limit)
    }

    /// Rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> Result<i64, ApiError> {
        let page = self.page_number()?;
        let limit = self.page_size()?;

        (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| ApiError::validation("page and limit overflow the row offset"))
    }

    /// `%term%` with inner whitespace runs widened to `%`, so `rust async` matches
    /// `rust and async`.
    pub fn content_pattern(&self) -> Option<String> {
        self.search_term.as_ref().map(|term| {
            let widened = term.split_whitespace().collect::<Vec<_>>().join("%");
            format!("%{}%", widened)
        })
    }
}

fn parse_number(name: &str, value: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| ApiError::validation(format!("{} must be an integer, got {:?}", name, raw))),
    }
}
