//! Pagination
//!
//! Every list endpoint takes `page`, `limit`, `search`, `sort` and `order`
//! query parameters and answers with [`Paginated`]. Sort columns are never
//! taken from the request verbatim: each resource declares a [`SortField`]
//! enum and the raw value must parse into it.

use serde::{Deserialize, Serialize};

use crate::error::app_error::{AppError, AppResult};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Allow-list of sortable columns for one resource.
pub trait SortField: Copy {
    /// Column used when the request names none
    const DEFAULT: Self;
    /// Direction used when the request names none
    const DEFAULT_ORDER: SortOrder = SortOrder::Desc;

    /// Accepts the public (snake_case) field name
    fn parse(raw: &str) -> Option<Self>;

    /// Column expression to splice into `ORDER BY`
    fn column(&self) -> &'static str;
}

/// Raw pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(
    feature = "openapi",
    derive(utoipa::IntoParams),
    into_params(parameter_in = Query)
)]
pub struct PageQuery {
    /// 1-based page number, default 1
    pub page: Option<u32>,
    /// Page size, 1 to 100, default 10
    pub limit: Option<u32>,
    /// Free-text search
    pub search: Option<String>,
    /// Sort field from the resource's allow-list
    #[serde(alias = "sortBy")]
    pub sort: Option<String>,
    /// `asc` or `desc`
    #[serde(alias = "sortOrder")]
    pub order: Option<String>,
}

impl PageQuery {
    /// Validate and resolve defaults against a resource's sort allow-list.
    pub fn resolve<S: SortField>(self) -> AppResult<PageRequest<S>> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        if page == 0 {
            return Err(AppError::bad_request("page must be at least 1"));
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(AppError::bad_request(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        let sort = match non_blank(self.sort) {
            Some(raw) => S::parse(&raw).ok_or_else(|| AppError::bad_request("Invalid sort field"))?,
            None => S::DEFAULT,
        };

        let order = match non_blank(self.order) {
            Some(raw) => {
                SortOrder::parse(&raw).ok_or_else(|| AppError::bad_request("Invalid sort order"))?
            }
            None => S::DEFAULT_ORDER,
        };

        Ok(PageRequest {
            page,
            limit,
            search: non_blank(self.search),
            sort,
            order,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validated pagination request
#[derive(Debug, Clone)]
pub struct PageRequest<S> {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort: S,
    pub order: SortOrder,
}

impl<S> PageRequest<S> {
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// `ILIKE` pattern for the search term, if any
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| format!("%{s}%"))
    }

    /// Cut one page out of an already filtered and sorted list.
    pub fn window<T>(&self, items: Vec<T>) -> Paginated<T> {
        let total = items.len() as i64;
        let data = items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit as usize)
            .collect();
        Paginated::new(data, total, self)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new<S>(data: Vec<T>, total: i64, request: &PageRequest<S>) -> Self {
        let limit = i64::from(request.limit);
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            total_pages: (total + limit - 1) / limit,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Column {
        CreatedAt,
        Name,
    }

    impl SortField for Column {
        const DEFAULT: Self = Column::CreatedAt;

        fn parse(raw: &str) -> Option<Self> {
            match raw {
                "created_at" => Some(Column::CreatedAt),
                "name" => Some(Column::Name),
                _ => None,
            }
        }

        fn column(&self) -> &'static str {
            match self {
                Column::CreatedAt => "created_at",
                Column::Name => "name",
            }
        }
    }

    #[test]
    fn test_defaults() {
        let request = PageQuery::default().resolve::<Column>().unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 10);
        assert_eq!(request.sort, Column::CreatedAt);
        assert_eq!(request.order, SortOrder::Desc);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        let query = PageQuery {
            sort: Some("password; DROP TABLE users".to_string()),
            ..Default::default()
        };
        let err = query.resolve::<Column>().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Invalid sort field");
    }

    #[test]
    fn test_invalid_order_and_limit() {
        let query = PageQuery {
            order: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(query.resolve::<Column>().is_err());

        let query = PageQuery {
            limit: Some(MAX_LIMIT + 1),
            ..Default::default()
        };
        assert!(query.resolve::<Column>().is_err());

        let query = PageQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(query.resolve::<Column>().is_err());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = PageQuery {
            search: Some("   ".to_string()),
            sort: Some("name".to_string()),
            order: Some("ASC".to_string()),
            ..Default::default()
        };
        let request = query.resolve::<Column>().unwrap();
        assert!(request.search.is_none());
        assert_eq!(request.sort.column(), "name");
        assert_eq!(request.order.as_sql(), "ASC");
    }

    #[test]
    fn test_window_and_total_pages() {
        let query = PageQuery {
            page: Some(2),
            limit: Some(3),
            ..Default::default()
        };
        let request = query.resolve::<Column>().unwrap();
        let page = request.window((1..=7).collect::<Vec<_>>());
        assert_eq!(page.data, vec![4, 5, 6]);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);

        let json = serde_json::to_value(page.map(|n| n * 10)).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["data"][0], 40);
    }
}
