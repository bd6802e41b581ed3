//! List query extractor and pagination metadata

use crate::extractors::ExtractorError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use scoutline_core::config::ApiConfig;
use scoutline_core::{OrderStatus, ProfileKind, ProfileStatus};
use scoutline_database::{OrderFilter, OrderSort, ProfileFilter, ProfileSort, SortDirection};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Query parameters accepted by every list endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListQuery {
    /// Page number (1-based)
    #[validate(range(min = 1, max = 100_000))]
    pub page: Option<u32>,

    /// Number of items per page
    #[validate(range(min = 1, max = 1000))]
    pub per_page: Option<u32>,

    /// Sort column
    pub sort: Option<String>,

    /// Sort direction, `asc` or `desc`
    pub order: Option<String>,

    /// Free-text search term
    #[validate(length(max = 200))]
    pub search: Option<String>,

    /// Status filter
    pub status: Option<String>,

    /// Sport filter (profiles)
    pub sport: Option<String>,

    /// Kind filter (profiles)
    pub kind: Option<String>,

    /// Owning profile (orders)
    pub profile_id: Option<Uuid>,
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-based)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

/// Pagination block of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page (1-based)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Items across all pages
    pub total: u64,
    /// Number of pages, 0 when there are no items
    pub total_pages: u64,
    /// Whether a later page exists
    pub has_next: bool,
    /// Whether an earlier page exists
    pub has_prev: bool,
    /// Next page number
    pub next_page: Option<u32>,
    /// Previous page number
    pub prev_page: Option<u32>,
}

impl Pagination {
    /// Rows to skip
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Metadata for a page given the unpaged total
    #[must_use]
    pub fn meta(&self, total: u64) -> PaginationMeta {
        let per_page = u64::from(self.per_page.max(1));
        let total_pages = total.div_ceil(per_page);
        let has_next = u64::from(self.page) < total_pages;
        let has_prev = self.page > 1;

        PaginationMeta {
            page: self.page,
            per_page: self.per_page,
            total,
            total_pages,
            has_next,
            has_prev,
            next_page: has_next.then(|| self.page.saturating_add(1)),
            prev_page: has_prev.then(|| self.page - 1),
        }
    }
}

fn parse_param<T>(name: &str, value: Option<&str>) -> Result<Option<T>, ExtractorError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| ExtractorError::invalid_parameters(format!("Invalid '{name}': {e}")))
        })
        .transpose()
}

impl ListQuery {
    /// Page window with configured defaults and the max page size applied
    #[must_use]
    pub fn pagination(&self, api: &ApiConfig) -> Pagination {
        Pagination {
            page: self.page.unwrap_or(1).max(1),
            per_page: self
                .per_page
                .unwrap_or(api.default_page_size)
                .clamp(1, api.max_page_size.max(1)),
        }
    }

    fn direction(&self) -> Result<SortDirection, ExtractorError> {
        Ok(parse_param("order", self.order.as_deref())?.unwrap_or_default())
    }

    /// Build a profile filter; `kind` overrides any `kind` query parameter
    ///
    /// # Errors
    ///
    /// Returns an error for unknown sort columns, directions or enum values.
    pub fn profile_filter(
        &self,
        api: &ApiConfig,
        kind: Option<ProfileKind>,
    ) -> Result<(ProfileFilter, Pagination), ExtractorError> {
        let pagination = self.pagination(api);
        let filter = ProfileFilter {
            kind: match kind {
                Some(kind) => Some(kind),
                None => parse_param("kind", self.kind.as_deref())?,
            },
            status: parse_param::<ProfileStatus>("status", self.status.as_deref())?,
            sport: self
                .sport
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            search: self.search.clone(),
            sort: parse_param::<ProfileSort>("sort", self.sort.as_deref())?.unwrap_or_default(),
            direction: self.direction()?,
            limit: pagination.per_page,
            offset: pagination.offset(),
        };
        Ok((filter, pagination))
    }

    /// Build an order filter
    ///
    /// # Errors
    ///
    /// Returns an error for unknown sort columns, directions or statuses.
    pub fn order_filter(&self, api: &ApiConfig) -> Result<(OrderFilter, Pagination), ExtractorError> {
        let pagination = self.pagination(api);
        let filter = OrderFilter {
            status: parse_param::<OrderStatus>("status", self.status.as_deref())?,
            profile_id: self.profile_id,
            search: self.search.clone(),
            sort: parse_param::<OrderSort>("sort", self.sort.as_deref())?.unwrap_or_default(),
            direction: self.direction()?,
            limit: pagination.per_page,
            offset: pagination.offset(),
        };
        Ok((filter, pagination))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ExtractorError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();

        let list_query: Self = serde_urlencoded::from_str(query).map_err(|e| {
            ExtractorError::invalid_parameters(format!("Invalid query parameters: {e}"))
        })?;

        if let Err(validation_errors) = list_query.validate() {
            return Err(ExtractorError {
                code: "INVALID_PARAMETERS".to_string(),
                message: "Invalid query parameters".to_string(),
                ..ExtractorError::validation_failed(&validation_errors)
            });
        }

        Ok(list_query)
    }
}
