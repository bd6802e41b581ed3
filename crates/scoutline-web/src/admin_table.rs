//! Data fetching for the admin tables
//!
//! Every page, sort or search change issues a fetch. Each fetch is stamped
//! with a [`FetchTicket`]; only the most recently issued ticket may replace
//! the rows, so a slow response to an old filter cannot overwrite a newer one.

use crate::api_client::{ApiClient, ClientError, Resource, Session};
use scoutline_api::extractors::PaginationMeta;
use scoutline_api::handlers::ListResponse;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// Default rows per page in admin tables
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Alert text for 401/403 responses
pub const ACCESS_DENIED: &str = "Access denied";

/// Sort direction sent as `order`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    #[default]
    Desc,
}

impl SortDirection {
    /// The other direction
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Table state sent to a listing endpoint as its query string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Page number (1-based)
    pub page: u32,
    /// Rows per page
    pub per_page: u32,
    /// Sort column
    #[serde(rename = "sort", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort direction
    #[serde(rename = "order")]
    pub sort_dir: SortDirection,
    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Status filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sort_by: None,
            sort_dir: SortDirection::default(),
            search: None,
            status: None,
        }
    }
}

impl TableQuery {
    /// Encode as `application/x-www-form-urlencoded`
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be encoded.
    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }
}

/// Identifies one issued fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    /// Query the fetch was issued for
    pub query: TableQuery,
}

impl FetchTicket {
    /// Position in issue order
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.seq
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// An operation failed
    Error,
    /// An operation succeeded
    Success,
}

/// Dismissable notification shown above the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Handle for [`AdminTable::dismiss`]
    pub id: u64,
    /// Severity
    pub kind: AlertKind,
    /// Text shown to the user
    pub message: String,
}

/// Rows, paging and alerts for one admin table
#[derive(Debug)]
pub struct AdminTable<R: Resource> {
    rows: Vec<R::Item>,
    pagination: Option<PaginationMeta>,
    loading: bool,
    alerts: Vec<Alert>,
    query: TableQuery,
    issued: u64,
    next_alert_id: u64,
}

impl<R: Resource> Default for AdminTable<R> {
    fn default() -> Self {
        Self::new(TableQuery::default())
    }
}

impl<R: Resource> AdminTable<R> {
    /// Empty table that will fetch with `query`
    #[must_use]
    pub const fn new(query: TableQuery) -> Self {
        Self {
            rows: Vec::new(),
            pagination: None,
            loading: false,
            alerts: Vec::new(),
            query,
            issued: 0,
            next_alert_id: 1,
        }
    }

    /// Rows currently displayed
    #[must_use]
    pub fn rows(&self) -> &[R::Item] {
        &self.rows
    }

    /// Paging metadata of the displayed rows
    #[must_use]
    pub const fn pagination(&self) -> Option<&PaginationMeta> {
        self.pagination.as_ref()
    }

    /// Whether the latest fetch is still outstanding
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current query
    #[must_use]
    pub const fn query(&self) -> &TableQuery {
        &self.query
    }

    /// Alerts not yet dismissed, oldest first
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Issue a fetch for the current query
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket {
            seq: self.issued,
            query: self.query.clone(),
        }
    }

    /// Go to `page` and fetch it
    pub fn set_page(&mut self, page: u32) -> FetchTicket {
        self.query.page = page.max(1);
        self.begin_fetch()
    }

    /// Sort by `column`; picking the current column again flips the direction
    pub fn set_sort(&mut self, column: &str) -> FetchTicket {
        if self.query.sort_by.as_deref() == Some(column) {
            self.query.sort_dir = self.query.sort_dir.flipped();
        } else {
            self.query.sort_by = Some(column.to_string());
            self.query.sort_dir = SortDirection::Asc;
        }
        self.query.page = 1;
        self.begin_fetch()
    }

    /// Search for `term` from the first page; a blank term clears the search
    pub fn set_search(&mut self, term: &str) -> FetchTicket {
        let term = term.trim();
        self.query.search = (!term.is_empty()).then(|| term.to_string());
        self.query.page = 1;
        self.begin_fetch()
    }

    /// Apply the outcome of a fetch
    ///
    /// Returns `false` and changes nothing when a newer fetch has been issued
    /// since `ticket`.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ListResponse<R::Item>, ClientError>,
    ) -> bool {
        if ticket.seq != self.issued {
            debug!(
                ticket = ticket.seq,
                latest = self.issued,
                "Discarding stale table response"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(listing) => {
                self.rows = listing.data;
                self.pagination = Some(listing.pagination);
            }
            Err(e) => {
                warn!(path = R::PATH, "Failed to load table: {}", e);
                self.push_error(&e, "Failed to load data");
            }
        }
        true
    }

    /// Fetch the current query and apply the result
    pub async fn refresh(&mut self, client: &ApiClient, session: &Session) -> bool {
        let ticket = self.begin_fetch();
        let result = client.list::<R>(session, &ticket.query).await;
        self.complete(&ticket, result)
    }

    /// Delete a row through the API; the row is removed locally on success
    pub async fn delete_row(&mut self, client: &ApiClient, session: &Session, id: Uuid) -> bool {
        match client.delete::<R>(session, id).await {
            Ok(()) => {
                let before = self.rows.len();
                self.rows.retain(|row| R::id(row) != id);
                if self.rows.len() < before {
                    if let Some(pagination) = self.pagination.as_mut() {
                        pagination.total = pagination.total.saturating_sub(1);
                    }
                }
                self.push_alert(AlertKind::Success, "Deleted".to_string());
                true
            }
            Err(e) => {
                warn!(path = R::PATH, %id, "Failed to delete row: {}", e);
                self.push_error(&e, "Failed to delete");
                false
            }
        }
    }

    /// Update a row through the API; the returned row replaces the local copy
    pub async fn update_row(
        &mut self,
        client: &ApiClient,
        session: &Session,
        id: Uuid,
        body: &R::Update,
    ) -> bool {
        match client.update::<R>(session, id, body).await {
            Ok(updated) => {
                if let Some(row) = self.rows.iter_mut().find(|row| R::id(row) == id) {
                    *row = updated;
                }
                self.push_alert(AlertKind::Success, "Saved".to_string());
                true
            }
            Err(e) => {
                warn!(path = R::PATH, %id, "Failed to update row: {}", e);
                self.push_error(&e, "Failed to save");
                false
            }
        }
    }

    /// Remove an alert; returns whether it existed
    pub fn dismiss(&mut self, alert_id: u64) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.id != alert_id);
        self.alerts.len() < before
    }

    fn push_error(&mut self, error: &ClientError, action: &str) {
        let message = if error.is_unauthorized() {
            ACCESS_DENIED.to_string()
        } else {
            format!("{action}: {error}")
        };
        self.push_alert(AlertKind::Error, message);
    }

    fn push_alert(&mut self, kind: AlertKind, message: String) {
        let id = self.next_alert_id;
        self.next_alert_id += 1;
        self.alerts.push(Alert { id, kind, message });
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::api_client::Orders;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use reqwest::Client;
    use scoutline_api::handlers::orders::StatusChange;
    use scoutline_core::{Order, OrderStatus, Plan};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn order(amount_cents: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            customer_email: "club@example.com".to_string(),
            plan: Plan::Basic,
            amount_cents,
            currency: "EUR".to_string(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn listing(rows: Vec<Order>) -> ListResponse<Order> {
        let total = rows.len() as u64;
        ListResponse {
            data: rows,
            pagination: PaginationMeta {
                page: 1,
                per_page: DEFAULT_PER_PAGE,
                total,
                total_pages: 1,
                has_next: false,
                has_prev: false,
                next_page: None,
                prev_page: None,
            },
        }
    }

    #[test]
    fn test_query_string() {
        let query = TableQuery {
            sort_by: Some("amount_cents".to_string()),
            sort_dir: SortDirection::Asc,
            search: Some("club".to_string()),
            ..TableQuery::default()
        };
        assert_eq!(
            query.to_query_string().unwrap(),
            "page=1&per_page=20&sort=amount_cents&order=asc&search=club"
        );
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut table = AdminTable::<Orders>::default();
        let first = table.set_search("old");
        let second = table.set_search("new");

        assert!(table.complete(&second, Ok(listing(vec![order(200)]))));
        assert!(!table.complete(&first, Ok(listing(vec![order(100), order(100)]))));

        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].amount_cents, 200);
        assert!(!table.is_loading());
    }

    #[test]
    fn test_stale_response_does_not_clear_loading() {
        let mut table = AdminTable::<Orders>::default();
        let first = table.begin_fetch();
        let _second = table.set_page(2);

        assert!(!table.complete(&first, Ok(listing(Vec::new()))));
        assert!(table.is_loading());
    }

    #[test]
    fn test_failure_keeps_rows_and_alerts() {
        let mut table = AdminTable::<Orders>::default();
        let ticket = table.begin_fetch();
        table.complete(&ticket, Ok(listing(vec![order(100)])));

        let ticket = table.set_page(2);
        table.complete(
            &ticket,
            Err(ClientError::Unauthorized {
                status: 403,
                message: "forbidden".to_string(),
            }),
        );

        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.alerts().len(), 1);
        assert_eq!(table.alerts()[0].message, ACCESS_DENIED);

        let alert_id = table.alerts()[0].id;
        assert!(table.dismiss(alert_id));
        assert!(!table.dismiss(alert_id));
        assert!(table.alerts().is_empty());
    }

    #[test]
    fn test_set_sort_toggles_direction() {
        let mut table = AdminTable::<Orders>::default();
        table.set_page(3);
        table.set_sort("amount_cents");
        assert_eq!(table.query().sort_dir, SortDirection::Asc);
        assert_eq!(table.query().page, 1);

        table.set_sort("amount_cents");
        assert_eq!(table.query().sort_dir, SortDirection::Desc);

        table.set_sort("status");
        assert_eq!(table.query().sort_by.as_deref(), Some("status"));
        assert_eq!(table.query().sort_dir, SortDirection::Asc);
    }

    #[tokio::test]
    async fn test_refresh_and_row_actions() {
        let server = MockServer::start().await;
        let row = order(4_900);
        let mut paid = row.clone();
        paid.status = OrderStatus::Paid;

        Mock::given(method("GET"))
            .and(path("/api/v1/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![row.clone()])))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("/api/v1/orders/{}/status", row.id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(&paid))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/api/v1/orders/{}", row.id)))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": "Invalid token", "code": "INVALID_TOKEN"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::with_client(Client::new(), &server.uri());
        let session = Session::bearer("tok");
        let mut table = AdminTable::<Orders>::default();

        assert!(table.refresh(&client, &session).await);
        assert_eq!(table.rows().len(), 1);

        let change = StatusChange {
            status: OrderStatus::Paid,
        };
        assert!(table.update_row(&client, &session, row.id, &change).await);
        assert_eq!(table.rows()[0].status, OrderStatus::Paid);

        assert!(!table.delete_row(&client, &session, row.id).await);
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.alerts().last().unwrap().message, ACCESS_DENIED);
    }
}
