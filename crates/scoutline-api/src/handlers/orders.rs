//! Order endpoints for the admin order table and payment dashboard

use super::{ApiResult, ListResponse, not_found, store_error};
use crate::{
    extractors::{ExtractorError, ListQuery, ValidatedJson},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use scoutline_core::{NewOrder, Order, OrderStatus, PaymentMetrics};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Body of `PUT /orders/:id/status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusChange {
    /// New payment state
    pub status: OrderStatus,
}

/// `GET /orders`
#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    query: ListQuery,
) -> ApiResult<Json<ListResponse<Order>>> {
    let (filter, pagination) = query
        .order_filter(&state.config.api)
        .map_err(ExtractorError::into_api_error)?;

    let page = state
        .repo
        .list_orders(&filter)
        .await
        .map_err(|e| store_error("list orders", e))?;

    Ok(Json(ListResponse {
        data: page.items,
        pagination: pagination.meta(page.total),
    }))
}

/// `GET /orders/:id`
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Order>> {
    state
        .repo
        .get_order(id)
        .await
        .map_err(|e| store_error("load order", e))?
        .map(Json)
        .ok_or_else(|| not_found("Order"))
}

/// `POST /orders`
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    ValidatedJson(new): ValidatedJson<NewOrder>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let owner = state
        .repo
        .get_profile(new.profile_id)
        .await
        .map_err(|e| store_error("load profile", e))?;
    if owner.is_none() {
        return Err(not_found("Profile"));
    }

    let order = state
        .repo
        .insert_order(Order::from_new(new))
        .await
        .map_err(|e| store_error("create order", e))?;

    info!(id = %order.id, plan = %order.plan, amount_cents = order.amount_cents, "Order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// `PUT /orders/:id/status`
pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange>,
) -> ApiResult<Json<Order>> {
    let order = state
        .repo
        .set_order_status(id, change.status)
        .await
        .map_err(|e| store_error("update order", e))?
        .ok_or_else(|| not_found("Order"))?;

    info!(%id, status = %order.status, "Order status changed");
    Ok(Json(order))
}

/// `DELETE /orders/:id`
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = state
        .repo
        .delete_order(id)
        .await
        .map_err(|e| store_error("delete order", e))?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Order"))
    }
}

/// `GET /orders/metrics`
pub async fn payment_metrics(State(state): State<Arc<AppState>>) -> ApiResult<Json<PaymentMetrics>> {
    state
        .repo
        .payment_metrics()
        .await
        .map(Json)
        .map_err(|e| store_error("load payment metrics", e))
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::handlers::profiles::fixtures::{new_profile, test_state};
    use pretty_assertions::assert_eq;
    use scoutline_core::{Plan, Profile, ProfileKind};
    use tempfile::TempDir;

    fn new_order(profile_id: Uuid, amount_cents: i64) -> NewOrder {
        NewOrder {
            profile_id,
            customer_email: "club@example.com".to_string(),
            plan: Plan::Premium,
            amount_cents,
            currency: "eur".to_string(),
        }
    }

    #[tokio::test]
    async fn test_order_lifecycle_and_metrics() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let profile = state
            .repo
            .insert_profile(Profile::from_new(new_profile("Lia", ProfileKind::Player)))
            .await
            .unwrap();

        let (status, Json(order)) = create_order(
            State(Arc::clone(&state)),
            ValidatedJson(new_order(profile.id, 9_900)),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order.currency, "EUR");

        let Json(paid) = update_order_status(
            State(Arc::clone(&state)),
            Path(order.id),
            Json(StatusChange {
                status: OrderStatus::Paid,
            }),
        )
        .await
        .unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);

        let Json(metrics) = payment_metrics(State(Arc::clone(&state))).await.unwrap();
        assert_eq!(metrics.paid_orders, 1);
        assert_eq!(metrics.revenue_cents, 9_900);

        let status = delete_order(State(Arc::clone(&state)), Path(order.id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = get_order(State(state), Path(order.id)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_order_for_unknown_profile_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);

        let (status, Json(body)) = create_order(
            State(state),
            ValidatedJson(new_order(Uuid::new_v4(), 100)),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Profile not found");
    }
}
