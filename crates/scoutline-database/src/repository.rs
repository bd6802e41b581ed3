//! Storage seam behind the API controllers

use crate::filter::{OrderFilter, Page, ProfileFilter};
use async_trait::async_trait;
use scoutline_core::{
    MediaAttachment, Order, OrderStatus, PaymentMetrics, Profile, ProfileUpdate, Result, Settings,
};
use uuid::Uuid;

/// Persistent store for profiles, orders and settings
///
/// Lookups return `Ok(None)` / `Ok(false)` for missing rows so callers can
/// answer 404 without matching on error variants.
#[async_trait]
pub trait Repository: Send + Sync + std::fmt::Debug {
    /// List profiles matching a filter
    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Page<Profile>>;

    /// Fetch one profile
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>>;

    /// Store a new profile
    async fn insert_profile(&self, profile: Profile) -> Result<Profile>;

    /// Apply a partial update
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Option<Profile>>;

    /// Remove a profile together with its orders
    async fn delete_profile(&self, id: Uuid) -> Result<bool>;

    /// Append a media attachment
    async fn add_media(&self, id: Uuid, media: MediaAttachment) -> Result<Option<Profile>>;

    /// List orders matching a filter
    async fn list_orders(&self, filter: &OrderFilter) -> Result<Page<Order>>;

    /// Fetch one order
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>>;

    /// Store a new order
    async fn insert_order(&self, order: Order) -> Result<Order>;

    /// Change an order's payment state
    async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>>;

    /// Remove an order
    async fn delete_order(&self, id: Uuid) -> Result<bool>;

    /// Aggregate payment figures over all orders
    async fn payment_metrics(&self) -> Result<PaymentMetrics>;

    /// Current settings, defaulted when never written
    async fn get_settings(&self) -> Result<Settings>;

    /// Replace the settings document
    async fn put_settings(&self, settings: Settings) -> Result<Settings>;

    /// Verify the store is reachable
    async fn health_check(&self) -> Result<()>;

    /// Short backend name for diagnostics
    fn backend_name(&self) -> &'static str;
}
