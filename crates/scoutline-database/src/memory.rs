//! Process-local repository used for development and tests

use crate::filter::{OrderFilter, Page, ProfileFilter};
use crate::repository::Repository;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use scoutline_core::{
    MediaAttachment, Order, OrderStatus, PaymentMetrics, Profile, ProfileUpdate, Result, Settings,
};
use tracing::debug;
use uuid::Uuid;

/// `DashMap`-backed repository
#[derive(Debug, Default)]
pub struct MemoryRepository {
    profiles: DashMap<Uuid, Profile>,
    orders: DashMap<Uuid, Order>,
    settings: RwLock<Option<Settings>>,
}

impl MemoryRepository {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Page<Profile>> {
        let rows: Vec<Profile> = self
            .profiles
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        Ok(Page::paginate(
            rows,
            |a, b| filter.compare(a, b),
            filter.limit,
            filter.offset,
        ))
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert_profile(&self, profile: Profile) -> Result<Profile> {
        debug!("Inserting profile {}", profile.id);
        self.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Option<Profile>> {
        Ok(self.profiles.get_mut(&id).map(|mut entry| {
            entry.apply(update);
            entry.value().clone()
        }))
    }

    async fn delete_profile(&self, id: Uuid) -> Result<bool> {
        let removed = self.profiles.remove(&id).is_some();
        if removed {
            self.orders.retain(|_, order| order.profile_id != id);
        }
        Ok(removed)
    }

    async fn add_media(&self, id: Uuid, media: MediaAttachment) -> Result<Option<Profile>> {
        Ok(self.profiles.get_mut(&id).map(|mut entry| {
            entry.media.push(media);
            entry.updated_at = chrono::Utc::now();
            entry.value().clone()
        }))
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Page<Order>> {
        let rows: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        Ok(Page::paginate(
            rows,
            |a, b| filter.compare(a, b),
            filter.limit,
            filter.offset,
        ))
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self.orders.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert_order(&self, order: Order) -> Result<Order> {
        debug!("Inserting order {} for profile {}", order.id, order.profile_id);
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>> {
        Ok(self.orders.get_mut(&id).map(|mut entry| {
            entry.status = status;
            entry.updated_at = chrono::Utc::now();
            entry.value().clone()
        }))
    }

    async fn delete_order(&self, id: Uuid) -> Result<bool> {
        Ok(self.orders.remove(&id).is_some())
    }

    async fn payment_metrics(&self) -> Result<PaymentMetrics> {
        let orders: Vec<Order> = self.orders.iter().map(|e| e.value().clone()).collect();
        Ok(PaymentMetrics::from_orders(&orders))
    }

    async fn get_settings(&self) -> Result<Settings> {
        Ok(self.settings.read().clone().unwrap_or_default())
    }

    async fn put_settings(&self, settings: Settings) -> Result<Settings> {
        *self.settings.write() = Some(settings.clone());
        Ok(settings)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::filter::{OrderSort, ProfileSort, SortDirection};
    use pretty_assertions::assert_eq;
    use scoutline_core::{NewOrder, NewProfile, Plan, ProfileKind, ProfileStatus};

    fn new_profile(first: &str, kind: ProfileKind) -> Profile {
        Profile::from_new(NewProfile {
            kind,
            first_name: first.to_string(),
            last_name: "Test".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: None,
            date_of_birth: None,
            sport: "football".to_string(),
            position: "goalkeeper".to_string(),
            nationality: "fr".to_string(),
            height_cm: None,
            weight_kg: None,
            bio: None,
        })
    }

    fn new_order(profile_id: Uuid, amount_cents: i64) -> Order {
        Order::from_new(NewOrder {
            profile_id,
            customer_email: "club@example.com".to_string(),
            plan: Plan::Basic,
            amount_cents,
            currency: "EUR".to_string(),
        })
    }

    fn page_filter() -> ProfileFilter {
        ProfileFilter {
            limit: 10,
            ..ProfileFilter::default()
        }
    }

    #[tokio::test]
    async fn test_insert_get_delete_profile() {
        let repo = MemoryRepository::new();
        let profile = repo.insert_profile(new_profile("Lena", ProfileKind::Player)).await.unwrap();

        let fetched = repo.get_profile(profile.id).await.unwrap();
        assert_eq!(fetched, Some(profile.clone()));

        assert!(repo.delete_profile(profile.id).await.unwrap());
        assert!(!repo.delete_profile(profile.id).await.unwrap());
        assert!(repo.get_profile(profile.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_profiles_filters_kind_and_pages() {
        let repo = MemoryRepository::new();
        for name in ["Ana", "Bea", "Cleo"] {
            repo.insert_profile(new_profile(name, ProfileKind::Player)).await.unwrap();
        }
        repo.insert_profile(new_profile("Dora", ProfileKind::Coach)).await.unwrap();

        let filter = ProfileFilter {
            kind: Some(ProfileKind::Player),
            sort: ProfileSort::FirstName,
            direction: SortDirection::Asc,
            limit: 2,
            offset: 0,
            ..ProfileFilter::default()
        };
        let page = repo.list_profiles(&filter).await.unwrap();
        assert_eq!(page.total, 3);
        let names: Vec<_> = page.items.iter().map(|p| p.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bea"]);

        let coaches = ProfileFilter {
            kind: Some(ProfileKind::Coach),
            ..page_filter()
        };
        assert_eq!(repo.list_profiles(&coaches).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_update_and_media() {
        let repo = MemoryRepository::new();
        let profile = repo.insert_profile(new_profile("Lena", ProfileKind::Player)).await.unwrap();

        let updated = repo
            .update_profile(
                profile.id,
                ProfileUpdate {
                    status: Some(ProfileStatus::Approved),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ProfileStatus::Approved);

        let media = MediaAttachment {
            id: Uuid::new_v4(),
            filename: "highlight.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            size_bytes: 1024,
            path: "2024/01/01/x.mp4".to_string(),
            uploaded_at: chrono::Utc::now(),
        };
        let with_media = repo.add_media(profile.id, media.clone()).await.unwrap().unwrap();
        assert_eq!(with_media.media, vec![media]);

        assert!(repo
            .update_profile(Uuid::new_v4(), ProfileUpdate::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_orders_and_metrics() {
        let repo = MemoryRepository::new();
        let profile = repo.insert_profile(new_profile("Lena", ProfileKind::Player)).await.unwrap();

        let small = repo.insert_order(new_order(profile.id, 1_000)).await.unwrap();
        let large = repo.insert_order(new_order(profile.id, 5_000)).await.unwrap();
        repo.set_order_status(small.id, OrderStatus::Paid).await.unwrap();
        repo.set_order_status(large.id, OrderStatus::Paid).await.unwrap();

        let metrics = repo.payment_metrics().await.unwrap();
        assert_eq!(metrics.paid_orders, 2);
        assert_eq!(metrics.revenue_cents, 6_000);

        let filter = OrderFilter {
            sort: OrderSort::Amount,
            direction: SortDirection::Desc,
            limit: 10,
            ..OrderFilter::default()
        };
        let page = repo.list_orders(&filter).await.unwrap();
        assert_eq!(page.items.first().map(|o| o.id), Some(large.id));
    }

    #[tokio::test]
    async fn test_delete_profile_cascades_orders() {
        let repo = MemoryRepository::new();
        let profile = repo.insert_profile(new_profile("Lena", ProfileKind::Player)).await.unwrap();
        let order = repo.insert_order(new_order(profile.id, 1_000)).await.unwrap();

        repo.delete_profile(profile.id).await.unwrap();
        assert!(repo.get_order(order.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settings_default_then_replace() {
        let repo = MemoryRepository::new();
        assert_eq!(repo.get_settings().await.unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.site_name = "Scout Pro".to_string();
        repo.put_settings(settings.clone()).await.unwrap();
        assert_eq!(repo.get_settings().await.unwrap(), settings);
    }
}
