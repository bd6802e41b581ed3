//! Row types for the PostgreSQL backend

use chrono::{DateTime, NaiveDate, Utc};
use scoutline_core::{Error, MediaAttachment, Order, Profile, Result};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

/// Database row for `profiles`
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    /// Unique identifier
    pub id: Uuid,
    /// `player` or `coach`
    pub kind: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Sport key
    pub sport: String,
    /// Position key
    pub position: String,
    /// Nationality code
    pub nationality: String,
    /// Height in centimetres
    pub height_cm: Option<i32>,
    /// Weight in kilograms
    pub weight_kg: Option<i32>,
    /// Free-text presentation
    pub bio: Option<String>,
    /// Attachments as a JSON array
    pub media: Json<Vec<MediaAttachment>>,
    /// Moderation state
    pub status: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = Error;

    fn try_from(row: ProfileRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            kind: row.kind.parse()?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            date_of_birth: row.date_of_birth,
            sport: row.sport,
            position: row.position,
            nationality: row.nationality,
            height_cm: row.height_cm.map(small_unsigned).transpose()?,
            weight_kg: row.weight_kg.map(small_unsigned).transpose()?,
            bio: row.bio,
            media: row.media.0,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Database row for `orders`
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    /// Unique identifier
    pub id: Uuid,
    /// Owning profile
    pub profile_id: Uuid,
    /// Billing email
    pub customer_email: String,
    /// `basic`, `premium` or `elite`
    pub plan: String,
    /// Amount in minor units
    pub amount_cents: i64,
    /// Currency code
    pub currency: String,
    /// Payment state
    pub status: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = Error;

    fn try_from(row: OrderRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            profile_id: row.profile_id,
            customer_email: row.customer_email,
            plan: row.plan.parse()?,
            amount_cents: row.amount_cents,
            currency: row.currency.trim_end().to_string(),
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Aggregates returned by the metrics query
#[derive(Debug, Clone, Default, FromRow)]
pub struct MetricsRow {
    /// All orders
    pub total_orders: i64,
    /// Paid orders
    pub paid_orders: i64,
    /// Pending orders
    pub pending_orders: i64,
    /// Failed orders
    pub failed_orders: i64,
    /// Refunded orders
    pub refunded_orders: i64,
    /// Sum over paid orders
    pub revenue_cents: i64,
}

fn small_unsigned(value: i32) -> Result<u16> {
    u16::try_from(value).map_err(|e| Error::Database(format!("Invalid measurement {value}: {e}")))
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scoutline_core::{OrderStatus, ProfileKind, ProfileStatus};

    fn profile_row() -> ProfileRow {
        let now = Utc::now();
        ProfileRow {
            id: Uuid::new_v4(),
            kind: "coach".to_string(),
            first_name: "Iris".to_string(),
            last_name: "Nakamura".to_string(),
            email: "iris@example.com".to_string(),
            phone: None,
            date_of_birth: None,
            sport: "basketball".to_string(),
            position: "headCoach".to_string(),
            nationality: "jp".to_string(),
            height_cm: Some(171),
            weight_kg: None,
            bio: None,
            media: Json(Vec::new()),
            status: "approved".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_profile_row_converts() {
        let profile = Profile::try_from(profile_row()).unwrap();
        assert_eq!(profile.kind, ProfileKind::Coach);
        assert_eq!(profile.status, ProfileStatus::Approved);
        assert_eq!(profile.height_cm, Some(171));
    }

    #[test]
    fn test_profile_row_rejects_unknown_status() {
        let mut row = profile_row();
        row.status = "archived".to_string();
        assert!(Profile::try_from(row).is_err());
    }

    #[test]
    fn test_profile_row_rejects_negative_height() {
        let mut row = profile_row();
        row.height_cm = Some(-1);
        assert!(matches!(Profile::try_from(row), Err(Error::Database(_))));
    }

    #[test]
    fn test_order_row_trims_currency() {
        let now = Utc::now();
        let order = Order::try_from(OrderRow {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            customer_email: "club@example.com".to_string(),
            plan: "elite".to_string(),
            amount_cents: 19_900,
            currency: "EUR".to_string(),
            status: "paid".to_string(),
            created_at: now,
            updated_at: now,
        })
        .unwrap();
        assert_eq!(order.currency, "EUR");
        assert_eq!(order.status, OrderStatus::Paid);
    }
}
