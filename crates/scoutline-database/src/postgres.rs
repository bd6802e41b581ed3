//! PostgreSQL repository

use crate::Database;
use crate::filter::{OrderFilter, Page, ProfileFilter, like_pattern};
use crate::models::{MetricsRow, OrderRow, ProfileRow};
use crate::repository::Repository;
use async_trait::async_trait;
use scoutline_core::{
    Error, MediaAttachment, Order, OrderStatus, PaymentMetrics, Profile, ProfileUpdate, Result,
    Settings,
};
use sqlx::{Postgres, QueryBuilder, types::Json};
use tracing::{debug, instrument};
use uuid::Uuid;

const PROFILE_SEARCH_COLUMNS: [&str; 7] = [
    "first_name",
    "last_name",
    "email",
    "sport",
    "position",
    "nationality",
    "(first_name || ' ' || last_name)",
];

fn db_error(e: sqlx::Error) -> Error {
    Error::Database(e.to_string())
}

fn total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

fn push_profile_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProfileFilter) {
    builder.push(" WHERE TRUE");
    if let Some(kind) = filter.kind {
        builder.push(" AND kind = ").push_bind(kind.as_str());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(sport) = &filter.sport {
        builder.push(" AND sport = ").push_bind(sport.clone());
    }
    if let Some(term) = filter.search_term() {
        let pattern = like_pattern(&term);
        builder.push(" AND (");
        let mut any = builder.separated(" OR ");
        for column in PROFILE_SEARCH_COLUMNS {
            any.push(format!("{column} ILIKE "));
            any.push_bind_unseparated(pattern.clone());
        }
        builder.push(")");
    }
}

fn push_order_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
    builder.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(profile_id) = filter.profile_id {
        builder.push(" AND profile_id = ").push_bind(profile_id);
    }
    if let Some(term) = filter.search_term() {
        builder
            .push(" AND customer_email ILIKE ")
            .push_bind(like_pattern(&term));
    }
}

/// Repository backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgRepository {
    db: Database,
}

impl PgRepository {
    /// Wrap a connected, migrated database
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    async fn write_profile(executor: &mut sqlx::PgConnection, profile: &Profile) -> Result<()> {
        sqlx::query(
            r"
            UPDATE profiles SET
                first_name = $2, last_name = $3, email = $4, phone = $5,
                date_of_birth = $6, sport = $7, position = $8, nationality = $9,
                height_cm = $10, weight_kg = $11, bio = $12, status = $13,
                updated_at = $14
            WHERE id = $1
            ",
        )
        .bind(profile.id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(profile.date_of_birth)
        .bind(&profile.sport)
        .bind(&profile.position)
        .bind(&profile.nationality)
        .bind(profile.height_cm.map(i32::from))
        .bind(profile.weight_kg.map(i32::from))
        .bind(&profile.bio)
        .bind(profile.status.as_str())
        .bind(profile.updated_at)
        .execute(executor)
        .await
        .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PgRepository {
    #[instrument(skip(self))]
    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Page<Profile>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM profiles");
        push_profile_filters(&mut count, filter);
        let matching: i64 = count
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .map_err(db_error)?;

        let mut select = QueryBuilder::new("SELECT * FROM profiles");
        push_profile_filters(&mut select, filter);
        select.push(format!(
            " ORDER BY {} {}, id ASC LIMIT ",
            filter.sort.column(),
            filter.direction.sql()
        ));
        select.push_bind(i64::from(filter.limit));
        select.push(" OFFSET ").push_bind(i64::from(filter.offset));

        let rows: Vec<ProfileRow> = select
            .build_query_as()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error)?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(Profile::try_from)
                .collect::<Result<_>>()?,
            total: total(matching),
        })
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(db_error)?
            .map(Profile::try_from)
            .transpose()
    }

    async fn insert_profile(&self, profile: Profile) -> Result<Profile> {
        debug!("Inserting profile {}", profile.id);
        sqlx::query(
            r"
            INSERT INTO profiles (
                id, kind, first_name, last_name, email, phone, date_of_birth,
                sport, position, nationality, height_cm, weight_kg, bio, media,
                status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ",
        )
        .bind(profile.id)
        .bind(profile.kind.as_str())
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(profile.date_of_birth)
        .bind(&profile.sport)
        .bind(&profile.position)
        .bind(&profile.nationality)
        .bind(profile.height_cm.map(i32::from))
        .bind(profile.weight_kg.map(i32::from))
        .bind(&profile.bio)
        .bind(Json(&profile.media))
        .bind(profile.status.as_str())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(self.db.pool())
        .await
        .map_err(db_error)?;

        Ok(profile)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Option<Profile>> {
        let mut tx = self.db.pool().begin().await.map_err(db_error)?;

        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut profile = Profile::try_from(row)?;
        profile.apply(update);
        Self::write_profile(&mut *tx, &profile).await?;
        tx.commit().await.map_err(db_error)?;

        Ok(Some(profile))
    }

    async fn delete_profile(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_media(&self, id: Uuid, media: MediaAttachment) -> Result<Option<Profile>> {
        sqlx::query_as::<_, ProfileRow>(
            "UPDATE profiles SET media = media || $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Json(vec![media]))
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error)?
        .map(Profile::try_from)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, filter: &OrderFilter) -> Result<Page<Order>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM orders");
        push_order_filters(&mut count, filter);
        let matching: i64 = count
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .map_err(db_error)?;

        let mut select = QueryBuilder::new("SELECT * FROM orders");
        push_order_filters(&mut select, filter);
        select.push(format!(
            " ORDER BY {} {}, id ASC LIMIT ",
            filter.sort.column(),
            filter.direction.sql()
        ));
        select.push_bind(i64::from(filter.limit));
        select.push(" OFFSET ").push_bind(i64::from(filter.offset));

        let rows: Vec<OrderRow> = select
            .build_query_as()
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error)?;

        Ok(Page {
            items: rows.into_iter().map(Order::try_from).collect::<Result<_>>()?,
            total: total(matching),
        })
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(db_error)?
            .map(Order::try_from)
            .transpose()
    }

    async fn insert_order(&self, order: Order) -> Result<Order> {
        debug!("Inserting order {} for profile {}", order.id, order.profile_id);
        sqlx::query(
            r"
            INSERT INTO orders (
                id, profile_id, customer_email, plan, amount_cents, currency,
                status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(order.id)
        .bind(order.profile_id)
        .bind(&order.customer_email)
        .bind(order.plan.as_str())
        .bind(order.amount_cents)
        .bind(&order.currency)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_foreign_key_violation() {
                    return Error::NotFound {
                        resource: format!("Profile with ID {}", order.profile_id),
                    };
                }
            }
            db_error(e)
        })?;

        Ok(order)
    }

    async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>> {
        sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error)?
        .map(Order::try_from)
        .transpose()
    }

    async fn delete_order(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn payment_metrics(&self) -> Result<PaymentMetrics> {
        let row = sqlx::query_as::<_, MetricsRow>(
            r"
            SELECT
                COUNT(*) AS total_orders,
                COUNT(*) FILTER (WHERE status = 'paid') AS paid_orders,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_orders,
                COUNT(*) FILTER (WHERE status = 'failed') AS failed_orders,
                COUNT(*) FILTER (WHERE status = 'refunded') AS refunded_orders,
                COALESCE(SUM(amount_cents) FILTER (WHERE status = 'paid'), 0)::BIGINT AS revenue_cents
            FROM orders
            ",
        )
        .fetch_one(self.db.pool())
        .await
        .map_err(db_error)?;

        Ok(PaymentMetrics {
            total_orders: total(row.total_orders),
            paid_orders: total(row.paid_orders),
            pending_orders: total(row.pending_orders),
            failed_orders: total(row.failed_orders),
            refunded_orders: total(row.refunded_orders),
            revenue_cents: row.revenue_cents,
            average_order_cents: if row.paid_orders > 0 {
                row.revenue_cents / row.paid_orders
            } else {
                0
            },
        })
    }

    async fn get_settings(&self) -> Result<Settings> {
        let document = sqlx::query_scalar::<_, Json<Settings>>(
            "SELECT document FROM settings WHERE id = 1",
        )
        .fetch_optional(self.db.pool())
        .await
        .map_err(db_error)?;

        Ok(document.map(|Json(settings)| settings).unwrap_or_default())
    }

    async fn put_settings(&self, settings: Settings) -> Result<Settings> {
        sqlx::query(
            r"
            INSERT INTO settings (id, document, updated_at) VALUES (1, $1, now())
            ON CONFLICT (id) DO UPDATE SET document = EXCLUDED.document, updated_at = now()
            ",
        )
        .bind(Json(&settings))
        .execute(self.db.pool())
        .await
        .map_err(db_error)?;

        Ok(settings)
    }

    async fn health_check(&self) -> Result<()> {
        self.db.health_check().await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::filter::{ProfileSort, SortDirection};
    use scoutline_core::ProfileKind;

    #[test]
    fn test_profile_filter_sql() {
        let filter = ProfileFilter {
            kind: Some(ProfileKind::Coach),
            search: Some("ana".to_string()),
            sort: ProfileSort::LastName,
            direction: SortDirection::Asc,
            limit: 20,
            ..ProfileFilter::default()
        };
        let mut builder = QueryBuilder::new("SELECT * FROM profiles");
        push_profile_filters(&mut builder, &filter);
        let sql = builder.sql();

        assert!(sql.starts_with("SELECT * FROM profiles WHERE TRUE AND kind = $1 AND ("));
        assert!(sql.contains("first_name ILIKE $2 OR last_name ILIKE $3"));
        assert!(sql.ends_with("(first_name || ' ' || last_name) ILIKE $8)"));
    }

    #[test]
    fn test_blank_search_adds_no_clause() {
        let filter = OrderFilter {
            search: Some("   ".to_string()),
            ..OrderFilter::default()
        };
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM orders");
        push_order_filters(&mut builder, &filter);
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM orders WHERE TRUE");
    }

    #[tokio::test]
    async fn test_unreachable_database_reports_error() {
        let pool = sqlx::PgPool::connect_lazy("postgresql://invalid:5432/nonexistent").unwrap();
        let repo = PgRepository::new(Database::from_pool(pool));

        let result = repo.get_settings().await;
        assert!(matches!(result, Err(Error::Database(_))));
    }
}
