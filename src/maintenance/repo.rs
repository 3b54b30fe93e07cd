use rust_decimal::Decimal;
use sqlx::{FromRow, PgExecutor};
use time::{Date, OffsetDateTime};

use crate::validate::MaintenanceInput;

/// Maintenance log row. `user_id` duplicates the owning vehicle's owner and
/// is written from the vehicle row inside the same transaction, so the two
/// can never drift.
#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceLog {
    pub id: i64,
    pub vehicle_id: i64,
    pub user_id: i64,
    pub maintenance_type: String,
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    pub maintenance_date: Date,
    pub created_at: Option<OffsetDateTime>,
}

/// A recent log joined with its vehicle's label, for the dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct RecentLog {
    pub id: i64,
    pub vehicle_id: i64,
    pub maintenance_type: String,
    pub cost: Option<Decimal>,
    pub maintenance_date: Date,
    pub brand: String,
    pub model: String,
}

impl MaintenanceLog {
    pub async fn list_for_vehicle<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        vehicle_id: i64,
    ) -> sqlx::Result<Vec<MaintenanceLog>> {
        sqlx::query_as::<_, MaintenanceLog>(
            r#"
            SELECT id, vehicle_id, user_id, maintenance_type, description,
                   cost, maintenance_date, created_at
            FROM maintenance_logs
            WHERE vehicle_id = $1 AND user_id = $2
            ORDER BY maintenance_date DESC, id DESC
            "#,
        )
        .bind(vehicle_id)
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn find<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        id: i64,
    ) -> sqlx::Result<Option<MaintenanceLog>> {
        sqlx::query_as::<_, MaintenanceLog>(
            r#"
            SELECT id, vehicle_id, user_id, maintenance_type, description,
                   cost, maintenance_date, created_at
            FROM maintenance_logs
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Inserts a log for a vehicle, copying the vehicle's owner into the
    /// log row. The caller has already confirmed the vehicle belongs to
    /// this user.
    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        vehicle_id: i64,
        user_id: i64,
        input: &MaintenanceInput,
        description: Option<&str>,
    ) -> sqlx::Result<MaintenanceLog> {
        sqlx::query_as::<_, MaintenanceLog>(
            r#"
            INSERT INTO maintenance_logs
                (vehicle_id, user_id, maintenance_type, description, cost, maintenance_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, vehicle_id, user_id, maintenance_type, description,
                      cost, maintenance_date, created_at
            "#,
        )
        .bind(vehicle_id)
        .bind(user_id)
        .bind(&input.maintenance_type)
        .bind(description)
        .bind(input.cost)
        .bind(input.maintenance_date)
        .fetch_one(db)
        .await
    }

    /// Deletes the owner's log; false when no such row exists for this user.
    pub async fn delete<'e>(db: impl PgExecutor<'e>, user_id: i64, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM maintenance_logs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_for_user<'e>(db: impl PgExecutor<'e>, user_id: i64) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM maintenance_logs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await
    }

    pub async fn total_cost_for_user<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
    ) -> sqlx::Result<Option<Decimal>> {
        sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(cost) FROM maintenance_logs WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    pub async fn recent_for_user<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        limit: i64,
    ) -> sqlx::Result<Vec<RecentLog>> {
        sqlx::query_as::<_, RecentLog>(
            r#"
            SELECT m.id, m.vehicle_id, m.maintenance_type, m.cost, m.maintenance_date,
                   v.brand, v.model
            FROM maintenance_logs m
            JOIN vehicles v ON v.id = m.vehicle_id
            WHERE m.user_id = $1
            ORDER BY m.maintenance_date DESC, m.id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await
    }
}
