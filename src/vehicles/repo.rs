use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

use crate::validate::VehicleInput;

/// Vehicle row. Every query here is scoped to its owner.
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub user_id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate_number: String,
    pub created_at: Option<OffsetDateTime>,
}

/// Aggregate counters for one owner's fleet.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct FleetCounts {
    pub total: i64,
    pub oldest: Option<i32>,
    pub newest: Option<i32>,
}

impl Vehicle {
    /// Lists the owner's vehicles, newest model year first. A search term
    /// matches brand, model or plate as a case-insensitive substring.
    pub async fn list_for_user<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        search: Option<&str>,
    ) -> sqlx::Result<Vec<Vehicle>> {
        match search {
            Some(term) => {
                let pattern = format!("%{term}%");
                sqlx::query_as::<_, Vehicle>(
                    r#"
                    SELECT id, user_id, brand, model, year, plate_number, created_at
                    FROM vehicles
                    WHERE user_id = $1
                      AND (brand ILIKE $2 OR model ILIKE $2 OR plate_number ILIKE $2)
                    ORDER BY year DESC
                    "#,
                )
                .bind(user_id)
                .bind(pattern)
                .fetch_all(db)
                .await
            }
            None => {
                sqlx::query_as::<_, Vehicle>(
                    r#"
                    SELECT id, user_id, brand, model, year, plate_number, created_at
                    FROM vehicles
                    WHERE user_id = $1
                    ORDER BY year DESC
                    "#,
                )
                .bind(user_id)
                .fetch_all(db)
                .await
            }
        }
    }

    pub async fn stats_for_user<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
    ) -> sqlx::Result<FleetCounts> {
        sqlx::query_as::<_, FleetCounts>(
            r#"
            SELECT COUNT(*) AS total, MIN(year) AS oldest, MAX(year) AS newest
            FROM vehicles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    pub async fn find<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        id: i64,
    ) -> sqlx::Result<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, user_id, brand, model, year, plate_number, created_at
            FROM vehicles
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// True when the owner already has a vehicle with this plate. Pass the
    /// row's own id via `exclude` when updating.
    pub async fn plate_taken<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        plate_number: &str,
        exclude: Option<i64>,
    ) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM vehicles
                WHERE user_id = $1 AND plate_number = $2
                  AND ($3::BIGINT IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(user_id)
        .bind(plate_number)
        .bind(exclude)
        .fetch_one(db)
        .await
    }

    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        input: &VehicleInput,
    ) -> sqlx::Result<Vehicle> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (user_id, brand, model, year, plate_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, brand, model, year, plate_number, created_at
            "#,
        )
        .bind(user_id)
        .bind(&input.brand)
        .bind(&input.model)
        .bind(input.year)
        .bind(&input.plate_number)
        .fetch_one(db)
        .await
    }

    /// Updates the owner's row; false when no such row exists for this user.
    pub async fn update<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        id: i64,
        input: &VehicleInput,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET brand = $1, model = $2, year = $3, plate_number = $4
            WHERE id = $5 AND user_id = $6
            "#,
        )
        .bind(&input.brand)
        .bind(&input.model)
        .bind(input.year)
        .bind(&input.plate_number)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes the owner's row; maintenance logs go with it via the FK
    /// cascade. False when no such row exists for this user.
    pub async fn delete<'e>(db: impl PgExecutor<'e>, user_id: i64, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
