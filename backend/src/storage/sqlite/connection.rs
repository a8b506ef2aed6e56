use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use tracing::info;

use shared::{DietCategory, HealthStatus, SpeciesType, StaffRole};

/// The database URL used when none is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite:zoo.db";

/// DbConnection owns the SQLite pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

/// `'A', 'B', 'C'` for a CHECK (... IN (...)) clause
fn sql_values<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}

impl DbConnection {
    /// Open (and create if needed) the database at `url` and bootstrap the schema
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("creating database {}", url))?;
        }

        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("parsing database url {}", url))?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("connecting to {}", url))?;

        Self::setup_schema(&pool).await?;
        info!("SQLite store ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn init() -> Result<Self> {
        Self::new(DEFAULT_DATABASE_URL).await
    }

    /// A private in-memory database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Idempotent schema bootstrap
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        let species_types = sql_values(SpeciesType::ALL.iter().map(|v| v.as_str()));
        let health_statuses = sql_values(HealthStatus::ALL.iter().map(|v| v.as_str()));
        let roles = sql_values(StaffRole::ALL.iter().map(|v| v.as_str()));
        let categories = sql_values(DietCategory::ALL.iter().map(|v| v.as_str()));

        let statements = [
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS animals (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    species TEXT NOT NULL,
                    species_type TEXT NOT NULL CHECK (species_type IN ({species_types})),
                    date_of_birth TEXT,
                    gender TEXT NOT NULL DEFAULT 'Unknown',
                    weight REAL,
                    health_status TEXT NOT NULL DEFAULT 'Healthy'
                        CHECK (health_status IN ({health_statuses})),
                    enclosure TEXT,
                    wintering_location TEXT,
                    hibernation_start TEXT,
                    hibernation_end TEXT,
                    hibernation_temperature REAL,
                    notes TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS staff (
                    id TEXT PRIMARY KEY,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                    phone TEXT,
                    role TEXT NOT NULL CHECK (role IN ({roles})),
                    hire_date TEXT NOT NULL,
                    specialization TEXT,
                    spouse_id TEXT REFERENCES staff(id),
                    is_active INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS diet_types (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT,
                    category TEXT NOT NULL CHECK (category IN ({categories})),
                    created_at TEXT NOT NULL
                )
                "#
            ),
            r#"
            CREATE TABLE IF NOT EXISTS diets (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL REFERENCES animals(id) ON DELETE CASCADE,
                diet_type_id TEXT NOT NULL REFERENCES diet_types(id),
                food_name TEXT NOT NULL,
                quantity TEXT,
                feeding_time TEXT,
                start_date TEXT,
                end_date TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#
            .to_string(),
            r#"
            CREATE TABLE IF NOT EXISTS medical_checks (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL REFERENCES animals(id) ON DELETE CASCADE,
                vet_id TEXT NOT NULL REFERENCES staff(id),
                check_date TEXT NOT NULL,
                diagnosis TEXT NOT NULL,
                treatment TEXT,
                medications TEXT,
                next_check_date TEXT,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            "#
            .to_string(),
            "CREATE INDEX IF NOT EXISTS idx_diets_animal ON diets(animal_id)".to_string(),
            "CREATE INDEX IF NOT EXISTS idx_diets_type ON diets(diet_type_id)".to_string(),
            "CREATE INDEX IF NOT EXISTS idx_medical_checks_animal ON medical_checks(animal_id)"
                .to_string(),
        ];

        for statement in &statements {
            sqlx::query(statement)
                .execute(pool)
                .await
                .context("bootstrapping schema")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_values_quotes_and_escapes() {
        assert_eq!(sql_values(["Sick", "Under Treatment"]), "'Sick', 'Under Treatment'");
        assert_eq!(sql_values(["it's"]), "'it''s'");
    }

    #[tokio::test]
    async fn test_schema_bootstrap_is_idempotent() {
        let db = DbConnection::init_test().await.unwrap();
        DbConnection::setup_schema(db.pool()).await.unwrap();

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.0, 5);
    }
}
