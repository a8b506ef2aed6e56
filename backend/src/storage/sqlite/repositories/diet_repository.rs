use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::sqlite::codec::{
    decode_enum, decode_optional_date, decode_timestamp, encode_date, encode_timestamp,
};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::{StoreError, StoreResult};
use shared::{Diet, DietType};

const DIET_COLUMNS: &str = "id, animal_id, diet_type_id, food_name, quantity, feeding_time, \
    start_date, end_date, notes, created_at, updated_at";

/// Repository for the diet_types and diets tables
#[derive(Clone)]
pub struct DietRepository {
    db: DbConnection,
}

fn diet_type_from_row(row: &SqliteRow) -> StoreResult<DietType> {
    Ok(DietType {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: decode_enum(row.try_get("category")?)?,
        created_at: decode_timestamp(row.try_get("created_at")?)?,
    })
}

fn diet_from_row(row: &SqliteRow) -> StoreResult<Diet> {
    Ok(Diet {
        id: row.try_get("id")?,
        animal_id: row.try_get("animal_id")?,
        diet_type_id: row.try_get("diet_type_id")?,
        food_name: row.try_get("food_name")?,
        quantity: row.try_get("quantity")?,
        feeding_time: row.try_get("feeding_time")?,
        start_date: decode_optional_date(row.try_get("start_date")?)?,
        end_date: decode_optional_date(row.try_get("end_date")?)?,
        notes: row.try_get("notes")?,
        created_at: decode_timestamp(row.try_get("created_at")?)?,
        updated_at: decode_timestamp(row.try_get("updated_at")?)?,
    })
}

impl DietRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Alphabetical, case-insensitive
    pub async fn list_diet_types(&self) -> StoreResult<Vec<DietType>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, category, created_at
            FROM diet_types
            ORDER BY lower(name), id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(diet_type_from_row).collect()
    }

    pub async fn get_diet_type(&self, id: &str) -> StoreResult<Option<DietType>> {
        let row = sqlx::query(
            "SELECT id, name, description, category, created_at FROM diet_types WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(diet_type_from_row).transpose()
    }

    pub async fn store_diet_type(&self, diet_type: &DietType) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO diet_types (id, name, description, category, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&diet_type.id)
        .bind(&diet_type.name)
        .bind(&diet_type.description)
        .bind(diet_type.category.as_str())
        .bind(encode_timestamp(&diet_type.created_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn update_diet_type(&self, diet_type: &DietType) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE diet_types SET name = ?, description = ?, category = ? WHERE id = ?",
        )
        .bind(&diet_type.name)
        .bind(&diet_type.description)
        .bind(diet_type.category.as_str())
        .bind(&diet_type.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("diet type", &diet_type.id));
        }
        Ok(())
    }

    /// The diets foreign key turns a delete of a referenced type into a
    /// constraint error
    pub async fn delete_diet_type(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM diet_types WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("diet type", id));
        }
        Ok(())
    }

    pub async fn list_diets(&self) -> StoreResult<Vec<Diet>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM diets ORDER BY created_at DESC, rowid DESC",
            DIET_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(diet_from_row).collect()
    }

    pub async fn get_diet(&self, id: &str) -> StoreResult<Option<Diet>> {
        let row = sqlx::query(&format!("SELECT {} FROM diets WHERE id = ?", DIET_COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(diet_from_row).transpose()
    }

    pub async fn store_diet(&self, diet: &Diet) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO diets (id, animal_id, diet_type_id, food_name, quantity, feeding_time,
                start_date, end_date, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&diet.id)
        .bind(&diet.animal_id)
        .bind(&diet.diet_type_id)
        .bind(&diet.food_name)
        .bind(&diet.quantity)
        .bind(&diet.feeding_time)
        .bind(diet.start_date.map(encode_date))
        .bind(diet.end_date.map(encode_date))
        .bind(&diet.notes)
        .bind(encode_timestamp(&diet.created_at))
        .bind(encode_timestamp(&diet.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn update_diet(&self, diet: &Diet) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE diets
            SET animal_id = ?, diet_type_id = ?, food_name = ?, quantity = ?, feeding_time = ?,
                start_date = ?, end_date = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&diet.animal_id)
        .bind(&diet.diet_type_id)
        .bind(&diet.food_name)
        .bind(&diet.quantity)
        .bind(&diet.feeding_time)
        .bind(diet.start_date.map(encode_date))
        .bind(diet.end_date.map(encode_date))
        .bind(&diet.notes)
        .bind(encode_timestamp(&diet.updated_at))
        .bind(&diet.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("diet", &diet.id));
        }
        Ok(())
    }

    pub async fn delete_diet(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM diets WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("diet", id));
        }
        Ok(())
    }
}
