use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::sqlite::codec::{
    decode_enum, decode_optional_date, decode_timestamp, encode_date, encode_timestamp,
};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::{StoreError, StoreResult};
use shared::Animal;

const COLUMNS: &str = "id, name, species, species_type, date_of_birth, gender, weight, \
    health_status, enclosure, wintering_location, hibernation_start, hibernation_end, \
    hibernation_temperature, notes, created_at, updated_at";

/// Repository for the animals table
#[derive(Clone)]
pub struct AnimalRepository {
    db: DbConnection,
}

pub(crate) fn animal_from_row(row: &SqliteRow) -> StoreResult<Animal> {
    Ok(Animal {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        species: row.try_get("species")?,
        species_type: decode_enum(row.try_get("species_type")?)?,
        date_of_birth: decode_optional_date(row.try_get("date_of_birth")?)?,
        gender: row.try_get("gender")?,
        weight: row.try_get("weight")?,
        health_status: decode_enum(row.try_get("health_status")?)?,
        enclosure: row.try_get("enclosure")?,
        wintering_location: row.try_get("wintering_location")?,
        hibernation_start: decode_optional_date(row.try_get("hibernation_start")?)?,
        hibernation_end: decode_optional_date(row.try_get("hibernation_end")?)?,
        hibernation_temperature: row.try_get("hibernation_temperature")?,
        notes: row.try_get("notes")?,
        created_at: decode_timestamp(row.try_get("created_at")?)?,
        updated_at: decode_timestamp(row.try_get("updated_at")?)?,
    })
}

impl AnimalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Newest first
    pub async fn list_animals(&self) -> StoreResult<Vec<Animal>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM animals ORDER BY created_at DESC, rowid DESC",
            COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(animal_from_row).collect()
    }

    pub async fn get_animal(&self, id: &str) -> StoreResult<Option<Animal>> {
        let row = sqlx::query(&format!("SELECT {} FROM animals WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(animal_from_row).transpose()
    }

    pub async fn store_animal(&self, animal: &Animal) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO animals (id, name, species, species_type, date_of_birth, gender, weight,
                health_status, enclosure, wintering_location, hibernation_start, hibernation_end,
                hibernation_temperature, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&animal.id)
        .bind(&animal.name)
        .bind(&animal.species)
        .bind(animal.species_type.as_str())
        .bind(animal.date_of_birth.map(encode_date))
        .bind(&animal.gender)
        .bind(animal.weight)
        .bind(animal.health_status.as_str())
        .bind(&animal.enclosure)
        .bind(&animal.wintering_location)
        .bind(animal.hibernation_start.map(encode_date))
        .bind(animal.hibernation_end.map(encode_date))
        .bind(animal.hibernation_temperature)
        .bind(&animal.notes)
        .bind(encode_timestamp(&animal.created_at))
        .bind(encode_timestamp(&animal.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn update_animal(&self, animal: &Animal) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE animals
            SET name = ?, species = ?, species_type = ?, date_of_birth = ?, gender = ?,
                weight = ?, health_status = ?, enclosure = ?, wintering_location = ?,
                hibernation_start = ?, hibernation_end = ?, hibernation_temperature = ?,
                notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&animal.name)
        .bind(&animal.species)
        .bind(animal.species_type.as_str())
        .bind(animal.date_of_birth.map(encode_date))
        .bind(&animal.gender)
        .bind(animal.weight)
        .bind(animal.health_status.as_str())
        .bind(&animal.enclosure)
        .bind(&animal.wintering_location)
        .bind(animal.hibernation_start.map(encode_date))
        .bind(animal.hibernation_end.map(encode_date))
        .bind(animal.hibernation_temperature)
        .bind(&animal.notes)
        .bind(encode_timestamp(&animal.updated_at))
        .bind(&animal.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("animal", &animal.id));
        }
        Ok(())
    }

    /// Diets and medical checks go with it (ON DELETE CASCADE)
    pub async fn delete_animal(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM animals WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("animal", id));
        }
        Ok(())
    }
}
