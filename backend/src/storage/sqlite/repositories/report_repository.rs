//! Aggregate queries behind the report views.
//!
//! Each query reproduces the ordering and tie-breaks of the in-memory
//! builders in `domain::reports`, so both stores answer with the same rows.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::sqlite::codec::{decode_date, decode_enum, decode_optional_date};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::StoreResult;
use shared::{AnimalDietRow, AnimalFullInfo, CoupleMember, MarriedCouple};

#[derive(Clone)]
pub struct ReportRepository {
    db: DbConnection,
}

fn full_info_from_row(row: &SqliteRow) -> StoreResult<AnimalFullInfo> {
    let last_medical_check: Option<String> = row.try_get("last_medical_check")?;
    Ok(AnimalFullInfo {
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
        current_diet: row.try_get("current_diet")?,
        last_medical_check: last_medical_check.as_deref().map(decode_date).transpose()?,
        last_diagnosis: row.try_get("last_diagnosis")?,
        last_vet: row.try_get("last_vet")?,
    })
}

fn couple_member(row: &SqliteRow, prefix: &str) -> StoreResult<CoupleMember> {
    Ok(CoupleMember {
        id: row.try_get(format!("{}_id", prefix).as_str())?,
        name: row.try_get(format!("{}_name", prefix).as_str())?,
        role: decode_enum(row.try_get(format!("{}_role", prefix).as_str())?)?,
    })
}

fn diet_row_from_row(row: &SqliteRow) -> StoreResult<AnimalDietRow> {
    Ok(AnimalDietRow {
        animal_id: row.try_get("animal_id")?,
        animal_name: row.try_get("animal_name")?,
        species: row.try_get("species")?,
        diet_id: row.try_get("diet_id")?,
        diet_type_id: row.try_get("diet_type_id")?,
        diet_type: row.try_get("diet_type")?,
        food_name: row.try_get("food_name")?,
        quantity: row.try_get("quantity")?,
        feeding_time: row.try_get("feeding_time")?,
    })
}

impl ReportRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// One row per animal with its current diet and latest medical check
    pub async fn animal_full_info(&self, search: Option<&str>) -> StoreResult<Vec<AnimalFullInfo>> {
        let term = search
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_ascii_lowercase);

        let rows = sqlx::query(
            r#"
            SELECT a.id, a.name, a.species, a.species_type, a.date_of_birth, a.gender, a.weight,
                a.health_status, a.enclosure, a.wintering_location, a.hibernation_start,
                a.hibernation_end, a.hibernation_temperature, a.notes,
                (
                    SELECT COALESCE(dt.name, d.food_name)
                    FROM diets d
                    LEFT JOIN diet_types dt ON dt.id = d.diet_type_id
                    WHERE d.animal_id = a.id AND d.end_date IS NULL
                    ORDER BY d.start_date IS NOT NULL DESC, d.start_date DESC,
                        d.created_at DESC, d.id DESC
                    LIMIT 1
                ) AS current_diet,
                m.check_date AS last_medical_check,
                m.diagnosis AS last_diagnosis,
                CASE WHEN v.id IS NULL THEN NULL
                     ELSE v.first_name || ' ' || v.last_name END AS last_vet
            FROM animals a
            LEFT JOIN medical_checks m ON m.id = (
                SELECT mc.id
                FROM medical_checks mc
                WHERE mc.animal_id = a.id
                ORDER BY mc.check_date DESC, mc.created_at DESC, mc.id DESC
                LIMIT 1
            )
            LEFT JOIN staff v ON v.id = m.vet_id
            WHERE ? IS NULL
                OR instr(lower(a.name), ?) > 0
                OR instr(lower(a.species), ?) > 0
            ORDER BY a.created_at DESC, a.rowid DESC
            "#,
        )
        .bind(&term)
        .bind(&term)
        .bind(&term)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(full_info_from_row).collect()
    }

    /// Mutually linked active employees, newer member first
    pub async fn married_couples(&self) -> StoreResult<Vec<MarriedCouple>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id AS first_id, a.first_name || ' ' || a.last_name AS first_name,
                a.role AS first_role,
                b.id AS second_id, b.first_name || ' ' || b.last_name AS second_name,
                b.role AS second_role
            FROM staff a
            JOIN staff b ON a.spouse_id = b.id AND b.spouse_id = a.id
            WHERE a.is_active = 1 AND b.is_active = 1 AND a.id <> b.id
                AND (a.created_at > b.created_at
                     OR (a.created_at = b.created_at AND a.rowid > b.rowid))
            ORDER BY a.created_at DESC, a.rowid DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| -> StoreResult<MarriedCouple> {
                Ok(MarriedCouple {
                    first: couple_member(row, "first")?,
                    second: couple_member(row, "second")?,
                })
            })
            .collect()
    }

    /// Animal x active diet x diet type
    pub async fn animals_with_diets(&self) -> StoreResult<Vec<AnimalDietRow>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id AS animal_id, a.name AS animal_name, a.species,
                d.id AS diet_id, dt.id AS diet_type_id, dt.name AS diet_type,
                d.food_name, d.quantity, d.feeding_time
            FROM animals a
            JOIN diets d ON d.animal_id = a.id
            JOIN diet_types dt ON dt.id = d.diet_type_id
            WHERE d.end_date IS NULL
            ORDER BY a.created_at DESC, a.rowid DESC, d.created_at DESC, d.rowid DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(diet_row_from_row).collect()
    }
}
