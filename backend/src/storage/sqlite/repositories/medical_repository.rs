use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::sqlite::codec::{
    decode_date, decode_optional_date, decode_timestamp, encode_date, encode_timestamp,
};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::{StoreError, StoreResult};
use shared::MedicalCheck;

const COLUMNS: &str = "id, animal_id, vet_id, check_date, diagnosis, treatment, medications, \
    next_check_date, notes, created_at";

#[derive(Clone)]
pub struct MedicalRepository {
    db: DbConnection,
}

fn medical_check_from_row(row: &SqliteRow) -> StoreResult<MedicalCheck> {
    Ok(MedicalCheck {
        id: row.try_get("id")?,
        animal_id: row.try_get("animal_id")?,
        vet_id: row.try_get("vet_id")?,
        check_date: decode_date(row.try_get("check_date")?)?,
        diagnosis: row.try_get("diagnosis")?,
        treatment: row.try_get("treatment")?,
        medications: row.try_get("medications")?,
        next_check_date: decode_optional_date(row.try_get("next_check_date")?)?,
        notes: row.try_get("notes")?,
        created_at: decode_timestamp(row.try_get("created_at")?)?,
    })
}

impl MedicalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list_medical_checks(&self) -> StoreResult<Vec<MedicalCheck>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM medical_checks ORDER BY created_at DESC, rowid DESC",
            COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(medical_check_from_row).collect()
    }

    pub async fn get_medical_check(&self, id: &str) -> StoreResult<Option<MedicalCheck>> {
        let row = sqlx::query(&format!("SELECT {} FROM medical_checks WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(medical_check_from_row).transpose()
    }

    pub async fn store_medical_check(&self, check: &MedicalCheck) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO medical_checks (id, animal_id, vet_id, check_date, diagnosis, treatment,
                medications, next_check_date, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&check.id)
        .bind(&check.animal_id)
        .bind(&check.vet_id)
        .bind(encode_date(check.check_date))
        .bind(&check.diagnosis)
        .bind(&check.treatment)
        .bind(&check.medications)
        .bind(check.next_check_date.map(encode_date))
        .bind(&check.notes)
        .bind(encode_timestamp(&check.created_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn update_medical_check(&self, check: &MedicalCheck) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE medical_checks
            SET animal_id = ?, vet_id = ?, check_date = ?, diagnosis = ?, treatment = ?,
                medications = ?, next_check_date = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(&check.animal_id)
        .bind(&check.vet_id)
        .bind(encode_date(check.check_date))
        .bind(&check.diagnosis)
        .bind(&check.treatment)
        .bind(&check.medications)
        .bind(check.next_check_date.map(encode_date))
        .bind(&check.notes)
        .bind(&check.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("medical check", &check.id));
        }
        Ok(())
    }

    pub async fn delete_medical_check(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM medical_checks WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("medical check", id));
        }
        Ok(())
    }
}
