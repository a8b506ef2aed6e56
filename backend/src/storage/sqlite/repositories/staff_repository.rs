use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::sqlite::codec::{
    decode_date, decode_enum, decode_timestamp, encode_date, encode_timestamp,
};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::{StoreError, StoreResult};
use shared::Staff;

const COLUMNS: &str = "id, first_name, last_name, email, phone, role, hire_date, \
    specialization, spouse_id, is_active, created_at, updated_at";

/// Repository for the staff table, including inactive employees
#[derive(Clone)]
pub struct StaffRepository {
    db: DbConnection,
}

fn staff_from_row(row: &SqliteRow) -> StoreResult<Staff> {
    Ok(Staff {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        role: decode_enum(row.try_get("role")?)?,
        hire_date: decode_date(row.try_get("hire_date")?)?,
        specialization: row.try_get("specialization")?,
        spouse_id: row.try_get("spouse_id")?,
        is_active: row.try_get("is_active")?,
        created_at: decode_timestamp(row.try_get("created_at")?)?,
        updated_at: decode_timestamp(row.try_get("updated_at")?)?,
    })
}

impl StaffRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list_staff(&self) -> StoreResult<Vec<Staff>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM staff ORDER BY created_at DESC, rowid DESC",
            COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(staff_from_row).collect()
    }

    pub async fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>> {
        let row = sqlx::query(&format!("SELECT {} FROM staff WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(staff_from_row).transpose()
    }

    pub async fn store_staff(&self, staff: &Staff) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO staff (id, first_name, last_name, email, phone, role, hire_date,
                specialization, spouse_id, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&staff.id)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.phone)
        .bind(staff.role.as_str())
        .bind(encode_date(staff.hire_date))
        .bind(&staff.specialization)
        .bind(&staff.spouse_id)
        .bind(staff.is_active)
        .bind(encode_timestamp(&staff.created_at))
        .bind(encode_timestamp(&staff.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn update_staff(&self, staff: &Staff) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE staff
            SET first_name = ?, last_name = ?, email = ?, phone = ?, role = ?, hire_date = ?,
                specialization = ?, spouse_id = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.phone)
        .bind(staff.role.as_str())
        .bind(encode_date(staff.hire_date))
        .bind(&staff.specialization)
        .bind(&staff.spouse_id)
        .bind(staff.is_active)
        .bind(encode_timestamp(&staff.updated_at))
        .bind(&staff.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("staff", &staff.id));
        }
        Ok(())
    }

    pub async fn deactivate_staff(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE staff SET is_active = 0, spouse_id = NULL WHERE id = ? AND is_active = 1",
        )
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("staff", id));
        }
        Ok(())
    }

    /// Only active employees are touched
    pub async fn set_spouse(&self, id: &str, spouse_id: Option<&str>) -> StoreResult<()> {
        let result = sqlx::query("UPDATE staff SET spouse_id = ? WHERE id = ? AND is_active = 1")
            .bind(spouse_id)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("staff", id));
        }
        Ok(())
    }
}
