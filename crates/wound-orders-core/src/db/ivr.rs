//! IVR record database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{decimal_from_sql, decimal_to_sql, Database, DbError, DbResult};
use crate::models::{IvrRecord, IvrStatus};

const IVR_COLUMNS: &str = r#"
    ivr_id, patient_id, provider_id, physician_name, contact_name, phone,
    facility_address, wound_length, wound_width, status, admin_notes,
    submitted_at, updated_at, reviewed_at, reviewed_by
"#;

impl Database {
    /// Insert a new IVR submission.
    pub fn insert_ivr(&self, ivr: &IvrRecord) -> DbResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO ivr_records ({IVR_COLUMNS}) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15
                )"
            ),
            params![
                ivr.ivr_id,
                ivr.patient_id,
                ivr.provider_id,
                ivr.physician_name,
                ivr.contact_name,
                ivr.phone,
                ivr.facility_address,
                decimal_to_sql(&ivr.wound_length),
                decimal_to_sql(&ivr.wound_width),
                ivr.status.as_str(),
                ivr.admin_notes,
                ivr.submitted_at,
                ivr.updated_at,
                ivr.reviewed_at,
                ivr.reviewed_by,
            ],
        )?;
        Ok(())
    }

    /// Persist review state (status, notes, reviewer) of an existing record.
    pub fn update_ivr_review(&self, ivr: &IvrRecord) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE ivr_records SET
                status = ?2,
                admin_notes = ?3,
                reviewed_at = ?4,
                reviewed_by = ?5,
                updated_at = ?6
            WHERE ivr_id = ?1
            "#,
            params![
                ivr.ivr_id,
                ivr.status.as_str(),
                ivr.admin_notes,
                ivr.reviewed_at,
                ivr.reviewed_by,
                ivr.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an IVR record by ID.
    pub fn get_ivr(&self, ivr_id: &str) -> DbResult<Option<IvrRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {IVR_COLUMNS} FROM ivr_records WHERE ivr_id = ?"),
                [ivr_id],
                map_ivr_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all IVR submissions for a patient, newest first.
    pub fn list_ivr_for_patient(&self, patient_id: &str) -> DbResult<Vec<IvrRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {IVR_COLUMNS} FROM ivr_records
             WHERE patient_id = ?
             ORDER BY submitted_at DESC, rowid DESC"
        ))?;

        let rows = stmt.query_map([patient_id], map_ivr_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }

    /// The most recent IVR submission for a patient, if any.
    ///
    /// Ties on `submitted_at` go to the later insert.
    pub fn latest_ivr_for_patient(&self, patient_id: &str) -> DbResult<Option<IvrRecord>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {IVR_COLUMNS} FROM ivr_records
                     WHERE patient_id = ?
                     ORDER BY submitted_at DESC, rowid DESC
                     LIMIT 1"
                ),
                [patient_id],
                map_ivr_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }
}

/// Intermediate row struct for database mapping.
struct IvrRow {
    ivr_id: String,
    patient_id: String,
    provider_id: String,
    physician_name: Option<String>,
    contact_name: Option<String>,
    phone: Option<String>,
    facility_address: Option<String>,
    wound_length: Option<String>,
    wound_width: Option<String>,
    status: String,
    admin_notes: Option<String>,
    submitted_at: String,
    updated_at: String,
    reviewed_at: Option<String>,
    reviewed_by: Option<String>,
}

fn map_ivr_row(row: &Row<'_>) -> rusqlite::Result<IvrRow> {
    Ok(IvrRow {
        ivr_id: row.get(0)?,
        patient_id: row.get(1)?,
        provider_id: row.get(2)?,
        physician_name: row.get(3)?,
        contact_name: row.get(4)?,
        phone: row.get(5)?,
        facility_address: row.get(6)?,
        wound_length: row.get(7)?,
        wound_width: row.get(8)?,
        status: row.get(9)?,
        admin_notes: row.get(10)?,
        submitted_at: row.get(11)?,
        updated_at: row.get(12)?,
        reviewed_at: row.get(13)?,
        reviewed_by: row.get(14)?,
    })
}

impl TryFrom<IvrRow> for IvrRecord {
    type Error = DbError;

    fn try_from(row: IvrRow) -> Result<Self, Self::Error> {
        let status = IvrStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown IVR status: {}", row.status)))?;

        Ok(IvrRecord {
            ivr_id: row.ivr_id,
            patient_id: row.patient_id,
            provider_id: row.provider_id,
            physician_name: row.physician_name,
            contact_name: row.contact_name,
            phone: row.phone,
            facility_address: row.facility_address,
            wound_length: decimal_from_sql(row.wound_length)?,
            wound_width: decimal_from_sql(row.wound_width)?,
            status,
            admin_notes: row.admin_notes,
            submitted_at: row.submitted_at,
            updated_at: row.updated_at,
            reviewed_at: row.reviewed_at,
            reviewed_by: row.reviewed_by,
        })
    }
}
