//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{decimal_from_sql, decimal_to_sql, Database, DbError, DbResult};
use crate::models::Patient;

const PATIENT_COLUMNS: &str = r#"
    patient_id, provider_id, first_name, last_name, middle_initial, date_of_birth,
    email, phone_number, address, city, state, zip_code,
    primary_insurance, primary_insurance_number,
    secondary_insurance, secondary_insurance_number, medical_record_number,
    wound_length, wound_width, wound_depth, account_active, created_at, updated_at
"#;

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO patients ({PATIENT_COLUMNS}) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                    ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23
                )"
            ),
            params![
                patient.patient_id,
                patient.provider_id,
                patient.first_name,
                patient.last_name,
                patient.middle_initial,
                patient.date_of_birth,
                patient.email,
                patient.phone_number,
                patient.address,
                patient.city,
                patient.state,
                patient.zip_code,
                patient.primary_insurance,
                patient.primary_insurance_number,
                patient.secondary_insurance,
                patient.secondary_insurance_number,
                patient.medical_record_number,
                decimal_to_sql(&patient.wound_length),
                decimal_to_sql(&patient.wound_width),
                decimal_to_sql(&patient.wound_depth),
                patient.account_active,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing patient. The owning provider cannot change.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                first_name = ?3,
                last_name = ?4,
                middle_initial = ?5,
                date_of_birth = ?6,
                email = ?7,
                phone_number = ?8,
                address = ?9,
                city = ?10,
                state = ?11,
                zip_code = ?12,
                primary_insurance = ?13,
                primary_insurance_number = ?14,
                secondary_insurance = ?15,
                secondary_insurance_number = ?16,
                medical_record_number = ?17,
                wound_length = ?18,
                wound_width = ?19,
                wound_depth = ?20,
                account_active = ?21,
                updated_at = datetime('now')
            WHERE patient_id = ?1 AND provider_id = ?2
            "#,
            params![
                patient.patient_id,
                patient.provider_id,
                patient.first_name,
                patient.last_name,
                patient.middle_initial,
                patient.date_of_birth,
                patient.email,
                patient.phone_number,
                patient.address,
                patient.city,
                patient.state,
                patient.zip_code,
                patient.primary_insurance,
                patient.primary_insurance_number,
                patient.secondary_insurance,
                patient.secondary_insurance_number,
                patient.medical_record_number,
                decimal_to_sql(&patient.wound_length),
                decimal_to_sql(&patient.wound_width),
                decimal_to_sql(&patient.wound_depth),
                patient.account_active,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID, regardless of provider.
    pub fn get_patient(&self, patient_id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = ?"),
                [patient_id],
                map_patient_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a patient by ID only if it belongs to `provider_id`.
    pub fn get_patient_for_provider(
        &self,
        patient_id: &str,
        provider_id: &str,
    ) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = ?1 AND provider_id = ?2"
                ),
                [patient_id, provider_id],
                map_patient_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all patients of a provider, ordered by name.
    pub fn list_patients_for_provider(&self, provider_id: &str) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE provider_id = ? ORDER BY last_name, first_name"
        ))?;

        let rows = stmt.query_map([provider_id], map_patient_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// Search a provider's patients by first or last name (prefix match).
    pub fn search_patients(
        &self,
        provider_id: &str,
        query: &str,
        limit: usize,
    ) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", query);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients
             WHERE provider_id = ?1 AND (first_name LIKE ?2 OR last_name LIKE ?2)
             ORDER BY last_name, first_name
             LIMIT ?3"
        ))?;

        let rows = stmt.query_map(params![provider_id, pattern, limit as i64], map_patient_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// Delete a provider's patient (cascades to IVR records and orders).
    pub fn delete_patient(&self, patient_id: &str, provider_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM patients WHERE patient_id = ?1 AND provider_id = ?2",
            [patient_id, provider_id],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct PatientRow {
    patient_id: String,
    provider_id: String,
    first_name: String,
    last_name: String,
    middle_initial: Option<String>,
    date_of_birth: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    primary_insurance: Option<String>,
    primary_insurance_number: Option<String>,
    secondary_insurance: Option<String>,
    secondary_insurance_number: Option<String>,
    medical_record_number: Option<String>,
    wound_length: Option<String>,
    wound_width: Option<String>,
    wound_depth: Option<String>,
    account_active: bool,
    created_at: String,
    updated_at: String,
}

fn map_patient_row(row: &Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        patient_id: row.get(0)?,
        provider_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        middle_initial: row.get(4)?,
        date_of_birth: row.get(5)?,
        email: row.get(6)?,
        phone_number: row.get(7)?,
        address: row.get(8)?,
        city: row.get(9)?,
        state: row.get(10)?,
        zip_code: row.get(11)?,
        primary_insurance: row.get(12)?,
        primary_insurance_number: row.get(13)?,
        secondary_insurance: row.get(14)?,
        secondary_insurance_number: row.get(15)?,
        medical_record_number: row.get(16)?,
        wound_length: row.get(17)?,
        wound_width: row.get(18)?,
        wound_depth: row.get(19)?,
        account_active: row.get(20)?,
        created_at: row.get(21)?,
        updated_at: row.get(22)?,
    })
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Patient {
            patient_id: row.patient_id,
            provider_id: row.provider_id,
            first_name: row.first_name,
            last_name: row.last_name,
            middle_initial: row.middle_initial,
            date_of_birth: row.date_of_birth,
            email: row.email,
            phone_number: row.phone_number,
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            primary_insurance: row.primary_insurance,
            primary_insurance_number: row.primary_insurance_number,
            secondary_insurance: row.secondary_insurance,
            secondary_insurance_number: row.secondary_insurance_number,
            medical_record_number: row.medical_record_number,
            wound_length: decimal_from_sql(row.wound_length)?,
            wound_width: decimal_from_sql(row.wound_width)?,
            wound_depth: decimal_from_sql(row.wound_depth)?,
            account_active: row.account_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
