//! Patient models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A patient record owned by a single provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Local UUID - always present, generated locally
    pub patient_id: String,
    /// Provider that created (and owns) this patient
    pub provider_id: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_initial: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub primary_insurance: Option<String>,
    pub primary_insurance_number: Option<String>,
    pub secondary_insurance: Option<String>,
    pub secondary_insurance_number: Option<String>,
    pub medical_record_number: Option<String>,
    /// Recorded wound length in cm
    pub wound_length: Option<Decimal>,
    /// Recorded wound width in cm
    pub wound_width: Option<Decimal>,
    /// Recorded wound depth in cm (informational only)
    pub wound_depth: Option<Decimal>,
    /// Whether the patient account is active
    pub account_active: bool,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// Create a new patient with required fields.
    pub fn new(provider_id: String, first_name: String, last_name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            patient_id: uuid::Uuid::new_v4().to_string(),
            provider_id,
            first_name,
            last_name,
            middle_initial: None,
            date_of_birth: None,
            email: None,
            phone_number: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            primary_insurance: None,
            primary_insurance_number: None,
            secondary_insurance: None,
            secondary_insurance_number: None,
            medical_record_number: None,
            wound_length: None,
            wound_width: None,
            wound_depth: None,
            account_active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Builder-style helper for recording wound dimensions (cm).
    pub fn with_wound(mut self, length: Decimal, width: Decimal) -> Self {
        self.wound_length = Some(length);
        self.wound_width = Some(width);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Wound area in cm².
    ///
    /// `None` unless both length and width are recorded and positive, and
    /// their product fits in a `Decimal`.
    pub fn wound_area(&self) -> Option<Decimal> {
        match (self.wound_length, self.wound_width) {
            (Some(length), Some(width)) if length > Decimal::ZERO && width > Decimal::ZERO => {
                length.checked_mul(width)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_new_patient() {
        let patient = Patient::new("prov-1".into(), "Ada".into(), "Lovelace".into());
        assert_eq!(patient.full_name(), "Ada Lovelace");
        assert!(patient.account_active);
        assert_eq!(patient.patient_id.len(), 36); // UUID format
    }

    #[test]
    fn test_wound_area() {
        let patient = Patient::new("prov-1".into(), "Ada".into(), "Lovelace".into())
            .with_wound(Decimal::new(45, 1), Decimal::new(2, 0));
        assert_eq!(patient.wound_area(), Some(Decimal::new(90, 1)));
    }

    #[test]
    fn test_wound_area_requires_both_dimensions() {
        let mut patient = Patient::new("prov-1".into(), "Ada".into(), "Lovelace".into());
        assert_eq!(patient.wound_area(), None);

        patient.wound_length = Some(Decimal::new(4, 0));
        assert_eq!(patient.wound_area(), None);

        // Zero is treated the same as missing
        patient.wound_width = Some(Decimal::ZERO);
        assert_eq!(patient.wound_area(), None);
    }

    #[test]
    fn test_wound_area_overflow_is_unrecorded() {
        let patient = Patient::new("prov-1".into(), "Ada".into(), "Lovelace".into())
            .with_wound(Decimal::MAX, Decimal::new(2, 0));
        assert_eq!(patient.wound_area(), None);
    }
}
