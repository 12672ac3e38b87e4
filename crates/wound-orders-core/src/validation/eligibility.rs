//! Order eligibility gate.
//!
//! Checks, in order: the patient exists under the requesting provider, the
//! patient's most recent IVR submission is approved, and wound dimensions
//! are recorded. Read-only.

use rust_decimal::Decimal;

use super::{OrderError, OrderRejection};
use crate::db::Database;
use crate::models::{Patient, NO_IVR_DISPLAY};

/// A patient that passed the gate, with the area that bounds its orders.
#[derive(Debug, Clone)]
pub struct EligiblePatient {
    pub patient: Patient,
    /// Recorded wound area in cm²
    pub wound_area: Decimal,
}

/// Eligibility gate backed by the patient and IVR tables.
pub struct EligibilityGate<'a> {
    db: &'a Database,
}

impl<'a> EligibilityGate<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Check whether `provider_id` may place an order for `patient_id`.
    pub fn check(&self, provider_id: &str, patient_id: &str) -> Result<EligiblePatient, OrderError> {
        let patient = self
            .db
            .get_patient_for_provider(patient_id, provider_id)?
            .ok_or_else(|| OrderRejection::MissingPatient {
                patient_id: patient_id.to_string(),
            })?;

        let latest = self.db.latest_ivr_for_patient(&patient.patient_id)?;
        match latest {
            Some(ivr) if ivr.is_approved() => {}
            Some(ivr) => {
                return Err(OrderRejection::InsuranceNotApproved {
                    current_status: ivr.status.display_name().to_string(),
                }
                .into())
            }
            None => {
                return Err(OrderRejection::InsuranceNotApproved {
                    current_status: NO_IVR_DISPLAY.to_string(),
                }
                .into())
            }
        }

        let wound_area = patient
            .wound_area()
            .ok_or(OrderRejection::WoundSizeMissing)?;

        Ok(EligiblePatient {
            patient,
            wound_area,
        })
    }
}
