//! Order intake validation.
//!
//! Pipeline: Eligibility Gate → Quantity Validator (Size Parser per line)
//!
//! Every check here is read-only. A rejection is always produced before
//! any write happens.

mod eligibility;
mod quantity;
mod size;

pub use eligibility::*;
pub use quantity::*;
pub use size::*;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::OrderConfig;
use crate::db::{Database, DbError};
use crate::models::{OrderRequest, Patient};

/// Why an order was refused.
///
/// The `Display` text is the human-readable message shown to the client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderRejection {
    #[error("Patient {patient_id} not found")]
    MissingPatient { patient_id: String },

    #[error("Insurance not approved. Current IVR status: {current_status}")]
    InsuranceNotApproved { current_status: String },

    #[error("Wound size must be recorded before placing an order")]
    WoundSizeMissing,

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Product variant {variant_id} not found")]
    VariantNotFound { variant_id: String },

    #[error("Size {size:?} of product variant {variant_id} could not be parsed")]
    VariantSizeUnparseable { variant_id: String, size: String },

    #[error(
        "You ordered {total_ordered_area} cm², which exceeds the {max_allowed_area} cm² limit for a {wound_area} cm² wound"
    )]
    AreaExceeded {
        wound_area: Decimal,
        max_allowed_area: Decimal,
        total_ordered_area: Decimal,
    },

    #[error("Invalid request: {detail}")]
    InvalidRequest { detail: String },

    #[error("Order {order_id} not found")]
    OrderNotFound { order_id: String },

    #[error("Order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },
}

impl OrderRejection {
    /// Machine-readable reason code.
    pub fn reason_code(&self) -> &'static str {
        match self {
            OrderRejection::MissingPatient { .. } => "missing_patient",
            OrderRejection::InsuranceNotApproved { .. } => "insurance_not_approved",
            OrderRejection::WoundSizeMissing => "wound_size_missing",
            OrderRejection::EmptyOrder => "empty_order",
            OrderRejection::VariantNotFound { .. } => "variant_not_found",
            OrderRejection::VariantSizeUnparseable { .. } => "variant_size_unparseable",
            OrderRejection::AreaExceeded { .. } => "area_exceeded",
            OrderRejection::InvalidRequest { .. } => "invalid_request",
            OrderRejection::OrderNotFound { .. } => "order_not_found",
            OrderRejection::InvalidStatusTransition { .. } => "invalid_status_transition",
        }
    }

    /// HTTP-style status: 404 for lookups that failed, 400 for policy.
    pub fn status_code(&self) -> u16 {
        match self {
            OrderRejection::MissingPatient { .. }
            | OrderRejection::VariantNotFound { .. }
            | OrderRejection::OrderNotFound { .. } => 404,
            _ => 400,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Area figures as `(wound, max allowed, total ordered)`, for `area_exceeded`.
    pub fn area_figures(&self) -> Option<(f64, f64, f64)> {
        match self {
            OrderRejection::AreaExceeded {
                wound_area,
                max_allowed_area,
                total_ordered_area,
            } => Some((
                area_to_f64(*wound_area),
                area_to_f64(*max_allowed_area),
                area_to_f64(*total_ordered_area),
            )),
            _ => None,
        }
    }
}

/// Round an area to 2 decimal places for reporting.
pub fn round_area(area: Decimal) -> Decimal {
    area.round_dp(2).normalize()
}

/// Reported areas cross JSON and FFI boundaries as floats.
pub fn area_to_f64(area: Decimal) -> f64 {
    round_area(area).to_f64().unwrap_or(f64::MAX)
}

/// Order creation errors.
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Order rejected: {0}")]
    Rejected(#[from] OrderRejection),

    #[error("Internal error: {0}")]
    Internal(#[from] DbError),
}

impl OrderError {
    pub fn rejection(&self) -> Option<&OrderRejection> {
        match self {
            OrderError::Rejected(rejection) => Some(rejection),
            OrderError::Internal(_) => None,
        }
    }
}

/// Outcome of a successful validation.
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub patient: Patient,
    pub assessment: AreaAssessment,
}

/// Runs the full validation pipeline for one request.
pub struct OrderValidator<'a> {
    gate: EligibilityGate<'a>,
    quantity: QuantityValidator<'a>,
}

impl<'a> OrderValidator<'a> {
    pub fn new(db: &'a Database, config: &OrderConfig) -> Self {
        Self {
            gate: EligibilityGate::new(db),
            quantity: QuantityValidator::new(
                db,
                config.area_allowance_multiplier,
                config.size_policy,
            ),
        }
    }

    /// Validate `request` on behalf of `provider_id`.
    pub fn validate(
        &self,
        provider_id: &str,
        request: &OrderRequest,
    ) -> Result<ValidatedOrder, OrderError> {
        // Step 1: patient, IVR and wound dimensions
        let eligible = self.gate.check(provider_id, &request.patient_id)?;

        // Step 2: line items against the wound area
        let assessment = self.quantity.validate(eligible.wound_area, &request.items)?;

        Ok(ValidatedOrder {
            patient: eligible.patient,
            assessment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IvrRecord, IvrStatus, Product, ProductVariant};
    use std::num::NonZeroU32;

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_reason_codes_and_statuses() {
        let missing = OrderRejection::MissingPatient {
            patient_id: "p1".into(),
        };
        assert_eq!(missing.reason_code(), "missing_patient");
        assert_eq!(missing.status_code(), 404);

        let variant = OrderRejection::VariantNotFound {
            variant_id: "v1".into(),
        };
        assert_eq!(variant.status_code(), 404);

        assert_eq!(OrderRejection::EmptyOrder.status_code(), 400);
        assert_eq!(OrderRejection::WoundSizeMissing.status_code(), 400);
        assert_eq!(
            OrderRejection::InvalidRequest { detail: "x".into() }.reason_code(),
            "invalid_request"
        );
    }

    #[test]
    fn test_area_exceeded_message() {
        let rejection = OrderRejection::AreaExceeded {
            wound_area: Decimal::new(16, 0),
            max_allowed_area: Decimal::new(192, 1),
            total_ordered_area: Decimal::new(20, 0),
        };
        assert_eq!(
            rejection.message(),
            "You ordered 20 cm², which exceeds the 19.2 cm² limit for a 16 cm² wound"
        );
        assert_eq!(rejection.area_figures(), Some((16.0, 19.2, 20.0)));
        assert_eq!(OrderRejection::EmptyOrder.area_figures(), None);
    }

    #[test]
    fn test_round_area() {
        assert_eq!(round_area(Decimal::new(123456, 4)), Decimal::new(1235, 2));
        assert_eq!(round_area(Decimal::new(19200, 3)), Decimal::new(192, 1));
        assert_eq!(area_to_f64(Decimal::new(2, 0)), 2.0);
    }

    #[test]
    fn test_pipeline_runs_gate_before_items() {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("prov-1".into(), "Ada".into(), "Lovelace".into())
            .with_wound(Decimal::new(4, 0), Decimal::new(4, 0));
        db.insert_patient(&patient).unwrap();

        let validator = OrderValidator::new(&db, &OrderConfig::default());

        // No IVR yet: insurance rejection wins even for an empty order
        let empty = OrderRequest::new(patient.patient_id.clone());
        let err = validator.validate("prov-1", &empty).unwrap_err();
        assert_eq!(
            err.rejection().map(|r| r.reason_code()),
            Some("insurance_not_approved")
        );

        let mut ivr = IvrRecord::new(patient.patient_id.clone(), "prov-1".into());
        ivr.approve(Some("admin".into()), "");
        db.insert_ivr(&ivr).unwrap();

        let err = validator.validate("prov-1", &empty).unwrap_err();
        assert_eq!(err.rejection(), Some(&OrderRejection::EmptyOrder));

        db.upsert_product(&Product::new("MW".into(), "Membrane Wrap".into()))
            .unwrap();
        db.upsert_variant(&ProductVariant::new("MW-2x2".into(), "MW".into(), "2x2cm".into()))
            .unwrap();

        let request = OrderRequest::new(patient.patient_id.clone()).with_item("MW-2x2", qty(4));
        let validated = validator.validate("prov-1", &request).unwrap();
        assert_eq!(validated.patient.patient_id, patient.patient_id);
        assert_eq!(validated.assessment.total_ordered_area, Decimal::new(16, 0));
        assert_eq!(ivr.status, IvrStatus::Approved);
    }
}
