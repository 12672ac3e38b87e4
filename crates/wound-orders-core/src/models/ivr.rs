//! Insurance verification (IVR) records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Review status of a single IVR submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IvrStatus {
    /// Submitted, awaiting review
    Pending,
    Approved,
    Denied,
    Cancelled,
    /// Withdrawn by the submitting provider
    Withdrawn,
}

impl IvrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IvrStatus::Pending => "pending",
            IvrStatus::Approved => "approved",
            IvrStatus::Denied => "denied",
            IvrStatus::Cancelled => "cancelled",
            IvrStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(IvrStatus::Pending),
            "approved" => Some(IvrStatus::Approved),
            "denied" => Some(IvrStatus::Denied),
            "cancelled" => Some(IvrStatus::Cancelled),
            "withdrawn" => Some(IvrStatus::Withdrawn),
            _ => None,
        }
    }

    /// Human-readable label shown to providers.
    pub fn display_name(&self) -> &'static str {
        match self {
            IvrStatus::Pending => "Pending",
            IvrStatus::Approved => "Approved",
            IvrStatus::Denied => "Denied",
            IvrStatus::Cancelled => "Cancelled",
            IvrStatus::Withdrawn => "Withdrawn by Provider",
        }
    }
}

/// Label used when a patient has no IVR submissions at all.
pub const NO_IVR_DISPLAY: &str = "No IVR Submitted";

/// A single IVR submission for a patient.
///
/// A patient may accumulate many submissions; only the most recent one
/// (by `submitted_at`) decides order eligibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IvrRecord {
    pub ivr_id: String,
    pub patient_id: String,
    /// Provider who submitted the form
    pub provider_id: String,
    pub physician_name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub facility_address: Option<String>,
    /// Wound length in cm as stated on the form
    pub wound_length: Option<Decimal>,
    /// Wound width in cm as stated on the form
    pub wound_width: Option<Decimal>,
    pub status: IvrStatus,
    /// Internal notes about the approval/denial decision
    pub admin_notes: Option<String>,
    pub submitted_at: String,
    pub updated_at: String,
    pub reviewed_at: Option<String>,
    pub reviewed_by: Option<String>,
}

impl IvrRecord {
    /// Create a new pending submission.
    pub fn new(patient_id: String, provider_id: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            ivr_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            provider_id,
            physician_name: None,
            contact_name: None,
            phone: None,
            facility_address: None,
            wound_length: None,
            wound_width: None,
            status: IvrStatus::Pending,
            admin_notes: None,
            submitted_at: now.clone(),
            updated_at: now,
            reviewed_at: None,
            reviewed_by: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == IvrStatus::Approved
    }

    pub fn approve(&mut self, reviewed_by: Option<String>, notes: &str) {
        self.review(IvrStatus::Approved, reviewed_by, notes);
    }

    pub fn deny(&mut self, reviewed_by: Option<String>, notes: &str) {
        self.review(IvrStatus::Denied, reviewed_by, notes);
    }

    /// Withdraw a pending submission. Returns false if it was already reviewed.
    pub fn withdraw(&mut self) -> bool {
        if self.status != IvrStatus::Pending {
            return false;
        }
        self.status = IvrStatus::Withdrawn;
        self.touch();
        true
    }

    fn review(&mut self, status: IvrStatus, reviewed_by: Option<String>, notes: &str) {
        let now = chrono::Utc::now().to_rfc3339();
        self.status = status;
        self.reviewed_at = Some(now.clone());
        self.reviewed_by = reviewed_by;
        if !notes.is_empty() {
            self.admin_notes = Some(notes.to_string());
        }
        self.updated_at = now;
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        for status in [
            IvrStatus::Pending,
            IvrStatus::Approved,
            IvrStatus::Denied,
            IvrStatus::Cancelled,
            IvrStatus::Withdrawn,
        ] {
            assert_eq!(IvrStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(IvrStatus::parse("Approved"), None);
        assert_eq!(IvrStatus::Withdrawn.display_name(), "Withdrawn by Provider");
    }

    #[test]
    fn test_approve_sets_review_fields() {
        let mut ivr = IvrRecord::new("patient-1".into(), "prov-1".into());
        ivr.approve(Some("admin-1".into()), "coverage confirmed");

        assert!(ivr.is_approved());
        assert_eq!(ivr.reviewed_by, Some("admin-1".into()));
        assert!(ivr.reviewed_at.is_some());
        assert_eq!(ivr.admin_notes, Some("coverage confirmed".into()));
    }

    #[test]
    fn test_empty_notes_keep_existing() {
        let mut ivr = IvrRecord::new("patient-1".into(), "prov-1".into());
        ivr.admin_notes = Some("first pass".into());
        ivr.deny(None, "");
        assert_eq!(ivr.status, IvrStatus::Denied);
        assert_eq!(ivr.admin_notes, Some("first pass".into()));
    }

    #[test]
    fn test_withdraw_only_from_pending() {
        let mut ivr = IvrRecord::new("patient-1".into(), "prov-1".into());
        assert!(ivr.withdraw());
        assert_eq!(ivr.status, IvrStatus::Withdrawn);

        let mut approved = IvrRecord::new("patient-1".into(), "prov-1".into());
        approved.approve(None, "");
        assert!(!approved.withdraw());
        assert_eq!(approved.status, IvrStatus::Approved);
    }
}
