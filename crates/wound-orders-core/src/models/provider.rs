//! Requesting provider identity.

use serde::{Deserialize, Serialize};

/// The provider placing a request, as authenticated by the host.
///
/// Provider accounts live outside this crate; only what order intake and
/// invoice delivery need is carried here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Provider {
    pub provider_id: String,
    /// Display name, used in document paths
    pub name: Option<String>,
    pub email: Option<String>,
    /// Assigned sales representative, copied on invoices
    pub sales_rep_email: Option<String>,
}

impl Provider {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_sales_rep(mut self, email: impl Into<String>) -> Self {
        self.sales_rep_email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name for documents: display name, else the email's local part,
    /// else the provider ID.
    pub fn label(&self) -> &str {
        let non_blank = |s: &&str| !s.trim().is_empty();
        self.name
            .as_deref()
            .filter(non_blank)
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .filter(non_blank)
            })
            .unwrap_or(&self.provider_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_falls_back_to_id() {
        let provider = Provider::new("prov-1");
        assert_eq!(provider.label(), "prov-1");
        assert_eq!(provider.with_name("  ").label(), "prov-1");
        assert_eq!(Provider::new("prov-1").with_name("Dr. Who").label(), "Dr. Who");
        assert_eq!(
            Provider::new("prov-1").with_email("jdoe@clinic.example").label(),
            "jdoe"
        );
    }
}
