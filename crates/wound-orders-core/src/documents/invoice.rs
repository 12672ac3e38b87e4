//! Order invoices.

use serde::{Deserialize, Serialize};

use crate::models::{Order, Patient};
use crate::validation::{area_to_f64, AssessedLine};

/// Invoice for a single committed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice metadata
    pub metadata: InvoiceMetadata,
    /// Ordered line items
    pub line_items: Vec<InvoiceLineItem>,
    /// Units across all lines
    pub total_units: u64,
    /// Ordered area across all lines (cm²)
    pub total_area_cm2: f64,
}

/// Invoice metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceMetadata {
    pub order_id: String,
    pub order_number: Option<String>,
    pub provider_id: String,
    pub provider_email: Option<String>,
    pub patient_id: String,
    pub patient_name: String,
    pub facility_name: String,
    /// Single-line shipping address
    pub ship_to: String,
    /// Order creation timestamp
    pub ordered_at: String,
    /// Invoice generation timestamp
    pub issued_at: String,
}

/// Single invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub product_id: String,
    pub variant_id: String,
    /// Catalog size descriptor as ordered
    pub size: String,
    pub quantity: u32,
    pub unit_area_cm2: f64,
    pub line_area_cm2: f64,
}

impl Invoice {
    /// Build an invoice from a committed order and its assessed lines.
    pub fn from_order(
        order: &Order,
        patient: &Patient,
        provider_email: Option<&str>,
        lines: &[AssessedLine],
    ) -> Self {
        let line_items: Vec<InvoiceLineItem> = lines
            .iter()
            .map(|line| InvoiceLineItem {
                product_id: line.variant.product_id.clone(),
                variant_id: line.variant.variant_id.clone(),
                size: line.variant.size.clone(),
                quantity: line.quantity,
                unit_area_cm2: area_to_f64(line.unit_area),
                line_area_cm2: area_to_f64(line.line_area),
            })
            .collect();

        let total_area = lines
            .iter()
            .fold(rust_decimal::Decimal::ZERO, |acc, line| {
                acc.saturating_add(line.line_area)
            });

        let shipping = &order.shipping;
        let ship_to = [
            shipping.street.as_str(),
            shipping.city.as_str(),
            shipping.zip_code.as_str(),
            shipping.country.as_deref().unwrap_or(""),
        ]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

        Self {
            metadata: InvoiceMetadata {
                order_id: order.order_id.clone(),
                order_number: order.order_number.clone(),
                provider_id: order.provider_id.clone(),
                provider_email: provider_email.map(str::to_string),
                patient_id: patient.patient_id.clone(),
                patient_name: patient.full_name(),
                facility_name: shipping.facility_name.clone(),
                ship_to,
                ordered_at: order.created_at.clone(),
                issued_at: chrono::Utc::now().to_rfc3339(),
            },
            total_units: line_items.iter().map(|l| l.quantity as u64).sum(),
            total_area_cm2: area_to_f64(total_area),
            line_items,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("order_number,patient_name,product_id,variant_id,size,quantity,unit_area_cm2,line_area_cm2\n");

        // Lines
        for item in &self.line_items {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                escape_csv(self.metadata.order_number.as_deref().unwrap_or("")),
                escape_csv(&self.metadata.patient_name),
                escape_csv(&item.product_id),
                escape_csv(&item.variant_id),
                escape_csv(&item.size),
                item.quantity,
                item.unit_area_cm2,
                item.line_area_cm2,
            ));
        }

        csv
    }

    /// Bytes of the rendered invoice document handed to storage and email.
    pub fn render(&self) -> Result<Vec<u8>, serde_json::Error> {
        Ok(self.to_json()?.into_bytes())
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductVariant, ShippingDetails};
    use rust_decimal::Decimal;

    fn make_order() -> (Order, Patient, Vec<AssessedLine>) {
        let patient = Patient::new("prov-1".into(), "Ada".into(), "Lovelace".into());
        let mut order = Order::new(
            "prov-1".into(),
            patient.patient_id.clone(),
            ShippingDetails {
                facility_name: "Main Clinic".into(),
                street: "1 Main St".into(),
                city: "Springfield".into(),
                zip_code: "12345".into(),
                ..Default::default()
            },
        );
        order.order_number = Some("PH-2026-00001".into());

        let lines = vec![
            AssessedLine {
                variant: ProductVariant::new("MW-2x2".into(), "MW".into(), "2x2cm".into()),
                quantity: 3,
                unit_area: Decimal::new(4, 0),
                line_area: Decimal::new(12, 0),
            },
            AssessedLine {
                variant: ProductVariant::new("MW-1.5".into(), "MW".into(), "1.5 x 1.5, cm".into()),
                quantity: 1,
                unit_area: Decimal::new(225, 2),
                line_area: Decimal::new(225, 2),
            },
        ];
        (order, patient, lines)
    }

    #[test]
    fn test_invoice_from_order() {
        let (order, patient, lines) = make_order();
        let invoice = Invoice::from_order(&order, &patient, Some("dr@clinic.example"), &lines);

        assert_eq!(invoice.metadata.order_number.as_deref(), Some("PH-2026-00001"));
        assert_eq!(invoice.metadata.patient_name, "Ada Lovelace");
        assert_eq!(invoice.metadata.ship_to, "1 Main St, Springfield, 12345");
        assert_eq!(invoice.line_items.len(), 2);
        assert_eq!(invoice.total_units, 4);
        assert_eq!(invoice.total_area_cm2, 14.25);
    }

    #[test]
    fn test_invoice_csv() {
        let (order, patient, lines) = make_order();
        let csv = Invoice::from_order(&order, &patient, None, &lines).to_csv();
        let rows: Vec<&str> = csv.lines().collect();

        assert_eq!(rows.len(), 3); // Header + 2 items
        assert!(rows[0].starts_with("order_number,"));
        assert!(rows[1].contains("MW-2x2"));
        assert!(rows[2].contains("\"1.5 x 1.5, cm\""));
    }

    #[test]
    fn test_render_is_json() {
        let (order, patient, lines) = make_order();
        let bytes = Invoice::from_order(&order, &patient, None, &lines)
            .render()
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["metadata"]["facility_name"], "Main Clinic");
    }
}
