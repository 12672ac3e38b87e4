//! Order models and the typed order-creation request.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            "refunded" => Some(OrderStatus::Refunded),
            "failed" => Some(OrderStatus::Failed),
            _ => None,
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered
                | OrderStatus::Cancelled
                | OrderStatus::Refunded
                | OrderStatus::Failed
        )
    }

    /// Check whether `next` is a legal successor of this status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match self {
            Pending => matches!(next, Processing | Cancelled | Failed | Refunded),
            Processing => matches!(next, Shipped | Cancelled | Failed | Refunded),
            Shipped => matches!(next, Delivered | Failed | Refunded),
            Delivered | Cancelled | Refunded | Failed => false,
        }
    }
}

/// Facility and shipping metadata carried on an order.
///
/// Not part of validation; persisted as given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShippingDetails {
    pub facility_name: String,
    pub phone_number: String,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// A committed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub order_id: String,
    /// Human-facing number ("PH-2026-00042"), assigned on insert
    pub order_number: Option<String>,
    pub provider_id: String,
    pub patient_id: String,
    pub shipping: ShippingDetails,
    pub status: OrderStatus,
    pub delivery_date: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: String,
    pub updated_at: String,
}

/// A single line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub item_id: String,
    pub order_id: String,
    /// Product of the variant at order time
    pub product_id: Option<String>,
    pub variant_id: String,
    pub quantity: u32,
}

impl Order {
    /// Create a new pending order with no items.
    pub fn new(provider_id: String, patient_id: String, shipping: ShippingDetails) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            order_id: uuid::Uuid::new_v4().to_string(),
            order_number: None,
            provider_id,
            patient_id,
            shipping,
            status: OrderStatus::Pending,
            delivery_date: None,
            items: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Append a line item for this order.
    pub fn add_item(&mut self, product_id: Option<String>, variant_id: String, quantity: u32) {
        self.items.push(OrderItem {
            item_id: uuid::Uuid::new_v4().to_string(),
            order_id: self.order_id.clone(),
            product_id,
            variant_id,
            quantity,
        });
    }

    /// Total units across all line items.
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| item.quantity as u64).sum()
    }
}

/// A generated artifact (e.g. an invoice) stored for an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDocument {
    pub document_id: String,
    pub order_id: String,
    /// Document kind, e.g. "invoice"
    pub kind: String,
    /// Location in blob storage
    pub blob_path: String,
    /// SHA-256 of the stored bytes (hex)
    pub sha256: String,
    /// Addresses the document was emailed to
    pub emailed_to: Vec<String>,
    pub created_at: String,
}

/// One requested line: which variant and how many.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LineItemRequest {
    pub variant_id: String,
    pub quantity: NonZeroU32,
}

/// Typed order-creation request, validated at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub patient_id: String,
    pub items: Vec<LineItemRequest>,
    #[serde(default)]
    pub shipping: ShippingDetails,
}

impl OrderRequest {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            items: Vec::new(),
            shipping: ShippingDetails::default(),
        }
    }

    /// Builder-style helper for adding a line item.
    pub fn with_item(mut self, variant_id: impl Into<String>, quantity: NonZeroU32) -> Self {
        self.items.push(LineItemRequest {
            variant_id: variant_id.into(),
            quantity,
        });
        self
    }

    /// Decode a JSON request body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}
