//! Product catalog models.

use serde::{Deserialize, Serialize};

/// A wound-care product (e.g. a skin substitute) in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier
    pub product_id: String,
    /// Display name
    pub name: String,
    pub manufacturer: Option<String>,
    /// HCPCS billing code (e.g. "Q4205")
    pub hcpcs_code: Option<String>,
    /// Whether this product can currently be ordered
    pub active: bool,
}

/// A sized variant of a product.
///
/// `size` is a free-text descriptor maintained by catalog administration,
/// such as "2 x 2 cm" or "20x20mm".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    pub variant_id: String,
    pub product_id: String,
    pub size: String,
    pub active: bool,
}

impl Product {
    /// Create a new active product.
    pub fn new(product_id: String, name: String) -> Self {
        Self {
            product_id,
            name,
            manufacturer: None,
            hcpcs_code: None,
            active: true,
        }
    }
}

impl ProductVariant {
    /// Create a new active variant.
    pub fn new(variant_id: String, product_id: String, size: String) -> Self {
        Self {
            variant_id,
            product_id,
            size,
            active: true,
        }
    }
}
