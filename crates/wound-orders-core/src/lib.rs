//! Wound-Orders Core Library
//!
//! Local-first order intake for wound-care products, with insurance (IVR)
//! gating and wound-area quantity limits.
//!
//! # Architecture
//!
//! ```text
//! Provider submits { patient_id, items[{variant_id, quantity}], shipping }
//!                                 │
//!                      [typed boundary: OrderRequest]
//!                                 │
//!                 ┌───────────────▼───────────────┐
//!                 │        BEGIN IMMEDIATE        │
//!                 │  Eligibility Gate             │
//!                 │   patient → latest IVR → wound│
//!                 │  Quantity Validator           │
//!                 │   Σ area(size) × qty ≤ 1.2×A  │
//!                 │  insert order + items         │
//!                 │        COMMIT                 │
//!                 └───────────────┬───────────────┘
//!                                 │
//!                 ┌───────────────┴───────────────┐
//!                 ▼                               ▼
//!          Invoice storage                  Invoice email
//!            (best effort)                  (best effort)
//! ```
//!
//! # Core Principle
//!
//! **Every rejection happens before any write.** A committed order always
//! passed the IVR gate and the area cap.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Patient, IvrRecord, ProductVariant, Order, etc.)
//! - [`validation`]: Eligibility gate, size parser, quantity validator
//! - [`intake`]: Order service and response shaping
//! - [`documents`]: Invoice generation and delivery
//! - [`config`]: Order intake configuration

pub mod config;
pub mod db;
pub mod documents;
pub mod intake;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{OrderConfig, SizePolicy};
pub use db::Database;
pub use documents::{DocumentSink, EmailMessage, Invoice, MemoryDocumentSink};
pub use intake::{OrderHistory, OrderResponse, OrderService};
pub use models::{
    IvrRecord, IvrStatus, LineItemRequest, Order, OrderItem, OrderRequest, OrderStatus, Patient,
    Product, ProductVariant, Provider, ShippingDetails,
};
pub use validation::{OrderError, OrderRejection, SizeParser};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum WoundOrdersError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Order rejected ({reason_code}): {detail}")]
    OrderRejected { reason_code: String, detail: String },

    #[error("Document error: {0}")]
    DocumentError(String),
}

impl From<db::DbError> for WoundOrdersError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => WoundOrdersError::NotFound(what),
            other => WoundOrdersError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for WoundOrdersError {
    fn from(e: serde_json::Error) -> Self {
        WoundOrdersError::SerializationError(e.to_string())
    }
}

impl From<config::ConfigError> for WoundOrdersError {
    fn from(e: config::ConfigError) -> Self {
        WoundOrdersError::InvalidInput(e.to_string())
    }
}

impl From<OrderError> for WoundOrdersError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Rejected(rejection) => WoundOrdersError::OrderRejected {
                reason_code: rejection.reason_code().to_string(),
                detail: rejection.message(),
            },
            OrderError::Internal(db_err) => db_err.into(),
        }
    }
}

impl From<documents::DocumentError> for WoundOrdersError {
    fn from(e: documents::DocumentError) -> Self {
        match e {
            documents::DocumentError::NotFound(what) => WoundOrdersError::NotFound(what),
            other => WoundOrdersError::DocumentError(other.to_string()),
        }
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for WoundOrdersError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        WoundOrdersError::DocumentError(e.reason)
    }
}

impl<T> From<std::sync::PoisonError<T>> for WoundOrdersError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        WoundOrdersError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
///
/// `config_json` is an [`OrderConfig`] document; defaults apply when absent.
/// Invoices go to `sink`; without one they are kept in memory by this
/// object only.
#[uniffi::export]
pub fn open_database(
    path: String,
    config_json: Option<String>,
    sink: Option<Arc<dyn HostDocumentSink>>,
) -> Result<Arc<WoundOrdersCore>, WoundOrdersError> {
    let db = Database::open(&path)?;
    WoundOrdersCore::build(db, config_json, sink)
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory(
    config_json: Option<String>,
    sink: Option<Arc<dyn HostDocumentSink>>,
) -> Result<Arc<WoundOrdersCore>, WoundOrdersError> {
    let db = Database::open_in_memory()?;
    WoundOrdersCore::build(db, config_json, sink)
}

/// Install a `tracing` subscriber writing to stderr.
///
/// `filter` uses `EnvFilter` syntax (e.g. `"wound_orders_core=debug"`);
/// `RUST_LOG` wins when set. Returns false if a subscriber was already
/// installed.
#[uniffi::export]
pub fn init_logging(filter: String) -> bool {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}

/// Area in cm² of a catalog size descriptor (e.g. "2 x 2 cm").
#[uniffi::export]
pub fn variant_area_cm2(descriptor: String) -> Result<f64, WoundOrdersError> {
    let size = SizeParser::new()
        .parse(&descriptor)
        .map_err(|e| WoundOrdersError::InvalidInput(e.to_string()))?;
    Ok(validation::area_to_f64(size.area_cm2()))
}

// =========================================================================
// Host Document Sink
// =========================================================================

/// Blob storage and email delivery implemented by the host application.
#[uniffi::export(with_foreign)]
pub trait HostDocumentSink: Send + Sync {
    /// Store `bytes` at `path`; returns the SHA-256 (hex) of what was stored.
    fn store_blob(&self, path: String, bytes: Vec<u8>) -> Result<String, WoundOrdersError>;

    fn fetch_blob(&self, path: String) -> Result<Option<Vec<u8>>, WoundOrdersError>;

    fn send_email(&self, email: FfiEmail) -> Result<(), WoundOrdersError>;
}

/// Adapts a host sink to the crate's [`DocumentSink`].
struct HostSink(Arc<dyn HostDocumentSink>);

impl DocumentSink for HostSink {
    fn store_blob(&self, path: &str, bytes: &[u8]) -> documents::DocumentResult<String> {
        self.0
            .store_blob(path.to_string(), bytes.to_vec())
            .map_err(|e| documents::DocumentError::Storage(e.to_string()))
    }

    fn fetch_blob(&self, path: &str) -> documents::DocumentResult<Option<Vec<u8>>> {
        self.0
            .fetch_blob(path.to_string())
            .map_err(|e| documents::DocumentError::Storage(e.to_string()))
    }

    fn send_email(&self, message: &EmailMessage) -> documents::DocumentResult<()> {
        self.0
            .send_email(message.clone().into())
            .map_err(|e| documents::DocumentError::Email(e.to_string()))
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct WoundOrdersCore {
    db: Arc<Mutex<Database>>,
    config: OrderConfig,
    sink: Arc<dyn DocumentSink>,
}

impl WoundOrdersCore {
    fn build(
        db: Database,
        config_json: Option<String>,
        host_sink: Option<Arc<dyn HostDocumentSink>>,
    ) -> Result<Arc<Self>, WoundOrdersError> {
        let config = match config_json {
            Some(json) => OrderConfig::from_json(&json)?,
            None => OrderConfig::default(),
        };
        let sink: Arc<dyn DocumentSink> = match host_sink {
            Some(host) => Arc::new(HostSink(host)),
            None => Arc::new(MemoryDocumentSink::new()),
        };
        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            config,
            sink,
        }))
    }

    fn review_ivr(
        &self,
        ivr_id: &str,
        status: IvrStatus,
        reviewed_by: Option<String>,
        notes: &str,
    ) -> Result<FfiIvrRecord, WoundOrdersError> {
        let db = self.db.lock()?;
        let mut ivr = db
            .get_ivr(ivr_id)?
            .ok_or_else(|| WoundOrdersError::NotFound(format!("IVR {}", ivr_id)))?;
        match status {
            IvrStatus::Approved => ivr.approve(reviewed_by, notes),
            _ => ivr.deny(reviewed_by, notes),
        }
        db.update_ivr_review(&ivr)?;
        Ok(ivr.into())
    }
}

#[uniffi::export]
impl WoundOrdersCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Create a new patient for a provider.
    ///
    /// Wound dimensions are decimal strings in cm (e.g. "4.5").
    pub fn create_patient(
        &self,
        provider_id: String,
        first_name: String,
        last_name: String,
        wound_length: Option<String>,
        wound_width: Option<String>,
    ) -> Result<FfiPatient, WoundOrdersError> {
        let db = self.db.lock()?;
        let mut patient = Patient::new(provider_id, first_name, last_name);
        patient.wound_length = parse_decimal("wound_length", wound_length)?;
        patient.wound_width = parse_decimal("wound_width", wound_width)?;
        db.insert_patient(&patient)?;
        Ok(patient.into())
    }

    /// Get one of the provider's patients.
    pub fn get_patient(
        &self,
        provider_id: String,
        patient_id: String,
    ) -> Result<Option<FfiPatient>, WoundOrdersError> {
        let db = self.db.lock()?;
        let patient = db.get_patient_for_provider(&patient_id, &provider_id)?;
        Ok(patient.map(|p| p.into()))
    }

    /// Search the provider's patients by name prefix.
    pub fn search_patients(
        &self,
        provider_id: String,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, WoundOrdersError> {
        let db = self.db.lock()?;
        let patients = db.search_patients(&provider_id, &query, limit as usize)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Record new wound measurements for a patient.
    pub fn update_wound(
        &self,
        provider_id: String,
        patient_id: String,
        wound_length: Option<String>,
        wound_width: Option<String>,
        wound_depth: Option<String>,
    ) -> Result<FfiPatient, WoundOrdersError> {
        let db = self.db.lock()?;
        let mut patient = db
            .get_patient_for_provider(&patient_id, &provider_id)?
            .ok_or_else(|| WoundOrdersError::NotFound(format!("patient {}", patient_id)))?;
        patient.wound_length = parse_decimal("wound_length", wound_length)?;
        patient.wound_width = parse_decimal("wound_width", wound_width)?;
        patient.wound_depth = parse_decimal("wound_depth", wound_depth)?;
        patient.updated_at = chrono::Utc::now().to_rfc3339();
        db.update_patient(&patient)?;
        Ok(patient.into())
    }

    // =========================================================================
    // IVR Operations
    // =========================================================================

    /// Submit a new (pending) IVR for one of the provider's patients.
    pub fn submit_ivr(
        &self,
        provider_id: String,
        patient_id: String,
        physician_name: Option<String>,
    ) -> Result<FfiIvrRecord, WoundOrdersError> {
        let db = self.db.lock()?;
        let patient = db
            .get_patient_for_provider(&patient_id, &provider_id)?
            .ok_or_else(|| WoundOrdersError::NotFound(format!("patient {}", patient_id)))?;

        let mut ivr = IvrRecord::new(patient.patient_id, provider_id);
        ivr.physician_name = physician_name;
        ivr.wound_length = patient.wound_length;
        ivr.wound_width = patient.wound_width;
        db.insert_ivr(&ivr)?;
        Ok(ivr.into())
    }

    /// Approve an IVR (admin review).
    pub fn approve_ivr(
        &self,
        ivr_id: String,
        reviewed_by: Option<String>,
        notes: String,
    ) -> Result<FfiIvrRecord, WoundOrdersError> {
        self.review_ivr(&ivr_id, IvrStatus::Approved, reviewed_by, &notes)
    }

    /// Deny an IVR (admin review).
    pub fn deny_ivr(
        &self,
        ivr_id: String,
        reviewed_by: Option<String>,
        notes: String,
    ) -> Result<FfiIvrRecord, WoundOrdersError> {
        self.review_ivr(&ivr_id, IvrStatus::Denied, reviewed_by, &notes)
    }

    /// Withdraw one of the provider's pending IVRs.
    pub fn withdraw_ivr(
        &self,
        provider_id: String,
        ivr_id: String,
    ) -> Result<FfiIvrRecord, WoundOrdersError> {
        let db = self.db.lock()?;
        let mut ivr = db
            .get_ivr(&ivr_id)?
            .filter(|ivr| ivr.provider_id == provider_id)
            .ok_or_else(|| WoundOrdersError::NotFound(format!("IVR {}", ivr_id)))?;
        if !ivr.withdraw() {
            return Err(WoundOrdersError::InvalidInput(format!(
                "IVR {} is {} and can no longer be withdrawn",
                ivr_id,
                ivr.status.as_str()
            )));
        }
        db.update_ivr_review(&ivr)?;
        Ok(ivr.into())
    }

    /// IVR history of one of the provider's patients, newest first.
    pub fn list_ivr(
        &self,
        provider_id: String,
        patient_id: String,
    ) -> Result<Vec<FfiIvrRecord>, WoundOrdersError> {
        let db = self.db.lock()?;
        let patient = db
            .get_patient_for_provider(&patient_id, &provider_id)?
            .ok_or_else(|| WoundOrdersError::NotFound(format!("patient {}", patient_id)))?;
        let records = db.list_ivr_for_patient(&patient.patient_id)?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Add or update a product.
    pub fn upsert_product(&self, product: FfiProduct) -> Result<(), WoundOrdersError> {
        let db = self.db.lock()?;
        db.upsert_product(&product.into())?;
        Ok(())
    }

    /// Add or update a product variant.
    pub fn upsert_variant(&self, variant: FfiVariant) -> Result<(), WoundOrdersError> {
        let db = self.db.lock()?;
        db.upsert_variant(&variant.into())?;
        Ok(())
    }

    /// Variants of a product.
    pub fn list_variants(&self, product_id: String) -> Result<Vec<FfiVariant>, WoundOrdersError> {
        let db = self.db.lock()?;
        let variants = db.list_variants(&product_id)?;
        Ok(variants.into_iter().map(|v| v.into()).collect())
    }

    // =========================================================================
    // Order Operations
    // =========================================================================

    /// Validate and commit an order.
    ///
    /// A line with quantity 0 rejects the whole request as `invalid_request`.
    pub fn create_order(
        &self,
        provider: FfiProvider,
        request: FfiOrderRequest,
    ) -> Result<FfiOrder, WoundOrdersError> {
        let request = OrderRequest::try_from(request).map_err(OrderError::Rejected)?;
        let db = self.db.lock()?;
        let service = OrderService::new(&db, self.config.clone(), self.sink.as_ref());
        let order = service.create_order(&provider.into(), &request)?;
        Ok(order.into())
    }

    /// JSON endpoint: decode the body, create the order, shape the response.
    pub fn submit_order_json(
        &self,
        provider: FfiProvider,
        body: String,
    ) -> Result<FfiHttpResponse, WoundOrdersError> {
        let db = self.db.lock()?;
        let service = OrderService::new(&db, self.config.clone(), self.sink.as_ref());
        let response = service.submit_json(&provider.into(), &body);
        Ok(FfiHttpResponse {
            status_code: response.status_code,
            body: response.to_json(),
        })
    }

    /// A patient's orders, newest first (one page unless `all`).
    pub fn order_history(
        &self,
        provider_id: String,
        patient_id: String,
        all: bool,
    ) -> Result<FfiOrderHistory, WoundOrdersError> {
        let db = self.db.lock()?;
        let service = OrderService::new(&db, self.config.clone(), self.sink.as_ref());
        let history = service.order_history(&Provider::new(provider_id), &patient_id, all)?;
        Ok(FfiOrderHistory {
            orders: history.orders.into_iter().map(|o| o.into()).collect(),
            total_count: history.total_count,
        })
    }

    /// Move an order through its lifecycle.
    pub fn update_order_status(
        &self,
        provider_id: String,
        order_id: String,
        status: String,
    ) -> Result<FfiOrder, WoundOrdersError> {
        let next = OrderStatus::parse(&status)
            .ok_or_else(|| WoundOrdersError::InvalidInput(format!("Unknown order status: {}", status)))?;
        let db = self.db.lock()?;
        let service = OrderService::new(&db, self.config.clone(), self.sink.as_ref());
        let order = service.update_status(&Provider::new(provider_id), &order_id, next)?;
        Ok(order.into())
    }

    /// Stored invoice bytes of an order.
    pub fn download_invoice(
        &self,
        provider_id: String,
        order_id: String,
    ) -> Result<Vec<u8>, WoundOrdersError> {
        let db = self.db.lock()?;
        let service = OrderService::new(&db, self.config.clone(), self.sink.as_ref());
        Ok(service.download_invoice(&Provider::new(provider_id), &order_id)?)
    }
}

fn parse_decimal(field: &str, value: Option<String>) -> Result<Option<Decimal>, WoundOrdersError> {
    value
        .map(|v| {
            Decimal::from_str(v.trim())
                .map_err(|e| WoundOrdersError::InvalidInput(format!("{}: {}", field, e)))
        })
        .transpose()
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub patient_id: String,
    pub provider_id: String,
    pub first_name: String,
    pub last_name: String,
    pub wound_length: Option<String>,
    pub wound_width: Option<String>,
    pub wound_depth: Option<String>,
    /// Wound area in cm², when measurable
    pub wound_area: Option<f64>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            wound_area: patient.wound_area().map(validation::area_to_f64),
            patient_id: patient.patient_id,
            provider_id: patient.provider_id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            wound_length: patient.wound_length.map(|d| d.to_string()),
            wound_width: patient.wound_width.map(|d| d.to_string()),
            wound_depth: patient.wound_depth.map(|d| d.to_string()),
        }
    }
}

/// FFI-safe IVR record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIvrRecord {
    pub ivr_id: String,
    pub patient_id: String,
    pub provider_id: String,
    pub status: String,
    /// Human-readable status ("Withdrawn by Provider", ...)
    pub status_display: String,
    pub admin_notes: Option<String>,
    pub submitted_at: String,
    pub reviewed_at: Option<String>,
    pub reviewed_by: Option<String>,
}

impl From<IvrRecord> for FfiIvrRecord {
    fn from(ivr: IvrRecord) -> Self {
        Self {
            ivr_id: ivr.ivr_id,
            patient_id: ivr.patient_id,
            provider_id: ivr.provider_id,
            status: ivr.status.as_str().to_string(),
            status_display: ivr.status.display_name().to_string(),
            admin_notes: ivr.admin_notes,
            submitted_at: ivr.submitted_at,
            reviewed_at: ivr.reviewed_at,
            reviewed_by: ivr.reviewed_by,
        }
    }
}

/// FFI-safe product.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProduct {
    pub product_id: String,
    pub name: String,
    pub manufacturer: Option<String>,
    pub hcpcs_code: Option<String>,
    pub active: bool,
}

impl From<FfiProduct> for Product {
    fn from(product: FfiProduct) -> Self {
        Product {
            product_id: product.product_id,
            name: product.name,
            manufacturer: product.manufacturer,
            hcpcs_code: product.hcpcs_code,
            active: product.active,
        }
    }
}

/// FFI-safe product variant.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVariant {
    pub variant_id: String,
    pub product_id: String,
    pub size: String,
    pub active: bool,
}

impl From<FfiVariant> for ProductVariant {
    fn from(variant: FfiVariant) -> Self {
        ProductVariant {
            variant_id: variant.variant_id,
            product_id: variant.product_id,
            size: variant.size,
            active: variant.active,
        }
    }
}

impl From<ProductVariant> for FfiVariant {
    fn from(variant: ProductVariant) -> Self {
        Self {
            variant_id: variant.variant_id,
            product_id: variant.product_id,
            size: variant.size,
            active: variant.active,
        }
    }
}

/// FFI-safe requesting provider.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProvider {
    pub provider_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub sales_rep_email: Option<String>,
}

impl From<FfiProvider> for Provider {
    fn from(provider: FfiProvider) -> Self {
        Provider {
            provider_id: provider.provider_id,
            name: provider.name,
            email: provider.email,
            sales_rep_email: provider.sales_rep_email,
        }
    }
}

/// FFI-safe order line request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLineItem {
    pub variant_id: String,
    pub quantity: u32,
}

/// FFI-safe order request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrderRequest {
    pub patient_id: String,
    pub items: Vec<FfiLineItem>,
    pub facility_name: String,
    pub phone_number: String,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: Option<String>,
}

impl TryFrom<FfiOrderRequest> for OrderRequest {
    type Error = OrderRejection;

    fn try_from(request: FfiOrderRequest) -> Result<Self, OrderRejection> {
        let mut order_request = OrderRequest::new(request.patient_id);
        for (index, item) in request.items.into_iter().enumerate() {
            let quantity =
                NonZeroU32::new(item.quantity).ok_or_else(|| OrderRejection::InvalidRequest {
                    detail: format!(
                        "items[{}]: quantity for variant {} must be at least 1",
                        index, item.variant_id
                    ),
                })?;
            order_request = order_request.with_item(item.variant_id, quantity);
        }
        order_request.shipping = ShippingDetails {
            facility_name: request.facility_name,
            phone_number: request.phone_number,
            street: request.street,
            city: request.city,
            zip_code: request.zip_code,
            country: request.country,
        };
        Ok(order_request)
    }
}

/// FFI-safe order.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrder {
    pub order_id: String,
    pub order_number: Option<String>,
    pub provider_id: String,
    pub patient_id: String,
    pub status: String,
    pub delivery_date: Option<String>,
    pub items: Vec<FfiOrderItem>,
    pub created_at: String,
}

impl From<Order> for FfiOrder {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            order_number: order.order_number,
            provider_id: order.provider_id,
            patient_id: order.patient_id,
            status: order.status.as_str().to_string(),
            delivery_date: order.delivery_date,
            items: order.items.into_iter().map(|i| i.into()).collect(),
            created_at: order.created_at,
        }
    }
}

/// FFI-safe order item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrderItem {
    pub item_id: String,
    pub product_id: Option<String>,
    pub variant_id: String,
    pub quantity: u32,
}

impl From<OrderItem> for FfiOrderItem {
    fn from(item: OrderItem) -> Self {
        Self {
            item_id: item.item_id,
            product_id: item.product_id,
            variant_id: item.variant_id,
            quantity: item.quantity,
        }
    }
}

/// FFI-safe page of order history.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrderHistory {
    pub orders: Vec<FfiOrder>,
    pub total_count: u64,
}

/// Status code and JSON body of the order endpoint.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHttpResponse {
    pub status_code: u16,
    pub body: String,
}

/// FFI-safe outgoing email with its attachment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

impl From<EmailMessage> for FfiEmail {
    fn from(message: EmailMessage) -> Self {
        Self {
            to: message.to,
            subject: message.subject,
            body: message.body,
            attachment_name: message.attachment_name,
            attachment: message.attachment,
        }
    }
}
