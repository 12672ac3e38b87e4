//! SQLite schema definition.

/// Complete database schema for wound-orders.
///
/// Decimal measurements are stored as canonical decimal TEXT so that no
/// floating-point rounding creeps into the area arithmetic.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    patient_id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    middle_initial TEXT,
    date_of_birth TEXT,
    email TEXT,
    phone_number TEXT,
    address TEXT,
    city TEXT,
    state TEXT,
    zip_code TEXT,
    primary_insurance TEXT,
    primary_insurance_number TEXT,
    secondary_insurance TEXT,
    secondary_insurance_number TEXT,
    medical_record_number TEXT,
    wound_length TEXT,                           -- decimal cm
    wound_width TEXT,                            -- decimal cm
    wound_depth TEXT,                            -- decimal cm
    account_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_provider ON patients(provider_id);
CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(last_name, first_name);

-- ============================================================================
-- IVR (insurance verification) submissions
-- ============================================================================

CREATE TABLE IF NOT EXISTS ivr_records (
    ivr_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(patient_id) ON DELETE CASCADE,
    provider_id TEXT NOT NULL,
    physician_name TEXT,
    contact_name TEXT,
    phone TEXT,
    facility_address TEXT,
    wound_length TEXT,
    wound_width TEXT,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'approved', 'denied', 'cancelled', 'withdrawn')),
    admin_notes TEXT,
    submitted_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    reviewed_at TEXT,
    reviewed_by TEXT
);

CREATE INDEX IF NOT EXISTS idx_ivr_patient_submitted ON ivr_records(patient_id, submitted_at DESC);
CREATE INDEX IF NOT EXISTS idx_ivr_status ON ivr_records(status, submitted_at DESC);

-- ============================================================================
-- Catalog
-- ============================================================================

CREATE TABLE IF NOT EXISTS products (
    product_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    manufacturer TEXT,
    hcpcs_code TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS product_variants (
    variant_id TEXT PRIMARY KEY,
    product_id TEXT NOT NULL REFERENCES products(product_id) ON DELETE CASCADE,
    size TEXT NOT NULL,                          -- free text, e.g. "2 x 2 cm"
    active INTEGER NOT NULL DEFAULT 1,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_variants_product ON product_variants(product_id);

-- ============================================================================
-- Orders
-- ============================================================================

CREATE TABLE IF NOT EXISTS orders (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,       -- drives the order number
    order_id TEXT NOT NULL UNIQUE,
    order_number TEXT UNIQUE,
    provider_id TEXT NOT NULL,
    patient_id TEXT NOT NULL REFERENCES patients(patient_id) ON DELETE CASCADE,
    facility_name TEXT NOT NULL DEFAULT '',
    phone_number TEXT NOT NULL DEFAULT '',
    street TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    zip_code TEXT NOT NULL DEFAULT '',
    country TEXT,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'processing', 'shipped', 'delivered',
                          'cancelled', 'refunded', 'failed')),
    delivery_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_orders_patient ON orders(patient_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_orders_provider ON orders(provider_id);

-- Delivered orders are frozen
CREATE TRIGGER IF NOT EXISTS orders_delivered_immutable BEFORE UPDATE ON orders
WHEN old.status = 'delivered'
BEGIN
    SELECT RAISE(ABORT, 'Delivered orders are immutable');
END;

CREATE TABLE IF NOT EXISTS order_items (
    item_id TEXT PRIMARY KEY,
    order_id TEXT NOT NULL REFERENCES orders(order_id) ON DELETE CASCADE,
    product_id TEXT REFERENCES products(product_id) ON DELETE SET NULL,
    variant_id TEXT NOT NULL REFERENCES product_variants(variant_id),
    quantity INTEGER NOT NULL CHECK (quantity > 0)
);

CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id);

-- ============================================================================
-- Generated documents (invoices)
-- ============================================================================

CREATE TABLE IF NOT EXISTS order_documents (
    document_id TEXT PRIMARY KEY,
    order_id TEXT NOT NULL REFERENCES orders(order_id) ON DELETE CASCADE,
    kind TEXT NOT NULL,                          -- e.g. 'invoice'
    blob_path TEXT NOT NULL,
    sha256 TEXT NOT NULL,
    emailed_to TEXT NOT NULL DEFAULT '[]',       -- JSON array of addresses
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_order_documents_order ON order_documents(order_id);
"#;
