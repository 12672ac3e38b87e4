//! Invoice storage and email delivery.

use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use super::{DocumentError, DocumentResult, Invoice};
use crate::db::Database;
use crate::models::{Order, OrderDocument, Patient, Provider};
use crate::validation::AssessedLine;

pub const INVOICE_KIND: &str = "invoice";

const INVOICE_EMAIL_BODY: &str = "Please find attached the invoice for your recent order.";

/// An outgoing email with a single attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

/// Blob storage and email delivery used for generated documents.
pub trait DocumentSink: Send + Sync {
    /// Store `bytes` at `path`; returns the SHA-256 (hex) of what was stored.
    fn store_blob(&self, path: &str, bytes: &[u8]) -> DocumentResult<String>;

    /// Read back a stored blob, if present.
    fn fetch_blob(&self, path: &str) -> DocumentResult<Option<Vec<u8>>>;

    fn send_email(&self, message: &EmailMessage) -> DocumentResult<()>;
}

/// What [`MemoryDocumentSink`] remembers about a sent email.
///
/// The attachment itself is not retained; only its checksum.
#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub attachment_name: String,
    pub attachment_sha256: String,
}

impl From<&EmailMessage> for SentEmail {
    fn from(message: &EmailMessage) -> Self {
        Self {
            to: message.to.clone(),
            subject: message.subject.clone(),
            attachment_name: message.attachment_name.clone(),
            attachment_sha256: sha256_hex(&message.attachment),
        }
    }
}

/// In-memory sink for tests and hosts without storage of their own.
///
/// Blobs are keyed by path, so re-storing a path replaces its bytes.
#[derive(Default)]
pub struct MemoryDocumentSink {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    emails: Mutex<Vec<SentEmail>>,
    fail_storage: bool,
    fail_email: bool,
}

impl MemoryDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose uploads always fail.
    pub fn failing_storage() -> Self {
        Self {
            fail_storage: true,
            ..Self::default()
        }
    }

    /// A sink whose emails always fail.
    pub fn failing_email() -> Self {
        Self {
            fail_email: true,
            ..Self::default()
        }
    }

    /// Stored paths, sorted.
    pub fn blob_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .blobs
            .lock()
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    pub fn emails(&self) -> Vec<SentEmail> {
        self.emails
            .lock()
            .map(|emails| emails.clone())
            .unwrap_or_default()
    }
}

impl DocumentSink for MemoryDocumentSink {
    fn store_blob(&self, path: &str, bytes: &[u8]) -> DocumentResult<String> {
        if self.fail_storage {
            return Err(DocumentError::Storage(format!("upload refused: {path}")));
        }
        self.blobs.lock()?.insert(path.to_string(), bytes.to_vec());
        Ok(sha256_hex(bytes))
    }

    fn fetch_blob(&self, path: &str) -> DocumentResult<Option<Vec<u8>>> {
        Ok(self.blobs.lock()?.get(path).cloned())
    }

    fn send_email(&self, message: &EmailMessage) -> DocumentResult<()> {
        if self.fail_email {
            return Err(DocumentError::Email("mail transport unavailable".into()));
        }
        self.emails.lock()?.push(SentEmail::from(message));
        Ok(())
    }
}

/// SHA-256 of `bytes`, hex encoded.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Make a string safe as a single blob path segment.
///
/// Keeps alphanumerics, spaces, `-` and `_`; anything else becomes `_`.
pub fn clean_path_segment(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `orders/{provider}/{first_last}/invoice_order_{order_id}.pdf`
pub fn invoice_blob_path(provider: &Provider, patient: &Patient, order_id: &str) -> String {
    format!(
        "orders/{}/{}/{}",
        clean_path_segment(provider.label()),
        clean_path_segment(&format!("{}_{}", patient.first_name, patient.last_name)),
        invoice_file_name(order_id)
    )
}

pub fn invoice_file_name(order_id: &str) -> String {
    format!("invoice_order_{order_id}.pdf")
}

/// Subject line for an invoice email.
pub fn invoice_subject(order: &Order, patient: &Patient) -> String {
    let order_ref = order.order_number.as_deref().unwrap_or(&order.order_id);
    let date = chrono::DateTime::parse_from_rfc3339(&order.created_at)
        .map(|ts| ts.date_naive())
        .unwrap_or_else(|_| chrono::Utc::now().date_naive());
    format!(
        "Invoice for Order {} || {} {} || {}",
        order_ref,
        patient.first_name,
        patient.last_name,
        date.format("%Y-%m-%d")
    )
}

/// Provider first, sales rep second, then admins; blanks and repeats dropped.
pub fn invoice_recipients(provider: &Provider, admin_recipients: &[String]) -> Vec<String> {
    let mut recipients: Vec<String> = Vec::new();
    let candidates = provider
        .email
        .iter()
        .chain(provider.sales_rep_email.iter())
        .chain(admin_recipients.iter());

    for candidate in candidates {
        let address = candidate.trim();
        if address.is_empty()
            || recipients
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(address))
        {
            continue;
        }
        recipients.push(address.to_string());
    }
    recipients
}

/// Generates, stores, and emails order invoices.
pub struct InvoiceDelivery<'a> {
    db: &'a Database,
    sink: &'a dyn DocumentSink,
    admin_recipients: &'a [String],
}

impl<'a> InvoiceDelivery<'a> {
    pub fn new(db: &'a Database, sink: &'a dyn DocumentSink, admin_recipients: &'a [String]) -> Self {
        Self {
            db,
            sink,
            admin_recipients,
        }
    }

    /// Generate the invoice for a committed order, store it, email it, and
    /// record the document.
    ///
    /// The blob is verified against the checksum the sink reports before
    /// anything is emailed.
    pub fn deliver(
        &self,
        provider: &Provider,
        order: &Order,
        patient: &Patient,
        lines: &[AssessedLine],
    ) -> DocumentResult<OrderDocument> {
        let invoice = Invoice::from_order(order, patient, provider.email.as_deref(), lines);
        let bytes = invoice.render()?;
        let expected = sha256_hex(&bytes);

        let blob_path = invoice_blob_path(provider, patient, &order.order_id);
        let stored = self.sink.store_blob(&blob_path, &bytes)?;
        if !stored.eq_ignore_ascii_case(&expected) {
            return Err(DocumentError::ChecksumMismatch {
                path: blob_path,
                expected,
                actual: stored,
            });
        }
        tracing::info!(order_id = %order.order_id, path = %blob_path, "invoice stored");

        let recipients = invoice_recipients(provider, self.admin_recipients);
        if recipients.is_empty() {
            tracing::warn!(order_id = %order.order_id, "invoice has no recipients; email skipped");
        } else {
            self.sink.send_email(&EmailMessage {
                to: recipients.clone(),
                subject: invoice_subject(order, patient),
                body: INVOICE_EMAIL_BODY.to_string(),
                attachment_name: invoice_file_name(&order.order_id),
                attachment: bytes,
            })?;
            tracing::info!(order_id = %order.order_id, recipients = recipients.len(), "invoice emailed");
        }

        let document = OrderDocument {
            document_id: uuid::Uuid::new_v4().to_string(),
            order_id: order.order_id.clone(),
            kind: INVOICE_KIND.to_string(),
            blob_path,
            sha256: expected,
            emailed_to: recipients,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.db.insert_order_document(&document)?;
        Ok(document)
    }

    /// Fetch the stored invoice of an order and check it against the
    /// recorded checksum.
    pub fn download(&self, order_id: &str) -> DocumentResult<Vec<u8>> {
        let document = self
            .db
            .list_order_documents(order_id)?
            .into_iter()
            .rev()
            .find(|doc| doc.kind == INVOICE_KIND)
            .ok_or_else(|| DocumentError::NotFound(format!("invoice for order {order_id}")))?;

        let bytes = self
            .sink
            .fetch_blob(&document.blob_path)?
            .ok_or_else(|| DocumentError::NotFound(document.blob_path.clone()))?;

        let actual = sha256_hex(&bytes);
        if actual != document.sha256 {
            return Err(DocumentError::ChecksumMismatch {
                path: document.blob_path,
                expected: document.sha256,
                actual,
            });
        }
        Ok(bytes)
    }
}
