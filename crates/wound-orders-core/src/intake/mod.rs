//! Order intake service.
//!
//! Flow: BEGIN IMMEDIATE → Eligibility Gate → Quantity Validator →
//! insert order + items → COMMIT → invoice delivery (best effort)

mod response;

pub use response::*;

use crate::config::OrderConfig;
use crate::db::{Database, DbError};
use crate::documents::{DocumentError, DocumentResult, DocumentSink, InvoiceDelivery};
use crate::models::{Order, OrderRequest, OrderStatus, Provider};
use crate::validation::{OrderError, OrderRejection, OrderValidator, ValidatedOrder};

/// A page of a patient's order history.
#[derive(Debug, Clone)]
pub struct OrderHistory {
    /// Newest first
    pub orders: Vec<Order>,
    /// All orders of the patient, regardless of paging
    pub total_count: u64,
}

/// Creates and manages orders on behalf of providers.
pub struct OrderService<'a> {
    db: &'a Database,
    config: OrderConfig,
    sink: &'a dyn DocumentSink,
}

impl<'a> OrderService<'a> {
    pub fn new(db: &'a Database, config: OrderConfig, sink: &'a dyn DocumentSink) -> Self {
        Self { db, config, sink }
    }

    pub fn config(&self) -> &OrderConfig {
        &self.config
    }

    /// Validate and commit an order.
    ///
    /// Validation reads and the writes share one IMMEDIATE transaction, so
    /// concurrent submissions for the same patient are serialized. A
    /// rejection leaves the database untouched. Invoice delivery runs after
    /// the commit and never fails the order.
    pub fn create_order(
        &self,
        provider: &Provider,
        request: &OrderRequest,
    ) -> Result<Order, OrderError> {
        let tx = self.db.begin_immediate()?;

        let validated = match OrderValidator::new(self.db, &self.config)
            .validate(&provider.provider_id, request)
        {
            Ok(validated) => validated,
            Err(e) => {
                if let Some(rejection) = e.rejection() {
                    tracing::info!(
                        provider_id = %provider.provider_id,
                        patient_id = %request.patient_id,
                        reason = rejection.reason_code(),
                        "order rejected"
                    );
                }
                return Err(e);
            }
        };

        let mut order = Order::new(
            provider.provider_id.clone(),
            validated.patient.patient_id.clone(),
            request.shipping.clone(),
        );
        for line in &validated.assessment.lines {
            order.add_item(
                Some(line.variant.product_id.clone()),
                line.variant.variant_id.clone(),
                line.quantity,
            );
        }

        self.db
            .insert_order(&mut order, &self.config.order_number_prefix)?;
        tx.commit().map_err(DbError::from)?;

        tracing::info!(
            order_id = %order.order_id,
            order_number = order.order_number.as_deref().unwrap_or(""),
            total_area = %validated.assessment.total_ordered_area,
            max_area = %validated.assessment.max_allowed_area,
            "order accepted"
        );

        self.deliver_documents(provider, &order, &validated);
        Ok(order)
    }

    /// Decode a JSON request body and create the order.
    pub fn submit_json(&self, provider: &Provider, body: &str) -> OrderResponse {
        let request = match OrderRequest::from_json(body) {
            Ok(request) => request,
            Err(e) => {
                tracing::info!(provider_id = %provider.provider_id, error = %e, "malformed order request");
                return OrderResponse::rejected(&OrderRejection::InvalidRequest {
                    detail: e.to_string(),
                });
            }
        };
        OrderResponse::from_result(&self.create_order(provider, &request))
    }

    /// A patient's orders, newest first.
    ///
    /// Returns the configured page size unless `all` is set.
    pub fn order_history(
        &self,
        provider: &Provider,
        patient_id: &str,
        all: bool,
    ) -> Result<OrderHistory, OrderError> {
        let patient = self
            .db
            .get_patient_for_provider(patient_id, &provider.provider_id)?
            .ok_or_else(|| OrderRejection::MissingPatient {
                patient_id: patient_id.to_string(),
            })?;

        let limit = (!all).then_some(self.config.history_page_size);
        Ok(OrderHistory {
            orders: self.db.list_orders_for_patient(&patient.patient_id, limit)?,
            total_count: self.db.count_orders_for_patient(&patient.patient_id)?,
        })
    }

    /// Move one of the provider's orders to `next`.
    pub fn update_status(
        &self,
        provider: &Provider,
        order_id: &str,
        next: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self.find_order(provider, order_id)?;

        if !order.status.can_transition_to(next) {
            return Err(OrderRejection::InvalidStatusTransition {
                from: order.status.as_str().to_string(),
                to: next.as_str().to_string(),
            }
            .into());
        }

        self.db.update_order_status(order_id, next)?;
        tracing::info!(order_id, from = order.status.as_str(), to = next.as_str(), "order status updated");

        self.find_order(provider, order_id)
    }

    /// Stored invoice bytes of one of the provider's orders.
    pub fn download_invoice(&self, provider: &Provider, order_id: &str) -> DocumentResult<Vec<u8>> {
        self.db
            .get_order_for_provider(order_id, &provider.provider_id)?
            .ok_or_else(|| DocumentError::NotFound(format!("order {order_id}")))?;
        InvoiceDelivery::new(self.db, self.sink, &self.config.admin_recipients).download(order_id)
    }

    fn find_order(&self, provider: &Provider, order_id: &str) -> Result<Order, OrderError> {
        Ok(self
            .db
            .get_order_for_provider(order_id, &provider.provider_id)?
            .ok_or_else(|| OrderRejection::OrderNotFound {
                order_id: order_id.to_string(),
            })?)
    }

    fn deliver_documents(&self, provider: &Provider, order: &Order, validated: &ValidatedOrder) {
        let delivery = InvoiceDelivery::new(self.db, self.sink, &self.config.admin_recipients);
        if let Err(e) = delivery.deliver(
            provider,
            order,
            &validated.patient,
            &validated.assessment.lines,
        ) {
            tracing::error!(order_id = %order.order_id, error = %e, "invoice delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizePolicy;
    use crate::documents::MemoryDocumentSink;
    use crate::models::{IvrRecord, Patient, Product, ProductVariant};
    use rust_decimal::Decimal;
    use std::num::NonZeroU32;

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    struct Fixture {
        db: Database,
        sink: MemoryDocumentSink,
        patient: Patient,
        provider: Provider,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_sink(MemoryDocumentSink::new())
        }

        fn with_sink(sink: MemoryDocumentSink) -> Self {
            let db = Database::open_in_memory().unwrap();
            let patient = Patient::new("prov-1".into(), "Ada".into(), "Lovelace".into())
                .with_wound(Decimal::new(4, 0), Decimal::new(4, 0));
            db.insert_patient(&patient).unwrap();

            let mut ivr = IvrRecord::new(patient.patient_id.clone(), "prov-1".into());
            ivr.approve(Some("admin".into()), "");
            db.insert_ivr(&ivr).unwrap();

            db.upsert_product(&Product::new("MW".into(), "Membrane Wrap".into()))
                .unwrap();
            db.upsert_variant(&ProductVariant::new("MW-2x2".into(), "MW".into(), "2x2cm".into()))
                .unwrap();
            db.upsert_variant(&ProductVariant::new("MW-L".into(), "MW".into(), "large".into()))
                .unwrap();

            Self {
                db,
                sink,
                patient,
                provider: Provider::new("prov-1").with_email("dr@clinic.example"),
            }
        }

        fn service(&self) -> OrderService<'_> {
            OrderService::new(&self.db, OrderConfig::default(), &self.sink)
        }

        fn order_count(&self) -> u64 {
            self.db.count_orders_for_patient(&self.patient.patient_id).unwrap()
        }
    }

    #[test]
    fn test_create_order() {
        let fx = Fixture::new();
        let request = OrderRequest::new(fx.patient.patient_id.clone()).with_item("MW-2x2", qty(4));

        let order = fx.service().create_order(&fx.provider, &request).unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_id.as_deref(), Some("MW"));
        assert!(order.order_number.as_deref().unwrap().starts_with("PH-"));

        let stored = fx.db.get_order(&order.order_id).unwrap().unwrap();
        assert_eq!(stored, order);
        assert_eq!(fx.sink.emails().len(), 1);
        assert_eq!(fx.db.list_order_documents(&order.order_id).unwrap().len(), 1);
    }

    #[test]
    fn test_rejection_writes_nothing() {
        let fx = Fixture::new();
        let request = OrderRequest::new(fx.patient.patient_id.clone()).with_item("MW-2x2", qty(5));

        let err = fx.service().create_order(&fx.provider, &request).unwrap_err();
        assert_eq!(err.rejection().map(|r| r.reason_code()), Some("area_exceeded"));
        assert_eq!(fx.order_count(), 0);
        assert!(fx.sink.blob_paths().is_empty());

        // The transaction was rolled back, so the next one can start
        let ok = OrderRequest::new(fx.patient.patient_id.clone()).with_item("MW-2x2", qty(1));
        assert!(fx.service().create_order(&fx.provider, &ok).is_ok());
    }

    #[test]
    fn test_delivery_failure_does_not_fail_order() {
        let fx = Fixture::with_sink(MemoryDocumentSink::failing_storage());
        let request = OrderRequest::new(fx.patient.patient_id.clone()).with_item("MW-2x2", qty(2));

        let order = fx.service().create_order(&fx.provider, &request).unwrap();
        assert_eq!(fx.order_count(), 1);
        assert!(fx.db.list_order_documents(&order.order_id).unwrap().is_empty());
    }

    #[test]
    fn test_lenient_policy_from_config() {
        let fx = Fixture::new();
        let service = OrderService::new(
            &fx.db,
            OrderConfig::default().with_size_policy(SizePolicy::Lenient),
            &fx.sink,
        );
        let request = OrderRequest::new(fx.patient.patient_id.clone()).with_item("MW-L", qty(500));
        assert!(service.create_order(&fx.provider, &request).is_ok());

        let strict = fx.service().create_order(&fx.provider, &request).unwrap_err();
        assert_eq!(
            strict.rejection().map(|r| r.reason_code()),
            Some("variant_size_unparseable")
        );
    }

    #[test]
    fn test_submit_json() {
        let fx = Fixture::new();
        let service = fx.service();

        let body = format!(
            r#"{{"patient_id": "{}", "items": [{{"variant_id": "MW-2x2", "quantity": 4}}]}}"#,
            fx.patient.patient_id
        );
        let response = service.submit_json(&fx.provider, &body);
        assert_eq!(response.status_code, 201);

        let bad = format!(
            r#"{{"patient_id": "{}", "items": [{{"variant_id": "MW-2x2", "quantity": -1}}]}}"#,
            fx.patient.patient_id
        );
        let response = service.submit_json(&fx.provider, &bad);
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body["error"], "invalid_request");

        let response = service.submit_json(&Provider::new("prov-2"), &body);
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body["error"], "missing_patient");
    }

    #[test]
    fn test_order_history() {
        let fx = Fixture::new();
        let service = fx.service();
        let request = OrderRequest::new(fx.patient.patient_id.clone()).with_item("MW-2x2", qty(1));
        for _ in 0..6 {
            service.create_order(&fx.provider, &request).unwrap();
        }

        let page = service
            .order_history(&fx.provider, &fx.patient.patient_id, false)
            .unwrap();
        assert_eq!(page.orders.len(), 5);
        assert_eq!(page.total_count, 6);

        let all = service
            .order_history(&fx.provider, &fx.patient.patient_id, true)
            .unwrap();
        assert_eq!(all.orders.len(), 6);

        let err = service
            .order_history(&Provider::new("prov-2"), &fx.patient.patient_id, true)
            .unwrap_err();
        assert_eq!(err.rejection().map(|r| r.reason_code()), Some("missing_patient"));
    }

    #[test]
    fn test_update_status() {
        let fx = Fixture::new();
        let service = fx.service();
        let request = OrderRequest::new(fx.patient.patient_id.clone()).with_item("MW-2x2", qty(1));
        let order = service.create_order(&fx.provider, &request).unwrap();

        let updated = service
            .update_status(&fx.provider, &order.order_id, OrderStatus::Processing)
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Processing);

        let err = service
            .update_status(&fx.provider, &order.order_id, OrderStatus::Delivered)
            .unwrap_err();
        assert_eq!(
            err.rejection(),
            Some(&OrderRejection::InvalidStatusTransition {
                from: "processing".into(),
                to: "delivered".into()
            })
        );

        let err = service
            .update_status(&Provider::new("prov-2"), &order.order_id, OrderStatus::Shipped)
            .unwrap_err();
        assert_eq!(err.rejection().map(|r| r.status_code()), Some(404));
    }

    #[test]
    fn test_download_invoice() {
        let fx = Fixture::new();
        let service = fx.service();
        let request = OrderRequest::new(fx.patient.patient_id.clone()).with_item("MW-2x2", qty(1));
        let order = service.create_order(&fx.provider, &request).unwrap();

        let bytes = service.download_invoice(&fx.provider, &order.order_id).unwrap();
        assert!(!bytes.is_empty());
        assert!(service
            .download_invoice(&Provider::new("prov-2"), &order.order_id)
            .is_err());
    }
}
