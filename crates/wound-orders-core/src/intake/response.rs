//! HTTP-style response shaping for order creation.

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::Order;
use crate::validation::{OrderError, OrderRejection};

pub const INTERNAL_ERROR_CODE: &str = "internal_error";
pub const INTERNAL_ERROR_DETAIL: &str = "An unexpected error occurred";

/// Status code plus JSON body, ready for any transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderResponse {
    pub status_code: u16,
    pub body: Value,
}

/// Body of a 400/404 response.
#[derive(Debug, Clone, Serialize)]
struct RejectionBody<'a> {
    error: &'a str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    wound_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_allowed_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_ordered_area: Option<f64>,
}

impl OrderResponse {
    /// 201 with the created order.
    pub fn created(order: &Order) -> Self {
        match serde_json::to_value(order) {
            Ok(body) => Self {
                status_code: 201,
                body,
            },
            Err(e) => {
                tracing::error!(order_id = %order.order_id, error = %e, "failed to serialize created order");
                Self::internal()
            }
        }
    }

    /// 400 or 404 describing the rejection.
    pub fn rejected(rejection: &OrderRejection) -> Self {
        let figures = rejection.area_figures();
        let body = RejectionBody {
            error: rejection.reason_code(),
            detail: rejection.message(),
            wound_area: figures.map(|f| f.0),
            max_allowed_area: figures.map(|f| f.1),
            total_ordered_area: figures.map(|f| f.2),
        };

        Self {
            status_code: rejection.status_code(),
            body: serde_json::to_value(&body).unwrap_or_else(|_| {
                json!({ "error": rejection.reason_code(), "detail": rejection.message() })
            }),
        }
    }

    /// 500 with a generic body. Details stay in the logs.
    pub fn internal() -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": INTERNAL_ERROR_CODE, "detail": INTERNAL_ERROR_DETAIL }),
        }
    }

    pub fn from_result(result: &Result<Order, OrderError>) -> Self {
        match result {
            Ok(order) => Self::created(order),
            Err(OrderError::Rejected(rejection)) => Self::rejected(rejection),
            Err(OrderError::Internal(e)) => {
                tracing::error!(error = %e, "order creation failed");
                Self::internal()
            }
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Serialized body.
    pub fn to_json(&self) -> String {
        self.body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::models::ShippingDetails;
    use rust_decimal::Decimal;

    #[test]
    fn test_created() {
        let mut order = Order::new("prov-1".into(), "p1".into(), ShippingDetails::default());
        order.order_number = Some("PH-2026-00001".into());
        let response = OrderResponse::from_result(&Ok(order.clone()));

        assert_eq!(response.status_code, 201);
        assert!(response.is_success());
        assert_eq!(response.body["order_id"], order.order_id);
        assert_eq!(response.body["order_number"], "PH-2026-00001");
        assert_eq!(response.body["status"], "pending");
    }

    #[test]
    fn test_area_exceeded_body() {
        let rejection = OrderRejection::AreaExceeded {
            wound_area: Decimal::new(16, 0),
            max_allowed_area: Decimal::new(192, 1),
            total_ordered_area: Decimal::new(20, 0),
        };
        let response = OrderResponse::rejected(&rejection);

        assert_eq!(response.status_code, 400);
        assert_eq!(response.body["error"], "area_exceeded");
        assert_eq!(response.body["wound_area"], 16.0);
        assert_eq!(response.body["max_allowed_area"], 19.2);
        assert_eq!(response.body["total_ordered_area"], 20.0);
    }

    #[test]
    fn test_not_found_body_has_no_figures() {
        let response = OrderResponse::rejected(&OrderRejection::VariantNotFound {
            variant_id: "MW-9".into(),
        });

        assert_eq!(response.status_code, 404);
        assert_eq!(response.body["error"], "variant_not_found");
        assert!(response.body["detail"].as_str().unwrap().contains("MW-9"));
        assert!(response.body.get("wound_area").is_none());
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = OrderError::Internal(DbError::Constraint("secret table detail".into()));
        let response = OrderResponse::from_result(&Err(err));

        assert_eq!(response.status_code, 500);
        let body: Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(
            body,
            json!({"error": "internal_error", "detail": "An unexpected error occurred"})
        );
    }
}
