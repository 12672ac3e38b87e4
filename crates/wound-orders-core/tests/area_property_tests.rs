//! Property tests for area arithmetic and size parsing.

use std::num::NonZeroU32;

use proptest::prelude::*;
use rust_decimal::Decimal;
use wound_orders_core::config::SizePolicy;
use wound_orders_core::db::Database;
use wound_orders_core::models::{LineItemRequest, Patient, Product, ProductVariant};
use wound_orders_core::validation::{OrderError, OrderRejection, QuantityValidator, SizeParser};

/// A dimension in cm with up to two decimal places, 0.01..=50.00.
fn dimension() -> impl Strategy<Value = Decimal> {
    (1i64..=5000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

proptest! {
    #[test]
    fn wound_area_is_length_times_width(length in dimension(), width in dimension()) {
        let patient = Patient::new("prov-1".into(), "A".into(), "B".into()).with_wound(length, width);
        prop_assert_eq!(patient.wound_area(), Some(length * width));

        let cap = length * width * Decimal::new(12, 1);
        prop_assert_eq!(cap, Decimal::new(12, 1) * length * width);
    }

    #[test]
    fn cm_and_mm_descriptors_agree(length in 1u32..500, width in 1u32..500) {
        let parser = SizeParser::new();
        let cm = parser.parse(&format!("{}x{}", length, width)).unwrap();
        let spaced = parser.parse(&format!("{} x {} cm", length, width)).unwrap();
        let mm = parser.parse(&format!("{}x{}mm", length * 10, width * 10)).unwrap();

        prop_assert_eq!(cm.area_cm2(), spaced.area_cm2());
        prop_assert_eq!(cm.area_cm2(), mm.area_cm2());
        prop_assert_eq!(cm.area_cm2(), Decimal::from(length * width));
    }

    #[test]
    fn parsing_never_panics(descriptor in ".{0,40}") {
        let parser = SizeParser::new();
        let _ = parser.parse(&descriptor);
        let area = parser.area_cm2(&descriptor, SizePolicy::Lenient);
        prop_assert!(area.is_ok());
    }

    #[test]
    fn cap_rejects_exactly_when_strictly_greater(
        wound_side in 1i64..20,
        quantity in 1u32..60,
    ) {
        let db = Database::open_in_memory().unwrap();
        db.upsert_product(&Product::new("MW".into(), "Membrane Wrap".into())).unwrap();
        db.upsert_variant(&ProductVariant::new("MW-2x2".into(), "MW".into(), "2x2cm".into()))
            .unwrap();

        let wound_area = Decimal::new(wound_side * wound_side, 0);
        let cap = wound_area * Decimal::new(12, 1);
        let total = Decimal::from(quantity * 4);

        let validator = QuantityValidator::new(&db, Decimal::new(12, 1), SizePolicy::Strict);
        let items = [LineItemRequest {
            variant_id: "MW-2x2".into(),
            quantity: NonZeroU32::new(quantity).unwrap(),
        }];
        let result = validator.validate(wound_area, &items);

        if total > cap {
            let is_area_exceeded = matches!(
                result,
                Err(OrderError::Rejected(OrderRejection::AreaExceeded { .. }))
            );
            prop_assert!(is_area_exceeded);
        } else {
            let assessment = result.unwrap();
            prop_assert_eq!(assessment.total_ordered_area, total);
            prop_assert!(assessment.total_ordered_area <= assessment.max_allowed_area);
        }
    }
}
