//! Quantity validation: total ordered area against the wound area.

use rust_decimal::Decimal;

use super::{round_area, OrderError, OrderRejection, SizeParseError, SizeParser};
use crate::config::SizePolicy;
use crate::db::Database;
use crate::models::{LineItemRequest, ProductVariant};

/// One line item after its variant was looked up and sized.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessedLine {
    pub variant: ProductVariant,
    pub quantity: u32,
    /// Area of a single unit (cm²)
    pub unit_area: Decimal,
    /// `unit_area × quantity` (cm²)
    pub line_area: Decimal,
}

/// Area computation for an accepted order.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaAssessment {
    pub wound_area: Decimal,
    pub max_allowed_area: Decimal,
    pub total_ordered_area: Decimal,
    pub lines: Vec<AssessedLine>,
}

/// Checks that an order's items fit within the allowed multiple of the
/// wound area.
pub struct QuantityValidator<'a> {
    db: &'a Database,
    parser: SizeParser,
    multiplier: Decimal,
    policy: SizePolicy,
}

impl<'a> QuantityValidator<'a> {
    pub fn new(db: &'a Database, multiplier: Decimal, policy: SizePolicy) -> Self {
        Self {
            db,
            parser: SizeParser::new(),
            multiplier,
            policy,
        }
    }

    /// Validate `items` against `wound_area`.
    ///
    /// Rejections come in a fixed order: empty order, then the first
    /// unknown variant, then the first unparseable size (strict policy
    /// only), then the area cap. Equality with the cap is accepted.
    pub fn validate(
        &self,
        wound_area: Decimal,
        items: &[LineItemRequest],
    ) -> Result<AreaAssessment, OrderError> {
        if items.is_empty() {
            return Err(OrderRejection::EmptyOrder.into());
        }

        let mut variants = Vec::with_capacity(items.len());
        for item in items {
            let variant = self.db.get_variant(&item.variant_id)?.ok_or_else(|| {
                OrderRejection::VariantNotFound {
                    variant_id: item.variant_id.clone(),
                }
            })?;
            variants.push(variant);
        }

        let mut lines = Vec::with_capacity(items.len());
        let mut total_ordered_area = Decimal::ZERO;
        for (item, variant) in items.iter().zip(variants) {
            let unit_area = self
                .parser
                .area_cm2(&variant.size, self.policy)
                .map_err(|e: SizeParseError| {
                    tracing::debug!(variant_id = %variant.variant_id, error = %e, "variant size rejected");
                    OrderRejection::VariantSizeUnparseable {
                        variant_id: variant.variant_id.clone(),
                        size: variant.size.clone(),
                    }
                })?;

            let quantity = item.quantity.get();
            let line_area = unit_area.saturating_mul(Decimal::from(quantity));
            total_ordered_area = total_ordered_area.saturating_add(line_area);

            lines.push(AssessedLine {
                variant,
                quantity,
                unit_area,
                line_area,
            });
        }

        let max_allowed_area = wound_area.saturating_mul(self.multiplier);
        if total_ordered_area > max_allowed_area {
            return Err(OrderRejection::AreaExceeded {
                wound_area: round_area(wound_area),
                max_allowed_area: round_area(max_allowed_area),
                total_ordered_area: round_area(total_ordered_area),
            }
            .into());
        }

        Ok(AreaAssessment {
            wound_area,
            max_allowed_area,
            total_ordered_area,
            lines,
        })
    }
}
