//! Variant size descriptor parser.
//!
//! Catalog sizes are free text ("2 x 2 cm", "20x20mm", "4×4"). The parser
//! pulls out `<number> x <number> [unit]` from the start of the descriptor
//! and converts both dimensions to centimetres.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::SizePolicy;

static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([0-9]+(?:\.[0-9]+)?)\s*[x×]\s*([0-9]+(?:\.[0-9]+)?)\s*([a-z]+)?")
        .expect("size pattern is a valid regex")
});

/// Size parsing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizeParseError {
    #[error("Empty size descriptor")]
    Empty,

    #[error("Could not parse size: {0:?}")]
    NoMatch(String),

    #[error("Unsupported unit {unit:?} in size {descriptor:?}")]
    UnsupportedUnit { descriptor: String, unit: String },

    #[error("Size {0:?} has a zero dimension")]
    ZeroDimension(String),

    #[error("Invalid number in size {0:?}")]
    InvalidNumber(String),
}

/// Parsed dimensions of a variant, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSize {
    pub length_cm: Decimal,
    pub width_cm: Decimal,
}

impl VariantSize {
    /// Area in cm². Saturates instead of overflowing on absurd sizes.
    pub fn area_cm2(&self) -> Decimal {
        self.length_cm.saturating_mul(self.width_cm)
    }
}

/// Parser for catalog size descriptors.
pub struct SizeParser {
    /// Accepted units: lowercase unit → how many of them make one centimetre
    units_per_cm: HashMap<&'static str, Decimal>,
}

impl Default for SizeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeParser {
    /// Create a parser accepting `cm` (the default) and `mm`.
    pub fn new() -> Self {
        let mut units_per_cm = HashMap::new();
        units_per_cm.insert("cm", Decimal::ONE);
        units_per_cm.insert("mm", Decimal::TEN);
        Self { units_per_cm }
    }

    /// Parse a descriptor into centimetre dimensions.
    pub fn parse(&self, descriptor: &str) -> Result<VariantSize, SizeParseError> {
        if descriptor.trim().is_empty() {
            return Err(SizeParseError::Empty);
        }

        let captures = SIZE_PATTERN
            .captures(descriptor)
            .ok_or_else(|| SizeParseError::NoMatch(descriptor.to_string()))?;

        let number = |idx: usize| -> Result<Decimal, SizeParseError> {
            let text = captures.get(idx).map(|m| m.as_str()).unwrap_or_default();
            Decimal::from_str(text).map_err(|_| SizeParseError::InvalidNumber(descriptor.to_string()))
        };
        let length = number(1)?;
        let width = number(2)?;

        let unit = captures
            .get(3)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_else(|| "cm".to_string());
        let divisor = self.units_per_cm.get(unit.as_str()).copied().ok_or_else(|| {
            SizeParseError::UnsupportedUnit {
                descriptor: descriptor.to_string(),
                unit: unit.clone(),
            }
        })?;

        if length.is_zero() || width.is_zero() {
            return Err(SizeParseError::ZeroDimension(descriptor.to_string()));
        }

        Ok(VariantSize {
            length_cm: length / divisor,
            width_cm: width / divisor,
        })
    }

    /// Area of a descriptor in cm², applying the size policy.
    ///
    /// Under [`SizePolicy::Lenient`] an unparseable descriptor yields zero
    /// and a warning; under [`SizePolicy::Strict`] the parse error is returned.
    pub fn area_cm2(&self, descriptor: &str, policy: SizePolicy) -> Result<Decimal, SizeParseError> {
        match self.parse(descriptor) {
            Ok(size) => Ok(size.area_cm2()),
            Err(e) => match policy {
                SizePolicy::Strict => Err(e),
                SizePolicy::Lenient => {
                    tracing::warn!(size = descriptor, error = %e, "unparseable variant size counted as 0 cm²");
                    Ok(Decimal::ZERO)
                }
            },
        }
    }
}
