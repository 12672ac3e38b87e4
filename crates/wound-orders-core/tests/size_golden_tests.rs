//! Golden tests for the variant size parser.
//!
//! These tests pin descriptor parsing against catalog sizes seen in practice.

use rust_decimal::Decimal;
use std::str::FromStr;
use wound_orders_core::config::SizePolicy;
use wound_orders_core::validation::{SizeParseError, SizeParser};

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    descriptor: &'static str,
    expected_length_cm: &'static str,
    expected_width_cm: &'static str,
    expected_area_cm2: &'static str,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "compact",
            descriptor: "2x2",
            expected_length_cm: "2",
            expected_width_cm: "2",
            expected_area_cm2: "4",
        },
        GoldenCase {
            id: "spaced-with-unit",
            descriptor: "2 x 2 cm",
            expected_length_cm: "2",
            expected_width_cm: "2",
            expected_area_cm2: "4",
        },
        GoldenCase {
            id: "millimetres",
            descriptor: "20x20mm",
            expected_length_cm: "2",
            expected_width_cm: "2",
            expected_area_cm2: "4",
        },
        GoldenCase {
            id: "uppercase",
            descriptor: "4X4CM",
            expected_length_cm: "4",
            expected_width_cm: "4",
            expected_area_cm2: "16",
        },
        GoldenCase {
            id: "multiplication-sign",
            descriptor: "3×4 cm",
            expected_length_cm: "3",
            expected_width_cm: "4",
            expected_area_cm2: "12",
        },
        GoldenCase {
            id: "decimal-dimensions",
            descriptor: "1.5 x 2.5 cm",
            expected_length_cm: "1.5",
            expected_width_cm: "2.5",
            expected_area_cm2: "3.75",
        },
        GoldenCase {
            id: "decimal-millimetres",
            descriptor: "15 x 25 mm",
            expected_length_cm: "1.5",
            expected_width_cm: "2.5",
            expected_area_cm2: "3.75",
        },
        GoldenCase {
            id: "rectangular-sheet",
            descriptor: "5 x 10cm sheet",
            expected_length_cm: "5",
            expected_width_cm: "10",
            expected_area_cm2: "50",
        },
        GoldenCase {
            id: "leading-whitespace",
            descriptor: "   7x7",
            expected_length_cm: "7",
            expected_width_cm: "7",
            expected_area_cm2: "49",
        },
    ]
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_golden_cases() {
    let parser = SizeParser::new();

    for case in get_golden_cases() {
        let size = parser
            .parse(case.descriptor)
            .unwrap_or_else(|e| panic!("Case {}: failed to parse: {}", case.id, e));

        assert_eq!(
            size.length_cm,
            dec(case.expected_length_cm),
            "Case {}: length mismatch",
            case.id
        );
        assert_eq!(
            size.width_cm,
            dec(case.expected_width_cm),
            "Case {}: width mismatch",
            case.id
        );
        assert_eq!(
            size.area_cm2(),
            dec(case.expected_area_cm2),
            "Case {}: area mismatch",
            case.id
        );
    }
}

#[test]
fn test_all_unparseable_descriptors() {
    let parser = SizeParser::new();

    let cases = vec![
        ("large", "word only"),
        ("", "empty"),
        ("   ", "blank"),
        ("x 4", "missing first number"),
        ("4 x", "missing second number"),
        ("size 2x2", "text before dimensions"),
        ("2x2 in", "inches"),
        ("2x2 m", "metres"),
        ("0 x 5 cm", "zero length"),
        ("5 x 0", "zero width"),
    ];

    for (descriptor, why) in cases {
        assert!(
            parser.parse(descriptor).is_err(),
            "{:?} ({}) should not parse",
            descriptor,
            why
        );
        assert_eq!(
            parser.area_cm2(descriptor, SizePolicy::Lenient).unwrap(),
            Decimal::ZERO,
            "{:?} ({}) should count as zero when lenient",
            descriptor,
            why
        );
    }
}

#[test]
fn test_error_kinds() {
    let parser = SizeParser::new();

    assert_eq!(parser.parse(" "), Err(SizeParseError::Empty));
    assert_eq!(
        parser.parse("2x2 in"),
        Err(SizeParseError::UnsupportedUnit {
            descriptor: "2x2 in".into(),
            unit: "in".into()
        })
    );
    assert_eq!(
        parser.parse("medium"),
        Err(SizeParseError::NoMatch("medium".into()))
    );
}
