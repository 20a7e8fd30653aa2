use feedmap::core::transforms::{TransformParams, TransformRegistry};
use feedmap::core::value::Value;
use proptest::prelude::*;
use proptest::test_runner::Config;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

fn apply(registry: &TransformRegistry, name: &str, value: Value) -> Value {
    registry
        .resolve(name)
        .unwrap()
        .apply(value, &TransformParams::new())
        .unwrap()
}

/// `1234567` -> `1,234,567`.
fn with_thousands(digits: &str) -> String {
    let mut grouped = String::new();
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn trim_is_idempotent(text in any::<String>()) {
        let registry = TransformRegistry::with_builtins();
        let once = apply(&registry, "trim", Value::from(text));
        let twice = apply(&registry, "trim", once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn upper_is_idempotent(text in any::<String>()) {
        let registry = TransformRegistry::with_builtins();
        let once = apply(&registry, "upper", Value::from(text));
        let twice = apply(&registry, "upper", once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn parse_price_ignores_currency_formatting(
        units in 0_u64..1_000_000_000_000_u64,
        cents in 0_u32..100_u32,
        symbol in prop::sample::select(vec!["$", "USD ", "€", "£ ", ""]),
        padding in "[ \t]{0,3}",
    ) {
        let registry = TransformRegistry::with_builtins();
        let plain = format!("{}.{:02}", units, cents);
        let formatted = format!(
            "{}{}{}.{:02}{}",
            padding,
            symbol,
            with_thousands(&units.to_string()),
            cents,
            padding
        );
        prop_assert_eq!(
            apply(&registry, "parse_price", Value::from(formatted)),
            apply(&registry, "parse_price", Value::from(plain.as_str()))
        );
        prop_assert_eq!(
            apply(&registry, "parse_price", Value::from(plain.as_str())),
            Value::Decimal(Decimal::from_str(&plain).unwrap())
        );
    }
}

#[test]
fn test_thousands_grouping_helper() {
    assert_eq!(with_thousands("7"), "7");
    assert_eq!(with_thousands("1000"), "1,000");
    assert_eq!(with_thousands("1234567"), "1,234,567");
}

#[test]
fn test_parse_price_handles_common_layouts() {
    let registry = TransformRegistry::with_builtins();
    let expected = Value::Decimal(Decimal::from_str("1234567.89").unwrap());
    for text in ["1,234,567.89", "$1,234,567.89", "USD 1234567.89", "1234567.89 €"] {
        assert_eq!(apply(&registry, "parse_price", Value::from(text)), expected);
    }
}

#[test]
fn test_parse_price_keeps_full_precision() {
    let registry = TransformRegistry::with_builtins();
    let value = apply(&registry, "parse_price", Value::from("0.1000000000000000055511"));
    assert_eq!(
        value,
        Value::Decimal(Decimal::from_str("0.1000000000000000055511").unwrap())
    );
}

#[test]
fn test_parse_price_rejects_unparsable_text() {
    let registry = TransformRegistry::with_builtins();
    let parse_price = registry.resolve("parse_price").unwrap();
    let empty = TransformParams::new();
    for text in ["abc", "", "$", "N/A"] {
        assert!(
            parse_price.apply(Value::from(text), &empty).is_err(),
            "expected {:?} to fail",
            text
        );
    }
}

#[test]
fn test_map_category_fallbacks() {
    let registry = TransformRegistry::with_builtins();
    let map_category = registry.resolve("map_category").unwrap();

    let params = match json!({"mapping": {"TS": "Tops", "PANTS": {"slug": "bottoms"}}}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    assert_eq!(
        map_category.apply(Value::from("TS"), &params).unwrap(),
        Value::from("Tops")
    );
    assert!(matches!(
        map_category.apply(Value::from("PANTS"), &params).unwrap(),
        Value::Map(_)
    ));
    assert_eq!(
        map_category.apply(Value::from("SOCKS"), &params).unwrap(),
        Value::from("SOCKS")
    );
}

#[test]
fn test_builtins_pass_null_through() {
    let registry = TransformRegistry::with_builtins();
    let params = match json!({"mapping": {}}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    for name in registry.names() {
        let transform = registry.resolve(name).unwrap();
        assert_eq!(transform.apply(Value::Null, &params).unwrap(), Value::Null);
    }
}
