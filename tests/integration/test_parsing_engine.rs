use feedmap::core::canonical::CanonicalVariant;
use feedmap::core::config::{ConfigLoader, ConfigSource, SupplierConfig};
use feedmap::core::parser::{ParseErrorKind, ParsingEngine};
use feedmap::core::records::load_records;
use feedmap::core::transforms::TransformRegistry;
use feedmap::core::types::RunStatus;
use feedmap::core::value::Value;
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use std::path::PathBuf;
use std::str::FromStr;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(registry: &TransformRegistry, raw: JsonValue) -> SupplierConfig {
    ConfigLoader::new(registry)
        .load(ConfigSource::Json(raw))
        .unwrap()
}

fn price_config(policy: &str) -> JsonValue {
    json!({
        "provider_id": "acme",
        "error_policy": policy,
        "mappings": [
            {"source": "sku", "destination": "identifiers.sku"},
            {"source": "cost", "destination": "pricing.cost", "transforms": [{"name": "parse_price"}]},
            {"source": "title", "destination": "basic_info.title", "transforms": [{"name": "trim"}]}
        ]
    })
}

fn three_records() -> Vec<JsonValue> {
    vec![
        json!({"sku": "A-1", "cost": "$10.00", "title": " First "}),
        json!({"sku": "A-2", "cost": "call us", "title": " Second "}),
        json!({"sku": "A-3", "cost": "30", "title": " Third "}),
    ]
}

fn decimal(text: &str) -> Value {
    Value::Decimal(Decimal::from_str(text).unwrap())
}

#[test]
fn test_fail_policy_stops_at_first_error() {
    let registry = TransformRegistry::with_builtins();
    let config = load(&registry, price_config("fail"));
    let outcome = ParsingEngine::new(&config, &registry).parse(three_records());

    assert_eq!(outcome.status, RunStatus::Aborted { record_index: 1 });
    assert_eq!(outcome.report.error_count(), 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.report.records_completed(), 1);
    // Record #3 is never attempted.
    assert_eq!(outcome.report.records_attempted(), 2);
    assert_eq!(outcome.report.aborted_at(), Some(1));

    let error = &outcome.report.errors()[0];
    assert_eq!(error.record_index, 1);
    assert_eq!(error.rule_index, 1);
    assert_eq!(error.kind, ParseErrorKind::Transform);
    assert_eq!(error.transform.as_deref(), Some("parse_price"));
}

#[test]
fn test_continue_policy_keeps_every_record() {
    let registry = TransformRegistry::with_builtins();
    let config = load(&registry, price_config("continue"));
    let outcome = ParsingEngine::new(&config, &registry).parse(three_records());

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.report.error_count(), 1);
    assert_eq!(outcome.report.records_completed(), 2);
    assert_eq!(outcome.report.records_partial(), 1);

    let partial = &outcome.records[1];
    assert_eq!(partial.identifiers.sku, Some(Value::from("A-2")));
    assert_eq!(partial.pricing.cost, None);
    assert_eq!(partial.basic_info.title, Some(Value::from("Second")));

    assert_eq!(outcome.records[2].pricing.cost, Some(decimal("30")));
}

#[test]
fn test_output_preserves_input_order() {
    let registry = TransformRegistry::with_builtins();
    let config = load(&registry, price_config("continue"));
    let outcome = ParsingEngine::new(&config, &registry).parse(three_records());

    let skus: Vec<_> = outcome
        .records
        .iter()
        .map(|record| record.identifiers.sku.clone())
        .collect();
    assert_eq!(
        skus,
        vec![
            Some(Value::from("A-1")),
            Some(Value::from("A-2")),
            Some(Value::from("A-3"))
        ]
    );
}

#[test]
fn test_sequence_destination_grows_with_placeholders() {
    let registry = TransformRegistry::with_builtins();
    let config = load(
        &registry,
        json!({
            "provider_id": "acme",
            "mappings": [{"source": "price", "destination": "variants.2.price",
                          "transforms": [{"name": "parse_price"}]}]
        }),
    );
    let outcome = ParsingEngine::new(&config, &registry).parse(vec![json!({"price": "$12.50"})]);

    let variants = &outcome.records[0].variants;
    assert_eq!(variants.len(), 3);
    assert_eq!(variants[0], CanonicalVariant::default());
    assert_eq!(variants[1], CanonicalVariant::default());
    assert_eq!(variants[2].price, Some(decimal("12.50")));
}

#[test]
fn test_missing_source_is_not_an_error() {
    let registry = TransformRegistry::with_builtins();
    let config = load(
        &registry,
        json!({
            "provider_id": "acme",
            "mappings": [
                {"source": "details.brand", "destination": "basic_info.brand"},
                {"source": "sku", "destination": "identifiers.sku"}
            ]
        }),
    );
    let outcome = ParsingEngine::new(&config, &registry).parse(vec![
        json!({"sku": "A"}),
        json!({"sku": "B", "details": {"brand": null}}),
        json!({"sku": "C", "details": "flat"}),
    ]);

    assert!(outcome.report.is_empty());
    assert_eq!(outcome.report.records_completed(), 3);
    assert!(outcome
        .records
        .iter()
        .all(|record| record.basic_info.brand.is_none()));
}

#[test]
fn test_fixture_records_end_to_end() {
    let registry = TransformRegistry::with_builtins();
    let config = ConfigLoader::new(&registry)
        .load(ConfigSource::Path(fixture("acme_config.json")))
        .unwrap();
    let records = load_records(&fixture("acme_records.jsonl")).unwrap();
    assert_eq!(records.len(), 3);

    let outcome = ParsingEngine::new(&config, &registry).parse(records);
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.report.error_count(), 1);

    let tee = &outcome.records[0];
    assert_eq!(tee.identifiers.sku, Some(Value::from("TS-100")));
    assert_eq!(tee.basic_info.brand, Some(Value::from("ACME")));
    assert_eq!(tee.pricing.cost, Some(decimal("12.50")));
    assert_eq!(tee.pricing.currency, Some(Value::from("USD")));
    assert_eq!(
        tee.classification.category,
        Some(Value::from("Apparel > Tops"))
    );
    assert_eq!(
        tee.variants[0].option_values.get("Size"),
        Some(&Value::from("M"))
    );
    assert_eq!(tee.variants[0].price, Some(decimal("14.00")));
    assert_eq!(
        tee.media[0].url,
        Some(Value::from("https://cdn.example.com/ts-100.jpg"))
    );
    assert_eq!(tee.attributes.get("material"), Some(&Value::from("cotton")));

    let beanie = &outcome.records[1];
    assert_eq!(beanie.pricing.cost, None);
    assert!(beanie.variants.is_empty());

    let mystery = &outcome.records[2];
    assert_eq!(mystery.pricing.cost, Some(decimal("1299.99")));
    assert_eq!(mystery.pricing.currency, Some(Value::from("EUR")));
    assert_eq!(
        mystery.classification.category,
        Some(Value::from("Uncategorized"))
    );

    let error = &outcome.report.errors()[0];
    assert_eq!(error.provider_id, "acme");
    assert_eq!(error.record_index, 1);
    assert_eq!(error.source, "Cost");
    assert_eq!(error.destination, "pricing.cost");
}
