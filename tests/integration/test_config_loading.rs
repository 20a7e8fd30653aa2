use feedmap::core::canonical::{Destination, Group};
use feedmap::core::config::{ConfigLoader, ConfigSource};
use feedmap::core::transforms::TransformRegistry;
use feedmap::core::types::{ErrorCategory, ErrorPolicy};
use feedmap::core::value::Value;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_fixture_config_loads() {
    let registry = TransformRegistry::with_builtins();
    let config = ConfigLoader::new(&registry)
        .load(ConfigSource::Path(fixture("acme_config.json")))
        .unwrap();

    assert_eq!(config.provider_id(), "acme");
    assert_eq!(config.error_policy(), ErrorPolicy::Continue);
    assert_eq!(config.mappings().len(), 10);

    let sku = &config.mappings()[0];
    assert_eq!(sku.source().to_string(), "Item Number");
    assert_eq!(
        sku.destination(),
        &Destination::Field {
            group: Group::Identifiers,
            name: "sku"
        }
    );

    let currency = &config.mappings()[4];
    assert_eq!(currency.default_value(), Some(&Value::from("USD")));

    let category = &config.mappings()[5].transforms()[0];
    assert_eq!(category.name(), "map_category");
    assert_eq!(category.params().get("default"), Some(&json!("Uncategorized")));
}

#[test]
fn test_loading_twice_is_idempotent() {
    let registry = TransformRegistry::with_builtins();
    let loader = ConfigLoader::new(&registry);
    let first = loader
        .load(ConfigSource::Path(fixture("acme_config.json")))
        .unwrap();
    let second = loader
        .load(ConfigSource::Path(fixture("acme_config.json")))
        .unwrap();
    assert_eq!(first, second);

    let text = fs::read_to_string(fixture("acme_config.json")).unwrap();
    let from_text = loader.load(ConfigSource::Text(text)).unwrap();
    assert_eq!(first, from_text);
}

#[test]
fn test_all_violations_reported_together() {
    let registry = TransformRegistry::with_builtins();
    let err = ConfigLoader::new(&registry)
        .load(ConfigSource::Path(fixture("broken_config.json")))
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::ConfigValidationError);
    let rendered: Vec<String> = err.violations.iter().map(ToString::to_string).collect();
    insta::assert_debug_snapshot!(rendered, @r###"
    [
        "provider_id: required non-empty string [CFG-002]",
        "error_policy: expected 'continue' or 'fail', got 'sometimes' [CFG-003]",
        "mappings[0].destination: 'nickname' is not a field of basic_info (path 'basic_info.nickname') [CFG-007]",
        "mappings[1].transforms[0].name: unknown transform 'slugify' in mapping rule mappings[1] [CFG-009]",
    ]
    "###);
}

#[test]
fn test_unknown_transform_names_the_rule() {
    let registry = TransformRegistry::with_builtins();
    let err = ConfigLoader::new(&registry)
        .load(ConfigSource::Json(json!({
            "provider_id": "acme",
            "mappings": [
                {"source": "a", "destination": "basic_info.title"},
                {"source": "b", "destination": "basic_info.brand", "transforms": [{"name": "titlecase"}]}
            ]
        })))
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::ConfigValidationError);
    assert_eq!(err.violations.len(), 1);
    assert_eq!(err.violations[0].code, "CFG-009");
    assert!(err.violations[0].location.starts_with("mappings[1]"));
    assert!(err.message.contains("titlecase"));
}

#[test]
fn test_custom_transforms_are_accepted_once_registered() {
    let raw = json!({
        "provider_id": "acme",
        "mappings": [{"source": "a", "destination": "basic_info.title", "transforms": [{"name": "titlecase"}]}]
    });

    let builtins = TransformRegistry::with_builtins();
    assert!(ConfigLoader::new(&builtins)
        .load(ConfigSource::Json(raw.clone()))
        .is_err());

    let mut builder = TransformRegistry::builder_with_builtins();
    builder.register("titlecase", |value, _| Ok(value)).unwrap();
    let extended = builder.build();
    assert!(ConfigLoader::new(&extended)
        .load(ConfigSource::Json(raw))
        .is_ok());
}

#[test]
fn test_sequence_index_limits_and_shapes() {
    let registry = TransformRegistry::with_builtins();
    let loader = ConfigLoader::new(&registry);
    let load = |destination: &str| {
        loader.load(ConfigSource::Json(json!({
            "provider_id": "acme",
            "mappings": [{"source": "x", "destination": destination}]
        })))
    };

    assert!(load("variants.1000.sku").is_ok());
    assert!(load("variants.1001.sku").is_err());
    assert!(load("variants.sku").is_err());
    assert!(load("media.0").is_err());
    assert!(load("attributes.fit.cut").is_err());
    assert!(load("variants.0.option_values.Color").is_ok());
}

#[test]
fn test_unreadable_and_malformed_files() {
    let dir = TempDir::new().unwrap();
    let registry = TransformRegistry::with_builtins();
    let loader = ConfigLoader::new(&registry);

    let missing = loader
        .load(ConfigSource::Path(dir.path().join("missing.json")))
        .unwrap_err();
    assert_eq!(missing.category, ErrorCategory::IoError);

    let malformed = dir.path().join("malformed.json");
    fs::write(&malformed, "{\"provider_id\": ").unwrap();
    let err = loader.load(ConfigSource::Path(malformed)).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConfigValidationError);
    assert_eq!(err.violations[0].code, "CFG-001");
}
