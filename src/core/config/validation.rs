use super::{ConfigViolation, MappingRule, SupplierConfig, TransformSpec};
use crate::core::canonical::Destination;
use crate::core::path::FieldPath;
use crate::core::transforms::{TransformParams, TransformRegistry};
use crate::core::types::ErrorPolicy;
use crate::core::value::Value;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeSet;

pub const ROOT_NOT_OBJECT: &str = "CFG-001";
pub const PROVIDER_ID: &str = "CFG-002";
pub const ERROR_POLICY: &str = "CFG-003";
pub const MAPPINGS: &str = "CFG-004";
pub const RULE_NOT_OBJECT: &str = "CFG-005";
pub const SOURCE: &str = "CFG-006";
pub const DESTINATION: &str = "CFG-007";
pub const TRANSFORM_ENTRY: &str = "CFG-008";
pub const UNKNOWN_TRANSFORM: &str = "CFG-009";
pub const PARAMS: &str = "CFG-010";
pub const TRANSFORM_PARAMS: &str = "CFG-011";

type Bundles = Map<String, JsonValue>;

/// Single-pass validator for raw configuration documents.
///
/// Every violation in the document is collected; a configuration is only
/// built when there are none.
pub struct ConfigValidator<'r> {
    registry: &'r TransformRegistry,
}

#[derive(Default)]
struct Violations(Vec<ConfigViolation>);

impl Violations {
    fn push(&mut self, code: &str, location: impl Into<String>, message: impl Into<String>) {
        self.0.push(ConfigViolation::new(code, location, message));
    }
}

impl<'r> ConfigValidator<'r> {
    pub fn new(registry: &'r TransformRegistry) -> Self {
        Self { registry }
    }

    pub fn validate(&self, raw: &JsonValue) -> Result<SupplierConfig, Vec<ConfigViolation>> {
        let Some(root) = raw.as_object() else {
            return Err(vec![ConfigViolation::new(
                ROOT_NOT_OBJECT,
                "$",
                format!("configuration must be a JSON object, got {}", json_type(raw)),
            )]);
        };

        let mut violations = Violations::default();
        let provider_id = provider_id(root, &mut violations);
        let error_policy = error_policy(root, &mut violations);

        // Shared bundles are needed while building rules but reported last.
        let mut bundle_violations = Violations::default();
        let bundles = shared_bundles(root, &mut bundle_violations);

        let mappings = self.mappings(root, &bundles, &mut violations);
        violations.0.extend(bundle_violations.0);

        if !violations.0.is_empty() {
            return Err(violations.0);
        }

        warn_unused_bundles(&bundles, &mappings, self.registry);
        Ok(SupplierConfig::new(
            provider_id,
            error_policy,
            mappings,
            bundles,
        ))
    }

    fn mappings(
        &self,
        root: &Map<String, JsonValue>,
        bundles: &Bundles,
        violations: &mut Violations,
    ) -> Vec<MappingRule> {
        let rules = match root.get("mappings") {
            None | Some(JsonValue::Null) => {
                violations.push(MAPPINGS, "mappings", "required array of mapping rules");
                return Vec::new();
            }
            Some(JsonValue::Array(rules)) if rules.is_empty() => {
                violations.push(MAPPINGS, "mappings", "must contain at least one rule");
                return Vec::new();
            }
            Some(JsonValue::Array(rules)) => rules,
            Some(other) => {
                violations.push(
                    MAPPINGS,
                    "mappings",
                    format!("must be an array, got {}", json_type(other)),
                );
                return Vec::new();
            }
        };

        rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| self.rule(index, rule, bundles, violations))
            .collect()
    }

    fn rule(
        &self,
        index: usize,
        raw: &JsonValue,
        bundles: &Bundles,
        violations: &mut Violations,
    ) -> Option<MappingRule> {
        let location = format!("mappings[{}]", index);
        let Some(rule) = raw.as_object() else {
            violations.push(
                RULE_NOT_OBJECT,
                location,
                format!("mapping rule must be an object, got {}", json_type(raw)),
            );
            return None;
        };

        let source = match rule.get("source").and_then(JsonValue::as_str) {
            Some(text) => FieldPath::parse(text)
                .map_err(|err| violations.push(SOURCE, format!("{}.source", location), err.to_string()))
                .ok(),
            None => {
                violations.push(SOURCE, format!("{}.source", location), "required path string");
                None
            }
        };

        let destination = match rule.get("destination").and_then(JsonValue::as_str) {
            Some(text) => FieldPath::parse(text)
                .and_then(|path| Destination::compile(&path))
                .map_err(|err| {
                    violations.push(DESTINATION, format!("{}.destination", location), err.to_string())
                })
                .ok(),
            None => {
                violations.push(
                    DESTINATION,
                    format!("{}.destination", location),
                    "required path string",
                );
                None
            }
        };

        let transforms = self.transforms(&location, rule.get("transforms"), bundles, violations);

        let default = match rule.get("default") {
            None | Some(JsonValue::Null) => None,
            Some(value) => Some(Value::from_json(value)),
        };

        Some(MappingRule::new(
            index,
            source?,
            destination?,
            transforms?,
            default,
        ))
    }

    fn transforms(
        &self,
        rule_location: &str,
        raw: Option<&JsonValue>,
        bundles: &Bundles,
        violations: &mut Violations,
    ) -> Option<Vec<TransformSpec>> {
        let location = format!("{}.transforms", rule_location);
        let entries = match raw {
            None | Some(JsonValue::Null) => return Some(Vec::new()),
            Some(JsonValue::Array(entries)) => entries,
            Some(other) => {
                violations.push(
                    TRANSFORM_ENTRY,
                    location,
                    format!("must be an array, got {}", json_type(other)),
                );
                return None;
            }
        };

        let before = violations.0.len();
        let mut specs = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            let entry_location = format!("{}[{}]", location, position);
            if let Some(spec) =
                self.transform(rule_location, &entry_location, entry, bundles, violations)
            {
                specs.push(spec);
            }
        }
        (violations.0.len() == before).then_some(specs)
    }

    fn transform(
        &self,
        rule_location: &str,
        location: &str,
        raw: &JsonValue,
        bundles: &Bundles,
        violations: &mut Violations,
    ) -> Option<TransformSpec> {
        let Some(entry) = raw.as_object() else {
            violations.push(
                TRANSFORM_ENTRY,
                location,
                format!("transform must be an object, got {}", json_type(raw)),
            );
            return None;
        };

        let name = match entry.get("name").and_then(JsonValue::as_str) {
            Some(name) if !name.trim().is_empty() => {
                if self.registry.contains(name) {
                    Some(name)
                } else {
                    violations.push(
                        UNKNOWN_TRANSFORM,
                        format!("{}.name", location),
                        format!(
                            "unknown transform '{}' in mapping rule {}",
                            name, rule_location
                        ),
                    );
                    None
                }
            }
            _ => {
                violations.push(
                    TRANSFORM_ENTRY,
                    format!("{}.name", location),
                    "required non-empty string",
                );
                None
            }
        };

        let local = match entry.get("params") {
            None | Some(JsonValue::Null) => Some(TransformParams::new()),
            Some(JsonValue::Object(params)) => Some(params.clone()),
            Some(other) => {
                violations.push(
                    PARAMS,
                    format!("{}.params", location),
                    format!("must be an object, got {}", json_type(other)),
                );
                None
            }
        };

        let name = name?;
        let mut params = bundles
            .get(name)
            .and_then(JsonValue::as_object)
            .cloned()
            .unwrap_or_default();
        params.extend(local?);
        Some(TransformSpec::new(name, params))
    }
}

fn provider_id(root: &Map<String, JsonValue>, violations: &mut Violations) -> String {
    match root.get("provider_id").and_then(JsonValue::as_str) {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => {
            violations.push(PROVIDER_ID, "provider_id", "required non-empty string");
            String::new()
        }
    }
}

fn error_policy(root: &Map<String, JsonValue>, violations: &mut Violations) -> ErrorPolicy {
    match root.get("error_policy") {
        None | Some(JsonValue::Null) => ErrorPolicy::default(),
        Some(JsonValue::String(text)) => text.parse().unwrap_or_else(|message: String| {
            violations.push(ERROR_POLICY, "error_policy", message);
            ErrorPolicy::default()
        }),
        Some(other) => {
            violations.push(
                ERROR_POLICY,
                "error_policy",
                format!("must be 'continue' or 'fail', got {}", json_type(other)),
            );
            ErrorPolicy::default()
        }
    }
}

fn shared_bundles(root: &Map<String, JsonValue>, violations: &mut Violations) -> Bundles {
    let bundles = match root.get("transform_params") {
        None | Some(JsonValue::Null) => return Bundles::new(),
        Some(JsonValue::Object(bundles)) => bundles,
        Some(other) => {
            violations.push(
                TRANSFORM_PARAMS,
                "transform_params",
                format!("must be an object, got {}", json_type(other)),
            );
            return Bundles::new();
        }
    };

    let mut valid = Bundles::new();
    for (name, bundle) in bundles {
        if bundle.is_object() {
            valid.insert(name.clone(), bundle.clone());
        } else {
            violations.push(
                TRANSFORM_PARAMS,
                format!("transform_params.{}", name),
                format!("parameter bundle must be an object, got {}", json_type(bundle)),
            );
        }
    }
    valid
}

fn warn_unused_bundles(bundles: &Bundles, mappings: &[MappingRule], registry: &TransformRegistry) {
    let used: BTreeSet<&str> = mappings
        .iter()
        .flat_map(|rule| rule.transforms().iter().map(|spec| spec.name()))
        .collect();
    for name in bundles.keys() {
        if !registry.contains(name) {
            tracing::warn!(transform = %name, "transform_params entry names an unregistered transform");
        } else if !used.contains(name.as_str()) {
            tracing::warn!(transform = %name, "transform_params entry is not used by any mapping rule");
        }
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
