use serde_json::json;
use svclint::lint;
use svclint::model::{self, Model};

fn parse(doc: serde_json::Value) -> Model {
    let bytes = serde_json::to_vec(&doc).expect("serialize");
    model::parse_model_json(&bytes).expect("parse model")
}

#[test]
fn flags_unknown_binding_targets() {
    let doc = json!({
        "schema_version": "svclint.model@0.1.0",
        "shapes": {
            "ns#Svc": {"type": "service", "resources": ["ns#Missing"]}
        }
    });
    let report = lint::lint_model(&parse(doc));
    assert!(!report.ok);
    let d = report
        .diagnostics
        .iter()
        .find(|d| d.code == lint::CODE_BIND_UNKNOWN_TARGET)
        .expect("SVC-BIND-0001 diagnostic");
    assert_eq!(d.shape.as_ref().map(|s| s.as_str()), Some("ns#Svc"));
    assert!(d.message.contains("ns#Missing"));
}

#[test]
fn flags_operations_bound_as_resources() {
    let doc = json!({
        "schema_version": "svclint.model@0.1.0",
        "shapes": {
            "ns#Svc": {"type": "service", "resources": ["ns#GetThing"]},
            "ns#GetThing": {"type": "operation"}
        }
    });
    let report = lint::lint_model(&parse(doc));
    assert!(!report.ok);
    let d = report
        .diagnostics
        .iter()
        .find(|d| d.code == lint::CODE_BIND_WRONG_TYPE)
        .expect("SVC-BIND-0002 diagnostic");
    assert!(d.message.contains("ns#GetThing"));
    assert!(d.message.contains("operation"));
}

#[test]
fn flags_resources_bound_as_operations() {
    let doc = json!({
        "schema_version": "svclint.model@0.1.0",
        "shapes": {
            "ns#Svc": {"type": "service", "operations": ["ns#City"]},
            "ns#City": {"type": "resource"}
        }
    });
    let report = lint::lint_model(&parse(doc));
    assert!(
        report
            .diagnostics
            .iter()
            .any(|d| d.code == lint::CODE_BIND_WRONG_TYPE),
        "expected SVC-BIND-0002 diagnostic"
    );
}

#[test]
fn resource_bindings_are_checked_too() {
    let doc = json!({
        "schema_version": "svclint.model@0.1.0",
        "shapes": {
            "ns#Svc": {"type": "service", "resources": ["ns#Parent"]},
            "ns#Parent": {"type": "resource", "resources": ["ns#Gone"]}
        }
    });
    let report = lint::lint_model(&parse(doc));
    let d = report
        .diagnostics
        .iter()
        .find(|d| d.code == lint::CODE_BIND_UNKNOWN_TARGET)
        .expect("SVC-BIND-0001 diagnostic");
    assert_eq!(d.shape.as_ref().map(|s| s.as_str()), Some("ns#Parent"));
}

#[test]
fn well_bound_model_is_clean() {
    let doc = json!({
        "schema_version": "svclint.model@0.1.0",
        "shapes": {
            "ns#Svc": {
                "type": "service",
                "resources": ["ns#City"],
                "operations": ["ns#ListCities"]
            },
            "ns#City": {"type": "resource", "operations": ["ns#GetCity"]},
            "ns#GetCity": {"type": "operation"},
            "ns#ListCities": {"type": "operation"}
        }
    });
    let report = lint::lint_model(&parse(doc));
    assert!(report.ok, "unexpected diagnostics: {:?}", report.diagnostics);
}
