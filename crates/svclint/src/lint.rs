use std::collections::HashMap;

use crate::closure::ClosureIndex;
use crate::diagnostics::{Diagnostic, Report, Severity, Stage};
use crate::model::{Model, ResourceShape, ServiceShape, Shape, ShapeId};

pub const CODE_IAM_NAME_CONFLICT: &str = "SVC-IAM-NAME-0001";
pub const CODE_BIND_UNKNOWN_TARGET: &str = "SVC-BIND-0001";
pub const CODE_BIND_WRONG_TYPE: &str = "SVC-BIND-0002";

/// Lint a whole model: binding checks, then per-service external-name
/// conflict detection over each service's resource closure.
pub fn lint_model(model: &Model) -> Report {
    let mut diagnostics = lint_bindings(model);
    let index = ClosureIndex::of(model);
    for service in model.services() {
        let closure = index
            .contained_resources(&service.id)
            .iter()
            .filter_map(|id| model.resource(id));
        diagnostics.extend(detect_name_conflicts(service, closure));
    }
    Report::ok().with_diagnostics(diagnostics)
}

/// Detect external resource name conflicts within one service closure.
///
/// Pure over the given closure sequence; enumeration order decides
/// attribution. The first resource to use a name is exempt; every later
/// resource mapping to the same name gets one diagnostic citing the most
/// recent prior holder of that name (the holder entry is overwritten on every
/// encounter, so a third duplicate conflicts with the second, not the first).
pub fn detect_name_conflicts<'a>(
    service: &ServiceShape,
    closure: impl IntoIterator<Item = &'a ResourceShape>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut holders: HashMap<&str, &ResourceShape> = HashMap::new();
    for resource in closure {
        let name = resource.external_resource_name();
        if let Some(prior) = holders.get(name) {
            diagnostics.push(Diagnostic {
                code: CODE_IAM_NAME_CONFLICT.to_string(),
                severity: Severity::Error,
                stage: Stage::Lint,
                message: format!(
                    "conflicting external resource names in a service closure are not allowed: \
                     external resource name `{name}` of `{}` conflicts with resource `{}` in service `{}`",
                    resource.id, prior.id, service.id
                ),
                shape: Some(resource.id.clone()),
                loc: resource.source.clone(),
                notes: Vec::new(),
            });
        }
        holders.insert(name, resource);
    }
    diagnostics
}

/// Check that every resource/operation binding points at an existing shape of
/// the expected type.
pub fn lint_bindings(model: &Model) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for shape in model.shapes() {
        let (resources, operations) = match shape {
            Shape::Service(s) => (&s.resources, &s.operations),
            Shape::Resource(r) => (&r.resources, &r.operations),
            Shape::Operation(_) => continue,
        };
        for target in resources {
            lint_binding(model, shape, target, "resource", &mut diagnostics);
        }
        for target in operations {
            lint_binding(model, shape, target, "operation", &mut diagnostics);
        }
    }
    diagnostics
}

fn lint_binding(
    model: &Model,
    owner: &Shape,
    target: &ShapeId,
    expected: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match model.shape(target) {
        None => diagnostics.push(binding_diagnostic(
            CODE_BIND_UNKNOWN_TARGET,
            owner,
            format!(
                "{} `{}` binds unknown shape `{target}`",
                owner.type_name(),
                owner.id()
            ),
        )),
        Some(found) if found.type_name() != expected => diagnostics.push(binding_diagnostic(
            CODE_BIND_WRONG_TYPE,
            owner,
            format!(
                "{} `{}` binds `{target}` as a {expected}, but it is a {}",
                owner.type_name(),
                owner.id(),
                found.type_name()
            ),
        )),
        Some(_) => {}
    }
}

fn binding_diagnostic(code: &str, owner: &Shape, message: String) -> Diagnostic {
    let loc = match owner {
        Shape::Service(s) => s.source.clone(),
        Shape::Resource(r) => r.source.clone(),
        Shape::Operation(o) => o.source.clone(),
    };
    Diagnostic {
        code: code.to_string(),
        severity: Severity::Error,
        stage: Stage::Lint,
        message,
        shape: Some(owner.id().clone()),
        loc,
        notes: Vec::new(),
    }
}
