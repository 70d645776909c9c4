use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::model::{Model, ShapeId};

/// Per-service index of transitively contained resources.
///
/// Resources reach the closure through binding edges only (service to
/// resource, resource to child resource); operations are leaves. Traversal is
/// breadth-first in declaration order, so the closure order is deterministic
/// for a fixed model. A visited set keeps cyclic or repeated bindings from
/// hanging the walk or duplicating entries. Targets that are missing or not
/// resource shapes are skipped here; the bindings lint pass reports them.
#[derive(Debug, Clone, Default)]
pub struct ClosureIndex {
    contained: BTreeMap<ShapeId, Vec<ShapeId>>,
}

impl ClosureIndex {
    pub fn of(model: &Model) -> Self {
        let mut contained = BTreeMap::new();
        for service in model.services() {
            let mut closure: Vec<ShapeId> = Vec::new();
            let mut visited: HashSet<&ShapeId> = HashSet::new();
            let mut queue: VecDeque<&ShapeId> = service.resources.iter().collect();
            while let Some(id) = queue.pop_front() {
                if !visited.insert(id) {
                    continue;
                }
                let Some(resource) = model.resource(id) else {
                    continue;
                };
                closure.push(resource.id.clone());
                queue.extend(resource.resources.iter());
            }
            contained.insert(service.id.clone(), closure);
        }
        Self { contained }
    }

    /// The resource closure of one service, in traversal order. Empty for
    /// unknown service ids.
    pub fn contained_resources(&self, service: &ShapeId) -> &[ShapeId] {
        self.contained
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
