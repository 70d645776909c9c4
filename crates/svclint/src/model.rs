use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;
use svclint_contracts::SVCMODEL_SCHEMA_VERSION;

use crate::validate;

/// Trait key carrying the external (IAM-space) resource name override.
pub const IAM_RESOURCE_TRAIT: &str = "svc.iam#iamResource";

/// Absolute shape identifier of the form `namespace#Name`.
///
/// The part after `#` is the shape's structural local name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn parse(id: &str) -> Result<Self, String> {
        validate::validate_shape_id(id)?;
        Ok(Self(id.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> &str {
        self.0.split_once('#').map(|(ns, _)| ns).unwrap_or("")
    }

    /// The structural local name (the part after `#`).
    pub fn name(&self) -> &str {
        self.0.split_once('#').map(|(_, name)| name).unwrap_or("")
    }
}

impl Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ShapeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Where a shape was declared in its source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone)]
pub struct ServiceShape {
    pub id: ShapeId,
    pub version: Option<String>,
    pub resources: Vec<ShapeId>,
    pub operations: Vec<ShapeId>,
    pub source: Option<SourceLocation>,
}

#[derive(Debug, Clone)]
pub struct ResourceShape {
    pub id: ShapeId,
    pub resources: Vec<ShapeId>,
    pub operations: Vec<ShapeId>,
    /// External name override, resolved once at model construction from the
    /// `svc.iam#iamResource` trait. A present-but-empty value is kept as-is;
    /// [`ResourceShape::external_resource_name`] applies the fallback rule.
    pub external_name: Option<String>,
    pub source: Option<SourceLocation>,
}

impl ResourceShape {
    /// The externally visible resource name: the override if present and
    /// non-empty, else the structural local name.
    pub fn external_resource_name(&self) -> &str {
        match &self.external_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.id.name(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperationShape {
    pub id: ShapeId,
    pub source: Option<SourceLocation>,
}

#[derive(Debug, Clone)]
pub enum Shape {
    Service(ServiceShape),
    Resource(ResourceShape),
    Operation(OperationShape),
}

impl Shape {
    pub fn id(&self) -> &ShapeId {
        match self {
            Shape::Service(s) => &s.id,
            Shape::Resource(r) => &r.id,
            Shape::Operation(o) => &o.id,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Service(_) => "service",
            Shape::Resource(_) => "resource",
            Shape::Operation(_) => "operation",
        }
    }
}

/// A parsed service model. Immutable after [`parse_model_json`] returns.
#[derive(Debug, Clone, Default)]
pub struct Model {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Model {
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn resource(&self, id: &ShapeId) -> Option<&ResourceShape> {
        match self.shapes.get(id) {
            Some(Shape::Resource(r)) => Some(r),
            _ => None,
        }
    }

    pub fn operation(&self, id: &ShapeId) -> Option<&OperationShape> {
        match self.shapes.get(id) {
            Some(Shape::Operation(o)) => Some(o),
            _ => None,
        }
    }

    /// All shapes in deterministic (id) order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    /// All service shapes in deterministic (id) order.
    pub fn services(&self) -> impl Iterator<Item = &ServiceShape> {
        self.shapes.values().filter_map(|s| match s {
            Shape::Service(svc) => Some(svc),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ModelError {
    pub message: String,
    pub ptr: String,
}

impl std::error::Error for ModelError {}

impl Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.ptr)
    }
}

pub fn parse_model_json(bytes: &[u8]) -> Result<Model, ModelError> {
    let doc: Value = serde_json::from_slice(bytes).map_err(|e| ModelError {
        message: e.to_string(),
        ptr: "".to_string(),
    })?;
    parse_model_value(&doc)
}

fn parse_model_value(root: &Value) -> Result<Model, ModelError> {
    let root_obj = root.as_object().ok_or_else(|| ModelError {
        message: "model root must be an object".to_string(),
        ptr: "".to_string(),
    })?;

    let schema_version = get_required_string(root_obj, "/schema_version", "schema_version")?;
    if schema_version != SVCMODEL_SCHEMA_VERSION {
        return Err(ModelError {
            message: format!(
                "unsupported schema_version: got {schema_version:?} (supported: {SVCMODEL_SCHEMA_VERSION})"
            ),
            ptr: "/schema_version".to_string(),
        });
    }

    let shapes_obj = root_obj
        .get("shapes")
        .ok_or_else(|| ModelError {
            message: "missing required field: shapes".to_string(),
            ptr: "".to_string(),
        })?
        .as_object()
        .ok_or_else(|| ModelError {
            message: "shapes must be an object".to_string(),
            ptr: "/shapes".to_string(),
        })?;

    let mut shapes: BTreeMap<ShapeId, Shape> = BTreeMap::new();
    for (raw_id, shape_value) in shapes_obj {
        let ptr = format!("/shapes/{raw_id}");
        let id = ShapeId::parse(raw_id).map_err(|e| ModelError {
            message: e,
            ptr: ptr.clone(),
        })?;
        let shape = parse_shape(id.clone(), shape_value, &ptr)?;
        // BTreeMap keys are unique; a duplicate can only come from ids that
        // differ in surrounding whitespace.
        if shapes.insert(id.clone(), shape).is_some() {
            return Err(ModelError {
                message: format!("duplicate shape id: {id}"),
                ptr,
            });
        }
    }

    Ok(Model { shapes })
}

fn parse_shape(id: ShapeId, value: &Value, ptr: &str) -> Result<Shape, ModelError> {
    let obj = value.as_object().ok_or_else(|| ModelError {
        message: "shape must be an object".to_string(),
        ptr: ptr.to_string(),
    })?;

    let shape_type = get_required_string(obj, &format!("{ptr}/type"), "type")?;
    let source = parse_source(obj, ptr)?;

    match shape_type.trim() {
        "service" => {
            let version = get_optional_string(obj, &format!("{ptr}/version"), "version")?;
            let resources = parse_id_array(obj, ptr, "resources")?;
            let operations = parse_id_array(obj, ptr, "operations")?;
            Ok(Shape::Service(ServiceShape {
                id,
                version,
                resources,
                operations,
                source,
            }))
        }
        "resource" => {
            let resources = parse_id_array(obj, ptr, "resources")?;
            let operations = parse_id_array(obj, ptr, "operations")?;
            let external_name = parse_external_name(obj, ptr)?;
            Ok(Shape::Resource(ResourceShape {
                id,
                resources,
                operations,
                external_name,
                source,
            }))
        }
        "operation" => Ok(Shape::Operation(OperationShape { id, source })),
        other => Err(ModelError {
            message: format!(
                "unknown shape type {other:?} (expected service, resource, or operation)"
            ),
            ptr: format!("{ptr}/type"),
        }),
    }
}

/// Resolve the `svc.iam#iamResource` trait into a typed override field.
///
/// The trait value is an object with an optional `name` member. An absent or
/// empty `name` is preserved as parsed; the fallback to the structural name
/// happens at use time, not here.
fn parse_external_name(
    obj: &serde_json::Map<String, Value>,
    ptr: &str,
) -> Result<Option<String>, ModelError> {
    let Some(traits) = obj.get("traits") else {
        return Ok(None);
    };
    let traits_ptr = format!("{ptr}/traits");
    let traits = traits.as_object().ok_or_else(|| ModelError {
        message: "traits must be an object".to_string(),
        ptr: traits_ptr.clone(),
    })?;
    let Some(trait_value) = traits.get(IAM_RESOURCE_TRAIT) else {
        return Ok(None);
    };
    let trait_ptr = format!("{traits_ptr}/{IAM_RESOURCE_TRAIT}");
    let trait_obj = trait_value.as_object().ok_or_else(|| ModelError {
        message: format!("{IAM_RESOURCE_TRAIT} trait must be an object"),
        ptr: trait_ptr.clone(),
    })?;
    let name = get_optional_string(trait_obj, &format!("{trait_ptr}/name"), "name")?;
    if let Some(name) = &name {
        if !name.trim().is_empty() {
            validate::validate_external_name(name).map_err(|e| ModelError {
                message: e,
                ptr: format!("{trait_ptr}/name"),
            })?;
        }
    }
    Ok(name)
}

fn parse_source(
    obj: &serde_json::Map<String, Value>,
    ptr: &str,
) -> Result<Option<SourceLocation>, ModelError> {
    let Some(source) = obj.get("source") else {
        return Ok(None);
    };
    let source_ptr = format!("{ptr}/source");
    let source_obj = source.as_object().ok_or_else(|| ModelError {
        message: "source must be an object".to_string(),
        ptr: source_ptr.clone(),
    })?;
    let file = get_optional_string(source_obj, &format!("{source_ptr}/file"), "file")?;
    let line = get_required_u32(source_obj, &format!("{source_ptr}/line"), "line")?;
    let column = get_required_u32(source_obj, &format!("{source_ptr}/column"), "column")?;
    Ok(Some(SourceLocation { file, line, column }))
}

fn parse_id_array(
    obj: &serde_json::Map<String, Value>,
    ptr: &str,
    key: &str,
) -> Result<Vec<ShapeId>, ModelError> {
    let Some(v) = obj.get(key) else {
        return Ok(Vec::new());
    };
    let arr = v.as_array().ok_or_else(|| ModelError {
        message: format!("{key} must be an array"),
        ptr: format!("{ptr}/{key}"),
    })?;
    let mut out = Vec::with_capacity(arr.len());
    for (idx, item) in arr.iter().enumerate() {
        let item_ptr = format!("{ptr}/{key}/{idx}");
        let raw = item.as_str().ok_or_else(|| ModelError {
            message: format!("{key} entries must be shape id strings"),
            ptr: item_ptr.clone(),
        })?;
        let id = ShapeId::parse(raw).map_err(|e| ModelError {
            message: e,
            ptr: item_ptr,
        })?;
        out.push(id);
    }
    Ok(out)
}

fn get_required_string(
    obj: &serde_json::Map<String, Value>,
    ptr: &str,
    key: &str,
) -> Result<String, ModelError> {
    let v = obj.get(key).ok_or_else(|| ModelError {
        message: format!("missing required field: {key}"),
        ptr: ptr
            .rsplit_once('/')
            .map(|(p, _)| p)
            .unwrap_or("")
            .to_string(),
    })?;
    v.as_str().map(str::to_string).ok_or_else(|| ModelError {
        message: format!("{key} must be a string"),
        ptr: ptr.to_string(),
    })
}

fn get_optional_string(
    obj: &serde_json::Map<String, Value>,
    ptr: &str,
    key: &str,
) -> Result<Option<String>, ModelError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ModelError {
                message: format!("{key} must be a string"),
                ptr: ptr.to_string(),
            }),
    }
}

fn get_required_u32(
    obj: &serde_json::Map<String, Value>,
    ptr: &str,
    key: &str,
) -> Result<u32, ModelError> {
    let v = obj.get(key).ok_or_else(|| ModelError {
        message: format!("missing required field: {key}"),
        ptr: ptr
            .rsplit_once('/')
            .map(|(p, _)| p)
            .unwrap_or("")
            .to_string(),
    })?;
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ModelError {
            message: format!("{key} must be a non-negative integer"),
            ptr: ptr.to_string(),
        })
}
