//! Resource declarations and logical identity.
//!
//! A [`Resource`] is the unit handed to the provisioning engine: a logical
//! id, an engine type string such as `AWS::EC2::VPC`, an ordered property
//! map, and any explicit dependency edges. Typed builders in
//! [`crate::resources`] implement [`CfnResource`] and lower themselves into
//! this form.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::intrinsics::Value;

/// A sanitized logical identifier for a resource declaration.
///
/// Construct ids at the API surface are free-form (`"subnet-public-1a"`);
/// the engine only accepts alphanumeric logical ids. Sanitization strips
/// every non-alphanumeric character and capitalizes the first letter of each
/// stripped segment, so `"subnet-public-1a"` becomes `SubnetPublic1a`. An id
/// with no alphanumeric characters sanitizes to the empty string, which the
/// stack rejects when the resource is added.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    /// Sanitizes a construct id into a logical id.
    pub fn new(id: impl AsRef<str>) -> Self {
        LogicalId(sanitize(id.as_ref()))
    }

    /// Derives a child id for a resource a construct expands into, e.g.
    /// `SubnetPublic1a.child("RouteTable")` is `SubnetPublic1aRouteTable`.
    pub fn child(&self, suffix: &str) -> Self {
        LogicalId(format!("{}{}", self.0, sanitize(suffix)))
    }

    /// The sanitized identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when sanitization removed every character.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogicalId {
    fn from(id: &str) -> Self {
        LogicalId::new(id)
    }
}

impl From<String> for LogicalId {
    fn from(id: String) -> Self {
        LogicalId::new(id)
    }
}

impl From<&LogicalId> for LogicalId {
    fn from(id: &LogicalId) -> Self {
        id.clone()
    }
}

/// Strips non-alphanumerics and capitalizes the letter following each
/// stripped run. Idempotent: sanitized input passes through unchanged.
fn sanitize(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut capitalize_next = true;
    for ch in id.chars() {
        if ch.is_ascii_alphanumeric() {
            if capitalize_next {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            capitalize_next = false;
        } else {
            capitalize_next = true;
        }
    }
    out
}

/// A single resource declaration: the unit submitted to the provisioning
/// engine. Immutable once added to a stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Logical id unique within the stack
    pub logical_id: LogicalId,
    /// Engine type string, e.g. `AWS::RDS::DBInstance`
    pub resource_type: String,
    /// Configuration properties in declaration order
    pub properties: IndexMap<String, Value>,
    /// Explicit dependency edges beyond those implied by references
    pub depends_on: Vec<LogicalId>,
}

impl Resource {
    /// Creates a declaration with no properties.
    pub fn new(logical_id: impl Into<LogicalId>, resource_type: impl Into<String>) -> Self {
        Resource {
            logical_id: logical_id.into(),
            resource_type: resource_type.into(),
            properties: IndexMap::new(),
            depends_on: Vec::new(),
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds an explicit dependency edge.
    pub fn with_dependency(mut self, target: impl Into<LogicalId>) -> Self {
        self.depends_on.push(target.into());
        self
    }

    /// A `Ref` to this declaration.
    pub fn reference(&self) -> Value {
        Value::Ref(self.logical_id.clone())
    }

    /// A runtime attribute of this declaration.
    pub fn attribute(&self, attr: &str) -> Value {
        Value::GetAtt(self.logical_id.clone(), attr.to_string())
    }

    /// Every logical id this declaration refers to, implicit references
    /// from property values first, then explicit `depends_on` edges.
    pub fn references(&self) -> Vec<LogicalId> {
        let mut out = Vec::new();
        for value in self.properties.values() {
            out.extend(value.references());
        }
        out.extend(self.depends_on.iter().cloned());
        out
    }
}

/// Implemented by typed resource builders that lower to a single
/// [`Resource`] declaration.
pub trait CfnResource {
    /// Engine type string for this resource kind.
    const TYPE: &'static str;

    /// Logical id of the declaration this builder produces.
    fn logical_id(&self) -> &LogicalId;

    /// Renders the configured properties.
    fn properties(&self) -> IndexMap<String, Value>;

    /// Explicit dependency edges, none by default.
    fn depends_on(&self) -> Vec<LogicalId> {
        Vec::new()
    }

    /// Lowers this builder into a declaration.
    fn to_resource(&self) -> Resource {
        Resource {
            logical_id: self.logical_id().clone(),
            resource_type: Self::TYPE.to_string(),
            properties: self.properties(),
            depends_on: self.depends_on(),
        }
    }

    /// A `Ref` to the declaration this builder produces.
    fn reference(&self) -> Value {
        Value::Ref(self.logical_id().clone())
    }

    /// A runtime attribute of the declaration this builder produces.
    fn attribute(&self, attr: &str) -> Value {
        Value::GetAtt(self.logical_id().clone(), attr.to_string())
    }
}
