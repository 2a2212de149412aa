//! Property values with deferred references.
//!
//! Resource properties are not plain JSON: a subnet declares its VPC by
//! logical name, an instance defers its availability zone to the target
//! region, user data is wrapped in a base64 marker the provisioning engine
//! resolves at apply time. [`Value`] models both literal values and these
//! deferred forms, and serializes to the engine's intrinsic-function JSON
//! (`{"Ref": ..}`, `{"Fn::GetAtt": [..]}`, and friends).

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::resource::LogicalId;

/// A resource property value: either a literal or a deferred reference that
/// the provisioning engine resolves during apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Literal string
    String(String),
    /// Literal integer
    Int(i64),
    /// Literal boolean
    Bool(bool),
    /// Ordered list of values
    List(Vec<Value>),
    /// Nested property map
    Map(IndexMap<String, Value>),
    /// Reference to another declaration by logical id
    Ref(LogicalId),
    /// Runtime attribute of another declaration (e.g. `PublicDnsName`)
    GetAtt(LogicalId, String),
    /// Base64 encoding applied by the engine (used for user data)
    Base64(Box<Value>),
    /// Index into a list the engine produces
    Select(u32, Box<Value>),
    /// The availability zones of the target region
    GetAzs,
    /// Delimited concatenation of values
    Join(String, Vec<Value>),
}

impl Value {
    /// Reference to a declaration by logical id.
    pub fn reference(id: impl Into<LogicalId>) -> Self {
        Value::Ref(id.into())
    }

    /// Runtime attribute of a declaration.
    pub fn get_att(id: impl Into<LogicalId>, attr: impl Into<String>) -> Self {
        Value::GetAtt(id.into(), attr.into())
    }

    /// Base64 wrapper, resolved by the engine.
    pub fn base64(inner: impl Into<Value>) -> Self {
        Value::Base64(Box::new(inner.into()))
    }

    /// The n-th availability zone of the target region.
    pub fn availability_zone(index: u32) -> Self {
        Value::Select(index, Box::new(Value::GetAzs))
    }

    /// List built from anything convertible to values.
    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Every logical id this value refers to, in encounter order.
    ///
    /// Feeds edge extraction in the resource graph: a property that mentions
    /// a logical id makes its resource depend on the referenced one.
    pub fn references(&self) -> Vec<LogicalId> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<LogicalId>) {
        match self {
            Value::Ref(id) | Value::GetAtt(id, _) => out.push(id.clone()),
            Value::List(items) | Value::Join(_, items) => {
                for item in items {
                    item.collect_references(out);
                }
            }
            Value::Map(map) => {
                for item in map.values() {
                    item.collect_references(out);
                }
            }
            Value::Base64(inner) | Value::Select(_, inner) => inner.collect_references(out),
            Value::String(_) | Value::Int(_) | Value::Bool(_) | Value::GetAzs => {}
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::List(items) => items.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            Value::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id)?;
                map.end()
            }
            Value::GetAtt(id, attr) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[id.as_str(), attr.as_str()])?;
                map.end()
            }
            Value::Base64(inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Base64", inner.as_ref())?;
                map.end()
            }
            Value::Select(index, inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Select", &(*index, inner.as_ref()))?;
                map.end()
            }
            Value::GetAzs => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAZs", "")?;
                map.end()
            }
            Value::Join(delimiter, items) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(delimiter, items))?;
                map.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u16> for Value {
    fn from(i: u16) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
