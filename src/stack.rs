//! Stacks: named, ordered collections of resource declarations.
//!
//! A stack is built once, top to bottom, then handed to the synthesizer.
//! Declarations are immutable after they are added; the stack only enforces
//! logical-id uniqueness and non-emptiness at insertion time. Graph-level
//! validation (resolution, acyclicity) happens in [`crate::graph`].

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::intrinsics::Value;
use crate::resource::{CfnResource, LogicalId, Resource};

/// A named stack output, surfaced by the engine after apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    /// Optional human-readable description
    pub description: Option<String>,
    /// The output value, usually a deferred attribute
    pub value: Value,
}

/// An ordered set of resource declarations plus outputs.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    name: String,
    description: Option<String>,
    resources: IndexMap<LogicalId, Resource>,
    outputs: IndexMap<String, Output>,
}

impl Stack {
    /// Creates an empty stack.
    pub fn new(name: impl Into<String>) -> Self {
        Stack {
            name: name.into(),
            description: None,
            resources: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    /// Sets the stack description, carried into the template.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The stack name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stack description, if set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Adds a typed declaration. The builder stays usable afterwards so the
    /// caller can keep wiring references to it.
    pub fn add<R: CfnResource>(&mut self, resource: &R) -> Result<()> {
        self.add_resource(resource.to_resource())
    }

    /// Adds a lowered declaration.
    pub fn add_resource(&mut self, resource: Resource) -> Result<()> {
        if resource.logical_id.is_empty() {
            return Err(Error::InvalidLogicalId(resource.logical_id.to_string()));
        }
        if self.resources.contains_key(&resource.logical_id) {
            return Err(Error::DuplicateLogicalId(resource.logical_id.to_string()));
        }
        self.resources.insert(resource.logical_id.clone(), resource);
        Ok(())
    }

    /// Adds every declaration a composite expands into.
    pub fn add_resources(&mut self, resources: impl IntoIterator<Item = Resource>) -> Result<()> {
        for resource in resources {
            self.add_resource(resource)?;
        }
        Ok(())
    }

    /// Declares an output.
    pub fn add_output(&mut self, name: impl Into<String>, value: Value) {
        self.outputs.insert(
            name.into(),
            Output {
                description: None,
                value,
            },
        );
    }

    /// Declares an output with a description.
    pub fn add_output_with_description(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        value: Value,
    ) {
        self.outputs.insert(
            name.into(),
            Output {
                description: Some(description.into()),
                value,
            },
        );
    }

    /// Looks up a declaration by logical id.
    pub fn get(&self, id: &LogicalId) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Declarations in the order they were added.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Outputs in the order they were declared.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Output)> {
        self.outputs.iter().map(|(name, output)| (name.as_str(), output))
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True when no declarations have been added.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
