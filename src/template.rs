//! The provisioning request: a CloudFormation template.
//!
//! [`Template`] is the serialized form of a validated stack, the one
//! artifact this tool owns end to end. Resources and outputs keep their
//! declaration order so repeated synthesis of the same stack diffs clean.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::intrinsics::Value;
use crate::resource::LogicalId;
use crate::stack::Stack;

const FORMAT_VERSION: &str = "2010-09-09";

/// A single resource entry in the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateResource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "Properties", skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Value>,
    #[serde(rename = "DependsOn", skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<LogicalId>,
}

/// A single output entry in the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateOutput {
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Value")]
    pub value: Value,
}

/// A complete provisioning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Resources")]
    pub resources: IndexMap<LogicalId, TemplateResource>,
    #[serde(rename = "Outputs", skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, TemplateOutput>,
}

impl Template {
    /// Renders a stack into template form. Performs no validation; callers
    /// go through [`crate::synth::Synthesizer`] for the validated path.
    pub fn from_stack(stack: &Stack) -> Self {
        let resources = stack
            .resources()
            .map(|resource| {
                (
                    resource.logical_id.clone(),
                    TemplateResource {
                        resource_type: resource.resource_type.clone(),
                        properties: resource.properties.clone(),
                        depends_on: resource.depends_on.clone(),
                    },
                )
            })
            .collect();
        let outputs = stack
            .outputs()
            .map(|(name, output)| {
                (
                    name.to_string(),
                    TemplateOutput {
                        description: output.description.clone(),
                        value: output.value.clone(),
                    },
                )
            })
            .collect();
        Template {
            format_version: FORMAT_VERSION.to_string(),
            description: stack.description().map(ToString::to_string),
            resources,
            outputs,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// YAML rendering.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Resource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_stack() -> Stack {
        let mut stack = Stack::new("sample").with_description("Sample stack");
        stack
            .add_resource(Resource::new("vpc", "AWS::EC2::VPC").with_property(
                "CidrBlock",
                "10.0.0.0/16",
            ))
            .unwrap();
        stack
            .add_resource(
                Resource::new("subnet", "AWS::EC2::Subnet")
                    .with_property("VpcId", Value::reference("vpc"))
                    .with_dependency("vpc"),
            )
            .unwrap();
        stack.add_output_with_description(
            "VpcId",
            "The network",
            Value::reference("vpc"),
        );
        stack
    }

    #[test]
    fn template_carries_version_resources_and_outputs() {
        let template = Template::from_stack(&sample_stack());
        assert_eq!(
            serde_json::to_value(&template).unwrap(),
            json!({
                "AWSTemplateFormatVersion": "2010-09-09",
                "Description": "Sample stack",
                "Resources": {
                    "Vpc": {
                        "Type": "AWS::EC2::VPC",
                        "Properties": { "CidrBlock": "10.0.0.0/16" },
                    },
                    "Subnet": {
                        "Type": "AWS::EC2::Subnet",
                        "Properties": { "VpcId": { "Ref": "Vpc" } },
                        "DependsOn": ["Vpc"],
                    },
                },
                "Outputs": {
                    "VpcId": {
                        "Description": "The network",
                        "Value": { "Ref": "Vpc" },
                    },
                },
            })
        );
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut stack = Stack::new("tiny");
        stack
            .add_resource(Resource::new("igw", "AWS::EC2::InternetGateway"))
            .unwrap();
        let rendered = Template::from_stack(&stack).to_json().unwrap();
        assert!(!rendered.contains("Outputs"));
        assert!(!rendered.contains("Properties"));
        assert!(!rendered.contains("DependsOn"));
        assert!(!rendered.contains("Description"));
    }

    #[test]
    fn yaml_rendering_keeps_intrinsics_as_maps() {
        let template = Template::from_stack(&sample_stack());
        let yaml = template.to_yaml().unwrap();
        assert!(yaml.contains("Ref: Vpc"));
        assert!(yaml.contains("AWSTemplateFormatVersion:"));
    }
}
