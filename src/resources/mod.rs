//! Typed resource builders.
//!
//! Each builder captures the configuration of one cloud resource kind and
//! lowers itself into a [`crate::resource::Resource`] declaration via
//! [`crate::resource::CfnResource`]. Builders never talk to the cloud: they
//! only shape declarations for the provisioning engine.
//!
//! - [`ec2`]: VPC, subnets, routing, security groups, instances, user data
//! - [`rds`]: database subnet groups and instances
//! - [`elb`]: application load balancers, target groups, listeners

pub mod ec2;
pub mod elb;
pub mod rds;

use indexmap::IndexMap;

use crate::intrinsics::Value;

/// Renders a tag map as the engine's `[{"Key": .., "Value": ..}]` list.
pub(crate) fn tags_value(tags: &IndexMap<String, String>) -> Value {
    Value::List(
        tags.iter()
            .map(|(key, value)| {
                let mut entry = IndexMap::new();
                entry.insert("Key".to_string(), Value::from(key.as_str()));
                entry.insert("Value".to_string(), Value::from(value.as_str()));
                Value::Map(entry)
            })
            .collect(),
    )
}
