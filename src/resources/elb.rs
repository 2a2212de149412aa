//! Application load balancer declarations.

use indexmap::IndexMap;

use crate::intrinsics::Value;
use crate::resource::{CfnResource, LogicalId};

/// Listener and health-check protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    fn as_str(self) -> &'static str {
        match self {
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
        }
    }
}

/// Load balancer scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Reachable from the internet; requires public subnets
    InternetFacing,
    /// Reachable only within the VPC
    Internal,
}

impl Scheme {
    fn as_str(self) -> &'static str {
        match self {
            Scheme::InternetFacing => "internet-facing",
            Scheme::Internal => "internal",
        }
    }
}

/// An application load balancer spanning one subnet per availability zone.
#[derive(Debug, Clone)]
pub struct LoadBalancer {
    logical_id: LogicalId,
    scheme: Scheme,
    subnets: Vec<Value>,
    security_groups: Vec<Value>,
}

impl LoadBalancer {
    /// DNS name attribute, resolved by the engine.
    pub const ATTR_DNS_NAME: &'static str = "DNSName";

    pub fn new(id: impl Into<LogicalId>) -> Self {
        LoadBalancer {
            logical_id: id.into(),
            scheme: Scheme::Internal,
            subnets: Vec::new(),
            security_groups: Vec::new(),
        }
    }

    /// Exposes the load balancer to the internet.
    pub fn internet_facing(mut self) -> Self {
        self.scheme = Scheme::InternetFacing;
        self
    }

    /// Adds a subnet reference.
    pub fn with_subnet(mut self, subnet: Value) -> Self {
        self.subnets.push(subnet);
        self
    }

    /// Attaches a security group.
    pub fn with_security_group(mut self, group: Value) -> Self {
        self.security_groups.push(group);
        self
    }
}

impl CfnResource for LoadBalancer {
    const TYPE: &'static str = "AWS::ElasticLoadBalancingV2::LoadBalancer";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert("Type".to_string(), Value::from("application"));
        props.insert("Scheme".to_string(), Value::from(self.scheme.as_str()));
        props.insert("Subnets".to_string(), Value::List(self.subnets.clone()));
        if !self.security_groups.is_empty() {
            props.insert(
                "SecurityGroups".to_string(),
                Value::List(self.security_groups.clone()),
            );
        }
        props
    }
}

/// Health-check configuration on a target group.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    protocol: Protocol,
    path: String,
}

impl HealthCheck {
    pub fn new(protocol: Protocol, path: impl Into<String>) -> Self {
        HealthCheck {
            protocol,
            path: path.into(),
        }
    }
}

/// A target group routing to registered instances.
#[derive(Debug, Clone)]
pub struct TargetGroup {
    logical_id: LogicalId,
    vpc: Value,
    protocol: Protocol,
    port: i64,
    targets: Vec<Value>,
    health_check: Option<HealthCheck>,
}

impl TargetGroup {
    pub fn new(id: impl Into<LogicalId>, vpc: Value, protocol: Protocol, port: i64) -> Self {
        TargetGroup {
            logical_id: id.into(),
            vpc,
            protocol,
            port,
            targets: Vec::new(),
            health_check: None,
        }
    }

    /// Registers an instance target.
    pub fn with_instance_target(mut self, instance: Value) -> Self {
        self.targets.push(instance);
        self
    }

    /// Configures the health check.
    pub fn with_health_check(mut self, health_check: HealthCheck) -> Self {
        self.health_check = Some(health_check);
        self
    }
}

impl CfnResource for TargetGroup {
    const TYPE: &'static str = "AWS::ElasticLoadBalancingV2::TargetGroup";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert("VpcId".to_string(), self.vpc.clone());
        props.insert("TargetType".to_string(), Value::from("instance"));
        props.insert("Protocol".to_string(), Value::from(self.protocol.as_str()));
        props.insert("Port".to_string(), Value::from(self.port));
        if !self.targets.is_empty() {
            props.insert(
                "Targets".to_string(),
                Value::List(
                    self.targets
                        .iter()
                        .map(|target| {
                            let mut entry = IndexMap::new();
                            entry.insert("Id".to_string(), target.clone());
                            Value::Map(entry)
                        })
                        .collect(),
                ),
            );
        }
        if let Some(health_check) = &self.health_check {
            props.insert(
                "HealthCheckProtocol".to_string(),
                Value::from(health_check.protocol.as_str()),
            );
            props.insert(
                "HealthCheckPath".to_string(),
                Value::from(health_check.path.as_str()),
            );
        }
        props
    }
}

/// A listener forwarding traffic to a default target group.
#[derive(Debug, Clone)]
pub struct Listener {
    logical_id: LogicalId,
    load_balancer: Value,
    protocol: Protocol,
    port: i64,
    default_target_group: Value,
}

impl Listener {
    pub fn new(
        id: impl Into<LogicalId>,
        load_balancer: Value,
        protocol: Protocol,
        port: i64,
        default_target_group: Value,
    ) -> Self {
        Listener {
            logical_id: id.into(),
            load_balancer,
            protocol,
            port,
            default_target_group,
        }
    }
}

impl CfnResource for Listener {
    const TYPE: &'static str = "AWS::ElasticLoadBalancingV2::Listener";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert("LoadBalancerArn".to_string(), self.load_balancer.clone());
        props.insert("Protocol".to_string(), Value::from(self.protocol.as_str()));
        props.insert("Port".to_string(), Value::from(self.port));
        let mut action = IndexMap::new();
        action.insert("Type".to_string(), Value::from("forward"));
        action.insert(
            "TargetGroupArn".to_string(),
            self.default_target_group.clone(),
        );
        props.insert(
            "DefaultActions".to_string(),
            Value::List(vec![Value::Map(action)]),
        );
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn load_balancer_declares_scheme_and_subnets() {
        let alb = LoadBalancer::new("alb")
            .internet_facing()
            .with_subnet(Value::reference("subnet-public-1a"))
            .with_subnet(Value::reference("subnet-public-1c"))
            .with_security_group(Value::reference("alb-security-group"));
        assert_eq!(
            serde_json::to_value(alb.properties()).unwrap(),
            json!({
                "Type": "application",
                "Scheme": "internet-facing",
                "Subnets": [
                    { "Ref": "SubnetPublic1a" },
                    { "Ref": "SubnetPublic1c" },
                ],
                "SecurityGroups": [{ "Ref": "AlbSecurityGroup" }],
            })
        );
    }

    #[test]
    fn target_group_registers_instance_targets() {
        let group = TargetGroup::new("alb-target-group", Value::reference("vpc"), Protocol::Http, 80)
            .with_instance_target(Value::reference("wordpress-instance-az1"))
            .with_health_check(HealthCheck::new(Protocol::Http, "/wp-includes/images/blank.gif"));
        assert_eq!(
            serde_json::to_value(group.properties()).unwrap(),
            json!({
                "VpcId": { "Ref": "Vpc" },
                "TargetType": "instance",
                "Protocol": "HTTP",
                "Port": 80,
                "Targets": [{ "Id": { "Ref": "WordpressInstanceAz1" } }],
                "HealthCheckProtocol": "HTTP",
                "HealthCheckPath": "/wp-includes/images/blank.gif",
            })
        );
    }

    #[test]
    fn listener_forwards_to_default_target_group() {
        let listener = Listener::new(
            "alb-listener",
            Value::reference("alb"),
            Protocol::Http,
            80,
            Value::reference("alb-target-group"),
        );
        assert_eq!(
            serde_json::to_value(listener.properties()).unwrap(),
            json!({
                "LoadBalancerArn": { "Ref": "Alb" },
                "Protocol": "HTTP",
                "Port": 80,
                "DefaultActions": [{
                    "Type": "forward",
                    "TargetGroupArn": { "Ref": "AlbTargetGroup" },
                }],
            })
        );
    }
}
