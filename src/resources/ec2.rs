//! EC2 networking and compute declarations.
//!
//! Builders for the network layer (VPC, subnets, internet gateway, route
//! tables) and the compute layer (security groups, instances, user data).
//!
//! ## Instance
//!
//! | Parameter | Required | Description |
//! |-----------|----------|-------------|
//! | `instance_type` | Yes | Instance type, e.g. `t3.micro` |
//! | `image_id` | Yes | AMI id |
//! | `subnet` | Yes | Subnet reference |
//! | `security_groups` | No | Security group references |
//! | `user_data` | No | Boot script, base64-deferred to the engine |
//! | `key_name` | No | SSH key pair name |
//! | `tags` | No | Additional tags |
//!
//! ## PublicSubnet
//!
//! A composite: expands into a subnet with public IPs on launch, a route
//! table, the table association, and (when wired to a gateway) a default
//! route. The route carries an explicit dependency on the gateway
//! attachment, which must complete before the route can be created.

use indexmap::IndexMap;

use crate::intrinsics::Value;
use crate::resource::{CfnResource, LogicalId, Resource};
use crate::resources::tags_value;

/// A virtual private cloud.
#[derive(Debug, Clone)]
pub struct Vpc {
    logical_id: LogicalId,
    cidr_block: String,
    enable_dns_support: bool,
    enable_dns_hostnames: bool,
    tags: IndexMap<String, String>,
}

impl Vpc {
    /// Declares a VPC with the given CIDR block. CIDR syntax is not checked
    /// here; the provisioning engine rejects malformed blocks at apply time.
    pub fn new(id: impl Into<LogicalId>, cidr_block: impl Into<String>) -> Self {
        Vpc {
            logical_id: id.into(),
            cidr_block: cidr_block.into(),
            enable_dns_support: true,
            enable_dns_hostnames: true,
            tags: IndexMap::new(),
        }
    }

    /// Adds a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

impl CfnResource for Vpc {
    const TYPE: &'static str = "AWS::EC2::VPC";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert("CidrBlock".to_string(), Value::from(self.cidr_block.as_str()));
        props.insert("EnableDnsSupport".to_string(), Value::from(self.enable_dns_support));
        props.insert(
            "EnableDnsHostnames".to_string(),
            Value::from(self.enable_dns_hostnames),
        );
        if !self.tags.is_empty() {
            props.insert("Tags".to_string(), tags_value(&self.tags));
        }
        props
    }
}

/// A subnet within a VPC.
#[derive(Debug, Clone)]
pub struct Subnet {
    logical_id: LogicalId,
    vpc: Value,
    availability_zone: Value,
    cidr_block: String,
    map_public_ip_on_launch: bool,
}

impl Subnet {
    /// Declares a private subnet; see [`PublicSubnet`] for the public form.
    pub fn new(
        id: impl Into<LogicalId>,
        vpc: Value,
        availability_zone: Value,
        cidr_block: impl Into<String>,
    ) -> Self {
        Subnet {
            logical_id: id.into(),
            vpc,
            availability_zone,
            cidr_block: cidr_block.into(),
            map_public_ip_on_launch: false,
        }
    }

    /// Assigns public IPs to instances launched here.
    pub fn with_public_ips(mut self) -> Self {
        self.map_public_ip_on_launch = true;
        self
    }
}

impl CfnResource for Subnet {
    const TYPE: &'static str = "AWS::EC2::Subnet";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert("VpcId".to_string(), self.vpc.clone());
        props.insert("AvailabilityZone".to_string(), self.availability_zone.clone());
        props.insert("CidrBlock".to_string(), Value::from(self.cidr_block.as_str()));
        props.insert(
            "MapPublicIpOnLaunch".to_string(),
            Value::from(self.map_public_ip_on_launch),
        );
        props
    }
}

/// An internet gateway. Carries no configuration; routing is wired through
/// [`VpcGatewayAttachment`] and [`Route`].
#[derive(Debug, Clone)]
pub struct InternetGateway {
    logical_id: LogicalId,
}

impl InternetGateway {
    pub fn new(id: impl Into<LogicalId>) -> Self {
        InternetGateway { logical_id: id.into() }
    }
}

impl CfnResource for InternetGateway {
    const TYPE: &'static str = "AWS::EC2::InternetGateway";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        IndexMap::new()
    }
}

/// Attaches an internet gateway to a VPC.
#[derive(Debug, Clone)]
pub struct VpcGatewayAttachment {
    logical_id: LogicalId,
    vpc: Value,
    internet_gateway: Value,
}

impl VpcGatewayAttachment {
    pub fn new(id: impl Into<LogicalId>, vpc: Value, internet_gateway: Value) -> Self {
        VpcGatewayAttachment {
            logical_id: id.into(),
            vpc,
            internet_gateway,
        }
    }
}

impl CfnResource for VpcGatewayAttachment {
    const TYPE: &'static str = "AWS::EC2::VPCGatewayAttachment";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert("VpcId".to_string(), self.vpc.clone());
        props.insert("InternetGatewayId".to_string(), self.internet_gateway.clone());
        props
    }
}

/// A route table within a VPC.
#[derive(Debug, Clone)]
pub struct RouteTable {
    logical_id: LogicalId,
    vpc: Value,
}

impl RouteTable {
    pub fn new(id: impl Into<LogicalId>, vpc: Value) -> Self {
        RouteTable {
            logical_id: id.into(),
            vpc,
        }
    }
}

impl CfnResource for RouteTable {
    const TYPE: &'static str = "AWS::EC2::RouteTable";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert("VpcId".to_string(), self.vpc.clone());
        props
    }
}

/// Associates a subnet with a route table.
#[derive(Debug, Clone)]
pub struct SubnetRouteTableAssociation {
    logical_id: LogicalId,
    subnet: Value,
    route_table: Value,
}

impl SubnetRouteTableAssociation {
    pub fn new(id: impl Into<LogicalId>, subnet: Value, route_table: Value) -> Self {
        SubnetRouteTableAssociation {
            logical_id: id.into(),
            subnet,
            route_table,
        }
    }
}

impl CfnResource for SubnetRouteTableAssociation {
    const TYPE: &'static str = "AWS::EC2::SubnetRouteTableAssociation";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert("SubnetId".to_string(), self.subnet.clone());
        props.insert("RouteTableId".to_string(), self.route_table.clone());
        props
    }
}

/// A route through a gateway.
#[derive(Debug, Clone)]
pub struct Route {
    logical_id: LogicalId,
    route_table: Value,
    destination_cidr_block: String,
    gateway: Value,
    depends_on: Vec<LogicalId>,
}

impl Route {
    pub fn new(
        id: impl Into<LogicalId>,
        route_table: Value,
        destination_cidr_block: impl Into<String>,
        gateway: Value,
    ) -> Self {
        Route {
            logical_id: id.into(),
            route_table,
            destination_cidr_block: destination_cidr_block.into(),
            gateway,
            depends_on: Vec::new(),
        }
    }

    /// Orders this route after another declaration, typically the gateway
    /// attachment. The engine cannot create a gateway route before the
    /// gateway is attached to the VPC.
    pub fn with_dependency(mut self, target: impl Into<LogicalId>) -> Self {
        self.depends_on.push(target.into());
        self
    }
}

impl CfnResource for Route {
    const TYPE: &'static str = "AWS::EC2::Route";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert("RouteTableId".to_string(), self.route_table.clone());
        props.insert(
            "DestinationCidrBlock".to_string(),
            Value::from(self.destination_cidr_block.as_str()),
        );
        props.insert("GatewayId".to_string(), self.gateway.clone());
        props
    }

    fn depends_on(&self) -> Vec<LogicalId> {
        self.depends_on.clone()
    }
}

/// A public subnet composite: subnet, route table, association, and an
/// optional default route to an internet gateway.
#[derive(Debug, Clone)]
pub struct PublicSubnet {
    subnet: Subnet,
    internet_route: Option<(Value, LogicalId)>,
}

impl PublicSubnet {
    pub fn new(
        id: impl Into<LogicalId>,
        vpc: Value,
        availability_zone: Value,
        cidr_block: impl Into<String>,
    ) -> Self {
        PublicSubnet {
            subnet: Subnet::new(id, vpc, availability_zone, cidr_block).with_public_ips(),
            internet_route: None,
        }
    }

    /// Routes `0.0.0.0/0` through the given gateway. `attachment` names the
    /// gateway attachment the route must wait for.
    pub fn with_internet_route(
        mut self,
        gateway: Value,
        attachment: impl Into<LogicalId>,
    ) -> Self {
        self.internet_route = Some((gateway, attachment.into()));
        self
    }

    /// Logical id of the subnet itself.
    pub fn logical_id(&self) -> &LogicalId {
        self.subnet.logical_id()
    }

    /// A `Ref` to the subnet.
    pub fn reference(&self) -> Value {
        self.subnet.reference()
    }

    /// Expands the composite into its declarations.
    pub fn resources(&self) -> Vec<Resource> {
        let id = self.subnet.logical_id().clone();
        // The route table lives in the same VPC as the subnet.
        let route_table = RouteTable::new(id.child("RouteTable"), self.subnet.vpc.clone());
        let association = SubnetRouteTableAssociation::new(
            id.child("RouteTableAssociation"),
            self.subnet.reference(),
            route_table.reference(),
        );

        let mut resources = vec![
            self.subnet.to_resource(),
            route_table.to_resource(),
            association.to_resource(),
        ];
        if let Some((gateway, attachment)) = &self.internet_route {
            resources.push(
                Route::new(
                    id.child("DefaultRoute"),
                    route_table.reference(),
                    "0.0.0.0/0",
                    gateway.clone(),
                )
                .with_dependency(attachment)
                .to_resource(),
            );
        }
        resources
    }
}

/// The remote peer of an ingress rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Peer {
    /// Any IPv4 address (`0.0.0.0/0`)
    AnyIpv4,
    /// A specific CIDR block
    Cidr(String),
    /// Traffic from another security group
    SecurityGroup(Value),
}

/// A single ingress rule on a security group.
#[derive(Debug, Clone, PartialEq)]
pub struct IngressRule {
    protocol: String,
    from_port: i64,
    to_port: i64,
    peer: Peer,
    description: Option<String>,
}

impl IngressRule {
    /// TCP on a single port, from any IPv4 peer unless overridden.
    pub fn tcp(port: i64) -> Self {
        IngressRule {
            protocol: "tcp".to_string(),
            from_port: port,
            to_port: port,
            peer: Peer::AnyIpv4,
            description: None,
        }
    }

    /// Restricts the peer to a CIDR block.
    pub fn from_cidr(mut self, cidr: impl Into<String>) -> Self {
        self.peer = Peer::Cidr(cidr.into());
        self
    }

    /// Restricts the peer to members of another security group.
    pub fn from_security_group(mut self, group: Value) -> Self {
        self.peer = Peer::SecurityGroup(group);
        self
    }

    /// Widens the rule to a port range.
    pub fn port_range(mut self, from: i64, to: i64) -> Self {
        self.from_port = from;
        self.to_port = to;
        self
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn to_value(&self) -> Value {
        let mut entry = IndexMap::new();
        entry.insert("IpProtocol".to_string(), Value::from(self.protocol.as_str()));
        entry.insert("FromPort".to_string(), Value::from(self.from_port));
        entry.insert("ToPort".to_string(), Value::from(self.to_port));
        match &self.peer {
            Peer::AnyIpv4 => {
                entry.insert("CidrIp".to_string(), Value::from("0.0.0.0/0"));
            }
            Peer::Cidr(cidr) => {
                entry.insert("CidrIp".to_string(), Value::from(cidr.as_str()));
            }
            Peer::SecurityGroup(group) => {
                entry.insert("SourceSecurityGroupId".to_string(), group.clone());
            }
        }
        if let Some(description) = &self.description {
            entry.insert("Description".to_string(), Value::from(description.as_str()));
        }
        Value::Map(entry)
    }
}

/// A security group with inline ingress rules. Egress defaults to the
/// engine's allow-all rule and is not declared.
#[derive(Debug, Clone)]
pub struct SecurityGroup {
    logical_id: LogicalId,
    vpc: Value,
    description: String,
    ingress: Vec<IngressRule>,
}

impl SecurityGroup {
    pub fn new(id: impl Into<LogicalId>, vpc: Value) -> Self {
        let logical_id = id.into();
        let description = logical_id.to_string();
        SecurityGroup {
            logical_id,
            vpc,
            description,
            ingress: Vec::new(),
        }
    }

    /// Replaces the generated group description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds an ingress rule.
    pub fn with_ingress(mut self, rule: IngressRule) -> Self {
        self.ingress.push(rule);
        self
    }
}

impl CfnResource for SecurityGroup {
    const TYPE: &'static str = "AWS::EC2::SecurityGroup";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert(
            "GroupDescription".to_string(),
            Value::from(self.description.as_str()),
        );
        props.insert("VpcId".to_string(), self.vpc.clone());
        if !self.ingress.is_empty() {
            props.insert(
                "SecurityGroupIngress".to_string(),
                Value::List(self.ingress.iter().map(IngressRule::to_value).collect()),
            );
        }
        props
    }
}

/// Boot-time shell script for a Linux instance.
#[derive(Debug, Clone, Default)]
pub struct UserData {
    commands: Vec<String>,
}

impl UserData {
    /// A script rendered under `#!/bin/bash`.
    pub fn for_linux() -> Self {
        UserData::default()
    }

    /// Appends commands in order.
    pub fn add_commands<I, S>(&mut self, commands: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.extend(commands.into_iter().map(Into::into));
    }

    /// Renders the script text.
    pub fn render(&self) -> String {
        let mut script = String::from("#!/bin/bash\n");
        for command in &self.commands {
            script.push_str(command);
            script.push('\n');
        }
        script
    }

    /// The script as a property value, base64-deferred to the engine.
    pub fn to_value(&self) -> Value {
        Value::base64(self.render())
    }
}

/// An EC2 instance.
#[derive(Debug, Clone)]
pub struct Instance {
    logical_id: LogicalId,
    instance_type: String,
    image_id: Value,
    subnet: Value,
    security_groups: Vec<Value>,
    user_data: Option<Value>,
    key_name: Option<String>,
    tags: IndexMap<String, String>,
}

impl Instance {
    /// Public DNS name attribute, resolved by the engine after launch.
    pub const ATTR_PUBLIC_DNS_NAME: &'static str = "PublicDnsName";

    pub fn new(
        id: impl Into<LogicalId>,
        instance_type: impl Into<String>,
        image_id: impl Into<Value>,
        subnet: Value,
    ) -> Self {
        Instance {
            logical_id: id.into(),
            instance_type: instance_type.into(),
            image_id: image_id.into(),
            subnet,
            security_groups: Vec::new(),
            user_data: None,
            key_name: None,
            tags: IndexMap::new(),
        }
    }

    /// Attaches a security group.
    pub fn with_security_group(mut self, group: Value) -> Self {
        self.security_groups.push(group);
        self
    }

    /// Sets the boot script.
    pub fn with_user_data(mut self, user_data: &UserData) -> Self {
        self.user_data = Some(user_data.to_value());
        self
    }

    /// Names the SSH key pair.
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

impl CfnResource for Instance {
    const TYPE: &'static str = "AWS::EC2::Instance";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert(
            "InstanceType".to_string(),
            Value::from(self.instance_type.as_str()),
        );
        props.insert("ImageId".to_string(), self.image_id.clone());
        props.insert("SubnetId".to_string(), self.subnet.clone());
        if !self.security_groups.is_empty() {
            props.insert(
                "SecurityGroupIds".to_string(),
                Value::List(self.security_groups.clone()),
            );
        }
        if let Some(key_name) = &self.key_name {
            props.insert("KeyName".to_string(), Value::from(key_name.as_str()));
        }
        if let Some(user_data) = &self.user_data {
            props.insert("UserData".to_string(), user_data.clone());
        }
        if !self.tags.is_empty() {
            props.insert("Tags".to_string(), tags_value(&self.tags));
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn vpc_declares_cidr_and_dns_flags() {
        let vpc = Vpc::new("vpc", "10.0.0.0/16");
        let resource = vpc.to_resource();
        assert_eq!(resource.resource_type, "AWS::EC2::VPC");
        assert_eq!(
            serde_json::to_value(&resource.properties).unwrap(),
            json!({
                "CidrBlock": "10.0.0.0/16",
                "EnableDnsSupport": true,
                "EnableDnsHostnames": true,
            })
        );
    }

    #[test]
    fn public_subnet_expands_to_four_declarations() {
        let vpc = Vpc::new("vpc", "10.0.0.0/16");
        let igw = InternetGateway::new("internet-gateway");
        let attachment =
            VpcGatewayAttachment::new("igw-attachment", vpc.reference(), igw.reference());
        let subnet = PublicSubnet::new(
            "subnet-public-1a",
            vpc.reference(),
            Value::availability_zone(0),
            "10.0.0.0/24",
        )
        .with_internet_route(igw.reference(), attachment.logical_id());

        let resources = subnet.resources();
        let ids: Vec<&str> = resources
            .iter()
            .map(|r| r.logical_id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "SubnetPublic1a",
                "SubnetPublic1aRouteTable",
                "SubnetPublic1aRouteTableAssociation",
                "SubnetPublic1aDefaultRoute",
            ]
        );

        let route = &resources[3];
        assert_eq!(route.depends_on, vec![LogicalId::new("igw-attachment")]);
        assert_eq!(
            serde_json::to_value(&route.properties).unwrap(),
            json!({
                "RouteTableId": { "Ref": "SubnetPublic1aRouteTable" },
                "DestinationCidrBlock": "0.0.0.0/0",
                "GatewayId": { "Ref": "InternetGateway" },
            })
        );
    }

    #[test]
    fn private_subnet_keeps_public_ips_off() {
        let subnet = Subnet::new(
            "subnet-private-1a",
            Value::reference("vpc"),
            Value::availability_zone(0),
            "10.0.2.0/24",
        );
        let props = subnet.properties();
        assert_eq!(props["MapPublicIpOnLaunch"], Value::Bool(false));
    }

    #[test]
    fn security_group_renders_inline_ingress() {
        let group = SecurityGroup::new("ec2-security-group", Value::reference("vpc"))
            .with_ingress(IngressRule::tcp(80));
        assert_eq!(
            serde_json::to_value(group.properties()).unwrap(),
            json!({
                "GroupDescription": "Ec2SecurityGroup",
                "VpcId": { "Ref": "Vpc" },
                "SecurityGroupIngress": [{
                    "IpProtocol": "tcp",
                    "FromPort": 80,
                    "ToPort": 80,
                    "CidrIp": "0.0.0.0/0",
                }],
            })
        );
    }

    #[test]
    fn ingress_rule_can_peer_on_a_security_group() {
        let rule = IngressRule::tcp(3306).from_security_group(Value::reference("ec2-sg"));
        assert_eq!(
            serde_json::to_value(rule.to_value()).unwrap(),
            json!({
                "IpProtocol": "tcp",
                "FromPort": 3306,
                "ToPort": 3306,
                "SourceSecurityGroupId": { "Ref": "Ec2Sg" },
            })
        );
    }

    #[test]
    fn user_data_renders_shebang_then_commands() {
        let mut user_data = UserData::for_linux();
        user_data.add_commands(["yum -y update", "systemctl start httpd.service"]);
        assert_eq!(
            user_data.render(),
            "#!/bin/bash\nyum -y update\nsystemctl start httpd.service\n"
        );
    }

    #[test]
    fn instance_defers_user_data_through_base64() {
        let mut user_data = UserData::for_linux();
        user_data.add_commands(["yum -y update"]);
        let instance = Instance::new(
            "wordpress-instance-az1",
            "t3.micro",
            "ami-0123",
            Value::reference("subnet-public-1a"),
        )
        .with_security_group(Value::reference("ec2-security-group"))
        .with_user_data(&user_data);

        let props = instance.properties();
        assert_eq!(
            serde_json::to_value(&props["UserData"]).unwrap(),
            json!({ "Fn::Base64": "#!/bin/bash\nyum -y update\n" })
        );
        let refs: Vec<String> = instance
            .to_resource()
            .references()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(refs, vec!["SubnetPublic1a", "Ec2SecurityGroup"]);
    }
}
