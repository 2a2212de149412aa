//! RDS database declarations.

use indexmap::IndexMap;

use crate::intrinsics::Value;
use crate::resource::{CfnResource, LogicalId};

/// A group of subnets a database instance may occupy. The engine requires
/// subnets in at least two availability zones.
#[derive(Debug, Clone)]
pub struct DbSubnetGroup {
    logical_id: LogicalId,
    description: String,
    subnets: Vec<Value>,
}

impl DbSubnetGroup {
    pub fn new(id: impl Into<LogicalId>, description: impl Into<String>) -> Self {
        DbSubnetGroup {
            logical_id: id.into(),
            description: description.into(),
            subnets: Vec::new(),
        }
    }

    /// Adds a subnet reference.
    pub fn with_subnet(mut self, subnet: Value) -> Self {
        self.subnets.push(subnet);
        self
    }
}

impl CfnResource for DbSubnetGroup {
    const TYPE: &'static str = "AWS::RDS::DBSubnetGroup";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        props.insert(
            "DBSubnetGroupDescription".to_string(),
            Value::from(self.description.as_str()),
        );
        props.insert("SubnetIds".to_string(), Value::List(self.subnets.clone()));
        props
    }
}

/// A managed database instance.
///
/// | Parameter | Required | Description |
/// |-----------|----------|-------------|
/// | `engine` | Yes | Engine name, e.g. `mysql` |
/// | `instance_class` | Yes | Instance class, e.g. `db.t3.micro` |
/// | `master_username` / `master_user_password` | Yes | Admin credentials |
/// | `engine_version` | No | Engine version pin |
/// | `db_name` | No | Initial database |
/// | `allocated_storage_gb` | No | Storage size (default 20) |
/// | `multi_az` | No | Standby replica in a second AZ (default off) |
/// | `subnet_group` / `security_groups` | No | Network placement |
#[derive(Debug, Clone)]
pub struct DbInstance {
    logical_id: LogicalId,
    db_instance_identifier: Option<String>,
    engine: String,
    engine_version: Option<String>,
    instance_class: String,
    master_username: String,
    master_user_password: String,
    db_name: Option<String>,
    allocated_storage_gb: u32,
    multi_az: bool,
    subnet_group: Option<Value>,
    security_groups: Vec<Value>,
}

impl DbInstance {
    /// Endpoint hostname attribute, resolved by the engine.
    pub const ATTR_ENDPOINT_ADDRESS: &'static str = "Endpoint.Address";
    /// Endpoint port attribute, resolved by the engine.
    pub const ATTR_ENDPOINT_PORT: &'static str = "Endpoint.Port";

    pub fn new(
        id: impl Into<LogicalId>,
        engine: impl Into<String>,
        instance_class: impl Into<String>,
        master_username: impl Into<String>,
        master_user_password: impl Into<String>,
    ) -> Self {
        DbInstance {
            logical_id: id.into(),
            db_instance_identifier: None,
            engine: engine.into(),
            engine_version: None,
            instance_class: instance_class.into(),
            master_username: master_username.into(),
            master_user_password: master_user_password.into(),
            db_name: None,
            allocated_storage_gb: 20,
            multi_az: false,
            subnet_group: None,
            security_groups: Vec::new(),
        }
    }

    /// Names the instance at the provider (distinct from the logical id).
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.db_instance_identifier = Some(identifier.into());
        self
    }

    /// Pins the engine version.
    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = Some(version.into());
        self
    }

    /// Sets the initial database name.
    pub fn with_db_name(mut self, name: impl Into<String>) -> Self {
        self.db_name = Some(name.into());
        self
    }

    /// Sets the allocated storage in gigabytes.
    pub fn with_allocated_storage_gb(mut self, gb: u32) -> Self {
        self.allocated_storage_gb = gb;
        self
    }

    /// Enables a standby replica in a second availability zone.
    pub fn with_multi_az(mut self, multi_az: bool) -> Self {
        self.multi_az = multi_az;
        self
    }

    /// Places the instance in a subnet group.
    pub fn with_subnet_group(mut self, subnet_group: Value) -> Self {
        self.subnet_group = Some(subnet_group);
        self
    }

    /// Attaches a security group.
    pub fn with_security_group(mut self, group: Value) -> Self {
        self.security_groups.push(group);
        self
    }
}

impl CfnResource for DbInstance {
    const TYPE: &'static str = "AWS::RDS::DBInstance";

    fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    fn properties(&self) -> IndexMap<String, Value> {
        let mut props = IndexMap::new();
        if let Some(identifier) = &self.db_instance_identifier {
            props.insert(
                "DBInstanceIdentifier".to_string(),
                Value::from(identifier.as_str()),
            );
        }
        props.insert("Engine".to_string(), Value::from(self.engine.as_str()));
        if let Some(version) = &self.engine_version {
            props.insert("EngineVersion".to_string(), Value::from(version.as_str()));
        }
        props.insert(
            "DBInstanceClass".to_string(),
            Value::from(self.instance_class.as_str()),
        );
        props.insert(
            "MasterUsername".to_string(),
            Value::from(self.master_username.as_str()),
        );
        props.insert(
            "MasterUserPassword".to_string(),
            Value::from(self.master_user_password.as_str()),
        );
        if let Some(name) = &self.db_name {
            props.insert("DBName".to_string(), Value::from(name.as_str()));
        }
        props.insert("MultiAZ".to_string(), Value::from(self.multi_az));
        if let Some(subnet_group) = &self.subnet_group {
            props.insert("DBSubnetGroupName".to_string(), subnet_group.clone());
        }
        if !self.security_groups.is_empty() {
            props.insert(
                "VPCSecurityGroups".to_string(),
                Value::List(self.security_groups.clone()),
            );
        }
        // The engine expects storage as a string, not a number.
        props.insert(
            "AllocatedStorage".to_string(),
            Value::String(self.allocated_storage_gb.to_string()),
        );
        props
    }
}
