//! The scalable WordPress stack.
//!
//! Network layout: one VPC with a public and a private subnet in each of the
//! region's first two availability zones. Public subnets route to an
//! internet gateway. A single web instance runs Apache, PHP, and WordPress
//! from user data; MySQL lives in RDS on the private subnets; an
//! internet-facing application load balancer fronts the instance.

use crate::error::Result;
use crate::intrinsics::Value;
use crate::resource::CfnResource;
use crate::resources::ec2::{
    IngressRule, Instance, InternetGateway, PublicSubnet, SecurityGroup, Subnet, UserData, Vpc,
    VpcGatewayAttachment,
};
use crate::resources::elb::{HealthCheck, Listener, LoadBalancer, Protocol, TargetGroup};
use crate::resources::rds::{DbInstance, DbSubnetGroup};
use crate::stack::Stack;

/// Parameters of the WordPress blueprint. Defaults reproduce the stock
/// deployment; the config layer overrides individual fields.
#[derive(Debug, Clone)]
pub struct WordPressParams {
    /// Stack name
    pub stack_name: String,
    /// VPC CIDR block
    pub vpc_cidr: String,
    /// CIDRs of the two public subnets, one per availability zone
    pub public_subnet_cidrs: [String; 2],
    /// CIDRs of the two private subnets, one per availability zone
    pub private_subnet_cidrs: [String; 2],
    /// Web instance type
    pub instance_type: String,
    /// AMI for the web instance (Amazon Linux 2)
    pub image_id: String,
    /// Database engine version
    pub db_engine_version: String,
    /// Database instance class
    pub db_instance_class: String,
    /// Initial database name
    pub db_name: String,
    /// Master username
    pub db_username: String,
    /// Master password
    pub db_password: String,
    /// HTTP port served by the instance and the load balancer
    pub web_port: i64,
    /// Health-check path on the target group
    pub health_check_path: String,
}

impl Default for WordPressParams {
    fn default() -> Self {
        WordPressParams {
            stack_name: "wordpress".to_string(),
            vpc_cidr: "10.0.0.0/16".to_string(),
            public_subnet_cidrs: ["10.0.0.0/24".to_string(), "10.0.1.0/24".to_string()],
            private_subnet_cidrs: ["10.0.2.0/24".to_string(), "10.0.3.0/24".to_string()],
            instance_type: "t3.micro".to_string(),
            image_id: "ami-0c3fd0f5d33134a76".to_string(),
            db_engine_version: "8.0.20".to_string(),
            db_instance_class: "db.t3.micro".to_string(),
            db_name: "wordpress".to_string(),
            db_username: "admin".to_string(),
            db_password: "password".to_string(),
            web_port: 80,
            health_check_path: "/wp-includes/images/blank.gif".to_string(),
        }
    }
}

/// Commands baked into the web instance's boot script.
fn wordpress_user_data() -> UserData {
    let mut user_data = UserData::for_linux();
    user_data.add_commands([
        "yum -y update",
        "amazon-linux-extras install php7.2 -y",
        "yum -y install mysql httpd php-mbstring php-xml",
        "wget http://ja.wordpress.org/latest-ja.tar.gz -P /tmp/",
        "tar zxvf /tmp/latest-ja.tar.gz -C /tmp",
        "cp -r /tmp/wordpress/* /var/www/html/",
        "chown apache:apache -R /var/www/html",
        "systemctl enable httpd.service",
        "systemctl start httpd.service",
    ]);
    user_data
}

/// Builds the WordPress stack.
pub fn build(params: &WordPressParams) -> Result<Stack> {
    let mut stack = Stack::new(&params.stack_name)
        .with_description("Scalable WordPress deployment: VPC, EC2, RDS, ALB");

    let az1 = Value::availability_zone(0);
    let az2 = Value::availability_zone(1);

    // Network
    let vpc = Vpc::new("vpc", &params.vpc_cidr);
    stack.add(&vpc)?;

    let internet_gateway = InternetGateway::new("internet-gateway");
    stack.add(&internet_gateway)?;

    let gateway_attachment = VpcGatewayAttachment::new(
        "internet-gateway-attachment",
        vpc.reference(),
        internet_gateway.reference(),
    );
    stack.add(&gateway_attachment)?;

    let public_subnet_az1 = PublicSubnet::new(
        "subnet-public-1a",
        vpc.reference(),
        az1.clone(),
        &params.public_subnet_cidrs[0],
    )
    .with_internet_route(internet_gateway.reference(), gateway_attachment.logical_id());
    stack.add_resources(public_subnet_az1.resources())?;

    let public_subnet_az2 = PublicSubnet::new(
        "subnet-public-1c",
        vpc.reference(),
        az2.clone(),
        &params.public_subnet_cidrs[1],
    )
    .with_internet_route(internet_gateway.reference(), gateway_attachment.logical_id());
    stack.add_resources(public_subnet_az2.resources())?;

    let private_subnet_az1 = Subnet::new(
        "subnet-private-1a",
        vpc.reference(),
        az1,
        &params.private_subnet_cidrs[0],
    );
    stack.add(&private_subnet_az1)?;

    let private_subnet_az2 = Subnet::new(
        "subnet-private-1c",
        vpc.reference(),
        az2,
        &params.private_subnet_cidrs[1],
    );
    stack.add(&private_subnet_az2)?;

    // Web tier
    let ec2_security_group = SecurityGroup::new("ec2-security-group", vpc.reference())
        .with_ingress(IngressRule::tcp(params.web_port));
    stack.add(&ec2_security_group)?;

    let instance = Instance::new(
        "wordpress-instance-az1",
        &params.instance_type,
        params.image_id.as_str(),
        public_subnet_az1.reference(),
    )
    .with_security_group(ec2_security_group.reference())
    .with_user_data(&wordpress_user_data());
    stack.add(&instance)?;

    stack.add_output_with_description(
        "Ec2PublicDnsName",
        "Public DNS name of the web instance",
        instance.attribute(Instance::ATTR_PUBLIC_DNS_NAME),
    );

    // Database tier
    let rds_security_group = SecurityGroup::new("rds-security-group", vpc.reference())
        .with_ingress(
            IngressRule::tcp(3306).from_security_group(ec2_security_group.reference()),
        );
    stack.add(&rds_security_group)?;

    let rds_subnet_group = DbSubnetGroup::new("rds-subnet-group", "rds-subnet-group")
        .with_subnet(private_subnet_az1.reference())
        .with_subnet(private_subnet_az2.reference());
    stack.add(&rds_subnet_group)?;

    let rds_instance = DbInstance::new(
        "rds-instance",
        "mysql",
        &params.db_instance_class,
        &params.db_username,
        &params.db_password,
    )
    .with_identifier("wordpress-rds")
    .with_engine_version(&params.db_engine_version)
    .with_db_name(&params.db_name)
    .with_multi_az(false)
    .with_subnet_group(rds_subnet_group.reference())
    .with_security_group(rds_security_group.reference());
    stack.add(&rds_instance)?;

    stack.add_output_with_description(
        "RdsEndpointAddress",
        "Database endpoint hostname",
        rds_instance.attribute(DbInstance::ATTR_ENDPOINT_ADDRESS),
    );
    stack.add_output_with_description(
        "RdsEndpointPort",
        "Database endpoint port",
        rds_instance.attribute(DbInstance::ATTR_ENDPOINT_PORT),
    );

    // Load balancer tier
    let alb_security_group = SecurityGroup::new("alb-security-group", vpc.reference())
        .with_ingress(IngressRule::tcp(params.web_port));
    stack.add(&alb_security_group)?;

    let alb = LoadBalancer::new("alb")
        .internet_facing()
        .with_subnet(public_subnet_az1.reference())
        .with_subnet(public_subnet_az2.reference())
        .with_security_group(alb_security_group.reference());
    stack.add(&alb)?;

    let target_group = TargetGroup::new(
        "alb-target-group",
        vpc.reference(),
        Protocol::Http,
        params.web_port,
    )
    .with_instance_target(instance.reference())
    .with_health_check(HealthCheck::new(Protocol::Http, &params.health_check_path));
    stack.add(&target_group)?;

    let listener = Listener::new(
        "alb-listener",
        alb.reference(),
        Protocol::Http,
        params.web_port,
        target_group.reference(),
    );
    stack.add(&listener)?;

    stack.add_output_with_description(
        "AlbDnsName",
        "DNS name of the load balancer",
        alb.attribute(LoadBalancer::ATTR_DNS_NAME),
    );

    Ok(stack)
}
