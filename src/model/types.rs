//! Resource model type definitions.
//!
//! This module contains the typed representations of the network resources
//! the synthesizer emits, the references between them, and the exported
//! outputs of a stack.

use crate::export::ExportName;
use std::fmt;

// ============================================================================
// References
// ============================================================================

/// A value-carrying reference from one resource to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// The identity of another resource (`Ref`)
    Ref(String),
    /// A named attribute of another resource (`Fn::GetAtt`)
    GetAtt { resource: String, attribute: String },
}

impl Reference {
    pub fn to(name: impl Into<String>) -> Self {
        Reference::Ref(name.into())
    }

    pub fn attribute(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Reference::GetAtt {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    /// Logical name of the referenced resource
    pub fn target(&self) -> &str {
        match self {
            Reference::Ref(name) => name,
            Reference::GetAtt { resource, .. } => resource,
        }
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Which subnet group a subnet or route table serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Public,
    Private,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Public => write!(f, "public"),
            Role::Private => write!(f, "private"),
        }
    }
}

/// Discriminant of [`ResourceKind`], used for counting and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Vpc,
    InternetGateway,
    GatewayAttachment,
    Subnet,
    RouteTable,
    Route,
    SubnetRouteTableAssociation,
    ElasticIp,
    NatGateway,
}

impl ResourceType {
    /// Provisioning engine type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ResourceType::Vpc => "AWS::EC2::VPC",
            ResourceType::InternetGateway => "AWS::EC2::InternetGateway",
            ResourceType::GatewayAttachment => "AWS::EC2::VPCGatewayAttachment",
            ResourceType::Subnet => "AWS::EC2::Subnet",
            ResourceType::RouteTable => "AWS::EC2::RouteTable",
            ResourceType::Route => "AWS::EC2::Route",
            ResourceType::SubnetRouteTableAssociation => "AWS::EC2::SubnetRouteTableAssociation",
            ResourceType::ElasticIp => "AWS::EC2::EIP",
            ResourceType::NatGateway => "AWS::EC2::NatGateway",
        }
    }
}

/// The network block everything else lives in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vpc {
    pub cidr_block: String,
    pub enable_dns_support: bool,
    pub enable_dns_hostnames: bool,
}

/// Binds an internet gateway to the VPC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayAttachment {
    pub vpc: Reference,
    pub internet_gateway: Reference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub cidr_block: String,
    pub vpc: Reference,
    pub availability_zone: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub vpc: Reference,
    pub role: Role,
}

/// Where a route sends matching traffic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Gateway(Reference),
    NatGateway(Reference),
}

impl RouteTarget {
    pub fn reference(&self) -> &Reference {
        match self {
            RouteTarget::Gateway(r) | RouteTarget::NatGateway(r) => r,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub route_table: Reference,
    pub destination_cidr_block: String,
    pub target: RouteTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetRouteTableAssociation {
    pub subnet: Reference,
    pub route_table: Reference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticIp {
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatGateway {
    /// Attribute reference to the Elastic IP's allocation id
    pub allocation: Reference,
    pub subnet: Reference,
}

/// Typed payload of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    Vpc(Vpc),
    InternetGateway,
    GatewayAttachment(GatewayAttachment),
    Subnet(Subnet),
    RouteTable(RouteTable),
    Route(Route),
    SubnetRouteTableAssociation(SubnetRouteTableAssociation),
    ElasticIp(ElasticIp),
    NatGateway(NatGateway),
}

impl ResourceKind {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceKind::Vpc(_) => ResourceType::Vpc,
            ResourceKind::InternetGateway => ResourceType::InternetGateway,
            ResourceKind::GatewayAttachment(_) => ResourceType::GatewayAttachment,
            ResourceKind::Subnet(_) => ResourceType::Subnet,
            ResourceKind::RouteTable(_) => ResourceType::RouteTable,
            ResourceKind::Route(_) => ResourceType::Route,
            ResourceKind::SubnetRouteTableAssociation(_) => {
                ResourceType::SubnetRouteTableAssociation
            }
            ResourceKind::ElasticIp(_) => ResourceType::ElasticIp,
            ResourceKind::NatGateway(_) => ResourceType::NatGateway,
        }
    }

    /// Value-carrying references held by this payload
    pub fn references(&self) -> Vec<&Reference> {
        match self {
            ResourceKind::Vpc(_) | ResourceKind::InternetGateway | ResourceKind::ElasticIp(_) => {
                Vec::new()
            }
            ResourceKind::GatewayAttachment(a) => vec![&a.vpc, &a.internet_gateway],
            ResourceKind::Subnet(s) => vec![&s.vpc],
            ResourceKind::RouteTable(t) => vec![&t.vpc],
            ResourceKind::Route(r) => vec![&r.route_table, r.target.reference()],
            ResourceKind::SubnetRouteTableAssociation(a) => vec![&a.subnet, &a.route_table],
            ResourceKind::NatGateway(n) => vec![&n.allocation, &n.subnet],
        }
    }
}

/// A named resource in the graph.
///
/// `depends_on` holds ordering-only edges; value references live in `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub kind: ResourceKind,
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> Self {
        Resource {
            name: name.into(),
            kind,
            depends_on: Vec::new(),
        }
    }

    /// Declare that this resource must not be created before `predecessor`
    pub fn depends_on(mut self, predecessor: impl Into<String>) -> Self {
        self.depends_on.push(predecessor.into());
        self
    }

    pub fn resource_type(&self) -> ResourceType {
        self.kind.resource_type()
    }

    /// Every logical name this resource needs to exist first, references and
    /// ordering edges alike
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.kind
            .references()
            .into_iter()
            .map(Reference::target)
            .chain(self.depends_on.iter().map(String::as_str))
    }
}

// ============================================================================
// Outputs
// ============================================================================

/// A stack output exported for cross-stack import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedOutput {
    /// Output logical name
    pub name: String,
    pub value: Reference,
    pub export_name: ExportName,
}
