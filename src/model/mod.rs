//! # Resource Model
//!
//! Typed representations of the primitive network resources a stack is made
//! of, and of the three ways one resource can point at another:
//!
//! - **Direct reference** ([`Reference::Ref`]): the identity of another
//!   resource, e.g. a subnet's VPC.
//! - **Attribute reference** ([`Reference::GetAtt`]): a named attribute of
//!   another resource, e.g. the allocation id of an Elastic IP.
//! - **Ordering dependency** ([`Resource::depends_on`]): no value flows, but
//!   the predecessor must be in place first, e.g. the public route waits for
//!   the gateway attachment.
//!
//! All three are treated as dependency edges by the
//! [`ResourceGraph`](crate::graph::ResourceGraph).
//!
//! ## Resources
//!
//! ```text
//! VPC
//! |-- InternetGateway <- InternetGatewayAttachment
//! |-- Subnet (public | private) <- SubnetRouteTableAssociation
//! |-- RouteTable (public | private) <- Route
//! \-- EIP <- NatGateway (in the first public subnet)
//! ```

pub mod types;

pub use types::{
    ElasticIp, ExportedOutput, GatewayAttachment, NatGateway, Reference, Resource, ResourceKind,
    ResourceType, Role, Route, RouteTable, RouteTarget, Subnet, SubnetRouteTableAssociation, Vpc,
};
