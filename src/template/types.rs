//! Template document type definitions.
//!
//! These structures mirror the provisioning engine's template layout and are
//! serialized as-is to YAML or JSON. Property names follow the engine's
//! PascalCase convention.

use serde::ser::SerializeMap;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Template format version understood by the provisioning engine
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

// ============================================================================
// Intrinsic functions
// ============================================================================

/// An intrinsic function call, rendered as a single-key mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intrinsic {
    /// `{"Ref": name}`
    Ref(String),
    /// `{"Fn::GetAtt": [name, attribute]}`
    GetAtt(String, String),
    /// `{"Fn::Sub": template}`
    Sub(String),
}

impl Serialize for Intrinsic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Intrinsic::Ref(name) => map.serialize_entry("Ref", name)?,
            Intrinsic::GetAtt(name, attribute) => {
                map.serialize_entry("Fn::GetAtt", &[name, attribute])?
            }
            Intrinsic::Sub(template) => map.serialize_entry("Fn::Sub", template)?,
        }
        map.end()
    }
}

/// A plain string or an intrinsic function producing one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StringValue {
    Plain(String),
    Intrinsic(Intrinsic),
}

// ============================================================================
// Document
// ============================================================================

/// Root of the rendered template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: &'static str,
    #[serde(rename = "Resources")]
    pub resources: IndexMap<String, TemplateResource>,
    #[serde(rename = "Outputs", skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, TemplateOutput>,
}

/// One entry of the `Resources` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateResource {
    #[serde(rename = "Type")]
    pub resource_type: &'static str,
    #[serde(rename = "DependsOn", skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,
    #[serde(rename = "Properties", skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

/// A single predecessor is written as a scalar, several as a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DependsOn {
    One(String),
    Many(Vec<String>),
}

/// One entry of the `Outputs` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateOutput {
    #[serde(rename = "Value")]
    pub value: Intrinsic,
    #[serde(rename = "Export")]
    pub export: TemplateExport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateExport {
    #[serde(rename = "Name")]
    pub name: StringValue,
}

// ============================================================================
// Resource properties
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Properties {
    Vpc(VpcProperties),
    GatewayAttachment(GatewayAttachmentProperties),
    Subnet(SubnetProperties),
    RouteTable(RouteTableProperties),
    Route(RouteProperties),
    SubnetRouteTableAssociation(SubnetRouteTableAssociationProperties),
    ElasticIp(ElasticIpProperties),
    NatGateway(NatGatewayProperties),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcProperties {
    pub cidr_block: String,
    pub enable_dns_hostnames: bool,
    pub enable_dns_support: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayAttachmentProperties {
    pub internet_gateway_id: Intrinsic,
    pub vpc_id: Intrinsic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetProperties {
    pub availability_zone: String,
    pub cidr_block: String,
    pub vpc_id: Intrinsic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTableProperties {
    pub vpc_id: Intrinsic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteProperties {
    pub destination_cidr_block: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<Intrinsic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_gateway_id: Option<Intrinsic>,
    pub route_table_id: Intrinsic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetRouteTableAssociationProperties {
    pub route_table_id: Intrinsic,
    pub subnet_id: Intrinsic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElasticIpProperties {
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NatGatewayProperties {
    pub allocation_id: Intrinsic,
    pub subnet_id: Intrinsic,
}
