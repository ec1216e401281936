//! # Template Rendering Module
//!
//! Turns a synthesized [`ResourceGraph`] into a provisioning template
//! document and serializes it.
//!
//! ## Generated Structure
//!
//! ```yaml
//! AWSTemplateFormatVersion: '2010-09-09'
//! Resources:
//!   VPC:
//!     Type: AWS::EC2::VPC
//!     Properties:
//!       CidrBlock: 10.0.0.0/16
//!       EnableDnsHostnames: true
//!       EnableDnsSupport: true
//!   PublicInternetRoute:
//!     Type: AWS::EC2::Route
//!     DependsOn: InternetGatewayAttachment
//!     Properties:
//!       DestinationCidrBlock: 0.0.0.0/0
//!       GatewayId:
//!         Ref: InternetGateway
//!       RouteTableId:
//!         Ref: PublicRouteTable
//! Outputs:
//!   VPCID:
//!     Value:
//!       Ref: VPC
//!     Export:
//!       Name:
//!         Fn::Sub: ${AWS::StackName}-VPC-ID
//! ```
//!
//! Resources appear in the order they were added to the graph. The graph is
//! validated before rendering, so every `Ref`, `Fn::GetAtt` and `DependsOn`
//! in the output names a resource in the same template.

pub mod types;

pub use types::{
    DependsOn, Intrinsic, Properties, StringValue, Template, TemplateExport, TemplateOutput,
    TemplateResource, TEMPLATE_FORMAT_VERSION,
};

use crate::errors::SynthesisResult;
use crate::graph::ResourceGraph;
use crate::model::{ExportedOutput, Reference, Resource, ResourceKind, RouteTarget};
use clap::ValueEnum;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use types::{
    ElasticIpProperties, GatewayAttachmentProperties, NatGatewayProperties, RouteProperties,
    RouteTableProperties, SubnetProperties, SubnetRouteTableAssociationProperties, VpcProperties,
};

/// Serialization format of the rendered template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

/// Build the template document for a graph
///
/// Fails with the graph's own dependency error if any edge is unsatisfiable.
pub fn to_template(graph: &ResourceGraph) -> SynthesisResult<Template> {
    graph.validate()?;

    let resources = graph
        .resources()
        .iter()
        .map(|resource| (resource.name.clone(), render_resource(resource)))
        .collect();
    let outputs = graph
        .outputs()
        .iter()
        .map(|output| (output.name.clone(), render_output(output)))
        .collect();

    Ok(Template {
        format_version: TEMPLATE_FORMAT_VERSION,
        resources,
        outputs,
    })
}

/// Render a graph as template text
pub fn render(graph: &ResourceGraph, format: OutputFormat) -> Result<String> {
    let template = to_template(graph).wrap_err("Resource graph is not renderable")?;

    let text = match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(&template).wrap_err("Failed to serialize template to YAML")?
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&template)
                .wrap_err("Failed to serialize template to JSON")?;
            json.push('\n');
            json
        }
    };

    Ok(text)
}

fn intrinsic(reference: &Reference) -> Intrinsic {
    match reference {
        Reference::Ref(name) => Intrinsic::Ref(name.clone()),
        Reference::GetAtt {
            resource,
            attribute,
        } => Intrinsic::GetAtt(resource.clone(), attribute.clone()),
    }
}

fn render_resource(resource: &Resource) -> TemplateResource {
    let depends_on = match resource.depends_on.as_slice() {
        [] => None,
        [one] => Some(DependsOn::One(one.clone())),
        many => Some(DependsOn::Many(many.to_vec())),
    };

    let properties = match &resource.kind {
        ResourceKind::Vpc(vpc) => Some(Properties::Vpc(VpcProperties {
            cidr_block: vpc.cidr_block.clone(),
            enable_dns_hostnames: vpc.enable_dns_hostnames,
            enable_dns_support: vpc.enable_dns_support,
        })),
        ResourceKind::InternetGateway => None,
        ResourceKind::GatewayAttachment(attachment) => {
            Some(Properties::GatewayAttachment(GatewayAttachmentProperties {
                internet_gateway_id: intrinsic(&attachment.internet_gateway),
                vpc_id: intrinsic(&attachment.vpc),
            }))
        }
        ResourceKind::Subnet(subnet) => Some(Properties::Subnet(SubnetProperties {
            availability_zone: subnet.availability_zone.clone(),
            cidr_block: subnet.cidr_block.clone(),
            vpc_id: intrinsic(&subnet.vpc),
        })),
        ResourceKind::RouteTable(table) => Some(Properties::RouteTable(RouteTableProperties {
            vpc_id: intrinsic(&table.vpc),
        })),
        ResourceKind::Route(route) => {
            let (gateway_id, nat_gateway_id) = match &route.target {
                RouteTarget::Gateway(r) => (Some(intrinsic(r)), None),
                RouteTarget::NatGateway(r) => (None, Some(intrinsic(r))),
            };
            Some(Properties::Route(RouteProperties {
                destination_cidr_block: route.destination_cidr_block.clone(),
                gateway_id,
                nat_gateway_id,
                route_table_id: intrinsic(&route.route_table),
            }))
        }
        ResourceKind::SubnetRouteTableAssociation(association) => Some(
            Properties::SubnetRouteTableAssociation(SubnetRouteTableAssociationProperties {
                route_table_id: intrinsic(&association.route_table),
                subnet_id: intrinsic(&association.subnet),
            }),
        ),
        ResourceKind::ElasticIp(eip) => Some(Properties::ElasticIp(ElasticIpProperties {
            domain: eip.domain.clone(),
        })),
        ResourceKind::NatGateway(nat) => Some(Properties::NatGateway(NatGatewayProperties {
            allocation_id: intrinsic(&nat.allocation),
            subnet_id: intrinsic(&nat.subnet),
        })),
    };

    TemplateResource {
        resource_type: resource.resource_type().type_name(),
        depends_on,
        properties,
    }
}

fn render_output(output: &ExportedOutput) -> TemplateOutput {
    let name = if output.export_name.substitute {
        StringValue::Intrinsic(Intrinsic::Sub(output.export_name.value.clone()))
    } else {
        StringValue::Plain(output.export_name.value.clone())
    };

    TemplateOutput {
        value: intrinsic(&output.value),
        export: TemplateExport { name },
    }
}
