//! Topology builder.
//!
//! Walks a validated configuration stage by stage, in the order produced by
//! [`variant::plan`](crate::variant::plan), and appends resources to a fresh
//! [`ResourceGraph`]. Every insertion is checked by the graph, so a missing
//! predecessor or a reused logical name aborts the whole run.

use crate::config::{Config, NetworkSpec, RoleSpec};
use crate::errors::{SynthesisError, SynthesisResult};
use crate::export::{self, StackName};
use crate::graph::ResourceGraph;
use crate::model::{
    ElasticIp, ExportedOutput, GatewayAttachment, NatGateway, Reference, Resource, ResourceKind,
    Role, Route, RouteTable, RouteTarget, Subnet, SubnetRouteTableAssociation, Vpc,
};
use crate::utils::validation::check_address_plan;
use crate::utils::Ipv4Cidr;
use crate::variant::{self, Stage};
use std::collections::HashMap;

pub const VPC_NAME: &str = "VPC";
pub const INTERNET_GATEWAY_NAME: &str = "InternetGateway";
pub const PUBLIC_ROUTE_TABLE_NAME: &str = "PublicRouteTable";
pub const PUBLIC_ROUTE_NAME: &str = "PublicInternetRoute";
pub const NAT_GATEWAY_NAME: &str = "PrivateNATGateway";
pub const PRIVATE_ROUTE_TABLE_NAME: &str = "PrivateNetRouteTable";
pub const PRIVATE_ROUTE_NAME: &str = "PrivateRouteTable";
pub const VPC_OUTPUT_NAME: &str = "VPCID";

/// Destination of both default routes
pub const DEFAULT_ROUTE_CIDR: &str = "0.0.0.0/0";

/// Attribute of an Elastic IP the NAT gateway is allocated from
pub const ALLOCATION_ID_ATTRIBUTE: &str = "AllocationId";

/// Attachment name for a gateway
pub fn attachment_name(gateway_name: &str) -> String {
    format!("{}Attachment", gateway_name)
}

/// Elastic IP name for a NAT gateway
pub fn elastic_ip_name(nat_gateway_name: &str) -> String {
    format!("{}EIP", nat_gateway_name)
}

/// Association name for a subnet
pub fn association_name(subnet_name: &str) -> String {
    format!("{}RouteAssociation", subnet_name)
}

/// Per-run options that do not come from the configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisOptions {
    pub stack_name: StackName,
}

/// Synthesize the resource graph for a configuration document
///
/// # Arguments
/// * `config` - The parsed configuration document
/// * `options` - Stack-level options
///
/// # Returns
/// * `Ok(ResourceGraph)` - The complete topology
/// * `Err(SynthesisError)` - The first failure; no partial graph is returned
pub fn build(config: &Config, options: &SynthesisOptions) -> SynthesisResult<ResourceGraph> {
    let spec = config.network_spec()?;
    build_from_spec(&spec, options)
}

/// Synthesize the resource graph for an already validated configuration
pub fn build_from_spec(
    spec: &NetworkSpec,
    options: &SynthesisOptions,
) -> SynthesisResult<ResourceGraph> {
    let plan = variant::plan(spec);
    log::info!(
        "Synthesizing VPC {} for stack {} ({} stages)",
        spec.cidr_block,
        options.stack_name,
        plan.stages.len()
    );

    let mut builder = TopologyBuilder::new(spec, options);
    for stage in &plan.stages {
        builder.run(*stage)?;
    }

    let graph = builder.finish();
    log::info!(
        "Synthesized {} resources and {} outputs",
        graph.len(),
        graph.outputs().len()
    );
    Ok(graph)
}

/// Stateful walk over one configuration; consumed by [`TopologyBuilder::finish`]
struct TopologyBuilder<'a> {
    spec: &'a NetworkSpec,
    options: &'a SynthesisOptions,
    graph: ResourceGraph,
    /// Normalized subnet block -> subnet name, for duplicate detection
    subnet_cidrs: HashMap<Ipv4Cidr, String>,
    public_route_table: Option<String>,
    private_route_table: Option<String>,
    gateway_attachment: Option<String>,
    nat_gateway: Option<String>,
}

impl<'a> TopologyBuilder<'a> {
    fn new(spec: &'a NetworkSpec, options: &'a SynthesisOptions) -> Self {
        TopologyBuilder {
            spec,
            options,
            graph: ResourceGraph::new(),
            subnet_cidrs: HashMap::new(),
            public_route_table: None,
            private_route_table: None,
            gateway_attachment: None,
            nat_gateway: None,
        }
    }

    fn run(&mut self, stage: Stage) -> SynthesisResult<()> {
        let spec = self.spec;
        match stage {
            Stage::Network => self.create_vpc(),
            Stage::InternetGateway => self.create_internet_gateway(),
            Stage::PublicRouting => self.create_public_routing(),
            Stage::PublicSubnets => match &spec.public {
                Some(role) => self.create_subnets(role),
                None => Ok(()),
            },
            Stage::SharedNat => self.create_shared_nat(),
            Stage::PrivateRouting => self.create_private_routing(),
            Stage::PrivateSubnets => match &spec.private {
                Some(role) => self.create_subnets(role),
                None => Ok(()),
            },
            Stage::Exports => self.create_exports(),
        }
    }

    fn finish(self) -> ResourceGraph {
        let spec = self.spec;
        let subnets: Vec<_> = spec
            .public
            .iter()
            .chain(spec.private.iter())
            .flat_map(|role| role.subnets.iter())
            .map(|s| (s.name.as_str(), s.cidr))
            .collect();
        check_address_plan(&spec.cidr, &subnets);
        self.graph
    }

    fn create_vpc(&mut self) -> SynthesisResult<()> {
        self.graph.insert(Resource::new(
            VPC_NAME,
            ResourceKind::Vpc(Vpc {
                cidr_block: self.spec.cidr_block.clone(),
                enable_dns_support: self.spec.enable_dns_support,
                enable_dns_hostnames: self.spec.enable_dns_hostnames,
            }),
        ))
    }

    fn create_internet_gateway(&mut self) -> SynthesisResult<()> {
        let attachment = attachment_name(INTERNET_GATEWAY_NAME);

        self.graph
            .insert(Resource::new(INTERNET_GATEWAY_NAME, ResourceKind::InternetGateway))?;
        self.graph.insert(Resource::new(
            attachment.as_str(),
            ResourceKind::GatewayAttachment(GatewayAttachment {
                vpc: Reference::to(VPC_NAME),
                internet_gateway: Reference::to(INTERNET_GATEWAY_NAME),
            }),
        ))?;

        self.gateway_attachment = Some(attachment);
        Ok(())
    }

    fn create_public_routing(&mut self) -> SynthesisResult<()> {
        let table = self
            .spec
            .public_route_table_name
            .clone()
            .unwrap_or_else(|| PUBLIC_ROUTE_TABLE_NAME.to_string());
        self.create_route_table(&table, Role::Public)?;

        // A route cannot target a gateway before it is attached to the VPC.
        let attachment = self
            .gateway_attachment
            .clone()
            .ok_or_else(|| SynthesisError::Dependency {
                resource: PUBLIC_ROUTE_NAME.to_string(),
                missing: attachment_name(INTERNET_GATEWAY_NAME),
            })?;

        self.graph.insert(
            Resource::new(
                PUBLIC_ROUTE_NAME,
                ResourceKind::Route(Route {
                    route_table: Reference::to(table.as_str()),
                    destination_cidr_block: DEFAULT_ROUTE_CIDR.to_string(),
                    target: RouteTarget::Gateway(Reference::to(INTERNET_GATEWAY_NAME)),
                }),
            )
            .depends_on(attachment),
        )?;

        self.public_route_table = Some(table);
        Ok(())
    }

    fn create_shared_nat(&mut self) -> SynthesisResult<()> {
        let eip = elastic_ip_name(NAT_GATEWAY_NAME);

        // One NAT gateway for every private subnet, always in the first public subnet.
        let anchor = self
            .spec
            .public
            .as_ref()
            .and_then(RoleSpec::first_subnet)
            .map(|subnet| subnet.name.clone())
            .ok_or_else(|| SynthesisError::Dependency {
                resource: NAT_GATEWAY_NAME.to_string(),
                missing: "resources.vpc.public.subnets[0]".to_string(),
            })?;

        self.graph.insert(Resource::new(
            eip.as_str(),
            ResourceKind::ElasticIp(ElasticIp {
                domain: "vpc".to_string(),
            }),
        ))?;
        self.graph.insert(Resource::new(
            NAT_GATEWAY_NAME,
            ResourceKind::NatGateway(NatGateway {
                allocation: Reference::attribute(eip.as_str(), ALLOCATION_ID_ATTRIBUTE),
                subnet: Reference::to(anchor.as_str()),
            }),
        ))?;

        log::info!("Shared NAT gateway {} placed in subnet {}", NAT_GATEWAY_NAME, anchor);
        self.nat_gateway = Some(NAT_GATEWAY_NAME.to_string());
        Ok(())
    }

    fn create_private_routing(&mut self) -> SynthesisResult<()> {
        let nat_gateway = self
            .nat_gateway
            .clone()
            .ok_or_else(|| SynthesisError::Dependency {
                resource: PRIVATE_ROUTE_NAME.to_string(),
                missing: NAT_GATEWAY_NAME.to_string(),
            })?;

        let table = self
            .spec
            .private_route_table_name
            .clone()
            .unwrap_or_else(|| PRIVATE_ROUTE_TABLE_NAME.to_string());
        self.create_route_table(&table, Role::Private)?;

        self.graph.insert(Resource::new(
            PRIVATE_ROUTE_NAME,
            ResourceKind::Route(Route {
                route_table: Reference::to(table.as_str()),
                destination_cidr_block: DEFAULT_ROUTE_CIDR.to_string(),
                target: RouteTarget::NatGateway(Reference::to(nat_gateway)),
            }),
        ))?;

        self.private_route_table = Some(table);
        Ok(())
    }

    fn create_route_table(&mut self, name: &str, role: Role) -> SynthesisResult<()> {
        self.graph.insert(Resource::new(
            name,
            ResourceKind::RouteTable(RouteTable {
                vpc: Reference::to(VPC_NAME),
                role,
            }),
        ))
    }

    fn create_subnets(&mut self, role: &RoleSpec) -> SynthesisResult<()> {
        let route_table = match role.role {
            Role::Public => self.public_route_table.clone(),
            Role::Private => self.private_route_table.clone(),
        };

        if route_table.is_none() && !role.subnets.is_empty() {
            log::info!(
                "{} {} subnet(s) have no route table and stay unrouted",
                role.subnets.len(),
                role.role
            );
        }

        for subnet in &role.subnets {
            let block = subnet.cidr.normalized();
            if let Some(existing) = self.subnet_cidrs.get(&block) {
                return Err(SynthesisError::CidrConflict {
                    name: subnet.name.clone(),
                    cidr: subnet.cidr_block.clone(),
                    existing: existing.clone(),
                });
            }

            self.graph.insert(Resource::new(
                subnet.name.as_str(),
                ResourceKind::Subnet(Subnet {
                    cidr_block: subnet.cidr_block.clone(),
                    vpc: Reference::to(VPC_NAME),
                    availability_zone: subnet.availability_zone.clone(),
                    role: role.role,
                }),
            ))?;
            self.subnet_cidrs.insert(block, subnet.name.clone());

            if let Some(table) = &route_table {
                self.graph.insert(Resource::new(
                    association_name(&subnet.name),
                    ResourceKind::SubnetRouteTableAssociation(SubnetRouteTableAssociation {
                        subnet: Reference::to(subnet.name.as_str()),
                        route_table: Reference::to(table.as_str()),
                    }),
                ))?;
            }
        }

        Ok(())
    }

    fn create_exports(&mut self) -> SynthesisResult<()> {
        self.graph.insert_output(ExportedOutput {
            name: VPC_OUTPUT_NAME.to_string(),
            value: Reference::to(VPC_NAME),
            export_name: export::register(&self.options.stack_name, VPC_NAME),
        })
    }
}
