//! Variant resolution.
//!
//! Decides which optional sub-topologies a configuration asks for and in what
//! order the builder has to construct them. Resolution looks only at which
//! keys are present and at explicit flags; subnet names and CIDRs never
//! influence it.
//!
//! | Variant                   | Active when                                      |
//! |---------------------------|--------------------------------------------------|
//! | internet gateway + public routing | a public subnet list is declared         |
//! | shared NAT + private routing      | `private.single_nat_gateway` is `true`   |
//! | public associations       | the public route table exists                    |
//! | private associations      | the private route table exists                   |

use crate::config::NetworkSpec;

/// Which optional sub-topologies are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Variants {
    pub internet_gateway: bool,
    pub shared_nat: bool,
    pub public_associations: bool,
    pub private_associations: bool,
}

/// One step of construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The VPC itself
    Network,
    /// Internet gateway and its attachment
    InternetGateway,
    /// Public route table and the default route through the gateway
    PublicRouting,
    /// Public subnets (and their associations, when routed)
    PublicSubnets,
    /// Elastic IP and the NAT gateway in the first public subnet
    SharedNat,
    /// Private route table and the default route through the NAT gateway
    PrivateRouting,
    /// Private subnets (and their associations, when routed)
    PrivateSubnets,
    /// Exported outputs
    Exports,
}

/// Ordered construction plan for one configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub variants: Variants,
    pub stages: Vec<Stage>,
}

impl Plan {
    pub fn includes(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}

/// Resolve the active variants for a validated configuration
pub fn resolve_variants(spec: &NetworkSpec) -> Variants {
    let internet_gateway = spec.public.is_some();
    let shared_nat = spec.single_nat_gateway;

    Variants {
        internet_gateway,
        shared_nat,
        public_associations: internet_gateway,
        private_associations: shared_nat,
    }
}

/// Resolve variants and sequence their construction
///
/// Public subnets are placed before the NAT stage because the NAT gateway is
/// anchored in one of them.
pub fn plan(spec: &NetworkSpec) -> Plan {
    let variants = resolve_variants(spec);
    let mut stages = vec![Stage::Network];

    if variants.internet_gateway {
        stages.push(Stage::InternetGateway);
        stages.push(Stage::PublicRouting);
    }
    if spec.public.is_some() {
        stages.push(Stage::PublicSubnets);
    }
    if variants.shared_nat {
        stages.push(Stage::SharedNat);
        stages.push(Stage::PrivateRouting);
    }
    if spec.private.is_some() {
        stages.push(Stage::PrivateSubnets);
    }
    stages.push(Stage::Exports);

    log::debug!("Resolved variants {:?}, stages {:?}", variants, stages);
    Plan { variants, stages }
}
