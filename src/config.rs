//! Configuration document model.
//!
//! The document is deserialized leniently: every key is optional at the serde
//! level and unknown keys are ignored. A value of the wrong type is rejected
//! while parsing, with its key path, by the
//! [`config_loader`](crate::config_loader). Missing keys and malformed strings
//! are reported with their full key path by [`Config::network_spec`].
//!
//! Public subnets may be declared in either of two places:
//!
//! ```yaml
//! resources:
//!   vpc:
//!     cidr: "10.0.0.0/16"
//!     public:
//!       subnets:
//!         - { name: PublicA, cidr: "10.0.1.0/24", az: us-east-1a }
//! ```
//!
//! or, in the grouped layout:
//!
//! ```yaml
//! resources:
//!   vpc:
//!     cidr: "10.0.0.0/16"
//!     subnets:
//!       public:
//!         - { name: PublicA, cidr: "10.0.1.0/24", az: us-east-1a }
//! ```

use crate::errors::{SynthesisError, SynthesisResult};
use crate::model::Role;
use crate::utils::ip_utils::Ipv4Cidr;
use crate::utils::validation::{validate_availability_zone, validate_cidr, validate_logical_name};
use serde::{Deserialize, Serialize};

/// Root of the configuration document
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

/// The `resources` section
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Resources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<VpcConfig>,
}

/// The `resources.vpc` section
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct VpcConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_dns_support: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_dns_hostnames: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<PublicConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<PrivateConfig>,
    /// Grouped layout: `subnets.public` / `subnets.private`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnets: Option<SubnetGroups>,
}

/// The `resources.vpc.public` section
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PublicConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnets: Option<Vec<SubnetConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_table_name: Option<String>,
}

/// The `resources.vpc.private` section
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PrivateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnets: Option<Vec<SubnetConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_nat_gateway: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_table_name: Option<String>,
}

/// The `resources.vpc.subnets` section
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SubnetGroups {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<Vec<SubnetConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<Vec<SubnetConfig>>,
}

/// One subnet entry
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SubnetConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub az: Option<String>,
}

/// Validated, normalized view of the network configuration.
///
/// Building this is the only place where the two key-path layouts are
/// reconciled; everything downstream works on this type.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSpec {
    /// CIDR block exactly as configured (trimmed)
    pub cidr_block: String,
    pub cidr: Ipv4Cidr,
    pub enable_dns_support: bool,
    pub enable_dns_hostnames: bool,
    pub public: Option<RoleSpec>,
    pub private: Option<RoleSpec>,
    pub public_route_table_name: Option<String>,
    pub private_route_table_name: Option<String>,
    /// Only an explicit `true` turns the shared NAT gateway on
    pub single_nat_gateway: bool,
}

/// Subnets declared for one role
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSpec {
    pub role: Role,
    /// Key path of the subnet list the role was read from
    pub key_path: String,
    pub subnets: Vec<SubnetSpec>,
}

impl RoleSpec {
    /// First declared subnet, if any
    pub fn first_subnet(&self) -> Option<&SubnetSpec> {
        self.subnets.first()
    }
}

/// A validated subnet entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubnetSpec {
    pub name: String,
    pub cidr_block: String,
    pub cidr: Ipv4Cidr,
    pub availability_zone: String,
    pub key_path: String,
}

const VPC_PATH: &str = "resources.vpc";

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> SynthesisResult<()> {
        self.network_spec().map(|_| ())
    }

    /// The `resources.vpc` section, or a configuration error naming the
    /// first missing key on the way there
    pub fn vpc(&self) -> SynthesisResult<&VpcConfig> {
        let resources = self
            .resources
            .as_ref()
            .ok_or_else(|| SynthesisError::missing_key("resources"))?;
        resources
            .vpc
            .as_ref()
            .ok_or_else(|| SynthesisError::missing_key(VPC_PATH))
    }

    /// Validate the document and reconcile it into a [`NetworkSpec`]
    pub fn network_spec(&self) -> SynthesisResult<NetworkSpec> {
        let vpc = self.vpc()?;

        let cidr_path = format!("{}.cidr", VPC_PATH);
        let cidr_block = vpc
            .cidr
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| SynthesisError::missing_key(cidr_path.as_str()))?;
        let cidr = validate_cidr(cidr_block, &cidr_path)?;

        let public = select_subnet_list(
            vpc.public.as_ref().and_then(|p| p.subnets.as_ref()),
            vpc.subnets.as_ref().and_then(|g| g.public.as_ref()),
            Role::Public,
        )?;
        let private = select_subnet_list(
            vpc.private.as_ref().and_then(|p| p.subnets.as_ref()),
            vpc.subnets.as_ref().and_then(|g| g.private.as_ref()),
            Role::Private,
        )?;

        let public_route_table_name = route_table_override(
            vpc.public.as_ref().and_then(|p| p.route_table_name.as_deref()),
            "public",
        )?;
        let private_route_table_name = route_table_override(
            vpc.private.as_ref().and_then(|p| p.route_table_name.as_deref()),
            "private",
        )?;

        let single_nat_gateway = vpc
            .private
            .as_ref()
            .and_then(|p| p.single_nat_gateway)
            .unwrap_or(false);

        if public.is_none() && public_route_table_name.is_some() {
            log::warn!(
                "{}.public.route_table_name is set but no public subnets are configured; ignoring it",
                VPC_PATH
            );
        }
        if !single_nat_gateway && private_route_table_name.is_some() {
            log::warn!(
                "{}.private.route_table_name is set but single_nat_gateway is not enabled; ignoring it",
                VPC_PATH
            );
        }

        Ok(NetworkSpec {
            cidr_block: cidr_block.to_string(),
            cidr,
            enable_dns_support: vpc.enable_dns_support.unwrap_or(true),
            enable_dns_hostnames: vpc.enable_dns_hostnames.unwrap_or(true),
            public,
            private,
            public_route_table_name,
            private_route_table_name,
            single_nat_gateway,
        })
    }
}

/// Pick the subnet list for a role from whichever layout declares it
fn select_subnet_list(
    sectioned: Option<&Vec<SubnetConfig>>,
    grouped: Option<&Vec<SubnetConfig>>,
    role: Role,
) -> SynthesisResult<Option<RoleSpec>> {
    let sectioned_path = format!("{}.{}.subnets", VPC_PATH, role);
    let grouped_path = format!("{}.subnets.{}", VPC_PATH, role);

    let (subnets, key_path) = match (sectioned, grouped) {
        (Some(_), Some(_)) => {
            return Err(SynthesisError::configuration(
                grouped_path,
                format!(
                    "conflicts with {}; declare {} subnets in one place only",
                    sectioned_path, role
                ),
            ));
        }
        (Some(list), None) => (list, sectioned_path),
        (None, Some(list)) => (list, grouped_path),
        (None, None) => return Ok(None),
    };

    let subnets = subnets
        .iter()
        .enumerate()
        .map(|(index, subnet)| validate_subnet(subnet, &format!("{}[{}]", key_path, index)))
        .collect::<SynthesisResult<Vec<_>>>()?;

    Ok(Some(RoleSpec {
        role,
        key_path,
        subnets,
    }))
}

fn validate_subnet(subnet: &SubnetConfig, key_path: &str) -> SynthesisResult<SubnetSpec> {
    let name_path = format!("{}.name", key_path);
    let name = subnet
        .name
        .as_deref()
        .ok_or_else(|| SynthesisError::missing_key(name_path.as_str()))?;
    validate_logical_name(name, &name_path)?;

    let cidr_path = format!("{}.cidr", key_path);
    let cidr_block = subnet
        .cidr
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| SynthesisError::missing_key(cidr_path.as_str()))?;
    let cidr = validate_cidr(cidr_block, &cidr_path)?;

    let az_path = format!("{}.az", key_path);
    let az = subnet
        .az
        .as_deref()
        .ok_or_else(|| SynthesisError::missing_key(az_path.as_str()))?;
    validate_availability_zone(az, &az_path)?;

    Ok(SubnetSpec {
        name: name.to_string(),
        cidr_block: cidr_block.to_string(),
        cidr,
        availability_zone: az.trim().to_string(),
        key_path: key_path.to_string(),
    })
}

fn route_table_override(name: Option<&str>, section: &str) -> SynthesisResult<Option<String>> {
    match name {
        Some(name) => {
            validate_logical_name(name, &format!("{}.{}.route_table_name", VPC_PATH, section))?;
            Ok(Some(name.to_string()))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Config {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_sectioned_layout() {
        let config = parse(
            r#"
resources:
  vpc:
    cidr: "10.0.0.0/16"
    public:
      subnets:
        - name: PublicA
          cidr: "10.0.1.0/24"
          az: us-east-1a
        - name: PublicB
          cidr: "10.0.2.0/24"
          az: us-east-1b
    private:
      single_nat_gateway: true
      subnets:
        - name: PrivateA
          cidr: "10.0.10.0/24"
          az: us-east-1a
"#,
        );

        let spec = config.network_spec().unwrap();
        assert_eq!(spec.cidr_block, "10.0.0.0/16");
        assert!(spec.enable_dns_support);
        assert!(spec.enable_dns_hostnames);
        assert!(spec.single_nat_gateway);

        let public = spec.public.unwrap();
        assert_eq!(public.key_path, "resources.vpc.public.subnets");
        assert_eq!(public.subnets.len(), 2);
        assert_eq!(public.first_subnet().unwrap().name, "PublicA");
        assert_eq!(public.subnets[1].key_path, "resources.vpc.public.subnets[1]");

        let private = spec.private.unwrap();
        assert_eq!(private.role, Role::Private);
        assert_eq!(private.subnets[0].availability_zone, "us-east-1a");
    }

    #[test]
    fn test_grouped_layout() {
        let config = parse(
            r#"
resources:
  vpc:
    cidr: "10.0.0.0/16"
    subnets:
      public:
        - { name: PublicA, cidr: "10.0.1.0/24", az: us-east-1a }
      private:
        - { name: PrivateA, cidr: "10.0.10.0/24", az: us-east-1a }
"#,
        );

        let spec = config.network_spec().unwrap();
        assert_eq!(spec.public.as_ref().unwrap().key_path, "resources.vpc.subnets.public");
        assert_eq!(spec.private.as_ref().unwrap().key_path, "resources.vpc.subnets.private");
        assert!(!spec.single_nat_gateway);
    }

    #[test]
    fn test_both_layouts_for_one_role_is_ambiguous() {
        let config = parse(
            r#"
resources:
  vpc:
    cidr: "10.0.0.0/16"
    public:
      subnets:
        - { name: PublicA, cidr: "10.0.1.0/24", az: us-east-1a }
    subnets:
      public:
        - { name: PublicB, cidr: "10.0.2.0/24", az: us-east-1b }
"#,
        );

        match config.network_spec() {
            Err(SynthesisError::Configuration { key_path, .. }) => {
                assert_eq!(key_path, "resources.vpc.subnets.public")
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_keys_report_their_path() {
        assert_eq!(
            Config::default().validate(),
            Err(SynthesisError::missing_key("resources"))
        );
        assert_eq!(
            parse("resources: {}").validate(),
            Err(SynthesisError::missing_key("resources.vpc"))
        );
        assert_eq!(
            parse("resources:\n  vpc:\n    public: {}\n").validate(),
            Err(SynthesisError::missing_key("resources.vpc.cidr"))
        );

        let config = parse(
            r#"
resources:
  vpc:
    cidr: "10.0.0.0/16"
    public:
      subnets:
        - { name: PublicA, cidr: "10.0.1.0/24", az: us-east-1a }
        - { name: PublicB, cidr: "10.0.2.0/24" }
"#,
        );
        assert_eq!(
            config.validate(),
            Err(SynthesisError::missing_key("resources.vpc.public.subnets[1].az"))
        );
    }

    #[test]
    fn test_malformed_values() {
        let config = parse("resources:\n  vpc:\n    cidr: \"10.0.0.0\"\n");
        assert!(matches!(
            config.validate(),
            Err(SynthesisError::Configuration { ref key_path, .. }) if key_path == "resources.vpc.cidr"
        ));

        let config = parse(
            r#"
resources:
  vpc:
    cidr: "10.0.0.0/16"
    public:
      route_table_name: "public-rt"
      subnets: []
"#,
        );
        assert!(matches!(
            config.validate(),
            Err(SynthesisError::Configuration { ref key_path, .. })
                if key_path == "resources.vpc.public.route_table_name"
        ));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = parse(
            r#"
template:
  path: vpc.py
resources:
  vpc:
    cidr: "10.0.0.0/16"
    flow_logs: enabled
    public:
      subnets:
        - { name: PublicA, cidr: "10.0.1.0/24", az: us-east-1a, map_public_ip: true }
"#,
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nat_flag_defaults_and_dns_overrides() {
        let config = parse(
            r#"
resources:
  vpc:
    cidr: "10.0.0.0/16"
    enable_dns_hostnames: false
    private:
      single_nat_gateway: false
"#,
        );
        let spec = config.network_spec().unwrap();
        assert!(!spec.single_nat_gateway);
        assert!(!spec.enable_dns_hostnames);
        assert!(spec.enable_dns_support);
        assert!(spec.public.is_none());
        assert!(spec.private.is_none());
    }
}
