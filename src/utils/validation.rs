//! Configuration validation utilities.
//!
//! Hard failures are returned as [`SynthesisError`]s carrying the offending
//! key path. Address-plan oddities the provisioning engine may still accept
//! are only logged.

use crate::errors::{SynthesisError, SynthesisResult};
use crate::utils::ip_utils::Ipv4Cidr;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a template logical name
pub const MAX_LOGICAL_NAME_LEN: usize = 255;

static LOGICAL_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

/// Validate a logical name supplied by configuration
///
/// Template logical names must be non-empty and purely alphanumeric.
///
/// # Arguments
/// * `name` - The logical name to check
/// * `key_path` - Where the name came from, used in the error
///
/// # Examples
/// ```
/// use vpc_synth::utils::validation::validate_logical_name;
///
/// assert!(validate_logical_name("PublicSubnetA", "name").is_ok());
/// assert!(validate_logical_name("public-a", "name").is_err());
/// ```
pub fn validate_logical_name(name: &str, key_path: &str) -> SynthesisResult<()> {
    if name.is_empty() {
        return Err(SynthesisError::configuration(key_path, "logical name cannot be empty"));
    }
    if name.len() > MAX_LOGICAL_NAME_LEN {
        return Err(SynthesisError::configuration(
            key_path,
            format!("logical name exceeds {} characters", MAX_LOGICAL_NAME_LEN),
        ));
    }
    if !LOGICAL_NAME_PATTERN.is_match(name) {
        return Err(SynthesisError::configuration(
            key_path,
            format!("logical name '{}' must be alphanumeric", name),
        ));
    }
    Ok(())
}

/// Parse a CIDR block supplied by configuration
pub fn validate_cidr(cidr: &str, key_path: &str) -> SynthesisResult<Ipv4Cidr> {
    let parsed = cidr
        .parse::<Ipv4Cidr>()
        .map_err(|reason| SynthesisError::configuration(key_path, reason))?;

    if parsed.has_host_bits() {
        log::warn!(
            "CIDR block {} at '{}' has host bits set; the network address is {}",
            cidr,
            key_path,
            parsed.network()
        );
    }

    Ok(parsed)
}

/// Validate an availability zone supplied by configuration
pub fn validate_availability_zone(az: &str, key_path: &str) -> SynthesisResult<()> {
    if az.trim().is_empty() {
        return Err(SynthesisError::configuration(key_path, "availability zone cannot be empty"));
    }
    Ok(())
}

/// Warn about subnets that fall outside the VPC block or overlap each other
///
/// The provisioning engine rejects these at deploy time, but the template
/// itself is still well-formed, so synthesis carries on.
pub fn check_address_plan(vpc: &Ipv4Cidr, subnets: &[(&str, Ipv4Cidr)]) {
    for (name, cidr) in subnets {
        if !vpc.contains(cidr) {
            log::warn!("Subnet {} ({}) is not contained in VPC block {}", name, cidr, vpc);
        }
    }

    for (i, (name, cidr)) in subnets.iter().enumerate() {
        for (other_name, other_cidr) in &subnets[i + 1..] {
            if cidr.normalized() != other_cidr.normalized() && cidr.overlaps(other_cidr) {
                log::warn!(
                    "Subnet {} ({}) overlaps subnet {} ({})",
                    name,
                    cidr,
                    other_name,
                    other_cidr
                );
            }
        }
    }
}
