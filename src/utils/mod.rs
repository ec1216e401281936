//! Shared utilities: CIDR handling and configuration validation.

pub mod ip_utils;
pub mod validation;

pub use ip_utils::{is_valid_cidr, Ipv4Cidr};
pub use validation::{
    check_address_plan, validate_availability_zone, validate_cidr, validate_logical_name,
};
