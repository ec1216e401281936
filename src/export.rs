//! Export name derivation.
//!
//! Downstream stacks import values by export name, so names must be a pure
//! function of the stack name and the exported resource's logical name.

use std::fmt;

/// Provisioning engine pseudo parameter resolving to the deployed stack's name
pub const STACK_NAME_PARAMETER: &str = "${AWS::StackName}";

/// Name of the stack the template is synthesized for
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StackName {
    /// Resolved by the provisioning engine at deploy time
    #[default]
    Deployed,
    /// Fixed at synthesis time
    Literal(String),
}

impl StackName {
    /// Literal stack name, or the deploy-time default when `None`
    pub fn from_option(name: Option<String>) -> Self {
        match name {
            Some(name) => StackName::Literal(name),
            None => StackName::Deployed,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StackName::Deployed => STACK_NAME_PARAMETER,
            StackName::Literal(name) => name,
        }
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A derived export name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportName {
    pub value: String,
    /// The value contains a pseudo parameter the engine has to substitute
    pub substitute: bool,
}

impl fmt::Display for ExportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Derive the cross-stack export name for a logical name
///
/// # Examples
/// ```
/// use vpc_synth::export::derive_export_name;
///
/// assert_eq!(derive_export_name("network-prod", "VPC"), "network-prod-VPC-ID");
/// ```
pub fn derive_export_name(stack_name: &str, logical_name: &str) -> String {
    format!("{}-{}-ID", stack_name, logical_name)
}

/// Derive the export name for `logical_name` in `stack`
pub fn register(stack: &StackName, logical_name: &str) -> ExportName {
    ExportName {
        value: derive_export_name(stack.as_str(), logical_name),
        substitute: matches!(stack, StackName::Deployed),
    }
}
