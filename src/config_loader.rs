use crate::config::Config;
use crate::errors::SynthesisError;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;

/// Key path reported for errors that are not tied to a nested key
const DOCUMENT_PATH: &str = ".";

/// Load and parse configuration from a YAML (or JSON) file
///
/// Only the document's shape is checked here. Semantic validation happens
/// once, when the configuration is synthesized.
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    // Open the configuration file
    let file = File::open(config_path).wrap_err_with(|| {
        format!("Failed to open configuration file '{}'", config_path.display())
    })?;

    // JSON documents are valid YAML, so one parser covers both
    let config: Config = serde_yaml::from_reader(file)
        .map_err(parse_error)
        .wrap_err_with(|| {
            format!("Failed to parse configuration file '{}'", config_path.display())
        })?;

    report_layout(&config);
    Ok(config)
}

/// Parse configuration from an in-memory document
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(content)
        .map_err(parse_error)
        .wrap_err("Failed to parse configuration")?;
    report_layout(&config);
    Ok(config)
}

/// Turn a deserialization failure into a configuration error at its key path
///
/// serde_yaml prefixes nested failures with the path of the offending key,
/// e.g. `resources.vpc.private.single_nat_gateway: invalid type: ...`.
fn parse_error(err: serde_yaml::Error) -> SynthesisError {
    let message = err.to_string();
    match message.split_once(": ") {
        Some((path, reason)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            SynthesisError::configuration(path, reason)
        }
        _ => SynthesisError::configuration(DOCUMENT_PATH, message),
    }
}

/// Log which subnet layout the document uses
fn report_layout(config: &Config) {
    let Some(vpc) = config.resources.as_ref().and_then(|r| r.vpc.as_ref()) else {
        return;
    };

    if vpc.subnets.is_some() {
        info!("Detected grouped subnet layout (resources.vpc.subnets.*)");
    } else if vpc.public.as_ref().is_some_and(|p| p.subnets.is_some()) {
        info!("Detected sectioned subnet layout (resources.vpc.public.subnets)");
    }

    let nat_requested = vpc
        .private
        .as_ref()
        .and_then(|p| p.single_nat_gateway)
        .unwrap_or(false);
    let private_declared = vpc.private.as_ref().is_some_and(|p| p.subnets.is_some())
        || vpc.subnets.as_ref().is_some_and(|g| g.private.is_some());
    if private_declared && !nat_requested {
        warn!(
            "Private subnets are configured without single_nat_gateway: true; \
              they will have no route table"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SynthesisError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_yaml_config() {
        let yaml = r#"
resources:
  vpc:
    cidr: "10.0.0.0/16"
    public:
      subnets:
        - name: PublicA
          cidr: "10.0.1.0/24"
          az: us-east-1a
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        let spec = config.network_spec().unwrap();
        assert_eq!(spec.public.unwrap().subnets[0].name, "PublicA");
    }

    #[test]
    fn test_load_json_config() {
        let json = r#"{
  "resources": {
    "vpc": {
      "cidr": "10.0.0.0/16",
      "subnets": {
        "public": [{"name": "PublicA", "cidr": "10.0.1.0/24", "az": "us-east-1a"}]
      }
    }
  }
}"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert!(config.network_spec().unwrap().public.is_some());
    }

    #[test]
    fn test_missing_key_reported_at_synthesis() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "resources:\n  vpc:\n    public: {{}}\n").unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(
            config.validate(),
            Err(SynthesisError::missing_key("resources.vpc.cidr"))
        );
    }

    #[test]
    fn test_wrong_type_reports_key_path() {
        let yaml = r#"
resources:
  vpc:
    cidr: "10.0.0.0/16"
    private:
      single_nat_gateway: "true"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        match err.downcast_ref::<SynthesisError>() {
            Some(SynthesisError::Configuration { key_path, reason }) => {
                assert_eq!(key_path, "resources.vpc.private.single_nat_gateway");
                assert!(reason.contains("expected a boolean"));
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_in_subnet_list() {
        let err = parse_config(
            "resources:\n  vpc:\n    cidr: \"10.0.0.0/16\"\n    public:\n      subnets: PublicA\n",
        )
        .unwrap_err();
        match err.downcast_ref::<SynthesisError>() {
            Some(SynthesisError::Configuration { key_path, .. }) => {
                assert_eq!(key_path, "resources.vpc.public.subnets")
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_config(Path::new("/nonexistent/vpc.yaml")).is_err());
    }

    #[test]
    fn test_parse_config() {
        assert!(parse_config("resources:\n  vpc:\n    cidr: \"10.0.0.0/16\"\n").is_ok());

        let err = parse_config("resources: [").unwrap_err();
        match err.downcast_ref::<SynthesisError>() {
            Some(SynthesisError::Configuration { key_path, .. }) => assert_eq!(key_path, "."),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }
}
