#[cfg(test)]
mod config_files_tests {
    use std::path::PathBuf;
    use tempfile::TempDir;
    use vpc_synth::builder::SynthesisOptions;
    use vpc_synth::model::ResourceType;
    use vpc_synth::orchestrator::{output_path_for, synthesize_file, synthesize_stacks, StackJob};
    use vpc_synth::template::OutputFormat;

    fn config_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
    }

    #[test]
    fn test_bundled_configs_synthesize() {
        let expected = [
            ("public-only.yaml", 2, 0),
            ("shared-nat.yaml", 4, 1),
            ("grouped-subnets.yaml", 2, 0),
        ];

        for (name, subnets, nat_gateways) in expected {
            let (graph, text) = synthesize_file(
                &config_path(name),
                &SynthesisOptions::default(),
                OutputFormat::Yaml,
            )
            .unwrap_or_else(|e| panic!("{} failed: {:?}", name, e));

            assert_eq!(graph.count(ResourceType::Subnet), subnets, "{}", name);
            assert_eq!(graph.count(ResourceType::NatGateway), nat_gateways, "{}", name);
            assert!(text.starts_with("AWSTemplateFormatVersion"), "{}", name);
        }
    }

    #[test]
    fn test_bundled_configs_in_parallel() {
        let out = TempDir::new().unwrap();
        let jobs: Vec<StackJob> = ["public-only.yaml", "shared-nat.yaml", "grouped-subnets.yaml"]
            .iter()
            .map(|name| {
                let path = config_path(name);
                StackJob {
                    output_path: Some(output_path_for(&path, out.path(), OutputFormat::Json)),
                    config_path: path,
                    options: SynthesisOptions::default(),
                    format: OutputFormat::Json,
                }
            })
            .collect();

        for result in synthesize_stacks(&jobs) {
            let report = result.unwrap();
            let written = std::fs::read_to_string(report.output_path.unwrap()).unwrap();
            let doc: serde_json::Value = serde_json::from_str(&written).unwrap();
            assert_eq!(doc["Outputs"]["VPCID"]["Value"]["Ref"], "VPC");
        }
    }
}
