use clap::Parser;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use env_logger::Env;
use log::{error, info};
use std::path::{Path, PathBuf};

use vpc_synth::builder::SynthesisOptions;
use vpc_synth::export::StackName;
use vpc_synth::orchestrator::{output_path_for, synthesize_stacks, StackJob};
use vpc_synth::template::OutputFormat;

/// Synthesizes CloudFormation VPC network topologies from YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a network configuration YAML file (repeat for several stacks)
    #[arg(short, long, required = true, num_args = 1..)]
    config: Vec<PathBuf>,

    /// Output template file, or output directory when several configs are given
    #[arg(short, long, default_value = "template_output")]
    output: PathBuf,

    /// Stack name used in export names; defaults to the deploy-time stack name
    #[arg(short, long)]
    stack_name: Option<String>,

    /// Template serialization format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Validate and synthesize without writing any template
    #[arg(long)]
    check: bool,
}

impl Args {
    /// Turn command-line arguments into synthesis jobs
    fn jobs(&self) -> Result<Vec<StackJob>> {
        if self.config.len() > 1 && self.stack_name.is_some() {
            bail!("--stack-name can only be used with a single --config");
        }

        let options = SynthesisOptions {
            stack_name: StackName::from_option(self.stack_name.clone()),
        };
        let single_file = self.config.len() == 1 && has_template_extension(&self.output);

        let jobs = self
            .config
            .iter()
            .map(|config_path| {
                let output_path = if self.check {
                    None
                } else if single_file {
                    Some(self.output.clone())
                } else {
                    Some(output_path_for(config_path, &self.output, self.format))
                };
                StackJob {
                    config_path: config_path.clone(),
                    output_path,
                    options: options.clone(),
                    format: self.format,
                }
            })
            .collect();

        Ok(jobs)
    }
}

fn has_template_extension(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext == "yaml" || ext == "yml" || ext == "json")
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting vpc-synth");
    info!("Configuration file(s): {:?}", args.config);
    if !args.check {
        info!("Output: {:?}", args.output);
    }

    let jobs = args.jobs()?;
    let results = synthesize_stacks(&jobs);

    let mut failures = 0;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(report) => info!(
                "{:?}: {} resources ({} subnets), {} output(s)",
                report.config_path, report.resources, report.subnets, report.outputs
            ),
            Err(e) => {
                failures += 1;
                error!("{:?}: {:?}", job.config_path, e);
            }
        }
    }

    if failures > 0 {
        return Err(eyre!("{} of {} stack(s) failed to synthesize", failures, jobs.len()));
    }

    info!("Synthesis completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(&["vpc-synth", "--config", "vpc.yaml"]);

        assert_eq!(args.config, vec![PathBuf::from("vpc.yaml")]);
        assert_eq!(args.output, PathBuf::from("template_output"));
        assert_eq!(args.format, OutputFormat::Yaml);
        assert!(args.stack_name.is_none());
        assert!(!args.check);
    }

    #[test]
    fn test_single_config_to_file() {
        let args = Args::parse_from(&[
            "vpc-synth",
            "--config",
            "vpc.yaml",
            "--output",
            "out/vpc.json",
            "--format",
            "json",
            "--stack-name",
            "network-dev",
        ]);

        let jobs = args.jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].output_path, Some(PathBuf::from("out/vpc.json")));
        assert_eq!(jobs[0].format, OutputFormat::Json);
        assert_eq!(
            jobs[0].options.stack_name,
            StackName::Literal("network-dev".to_string())
        );
    }

    #[test]
    fn test_several_configs_to_directory() {
        let args = Args::parse_from(&[
            "vpc-synth",
            "--config",
            "dev.yaml",
            "prod.yaml",
            "--output",
            "templates",
        ]);

        let jobs = args.jobs().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].output_path, Some(PathBuf::from("templates/prod.yaml")));
        assert_eq!(jobs[1].options.stack_name, StackName::Deployed);
    }

    #[test]
    fn test_stack_name_requires_single_config() {
        let args = Args::parse_from(&[
            "vpc-synth",
            "--config",
            "dev.yaml",
            "prod.yaml",
            "--stack-name",
            "shared",
        ]);
        assert!(args.jobs().is_err());
    }

    #[test]
    fn test_check_writes_nothing() {
        let args = Args::parse_from(&["vpc-synth", "--config", "dev.yaml", "--check"]);
        assert!(args.jobs().unwrap()[0].output_path.is_none());
    }
}
