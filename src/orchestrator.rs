//! Synthesis orchestrator.
//!
//! This module coordinates the file-level flow: configuration loading,
//! topology synthesis and template rendering, for one stack or for several
//! independent stacks at once.

use crate::builder::{self, SynthesisOptions};
use crate::config_loader::load_config;
use crate::graph::ResourceGraph;
use crate::model::ResourceType;
use crate::template::{self, OutputFormat};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// One stack to synthesize
#[derive(Debug, Clone)]
pub struct StackJob {
    pub config_path: PathBuf,
    /// Where to write the template; `None` only validates
    pub output_path: Option<PathBuf>,
    pub options: SynthesisOptions,
    pub format: OutputFormat,
}

/// Summary of one synthesized stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackReport {
    pub config_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub resources: usize,
    pub subnets: usize,
    pub outputs: usize,
}

/// Load, synthesize and render a single configuration file
///
/// # Returns
/// The resource graph and its rendered template text
pub fn synthesize_file(
    config_path: &Path,
    options: &SynthesisOptions,
    format: OutputFormat,
) -> Result<(ResourceGraph, String)> {
    let config = load_config(config_path)?;
    let graph = builder::build(&config, options)
        .wrap_err_with(|| format!("Failed to synthesize '{}'", config_path.display()))?;
    let text = template::render(&graph, format)?;
    Ok((graph, text))
}

/// Run one job, writing its template if an output path is set
pub fn run_job(job: &StackJob) -> Result<StackReport> {
    let (graph, text) = synthesize_file(&job.config_path, &job.options, job.format)?;

    if let Some(output_path) = &job.output_path {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create output directory '{}'", parent.display())
            })?;
        }
        fs::write(output_path, text)
            .wrap_err_with(|| format!("Failed to write template '{}'", output_path.display()))?;
        log::info!("Wrote template: {:?}", output_path);
    }

    Ok(StackReport {
        config_path: job.config_path.clone(),
        output_path: job.output_path.clone(),
        resources: graph.len(),
        subnets: graph.count(ResourceType::Subnet),
        outputs: graph.outputs().len(),
    })
}

/// Synthesize several independent stacks in parallel
///
/// Runs share no state; one failing stack does not stop the others. Results
/// are returned in the order of `jobs`.
pub fn synthesize_stacks(jobs: &[StackJob]) -> Vec<Result<StackReport>> {
    log::info!("Synthesizing {} stack(s)", jobs.len());
    jobs.par_iter().map(run_job).collect()
}

/// Template path for a configuration file inside an output directory
///
/// `configs/network-prod.yaml` with format JSON becomes
/// `<output_dir>/network-prod.json`.
pub fn output_path_for(config_path: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = config_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    output_dir.join(format!("{}.{}", stem, format.extension()))
}
