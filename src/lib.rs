//! # vpc-synth - VPC topology synthesizer
//!
//! This library turns a declarative network configuration document into a
//! graph of typed infrastructure resources (VPC, internet gateway, subnets,
//! route tables, NAT egress) and renders that graph as a provisioning
//! template.
//!
//! ## Overview
//!
//! Synthesis is a pure function: one configuration in, one resource graph
//! out. The core performs no I/O and holds no state between runs, so several
//! stacks can be synthesized side by side.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: Configuration document model and key-path-aware validation
//! - `config_loader`: Configuration file loading
//! - `model`: Typed resources and the references between them
//! - `graph`: Append-only resource graph with dependency checking
//! - `variant`: Resolution of optional sub-topologies and build order
//! - `builder`: Topology construction
//! - `export`: Cross-stack export naming
//! - `template`: Template rendering (YAML/JSON)
//! - `orchestrator`: File-level and multi-stack synthesis
//! - `errors`: Synthesis error taxonomy
//! - `utils`: CIDR handling and validation helpers
//!
//! ## Example Usage
//!
//! ```rust
//! use vpc_synth::builder::{build, SynthesisOptions};
//! use vpc_synth::config_loader::parse_config;
//! use vpc_synth::template::{render, OutputFormat};
//!
//! let config = parse_config(r#"
//! resources:
//!   vpc:
//!     cidr: "10.0.0.0/16"
//!     public:
//!       subnets:
//!         - { name: PublicA, cidr: "10.0.1.0/24", az: us-east-1a }
//! "#)?;
//!
//! let graph = build(&config, &SynthesisOptions::default())?;
//! let template = render(&graph, OutputFormat::Yaml)?;
//! assert!(template.contains("PublicInternetRoute"));
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! resources:
//!   vpc:
//!     cidr: "10.0.0.0/16"
//!     public:
//!       route_table_name: PublicRouteTable   # optional
//!       subnets:
//!         - { name: PublicA, cidr: "10.0.1.0/24", az: us-east-1a }
//!     private:
//!       single_nat_gateway: true             # optional, default false
//!       subnets:
//!         - { name: PrivateA, cidr: "10.0.10.0/24", az: us-east-1a }
//! ```
//!
//! ## Error Handling
//!
//! The core returns typed [`errors::SynthesisError`] values. File loading,
//! rendering and the CLI use `color_eyre` for error reporting with context.

pub mod builder;
pub mod config;
pub mod config_loader;
pub mod errors;
pub mod export;
pub mod graph;
pub mod model;
pub mod orchestrator;
pub mod template;
pub mod utils;
pub mod variant;
