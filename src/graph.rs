//! Resource graph.
//!
//! An append-only, insertion-ordered collection of resources and exported
//! outputs. Logical names are unique across both, and every dependency of a
//! resource must already be present when it is inserted, so a graph built
//! through [`ResourceGraph::insert`] is always satisfiable.

use crate::errors::{SynthesisError, SynthesisResult};
use crate::model::{ExportedOutput, Resource, ResourceType};
use std::collections::HashMap;

/// The synthesized topology of a single stack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
    outputs: Vec<ExportedOutput>,
    /// Logical name -> position in `resources`
    index: HashMap<String, usize>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a resource or output already uses `name`
    pub fn contains_name(&self, name: &str) -> bool {
        self.index.contains_key(name) || self.outputs.iter().any(|o| o.name == name)
    }

    /// Append a resource
    ///
    /// Fails with [`SynthesisError::Conflict`] if the logical name is taken and
    /// with [`SynthesisError::Dependency`] if anything it references (including
    /// ordering-only predecessors) is not in the graph yet.
    pub fn insert(&mut self, resource: Resource) -> SynthesisResult<()> {
        if self.contains_name(&resource.name) {
            return Err(SynthesisError::Conflict {
                name: resource.name,
            });
        }

        if let Some(missing) = resource.dependencies().find(|dep| !self.index.contains_key(*dep)) {
            return Err(SynthesisError::Dependency {
                resource: resource.name.clone(),
                missing: missing.to_string(),
            });
        }

        log::debug!(
            "Adding {} {}",
            resource.resource_type().type_name(),
            resource.name
        );
        self.index.insert(resource.name.clone(), self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    /// Append an exported output; its value must reference an existing resource
    pub fn insert_output(&mut self, output: ExportedOutput) -> SynthesisResult<()> {
        if self.contains_name(&output.name) {
            return Err(SynthesisError::Conflict { name: output.name });
        }
        if !self.index.contains_key(output.value.target()) {
            return Err(SynthesisError::Dependency {
                resource: output.name.clone(),
                missing: output.value.target().to_string(),
            });
        }

        log::debug!("Exporting {} as {}", output.value.target(), output.export_name);
        self.outputs.push(output);
        Ok(())
    }

    /// Re-check every edge in the graph
    ///
    /// Each dependency must resolve to a resource placed earlier in the graph,
    /// and each output must reference an existing resource.
    pub fn validate(&self) -> SynthesisResult<()> {
        for (position, resource) in self.resources.iter().enumerate() {
            for dep in resource.dependencies() {
                match self.index.get(dep) {
                    Some(&dep_position) if dep_position < position => {}
                    _ => {
                        return Err(SynthesisError::Dependency {
                            resource: resource.name.clone(),
                            missing: dep.to_string(),
                        })
                    }
                }
            }
        }

        for output in &self.outputs {
            if !self.index.contains_key(output.value.target()) {
                return Err(SynthesisError::Dependency {
                    resource: output.name.clone(),
                    missing: output.value.target().to_string(),
                });
            }
        }

        Ok(())
    }

    /// A copy of this graph with the named resource left out
    ///
    /// Nothing is re-checked, so the copy may be unsatisfiable; call
    /// [`ResourceGraph::validate`] on it to find out.
    pub fn without(&self, name: &str) -> ResourceGraph {
        let resources: Vec<Resource> = self
            .resources
            .iter()
            .filter(|r| r.name != name)
            .cloned()
            .collect();
        let index = resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();

        ResourceGraph {
            resources,
            outputs: self.outputs.clone(),
            index,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.index.get(name).map(|&i| &self.resources[i])
    }

    /// Resources in insertion order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn outputs(&self) -> &[ExportedOutput] {
        &self.outputs
    }

    /// Resources of one type, in insertion order
    pub fn of_type(&self, resource_type: ResourceType) -> impl Iterator<Item = &Resource> {
        self.resources
            .iter()
            .filter(move |r| r.resource_type() == resource_type)
    }

    pub fn count(&self, resource_type: ResourceType) -> usize {
        self.of_type(resource_type).count()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{register, StackName};
    use crate::model::{Reference, ResourceKind, RouteTable, Role, Vpc};

    fn vpc() -> Resource {
        Resource::new(
            "VPC",
            ResourceKind::Vpc(Vpc {
                cidr_block: "10.0.0.0/16".to_string(),
                enable_dns_support: true,
                enable_dns_hostnames: true,
            }),
        )
    }

    fn route_table(name: &str) -> Resource {
        Resource::new(
            name,
            ResourceKind::RouteTable(RouteTable {
                vpc: Reference::to("VPC"),
                role: Role::Public,
            }),
        )
    }

    #[test]
    fn test_insert_rejects_duplicate_names() {
        let mut graph = ResourceGraph::new();
        graph.insert(vpc()).unwrap();
        graph.insert(route_table("Table")).unwrap();

        assert_eq!(
            graph.insert(route_table("Table")),
            Err(SynthesisError::Conflict {
                name: "Table".to_string()
            })
        );
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_insert_rejects_unresolved_references() {
        let mut graph = ResourceGraph::new();
        assert_eq!(
            graph.insert(route_table("Table")),
            Err(SynthesisError::Dependency {
                resource: "Table".to_string(),
                missing: "VPC".to_string()
            })
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn test_insert_rejects_unresolved_ordering_edge() {
        let mut graph = ResourceGraph::new();
        graph.insert(vpc()).unwrap();
        let result = graph.insert(route_table("Table").depends_on("InternetGatewayAttachment"));
        assert!(matches!(result, Err(SynthesisError::Dependency { .. })));
    }

    #[test]
    fn test_outputs_share_the_name_space() {
        let mut graph = ResourceGraph::new();
        graph.insert(vpc()).unwrap();
        let output = ExportedOutput {
            name: "VPCID".to_string(),
            value: Reference::to("VPC"),
            export_name: register(&StackName::default(), "VPC"),
        };
        graph.insert_output(output.clone()).unwrap();

        assert!(graph.contains_name("VPCID"));
        assert!(matches!(
            graph.insert_output(output),
            Err(SynthesisError::Conflict { .. })
        ));
        assert!(matches!(
            graph.insert(Resource::new("VPCID", ResourceKind::InternetGateway)),
            Err(SynthesisError::Conflict { .. })
        ));
    }

    #[test]
    fn test_without_makes_dependents_unsatisfiable() {
        let mut graph = ResourceGraph::new();
        graph.insert(vpc()).unwrap();
        graph.insert(route_table("Table")).unwrap();
        assert!(graph.validate().is_ok());

        let pruned = graph.without("VPC");
        assert_eq!(pruned.len(), 1);
        assert_eq!(
            pruned.validate(),
            Err(SynthesisError::Dependency {
                resource: "Table".to_string(),
                missing: "VPC".to_string()
            })
        );
        // The original graph is untouched
        assert!(graph.get("VPC").is_some());
    }

    #[test]
    fn test_queries() {
        let mut graph = ResourceGraph::new();
        graph.insert(vpc()).unwrap();
        graph.insert(route_table("A")).unwrap();
        graph.insert(route_table("B")).unwrap();

        assert_eq!(graph.count(ResourceType::RouteTable), 2);
        assert_eq!(graph.count(ResourceType::InternetGateway), 0);
        let names: Vec<&str> = graph.resources().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["VPC", "A", "B"]);
    }
}
