//! Resource dependency tracking.
//!
//! This module builds the reference graph over a stack's declarations and
//! enforces the two structural properties a provisioning request must hold:
//!
//! - every reference resolves to a declared resource
//! - the graph is acyclic
//!
//! It also derives a provisioning order (dependencies first) and a Graphviz
//! rendering for inspection.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::error::{Error, Result};
use crate::resource::LogicalId;
use crate::stack::Stack;

/// How one declaration came to depend on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A `Ref` or `Fn::GetAtt` inside a property value
    Property,
    /// An explicit `depends_on` edge
    Explicit,
}

/// A reference that names a logical id no declaration carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// The resource or output holding the reference
    pub referrer: String,
    /// The logical id that failed to resolve
    pub target: LogicalId,
}

/// The reference graph over a stack's declarations.
///
/// Edges point from a dependency to its dependent, so topological order is
/// provisioning order.
#[derive(Debug, Clone)]
pub struct ResourceGraph {
    graph: DiGraph<LogicalId, ReferenceKind>,
    node_indices: HashMap<LogicalId, NodeIndex>,
    dangling: Vec<DanglingReference>,
}

impl ResourceGraph {
    /// Extracts the reference graph from a stack: one node per declaration,
    /// one edge per property reference or explicit dependency. References to
    /// undeclared ids are recorded rather than added as nodes; `validate`
    /// reports them.
    pub fn from_stack(stack: &Stack) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut dangling = Vec::new();

        for resource in stack.resources() {
            let idx = graph.add_node(resource.logical_id.clone());
            node_indices.insert(resource.logical_id.clone(), idx);
        }

        for resource in stack.resources() {
            let to_idx = node_indices[&resource.logical_id];
            let mut seen = HashSet::new();
            for (target, kind) in resource
                .properties
                .values()
                .flat_map(|value| value.references())
                .map(|target| (target, ReferenceKind::Property))
                .chain(
                    resource
                        .depends_on
                        .iter()
                        .cloned()
                        .map(|target| (target, ReferenceKind::Explicit)),
                )
            {
                match node_indices.get(&target) {
                    Some(&from_idx) => {
                        // One edge per referenced resource is enough for
                        // ordering; repeated mentions collapse.
                        if seen.insert(target) {
                            graph.add_edge(from_idx, to_idx, kind);
                        }
                    }
                    None => dangling.push(DanglingReference {
                        referrer: format!("resource '{}'", resource.logical_id),
                        target,
                    }),
                }
            }
        }

        for (name, output) in stack.outputs() {
            for target in output.value.references() {
                if !node_indices.contains_key(&target) {
                    dangling.push(DanglingReference {
                        referrer: format!("output '{name}'"),
                        target,
                    });
                }
            }
        }

        ResourceGraph {
            graph,
            node_indices,
            dangling,
        }
    }

    /// Number of declarations in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of reference edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// References that failed to resolve during extraction.
    pub fn dangling_references(&self) -> &[DanglingReference] {
        &self.dangling
    }

    /// Cycles in the graph: strongly connected components with more than one
    /// member, plus single resources that reference themselves.
    pub fn cycles(&self) -> Vec<Vec<LogicalId>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || (scc.len() == 1 && self.graph.contains_edge(scc[0], scc[0]))
            })
            .map(|scc| {
                scc.into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect()
            })
            .collect()
    }

    /// Checks the two structural properties of a provisioning request:
    /// every reference resolves, and the graph is acyclic. Fails on the
    /// first dangling reference, then on the first cycle.
    pub fn validate(&self) -> Result<()> {
        if let Some(dangling) = self.dangling.first() {
            return Err(Error::unresolved(
                dangling.referrer.clone(),
                dangling.target.to_string(),
            ));
        }
        if let Some(cycle) = self.cycles().into_iter().next() {
            return Err(Error::DependencyCycle {
                members: Self::close_cycle(&cycle),
            });
        }
        Ok(())
    }

    /// Renders a cycle with the first member repeated at the end.
    fn close_cycle(cycle: &[LogicalId]) -> Vec<String> {
        let mut members: Vec<String> = cycle.iter().map(ToString::to_string).collect();
        if let Some(first) = members.first().cloned() {
            members.push(first);
        }
        members
    }

    /// Topological order over the declarations: every resource appears after
    /// everything it references.
    pub fn provisioning_order(&self) -> Result<Vec<LogicalId>> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .filter_map(|idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(_) => {
                // toposort only fails on a cycle.
                let members = self
                    .cycles()
                    .into_iter()
                    .next()
                    .map(|cycle| Self::close_cycle(&cycle))
                    .unwrap_or_default();
                Err(Error::DependencyCycle { members })
            }
        }
    }

    /// Direct dependencies of a declaration (what it references).
    pub fn dependencies_of(&self, id: &LogicalId) -> Vec<LogicalId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Every declaration that transitively depends on the given one.
    pub fn dependents_of(&self, id: &LogicalId) -> Vec<LogicalId> {
        let mut dependents = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        if let Some(&start_idx) = self.node_indices.get(id) {
            queue.push_back(start_idx);
            while let Some(current) = queue.pop_front() {
                for neighbor in self.graph.neighbors_directed(current, Direction::Outgoing) {
                    if let Some(node) = self.graph.node_weight(neighbor) {
                        if visited.insert(node.clone()) {
                            dependents.push(node.clone());
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }
        dependents
    }

    /// Graphviz rendering of the reference graph.
    pub fn to_dot(&self) -> String {
        let labeled = self.graph.map(|_, id| id.as_str(), |_, _| ());
        format!(
            "{:?}",
            Dot::with_config(&labeled, &[DotConfig::EdgeNoLabel])
        )
    }

    fn neighbors(&self, id: &LogicalId, direction: Direction) -> Vec<LogicalId> {
        match self.node_indices.get(id) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, direction)
                .filter_map(|neighbor| self.graph.node_weight(neighbor).cloned())
                .collect(),
            None => Vec::new(),
        }
    }
}
