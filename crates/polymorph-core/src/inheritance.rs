//! Entity inheritance graph.
//!
//! Nodes are entities, edges point from a subtype to each of its super
//! entities. The graph is used to reject cyclic `extends` chains before any
//! delegate relation is derived from the model.

use indexmap::IndexMap;
use petgraph::{
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
};

use crate::{identifier::Ident, schema::Model};

/// Directed graph of `extends` edges between entities.
#[derive(Debug, Default)]
pub struct InheritanceGraph {
    graph: DiGraph<Ident, ()>,
    nodes: IndexMap<Ident, NodeIndex>,
}

impl InheritanceGraph {
    /// Builds the graph from a model.
    ///
    /// Super references that do not name an entity in the model are ignored;
    /// unresolved references are reported by the schema validator.
    pub fn from_model(model: &Model) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = IndexMap::new();

        for entity in model.entities() {
            nodes
                .entry(entity.name().clone())
                .or_insert_with(|| graph.add_node(entity.name().clone()));
        }

        for entity in model.entities() {
            let sub = nodes[entity.name()];
            for super_type in entity.super_types() {
                if let Some(&sup) = nodes.get(super_type) {
                    graph.add_edge(sub, sup, ());
                }
            }
        }

        Self { graph, nodes }
    }

    /// Number of entities in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Direct super entities of `name`, in declaration order.
    pub fn super_types(&self, name: &str) -> Vec<&Ident> {
        let Some(&node) = self.nodes.get(name) else {
            return Vec::new();
        };

        // petgraph yields neighbors most-recent-edge first
        let mut supers: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        supers.reverse();
        supers.into_iter().map(|idx| &self.graph[idx]).collect()
    }

    /// Finds an inheritance cycle, if one exists.
    ///
    /// Returns the entities participating in the first cycle found, ordered
    /// by declaration. A self-referencing entity is reported as a
    /// single-element cycle.
    pub fn find_cycle(&self) -> Option<Vec<Ident>> {
        tarjan_scc(&self.graph).into_iter().find_map(|component| {
            let is_cycle = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&node| self.graph.contains_edge(node, node));
            if !is_cycle {
                return None;
            }

            let mut members = component;
            members.sort();
            Some(
                members
                    .into_iter()
                    .map(|idx| self.graph[idx].clone())
                    .collect(),
            )
        })
    }
}
