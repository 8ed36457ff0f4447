//! Diagram of an assembled hierarchy
//!
//! A plain node/edge graph built on `petgraph`; callers render it further,
//! e.g. to Graphviz DOT with [`Diagram::write_dot`].

use std::io::Write;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::kind::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub kind: ResourceKind,
    pub resource_id: String,
    pub display_name: String,
}

impl DiagramNode {
    pub fn new(kind: ResourceKind, resource_id: String, display_name: &str) -> Self {
        Self {
            kind,
            resource_id,
            display_name: display_name.to_string(),
        }
    }

    /// Same text as the resource's dump line
    pub fn label(&self) -> String {
        format!("{} (\"{}\")", self.resource_id, self.display_name)
    }

    fn shape(&self) -> &'static str {
        match self.kind {
            ResourceKind::Organization => "house",
            ResourceKind::Folder => "folder",
            ResourceKind::Project => "box",
        }
    }
}

#[derive(Debug, Default)]
pub struct Diagram {
    graph: DiGraph<DiagramNode, ()>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: DiagramNode) -> NodeIndex {
        self.graph.add_node(node)
    }

    /// Adds a parent→child edge
    pub fn add_edge(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.graph.add_edge(parent, child, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in the order they were drawn
    pub fn nodes(&self) -> impl Iterator<Item = &DiagramNode> {
        self.graph.node_weights()
    }

    /// Edges as `(parent resource id, child resource id)`, in drawing order
    pub fn edges(&self) -> Vec<(String, String)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].resource_id.clone(),
                    self.graph[e.target()].resource_id.clone(),
                )
            })
            .collect()
    }

    /// Writes the diagram in Graphviz DOT format.
    pub fn write_dot(&self, sink: &mut dyn Write) -> std::io::Result<()> {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::NodeNoLabel, Config::EdgeNoLabel],
            &|_, _| String::new(),
            &|_, (_, node)| {
                format!(
                    "label = \"{}\" shape = {} ",
                    node.label().replace('"', "\\\""),
                    node.shape()
                )
            },
        );
        write!(sink, "{:?}", dot)
    }
}
