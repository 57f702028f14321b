//! Node/edge document of column lineage.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogColumn;
use crate::error::Result;

use super::LineageEdge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A catalog column.
    Data,
    /// A job moving data between columns.
    Task,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

impl GraphNode {
    fn column(column: &CatalogColumn) -> Self {
        GraphNode {
            id: column_id(column),
            name: column.to_string(),
            kind: NodeKind::Data,
        }
    }

    fn task(job_name: &str) -> Self {
        GraphNode {
            id: task_id(job_name),
            name: job_name.to_string(),
            kind: NodeKind::Task,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

fn column_id(column: &CatalogColumn) -> String {
    format!("column:{}", column.id)
}

fn task_id(job_name: &str) -> String {
    format!("task:{job_name}")
}

/// Lineage as a graph: column -> task -> column.
///
/// Nodes and edges are deduplicated and kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl LineageGraph {
    #[must_use]
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a LineageEdge>,
    {
        let mut graph = LineageGraph::default();
        let mut seen_nodes = HashSet::new();
        let mut seen_edges = HashSet::new();

        for edge in edges {
            let source = GraphNode::column(&edge.source);
            let task = GraphNode::task(&edge.job_name);
            let target = GraphNode::column(&edge.target);

            for link in [
                GraphEdge {
                    source: source.id.clone(),
                    target: task.id.clone(),
                },
                GraphEdge {
                    source: task.id.clone(),
                    target: target.id.clone(),
                },
            ] {
                if seen_edges.insert(link.clone()) {
                    graph.edges.push(link);
                }
            }
            for node in [source, task, target] {
                if seen_nodes.insert(node.id.clone()) {
                    graph.nodes.push(node);
                }
            }
        }
        graph
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Encodes the graph as `{"nodes": [...], "edges": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Pretty-printed variant of [`LineageGraph::to_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
