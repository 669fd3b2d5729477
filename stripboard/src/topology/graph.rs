//! Bus Connectivity Graph
//!
//! Bipartite view of a [`Topology`] built with petgraph: bus nodes on one
//! side, connector nodes on the other, one edge per bus membership. Used to
//! check that every connector id is declared once and belongs to exactly one
//! bus, and to answer "which bus is this hole on" queries.

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

use super::Topology;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusGraphNode {
    Bus(String),
    Connector(String),
}

impl BusGraphNode {
    pub fn id(&self) -> &str {
        match self {
            BusGraphNode::Bus(id) | BusGraphNode::Connector(id) => id,
        }
    }

    pub fn is_bus(&self) -> bool {
        matches!(self, BusGraphNode::Bus(_))
    }
}

#[derive(Debug, Clone)]
pub struct BusGraph {
    graph: UnGraph<BusGraphNode, ()>,
    bus_indices: HashMap<String, NodeIndex>,
    connector_indices: HashMap<String, NodeIndex>,
    /// Connector ids declared more than once, in first-repeat order
    duplicates: Vec<String>,
    /// Bus members with no declared connector
    undeclared: Vec<String>,
}

impl BusGraph {
    pub fn from_topology(topology: &Topology) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut bus_indices = HashMap::new();
        let mut connector_indices = HashMap::new();
        let mut duplicates = Vec::new();
        let mut undeclared = Vec::new();

        for connector in &topology.connectors {
            if connector_indices.contains_key(&connector.id) {
                if !duplicates.contains(&connector.id) {
                    duplicates.push(connector.id.clone());
                }
                continue;
            }
            let idx = graph.add_node(BusGraphNode::Connector(connector.id.clone()));
            connector_indices.insert(connector.id.clone(), idx);
        }

        for bus in &topology.buses {
            let bus_idx = *bus_indices
                .entry(bus.id.clone())
                .or_insert_with(|| graph.add_node(BusGraphNode::Bus(bus.id.clone())));

            for member in &bus.members {
                let member_idx = match connector_indices.get(member) {
                    Some(&idx) => idx,
                    None => {
                        undeclared.push(member.clone());
                        let idx = graph.add_node(BusGraphNode::Connector(member.clone()));
                        connector_indices.insert(member.clone(), idx);
                        idx
                    }
                };
                graph.add_edge(bus_idx, member_idx, ());
            }
        }

        Self {
            graph,
            bus_indices,
            connector_indices,
            duplicates,
            undeclared,
        }
    }

    pub fn bus_count(&self) -> usize {
        self.bus_indices.len()
    }

    pub fn connector_count(&self) -> usize {
        self.connector_indices.len()
    }

    /// The bus a connector belongs to, if it belongs to exactly one.
    pub fn bus_of(&self, connector_id: &str) -> Option<&str> {
        let buses = self.buses_of(connector_id);
        match buses.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn buses_of(&self, connector_id: &str) -> Vec<&str> {
        match self.connector_indices.get(connector_id) {
            Some(&idx) => {
                let mut ids: Vec<&str> = self
                    .graph
                    .neighbors(idx)
                    .map(|n| self.graph[n].id())
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            }
            None => Vec::new(),
        }
    }

    pub fn members(&self, bus_id: &str) -> Vec<&str> {
        match self.bus_indices.get(bus_id) {
            Some(&idx) => {
                let mut ids: Vec<&str> = self
                    .graph
                    .neighbors(idx)
                    .map(|n| self.graph[n].id())
                    .collect();
                ids.sort_unstable();
                ids
            }
            None => Vec::new(),
        }
    }

    /// Connectors that are on no bus.
    pub fn floating_connectors(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .connector_indices
            .iter()
            .filter(|(_, idx)| self.graph.neighbors(**idx).next().is_none())
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Connectors that are on more than one bus.
    pub fn shorted_connectors(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .connector_indices
            .keys()
            .map(String::as_str)
            .filter(|id| self.buses_of(id).len() > 1)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn duplicate_connectors(&self) -> &[String] {
        &self.duplicates
    }

    pub fn undeclared_members(&self) -> &[String] {
        &self.undeclared
    }

    /// True when every connector is declared once and listed once, on exactly one bus.
    pub fn is_consistent(&self) -> bool {
        self.duplicates.is_empty()
            && self.undeclared.is_empty()
            && self.floating_connectors().is_empty()
            && self.shorted_connectors().is_empty()
            && self.graph.edge_count() == self.connector_indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Bus, Connector, ConnectorKind};

    fn connector(id: &str) -> Connector {
        Connector {
            id: id.to_string(),
            kind: ConnectorKind::Female,
            svg_id: id.to_string(),
        }
    }

    fn bus(id: &str, members: &[&str]) -> Bus {
        Bus {
            id: id.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_consistent_topology() {
        let topology = Topology {
            connectors: vec![connector("a-0"), connector("a-1"), connector("b-0")],
            buses: vec![bus("a", &["a-0", "a-1"]), bus("b", &["b-0"])],
        };
        let graph = BusGraph::from_topology(&topology);

        assert!(graph.is_consistent());
        assert_eq!(graph.bus_count(), 2);
        assert_eq!(graph.connector_count(), 3);
        assert_eq!(graph.bus_of("a-1"), Some("a"));
        assert_eq!(graph.members("a"), vec!["a-0", "a-1"]);
        assert_eq!(graph.bus_of("missing"), None);
    }

    #[test]
    fn test_detects_duplicates_floating_and_shorts() {
        let topology = Topology {
            connectors: vec![
                connector("x-0"),
                connector("x-0"),
                connector("lonely"),
                connector("y-0"),
            ],
            buses: vec![bus("x", &["x-0", "y-0"]), bus("y", &["y-0", "ghost"])],
        };
        let graph = BusGraph::from_topology(&topology);

        assert!(!graph.is_consistent());
        assert_eq!(graph.duplicate_connectors(), &["x-0".to_string()]);
        assert_eq!(graph.undeclared_members(), &["ghost".to_string()]);
        assert_eq!(graph.floating_connectors(), vec!["lonely"]);
        assert_eq!(graph.shorted_connectors(), vec!["y-0"]);
        assert_eq!(graph.bus_of("y-0"), None);
        assert_eq!(graph.buses_of("y-0"), vec!["x", "y"]);
    }
}
