//! Bus topology
//!
//! The resolver turns every grid's component tree into two aligned outputs:
//! an ordered list of drawing operations, and the connectors plus buses that
//! the part definition declares. Both sides name holes with the same
//! identifiers, which is what lets the design tool match a clickable pad in
//! the drawing to a connector in the part.

pub mod graph;
pub mod resolver;

use serde::Serialize;
use thiserror::Error;

use crate::grid::{CellError, Position};

pub use graph::BusGraph;
pub use resolver::{resolve_board, BusHandle, Resolver};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Cell(#[from] CellError),

    /// The two ends of a run are neither on the same row nor the same column.
    #[error("Cell range {range:?} of component {id:?} is not a straight horizontal or vertical run")]
    RangeShape { id: String, range: String },

    /// Two primitives produced the same connector, trace or bus identifier.
    #[error("Identifier {0:?} is produced by more than one component")]
    DuplicateId(String),
}

/// One drawable element, in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Filled board rectangle, always the first op
    Outline { width: f64, height: f64 },
    /// Copper strip between two hole centers
    Line {
        id: String,
        from: Position,
        to: Position,
    },
    Hole {
        id: String,
        center: Position,
        drilled: bool,
    },
}

impl DrawOp {
    pub fn id(&self) -> Option<&str> {
        match self {
            DrawOp::Outline { .. } => None,
            DrawOp::Line { id, .. } | DrawOp::Hole { id, .. } => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// Drilled through-hole
    Female,
    /// Surface pad
    Pad,
}

impl ConnectorKind {
    pub fn from_drilled(drilled: bool) -> Self {
        if drilled {
            ConnectorKind::Female
        } else {
            ConnectorKind::Pad
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorKind::Female => "female",
            ConnectorKind::Pad => "pad",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub id: String,
    pub kind: ConnectorKind,
    /// Id of the drawing element this connector anchors to
    pub svg_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bus {
    pub id: String,
    pub members: Vec<String>,
}

/// Connectors and buses in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Topology {
    pub connectors: Vec<Connector>,
    pub buses: Vec<Bus>,
}

impl Topology {
    pub fn bus(&self, id: &str) -> Option<&Bus> {
        self.buses.iter().find(|bus| bus.id == id)
    }

    pub fn connector(&self, id: &str) -> Option<&Connector> {
        self.connectors.iter().find(|connector| connector.id == id)
    }
}

/// Everything both document emitters need.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub geometry: Vec<DrawOp>,
    pub topology: Topology,
}

impl Resolution {
    pub fn holes(&self) -> impl Iterator<Item = &DrawOp> {
        self.geometry
            .iter()
            .filter(|op| matches!(op, DrawOp::Hole { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.geometry
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn stats(&self) -> ResolutionStats {
        ResolutionStats {
            holes: self.holes().count(),
            traces: self.lines().count(),
            connectors: self.topology.connectors.len(),
            buses: self.topology.buses.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub holes: usize,
    pub traces: usize,
    pub connectors: usize,
    pub buses: usize,
}
