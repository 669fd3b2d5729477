use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::CellRange;

pub const DEFAULT_PITCH: f64 = 2.54;

/// Placement of one grid on the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetadata {
    pub origin: (f64, f64),
    /// Hole spacing in mm
    pub pitch: f64,
    /// Flip X for back-side layouts
    pub mirrored: bool,
}

impl Default for GridMetadata {
    fn default() -> Self {
        Self {
            origin: (0.0, 0.0),
            pitch: DEFAULT_PITCH,
            mirrored: false,
        }
    }
}

/// One node of a grid's component tree.
#[derive(Debug, Clone, PartialEq)]
pub enum GridComponent {
    /// Straight run of drilled holes
    DrilledRun { id: String, cell_range: CellRange },
    /// Straight run of surface pads; same topology as `DrilledRun`
    PadRun { id: String, cell_range: CellRange },
    /// One drilled run per row of the range
    RowSweep { id: String, cell_range: CellRange },
    /// One drilled run per column of the range
    ColumnSweep { id: String, cell_range: CellRange },
    /// All children's connectors joined into one bus
    SharedBus {
        id: String,
        children: Vec<GridComponent>,
    },
}

impl GridComponent {
    pub fn id(&self) -> &str {
        match self {
            GridComponent::DrilledRun { id, .. }
            | GridComponent::PadRun { id, .. }
            | GridComponent::RowSweep { id, .. }
            | GridComponent::ColumnSweep { id, .. }
            | GridComponent::SharedBus { id, .. } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GridComponent::DrilledRun { .. } => "drilled",
            GridComponent::PadRun { .. } => "bus",
            GridComponent::RowSweep { .. } => "drilled_rows",
            GridComponent::ColumnSweep { .. } => "drilled_columns",
            GridComponent::SharedBus { .. } => "shared_bus",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub metadata: GridMetadata,
    pub components: Vec<GridComponent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridDefinition {
    pub grid: Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardMetadata {
    pub id: String,
    pub version: String,
    pub author: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub label: String,
    /// Extra part properties, emitted after `size` and `family`
    pub properties: BTreeMap<String, String>,
    pub taxonomy: String,
    pub description: String,
}

/// Root input value: board metadata, outline size and the ordered grids.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSpecification {
    pub meta: BoardMetadata,
    /// Board width in mm
    pub width: f64,
    /// Board height in mm
    pub height: f64,
    pub board: Vec<GridDefinition>,
}

impl BoardSpecification {
    pub fn grids(&self) -> impl Iterator<Item = &Grid> {
        self.board.iter().map(|definition| &definition.grid)
    }
}
