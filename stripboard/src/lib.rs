//! Stripboard - Fritzing part generator for stripboards
//!
//! This library turns a declarative stripboard layout into the two files a
//! Fritzing part needs: a breadboard-view drawing and a part definition
//! whose connectors and buses point at the holes in that drawing.
//!
//! # Quick Start
//!
//! ```no_run
//! use stripboard::{BoardSpecification, StripboardCore};
//! use std::path::Path;
//!
//! let board = BoardSpecification::load(Path::new("board.yaml")).unwrap();
//! let part = StripboardCore::build(&board).unwrap();
//! part.write_archive(Path::new("board.fzpz")).unwrap();
//!
//! println!("{} / {}", part.fzp_entry_name(), part.svg_entry_name());
//! ```
//!
//! # Components
//!
//! - **Drilled runs** (`drilled: A0:J0`): a straight strip of plated holes
//! - **Pad runs** (`bus: A0:J0`): the same strip with surface pads
//! - **Row / column sweeps** (`drilled_rows`, `drilled_columns`): one strip per row or column
//! - **Shared buses** (`shared_bus`): several strips joined into one bus

pub mod archive;
pub mod board;
pub mod core;
pub mod grid;
pub mod render;
pub mod topology;

// Re-export main types
pub use archive::{ArchiveError, PartFiles};
pub use board::{
    BoardMetadata, BoardSpecification, ConfigError, Grid, GridComponent, GridDefinition,
    GridMetadata,
};
pub use crate::core::{StripboardCore, StripboardError};
pub use grid::{
    cell_to_coord, coord_to_cell, coord_to_position, positions_between, CellError, CellRange,
    GridCoord, Position,
};
pub use topology::{
    resolve_board, Bus, BusGraph, Connector, ConnectorKind, DrawOp, Resolution, ResolveError,
    Topology,
};

/// Load a YAML board specification (convenience wrapper).
pub fn load_board(path: &std::path::Path) -> Result<BoardSpecification, StripboardError> {
    Ok(BoardSpecification::load(path)?)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BoardSpecification, BusGraph, GridComponent, PartFiles, Resolution, StripboardCore,
        StripboardError,
    };
}
