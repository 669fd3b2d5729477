//! Grid addressing: cell names, grid coordinates and physical hole positions.

pub mod cell;

pub use cell::{
    cell_to_coord, coord_to_cell, coord_to_position, positions_between, CellError, CellRange,
    GridCoord, HoleSpan, Position,
};
