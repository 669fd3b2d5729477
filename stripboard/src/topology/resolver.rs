//! Topology Resolver
//!
//! Walks each grid's component tree depth-first, in declaration order, and
//! appends drawing ops, connectors and buses to one accumulator.
//!
//! Identifier scheme (shared by the drawing and the part definition):
//!
//! | Primitive              | Hole / connector        | Trace                   |
//! |------------------------|-------------------------|-------------------------|
//! | `DrilledRun`, `PadRun` | `{id}-{index}`          | `{id}-trace`            |
//! | `RowSweep`             | `{id}-{row}-{index}`    | `{id}-{row}-trace`      |
//! | `ColumnSweep`          | `{id}-{col}-{index}`    | `{id}-{col}-trace`      |
//!
//! `row` / `col` count from the smallest row / column of the range, and
//! `index` follows [`HoleSpan`](crate::grid::HoleSpan) enumeration order.
//!
//! Distinct component ids can still spell the same identifier (a run `s-0`
//! and row 0 of a sweep `s`). Every drawn id and every bus id is claimed
//! before anything is emitted, and a second claim fails the board.

use std::collections::HashSet;

use super::{Bus, Connector, ConnectorKind, DrawOp, Resolution, ResolveError, Topology};
use crate::board::schema::{BoardSpecification, Grid, GridComponent, GridMetadata};
use crate::grid::{coord_to_position, positions_between, CellRange, GridCoord};

/// Index of a bus record in the accumulator.
///
/// Passed down the recursion as the ambient bus: a primitive resolved with
/// `Some(handle)` adds its connectors to that bus instead of opening its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusHandle(usize);

/// Append-only accumulator for one board.
#[derive(Debug, Default)]
pub struct Resolver {
    geometry: Vec<DrawOp>,
    topology: Topology,
    /// Hole and trace ids already in the drawing
    drawn_ids: HashSet<String>,
    bus_ids: HashSet<String>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(&self) -> &[DrawOp] {
        &self.geometry
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Emit the board outline. Called once, before any grid.
    pub fn outline(&mut self, width: f64, height: f64) {
        self.geometry.push(DrawOp::Outline { width, height });
    }

    pub fn resolve_grid(&mut self, grid: &Grid) -> Result<(), ResolveError> {
        tracing::debug!(
            "Resolving grid at origin {:?} (pitch {}, mirrored {}) with {} component(s)",
            grid.metadata.origin,
            grid.metadata.pitch,
            grid.metadata.mirrored,
            grid.components.len()
        );
        for component in &grid.components {
            self.resolve_component(component, &grid.metadata, None)?;
        }
        Ok(())
    }

    /// Resolve one component, and its children for a `SharedBus`.
    ///
    /// On error nothing is emitted for the failing primitive; output from
    /// earlier siblings stays in place.
    pub fn resolve_component(
        &mut self,
        component: &GridComponent,
        grid: &GridMetadata,
        ambient: Option<BusHandle>,
    ) -> Result<(), ResolveError> {
        match component {
            GridComponent::DrilledRun { id, cell_range } => {
                self.resolve_run(id, cell_range, grid, true, ambient)
            }
            GridComponent::PadRun { id, cell_range } => {
                self.resolve_run(id, cell_range, grid, false, ambient)
            }
            GridComponent::RowSweep { id, cell_range } => {
                self.resolve_row_sweep(id, cell_range, grid, ambient)
            }
            GridComponent::ColumnSweep { id, cell_range } => {
                self.resolve_column_sweep(id, cell_range, grid, ambient)
            }
            GridComponent::SharedBus { id, children } => {
                // Nested shared buses keep feeding the outermost one.
                let bus = match ambient {
                    Some(bus) => bus,
                    None => self.open_bus(id)?,
                };
                for child in children {
                    self.resolve_component(child, grid, Some(bus))?;
                }
                Ok(())
            }
        }
    }

    pub fn finish(self) -> Resolution {
        Resolution {
            geometry: self.geometry,
            topology: self.topology,
        }
    }

    fn open_bus(&mut self, id: &str) -> Result<BusHandle, ResolveError> {
        if !self.bus_ids.insert(id.to_string()) {
            return Err(ResolveError::DuplicateId(id.to_string()));
        }
        tracing::debug!("Opening bus {:?}", id);
        self.topology.buses.push(Bus {
            id: id.to_string(),
            members: Vec::new(),
        });
        Ok(BusHandle(self.topology.buses.len() - 1))
    }

    /// Reserve a set of drawn ids, all or nothing.
    fn claim_drawn_ids(&mut self, ids: &[String]) -> Result<(), ResolveError> {
        let mut fresh = HashSet::with_capacity(ids.len());
        for id in ids {
            if self.drawn_ids.contains(id) || !fresh.insert(id.as_str()) {
                return Err(ResolveError::DuplicateId(id.clone()));
            }
        }
        self.drawn_ids.extend(ids.iter().cloned());
        Ok(())
    }

    fn resolve_run(
        &mut self,
        id: &str,
        cell_range: &CellRange,
        grid: &GridMetadata,
        drilled: bool,
        ambient: Option<BusHandle>,
    ) -> Result<(), ResolveError> {
        let start = coord_to_position(cell_range.start, grid);
        let end = coord_to_position(cell_range.end, grid);
        if !(start.x == end.x || start.y == end.y) {
            return Err(ResolveError::RangeShape {
                id: id.to_string(),
                range: cell_range.to_string(),
            });
        }

        self.emit_run(id, cell_range.start, cell_range.end, grid, drilled, ambient)
    }

    fn resolve_row_sweep(
        &mut self,
        id: &str,
        cell_range: &CellRange,
        grid: &GridMetadata,
        ambient: Option<BusHandle>,
    ) -> Result<(), ResolveError> {
        let (start, end) = (cell_range.start, cell_range.end);
        let first_row = start.row.min(end.row);
        let last_row = start.row.max(end.row);

        for (index, row) in (first_row..=last_row).enumerate() {
            let prefix = format!("{}-{}", id, index);
            self.emit_run(
                &prefix,
                GridCoord::new(start.col, row),
                GridCoord::new(end.col, row),
                grid,
                true,
                ambient,
            )?;
        }
        Ok(())
    }

    fn resolve_column_sweep(
        &mut self,
        id: &str,
        cell_range: &CellRange,
        grid: &GridMetadata,
        ambient: Option<BusHandle>,
    ) -> Result<(), ResolveError> {
        let (start, end) = (cell_range.start, cell_range.end);
        let first_col = start.col.min(end.col);
        let last_col = start.col.max(end.col);

        for (index, col) in (first_col..=last_col).enumerate() {
            let prefix = format!("{}-{}", id, index);
            self.emit_run(
                &prefix,
                GridCoord::new(col, start.row),
                GridCoord::new(col, end.row),
                grid,
                true,
                ambient,
            )?;
        }
        Ok(())
    }

    /// Trace plus one hole/connector per position of a straight run.
    ///
    /// Without an ambient bus the run opens its own, named `prefix`.
    fn emit_run(
        &mut self,
        prefix: &str,
        start: GridCoord,
        end: GridCoord,
        grid: &GridMetadata,
        drilled: bool,
        ambient: Option<BusHandle>,
    ) -> Result<(), ResolveError> {
        let span = positions_between(start, end, grid);
        let trace_id = format!("{}-trace", prefix);
        let connector_ids: Vec<String> = (0..span.len())
            .map(|index| format!("{}-{}", prefix, index))
            .collect();

        if ambient.is_none() && self.bus_ids.contains(prefix) {
            return Err(ResolveError::DuplicateId(prefix.to_string()));
        }
        let mut drawn = connector_ids.clone();
        drawn.push(trace_id.clone());
        self.claim_drawn_ids(&drawn)?;
        let bus = match ambient {
            Some(bus) => bus,
            None => self.open_bus(prefix)?,
        };

        self.geometry.push(DrawOp::Line {
            id: trace_id,
            from: coord_to_position(start, grid),
            to: coord_to_position(end, grid),
        });

        let kind = ConnectorKind::from_drilled(drilled);
        for (connector_id, center) in connector_ids.into_iter().zip(span.iter()) {
            self.geometry.push(DrawOp::Hole {
                id: connector_id.clone(),
                center,
                drilled,
            });
            self.topology.buses[bus.0].members.push(connector_id.clone());
            self.topology.connectors.push(Connector {
                id: connector_id.clone(),
                kind,
                svg_id: connector_id,
            });
        }
        Ok(())
    }
}

/// Resolve a whole board: outline first, then every grid in order.
pub fn resolve_board(board: &BoardSpecification) -> Result<Resolution, ResolveError> {
    let mut resolver = Resolver::new();
    resolver.outline(board.width, board.height);

    for grid in board.grids() {
        resolver.resolve_grid(grid)?;
    }

    let resolution = resolver.finish();
    let stats = resolution.stats();
    tracing::info!(
        "Resolved board {:?}: {} holes, {} connectors, {} buses",
        board.meta.id,
        stats.holes,
        stats.connectors,
        stats.buses
    );
    Ok(resolution)
}
