//! Core build pipeline shared by the CLI and library users.
//! Stateless; every call resolves from scratch.

use std::path::Path;

use crate::archive::{ArchiveError, PartFiles};
use crate::board::config::ConfigError;
use crate::board::schema::BoardSpecification;
use crate::render::{render_fzp, render_svg};
use crate::topology::{resolve_board, Resolution, ResolveError};

#[derive(Debug, thiserror::Error)]
pub enum StripboardError {
    #[error("Parse error: {0}")]
    Parse(#[from] ConfigError),
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

impl From<std::fmt::Error> for StripboardError {
    fn from(_: std::fmt::Error) -> Self {
        StripboardError::Other("failed to format output document".to_string())
    }
}

/// Build API used by the CLI.
pub struct StripboardCore;

impl StripboardCore {
    /// Resolve a board into geometry and bus topology without rendering.
    pub fn resolve(board: &BoardSpecification) -> Result<Resolution, StripboardError> {
        Ok(resolve_board(board)?)
    }

    /// Resolve once and render both documents from the same resolution.
    pub fn build(board: &BoardSpecification) -> Result<PartFiles, StripboardError> {
        let resolution = Self::resolve(board)?;
        Self::render(board, &resolution)
    }

    pub fn render(
        board: &BoardSpecification,
        resolution: &Resolution,
    ) -> Result<PartFiles, StripboardError> {
        Ok(PartFiles {
            board_id: board.meta.id.clone(),
            fzp: render_fzp(board, resolution)?,
            svg: render_svg(board, resolution)?,
        })
    }

    /// Load a YAML spec, build it and write the part archive.
    pub fn build_archive(spec_path: &Path, output: &Path) -> Result<PartFiles, StripboardError> {
        let board = BoardSpecification::load(spec_path)?;
        let part = Self::build(&board)?;
        part.write_archive(output)?;
        Ok(part)
    }
}
