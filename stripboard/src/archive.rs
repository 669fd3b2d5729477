//! Part bundle packaging.
//!
//! A Fritzing part bundle (`.fzpz`) is a zip holding the part definition
//! and its breadboard drawing. Entry names embed the board id, and that id
//! must match the `moduleId` inside the part definition for the design tool
//! to pair them up.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// The two finished documents for one board.
#[derive(Debug, Clone, PartialEq)]
pub struct PartFiles {
    pub board_id: String,
    pub fzp: String,
    pub svg: String,
}

impl PartFiles {
    pub fn fzp_entry_name(&self) -> String {
        format!("part.{}.fzp", self.board_id)
    }

    pub fn svg_entry_name(&self) -> String {
        format!("svg.breadboard.{}.svg", self.board_id)
    }

    /// Entry name and contents, part definition first.
    pub fn entries(&self) -> [(String, &str); 2] {
        [
            (self.fzp_entry_name(), self.fzp.as_str()),
            (self.svg_entry_name(), self.svg.as_str()),
        ]
    }

    /// Write both documents into a zip archive at `path`.
    pub fn write_archive(&self, path: &Path) -> Result<(), ArchiveError> {
        let file = File::create(path)?;
        let mut archive = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, contents) in self.entries() {
            archive.start_file(name, options)?;
            archive.write_all(contents.as_bytes())?;
        }
        archive.finish()?;

        tracing::info!("Wrote part archive {}", path.display());
        Ok(())
    }

    /// Write both documents as loose files under `dir`, returning their paths.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for (name, contents) in self.entries() {
            let path = dir.join(name);
            std::fs::write(&path, contents)?;
            written.push(path);
        }

        tracing::info!("Wrote part files to {}", dir.display());
        Ok(written)
    }
}
