//! YAML board specification loader
//!
//! Reads the on-disk document, fills defaults, assigns identifiers to
//! anything declared without one and checks every cell range lexically.
//! The result is a [`BoardSpecification`] whose resolution is a pure
//! function of its contents.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use uuid::Uuid;

use super::schema::{
    BoardMetadata, BoardSpecification, Grid, GridComponent, GridDefinition, GridMetadata,
    DEFAULT_PITCH,
};
use crate::grid::{CellError, CellRange};

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_AUTHOR: &str = "Stripboard Generator";
pub const DEFAULT_TAXONOMY: &str = "prototyping.perfboard.perfboard";
pub const DEFAULT_DESCRIPTION: &str = "Stripboard generated by the stripboard part generator";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid cell range in component {id:?}: {source}")]
    Cell {
        id: String,
        #[source]
        source: CellError,
    },

    #[error("Unhandled component type (keys: {0})")]
    UnhandledVariant(String),

    #[error("Component id {0:?} is declared more than once")]
    DuplicateId(String),

    #[error("Invalid board specification: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BoardDocument {
    meta: MetaDocument,
    width: f64,
    height: f64,
    #[serde(default)]
    board: Vec<GridDefinitionDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MetaDocument {
    id: Option<String>,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default = "default_author")]
    author: String,
    title: String,
    date: Option<DateTime<Utc>>,
    label: String,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    #[serde(default = "default_taxonomy")]
    taxonomy: String,
    #[serde(default = "default_description")]
    description: String,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

fn default_taxonomy() -> String {
    DEFAULT_TAXONOMY.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

fn default_pitch() -> f64 {
    DEFAULT_PITCH
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridDefinitionDocument {
    grid: GridDocument,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridDocument {
    #[serde(default)]
    origin: (f64, f64),
    #[serde(default = "default_pitch")]
    pitch: f64,
    #[serde(default)]
    mirrored: bool,
    #[serde(default)]
    components: Vec<ComponentDocument>,
}

/// Scalar ids such as `id: 7` are read as their text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            IdValue::Text(text) => text,
            IdValue::Integer(value) => value.to_string(),
            IdValue::Float(value) => value.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdValue>::deserialize(deserializer)?.map(IdValue::into_string))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DrilledDocument {
    drilled: String,
    #[serde(default, deserialize_with = "deserialize_id")]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PadDocument {
    bus: String,
    #[serde(default, deserialize_with = "deserialize_id")]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RowsDocument {
    drilled_rows: String,
    #[serde(default, deserialize_with = "deserialize_id")]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnsDocument {
    drilled_columns: String,
    #[serde(default, deserialize_with = "deserialize_id")]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SharedBusDocument {
    shared_bus: Vec<ComponentDocument>,
    #[serde(default, deserialize_with = "deserialize_id")]
    id: Option<String>,
}

/// Components are told apart by which key they carry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ComponentDocument {
    Drilled(DrilledDocument),
    Pad(PadDocument),
    Rows(RowsDocument),
    Columns(ColumnsDocument),
    SharedBus(SharedBusDocument),
    Unknown(serde_yaml::Mapping),
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

fn parse_range(id: &str, range: &str) -> Result<CellRange, ConfigError> {
    CellRange::parse(range).map_err(|source| ConfigError::Cell {
        id: id.to_string(),
        source,
    })
}

fn convert_component(document: ComponentDocument) -> Result<GridComponent, ConfigError> {
    let component = match document {
        ComponentDocument::Drilled(doc) => {
            let id = doc.id.unwrap_or_else(generate_id);
            let cell_range = parse_range(&id, &doc.drilled)?;
            GridComponent::DrilledRun { id, cell_range }
        }
        ComponentDocument::Pad(doc) => {
            let id = doc.id.unwrap_or_else(generate_id);
            let cell_range = parse_range(&id, &doc.bus)?;
            GridComponent::PadRun { id, cell_range }
        }
        ComponentDocument::Rows(doc) => {
            let id = doc.id.unwrap_or_else(generate_id);
            let cell_range = parse_range(&id, &doc.drilled_rows)?;
            GridComponent::RowSweep { id, cell_range }
        }
        ComponentDocument::Columns(doc) => {
            let id = doc.id.unwrap_or_else(generate_id);
            let cell_range = parse_range(&id, &doc.drilled_columns)?;
            GridComponent::ColumnSweep { id, cell_range }
        }
        ComponentDocument::SharedBus(doc) => {
            let id = doc.id.unwrap_or_else(generate_id);
            let children = doc
                .shared_bus
                .into_iter()
                .map(convert_component)
                .collect::<Result<Vec<_>, _>>()?;
            GridComponent::SharedBus { id, children }
        }
        ComponentDocument::Unknown(mapping) => {
            let keys: Vec<String> = mapping
                .iter()
                .map(|(key, _)| match key.as_str() {
                    Some(name) => name.to_string(),
                    None => format!("{:?}", key),
                })
                .collect();
            return Err(ConfigError::UnhandledVariant(keys.join(", ")));
        }
    };
    Ok(component)
}

fn convert_grid(document: GridDocument) -> Result<Grid, ConfigError> {
    if !(document.pitch.is_finite() && document.pitch > 0.0) {
        return Err(ConfigError::Invalid(format!(
            "grid pitch must be a positive number, got {}",
            document.pitch
        )));
    }

    let components = document
        .components
        .into_iter()
        .map(convert_component)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Grid {
        metadata: GridMetadata {
            origin: document.origin,
            pitch: document.pitch,
            mirrored: document.mirrored,
        },
        components,
    })
}

/// Component ids are unique across the whole board, shared buses included.
fn check_unique_ids<'a>(
    components: impl IntoIterator<Item = &'a GridComponent>,
    seen: &mut HashSet<&'a str>,
) -> Result<(), ConfigError> {
    for component in components {
        if !seen.insert(component.id()) {
            return Err(ConfigError::DuplicateId(component.id().to_string()));
        }
        if let GridComponent::SharedBus { children, .. } = component {
            check_unique_ids(children, seen)?;
        }
    }
    Ok(())
}

impl BoardDocument {
    fn into_specification(self) -> Result<BoardSpecification, ConfigError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "board {} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let meta = BoardMetadata {
            id: self.meta.id.unwrap_or_else(generate_id),
            version: self.meta.version,
            author: self.meta.author,
            title: self.meta.title,
            date: self.meta.date.unwrap_or_else(Utc::now),
            label: self.meta.label,
            properties: self.meta.properties,
            taxonomy: self.meta.taxonomy,
            description: self.meta.description,
        };

        let board = self
            .board
            .into_iter()
            .map(|definition| convert_grid(definition.grid).map(|grid| GridDefinition { grid }))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        for definition in &board {
            check_unique_ids(&definition.grid.components, &mut seen)?;
        }

        Ok(BoardSpecification {
            meta,
            width: self.width,
            height: self.height,
            board,
        })
    }
}

impl BoardSpecification {
    /// Parse a YAML board document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let document: BoardDocument = serde_yaml::from_str(yaml)?;
        let specification = document.into_specification()?;
        tracing::debug!(
            "Loaded board {:?} with {} grid(s)",
            specification.meta.id,
            specification.board.len()
        );
        Ok(specification)
    }

    /// Read and parse a YAML board document from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}
