//! Error types for zone template loading and zone building.

use thiserror::Error;

/// Errors that can occur while loading a zone template or building a zone from it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    /// No template registered under this name.
    #[error("Zone template not found: {0}")]
    TemplateNotFound(String),

    /// Template file could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// Template is structurally unusable.
    #[error("Malformed zone template '{name}': {reason}")]
    Malformed { name: String, reason: String },

    /// A tile row has a different width than the first row.
    #[error("Grid mismatch in '{name}': row {row} has {actual} cells, expected {expected}")]
    GridMismatch {
        name: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Invalid palette reference.
    #[error("Unknown palette entry '{character}' in '{name}' at position ({x}, {y})")]
    UnknownPaletteEntry {
        name: String,
        character: char,
        x: usize,
        y: usize,
    },

    /// The asset resolver does not know a tile image.
    #[error("Asset '{key}' for zone '{zone}' at ({x}, {y}) could not be resolved")]
    AssetResolution {
        key: String,
        zone: String,
        x: u32,
        y: u32,
    },
}

impl ZoneError {
    /// True for errors caused by the template's content rather than I/O.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ZoneError::Malformed { .. } | ZoneError::GridMismatch { .. } | ZoneError::UnknownPaletteEntry { .. }
        )
    }
}
