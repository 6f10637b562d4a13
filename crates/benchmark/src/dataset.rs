//! Benchmark jobs: a named cutlist with its stock.

use panelcut_core::geometry::{EdgeBanding, Grain, LaminationType, PartSpec, StockSheetSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading jobs.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid job: {0}")]
    InvalidFormat(String),

    #[error("Unknown built-in job: {0}")]
    UnknownJob(String),
}

/// Summary of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    /// Job name
    pub name: String,
    /// Number of part types
    pub part_types: usize,
    /// Total units when quantities are expanded
    pub total_units: usize,
    /// Summed area of all units (mm²)
    pub total_part_area: f64,
    /// Number of sheet types
    pub sheet_types: usize,
}

/// A packing job.
///
/// ```json
/// {
///   "name": "kitchen",
///   "parts": [{ "id": "SIDE", "length": 720, "width": 560, "quantity": 4 }],
///   "sheets": [{ "id": "MDF", "length": 2750, "width": 1830, "kerf": 4 }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Job name
    pub name: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parts to cut
    pub parts: Vec<PartSpec>,
    /// Available stock
    pub sheets: Vec<StockSheetSpec>,
}

impl Job {
    /// Creates a job.
    pub fn new(name: impl Into<String>, parts: Vec<PartSpec>, sheets: Vec<StockSheetSpec>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parts,
            sheets,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Loads a job from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, JobError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a job from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, JobError> {
        let job: Job = serde_json::from_str(json)?;
        if job.sheets.is_empty() {
            return Err(JobError::InvalidFormat(format!(
                "{}: at least one sheet type is required",
                job.name
            )));
        }
        Ok(job)
    }

    /// Serializes the job as pretty JSON.
    pub fn to_json(&self) -> Result<String, JobError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns job information.
    pub fn info(&self) -> JobInfo {
        JobInfo {
            name: self.name.clone(),
            part_types: self.parts.len(),
            total_units: self.parts.iter().map(|p| p.quantity).sum(),
            total_part_area: self.parts.iter().map(|p| p.area() * p.quantity as f64).sum(),
            sheet_types: self.sheets.len(),
        }
    }

    /// Names of the built-in jobs.
    pub fn builtin_names() -> Vec<&'static str> {
        vec!["cabinet", "wardrobe", "tall-strip"]
    }

    /// Returns a built-in job by name.
    pub fn builtin(name: &str) -> Result<Self, JobError> {
        let board = || StockSheetSpec::new("MDF-18", 2750.0, 1830.0).with_kerf(4.0);
        let banded = EdgeBanding {
            top: true,
            bottom: true,
            left: false,
            right: false,
        };

        let job = match name {
            "cabinet" => Job::new(
                "cabinet",
                vec![
                    PartSpec::new("SIDE", 720.0, 560.0)
                        .with_quantity(4)
                        .with_edge_banding(banded),
                    PartSpec::new("BOTTOM", 764.0, 560.0).with_quantity(2),
                    PartSpec::new("SHELF", 764.0, 540.0)
                        .with_quantity(4)
                        .with_edge_banding(banded),
                    PartSpec::new("DOOR", 715.0, 396.0)
                        .with_quantity(4)
                        .with_grain(Grain::Length)
                        .with_edge_banding(EdgeBanding::all()),
                    PartSpec::new("RAIL", 764.0, 100.0).with_quantity(4),
                ],
                vec![board()],
            )
            .with_description("Two base cabinets with doors"),
            "wardrobe" => Job::new(
                "wardrobe",
                vec![
                    PartSpec::new("SIDE", 2200.0, 580.0)
                        .with_quantity(3)
                        .with_grain(Grain::Length)
                        .with_edge_banding(banded),
                    PartSpec::new("TOP", 1164.0, 580.0).with_quantity(2),
                    PartSpec::new("SHELF", 564.0, 560.0)
                        .with_quantity(8)
                        .with_edge_banding(banded),
                    PartSpec::new("DOOR", 2190.0, 595.0)
                        .with_quantity(2)
                        .with_grain(Grain::Length)
                        .with_lamination(LaminationType::WithBacker)
                        .with_edge_banding(EdgeBanding::all()),
                    PartSpec::new("DRAWER", 560.0, 180.0)
                        .with_quantity(6)
                        .with_grain(Grain::Width),
                ],
                vec![board()],
            )
            .with_description("Two-door wardrobe with drawers"),
            "tall-strip" => Job::new(
                "tall-strip",
                vec![
                    PartSpec::new("STRIP", 2600.0, 120.0),
                    PartSpec::new("PANEL", 800.0, 600.0).with_quantity(6),
                ],
                vec![board()],
            )
            .with_description("One long strip among medium panels"),
            other => return Err(JobError::UnknownJob(other.to_string())),
        };
        Ok(job)
    }
}
