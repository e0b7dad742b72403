//! On-disk formats of the ground-truth label file and the prediction file.
//!
//! Both formats are JSON. Fields not listed here are ignored so files
//! produced by newer annotation tools or models still load.

use crate::error::{Result, SegbenchError};
use crate::geometry::Rectangle;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Ground truth of one document: `{ "pages": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelFile {
    #[serde(default)]
    pub pages: Vec<LabelPage>,
}

/// Labels of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelPage {
    pub number: u32,
    #[serde(default)]
    pub labels: Vec<LabelRecord>,
}

/// One annotated region as stored in the label file.
///
/// `label_type` stays a raw index here; unknown indices are tolerated at
/// load time and dropped when the page is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub label_type: u32,
}

impl LabelRecord {
    /// # Errors
    ///
    /// Returns [`SegbenchError::InvalidRectangle`] for negative sizes.
    #[inline]
    pub fn bounding_box(&self) -> Result<Rectangle> {
        Rectangle::from_width_height(self.left, self.top, self.width, self.height)
    }
}

/// One predicted segment as stored in the prediction file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub page_number: u32,
    #[serde(default)]
    pub page_height: f64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type")]
    pub segment_type: String,
}

impl PredictionRecord {
    /// # Errors
    ///
    /// Returns [`SegbenchError::InvalidRectangle`] for negative sizes.
    #[inline]
    pub fn bounding_box(&self) -> Result<Rectangle> {
        Rectangle::from_width_height(self.left, self.top, self.width, self.height)
    }
}

impl LabelFile {
    /// Load a label file from disk.
    ///
    /// # Errors
    ///
    /// [`SegbenchError::MissingGroundTruth`] if the file does not exist,
    /// [`SegbenchError::Io`] or [`SegbenchError::Json`] otherwise.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SegbenchError::MissingGroundTruth(path.to_path_buf())
            } else {
                SegbenchError::io(path, e)
            }
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Parse a label file; `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`SegbenchError::Json`] when the content does not match the schema.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| SegbenchError::json(origin, e))
    }
}

/// Load a prediction file from disk.
///
/// # Errors
///
/// [`SegbenchError::Io`] or [`SegbenchError::Json`].
pub fn load_predictions(path: &Path) -> Result<Vec<PredictionRecord>> {
    let file = File::open(path).map_err(|e| SegbenchError::io(path, e))?;
    read_predictions(BufReader::new(file), path)
}

/// Parse a prediction file; `origin` is only used in error messages.
///
/// # Errors
///
/// Returns [`SegbenchError::Json`] when the content does not match the schema.
pub fn read_predictions<R: Read>(reader: R, origin: &Path) -> Result<Vec<PredictionRecord>> {
    serde_json::from_reader(reader).map_err(|e| SegbenchError::json(origin, e))
}
