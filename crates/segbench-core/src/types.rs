//! Typed boxes compared by the benchmark and the boxes it reports.

use crate::geometry::Rectangle;
use crate::label_type::LabelType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything that occupies a rectangle on a page.
pub trait Bounded {
    fn bounding_box(&self) -> &Rectangle;
}

/// One ground-truth region produced by an annotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LabelBox {
    pub bounding_box: Rectangle,
    pub label_type: LabelType,
}

impl LabelBox {
    #[inline]
    #[must_use]
    pub const fn new(bounding_box: Rectangle, label_type: LabelType) -> Self {
        Self {
            bounding_box,
            label_type,
        }
    }
}

impl Bounded for LabelBox {
    #[inline]
    fn bounding_box(&self) -> &Rectangle {
        &self.bounding_box
    }
}

/// One region produced by the segmentation model.
///
/// `segment_type` is the model's free-form type string (e.g. `"Text"`,
/// `"Section header"`). Identity covers text, type and box.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PredictionBox {
    pub text: String,
    pub segment_type: String,
    pub bounding_box: Rectangle,
}

impl PredictionBox {
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, segment_type: impl Into<String>, bounding_box: Rectangle) -> Self {
        Self {
            text: text.into(),
            segment_type: segment_type.into(),
            bounding_box,
        }
    }
}

impl Bounded for PredictionBox {
    #[inline]
    fn bounding_box(&self) -> &Rectangle {
        &self.bounding_box
    }
}

/// Final verdict for one label or one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    /// Label matched by the model.
    #[serde(rename = "FOUND LABEL")]
    FoundLabel,
    /// Prediction matched a label.
    #[serde(rename = "CORRECT")]
    Correct,
    /// Label the model missed.
    #[serde(rename = "NOT FOUND LABEL")]
    NotFoundLabel,
    /// Prediction with no valid ground truth.
    #[serde(rename = "MISTAKE")]
    Mistake,
    /// Prediction over a label but with an incompatible type.
    #[serde(rename = "WRONG TOKEN TYPE")]
    WrongTokenType,
}

impl Outcome {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FoundLabel => "FOUND LABEL",
            Self::Correct => "CORRECT",
            Self::NotFoundLabel => "NOT FOUND LABEL",
            Self::Mistake => "MISTAKE",
            Self::WrongTokenType => "WRONG TOKEN TYPE",
        }
    }

    /// Whether this outcome describes a ground-truth label.
    #[inline]
    #[must_use]
    pub const fn is_label_outcome(self) -> bool {
        matches!(self, Self::FoundLabel | Self::NotFoundLabel)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified region, ready for reporting and overlay drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBox {
    /// Page number as used in the input files (1-based).
    pub page_number: u32,
    /// Page height in page units; 0 when unknown.
    pub page_height: f64,
    /// Label type name or predicted segment type.
    pub segment_type: String,
    pub outcome: Outcome,
    pub bounding_box: Rectangle,
}

impl ResultBox {
    /// Tag drawn next to the box in overlays, e.g. `"Text | CORRECT"`.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{} | {}", self.segment_type, self.outcome)
    }
}
