//! # Segbench Core - Layout Segmentation Benchmark Engine
//!
//! Scores the output of a document layout segmentation model against
//! human-annotated ground truth. Each page's labels and predicted segments
//! are matched geometrically, every element receives exactly one outcome,
//! and outcomes are aggregated into per-document and corpus accuracy.
//!
//! ## Quick Start
//!
//! ```rust
//! use segbench_core::{LabelBox, LabelType, MatchThresholds, Outcome, Page, PredictionBox, Rectangle};
//!
//! # fn main() -> segbench_core::Result<()> {
//! let label = LabelBox::new(Rectangle::new(0.0, 0.0, 100.0, 20.0)?, LabelType::Text);
//! let prediction = PredictionBox::new("Intro", "Text", Rectangle::new(0.0, 0.0, 100.0, 20.0)?);
//!
//! let page = Page::new(1, 842.0, vec![label], vec![prediction]);
//! let boxes = page.benchmark(&MatchThresholds::default());
//!
//! assert_eq!(boxes[0].outcome, Outcome::FoundLabel);
//! assert_eq!(boxes[1].outcome, Outcome::Correct);
//! # Ok(())
//! # }
//! ```
//!
//! ## Outcomes
//!
//! | Outcome | Element | Meaning |
//! |---------|---------|---------|
//! | `FOUND LABEL` | label | matched by correctly typed predictions |
//! | `NOT FOUND LABEL` | label | missed, split badly or typed wrongly |
//! | `CORRECT` | prediction | matches a label |
//! | `MISTAKE` | prediction | no valid ground truth |
//! | `WRONG TOKEN TYPE` | prediction | right place, incompatible type |
//!
//! Only Title, Text and Section header labels are benchmarked.
//!
//! ## Matching
//!
//! Overlap is deliberately asymmetric: a target overlaps a source when more
//! than 20% of the target lies in the source, or more than 90% of the
//! source lies in the target. See [`MatchThresholds`].

pub mod classifier;
pub mod document;
pub mod error;
pub mod geometry;
pub mod input;
pub mod label_type;
pub mod metrics;
pub mod overlap;
pub mod page;
pub mod thresholds;
pub mod types;

pub use classifier::{
    majority_segment_type, LabelVerdict, PageClassification, PageClassifier, Phase, PredictionVerdict,
};
pub use document::{assemble_page, benchmark_document};
pub use error::*;
pub use geometry::Rectangle;
pub use input::{LabelFile, LabelPage, LabelRecord, PredictionRecord};
pub use label_type::LabelType;
pub use metrics::{accuracy, BenchmarkResult, CorpusReport, OutcomeCounts, AVERAGE_ROW};
pub use overlap::{intersecting_elements, OverlapIndex};
pub use page::Page;
pub use thresholds::MatchThresholds;
pub use types::{Bounded, LabelBox, Outcome, PredictionBox, ResultBox};
