//! Benchmarking a single page.

use crate::classifier::{PageClassification, PageClassifier, PredictionVerdict};
use crate::geometry::Rectangle;
use crate::overlap::OverlapIndex;
use crate::thresholds::MatchThresholds;
use crate::types::{LabelBox, Outcome, PredictionBox, ResultBox};
use log::debug;
use std::collections::HashSet;
use std::hash::Hash;

/// Labels and predictions of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Page number as used in the input files.
    pub number: u32,
    /// Page height in page units; 0 when unknown.
    pub height: f64,
    labels: Vec<LabelBox>,
    predictions: Vec<PredictionBox>,
}

/// Drop value-identical duplicates, keeping first occurrences in order.
fn dedup_in_order<T: Clone + Eq + Hash>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

impl Page {
    /// Build a page; identical labels or predictions collapse to one element.
    #[must_use]
    pub fn new(
        number: u32,
        height: f64,
        labels: Vec<LabelBox>,
        predictions: Vec<PredictionBox>,
    ) -> Self {
        Self {
            number,
            height,
            labels: dedup_in_order(labels),
            predictions: dedup_in_order(predictions),
        }
    }

    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[LabelBox] {
        &self.labels
    }

    #[inline]
    #[must_use]
    pub fn predictions(&self) -> &[PredictionBox] {
        &self.predictions
    }

    /// Run the overlap index and all classification phases.
    #[must_use]
    pub fn classify(&self, thresholds: &MatchThresholds) -> PageClassification {
        let index = OverlapIndex::build(&self.labels, &self.predictions, thresholds);
        PageClassifier::new(&self.labels, &self.predictions, &index, thresholds).classify()
    }

    /// Classify the page and turn the verdicts into result boxes.
    ///
    /// A page without labels yields no boxes at all, whatever the model
    /// predicted on it. Skip-listed predictions are only reported when
    /// correct.
    #[must_use]
    pub fn benchmark(&self, thresholds: &MatchThresholds) -> Vec<ResultBox> {
        if self.labels.is_empty() {
            debug!("page {} has no labels, skipping", self.number);
            return Vec::new();
        }
        let classification = self.classify(thresholds);
        let boxes = self.result_boxes(&classification);
        debug!(
            "page {}: {} labels, {} predictions, {} result boxes",
            self.number,
            self.labels.len(),
            self.predictions.len(),
            boxes.len()
        );
        boxes
    }

    fn result_box(&self, segment_type: &str, outcome: Outcome, bounding_box: Rectangle) -> ResultBox {
        ResultBox {
            page_number: self.number,
            page_height: self.height,
            segment_type: segment_type.to_string(),
            outcome,
            bounding_box,
        }
    }

    /// Result boxes grouped by outcome in [`Outcome`] declaration order, each group
    /// in input order.
    fn result_boxes(&self, classification: &PageClassification) -> Vec<ResultBox> {
        let labelled = self
            .labels
            .iter()
            .zip(classification.label_verdicts())
            .map(|(label, verdict)| {
                self.result_box(label.label_type.name(), verdict.into(), label.bounding_box)
            });
        let predicted = self
            .predictions
            .iter()
            .zip(classification.prediction_verdicts())
            .enumerate()
            .filter(|(index, (_, verdict))| {
                *verdict == PredictionVerdict::Correct || !classification.is_skipped(*index)
            })
            .map(|(_, (prediction, verdict))| {
                self.result_box(&prediction.segment_type, verdict.into(), prediction.bounding_box)
            });

        let mut boxes: Vec<ResultBox> = labelled.chain(predicted).collect();
        // Stable sort keeps input order within each outcome
        boxes.sort_by_key(|result| result.outcome);
        boxes
    }
}
