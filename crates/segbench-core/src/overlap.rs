//! Overlap index between the labels and predictions of one page.
//!
//! The index stores positions into the page's label and prediction slices
//! rather than the elements themselves. Lists keep target order, which the
//! classifier relies on for majority-vote tie breaking.

use crate::thresholds::MatchThresholds;
use crate::types::Bounded;

/// For every source element, the indices of the targets overlapping it.
#[must_use = "returns the overlap lists"]
pub fn intersecting_elements<S, T>(
    sources: &[S],
    targets: &[T],
    thresholds: &MatchThresholds,
) -> Vec<Vec<usize>>
where
    S: Bounded,
    T: Bounded,
{
    sources
        .iter()
        .map(|source| {
            targets
                .iter()
                .enumerate()
                .filter(|(_, target)| {
                    thresholds.overlaps(source.bounding_box(), target.bounding_box())
                })
                .map(|(index, _)| index)
                .collect()
        })
        .collect()
}

/// Bidirectional overlap mapping for one page.
///
/// The two directions are computed separately, each with its own source in
/// the denominators of the overlap test, so they are not transposes of
/// each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlapIndex {
    label_to_predictions: Vec<Vec<usize>>,
    prediction_to_labels: Vec<Vec<usize>>,
}

impl OverlapIndex {
    /// Build both directions of the index.
    #[must_use]
    pub fn build<L, P>(labels: &[L], predictions: &[P], thresholds: &MatchThresholds) -> Self
    where
        L: Bounded,
        P: Bounded,
    {
        Self {
            label_to_predictions: intersecting_elements(labels, predictions, thresholds),
            prediction_to_labels: intersecting_elements(predictions, labels, thresholds),
        }
    }

    /// Predictions overlapping the label at `label`.
    #[inline]
    #[must_use]
    pub fn predictions_of(&self, label: usize) -> &[usize] {
        self.label_to_predictions
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Labels overlapping the prediction at `prediction`.
    #[inline]
    #[must_use]
    pub fn labels_of(&self, prediction: usize) -> &[usize] {
        self.prediction_to_labels
            .get(prediction)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether some label lists `prediction` among its overlaps.
    #[must_use]
    pub fn is_claimed(&self, prediction: usize) -> bool {
        self.label_to_predictions
            .iter()
            .any(|predictions| predictions.contains(&prediction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;
    use crate::label_type::LabelType;
    use crate::types::{LabelBox, PredictionBox};

    fn label(l: f64, t: f64, r: f64, b: f64) -> LabelBox {
        LabelBox::new(Rectangle::new(l, t, r, b).unwrap(), LabelType::Text)
    }

    fn prediction(l: f64, t: f64, r: f64, b: f64) -> PredictionBox {
        PredictionBox::new("", "Text", Rectangle::new(l, t, r, b).unwrap())
    }

    #[test]
    fn test_identical_boxes_overlap_both_ways() {
        let labels = [label(0.0, 0.0, 100.0, 20.0)];
        let predictions = [prediction(0.0, 0.0, 100.0, 20.0)];
        let index = OverlapIndex::build(&labels, &predictions, &MatchThresholds::default());

        assert_eq!(index.predictions_of(0), &[0]);
        assert_eq!(index.labels_of(0), &[0]);
    }

    #[test]
    fn test_disjoint_boxes() {
        let labels = [label(0.0, 0.0, 10.0, 10.0)];
        let predictions = [prediction(50.0, 50.0, 60.0, 60.0)];
        let index = OverlapIndex::build(&labels, &predictions, &MatchThresholds::default());

        assert!(index.predictions_of(0).is_empty());
        assert!(index.labels_of(0).is_empty());
        assert!(!index.is_claimed(0));
    }

    #[test]
    fn test_directions_are_not_transposes() {
        // Overlap counts from the label's side only
        let labels = [label(0.0, 0.0, 100.0, 100.0)];
        let predictions = [prediction(0.0, 0.0, 20.0, 200.0)];
        let index = OverlapIndex::build(&labels, &predictions, &MatchThresholds::default());

        // Half of the prediction lies inside the label
        assert_eq!(index.predictions_of(0), &[0]);
        // Exactly 20% of the label lies inside the prediction
        assert!(index.labels_of(0).is_empty());
        assert!(index.is_claimed(0));
    }

    #[test]
    fn test_target_order_preserved() {
        let labels = [label(0.0, 0.0, 100.0, 40.0)];
        let predictions = [
            prediction(0.0, 20.0, 100.0, 40.0),
            prediction(500.0, 500.0, 510.0, 510.0),
            prediction(0.0, 0.0, 100.0, 20.0),
        ];
        let index = OverlapIndex::build(&labels, &predictions, &MatchThresholds::default());
        assert_eq!(index.predictions_of(0), &[0, 2]);
        assert_eq!(index.labels_of(0), &[0]);
        assert!(index.labels_of(1).is_empty());
        assert_eq!(index.labels_of(2), &[0]);
    }

    #[test]
    fn test_out_of_range_lookups_are_empty() {
        let index = OverlapIndex::default();
        assert!(index.predictions_of(3).is_empty());
        assert!(index.labels_of(3).is_empty());
    }
}
