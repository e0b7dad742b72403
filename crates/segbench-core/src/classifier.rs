//! Per-page classification of labels and predictions.
//!
//! Every element owns one outcome slot that is written at most once.
//! Classification runs in fixed phases and the first phase that decides an
//! element wins:
//!
//! 1. [`Phase::Ambiguity`]: many-to-many overlaps are rejected outright.
//! 2. [`Phase::LabelDriven`]: labels with zero or several predictions.
//! 3. [`Phase::PredictionDriven`]: everything still open, seen from the
//!    prediction side.
//! 4. [`Phase::Sealing`]: labels nobody decided are misses.
//!
//! Later phases may still look at decided elements (a prediction marked
//! wrong-type is re-examined so its labels get decided) but can never
//! change their outcome.

use crate::geometry::Rectangle;
use crate::overlap::OverlapIndex;
use crate::thresholds::MatchThresholds;
use crate::types::{LabelBox, Outcome, PredictionBox};
use log::debug;
use serde::Serialize;

/// Verdict for a ground-truth label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LabelVerdict {
    Found,
    NotFound,
}

impl From<LabelVerdict> for Outcome {
    #[inline]
    fn from(verdict: LabelVerdict) -> Self {
        match verdict {
            LabelVerdict::Found => Self::FoundLabel,
            LabelVerdict::NotFound => Self::NotFoundLabel,
        }
    }
}

/// Verdict for a model prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PredictionVerdict {
    Correct,
    Mistake,
    WrongTokenType,
}

impl From<PredictionVerdict> for Outcome {
    #[inline]
    fn from(verdict: PredictionVerdict) -> Self {
        match verdict {
            PredictionVerdict::Correct => Self::Correct,
            PredictionVerdict::Mistake => Self::Mistake,
            PredictionVerdict::WrongTokenType => Self::WrongTokenType,
        }
    }
}

/// Classification phase that wrote a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Phase {
    Ambiguity,
    LabelDriven,
    PredictionDriven,
    Sealing,
}

/// Write-once outcome slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot<T> {
    decided: Option<(T, Phase)>,
}

impl<T: Copy> Slot<T> {
    const fn empty() -> Self {
        Self { decided: None }
    }

    fn verdict(&self) -> Option<T> {
        self.decided.map(|(verdict, _)| verdict)
    }

    fn phase(&self) -> Option<Phase> {
        self.decided.map(|(_, phase)| phase)
    }

    /// Store `verdict` unless the slot is already decided.
    fn assign(&mut self, verdict: T, phase: Phase) -> bool {
        if self.decided.is_some() {
            return false;
        }
        self.decided = Some((verdict, phase));
        true
    }
}

/// Most frequent type among `segment_types`.
///
/// Ties go to the type seen first, so the result only depends on input
/// order. Returns `None` for an empty input.
#[must_use]
pub fn majority_segment_type<'a, I>(segment_types: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for segment_type in segment_types {
        match counts.iter_mut().find(|(seen, _)| *seen == segment_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((segment_type, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (segment_type, count) in counts {
        // Strictly greater keeps the first-seen type on ties
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((segment_type, count));
        }
    }
    best.map(|(segment_type, _)| segment_type)
}

/// Final verdicts for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageClassification {
    labels: Vec<(LabelVerdict, Phase)>,
    predictions: Vec<(PredictionVerdict, Phase)>,
    skipped: Vec<bool>,
}

impl PageClassification {
    /// Verdict of the label at `index`.
    #[inline]
    #[must_use]
    pub fn label(&self, index: usize) -> Option<LabelVerdict> {
        self.labels.get(index).map(|(verdict, _)| *verdict)
    }

    /// Verdict of the prediction at `index`.
    #[inline]
    #[must_use]
    pub fn prediction(&self, index: usize) -> Option<PredictionVerdict> {
        self.predictions.get(index).map(|(verdict, _)| *verdict)
    }

    /// Phase that decided the label at `index`.
    #[inline]
    #[must_use]
    pub fn label_phase(&self, index: usize) -> Option<Phase> {
        self.labels.get(index).map(|(_, phase)| *phase)
    }

    /// Phase that decided the prediction at `index`.
    #[inline]
    #[must_use]
    pub fn prediction_phase(&self, index: usize) -> Option<Phase> {
        self.predictions.get(index).map(|(_, phase)| *phase)
    }

    /// Whether the prediction at `index` is on the skip-list.
    ///
    /// Skipped predictions are claimed orphans: no label overlaps them from
    /// the prediction's side, yet some label lists them as its overlap.
    /// They are left out of the mistake and wrong-type output.
    #[inline]
    #[must_use]
    pub fn is_skipped(&self, index: usize) -> bool {
        self.skipped.get(index).copied().unwrap_or(false)
    }

    /// Label verdicts in label order.
    pub fn label_verdicts(&self) -> impl Iterator<Item = LabelVerdict> + '_ {
        self.labels.iter().map(|(verdict, _)| *verdict)
    }

    /// Prediction verdicts in prediction order.
    pub fn prediction_verdicts(&self) -> impl Iterator<Item = PredictionVerdict> + '_ {
        self.predictions.iter().map(|(verdict, _)| *verdict)
    }

    /// Indices of skip-listed predictions.
    pub fn skip_list(&self) -> impl Iterator<Item = usize> + '_ {
        self.skipped
            .iter()
            .enumerate()
            .filter(|(_, skipped)| **skipped)
            .map(|(index, _)| index)
    }
}

/// Classifies the labels and predictions of one page.
#[derive(Debug)]
pub struct PageClassifier<'a> {
    labels: &'a [LabelBox],
    predictions: &'a [PredictionBox],
    index: &'a OverlapIndex,
    thresholds: &'a MatchThresholds,
    label_slots: Vec<Slot<LabelVerdict>>,
    prediction_slots: Vec<Slot<PredictionVerdict>>,
}

impl<'a> PageClassifier<'a> {
    /// Create a classifier over a page whose overlap index is already built.
    #[must_use]
    pub fn new(
        labels: &'a [LabelBox],
        predictions: &'a [PredictionBox],
        index: &'a OverlapIndex,
        thresholds: &'a MatchThresholds,
    ) -> Self {
        Self {
            labels,
            predictions,
            index,
            thresholds,
            label_slots: vec![Slot::empty(); labels.len()],
            prediction_slots: vec![Slot::empty(); predictions.len()],
        }
    }

    /// Run every phase and return the final verdicts.
    #[must_use]
    pub fn classify(mut self) -> PageClassification {
        self.resolve_ambiguities();
        self.classify_from_labels();
        self.classify_from_predictions();
        self.seal();
        self.finish()
    }

    fn decide_label(&mut self, label: usize, verdict: LabelVerdict, phase: Phase) {
        if !self.label_slots[label].assign(verdict, phase) {
            debug!(
                "label {label} keeps {:?}, {phase:?} proposed {verdict:?}",
                self.label_slots[label].verdict()
            );
        }
    }

    fn decide_prediction(&mut self, prediction: usize, verdict: PredictionVerdict, phase: Phase) {
        if !self.prediction_slots[prediction].assign(verdict, phase) {
            debug!(
                "prediction {prediction} keeps {:?}, {phase:?} proposed {verdict:?}",
                self.prediction_slots[prediction].verdict()
            );
        }
    }

    /// Reject labels whose predictions also overlap other labels.
    fn resolve_ambiguities(&mut self) {
        let index = self.index;
        for label in 0..self.labels.len() {
            let predictions = index.predictions_of(label);
            if predictions.len() < 2 {
                continue;
            }
            for &prediction in predictions {
                if index.labels_of(prediction).len() > 1 {
                    self.decide_label(label, LabelVerdict::NotFound, Phase::Ambiguity);
                    self.decide_prediction(prediction, PredictionVerdict::Mistake, Phase::Ambiguity);
                }
            }
        }
    }

    /// Decide labels with no predictions or with several predictions.
    ///
    /// Labels with exactly one prediction are left to the prediction phase.
    fn classify_from_labels(&mut self) {
        let index = self.index;
        for label in 0..self.labels.len() {
            if self.label_slots[label].verdict().is_some() {
                continue;
            }
            let predictions = index.predictions_of(label);
            match predictions.len() {
                0 => self.decide_label(label, LabelVerdict::NotFound, Phase::LabelDriven),
                1 => {}
                _ => self.classify_split_label(label, predictions),
            }
        }
    }

    /// A label covered by several predictions: vote on the type, then
    /// check how well the merged predictions cover it.
    fn classify_split_label(&mut self, label: usize, predictions: &[usize]) {
        let all_predictions = self.predictions;
        let label_box = self.labels[label];
        let majority = majority_segment_type(
            predictions
                .iter()
                .map(|&p| all_predictions[p].segment_type.as_str()),
        );

        if !majority.is_some_and(|segment_type| label_box.label_type.accepts(segment_type)) {
            debug!(
                "label {label} ({}) majority type {majority:?} not accepted",
                label_box.label_type
            );
            self.decide_label(label, LabelVerdict::NotFound, Phase::LabelDriven);
            for &prediction in predictions {
                self.decide_prediction(prediction, PredictionVerdict::WrongTokenType, Phase::LabelDriven);
            }
            return;
        }

        let merged = Rectangle::merge(predictions.iter().map(|&p| &all_predictions[p].bounding_box));
        let matched = merged.is_some_and(|merged| {
            self.thresholds
                .merged_matches(&merged, &label_box.bounding_box)
        });

        if matched {
            self.decide_label(label, LabelVerdict::Found, Phase::LabelDriven);
            for &prediction in predictions {
                self.decide_prediction(prediction, PredictionVerdict::Correct, Phase::LabelDriven);
            }
        } else {
            self.decide_label(label, LabelVerdict::NotFound, Phase::LabelDriven);
        }
    }

    /// Decide every prediction not already correct or a mistake.
    fn classify_from_predictions(&mut self) {
        let index = self.index;
        let all_labels = self.labels;
        let all_predictions = self.predictions;
        for (prediction, prediction_box) in all_predictions.iter().enumerate() {
            if matches!(
                self.prediction_slots[prediction].verdict(),
                Some(PredictionVerdict::Correct | PredictionVerdict::Mistake)
            ) {
                continue;
            }
            let labels = index.labels_of(prediction);
            let Some(&first_label) = labels.first() else {
                self.decide_prediction(prediction, PredictionVerdict::Mistake, Phase::PredictionDriven);
                continue;
            };

            // Accepted types come from the first overlapping label
            let accepted = all_labels[first_label]
                .label_type
                .accepts(&prediction_box.segment_type);

            let matched = accepted && {
                let merged = Rectangle::merge(labels.iter().map(|&l| &all_labels[l].bounding_box));
                merged.is_some_and(|merged| {
                    self.thresholds
                        .merged_matches(&merged, &prediction_box.bounding_box)
                })
            };

            let (label_verdict, prediction_verdict) = if matched {
                (LabelVerdict::Found, PredictionVerdict::Correct)
            } else {
                (LabelVerdict::NotFound, PredictionVerdict::Mistake)
            };
            for &label in labels {
                self.decide_label(label, label_verdict, Phase::PredictionDriven);
            }
            self.decide_prediction(prediction, prediction_verdict, Phase::PredictionDriven);
        }
    }

    /// Labels still open had their only prediction credited elsewhere.
    fn seal(&mut self) {
        for label in 0..self.labels.len() {
            if self.label_slots[label].verdict().is_none() {
                self.decide_label(label, LabelVerdict::NotFound, Phase::Sealing);
            }
        }
    }

    fn finish(self) -> PageClassification {
        let labels = self
            .label_slots
            .iter()
            .map(|slot| {
                (
                    slot.verdict().unwrap_or(LabelVerdict::NotFound),
                    slot.phase().unwrap_or(Phase::Sealing),
                )
            })
            .collect();
        // The prediction phase visits every undecided prediction
        let predictions = self
            .prediction_slots
            .iter()
            .map(|slot| {
                (
                    slot.verdict().unwrap_or(PredictionVerdict::Mistake),
                    slot.phase().unwrap_or(Phase::PredictionDriven),
                )
            })
            .collect();
        let skipped = (0..self.predictions.len())
            .map(|p| self.index.labels_of(p).is_empty() && self.index.is_claimed(p))
            .collect();

        PageClassification {
            labels,
            predictions,
            skipped,
        }
    }
}
