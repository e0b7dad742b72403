//! Per-document and corpus scores.

use crate::types::{Outcome, ResultBox};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Document name used for the corpus row.
pub const AVERAGE_ROW: &str = "Average";

/// Number of result boxes per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub found_labels: usize,
    pub correct: usize,
    pub not_found_labels: usize,
    pub mistakes: usize,
    pub wrong_token_type: usize,
}

impl OutcomeCounts {
    #[must_use]
    pub fn from_result_boxes(boxes: &[ResultBox]) -> Self {
        let mut counts = Self::default();
        for result in boxes {
            counts.record(result.outcome);
        }
        counts
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::FoundLabel => self.found_labels += 1,
            Outcome::Correct => self.correct += 1,
            Outcome::NotFoundLabel => self.not_found_labels += 1,
            Outcome::Mistake => self.mistakes += 1,
            Outcome::WrongTokenType => self.wrong_token_type += 1,
        }
    }

    /// Ground-truth labels seen: found plus not found.
    #[inline]
    #[must_use]
    pub const fn labels(&self) -> usize {
        self.found_labels + self.not_found_labels
    }
}

impl AddAssign for OutcomeCounts {
    fn add_assign(&mut self, other: Self) {
        self.found_labels += other.found_labels;
        self.correct += other.correct;
        self.not_found_labels += other.not_found_labels;
        self.mistakes += other.mistakes;
        self.wrong_token_type += other.wrong_token_type;
    }
}

/// Accuracy in percent, rounded to two decimals.
///
/// Zero when there are no labels. Clamped to `[0, 100]` because spurious
/// predictions can outnumber labels.
#[must_use]
pub fn accuracy(labels: usize, mistakes: usize) -> f64 {
    if labels == 0 {
        return 0.0;
    }
    let raw = (labels as f64 - mistakes as f64) / labels as f64 * 100.0;
    round2(raw.clamp(0.0, 100.0))
}

/// Round half away from zero to two decimals.
#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One row of the benchmark report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub document_name: String,
    pub model: String,
    pub labels: usize,
    pub not_found_labels: usize,
    /// Predictions with no valid ground truth.
    pub wrong_segmentation: usize,
    pub wrong_token_type: usize,
    /// `not_found_labels + wrong_segmentation + wrong_token_type`.
    pub mistakes: usize,
    pub accuracy: f64,
}

impl BenchmarkResult {
    /// Row for one document from its outcome counts.
    #[must_use]
    pub fn from_counts(document_name: impl Into<String>, model: impl Into<String>, counts: &OutcomeCounts) -> Self {
        Self::from_totals(
            document_name.into(),
            model.into(),
            counts.labels(),
            counts.not_found_labels,
            counts.mistakes,
            counts.wrong_token_type,
        )
    }

    /// Row for one document from its result boxes.
    #[must_use]
    pub fn from_result_boxes(document_name: impl Into<String>, model: impl Into<String>, boxes: &[ResultBox]) -> Self {
        Self::from_counts(document_name, model, &OutcomeCounts::from_result_boxes(boxes))
    }

    fn from_totals(
        document_name: String,
        model: String,
        labels: usize,
        not_found_labels: usize,
        wrong_segmentation: usize,
        wrong_token_type: usize,
    ) -> Self {
        let mistakes = wrong_segmentation + wrong_token_type + not_found_labels;
        Self {
            document_name,
            model,
            labels,
            not_found_labels,
            wrong_segmentation,
            wrong_token_type,
            mistakes,
            accuracy: accuracy(labels, mistakes),
        }
    }

    /// Corpus row: counters are summed and accuracy recomputed from the sums.
    #[must_use]
    pub fn average(results: &[BenchmarkResult], model: impl Into<String>) -> Self {
        let sum = |field: fn(&BenchmarkResult) -> usize| results.iter().map(field).sum::<usize>();
        let labels = sum(|r| r.labels);
        let mistakes = sum(|r| r.mistakes);
        Self {
            document_name: AVERAGE_ROW.to_string(),
            model: model.into(),
            labels,
            not_found_labels: sum(|r| r.not_found_labels),
            wrong_segmentation: sum(|r| r.wrong_segmentation),
            wrong_token_type: sum(|r| r.wrong_token_type),
            mistakes,
            accuracy: accuracy(labels, mistakes),
        }
    }
}

/// Document rows sorted by name, plus the corpus row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub model: String,
    pub documents: Vec<BenchmarkResult>,
    pub average: BenchmarkResult,
}

impl CorpusReport {
    #[must_use]
    pub fn new(model: impl Into<String>, mut documents: Vec<BenchmarkResult>) -> Self {
        let model = model.into();
        documents.sort_by(|a, b| a.document_name.cmp(&b.document_name));
        let average = BenchmarkResult::average(&documents, model.as_str());
        Self {
            model,
            documents,
            average,
        }
    }

    /// All rows in report order, `Average` last.
    pub fn rows(&self) -> impl Iterator<Item = &BenchmarkResult> {
        self.documents.iter().chain(std::iter::once(&self.average))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, labels: usize, not_found: usize) -> BenchmarkResult {
        BenchmarkResult::from_totals(name.to_string(), "m".to_string(), labels, not_found, 0, 0)
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(10, 2), 80.0);
        assert_eq!(accuracy(3, 1), 66.67);
        assert_eq!(accuracy(0, 0), 0.0);
        assert_eq!(accuracy(0, 4), 0.0);
        assert_eq!(accuracy(2, 5), 0.0);
        assert_eq!(accuracy(7, 0), 100.0);
    }

    #[test]
    fn test_mistakes_sum() {
        let counts = OutcomeCounts {
            found_labels: 6,
            correct: 6,
            not_found_labels: 2,
            mistakes: 1,
            wrong_token_type: 1,
        };
        let result = BenchmarkResult::from_counts("doc", "m", &counts);
        assert_eq!(result.labels, 8);
        assert_eq!(result.wrong_segmentation, 1);
        assert_eq!(result.mistakes, 4);
        assert_eq!(result.accuracy, 50.0);
    }

    #[test]
    fn test_average_sums_then_recomputes() {
        let results = [row("a", 10, 2), row("b", 5, 1), row("c", 0, 0)];
        let average = BenchmarkResult::average(&results, "m");
        assert_eq!(average.document_name, "Average");
        assert_eq!(average.labels, 15);
        assert_eq!(average.mistakes, 3);
        assert_eq!(average.accuracy, 80.0);
    }

    #[test]
    fn test_average_of_nothing() {
        let average = BenchmarkResult::average(&[], "m");
        assert_eq!(average.labels, 0);
        assert_eq!(average.accuracy, 0.0);
    }

    #[test]
    fn test_report_sorted_with_average_last() {
        let report = CorpusReport::new("m", vec![row("b", 1, 0), row("a", 1, 1)]);
        let names: Vec<_> = report.rows().map(|r| r.document_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "Average"]);
        assert_eq!(report.average.accuracy, 50.0);
    }

    #[test]
    fn test_counts_add() {
        let mut total = OutcomeCounts::default();
        total.record(Outcome::Correct);
        let mut other = OutcomeCounts::default();
        other.record(Outcome::Mistake);
        other.record(Outcome::FoundLabel);
        total += other;
        assert_eq!(total.correct, 1);
        assert_eq!(total.mistakes, 1);
        assert_eq!(total.labels(), 1);
    }
}
