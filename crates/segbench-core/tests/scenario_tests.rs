//! End-to-end scenarios for page classification and corpus scoring.
//!
//! Each test builds a small page in memory, benchmarks it and checks the
//! outcomes and the resulting document row.

use segbench_core::{
    benchmark_document, BenchmarkResult, CorpusReport, LabelBox, LabelFile, LabelPage, LabelRecord,
    LabelType, LabelVerdict, MatchThresholds, Outcome, OverlapIndex, Page, Phase, PredictionBox,
    PredictionRecord, PredictionVerdict, Rectangle, ResultBox,
};

fn rect(l: f64, t: f64, r: f64, b: f64) -> Rectangle {
    Rectangle::new(l, t, r, b).unwrap()
}

fn label(label_type: LabelType, l: f64, t: f64, r: f64, b: f64) -> LabelBox {
    LabelBox::new(rect(l, t, r, b), label_type)
}

fn prediction(segment_type: &str, l: f64, t: f64, r: f64, b: f64) -> PredictionBox {
    PredictionBox::new(format!("{segment_type} at {l},{t}"), segment_type, rect(l, t, r, b))
}

fn outcomes(boxes: &[ResultBox]) -> Vec<Outcome> {
    boxes.iter().map(|b| b.outcome).collect()
}

// ============================================================================
// Page Scenarios
// ============================================================================

#[test]
fn test_exact_match_is_found_and_correct() {
    let page = Page::new(
        1,
        842.0,
        vec![label(LabelType::Text, 0.0, 0.0, 100.0, 20.0)],
        vec![prediction("Text", 0.0, 0.0, 100.0, 20.0)],
    );
    let boxes = page.benchmark(&MatchThresholds::default());
    assert_eq!(outcomes(&boxes), vec![Outcome::FoundLabel, Outcome::Correct]);

    let result = BenchmarkResult::from_result_boxes("doc", "model", &boxes);
    assert_eq!(result.labels, 1);
    assert_eq!(result.mistakes, 0);
    assert_eq!(result.accuracy, 100.0);
}

#[test]
fn test_label_without_predictions_is_not_found() {
    let page = Page::new(
        1,
        842.0,
        vec![label(LabelType::Text, 0.0, 0.0, 100.0, 20.0)],
        vec![],
    );
    let boxes = page.benchmark(&MatchThresholds::default());
    assert_eq!(outcomes(&boxes), vec![Outcome::NotFoundLabel]);

    let result = BenchmarkResult::from_result_boxes("doc", "model", &boxes);
    assert_eq!(result.labels, 1);
    assert_eq!(result.not_found_labels, 1);
    assert_eq!(result.accuracy, 0.0);
}

#[test]
fn test_split_label_with_wrong_majority_type() {
    let page = Page::new(
        1,
        842.0,
        vec![label(LabelType::Title, 0.0, 0.0, 100.0, 40.0)],
        vec![
            prediction("Text", 0.0, 0.0, 100.0, 20.0),
            prediction("Text", 0.0, 20.0, 100.0, 40.0),
        ],
    );
    let thresholds = MatchThresholds::default();
    let classification = page.classify(&thresholds);
    assert_eq!(classification.label(0), Some(LabelVerdict::NotFound));
    assert_eq!(classification.prediction(0), Some(PredictionVerdict::WrongTokenType));
    assert_eq!(classification.prediction(1), Some(PredictionVerdict::WrongTokenType));
    // The prediction phase may not overwrite the label phase
    assert_eq!(classification.prediction_phase(0), Some(Phase::LabelDriven));

    let boxes = page.benchmark(&thresholds);
    assert_eq!(
        outcomes(&boxes),
        vec![Outcome::NotFoundLabel, Outcome::WrongTokenType, Outcome::WrongTokenType]
    );
    let result = BenchmarkResult::from_result_boxes("doc", "model", &boxes);
    assert_eq!(result.wrong_token_type, 2);
    assert_eq!(result.mistakes, 3);
    assert_eq!(result.accuracy, 0.0);
}

#[test]
fn test_split_label_with_accepted_type_is_found() {
    let page = Page::new(
        1,
        842.0,
        vec![label(LabelType::Text, 0.0, 0.0, 100.0, 40.0)],
        vec![
            prediction("List item", 0.0, 0.0, 100.0, 20.0),
            prediction("Text", 0.0, 20.0, 100.0, 40.0),
        ],
    );
    let boxes = page.benchmark(&MatchThresholds::default());
    assert_eq!(
        outcomes(&boxes),
        vec![Outcome::FoundLabel, Outcome::Correct, Outcome::Correct]
    );
}

#[test]
fn test_unrelated_prediction_is_mistake() {
    let page = Page::new(
        1,
        842.0,
        vec![label(LabelType::Text, 0.0, 0.0, 100.0, 20.0)],
        vec![
            prediction("Text", 0.0, 0.0, 100.0, 20.0),
            prediction("Text", 300.0, 300.0, 400.0, 350.0),
        ],
    );
    let boxes = page.benchmark(&MatchThresholds::default());
    assert_eq!(
        outcomes(&boxes),
        vec![Outcome::FoundLabel, Outcome::Correct, Outcome::Mistake]
    );
    let result = BenchmarkResult::from_result_boxes("doc", "model", &boxes);
    assert_eq!(result.wrong_segmentation, 1);
    assert_eq!(result.accuracy, 0.0);
}

#[test]
fn test_claimed_orphan_is_skipped() {
    // Half of the prediction lies in the label, but it covers only 20% of it
    let page = Page::new(
        1,
        842.0,
        vec![label(LabelType::Text, 0.0, 0.0, 100.0, 100.0)],
        vec![prediction("Text", 0.0, 0.0, 20.0, 200.0)],
    );
    let thresholds = MatchThresholds::default();
    let classification = page.classify(&thresholds);
    assert_eq!(classification.skip_list().collect::<Vec<_>>(), vec![0]);

    let boxes = page.benchmark(&thresholds);
    assert_eq!(outcomes(&boxes), vec![Outcome::NotFoundLabel]);
}

#[test]
fn test_ambiguous_prediction_overrides_good_alignment() {
    let labels = vec![
        label(LabelType::Text, 0.0, 0.0, 100.0, 100.0),
        label(LabelType::Text, 100.0, 0.0, 200.0, 100.0),
    ];
    let predictions = vec![
        prediction("Text", 0.0, 0.0, 60.0, 100.0),
        // Overlaps both labels
        prediction("Text", 60.0, 0.0, 160.0, 100.0),
    ];
    let page = Page::new(1, 842.0, labels, predictions);
    let classification = page.classify(&MatchThresholds::default());

    assert_eq!(classification.label(0), Some(LabelVerdict::NotFound));
    assert_eq!(classification.label_phase(0), Some(Phase::Ambiguity));
    assert_eq!(classification.prediction(1), Some(PredictionVerdict::Mistake));
    assert_eq!(classification.prediction_phase(1), Some(Phase::Ambiguity));
}

#[test]
fn test_overlap_threshold_boundary() {
    let labels = [label(LabelType::Text, 0.0, 0.0, 100.0, 100.0)];
    let thresholds = MatchThresholds::default();

    let exact = [prediction("Text", 0.0, 0.0, 20.0, 200.0)];
    let index = OverlapIndex::build(&labels, &exact, &thresholds);
    assert!(index.labels_of(0).is_empty());

    let above = [prediction("Text", 0.0, 0.0, 20.0001, 200.0)];
    let index = OverlapIndex::build(&labels, &above, &thresholds);
    assert_eq!(index.labels_of(0), &[0]);
}

#[test]
fn test_classification_is_idempotent() {
    let page = Page::new(
        4,
        842.0,
        vec![
            label(LabelType::Title, 0.0, 0.0, 300.0, 30.0),
            label(LabelType::Text, 0.0, 40.0, 300.0, 140.0),
            label(LabelType::SectionHeader, 0.0, 150.0, 300.0, 170.0),
        ],
        vec![
            prediction("Title", 0.0, 0.0, 300.0, 30.0),
            prediction("Text", 0.0, 40.0, 300.0, 90.0),
            prediction("Text", 0.0, 90.0, 300.0, 140.0),
            prediction("Picture", 0.0, 150.0, 300.0, 170.0),
            prediction("Text", 400.0, 400.0, 500.0, 500.0),
        ],
    );
    let thresholds = MatchThresholds::default();
    assert_eq!(page.classify(&thresholds), page.classify(&thresholds));
    assert_eq!(page.benchmark(&thresholds), page.benchmark(&thresholds));
}

// ============================================================================
// Documents and Corpus
// ============================================================================

fn record(left: f64, top: f64, width: f64, height: f64, label_type: u8) -> LabelRecord {
    LabelRecord {
        top,
        left,
        width,
        height,
        label_type: label_type.into(),
    }
}

fn predicted(page_number: u32, left: f64, top: f64, width: f64, height: f64, kind: &str) -> PredictionRecord {
    PredictionRecord {
        page_number,
        page_height: 842.0,
        left,
        top,
        width,
        height,
        text: String::new(),
        segment_type: kind.to_string(),
    }
}

#[test]
fn test_document_over_several_pages() {
    let labels = LabelFile {
        pages: vec![
            LabelPage {
                number: 1,
                labels: vec![record(0.0, 0.0, 100.0, 20.0, 6), record(0.0, 50.0, 100.0, 20.0, 3)],
            },
            LabelPage {
                number: 2,
                labels: vec![record(0.0, 0.0, 100.0, 20.0, 8)],
            },
            LabelPage {
                number: 3,
                labels: vec![],
            },
        ],
    };
    let predictions = [
        predicted(1, 0.0, 0.0, 100.0, 20.0, "Text"),
        // Over the table label, which is not benchmarked
        predicted(1, 0.0, 50.0, 100.0, 20.0, "Table"),
        predicted(2, 0.0, 0.0, 100.0, 20.0, "Title"),
        predicted(3, 0.0, 0.0, 100.0, 20.0, "Text"),
    ];
    let boxes = benchmark_document(&labels, &predictions, &MatchThresholds::default()).unwrap();
    let result = BenchmarkResult::from_result_boxes("doc", "model", &boxes);

    assert_eq!(result.labels, 2);
    assert_eq!(result.not_found_labels, 0);
    assert_eq!(result.wrong_segmentation, 1);
    assert_eq!(result.mistakes, 1);
    assert_eq!(result.accuracy, 50.0);
    assert!(boxes.iter().all(|b| b.page_number != 3));
}

#[test]
fn test_corpus_average_recomputes_accuracy() {
    let row = |name: &str, labels: usize, not_found: usize| BenchmarkResult {
        document_name: name.to_string(),
        model: "model".to_string(),
        labels,
        not_found_labels: not_found,
        wrong_segmentation: 0,
        wrong_token_type: 0,
        mistakes: not_found,
        accuracy: segbench_core::accuracy(labels, not_found),
    };
    let report = CorpusReport::new("model", vec![row("c", 0, 0), row("a", 10, 2), row("b", 5, 1)]);

    assert_eq!(report.average.labels, 15);
    assert_eq!(report.average.mistakes, 3);
    assert_eq!(report.average.accuracy, 80.0);
    let names: Vec<_> = report.rows().map(|r| r.document_name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "Average"]);
}
