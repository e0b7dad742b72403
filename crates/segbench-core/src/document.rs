//! Benchmarking one document: page assembly from the input files.

use crate::error::Result;
use crate::input::{LabelFile, LabelPage, PredictionRecord};
use crate::label_type::LabelType;
use crate::page::Page;
use crate::thresholds::MatchThresholds;
use crate::types::{LabelBox, PredictionBox, ResultBox};
use log::debug;

/// Build the [`Page`] for one labelled page.
///
/// Only benchmarked label types are kept. Predictions are the records with
/// a matching page number, in file order; the page height comes from the
/// first of them and is 0 when the page has none.
///
/// # Errors
///
/// Returns [`crate::SegbenchError::InvalidRectangle`] if a kept label or a
/// prediction of this page has invalid geometry.
pub fn assemble_page(page: &LabelPage, predictions: &[PredictionRecord]) -> Result<Page> {
    let mut labels = Vec::with_capacity(page.labels.len());
    for record in &page.labels {
        let label_type = match LabelType::try_from(record.label_type) {
            Ok(label_type) => label_type,
            Err(e) => {
                debug!("page {}: ignoring label: {e}", page.number);
                continue;
            }
        };
        if label_type.is_benchmarked() {
            labels.push(LabelBox::new(record.bounding_box()?, label_type));
        }
    }

    let on_page: Vec<&PredictionRecord> = predictions
        .iter()
        .filter(|p| p.page_number == page.number)
        .collect();
    let height = on_page.first().map_or(0.0, |p| p.page_height);
    let prediction_boxes = on_page
        .into_iter()
        .map(|p| Ok(PredictionBox::new(p.text.as_str(), p.segment_type.as_str(), p.bounding_box()?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Page::new(page.number, height, labels, prediction_boxes))
}

/// Benchmark every labelled page of a document.
///
/// Pages absent from the label file are not benchmarked, so predictions on
/// them are ignored. Result boxes are returned page by page in label-file
/// order.
///
/// # Errors
///
/// Fails on the first invalid rectangle; a malformed document yields no
/// partial result.
pub fn benchmark_document(
    labels: &LabelFile,
    predictions: &[PredictionRecord],
    thresholds: &MatchThresholds,
) -> Result<Vec<ResultBox>> {
    let mut boxes = Vec::new();
    for label_page in &labels.pages {
        let page = assemble_page(label_page, predictions)?;
        boxes.extend(page.benchmark(thresholds));
    }
    Ok(boxes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::LabelRecord;
    use crate::types::Outcome;
    use crate::SegbenchError;

    fn label(left: f64, top: f64, width: f64, height: f64, label_type: u32) -> LabelRecord {
        LabelRecord {
            top,
            left,
            width,
            height,
            label_type,
        }
    }

    fn prediction(page_number: u32, left: f64, top: f64, width: f64, height: f64, kind: &str) -> PredictionRecord {
        PredictionRecord {
            page_number,
            page_height: 800.0 + f64::from(page_number),
            left,
            top,
            width,
            height,
            text: String::new(),
            segment_type: kind.to_string(),
        }
    }

    #[test]
    fn test_assemble_filters_label_types() {
        let page = LabelPage {
            number: 1,
            labels: vec![
                label(0.0, 0.0, 10.0, 10.0, 6),
                label(0.0, 20.0, 10.0, 10.0, 3),
                label(0.0, 40.0, 10.0, 10.0, 5),
                label(0.0, 60.0, 10.0, 10.0, 8),
                label(0.0, 80.0, 10.0, 10.0, 42),
            ],
        };
        let assembled = assemble_page(&page, &[]).unwrap();
        let types: Vec<_> = assembled.labels().iter().map(|l| l.label_type).collect();
        assert_eq!(types, vec![LabelType::Text, LabelType::Title, LabelType::SectionHeader]);
        assert_eq!(assembled.height, 0.0);
    }

    #[test]
    fn test_assemble_takes_page_predictions_and_height() {
        let page = LabelPage {
            number: 2,
            labels: vec![label(0.0, 0.0, 10.0, 10.0, 6)],
        };
        let predictions = [
            prediction(1, 0.0, 0.0, 10.0, 10.0, "Text"),
            prediction(2, 0.0, 0.0, 10.0, 10.0, "Text"),
            prediction(2, 0.0, 50.0, 10.0, 10.0, "Title"),
        ];
        let assembled = assemble_page(&page, &predictions).unwrap();
        assert_eq!(assembled.predictions().len(), 2);
        assert_eq!(assembled.height, 802.0);
    }

    #[test]
    fn test_invalid_geometry_fails_document() {
        let labels = LabelFile {
            pages: vec![LabelPage {
                number: 1,
                labels: vec![label(0.0, 0.0, 10.0, 10.0, 6)],
            }],
        };
        let predictions = [prediction(1, 0.0, 0.0, -10.0, 10.0, "Text")];
        let err = benchmark_document(&labels, &predictions, &MatchThresholds::default()).unwrap_err();
        assert!(matches!(err, SegbenchError::InvalidRectangle { .. }));
    }

    #[test]
    fn test_benchmark_document_pages_in_order() {
        let labels = LabelFile {
            pages: vec![
                LabelPage {
                    number: 2,
                    labels: vec![label(0.0, 0.0, 100.0, 20.0, 6)],
                },
                LabelPage {
                    number: 1,
                    labels: vec![label(0.0, 0.0, 100.0, 20.0, 5)],
                },
            ],
        };
        let predictions = [
            prediction(2, 0.0, 0.0, 100.0, 20.0, "Text"),
            prediction(3, 0.0, 0.0, 100.0, 20.0, "Text"),
        ];
        let boxes = benchmark_document(&labels, &predictions, &MatchThresholds::default()).unwrap();
        let summary: Vec<_> = boxes.iter().map(|b| (b.page_number, b.outcome)).collect();
        assert_eq!(
            summary,
            vec![
                (2, Outcome::FoundLabel),
                (2, Outcome::Correct),
                (1, Outcome::NotFoundLabel),
            ]
        );
    }

    #[test]
    fn test_out_of_range_label_type_skipped() {
        let json = r#"{"pages": [{"number": 1, "labels": [
            {"top": 0, "left": 0, "width": 100, "height": 20, "label_type": 300},
            {"top": 50, "left": 0, "width": 100, "height": 20, "label_type": 6}
        ]}]}"#;
        let labels = LabelFile::from_reader(json.as_bytes(), std::path::Path::new("labels.json")).unwrap();
        let predictions = [prediction(1, 0.0, 50.0, 100.0, 20.0, "Text")];

        let boxes = benchmark_document(&labels, &predictions, &MatchThresholds::default()).unwrap();
        let outcomes: Vec<_> = boxes.iter().map(|b| b.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::FoundLabel, Outcome::Correct]);
    }
}
