//! Annotated copies of the source PDF.
//!
//! Every result box becomes a square annotation stroked in its outcome
//! color plus a small filled tag with the caption. Result boxes use a
//! top-left origin; PDF user space has a bottom-left origin, so y values
//! are flipped with the page height.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use segbench_core::{Outcome, ResultBox, SegbenchError};
use std::collections::BTreeMap;
use std::path::Path;

/// RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl OverlayColor {
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// PDF color array with components in `[0, 1]`.
    fn to_pdf(self) -> Object {
        Object::Array(
            [self.r, self.g, self.b]
                .iter()
                .map(|&channel| real(f32::from(channel) / 255.0))
                .collect(),
        )
    }
}

/// Fixed outcome color scheme.
pub struct OutcomeColors;

impl OutcomeColors {
    #[must_use]
    pub const fn color_for(outcome: Outcome) -> OverlayColor {
        match outcome {
            Outcome::FoundLabel => OverlayColor::rgb(70, 139, 242), // Blue
            Outcome::Correct => OverlayColor::rgb(92, 191, 95),     // Green
            Outcome::Mistake => OverlayColor::rgb(227, 9, 56),      // Red
            Outcome::WrongTokenType => OverlayColor::rgb(179, 194, 17), // Olive
            Outcome::NotFoundLabel => OverlayColor::rgb(158, 50, 217), // Purple
        }
    }
}

const TAG_HEIGHT: f32 = 10.0;
const TAG_FONT_SIZE: i64 = 8;

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}

fn overlay_error(context: &str, error: lopdf::Error) -> SegbenchError {
    SegbenchError::Overlay(format!("{context}: {error}"))
}

/// Width of the caption tag for `caption`.
#[inline]
fn tag_width(caption: &str) -> f32 {
    caption.chars().count() as f32 * 5.0 + 8.0
}

/// Height of the page's `/MediaBox`, following `/Parent` for inherited boxes.
fn media_box_height(document: &Document, page_id: ObjectId) -> Option<f64> {
    let mut dictionary = document.get_dictionary(page_id).ok()?;
    // Page trees are shallow; the bound guards against reference cycles
    for _ in 0..32 {
        if let Ok(media_box) = dictionary.get(b"MediaBox") {
            let media_box = match media_box {
                Object::Reference(id) => document.get_object(*id).ok()?,
                other => other,
            };
            let values = media_box.as_array().ok()?;
            let bottom = number(values.get(1)?)?;
            let top = number(values.get(3)?)?;
            return Some((top - bottom).abs());
        }
        let parent = dictionary.get(b"Parent").ok()?.as_reference().ok()?;
        dictionary = document.get_dictionary(parent).ok()?;
    }
    None
}

/// Square plus caption tag for one result box, in PDF coordinates.
fn annotations_for(result: &ResultBox, page_height: f64) -> [Dictionary; 2] {
    let color = OutcomeColors::color_for(result.outcome).to_pdf();
    let caption = result.caption();
    let rect = &result.bounding_box;

    let left = rect.left() as f32;
    let right = rect.right() as f32;
    let top = (page_height - rect.top()) as f32;
    let bottom = (page_height - rect.bottom()) as f32;

    let width = tag_width(&caption);
    // Label tags sit at the right edge so they do not hide prediction tags
    let tag_left = if result.outcome.is_label_outcome() {
        right - width
    } else {
        left
    };

    let square = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Square",
        "Rect" => vec![real(left), real(bottom), real(right), real(top)],
        "C" => color.clone(),
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(1)],
        "F" => Object::Integer(4),
        "Contents" => Object::string_literal(caption.as_str()),
    };
    let tag = dictionary! {
        "Type" => "Annot",
        "Subtype" => "FreeText",
        "Rect" => vec![real(tag_left), real(top), real(tag_left + width), real(top + TAG_HEIGHT)],
        "C" => color,
        "F" => Object::Integer(4),
        "Contents" => Object::string_literal(caption.as_str()),
        "DA" => Object::string_literal(format!("/Helv {TAG_FONT_SIZE} Tf 1 1 1 rg")),
    };
    [square, tag]
}

/// Append annotation references to the page's `/Annots` array.
fn append_annotations(
    document: &mut Document,
    page_id: ObjectId,
    references: Vec<Object>,
) -> Result<(), SegbenchError> {
    let existing = document
        .get_dictionary(page_id)
        .map_err(|e| overlay_error("page dictionary", e))?
        .get(b"Annots")
        .ok()
        .cloned();

    match existing {
        Some(Object::Reference(annots_id)) => {
            let annots = document
                .get_object_mut(annots_id)
                .and_then(Object::as_array_mut)
                .map_err(|e| overlay_error("annotation array", e))?;
            annots.extend(references);
        }
        other => {
            let mut annots = match other {
                Some(Object::Array(annots)) => annots,
                _ => Vec::new(),
            };
            annots.extend(references);
            document
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| overlay_error("page dictionary", e))?
                .set("Annots", Object::Array(annots));
        }
    }
    Ok(())
}

/// Add annotations for `results` to an in-memory document.
///
/// Returns the number of result boxes drawn. Boxes on pages the PDF does
/// not have are skipped with a warning.
pub fn annotate(document: &mut Document, results: &[ResultBox]) -> Result<usize, SegbenchError> {
    let pages = document.get_pages();
    let mut per_page: BTreeMap<u32, Vec<&ResultBox>> = BTreeMap::new();
    for result in results {
        per_page.entry(result.page_number).or_default().push(result);
    }

    let mut drawn = 0;
    for (page_number, page_results) in per_page {
        let Some(&page_id) = pages.get(&page_number) else {
            log::warn!(
                "PDF has no page {page_number}, skipping {} boxes",
                page_results.len()
            );
            continue;
        };
        let media_height = media_box_height(document, page_id);

        let mut references = Vec::with_capacity(page_results.len() * 2);
        for result in page_results {
            let page_height = if result.page_height > 0.0 {
                result.page_height
            } else {
                media_height.unwrap_or(0.0)
            };
            for mut annotation in annotations_for(result, page_height) {
                annotation.set("P", Object::Reference(page_id));
                references.push(Object::Reference(document.add_object(annotation)));
            }
            drawn += 1;
        }
        append_annotations(document, page_id, references)?;
    }
    Ok(drawn)
}

/// Load `source`, draw `results` on it and save the copy to `output`.
///
/// # Errors
///
/// Returns [`SegbenchError::Overlay`] when the PDF cannot be read or
/// modified, [`SegbenchError::Io`] when it cannot be written.
pub fn write_overlay(source: &Path, results: &[ResultBox], output: &Path) -> Result<usize, SegbenchError> {
    let mut document = Document::load(source).map_err(|e| overlay_error(&source.display().to_string(), e))?;
    let drawn = annotate(&mut document, results)?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SegbenchError::io(parent, e))?;
    }
    document
        .save(output)
        .map_err(|e| SegbenchError::io(output, e))?;
    log::debug!("wrote {drawn} boxes to {}", output.display());
    Ok(drawn)
}
