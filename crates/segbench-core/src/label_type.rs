//! Ground-truth label vocabulary.
//!
//! Label files store the semantic class as an integer index into a fixed
//! table. The table is static data: [`LabelType`] is the only place the
//! index, display name and accepted prediction types are defined.

use crate::error::SegbenchError;
use serde::Serialize;
use std::fmt;

/// Semantic class of a ground-truth label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u32")]
pub enum LabelType {
    Formula,
    Footnote,
    ListItem,
    Table,
    Picture,
    Title,
    Text,
    PageHeader,
    SectionHeader,
    Caption,
    PageFooter,
}

/// Prediction types accepted for Title and Section header labels.
const HEADING_TYPES: &[&str] = &["Section header", "Title"];
/// Prediction types accepted for Text labels.
const TEXT_TYPES: &[&str] = &["Text", "List item"];

impl LabelType {
    /// Every label type, ordered by index.
    pub const ALL: [Self; 11] = [
        Self::Formula,
        Self::Footnote,
        Self::ListItem,
        Self::Table,
        Self::Picture,
        Self::Title,
        Self::Text,
        Self::PageHeader,
        Self::SectionHeader,
        Self::Caption,
        Self::PageFooter,
    ];

    /// Look up a label type by its index in the label file vocabulary.
    #[inline]
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    /// Index of this label type in the label file vocabulary.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Display name, matching the prediction type strings.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Formula => "Formula",
            Self::Footnote => "Footnote",
            Self::ListItem => "List item",
            Self::Table => "Table",
            Self::Picture => "Picture",
            Self::Title => "Title",
            Self::Text => "Text",
            Self::PageHeader => "Page header",
            Self::SectionHeader => "Section header",
            Self::Caption => "Caption",
            Self::PageFooter => "Page footer",
        }
    }

    /// Whether labels of this type take part in the benchmark.
    ///
    /// Only Title, Text and Section header are compared; every other class
    /// is dropped before matching.
    #[inline]
    #[must_use]
    pub const fn is_benchmarked(self) -> bool {
        matches!(self, Self::Title | Self::Text | Self::SectionHeader)
    }

    /// Predicted segment types that count as the same semantic class.
    #[inline]
    #[must_use]
    pub const fn accepted_segment_types(self) -> &'static [&'static str] {
        match self {
            Self::Title | Self::SectionHeader => HEADING_TYPES,
            Self::Text => TEXT_TYPES,
            _ => &[],
        }
    }

    /// Whether a prediction of `segment_type` is compatible with this label.
    #[inline]
    #[must_use]
    pub fn accepts(self, segment_type: &str) -> bool {
        self.accepted_segment_types().contains(&segment_type)
    }
}

impl TryFrom<u32> for LabelType {
    type Error = SegbenchError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(SegbenchError::UnknownLabelType(index))
    }
}

impl From<LabelType> for u32 {
    fn from(label_type: LabelType) -> Self {
        label_type.index()
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, label_type) in LabelType::ALL.iter().enumerate() {
            assert_eq!(label_type.index() as usize, i);
            assert_eq!(LabelType::from_index(label_type.index()), Some(*label_type));
        }
        assert_eq!(LabelType::from_index(11), None);
        assert_eq!(LabelType::from_index(300), None);
        assert_eq!(LabelType::from_index(u32::MAX), None);
    }

    #[test]
    fn test_vocabulary_indices() {
        assert_eq!(LabelType::from_index(0), Some(LabelType::Formula));
        assert_eq!(LabelType::from_index(5), Some(LabelType::Title));
        assert_eq!(LabelType::from_index(6), Some(LabelType::Text));
        assert_eq!(LabelType::from_index(8), Some(LabelType::SectionHeader));
        assert_eq!(LabelType::from_index(10), Some(LabelType::PageFooter));
    }

    #[test]
    fn test_benchmarked_types() {
        let benchmarked: Vec<_> = LabelType::ALL
            .iter()
            .filter(|t| t.is_benchmarked())
            .map(|t| t.index())
            .collect();
        assert_eq!(benchmarked, vec![5, 6, 8]);
    }

    #[test]
    fn test_accepted_segment_types() {
        assert!(LabelType::Title.accepts("Title"));
        assert!(LabelType::Title.accepts("Section header"));
        assert!(LabelType::SectionHeader.accepts("Title"));
        assert!(!LabelType::Title.accepts("Text"));
        assert!(LabelType::Text.accepts("List item"));
        assert!(!LabelType::Text.accepts("Section header"));
        assert!(!LabelType::Table.accepts("Table"));
    }

    #[test]
    fn test_serializes_as_index() {
        let json = serde_json::to_string(&LabelType::SectionHeader).unwrap();
        assert_eq!(json, "8");
    }

    #[test]
    fn test_try_from_index() {
        assert_eq!(LabelType::try_from(6).unwrap(), LabelType::Text);
        let err = LabelType::try_from(300).unwrap_err();
        assert!(matches!(err, SegbenchError::UnknownLabelType(300)));
    }
}
