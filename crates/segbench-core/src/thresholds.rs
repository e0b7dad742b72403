//! Percentage thresholds used by the matcher.

use crate::geometry::Rectangle;
use serde::{Deserialize, Serialize};

/// Thresholds (in percent) for overlap and merged-box matching.
///
/// All comparisons are strict: a value equal to the threshold does not pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// Minimum share of the target's area covered by the source.
    pub overlap: f64,
    /// Minimum share of the source's area covered by the target.
    pub containment: f64,
    /// Minimum share of a merged box covered by the element it is matched to.
    pub merged_match: f64,
}

impl Default for MatchThresholds {
    #[inline]
    fn default() -> Self {
        Self {
            overlap: 20.0,
            containment: 90.0,
            merged_match: 50.0,
        }
    }
}

impl MatchThresholds {
    /// Whether `target` counts as overlapping `source`.
    ///
    /// True if more than `overlap`% of the target lies inside the source,
    /// or more than `containment`% of the source lies inside the target.
    /// The two clauses use different denominators and must not be
    /// replaced by a symmetric measure such as IoU.
    #[inline]
    #[must_use = "returns whether the rectangles overlap"]
    pub fn overlaps(&self, source: &Rectangle, target: &Rectangle) -> bool {
        target.intersection_percentage(source) > self.overlap
            || source.intersection_percentage(target) > self.containment
    }

    /// Whether a merged box is covered enough by the element it was built for.
    #[inline]
    #[must_use = "returns whether the merged box matches"]
    pub fn merged_matches(&self, merged: &Rectangle, element: &Rectangle) -> bool {
        merged.intersection_percentage(element) > self.merged_match
    }
}
