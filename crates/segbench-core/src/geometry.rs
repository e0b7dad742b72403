//! Axis-aligned rectangles in page coordinates (origin top-left).

use crate::error::{Result, SegbenchError};
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// Axis-aligned rectangle with left, top, right, bottom coordinates.
///
/// Constructed only through validating constructors, so `right >= left`,
/// `bottom >= top` and all coordinates are finite for every value.
/// Equality and hashing are value-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rectangle {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Rectangle {
    /// Create a rectangle from its four edges.
    ///
    /// # Errors
    ///
    /// Returns [`SegbenchError::InvalidRectangle`] if a coordinate is not
    /// finite or the rectangle has negative width or height.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        let finite = [left, top, right, bottom].iter().all(|v| v.is_finite());
        if !finite || right < left || bottom < top {
            return Err(SegbenchError::InvalidRectangle {
                left,
                top,
                right,
                bottom,
            });
        }
        // `+ 0.0` folds -0.0 into 0.0 so equal values hash equally
        Ok(Self {
            left: left + 0.0,
            top: top + 0.0,
            right: right + 0.0,
            bottom: bottom + 0.0,
        })
    }

    /// Create a rectangle from its top-left corner and size.
    ///
    /// # Errors
    ///
    /// Returns [`SegbenchError::InvalidRectangle`] for negative sizes or
    /// non-finite values.
    #[inline]
    pub fn from_width_height(left: f64, top: f64, width: f64, height: f64) -> Result<Self> {
        Self::new(left, top, left + width, top + height)
    }

    #[inline]
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.left
    }

    #[inline]
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.top
    }

    #[inline]
    #[must_use]
    pub const fn right(&self) -> f64 {
        self.right
    }

    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> f64 {
        self.bottom
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area of the rectangle; zero for degenerate rectangles.
    #[inline]
    #[must_use = "returns the rectangle area"]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Area shared by `self` and `other`.
    #[inline]
    #[must_use = "returns the intersection area"]
    pub fn intersection_area(&self, other: &Self) -> f64 {
        let x_left = self.left.max(other.left);
        let y_top = self.top.max(other.top);
        let x_right = self.right.min(other.right);
        let y_bottom = self.bottom.min(other.bottom);

        if x_right <= x_left || y_bottom <= y_top {
            return 0.0;
        }
        (x_right - x_left) * (y_bottom - y_top)
    }

    /// Percentage of `self`'s area covered by `other` (0 to 100).
    ///
    /// This is asymmetric: the denominator is always `self.area()`, so
    /// `a.intersection_percentage(&b)` and `b.intersection_percentage(&a)`
    /// differ whenever the areas differ. Zero-area rectangles yield 0.
    #[inline]
    #[must_use = "returns the covered percentage of this rectangle"]
    pub fn intersection_percentage(&self, other: &Self) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        self.intersection_area(other) * 100.0 / area
    }

    /// Smallest rectangle enclosing every rectangle in `rectangles`.
    ///
    /// Returns `None` for an empty input.
    #[must_use = "returns the merged rectangle"]
    pub fn merge<'a, I>(rectangles: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        rectangles.into_iter().fold(None, |merged, rect| {
            Some(match merged {
                None => *rect,
                Some(acc) => Self {
                    left: acc.left.min(rect.left),
                    top: acc.top.min(rect.top),
                    right: acc.right.max(rect.right),
                    bottom: acc.bottom.max(rect.bottom),
                },
            })
        })
    }
}

impl Eq for Rectangle {}

impl Hash for Rectangle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.to_bits().hash(state);
        self.top.to_bits().hash(state);
        self.right.to_bits().hash(state);
        self.bottom.to_bits().hash(state);
    }
}
