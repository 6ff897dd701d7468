//! Chart extents and view fitting.

use serde::{Deserialize, Serialize};

use crate::transform::TransformMatrix;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the range.
    pub fn center(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Add padding around the range.
    pub fn padded(&self, frac: f64, min_padding: f64) -> Self {
        let padding = (self.span().abs() * frac).max(min_padding);
        Self {
            min: self.min - padding,
            max: self.max + padding,
        }
    }
}

/// Extents on both axes, in chart units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Check whether both axes are valid.
    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }

    /// Apply padding to both axes.
    pub fn padded(&self, frac: f64, min_padding: f64) -> Self {
        Self {
            x: self.x.padded(frac, min_padding),
            y: self.y.padded(frac, min_padding),
        }
    }
}

/// How [`fit_transform`] maps chart bounds onto a target area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Padding added to each side, as a fraction of the span.
    pub padding_frac: f64,
    /// Minimum padding, so zero-span bounds still fit.
    pub min_padding: f64,
    /// Mirror the Y axis (for y-down targets such as screens).
    pub flip_y: bool,
    /// Use one scale factor for both axes.
    pub preserve_aspect: bool,
    /// Samples per scale when measuring bounds.
    pub samples: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            padding_frac: 0.05,
            min_padding: 1e-6,
            flip_y: true,
            preserve_aspect: false,
            samples: 200,
        }
    }
}

/// Transform mapping `bounds` (after padding) onto `target`.
///
/// Returns `None` if either area is not finite or the target has no span.
pub fn fit_transform(
    bounds: Viewport,
    target: Viewport,
    config: &FitConfig,
) -> Option<TransformMatrix> {
    if !target.is_valid() || !bounds.x.is_finite() || !bounds.y.is_finite() {
        return None;
    }
    let padded = bounds.padded(config.padding_frac, config.min_padding);
    if !padded.is_valid() {
        return None;
    }

    let mut sx = target.x.span() / padded.x.span();
    let mut sy = target.y.span() / padded.y.span();
    if config.preserve_aspect {
        let s = sx.min(sy);
        sx = s;
        sy = s;
    }
    if config.flip_y {
        sy = -sy;
    }

    let fit = TransformMatrix::translate(-padded.x.center(), -padded.y.center())
        .compose(&TransformMatrix::scale(sx, sy))
        .compose(&TransformMatrix::translate(target.x.center(), target.y.center()));
    Some(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn unit() -> Viewport {
        Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0))
    }

    #[test]
    fn range_swaps_reversed_bounds() {
        let range = Range::new(3.0, -1.0);
        assert_eq!(range, Range { min: -1.0, max: 3.0 });
        assert_eq!(range.center(), 1.0);
    }

    #[test]
    fn fit_maps_corners_without_padding() {
        let config = FitConfig {
            padding_frac: 0.0,
            min_padding: 0.0,
            flip_y: false,
            ..FitConfig::default()
        };
        let target = Viewport::new(Range::new(0.0, 800.0), Range::new(0.0, 600.0));
        let fit = fit_transform(unit(), target, &config).unwrap();
        let p = fit.apply(Point::new(1.0, 1.0)).unwrap();
        assert!((p.x - 800.0).abs() < 1e-9);
        assert!((p.y - 600.0).abs() < 1e-9);
    }

    #[test]
    fn fit_flips_and_preserves_aspect() {
        let config = FitConfig {
            padding_frac: 0.0,
            min_padding: 0.0,
            flip_y: true,
            preserve_aspect: true,
            ..FitConfig::default()
        };
        let target = Viewport::new(Range::new(0.0, 200.0), Range::new(0.0, 100.0));
        let fit = fit_transform(unit(), target, &config).unwrap();
        // uniform scale of 100, centered horizontally, y mirrored
        let top = fit.apply(Point::new(0.0, 1.0)).unwrap();
        assert!((top.x - 50.0).abs() < 1e-9);
        assert!(top.y.abs() < 1e-9);
    }

    #[test]
    fn degenerate_bounds_still_fit() {
        let point = Viewport::new(Range::new(2.0, 2.0), Range::new(5.0, 5.0));
        let fit = fit_transform(point, unit(), &FitConfig::default()).unwrap();
        let p = fit.apply(Point::new(2.0, 5.0)).unwrap();
        assert!((p.x - 0.5).abs() < 1e-9);
        assert!((p.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_target_is_rejected() {
        let empty = Viewport::new(Range::new(0.0, 0.0), Range::new(0.0, 1.0));
        assert!(fit_transform(unit(), empty, &FitConfig::default()).is_none());
    }
}
