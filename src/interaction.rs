//! Interaction helpers for panning and zooming a nomograph.
//!
//! These helpers turn pointer input into transform gestures so every host
//! gets the same propose/commit behavior: a drag keeps replacing the pending
//! translation, and releasing the pointer commits it.

use crate::geom::Point;
use crate::model::NomographModel;

/// Drag-to-pan state.
///
/// Each drag proposes a translation from the press point to the current
/// pointer position, so only the latest one survives until release.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanGesture {
    anchor: Option<Point>,
}

impl PanGesture {
    /// Create an idle gesture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    /// Start a drag at `position`.
    pub fn press(&mut self, position: Point) {
        self.anchor = Some(position);
    }

    /// Move the pointer, proposing the translation since the press.
    ///
    /// Ignored when no drag is active.
    pub fn drag(&self, model: &mut NomographModel, position: Point) {
        let Some(anchor) = self.anchor else {
            return;
        };
        model.translate(position.x - anchor.x, position.y - anchor.y);
    }

    /// End the drag and commit the translation.
    pub fn release(&mut self, model: &mut NomographModel) {
        if self.anchor.take().is_some() {
            model.commit();
        }
    }

    /// Abort the drag, dropping the pending translation.
    pub fn cancel(&mut self, model: &mut NomographModel) {
        if self.anchor.take().is_some() {
            model.cancel();
        }
    }
}

/// Zoom uniformly about `center` and commit.
///
/// Non-finite or non-positive factors are ignored.
pub fn zoom_at(model: &mut NomographModel, center: Point, factor: f64) {
    if !factor.is_finite() || factor <= 0.0 {
        tracing::debug!(factor, "ignored zoom factor");
        return;
    }
    model.scale_about(factor, factor, center.x, center.y);
    model.commit();
}

/// Compute a zoom factor from a drag delta and axis length.
pub fn zoom_factor_from_drag(delta_pixels: f64, axis_pixels: f64) -> f64 {
    if axis_pixels <= 0.0 {
        return 1.0;
    }
    let normalized = delta_pixels / axis_pixels;
    (1.0 - normalized).clamp(0.1, 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartVariant;
    use crate::formula::Formula;
    use crate::model::TransformState;
    use crate::transform::TransformMatrix;

    fn model() -> NomographModel {
        NomographModel::new(ChartVariant::Parallel, vec![Formula::identity(); 3]).unwrap()
    }

    #[test]
    fn pan_keeps_latest_drag_only() {
        let mut model = model();
        let mut pan = PanGesture::new();
        pan.press(Point::new(10.0, 10.0));
        pan.drag(&mut model, Point::new(11.0, 10.0));
        pan.drag(&mut model, Point::new(13.0, 14.0));
        assert_eq!(model.state(), TransformState::Pending);
        pan.release(&mut model);
        assert!(!pan.is_active());
        assert_eq!(
            model.committed_transform(),
            &TransformMatrix::translate(3.0, 4.0)
        );
    }

    #[test]
    fn cancelled_pan_leaves_model_clean() {
        let mut model = model();
        let mut pan = PanGesture::new();
        pan.drag(&mut model, Point::new(5.0, 5.0));
        assert_eq!(model.state(), TransformState::Clean);
        pan.press(Point::ORIGIN);
        pan.drag(&mut model, Point::new(5.0, 5.0));
        pan.cancel(&mut model);
        assert_eq!(model.state(), TransformState::Clean);
        assert!(model.committed_transform().is_identity());
    }

    #[test]
    fn zoom_keeps_center_fixed() {
        let mut model = model();
        zoom_at(&mut model, Point::new(1.0, 1.0), 2.0);
        // scale 1 passes through (1, 1) at t = 1
        let p = model.point_at(1, 1.0).unwrap();
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
        zoom_at(&mut model, Point::ORIGIN, 0.0);
        assert_eq!(model.state(), TransformState::Clean);
    }

    #[test]
    fn drag_zoom_factor_is_clamped() {
        assert_eq!(zoom_factor_from_drag(0.0, 100.0), 1.0);
        assert_eq!(zoom_factor_from_drag(50.0, 100.0), 0.5);
        assert_eq!(zoom_factor_from_drag(-5000.0, 100.0), 10.0);
        assert_eq!(zoom_factor_from_drag(10.0, 0.0), 1.0);
    }
}
