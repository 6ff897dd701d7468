//! The nomograph model: base geometry, transform lifecycle, and scale domains.
//!
//! A [`NomographModel`] owns the untransformed base matrix produced by its
//! [`ChartVariant`], the product of all committed gestures, at most one
//! pending gesture, and a [`TickSet`] per scale. Every mutation recomposes
//! the displayable `current_matrix`:
//!
//! ```text
//! current = reduce(base · committed [· pending])
//! ```
//!
//! where `reduce` divides each row's coordinates by its weight unless that
//! weight is already the constant `1`.
//!
//! Gestures follow a two-state machine. Proposing a gesture replaces any
//! earlier uncommitted one, so a drag that proposes a fresh translation on
//! every move keeps only the latest; [`NomographModel::commit`] folds it into
//! the committed transform.

mod builder;
mod cell;

pub use builder::NomographBuilder;
pub use cell::{Cell, CellMatrix, Row};

use thiserror::Error;

use crate::chart::ChartVariant;
use crate::formula::{Formula, FormulaError, FormulaParser};
use crate::geom::Point;
use crate::ticks::TickSet;
use crate::transform::TransformMatrix;
use crate::view::{FitConfig, Range, Viewport, fit_transform};

/// Errors returned by model mutations and queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NomographError {
    /// Formula text failed to parse; the model is unchanged.
    #[error(transparent)]
    Formula(#[from] FormulaError),
    /// A scale index at or beyond the scale count.
    #[error("no scale {index} (chart has {count} scales)")]
    ScaleOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of scales.
        count: usize,
    },
    /// A variable index at or beyond the variable count.
    #[error("no variable {index} (chart has {count} variables)")]
    VariableOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of variables.
        count: usize,
    },
    /// A matrix, formula list, or other model with the wrong number of scales.
    #[error("expected {expected} scales, found {found}")]
    ScaleCountMismatch {
        /// Scales the model has.
        expected: usize,
        /// Scales supplied.
        found: usize,
    },
    /// A variable binding list whose length does not match the scale count.
    #[error("expected {expected} variable bindings, found {found}")]
    BindingMismatch {
        /// Scales the model has.
        expected: usize,
        /// Bindings supplied.
        found: usize,
    },
}

/// Transform lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformState {
    /// No gesture pending.
    Clean,
    /// A gesture has been proposed but not committed.
    Pending,
}

/// A nomograph under construction.
#[derive(Debug, Clone)]
pub struct NomographModel {
    name: String,
    variant: ChartVariant,
    formulas: Vec<Formula>,
    bindings: Vec<usize>,
    base: CellMatrix,
    committed: TransformMatrix,
    pending: Option<TransformMatrix>,
    current: CellMatrix,
    ticks: Vec<TickSet>,
}

impl NomographModel {
    /// Create a model with one independent variable per scale and default
    /// tick sets.
    pub fn new(variant: ChartVariant, formulas: Vec<Formula>) -> Result<Self, NomographError> {
        let bindings = (0..formulas.len()).collect();
        Self::with_bindings(variant, formulas, bindings)
    }

    /// Create a model with an explicit scale → variable binding.
    pub fn with_bindings(
        variant: ChartVariant,
        formulas: Vec<Formula>,
        bindings: Vec<usize>,
    ) -> Result<Self, NomographError> {
        let base = variant.base_matrix(&formulas)?;
        if bindings.len() != formulas.len() {
            return Err(NomographError::BindingMismatch {
                expected: formulas.len(),
                found: bindings.len(),
            });
        }
        let count = formulas.len();
        let mut model = Self {
            name: variant.name().to_string(),
            variant,
            formulas,
            bindings,
            base,
            committed: TransformMatrix::identity(),
            pending: None,
            current: CellMatrix::default(),
            ticks: vec![TickSet::default(); count],
        };
        model.recompute();
        tracing::debug!(variant = %variant, scales = count, "created nomograph");
        Ok(model)
    }

    /// Start building a model.
    pub fn builder(variant: ChartVariant) -> NomographBuilder {
        NomographBuilder::new(variant)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Chart topology.
    pub fn variant(&self) -> ChartVariant {
        self.variant
    }

    /// Number of scales.
    pub fn scale_count(&self) -> usize {
        self.formulas.len()
    }

    /// Number of distinct parameter variables referenced by the bindings.
    pub fn variable_count(&self) -> usize {
        self.bindings.iter().max().map_or(0, |max| max + 1)
    }

    /// Variable bound to a scale.
    pub fn binding(&self, scale: usize) -> Result<usize, NomographError> {
        self.check_scale(scale)?;
        Ok(self.bindings[scale])
    }

    /// All bindings, indexed by scale.
    pub fn bindings(&self) -> &[usize] {
        &self.bindings
    }

    /// Scales that share a variable.
    pub fn scales_for_variable(&self, variable: usize) -> Result<Vec<usize>, NomographError> {
        self.check_variable(variable)?;
        Ok(self
            .bindings
            .iter()
            .enumerate()
            .filter(|(_, bound)| **bound == variable)
            .map(|(scale, _)| scale)
            .collect())
    }

    fn check_scale(&self, index: usize) -> Result<(), NomographError> {
        if index < self.scale_count() {
            Ok(())
        } else {
            Err(NomographError::ScaleOutOfRange {
                index,
                count: self.scale_count(),
            })
        }
    }

    fn check_variable(&self, index: usize) -> Result<(), NomographError> {
        if index < self.variable_count() {
            Ok(())
        } else {
            Err(NomographError::VariableOutOfRange {
                index,
                count: self.variable_count(),
            })
        }
    }

    // ----- formulas -----

    /// Formula of a scale.
    pub fn formula(&self, scale: usize) -> Result<&Formula, NomographError> {
        self.check_scale(scale)?;
        Ok(&self.formulas[scale])
    }

    /// All formulas, indexed by scale.
    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    /// Replace a scale's formula, rewriting only that scale's formula cells.
    pub fn set_formula(&mut self, scale: usize, formula: Formula) -> Result<(), NomographError> {
        self.check_scale(scale)?;
        let cells = self
            .variant
            .formula_cells(scale, &formula)
            .ok_or(NomographError::ScaleOutOfRange {
                index: scale,
                count: self.variant.scale_count(),
            })?;
        if let Some(row) = self.base.row_mut(scale) {
            for (col, cell) in cells {
                row.set_cell(col, cell);
            }
        }
        tracing::debug!(scale, formula = formula.source(), "formula updated");
        self.formulas[scale] = formula;
        self.recompute();
        Ok(())
    }

    /// Parse text and install it as a scale's formula.
    ///
    /// On a parse error the previous formula stays active.
    pub fn set_formula_text(
        &mut self,
        scale: usize,
        text: &str,
        parser: &dyn FormulaParser,
    ) -> Result<(), NomographError> {
        self.check_scale(scale)?;
        let formula = parser.parse(text)?;
        self.set_formula(scale, formula)
    }

    // ----- ranges and ticks -----

    /// Tick set of a scale.
    pub fn ticks(&self, scale: usize) -> Result<&TickSet, NomographError> {
        self.check_scale(scale)?;
        Ok(&self.ticks[scale])
    }

    /// Replace a scale's tick set.
    pub fn set_ticks(&mut self, scale: usize, ticks: TickSet) -> Result<(), NomographError> {
        self.edit_ticks(scale, |slot| *slot = ticks)
    }

    /// Set both bounds of a scale's domain (reversed bounds are swapped).
    pub fn set_range(&mut self, scale: usize, min: f64, max: f64) -> Result<(), NomographError> {
        self.edit_ticks(scale, |ticks| ticks.set_range(min, max))
    }

    /// Set a scale's lower bound, clamped to its upper bound.
    pub fn set_min(&mut self, scale: usize, min: f64) -> Result<(), NomographError> {
        self.edit_ticks(scale, |ticks| ticks.set_min(min))
    }

    /// Set a scale's upper bound, clamped to its lower bound.
    pub fn set_max(&mut self, scale: usize, max: f64) -> Result<(), NomographError> {
        self.edit_ticks(scale, |ticks| ticks.set_max(max))
    }

    /// Set a scale's major tick step.
    pub fn set_major_step(&mut self, scale: usize, step: f64) -> Result<(), NomographError> {
        self.edit_ticks(scale, |ticks| ticks.set_major_step(step))
    }

    /// Set a scale's minor tick step.
    pub fn set_minor_step(&mut self, scale: usize, step: f64) -> Result<(), NomographError> {
        self.edit_ticks(scale, |ticks| ticks.set_minor_step(step))
    }

    /// Set the domain of every scale bound to `variable`.
    pub fn set_variable_range(
        &mut self,
        variable: usize,
        min: f64,
        max: f64,
    ) -> Result<(), NomographError> {
        for scale in self.scales_for_variable(variable)? {
            self.ticks[scale].set_range(min, max);
        }
        self.recompute();
        Ok(())
    }

    fn edit_ticks(
        &mut self,
        scale: usize,
        edit: impl FnOnce(&mut TickSet),
    ) -> Result<(), NomographError> {
        self.check_scale(scale)?;
        edit(&mut self.ticks[scale]);
        self.recompute();
        Ok(())
    }

    // ----- matrices -----

    /// The untransformed base matrix.
    pub fn base_matrix(&self) -> &CellMatrix {
        &self.base
    }

    /// Replace the base matrix directly.
    pub fn set_base_matrix(&mut self, base: CellMatrix) -> Result<(), NomographError> {
        if base.len() != self.scale_count() {
            return Err(NomographError::ScaleCountMismatch {
                expected: self.scale_count(),
                found: base.len(),
            });
        }
        self.base = base;
        self.recompute();
        Ok(())
    }

    /// Re-derive the base matrix from the current formulas and topology.
    pub fn rebuild_base_matrix(&mut self) -> Result<(), NomographError> {
        self.base = self.variant.base_matrix(&self.formulas)?;
        self.recompute();
        Ok(())
    }

    /// The reduced, displayable matrix.
    pub fn current_matrix(&self) -> &CellMatrix {
        &self.current
    }

    /// Reduced row of one scale.
    pub fn current_row(&self, scale: usize) -> Result<&Row, NomographError> {
        self.check_scale(scale)?;
        Ok(&self.current.rows()[scale])
    }

    /// Displayed position of a scale at parameter `t`. May be non-finite.
    pub fn point_at(&self, scale: usize, t: f64) -> Result<Point, NomographError> {
        Ok(self.current_row(scale)?.point_at(t))
    }

    /// Recompose `current_matrix` from the base matrix and transforms.
    pub fn recompute(&mut self) {
        let transform = self.effective_transform();
        self.current = self.base.transformed(&transform).reduced();
        tracing::trace!(pending = self.pending.is_some(), "recomputed current matrix");
    }

    // ----- transform lifecycle -----

    /// Product of all committed gestures.
    pub fn committed_transform(&self) -> &TransformMatrix {
        &self.committed
    }

    /// The gesture awaiting commit, if any.
    pub fn pending_transform(&self) -> Option<&TransformMatrix> {
        self.pending.as_ref()
    }

    /// `committed · pending`, or just `committed` when clean.
    pub fn effective_transform(&self) -> TransformMatrix {
        match &self.pending {
            Some(pending) => self.committed.compose(pending),
            None => self.committed,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TransformState {
        if self.pending.is_some() {
            TransformState::Pending
        } else {
            TransformState::Clean
        }
    }

    /// Propose a gesture, discarding any earlier uncommitted one.
    ///
    /// Singular gestures are accepted; the geometry simply collapses.
    pub fn propose(&mut self, gesture: TransformMatrix) {
        if gesture.is_singular() {
            tracing::warn!(determinant = gesture.determinant(), "proposed gesture is singular");
        }
        self.pending = Some(gesture);
        self.recompute();
    }

    /// Fold the pending gesture into the committed transform.
    pub fn commit(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.committed = self.committed.compose(&pending);
        tracing::debug!("committed gesture");
        self.recompute();
    }

    /// Drop the pending gesture.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.recompute();
        }
    }

    /// Reset the committed transform to identity.
    pub fn reset_transform(&mut self) {
        self.committed = TransformMatrix::identity();
        tracing::debug!("reset committed transform");
        self.recompute();
    }

    /// Propose a scale about the origin.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.propose(TransformMatrix::scale(sx, sy));
    }

    /// Propose a scale that keeps `(px, py)` fixed.
    pub fn scale_about(&mut self, sx: f64, sy: f64, px: f64, py: f64) {
        self.propose(TransformMatrix::scale_about(sx, sy, px, py));
    }

    /// Propose a translation.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.propose(TransformMatrix::translate(dx, dy));
    }

    /// Propose a rotation (radians). See [`TransformMatrix::rotate`].
    pub fn rotate(&mut self, theta: f64) {
        self.propose(TransformMatrix::rotate(theta));
    }

    /// Propose a rotation (degrees).
    pub fn rotate_degrees(&mut self, degrees: f64) {
        self.propose(TransformMatrix::rotate_degrees(degrees));
    }

    /// Propose a shear.
    pub fn shear(&mut self, theta_x: f64, theta_y: f64) {
        self.propose(TransformMatrix::shear(theta_x, theta_y));
    }

    /// Propose an axis swap.
    pub fn flip(&mut self) {
        self.propose(TransformMatrix::flip());
    }

    /// Propose a perspective projection.
    pub fn project(&mut self, xp: f64, yp: f64, zp: f64) {
        self.propose(TransformMatrix::project(xp, yp, zp));
    }

    // ----- topology switching -----

    /// Copy formulas, bindings, ticks, transforms, and base matrix from
    /// another model with the same scale count.
    ///
    /// The base matrix is copied verbatim; call
    /// [`rebuild_base_matrix`](Self::rebuild_base_matrix) to lay the copied
    /// formulas out in this model's topology.
    pub fn copy_state_from(&mut self, other: &NomographModel) -> Result<(), NomographError> {
        if other.scale_count() != self.scale_count() {
            return Err(NomographError::ScaleCountMismatch {
                expected: self.scale_count(),
                found: other.scale_count(),
            });
        }
        self.formulas = other.formulas.clone();
        self.bindings = other.bindings.clone();
        self.ticks = other.ticks.clone();
        self.committed = other.committed;
        self.pending = other.pending;
        self.base = other.base.clone();
        self.recompute();
        Ok(())
    }

    /// A model in another topology carrying this model's state.
    pub fn convert_to(&self, variant: ChartVariant) -> Result<NomographModel, NomographError> {
        let mut converted = NomographModel::with_bindings(
            variant,
            self.formulas.clone(),
            self.bindings.clone(),
        )?;
        converted.copy_state_from(self)?;
        converted.rebuild_base_matrix()?;
        tracing::debug!(from = %self.variant, to = %variant, "switched topology");
        Ok(converted)
    }

    // ----- view fitting -----

    /// Bounding box of the displayed scales, sampled `samples` times each.
    ///
    /// Non-finite samples are ignored. Returns `None` when nothing finite was
    /// sampled.
    pub fn bounds(&self, samples: usize) -> Option<Viewport> {
        let mut x: Option<Range> = None;
        let mut y: Option<Range> = None;
        for (row, ticks) in self.current.rows().iter().zip(&self.ticks) {
            for t in sample_parameters(ticks.min(), ticks.max(), samples) {
                let point = row.point_at(t);
                if !point.is_finite() {
                    continue;
                }
                x.get_or_insert(Range::new(point.x, point.x))
                    .expand_to_include(point.x);
                y.get_or_insert(Range::new(point.y, point.y))
                    .expand_to_include(point.y);
            }
        }
        Some(Viewport::new(x?, y?))
    }

    /// Propose and commit the transform that fits the chart into `target`.
    ///
    /// Returns `false` (and leaves the model untouched) when the chart has no
    /// finite extent or the target is empty.
    pub fn fit_to(&mut self, target: Viewport, config: &FitConfig) -> bool {
        let Some(bounds) = self.bounds(config.samples) else {
            return false;
        };
        let Some(fit) = fit_transform(bounds, target, config) else {
            return false;
        };
        self.propose(fit);
        self.commit();
        true
    }
}

/// `count` evenly spaced parameters over `[min, max]`, endpoints included.
pub(crate) fn sample_parameters(min: f64, max: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = if count > 1 {
        (max - min) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(move |i| {
        if i + 1 == count && count > 1 {
            max
        } else {
            min + step * i as f64
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::ExprParser;

    fn parallel() -> NomographModel {
        NomographModel::new(ChartVariant::Parallel, vec![Formula::identity(); 3]).unwrap()
    }

    #[test]
    fn propose_replaces_pending_gesture() {
        let mut model = parallel();
        model.translate(1.0, 0.0);
        model.translate(0.0, 2.0);
        assert_eq!(model.state(), TransformState::Pending);
        model.commit();
        assert_eq!(model.state(), TransformState::Clean);
        assert_eq!(
            model.committed_transform(),
            &TransformMatrix::translate(0.0, 2.0)
        );
    }

    #[test]
    fn commit_without_pending_is_noop() {
        let mut model = parallel();
        model.commit();
        assert!(model.committed_transform().is_identity());
    }

    #[test]
    fn pending_gesture_is_displayed_before_commit() {
        let mut model = parallel();
        model.translate(10.0, 0.0);
        let p = model.point_at(0, 1.0).unwrap();
        assert_eq!(p, Point::new(11.0, 0.0));
        model.cancel();
        assert_eq!(model.point_at(0, 1.0).unwrap(), Point::new(1.0, 0.0));
    }

    #[test]
    fn reset_keeps_pending_and_formulas() {
        let mut model = parallel();
        model.scale(2.0, 2.0);
        model.commit();
        model.translate(1.0, 1.0);
        model.reset_transform();
        assert!(model.committed_transform().is_identity());
        assert_eq!(model.state(), TransformState::Pending);
        assert_eq!(model.formula(0).unwrap(), &Formula::identity());
    }

    #[test]
    fn projection_reduces_rows() {
        let mut model = parallel();
        model.project(0.0, 1.0, 1.0);
        model.commit();
        for row in model.current_matrix().rows() {
            assert!(row.is_reduced());
        }
        // scale 1 sits on y = 1, weight 2
        let p = model.point_at(1, 1.0).unwrap();
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!((p.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn formula_edit_rewrites_only_its_cells() {
        let mut model =
            NomographModel::new(ChartVariant::ZChart, vec![Formula::identity(); 3]).unwrap();
        let before = model.base_matrix().clone();
        model
            .set_formula_text(1, "2*t", &ExprParser::new())
            .unwrap();
        let after = model.base_matrix();
        assert_eq!(before.row(0), after.row(0));
        assert_eq!(before.row(2), after.row(2));
        assert_eq!(before.row(1).unwrap().y(), after.row(1).unwrap().y());
        // 2/(1+2)
        assert!((model.point_at(1, 1.0).unwrap().x - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn parse_failure_leaves_model_unchanged() {
        let mut model = parallel();
        let before = model.current_matrix().clone();
        let err = model
            .set_formula_text(0, "t +", &ExprParser::new())
            .unwrap_err();
        assert_eq!(err, NomographError::Formula(FormulaError::UnexpectedEnd));
        assert_eq!(model.current_matrix(), &before);
        assert_eq!(model.formula(0).unwrap().source(), "t");
    }

    #[test]
    fn out_of_range_scale_is_reported() {
        let mut model = parallel();
        let expected = NomographError::ScaleOutOfRange { index: 3, count: 3 };
        assert_eq!(model.ticks(3).unwrap_err(), expected);
        assert_eq!(model.set_range(3, 0.0, 1.0).unwrap_err(), expected);
        assert_eq!(model.formula(3).unwrap_err(), expected);
        assert_eq!(
            model.set_formula(3, Formula::identity()).unwrap_err(),
            expected
        );
    }

    #[test]
    fn shared_variables_share_ranges() {
        let mut model = NomographModel::with_bindings(
            ChartVariant::Concurrent,
            vec![Formula::identity(); 3],
            vec![0, 1, 0],
        )
        .unwrap();
        assert_eq!(model.variable_count(), 2);
        assert_eq!(model.scales_for_variable(0).unwrap(), vec![0, 2]);
        model.set_variable_range(0, 2.0, 5.0).unwrap();
        assert_eq!(model.ticks(2).unwrap().max(), 5.0);
        assert_eq!(model.ticks(1).unwrap().max(), 1.0);
        assert!(matches!(
            model.set_variable_range(2, 0.0, 1.0),
            Err(NomographError::VariableOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn binding_length_is_checked() {
        let err = NomographModel::with_bindings(
            ChartVariant::Parallel,
            vec![Formula::identity(); 3],
            vec![0, 1],
        )
        .unwrap_err();
        assert_eq!(err, NomographError::BindingMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn set_base_matrix_checks_row_count() {
        let mut model = parallel();
        let err = model
            .set_base_matrix(CellMatrix::new(vec![Row::new(0.0, 0.0, 1.0)]))
            .unwrap_err();
        assert_eq!(err, NomographError::ScaleCountMismatch { expected: 3, found: 1 });

        let rows = vec![Row::new(Formula::identity(), 0.0, 2.0); 3];
        model.set_base_matrix(CellMatrix::new(rows)).unwrap();
        assert_eq!(model.point_at(0, 4.0).unwrap(), Point::new(2.0, 0.0));
    }

    #[test]
    fn bounds_cover_all_scales() {
        let model = parallel();
        let bounds = model.bounds(11).unwrap();
        assert_eq!(bounds.x, Range::new(0.0, 1.0));
        assert_eq!(bounds.y, Range::new(0.0, 1.0));
    }

    #[test]
    fn sample_parameters_hit_endpoints() {
        let ts: Vec<f64> = sample_parameters(0.0, 0.3, 4).collect();
        assert_eq!(ts.len(), 4);
        assert_eq!(ts[0], 0.0);
        assert_eq!(ts[3], 0.3);
        assert_eq!(sample_parameters(1.0, 2.0, 1).collect::<Vec<_>>(), vec![1.0]);
        assert_eq!(sample_parameters(1.0, 2.0, 0).count(), 0);
    }
}
