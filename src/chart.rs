//! Chart topologies: where each scale's formula lands in the base matrix.
//!
//! A topology is a pure mapping. It fixes the constant cells of every row
//! (the skeleton) and says which cells a scale's formula populates, so a
//! single formula edit only rewrites that scale's formula cells.

use serde::{Deserialize, Serialize};

use crate::formula::Formula;
use crate::model::{Cell, CellMatrix, NomographError, Row};

/// The closed set of supported chart topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartVariant {
    /// Two parallel vertical scales with the third on their midline.
    Parallel,
    /// Two parallel scales joined by a diagonal ratio scale ("Z" or "N").
    ZChart,
    /// Three scales through a common pivot.
    Concurrent,
}

impl ChartVariant {
    /// Every variant, in catalog order.
    pub const ALL: [Self; 3] = [Self::Parallel, Self::ZChart, Self::Concurrent];

    /// Number of scales in this topology.
    pub fn scale_count(self) -> usize {
        3
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Parallel => "Parallel",
            Self::ZChart => "Z-Chart",
            Self::Concurrent => "Concurrent",
        }
    }

    /// Constant cells of a scale's row; formula cells hold `0`.
    pub fn skeleton(self, scale: usize) -> Option<Row> {
        let row = match (self, scale) {
            (Self::Parallel, 0) => Row::new(0.0, 0.0, 1.0),
            (Self::Parallel, 1) => Row::new(0.0, 1.0, 1.0),
            (Self::Parallel, 2) => Row::new(0.0, 0.5, 1.0),
            (Self::ZChart, 0) => Row::new(0.0, 0.0, 1.0),
            (Self::ZChart, 1) => Row::new(0.0, 0.0, 1.0),
            (Self::ZChart, 2) => Row::new(1.0, 0.0, 1.0),
            (Self::Concurrent, 0) => Row::new(0.0, 0.0, 1.0),
            (Self::Concurrent, 1) => Row::new(0.0, 0.0, 1.0),
            (Self::Concurrent, 2) => Row::new(0.0, 0.0, 1.0),
            _ => return None,
        };
        Some(row)
    }

    /// Cells `(column, cell)` that a scale's formula populates.
    pub fn formula_cells(self, scale: usize, formula: &Formula) -> Option<Vec<(usize, Cell)>> {
        let f = || Cell::Function(formula.clone());
        let cells = match (self, scale) {
            (Self::Parallel, 0 | 1) => vec![(0, f())],
            (Self::Parallel, 2) => vec![(0, Cell::Function(formula.scaled(0.5)))],
            (Self::ZChart, 0) => vec![(1, f())],
            (Self::ZChart, 1) => vec![(0, Cell::Function(formula.ratio_over_one_plus()))],
            (Self::ZChart, 2) => vec![(1, Cell::Function(formula.negated()))],
            (Self::Concurrent, 0) => vec![(0, f())],
            (Self::Concurrent, 1) => vec![(0, f()), (1, f())],
            (Self::Concurrent, 2) => vec![(1, f())],
            _ => return None,
        };
        Some(cells)
    }

    /// Full row for one scale.
    pub fn row(self, scale: usize, formula: &Formula) -> Option<Row> {
        let mut row = self.skeleton(scale)?;
        for (col, cell) in self.formula_cells(scale, formula)? {
            row.set_cell(col, cell);
        }
        Some(row)
    }

    /// Base matrix for a full set of formulas.
    pub fn base_matrix(self, formulas: &[Formula]) -> Result<CellMatrix, NomographError> {
        if formulas.len() != self.scale_count() {
            return Err(NomographError::ScaleCountMismatch {
                expected: self.scale_count(),
                found: formulas.len(),
            });
        }
        let rows = formulas
            .iter()
            .enumerate()
            .map(|(scale, formula)| {
                self.row(scale, formula)
                    .ok_or(NomographError::ScaleOutOfRange {
                        index: scale,
                        count: self.scale_count(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CellMatrix::new(rows))
    }
}

impl std::fmt::Display for ChartVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn identity_formulas() -> Vec<Formula> {
        vec![Formula::identity(); 3]
    }

    fn points_at(variant: ChartVariant, t: f64) -> Vec<Point> {
        variant
            .base_matrix(&identity_formulas())
            .unwrap()
            .rows()
            .iter()
            .map(|row| row.point_at(t))
            .collect()
    }

    #[test]
    fn parallel_geometry() {
        let points = points_at(ChartVariant::Parallel, 1.0);
        assert_eq!(
            points,
            vec![
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.5, 0.5),
            ]
        );
    }

    #[test]
    fn z_chart_geometry() {
        let points = points_at(ChartVariant::ZChart, 1.0);
        assert_eq!(
            points,
            vec![
                Point::new(0.0, 1.0),
                Point::new(0.5, 0.0),
                Point::new(1.0, -1.0),
            ]
        );
    }

    #[test]
    fn concurrent_geometry() {
        let points = points_at(ChartVariant::Concurrent, 2.0);
        assert_eq!(
            points,
            vec![
                Point::new(2.0, 0.0),
                Point::new(2.0, 2.0),
                Point::new(0.0, 2.0),
            ]
        );
    }

    #[test]
    fn z_chart_middle_scale_touches_one_cell() {
        let f = Formula::parse("t^2").unwrap();
        let cells = ChartVariant::ZChart.formula_cells(1, &f).unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].0, 0);
        // f/(1+f) at t=1 is 1/2
        assert!((cells[0].1.evaluate(1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn wrong_formula_count_is_rejected() {
        let err = ChartVariant::Parallel
            .base_matrix(&[Formula::identity()])
            .unwrap_err();
        assert_eq!(
            err,
            NomographError::ScaleCountMismatch {
                expected: 3,
                found: 1
            }
        );
        assert!(ChartVariant::Concurrent.skeleton(3).is_none());
    }
}
