//! Matrix cells and rows in homogeneous form.

use crate::formula::{Expr, Formula};
use crate::geom::Point;
use crate::transform::TransformMatrix;

/// One entry of a scale row: a constant or a function of the parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Constant value.
    Constant(f64),
    /// Function of the scale parameter.
    Function(Formula),
}

impl Cell {
    /// Build a cell from an expression, collapsing constants.
    pub fn from_expr(expr: Expr) -> Self {
        match expr.as_const() {
            Some(value) => Self::Constant(value),
            None => Self::Function(Formula::from_expr(expr)),
        }
    }

    /// The cell as an expression.
    pub fn to_expr(&self) -> Expr {
        match self {
            Self::Constant(value) => Expr::Const(*value),
            Self::Function(formula) => formula.expr().clone(),
        }
    }

    /// Evaluate at `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Function(formula) => formula.evaluate(t),
        }
    }

    /// Derivative at `t`.
    pub fn derivative_at(&self, t: f64) -> f64 {
        match self {
            Self::Constant(_) => 0.0,
            Self::Function(formula) => formula.derivative_at(t),
        }
    }

    /// Whether this is structurally the constant `1`.
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Constant(value) if *value == 1.0)
    }

    /// The constant value, if any.
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Self::Constant(value) => Some(*value),
            Self::Function(_) => None,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<Formula> for Cell {
    fn from(formula: Formula) -> Self {
        Self::Function(formula)
    }
}

/// A scale row `[x(t), y(t), weight(t)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: [Cell; 3],
}

impl Row {
    /// Create a row from its three cells.
    pub fn new(x: impl Into<Cell>, y: impl Into<Cell>, weight: impl Into<Cell>) -> Self {
        Self {
            cells: [x.into(), y.into(), weight.into()],
        }
    }

    /// Access all cells.
    pub fn cells(&self) -> &[Cell; 3] {
        &self.cells
    }

    /// Cell at column `col` (0 = x, 1 = y, 2 = weight).
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Replace one cell. Out-of-range columns are ignored.
    pub fn set_cell(&mut self, col: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(col) {
            *slot = cell;
        }
    }

    /// X cell.
    pub fn x(&self) -> &Cell {
        &self.cells[0]
    }

    /// Y cell.
    pub fn y(&self) -> &Cell {
        &self.cells[1]
    }

    /// Weight cell.
    pub fn weight(&self) -> &Cell {
        &self.cells[2]
    }

    /// Whether the weight is structurally the constant `1`.
    pub fn is_reduced(&self) -> bool {
        self.weight().is_unit()
    }

    /// Row-vector product `self · m`.
    pub fn transformed(&self, m: &TransformMatrix) -> Row {
        let exprs = self.cells.each_ref().map(Cell::to_expr);
        let column = |j: usize| {
            let sum = (0..3).fold(Expr::Const(0.0), |acc, i| {
                Expr::add(acc, Expr::mul(exprs[i].clone(), Expr::Const(m.get(i, j))))
            });
            Cell::from_expr(sum)
        };
        Row {
            cells: [column(0), column(1), column(2)],
        }
    }

    /// Divide the coordinates through by the weight.
    ///
    /// Rows whose weight is already the constant `1` are returned unchanged.
    pub fn reduced(&self) -> Row {
        if self.is_reduced() {
            return self.clone();
        }
        let weight = self.weight().to_expr();
        let divide = |cell: &Cell| Cell::from_expr(Expr::div(cell.to_expr(), weight.clone()));
        Row {
            cells: [divide(self.x()), divide(self.y()), Cell::Constant(1.0)],
        }
    }

    /// Affine point at `t`, dividing by the weight. May be non-finite.
    pub fn point_at(&self, t: f64) -> Point {
        let w = self.weight().evaluate(t);
        Point::new(self.x().evaluate(t) / w, self.y().evaluate(t) / w)
    }

    /// Derivative of `(x, y)` at `t` for a reduced row.
    pub fn tangent_at(&self, t: f64) -> Point {
        Point::new(self.x().derivative_at(t), self.y().derivative_at(t))
    }
}

/// An `n×3` matrix of scale rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellMatrix {
    rows: Vec<Row>,
}

impl CellMatrix {
    /// Build a matrix from rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows (scales).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Access all rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row for one scale.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// Every row multiplied by `m`.
    pub fn transformed(&self, m: &TransformMatrix) -> CellMatrix {
        CellMatrix::new(self.rows.iter().map(|row| row.transformed(m)).collect())
    }

    /// Every row reduced to unit weight.
    pub fn reduced(&self) -> CellMatrix {
        CellMatrix::new(self.rows.iter().map(Row::reduced).collect())
    }
}
