//! Scale formulas: one-parameter real functions with a known derivative.
//!
//! A [`Formula`] is built once from an [`Expr`] and carries that expression's
//! derivative alongside it. Editing a scale replaces the whole formula, so an
//! evaluator is never paired with a derivative from a different revision.
//!
//! Text ingestion goes through the [`FormulaParser`] trait. [`ExprParser`] is
//! the bundled implementation; hosts with their own expression language can
//! implement the trait instead.

mod expr;
mod parser;

pub use expr::{Expr, Func};
pub use parser::{ExprParser, MAX_DEPTH};

use thiserror::Error;

/// Errors produced while parsing formula text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// The input contained no tokens.
    #[error("formula is empty")]
    Empty,
    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedChar {
        /// Offending character.
        ch: char,
        /// Byte offset in the input.
        position: usize,
    },
    /// A malformed numeric literal.
    #[error("invalid number '{literal}' at {position}")]
    InvalidNumber {
        /// Literal text.
        literal: String,
        /// Byte offset in the input.
        position: usize,
    },
    /// A token that does not fit the grammar at this point.
    #[error("unexpected '{found}' at {position}")]
    UnexpectedToken {
        /// Printed form of the token.
        found: String,
        /// Byte offset in the input.
        position: usize,
    },
    /// The input ended in the middle of an expression.
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    /// A name that is neither the parameter nor a known constant.
    #[error("unknown identifier '{name}' at {position}")]
    UnknownIdentifier {
        /// Identifier text.
        name: String,
        /// Byte offset in the input.
        position: usize,
    },
    /// A call to a function the parser does not know.
    #[error("unknown function '{name}' at {position}")]
    UnknownFunction {
        /// Function name.
        name: String,
        /// Byte offset in the input.
        position: usize,
    },
    /// Parentheses, signs, exponents, or operator chains nest past
    /// [`MAX_DEPTH`].
    #[error("formula nests too deeply at {position}")]
    TooDeep {
        /// Byte offset where the limit was crossed.
        position: usize,
    },
}

/// Turns user-entered text into a [`Formula`].
pub trait FormulaParser {
    /// Parse `text`. Failures must not have side effects.
    fn parse(&self, text: &str) -> Result<Formula, FormulaError>;
}

/// A one-variable function paired with its derivative.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
    derivative: Expr,
}

impl Formula {
    /// Parse text with the default parser (parameter `t`).
    pub fn parse(text: &str) -> Result<Self, FormulaError> {
        ExprParser::new().parse(text)
    }

    /// Build a formula from an expression, printing it as the source text.
    pub fn from_expr(expr: Expr) -> Self {
        let source = expr.to_string();
        Self::with_source(source, expr)
    }

    /// Build a formula from an expression with explicit source text.
    pub fn with_source(source: impl Into<String>, expr: Expr) -> Self {
        let derivative = expr.derivative();
        Self {
            source: source.into(),
            expr,
            derivative,
        }
    }

    /// A constant function.
    pub fn constant(value: f64) -> Self {
        Self::from_expr(Expr::Const(value))
    }

    /// The identity function `t`.
    pub fn identity() -> Self {
        Self::from_expr(Expr::Param)
    }

    /// Source text, for round-trip display.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The expression tree.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Whether the formula ignores its parameter.
    pub fn is_constant(&self) -> bool {
        self.expr.is_constant()
    }

    /// Evaluate at `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        self.expr.eval(t)
    }

    /// Evaluate the derivative at `t`.
    pub fn derivative_at(&self, t: f64) -> f64 {
        self.derivative.eval(t)
    }

    /// The derivative as a formula of its own.
    pub fn derivative(&self) -> Formula {
        Formula::from_expr(self.derivative.clone())
    }

    /// Evaluate at every parameter value in `ts`.
    pub fn evaluate_many(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.expr.eval(t)).collect()
    }

    /// A new formula computed from this one's expression.
    pub fn map(&self, f: impl FnOnce(Expr) -> Expr) -> Formula {
        Formula::from_expr(f(self.expr.clone()))
    }

    /// `k * f`.
    pub fn scaled(&self, k: f64) -> Formula {
        self.map(|e| Expr::mul(Expr::Const(k), e))
    }

    /// `-f`.
    pub fn negated(&self) -> Formula {
        self.map(Expr::neg)
    }

    /// `f / (1 + f)`.
    pub fn ratio_over_one_plus(&self) -> Formula {
        self.map(|e| Expr::div(e.clone(), Expr::add(Expr::Const(1.0), e)))
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_tracks_expression() {
        let f = Formula::parse("t^2 + 3*t").unwrap();
        assert_eq!(f.source(), "t^2 + 3*t");
        assert_eq!(f.evaluate(2.0), 10.0);
        assert!((f.derivative_at(2.0) - 7.0).abs() < 1e-12);
        assert!((f.derivative().evaluate(1.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn evaluate_many_is_pointwise() {
        let f = Formula::parse("2*t").unwrap();
        assert_eq!(f.evaluate_many(&[0.0, 1.0, 2.5]), vec![0.0, 2.0, 5.0]);
    }

    #[test]
    fn composition_rederives() {
        let f = Formula::parse("t").unwrap();
        let g = f.ratio_over_one_plus();
        assert!((g.evaluate(1.0) - 0.5).abs() < 1e-12);
        assert!((g.derivative_at(1.0) - 0.25).abs() < 1e-12);

        let h = f.scaled(0.5);
        assert_eq!(h.evaluate(4.0), 2.0);
        assert_eq!(h.derivative_at(4.0), 0.5);
        assert_eq!(f.negated().evaluate(3.0), -3.0);
    }

    #[test]
    fn constants_are_detected() {
        assert!(Formula::constant(1.0).is_constant());
        assert!(Formula::parse("sin(pi) * 2").unwrap().is_constant());
        assert!(!Formula::identity().is_constant());
    }

    #[test]
    fn parse_error_is_reported() {
        let err = Formula::parse("t +* 1").unwrap_err();
        assert_eq!(err.to_string(), "unexpected '*' at 3");
    }
}
