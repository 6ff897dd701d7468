//! Expression trees over a single free parameter.

use std::fmt;

/// Elementary functions understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Ln,
    /// Base-10 logarithm.
    Log10,
    /// Square root.
    Sqrt,
}

impl Func {
    /// Look up a function by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "exp" => Self::Exp,
            "ln" => Self::Ln,
            "log" | "log10" => Self::Log10,
            "sqrt" => Self::Sqrt,
            _ => return None,
        })
    }

    /// Canonical name used when printing.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Log10 => "log",
            Self::Sqrt => "sqrt",
        }
    }

    fn apply(self, value: f64) -> f64 {
        match self {
            Self::Sin => value.sin(),
            Self::Cos => value.cos(),
            Self::Tan => value.tan(),
            Self::Exp => value.exp(),
            Self::Ln => value.ln(),
            Self::Log10 => value.log10(),
            Self::Sqrt => value.sqrt(),
        }
    }
}

/// A real-valued expression of the free parameter.
///
/// The smart constructors ([`Expr::add`], [`Expr::mul`], ...) fold constants
/// and drop additive zeros and multiplicative ones, so derived expressions
/// stay small and constant cells stay recognisably constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric constant.
    Const(f64),
    /// The free parameter.
    Param,
    /// Negation.
    Neg(Box<Expr>),
    /// Sum.
    Add(Box<Expr>, Box<Expr>),
    /// Difference.
    Sub(Box<Expr>, Box<Expr>),
    /// Product.
    Mul(Box<Expr>, Box<Expr>),
    /// Quotient.
    Div(Box<Expr>, Box<Expr>),
    /// Power.
    Pow(Box<Expr>, Box<Expr>),
    /// Elementary function application.
    Call(Func, Box<Expr>),
}

impl Expr {
    /// The constant value, if this expression is a constant.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Self::Const(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether the expression depends on the parameter.
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Const(_) => true,
            Self::Param => false,
            Self::Neg(inner) | Self::Call(_, inner) => inner.is_constant(),
            Self::Add(a, b)
            | Self::Sub(a, b)
            | Self::Mul(a, b)
            | Self::Div(a, b)
            | Self::Pow(a, b) => {
                a.is_constant() && b.is_constant()
            }
        }
    }

    /// Negation with folding.
    pub fn neg(a: Expr) -> Expr {
        match a {
            Self::Const(value) => Self::Const(-value),
            Self::Neg(inner) => *inner,
            other => Self::Neg(Box::new(other)),
        }
    }

    /// Sum with folding.
    pub fn add(a: Expr, b: Expr) -> Expr {
        match (a.as_const(), b.as_const()) {
            (Some(x), Some(y)) => Self::Const(x + y),
            (Some(x), None) if x == 0.0 => b,
            (None, Some(y)) if y == 0.0 => a,
            _ => Self::Add(Box::new(a), Box::new(b)),
        }
    }

    /// Difference with folding.
    pub fn sub(a: Expr, b: Expr) -> Expr {
        match (a.as_const(), b.as_const()) {
            (Some(x), Some(y)) => Self::Const(x - y),
            (Some(x), None) if x == 0.0 => Self::neg(b),
            (None, Some(y)) if y == 0.0 => a,
            _ => Self::Sub(Box::new(a), Box::new(b)),
        }
    }

    /// Product with folding.
    pub fn mul(a: Expr, b: Expr) -> Expr {
        match (a.as_const(), b.as_const()) {
            (Some(x), Some(y)) => Self::Const(x * y),
            (Some(x), None) | (None, Some(x)) if x == 0.0 => Self::Const(0.0),
            (Some(x), None) if x == 1.0 => b,
            (None, Some(y)) if y == 1.0 => a,
            (Some(x), None) if x == -1.0 => Self::neg(b),
            (None, Some(y)) if y == -1.0 => Self::neg(a),
            _ => Self::Mul(Box::new(a), Box::new(b)),
        }
    }

    /// Quotient with folding.
    pub fn div(a: Expr, b: Expr) -> Expr {
        match (a.as_const(), b.as_const()) {
            (Some(x), Some(y)) if y != 0.0 => Self::Const(x / y),
            (Some(x), None) if x == 0.0 => Self::Const(0.0),
            (None, Some(y)) if y == 1.0 => a,
            _ => Self::Div(Box::new(a), Box::new(b)),
        }
    }

    /// Power with folding.
    pub fn pow(a: Expr, b: Expr) -> Expr {
        match (a.as_const(), b.as_const()) {
            (Some(x), Some(y)) => Self::Const(x.powf(y)),
            (_, Some(y)) if y == 0.0 => Self::Const(1.0),
            (_, Some(y)) if y == 1.0 => a,
            _ => Self::Pow(Box::new(a), Box::new(b)),
        }
    }

    /// Function application with folding.
    pub fn call(func: Func, a: Expr) -> Expr {
        match a.as_const() {
            Some(x) => Self::Const(func.apply(x)),
            None => Self::Call(func, Box::new(a)),
        }
    }

    /// Evaluate at a parameter value.
    pub fn eval(&self, t: f64) -> f64 {
        match self {
            Self::Const(value) => *value,
            Self::Param => t,
            Self::Neg(a) => -a.eval(t),
            Self::Add(a, b) => a.eval(t) + b.eval(t),
            Self::Sub(a, b) => a.eval(t) - b.eval(t),
            Self::Mul(a, b) => a.eval(t) * b.eval(t),
            Self::Div(a, b) => a.eval(t) / b.eval(t),
            Self::Pow(a, b) => a.eval(t).powf(b.eval(t)),
            Self::Call(func, a) => func.apply(a.eval(t)),
        }
    }

    /// Symbolic derivative with respect to the parameter.
    pub fn derivative(&self) -> Expr {
        match self {
            Self::Const(_) => Self::Const(0.0),
            Self::Param => Self::Const(1.0),
            Self::Neg(a) => Self::neg(a.derivative()),
            Self::Add(a, b) => Self::add(a.derivative(), b.derivative()),
            Self::Sub(a, b) => Self::sub(a.derivative(), b.derivative()),
            Self::Mul(a, b) => Self::add(
                Self::mul(a.derivative(), (**b).clone()),
                Self::mul((**a).clone(), b.derivative()),
            ),
            Self::Div(a, b) => Self::div(
                Self::sub(
                    Self::mul(a.derivative(), (**b).clone()),
                    Self::mul((**a).clone(), b.derivative()),
                ),
                Self::pow((**b).clone(), Self::Const(2.0)),
            ),
            Self::Pow(a, b) => match b.as_const() {
                // d(u^c) = c * u^(c-1) * u'
                Some(c) => Self::mul(
                    Self::mul(
                        Self::Const(c),
                        Self::pow((**a).clone(), Self::Const(c - 1.0)),
                    ),
                    a.derivative(),
                ),
                // d(u^v) = u^v * (v' ln u + v u' / u)
                None => Self::mul(
                    self.clone(),
                    Self::add(
                        Self::mul(b.derivative(), Self::call(Func::Ln, (**a).clone())),
                        Self::div(Self::mul((**b).clone(), a.derivative()), (**a).clone()),
                    ),
                ),
            },
            Self::Call(func, a) => {
                let inner = (**a).clone();
                let outer = match func {
                    Func::Sin => Self::call(Func::Cos, inner),
                    Func::Cos => Self::neg(Self::call(Func::Sin, inner)),
                    Func::Tan => Self::div(
                        Self::Const(1.0),
                        Self::pow(Self::call(Func::Cos, inner), Self::Const(2.0)),
                    ),
                    Func::Exp => Self::call(Func::Exp, inner),
                    Func::Ln => Self::div(Self::Const(1.0), inner),
                    Func::Log10 => Self::div(
                        Self::Const(1.0),
                        Self::mul(inner, Self::Const(std::f64::consts::LN_10)),
                    ),
                    Func::Sqrt => Self::div(
                        Self::Const(0.5),
                        Self::call(Func::Sqrt, inner),
                    ),
                };
                Self::mul(outer, a.derivative())
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Add(..) | Self::Sub(..) => 1,
            Self::Mul(..) | Self::Div(..) => 2,
            Self::Neg(_) => 3,
            Self::Pow(..) => 4,
            Self::Const(value) if *value < 0.0 => 3,
            Self::Const(_) | Self::Param | Self::Call(..) => 5,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => write!(f, "{value}"),
            Self::Param => write!(f, "t"),
            Self::Neg(a) => {
                write!(f, "-")?;
                a.fmt_operand(f, 4)
            }
            Self::Add(a, b) => {
                a.fmt_operand(f, 1)?;
                write!(f, " + ")?;
                b.fmt_operand(f, 2)
            }
            Self::Sub(a, b) => {
                a.fmt_operand(f, 1)?;
                write!(f, " - ")?;
                b.fmt_operand(f, 2)
            }
            Self::Mul(a, b) => {
                a.fmt_operand(f, 2)?;
                write!(f, "*")?;
                b.fmt_operand(f, 3)
            }
            Self::Div(a, b) => {
                a.fmt_operand(f, 2)?;
                write!(f, "/")?;
                b.fmt_operand(f, 3)
            }
            Self::Pow(a, b) => {
                a.fmt_operand(f, 5)?;
                write!(f, "^")?;
                b.fmt_operand(f, 4)
            }
            Self::Call(func, a) => write!(f, "{}({a})", func.name()),
        }
    }
}
