//! Recursive-descent parser for scale formulas.

use super::expr::{Expr, Func};
use super::{Formula, FormulaError, FormulaParser};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Ident(name) => name.clone(),
            Self::Plus => "+".into(),
            Self::Minus => "-".into(),
            Self::Star => "*".into(),
            Self::Slash => "/".into(),
            Self::Caret => "^".into(),
            Self::LParen => "(".into(),
            Self::RParen => ")".into(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, FormulaError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'/' => Token::Slash,
            b'^' => Token::Caret,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'*' => {
                if bytes.get(pos + 1) == Some(&b'*') {
                    pos += 1;
                    Token::Caret
                } else {
                    Token::Star
                }
            }
            b'0'..=b'9' | b'.' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                    pos += 1;
                }
                // exponent suffix: 1e3, 2.5E-4
                if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
                    let mut look = pos + 1;
                    if look < bytes.len() && (bytes[look] == b'+' || bytes[look] == b'-') {
                        look += 1;
                    }
                    if look < bytes.len() && bytes[look].is_ascii_digit() {
                        pos = look;
                        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                            pos += 1;
                        }
                    }
                }
                let literal = &text[start..pos];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| FormulaError::InvalidNumber {
                        literal: literal.to_string(),
                        position: start,
                    })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while pos < bytes.len()
                    && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                tokens.push((Token::Ident(text[start..pos].to_string()), start));
                continue;
            }
            _ => {
                let ch = text[start..].chars().next().unwrap_or('?');
                return Err(FormulaError::UnexpectedChar { ch, position: start });
            }
        };
        pos += 1;
        tokens.push((token, start));
    }
    Ok(tokens)
}

/// Deepest expression tree, and deepest parenthesis, sign, or exponent
/// nesting, the bundled parser accepts.
pub const MAX_DEPTH: usize = 256;

/// Tree depth of a node built from children of depth `a` and `b`.
fn node_depth(expr: &Expr, a: usize, b: usize) -> usize {
    match expr {
        Expr::Const(_) | Expr::Param => 1,
        _ => a.max(b) + 1,
    }
}

struct Parser<'a> {
    tokens: Vec<(Token, usize)>,
    index: usize,
    variable: &'a str,
    nesting: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(token, _)| token)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.index).map_or(0, |(_, position)| *position)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.index).cloned();
        if item.is_some() {
            self.index += 1;
        }
        item
    }

    fn expect_rparen(&mut self) -> Result<(), FormulaError> {
        match self.next() {
            Some((Token::RParen, _)) => Ok(()),
            Some((token, position)) => Err(FormulaError::UnexpectedToken {
                found: token.describe(),
                position,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn descend(&mut self, position: usize) -> Result<(), FormulaError> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(FormulaError::TooDeep { position });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.nesting -= 1;
    }

    fn check_depth(depth: usize, position: usize) -> Result<usize, FormulaError> {
        if depth > MAX_DEPTH {
            Err(FormulaError::TooDeep { position })
        } else {
            Ok(depth)
        }
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<(Expr, usize), FormulaError> {
        let (mut lhs, mut depth) = self.term()?;
        loop {
            let position = self.position();
            let build: fn(Expr, Expr) -> Expr = match self.peek() {
                Some(Token::Plus) => Expr::add,
                Some(Token::Minus) => Expr::sub,
                _ => return Ok((lhs, depth)),
            };
            self.index += 1;
            let (rhs, rhs_depth) = self.term()?;
            lhs = build(lhs, rhs);
            depth = Self::check_depth(node_depth(&lhs, depth, rhs_depth), position)?;
        }
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<(Expr, usize), FormulaError> {
        let (mut lhs, mut depth) = self.unary()?;
        loop {
            let position = self.position();
            let build: fn(Expr, Expr) -> Expr = match self.peek() {
                Some(Token::Star) => Expr::mul,
                Some(Token::Slash) => Expr::div,
                _ => return Ok((lhs, depth)),
            };
            self.index += 1;
            let (rhs, rhs_depth) = self.unary()?;
            lhs = build(lhs, rhs);
            depth = Self::check_depth(node_depth(&lhs, depth, rhs_depth), position)?;
        }
    }

    // unary := ('-' | '+') unary | power
    fn unary(&mut self) -> Result<(Expr, usize), FormulaError> {
        let position = self.position();
        let negate = match self.peek() {
            Some(Token::Minus) => true,
            Some(Token::Plus) => false,
            _ => return self.power(),
        };
        self.index += 1;
        self.descend(position)?;
        let (operand, depth) = self.unary()?;
        self.ascend();
        if !negate {
            return Ok((operand, depth));
        }
        let expr = Expr::neg(operand);
        let depth = Self::check_depth(node_depth(&expr, depth, 0), position)?;
        Ok((expr, depth))
    }

    // power := primary ('^' unary)?
    fn power(&mut self) -> Result<(Expr, usize), FormulaError> {
        let (base, base_depth) = self.primary()?;
        if self.peek() != Some(&Token::Caret) {
            return Ok((base, base_depth));
        }
        let position = self.position();
        self.index += 1;
        self.descend(position)?;
        let (exponent, exponent_depth) = self.unary()?;
        self.ascend();
        let expr = Expr::pow(base, exponent);
        let depth = Self::check_depth(node_depth(&expr, base_depth, exponent_depth), position)?;
        Ok((expr, depth))
    }

    fn primary(&mut self) -> Result<(Expr, usize), FormulaError> {
        let Some((token, position)) = self.next() else {
            return Err(FormulaError::UnexpectedEnd);
        };
        match token {
            Token::Number(value) => Ok((Expr::Const(value), 1)),
            Token::LParen => {
                self.descend(position)?;
                let inner = self.expr()?;
                self.expect_rparen()?;
                self.ascend();
                Ok(inner)
            }
            Token::Ident(name) => {
                if self.peek() == Some(&Token::LParen) {
                    let func = Func::from_name(&name).ok_or_else(|| {
                        FormulaError::UnknownFunction {
                            name: name.clone(),
                            position,
                        }
                    })?;
                    self.index += 1;
                    self.descend(position)?;
                    let (arg, depth) = self.expr()?;
                    self.expect_rparen()?;
                    self.ascend();
                    let expr = Expr::call(func, arg);
                    let depth = Self::check_depth(node_depth(&expr, depth, 0), position)?;
                    return Ok((expr, depth));
                }
                if name == self.variable {
                    return Ok((Expr::Param, 1));
                }
                match name.as_str() {
                    "pi" => Ok((Expr::Const(std::f64::consts::PI), 1)),
                    "e" => Ok((Expr::Const(std::f64::consts::E), 1)),
                    _ => Err(FormulaError::UnknownIdentifier { name, position }),
                }
            }
            other => Err(FormulaError::UnexpectedToken {
                found: other.describe(),
                position,
            }),
        }
    }
}

/// Default formula parser: arithmetic, `^`/`**` powers, elementary functions,
/// and the constants `pi` and `e` over one named parameter.
#[derive(Debug, Clone)]
pub struct ExprParser {
    variable: String,
}

impl ExprParser {
    /// Parser bound to the parameter name `t`.
    pub fn new() -> Self {
        Self::with_variable("t")
    }

    /// Parser bound to a custom parameter name.
    pub fn with_variable(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    /// Name of the free parameter.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Parse text into an expression tree.
    ///
    /// Input that would nest deeper than [`MAX_DEPTH`] is rejected with
    /// [`FormulaError::TooDeep`].
    pub fn parse_expr(&self, text: &str) -> Result<Expr, FormulaError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        let mut parser = Parser {
            tokens,
            index: 0,
            variable: &self.variable,
            nesting: 0,
        };
        let (expr, _) = parser.expr()?;
        if let Some((token, position)) = parser.next() {
            return Err(FormulaError::UnexpectedToken {
                found: token.describe(),
                position,
            });
        }
        Ok(expr)
    }
}

impl Default for ExprParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaParser for ExprParser {
    fn parse(&self, text: &str) -> Result<Formula, FormulaError> {
        let expr = self.parse_expr(text)?;
        Ok(Formula::with_source(text.trim(), expr))
    }
}
