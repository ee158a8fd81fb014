//! Literal values of const enum members.

use serde_json::Value;
use std::fmt;

/// A numeric or string literal as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
}

impl Literal {
    /// JSON text of the literal: numbers as `JSON.stringify` prints them,
    /// strings double-quoted and escaped.
    pub fn to_json(&self) -> String {
        match self {
            Self::Number(n) => number_text(*n),
            Self::Str(s) => Value::String(s.clone()).to_string(),
        }
    }
}

/// Integral numbers below 1e21 print without a fraction or exponent.
/// Non-finite values print as the matching global (`Infinity`, `NaN`).
fn number_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{}", n);
    }
    Value::from(n).to_string()
}

/// Unary operators accepted in front of a literal initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Minus,
    Plus,
    Tilde,
    Bang,
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Tilde => "~",
            Self::Bang => "!",
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The computed value of one member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberValue {
    pub prefix: Option<PrefixOp>,
    pub literal: Literal,
}

impl MemberValue {
    pub fn literal(literal: Literal) -> Self {
        Self {
            prefix: None,
            literal,
        }
    }

    pub fn prefixed(op: PrefixOp, literal: Literal) -> Self {
        Self {
            prefix: Some(op),
            literal,
        }
    }

    /// Implicit value of an un-initialized member.
    pub fn ordinal(n: f64) -> Self {
        Self::literal(Literal::Number(n))
    }

    /// Text substituted for a reference: the prefix operator concatenated
    /// with the JSON text, no arithmetic applied.
    pub fn to_literal_text(&self) -> String {
        match self.prefix {
            Some(op) => format!("{}{}", op, self.literal.to_json()),
            None => self.literal.to_json(),
        }
    }

    /// Numeric value used to continue an ordinal chain, if the member has one.
    pub fn numeric(&self) -> Option<f64> {
        let Literal::Number(n) = self.literal else {
            return None;
        };
        match self.prefix {
            None | Some(PrefixOp::Plus) => Some(n),
            Some(PrefixOp::Minus) => Some(-n),
            Some(PrefixOp::Tilde) => Some(!to_int32(n) as f64),
            Some(PrefixOp::Bang) => None,
        }
    }
}

/// ECMAScript ToInt32.
fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let wrapped = n.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u32 as i32
}

impl fmt::Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal_text())
    }
}
