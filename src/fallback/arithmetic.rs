//! Two-operand arithmetic for messages like `"12 * 4"`.
//!
//! The grammar is exactly `integer operator integer`. Anything richer is left to the
//! classifier's default reply; there is no general expression evaluation here.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const EVALUATION_APOLOGY: &str = "I couldn't calculate that. Try a simpler math expression.";

static STRICT_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[0-9]+\s*[+\-*/]\s*[0-9]+\s*$").expect("valid strict pattern"));

static LOOSE_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+\s*[+\-*/]\s*[0-9]+").expect("valid loose pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpression {
    pub lhs: f64,
    pub op: Operator,
    pub rhs: f64,
}

impl BinaryExpression {
    pub fn evaluate(&self) -> f64 {
        self.op.apply(self.lhs, self.rhs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationFailure {
    #[error("no operator in expression '{0}'")]
    MissingOperator(String),

    #[error("invalid operand '{0}'")]
    InvalidOperand(String),
}

/// Drop every character that is not a digit, an operator or a decimal point.
pub fn sanitize(expression: &str) -> String {
    expression
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(*c, '+' | '-' | '*' | '/' | '.'))
        .collect()
}

/// Parse a sanitized `lhs op rhs` expression.
pub fn parse_expression(sanitized: &str) -> Result<BinaryExpression, EvaluationFailure> {
    // Skip index 0 so a leading sign is never taken as the operator.
    let (idx, op) = sanitized
        .char_indices()
        .skip(1)
        .find_map(|(i, c)| Operator::from_char(c).map(|op| (i, op)))
        .ok_or_else(|| EvaluationFailure::MissingOperator(sanitized.to_string()))?;

    let operand = |s: &str| {
        s.parse::<f64>()
            .map_err(|_| EvaluationFailure::InvalidOperand(s.to_string()))
    };

    Ok(BinaryExpression {
        lhs: operand(&sanitized[..idx])?,
        op,
        rhs: operand(&sanitized[idx + 1..])?,
    })
}

/// Render a result the way a browser prints numbers: `4` rather than `4.0`,
/// `Infinity` for division by zero, `1e+24` outside `[1e-6, 1e21)`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    Strict,
    Loose,
}

/// Detects and computes simple binary arithmetic. Never fails: a detected
/// expression that cannot be computed yields [`EVALUATION_APOLOGY`].
#[derive(Debug, Clone, Copy)]
pub struct ArithmeticEvaluator {
    mode: MatchMode,
}

impl ArithmeticEvaluator {
    /// Whole message must be the expression.
    pub fn strict() -> Self {
        Self {
            mode: MatchMode::Strict,
        }
    }

    /// Expression may appear anywhere in the message; the reply echoes the message.
    pub fn loose() -> Self {
        Self {
            mode: MatchMode::Loose,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.mode == MatchMode::Strict
    }

    pub fn try_evaluate(&self, text: &str) -> Option<String> {
        let normalized = text.trim().to_lowercase();
        let expression = match self.mode {
            MatchMode::Strict => {
                if !STRICT_EXPRESSION.is_match(&normalized) {
                    return None;
                }
                normalized.as_str()
            }
            MatchMode::Loose => LOOSE_EXPRESSION.find(&normalized)?.as_str(),
        };

        let reply = match parse_expression(&sanitize(expression)) {
            Ok(expr) => {
                let result = format_number(expr.evaluate());
                match self.mode {
                    MatchMode::Strict => format!("The answer is: {}", result),
                    MatchMode::Loose => format!("{} = {}", text.trim(), result),
                }
            }
            Err(e) => {
                tracing::debug!("Arithmetic evaluation failed: {}", e);
                EVALUATION_APOLOGY.to_string()
            }
        };
        Some(reply)
    }
}

impl Default for ArithmeticEvaluator {
    fn default() -> Self {
        Self::strict()
    }
}
