//! Safe division over query-string operands

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("operands must be numbers")]
    InvalidOperand,
    #[error("cannot divide by zero")]
    DivisionByZero,
}

/// Parse a query operand into a finite `f64`
///
/// Missing, non-numeric, `NaN` and infinite values are all rejected.
pub fn parse_operand(raw: Option<&str>) -> Result<f64, MathError> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or(MathError::InvalidOperand)
}

/// Divide `a` by `b`, rejecting non-finite operands and a zero divisor
pub fn safe_divide(a: f64, b: f64) -> Result<f64, MathError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(MathError::InvalidOperand);
    }
    if b == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok(a / b)
}

/// Divide two raw query operands
pub fn divide_operands(a: Option<&str>, b: Option<&str>) -> Result<f64, MathError> {
    let a = parse_operand(a)?;
    let b = parse_operand(b)?;
    safe_divide(a, b)
}

/// Render a quotient as JSON, using an integer when the value is integral
///
/// Keeps `10/2` as `5` rather than `5.0`. A quotient that overflows to
/// infinity becomes `null`, since JSON has no representation for it.
#[allow(clippy::cast_possible_truncation)]
pub fn quotient_to_json(value: f64) -> serde_json::Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        // -0.0 is integral too; emit plain 0
        serde_json::Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}
