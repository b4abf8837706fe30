//! Arbitrary-precision decimal schema backed by `rust_decimal`.
//!
//! Accepts decimals, integers, finite floats and decimal strings (plain or
//! scientific notation). Constraint order: range, sign, `max_scale`.

use std::str::FromStr;

use rust_decimal::Decimal;
use sieve_core::{Issue, IssueKind, Scalar, ValidationResult, Value};

use super::{coerce_input, Coercion};
use crate::bounds::{Range, Sign};
use crate::context::ParseContext;
use crate::schema::Schema;

fn to_decimal(input: &Value) -> Result<Decimal, Issue> {
    let mismatch = |received: String| {
        Issue::new(
            IssueKind::TypeMismatch,
            format!("expected decimal, received {received}"),
        )
    };
    match input {
        Value::Scalar(Scalar::Decimal(d)) => Ok(*d),
        Value::Scalar(Scalar::Int(i)) => Ok(Decimal::from(*i)),
        Value::Scalar(Scalar::Float(f)) => {
            Decimal::try_from(*f).map_err(|_| mismatch(format!("unrepresentable float {f}")))
        }
        Value::Scalar(Scalar::String(s)) => Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|_| mismatch(format!("string {s:?}"))),
        other => Err(Issue::type_mismatch("decimal", other)),
    }
}

/// Validates decimals.
#[derive(Debug, Clone, Default)]
pub struct DecimalSchema {
    coercion: Option<Coercion>,
    range: Range<Decimal>,
    sign: Option<Sign>,
    max_scale: Option<u32>,
}

impl DecimalSchema {
    /// A decimal schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Inclusive lower bound.
    pub fn min(mut self, n: Decimal) -> Self {
        self.range.min = Some(n);
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, n: Decimal) -> Self {
        self.range.max = Some(n);
        self
    }

    /// Exclusive lower bound.
    pub fn gt(mut self, n: Decimal) -> Self {
        self.range.gt = Some(n);
        self
    }

    /// Exclusive upper bound.
    pub fn lt(mut self, n: Decimal) -> Self {
        self.range.lt = Some(n);
        self
    }

    /// Require `> 0`.
    pub fn positive(mut self) -> Self {
        self.sign = Some(Sign::Positive);
        self
    }

    /// Require `< 0`.
    pub fn negative(mut self) -> Self {
        self.sign = Some(Sign::Negative);
        self
    }

    /// Require `>= 0`.
    pub fn non_negative(mut self) -> Self {
        self.sign = Some(Sign::NonNegative);
        self
    }

    /// Require `<= 0`.
    pub fn non_positive(mut self) -> Self {
        self.sign = Some(Sign::NonPositive);
        self
    }

    /// Allow at most `n` significant fractional digits. Trailing zeros do
    /// not count: `1.50` has scale 1.
    pub fn max_scale(mut self, n: u32) -> Self {
        self.max_scale = Some(n);
        self
    }

    fn check(&self, value: &Decimal) -> Option<Issue> {
        if let Some(issue) = self.range.check(value) {
            return Some(issue);
        }
        if let Some(issue) = self.sign.and_then(|s| s.check(value.cmp(&Decimal::ZERO))) {
            return Some(issue);
        }
        if let Some(n) = self.max_scale {
            if value.normalize().scale() > n {
                return Some(Issue::constraint(format!(
                    "must have at most {n} decimal place(s)"
                )));
            }
        }
        None
    }
}

impl Schema for DecimalSchema {
    type Output = Decimal;

    fn parse_in(&self, input: &Value, _ctx: &mut ParseContext<'_>) -> ValidationResult<Decimal> {
        let input = coerce_input(input, self.coercion);
        if input.is_null() {
            return ValidationResult::fail(Issue::null_not_allowed());
        }
        let value = match to_decimal(&input) {
            Ok(v) => v,
            Err(issue) => return ValidationResult::fail(issue),
        };
        match self.check(&value) {
            Some(issue) => ValidationResult::fail(issue),
            None => ValidationResult::Success(value),
        }
    }

    fn kind(&self) -> &'static str {
        "decimal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaExt;

    #[test]
    fn test_parses_strings_exactly() {
        let schema = DecimalSchema::new();
        assert_eq!(schema.parse("0.10").into_value(), Some(Decimal::new(10, 2)));
        assert_eq!(schema.parse("1e2").into_value(), Some(Decimal::from(100)));
        assert!(schema.parse("ten").is_failure());
    }

    #[test]
    fn test_accepts_ints_and_floats() {
        let schema = DecimalSchema::new();
        assert_eq!(schema.parse(3).into_value(), Some(Decimal::from(3)));
        assert_eq!(schema.parse(0.5).into_value(), Some(Decimal::new(5, 1)));
    }

    #[test]
    fn test_max_scale_ignores_trailing_zeros() {
        let schema = DecimalSchema::new().max_scale(2);
        assert!(schema.parse("1.500").is_success());
        assert_eq!(
            schema.parse("1.505").error_messages(),
            vec!["must have at most 2 decimal place(s)"]
        );
    }

    #[test]
    fn test_sign_after_range() {
        let schema = DecimalSchema::new().min(Decimal::from(-5)).positive();
        assert_eq!(schema.parse(-6).error_messages(), vec!["must be at least -5"]);
        assert_eq!(schema.parse(0).error_messages(), vec!["must be positive"]);
    }
}
