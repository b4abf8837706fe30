//! Integer and float schemas.
//!
//! Both accept native numbers of any representation and strings that parse
//! cleanly. Integers accept a float or decimal only when it is exactly
//! integral; `3.0` becomes `3`, `3.5` is rejected rather than truncated.
//!
//! Constraint order: range (`min`, `max`, `gt`, `lt`), sign, then
//! `multiple_of` for integers or `finite` for floats.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sieve_core::{Issue, IssueKind, Scalar, ValidationResult, Value};

use super::{coerce_input, Coercion};
use crate::bounds::{Range, Sign};
use crate::context::ParseContext;
use crate::schema::Schema;

/// 2^63, the first f64 past `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn not_integral(received: String) -> Issue {
    Issue::new(
        IssueKind::TypeMismatch,
        format!("expected integer, received {received}"),
    )
}

fn out_of_range(received: impl std::fmt::Display) -> Issue {
    Issue::new(
        IssueKind::TypeMismatch,
        format!("expected integer, received {received}, which is outside the 64-bit range"),
    )
}

fn float_to_int(f: f64) -> Result<i64, Issue> {
    if !f.is_finite() || f.fract() != 0.0 {
        Err(not_integral(format!("non-integral float {f}")))
    } else if (-I64_LIMIT..I64_LIMIT).contains(&f) {
        Ok(f as i64)
    } else {
        Err(out_of_range(f))
    }
}

fn decimal_to_int(d: &Decimal) -> Result<i64, Issue> {
    if !d.fract().is_zero() {
        Err(not_integral(format!("non-integral decimal {d}")))
    } else {
        d.to_i64().ok_or_else(|| out_of_range(d))
    }
}

fn to_int(input: &Value) -> Result<i64, Issue> {
    match input {
        Value::Scalar(Scalar::Int(i)) => Ok(*i),
        Value::Scalar(Scalar::Float(f)) => float_to_int(*f),
        Value::Scalar(Scalar::Decimal(d)) => decimal_to_int(d),
        Value::Scalar(Scalar::String(s)) => match s.parse::<i64>() {
            Ok(i) => Ok(i),
            Err(_) => match Decimal::from_str(s) {
                Ok(d) if d.fract().is_zero() => decimal_to_int(&d),
                _ => Err(not_integral(format!("string {s:?}"))),
            },
        },
        other => Err(Issue::type_mismatch("integer", other)),
    }
}

fn to_float(input: &Value) -> Result<f64, Issue> {
    let value = match input {
        Value::Scalar(Scalar::Int(i)) => *i as f64,
        Value::Scalar(Scalar::Float(f)) => *f,
        Value::Scalar(Scalar::Decimal(d)) => d.to_f64().ok_or_else(|| {
            Issue::new(
                IssueKind::TypeMismatch,
                format!("expected number, received unrepresentable decimal {d}"),
            )
        })?,
        Value::Scalar(Scalar::String(s)) => s.parse::<f64>().map_err(|_| {
            Issue::new(
                IssueKind::TypeMismatch,
                format!("expected number, received string {s:?}"),
            )
        })?,
        other => return Err(Issue::type_mismatch("number", other)),
    };
    if value.is_nan() {
        return Err(Issue::new(
            IssueKind::TypeMismatch,
            "expected number, received NaN",
        ));
    }
    Ok(value)
}

/// Validates signed 64-bit integers.
#[derive(Debug, Clone, Default)]
pub struct IntSchema {
    coercion: Option<Coercion>,
    range: Range<i64>,
    sign: Option<Sign>,
    multiple_of: Option<i64>,
}

impl IntSchema {
    /// An integer schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Inclusive lower bound.
    pub fn min(mut self, n: i64) -> Self {
        self.range.min = Some(n);
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, n: i64) -> Self {
        self.range.max = Some(n);
        self
    }

    /// Exclusive lower bound.
    pub fn gt(mut self, n: i64) -> Self {
        self.range.gt = Some(n);
        self
    }

    /// Exclusive upper bound.
    pub fn lt(mut self, n: i64) -> Self {
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

    /// Require divisibility by `n`. A zero divisor accepts only zero.
    pub fn multiple_of(mut self, n: i64) -> Self {
        self.multiple_of = Some(n);
        self
    }

    fn check(&self, value: i64) -> Option<Issue> {
        if let Some(issue) = self.range.check(&value) {
            return Some(issue);
        }
        if let Some(issue) = self.sign.and_then(|s| s.check(value.cmp(&0))) {
            return Some(issue);
        }
        if let Some(n) = self.multiple_of {
            let divisible = match value.checked_rem(n) {
                Some(rem) => rem == 0,
                // i64::MIN % -1 overflows but is divisible; x % 0 is undefined.
                None => n == -1 || value == 0,
            };
            if !divisible {
                return Some(Issue::constraint(format!("must be a multiple of {n}")));
            }
        }
        None
    }
}

impl Schema for IntSchema {
    type Output = i64;

    fn parse_in(&self, input: &Value, _ctx: &mut ParseContext<'_>) -> ValidationResult<i64> {
        let input = coerce_input(input, self.coercion);
        if input.is_null() {
            return ValidationResult::fail(Issue::null_not_allowed());
        }
        let value = match to_int(&input) {
            Ok(v) => v,
            Err(issue) => return ValidationResult::fail(issue),
        };
        match self.check(value) {
            Some(issue) => ValidationResult::fail(issue),
            None => ValidationResult::Success(value),
        }
    }

    fn kind(&self) -> &'static str {
        "int"
    }
}

/// Validates IEEE 754 doubles. NaN is never accepted.
#[derive(Debug, Clone, Default)]
pub struct FloatSchema {
    coercion: Option<Coercion>,
    range: Range<f64>,
    sign: Option<Sign>,
    finite: bool,
}

impl FloatSchema {
    /// A float schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Inclusive lower bound.
    pub fn min(mut self, n: f64) -> Self {
        self.range.min = Some(n);
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, n: f64) -> Self {
        self.range.max = Some(n);
        self
    }

    /// Exclusive lower bound.
    pub fn gt(mut self, n: f64) -> Self {
        self.range.gt = Some(n);
        self
    }

    /// Exclusive upper bound.
    pub fn lt(mut self, n: f64) -> Self {
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

    /// Reject infinities.
    pub fn finite(mut self) -> Self {
        self.finite = true;
        self
    }

    fn check(&self, value: f64) -> Option<Issue> {
        if let Some(issue) = self.range.check(&value) {
            return Some(issue);
        }
        let vs_zero = value.partial_cmp(&0.0).unwrap_or(Ordering::Equal);
        if let Some(issue) = self.sign.and_then(|s| s.check(vs_zero)) {
            return Some(issue);
        }
        if self.finite && !value.is_finite() {
            return Some(Issue::constraint("must be finite"));
        }
        None
    }
}

impl Schema for FloatSchema {
    type Output = f64;

    fn parse_in(&self, input: &Value, _ctx: &mut ParseContext<'_>) -> ValidationResult<f64> {
        let input = coerce_input(input, self.coercion);
        if input.is_null() {
            return ValidationResult::fail(Issue::null_not_allowed());
        }
        let value = match to_float(&input) {
            Ok(v) => v,
            Err(issue) => return ValidationResult::fail(issue),
        };
        match self.check(value) {
            Some(issue) => ValidationResult::fail(issue),
            None => ValidationResult::Success(value),
        }
    }

    fn kind(&self) -> &'static str {
        "float"
    }
}
