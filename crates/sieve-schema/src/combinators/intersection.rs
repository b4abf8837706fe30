//! Sequential intersection.

use std::borrow::Cow;

use serde::Serialize;
use sieve_core::{ValidationResult, Value};

use super::{no_stages, rethread};
use crate::context::ParseContext;
use crate::schema::{BoxedSchema, Schema};

/// Runs every stage in order. Each stage validates the output of the last
/// stage that succeeded (the raw input for the first), and the issues of
/// all failing stages are collected. The output is the final stage's.
///
/// This is threading, not independent conjunction: a stage that reshapes
/// its value (trimming, mapping) changes what later stages see.
pub struct IntersectionSchema<T> {
    stages: Vec<BoxedSchema<T>>,
}

impl<T> Clone for IntersectionSchema<T> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<T: Serialize + 'static> IntersectionSchema<T> {
    /// An intersection over `stages`, run in order.
    pub fn new(stages: Vec<BoxedSchema<T>>) -> Self {
        Self { stages }
    }

    /// Append a stage. Chained `and` calls build one flat intersection.
    pub fn and<S>(mut self, other: S) -> Self
    where
        S: Schema<Output = T> + 'static,
    {
        self.stages.push(BoxedSchema::new(other));
        self
    }
}

impl<T: Serialize> Schema for IntersectionSchema<T> {
    type Output = T;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<T> {
        let mut current: Cow<'_, Value> = Cow::Borrowed(input);
        let mut output = None;
        let mut issues = Vec::new();
        for stage in &self.stages {
            match stage.parse_in(&current, ctx) {
                ValidationResult::Success(v) => match rethread(&v) {
                    Ok(next) => {
                        current = Cow::Owned(next);
                        output = Some(v);
                    }
                    Err(issue) => issues.push(issue),
                },
                ValidationResult::Failure(stage_issues) => issues.extend(stage_issues),
            }
        }
        match output {
            Some(v) if issues.is_empty() => ValidationResult::Success(v),
            None if issues.is_empty() => ValidationResult::fail(no_stages("intersection")),
            _ => ValidationResult::Failure(issues),
        }
    }

    fn kind(&self) -> &'static str {
        "intersection"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sieve_core::IssueKind;

    use crate::factory::{date, decimal, float, int, intersection, string};
    use crate::schema::SchemaExt;

    #[test]
    fn test_all_stages_must_pass() {
        let schema = int().min(0).and(int().max(10));
        assert_eq!(schema.parse(5).into_value(), Some(5));
    }

    #[test]
    fn test_collects_every_stage_failure() {
        let schema = string().min(5).and(string().email());
        let r = schema.parse("ab");
        assert_eq!(r.issues().len(), 2);
    }

    #[test]
    fn test_later_stage_sees_previous_output() {
        let schema = string().trim().and(string().length(3));
        assert_eq!(schema.parse("  abc  ").into_value(), Some("abc".to_string()));
    }

    #[test]
    fn test_and_chains_flatten() {
        let schema = int().and(int().min(1)).and(int().max(3));
        assert!(schema.parse(2).is_success());
        assert_eq!(schema.parse(9).error_messages(), vec!["must be at most 3"]);
    }

    #[test]
    fn test_empty_intersection_fails() {
        let schema: IntersectionSchema<i64> = intersection(Vec::new());
        assert_eq!(schema.parse(1).issues()[0].kind(), IssueKind::InternalFault);
    }

    #[test]
    fn test_non_finite_float_passes_every_stage() {
        let schema = float().and(float());
        assert_eq!(schema.parse("inf").into_value(), Some(f64::INFINITY));
        let r = float().and(float().finite()).parse("inf");
        assert_eq!(r.issues().len(), 1);
        assert_eq!(r.issues()[0].kind(), IssueKind::ConstraintViolation);
    }

    #[test]
    fn test_decimal_and_date_stages() {
        let amounts = decimal().and(decimal().positive());
        assert_eq!(amounts.parse("2.50").into_value(), Some(Decimal::new(250, 2)));
        let days = date().and(date().max(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
        assert_eq!(days.parse("2024-02-29").into_value(), NaiveDate::from_ymd_opt(2024, 2, 29));
    }
}
