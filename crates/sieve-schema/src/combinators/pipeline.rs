//! Short-circuiting pipeline.

use std::borrow::Cow;

use serde::Serialize;
use sieve_core::{ValidationResult, Value};

use super::{no_stages, rethread};
use crate::context::ParseContext;
use crate::schema::{BoxedSchema, Schema};

/// Feeds each stage's output into the next and returns the first failure
/// unchanged.
pub struct PipelineSchema<T> {
    stages: Vec<BoxedSchema<T>>,
}

impl<T> Clone for PipelineSchema<T> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<T: Serialize + 'static> PipelineSchema<T> {
    /// A pipeline over `stages`, run in order.
    pub fn new(stages: Vec<BoxedSchema<T>>) -> Self {
        Self { stages }
    }

    /// Append a stage. Chained `pipe` calls build one flat pipeline.
    pub fn pipe<S>(mut self, next: S) -> Self
    where
        S: Schema<Output = T> + 'static,
    {
        self.stages.push(BoxedSchema::new(next));
        self
    }
}

impl<T: Serialize> Schema for PipelineSchema<T> {
    type Output = T;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<T> {
        let mut current: Cow<'_, Value> = Cow::Borrowed(input);
        let mut output = None;
        let last = self.stages.len().saturating_sub(1);
        for (i, stage) in self.stages.iter().enumerate() {
            let v = match stage.parse_in(&current, ctx) {
                ValidationResult::Success(v) => v,
                failure => return failure,
            };
            if i < last {
                current = match rethread(&v) {
                    Ok(next) => Cow::Owned(next),
                    Err(issue) => return ValidationResult::fail(issue),
                };
            }
            output = Some(v);
        }
        match output {
            Some(v) => ValidationResult::Success(v),
            None => ValidationResult::fail(no_stages("pipeline")),
        }
    }

    fn kind(&self) -> &'static str {
        "pipeline"
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::factory::{date, datetime, decimal, float, int, pipeline, string};
    use crate::schema::SchemaExt;

    #[test]
    fn test_threads_output() {
        let schema = string()
            .trim()
            .pipe(string().min(2))
            .pipe(string().map(|s| s.to_uppercase()));
        assert_eq!(schema.parse("  ab ").into_value(), Some("AB".to_string()));
    }

    #[test]
    fn test_stops_at_first_failure() {
        let schema = int().min(10).pipe(int().max(5));
        assert_eq!(schema.parse(3).error_messages(), vec!["must be at least 10"]);
    }

    #[test]
    fn test_failure_is_returned_verbatim() {
        let first = string().min(3).email();
        let expected = first.parse("ab");
        let schema = pipeline([first.boxed(), string().boxed()]);
        assert_eq!(schema.parse("ab"), expected);
    }

    #[test]
    fn test_non_finite_float_reaches_next_stage() {
        let schema = float().pipe(float());
        assert_eq!(schema.parse("inf").into_value(), Some(f64::INFINITY));
        let bounded = float().pipe(float().finite());
        assert_eq!(bounded.parse("-inf").issues().len(), 1);
    }

    #[test]
    fn test_decimal_keeps_scale_between_stages() {
        let schema = decimal().pipe(decimal().max_scale(2));
        let out = schema.parse("1.50").into_value().unwrap();
        assert_eq!(out, Decimal::new(150, 2));
        assert_eq!(out.to_string(), "1.50");
        assert!(schema.parse("1.505").is_failure());
    }

    #[test]
    fn test_temporal_values_pass_between_stages() {
        let floor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let schema = date().pipe(date().min(floor));
        assert_eq!(schema.parse("2024-05-01").into_value(), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(schema.parse("2023-12-31").is_failure());

        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let instants = datetime().pipe(datetime().max(at));
        assert_eq!(instants.parse(at).into_value(), Some(at));
    }
}
