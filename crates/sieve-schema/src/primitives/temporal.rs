//! Date and date-time schemas.
//!
//! Dates accept native dates, native instants (taking the UTC calendar
//! day), `YYYY-MM-DD` strings and RFC 3339 strings. Instants accept native
//! instants, native dates (midnight UTC) and RFC 3339 strings with any
//! offset, normalized to UTC.

use chrono::{DateTime, NaiveDate, Utc};
use sieve_core::{Issue, IssueKind, Scalar, ValidationResult, Value};

use super::{coerce_input, Coercion};
use crate::bounds::Range;
use crate::context::ParseContext;
use crate::schema::Schema;

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn to_date(input: &Value) -> Result<NaiveDate, Issue> {
    match input {
        Value::Scalar(Scalar::Date(d)) => Ok(*d),
        Value::Scalar(Scalar::DateTime(dt)) => Ok(dt.date_naive()),
        Value::Scalar(Scalar::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_instant(s).map(|dt| dt.date_naive()))
            .ok_or_else(|| {
                Issue::new(
                    IssueKind::TypeMismatch,
                    format!("expected date, received string {s:?}"),
                )
            }),
        other => Err(Issue::type_mismatch("date", other)),
    }
}

fn to_instant(input: &Value) -> Result<DateTime<Utc>, Issue> {
    match input {
        Value::Scalar(Scalar::DateTime(dt)) => Ok(*dt),
        Value::Scalar(Scalar::Date(d)) => d
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| Issue::type_mismatch("datetime", input)),
        Value::Scalar(Scalar::String(s)) => parse_instant(s).ok_or_else(|| {
            Issue::new(
                IssueKind::TypeMismatch,
                format!("expected RFC 3339 datetime, received string {s:?}"),
            )
        }),
        other => Err(Issue::type_mismatch("datetime", other)),
    }
}

/// Validates calendar dates.
#[derive(Debug, Clone, Default)]
pub struct DateSchema {
    coercion: Option<Coercion>,
    range: Range<NaiveDate>,
}

impl DateSchema {
    /// A date schema with no bounds.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Earliest accepted date, inclusive.
    pub fn min(mut self, date: NaiveDate) -> Self {
        self.range.min = Some(date);
        self
    }

    /// Latest accepted date, inclusive.
    pub fn max(mut self, date: NaiveDate) -> Self {
        self.range.max = Some(date);
        self
    }
}

impl Schema for DateSchema {
    type Output = NaiveDate;

    fn parse_in(&self, input: &Value, _ctx: &mut ParseContext<'_>) -> ValidationResult<NaiveDate> {
        let input = coerce_input(input, self.coercion);
        if input.is_null() {
            return ValidationResult::fail(Issue::null_not_allowed());
        }
        let date = match to_date(&input) {
            Ok(d) => d,
            Err(issue) => return ValidationResult::fail(issue),
        };
        match self.range.check(&date) {
            Some(issue) => ValidationResult::fail(issue),
            None => ValidationResult::Success(date),
        }
    }

    fn kind(&self) -> &'static str {
        "date"
    }
}

/// Validates UTC instants.
#[derive(Debug, Clone, Default)]
pub struct DateTimeSchema {
    coercion: Option<Coercion>,
    range: Range<DateTime<Utc>>,
}

impl DateTimeSchema {
    /// A date-time schema with no bounds.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Earliest accepted instant, inclusive.
    pub fn min(mut self, at: DateTime<Utc>) -> Self {
        self.range.min = Some(at);
        self
    }

    /// Latest accepted instant, inclusive.
    pub fn max(mut self, at: DateTime<Utc>) -> Self {
        self.range.max = Some(at);
        self
    }
}

impl Schema for DateTimeSchema {
    type Output = DateTime<Utc>;

    fn parse_in(
        &self,
        input: &Value,
        _ctx: &mut ParseContext<'_>,
    ) -> ValidationResult<DateTime<Utc>> {
        let input = coerce_input(input, self.coercion);
        if input.is_null() {
            return ValidationResult::fail(Issue::null_not_allowed());
        }
        let at = match to_instant(&input) {
            Ok(at) => at,
            Err(issue) => return ValidationResult::fail(issue),
        };
        match self.range.check(&at) {
            Some(issue) => ValidationResult::fail(issue),
            None => ValidationResult::Success(at),
        }
    }

    fn kind(&self) -> &'static str {
        "datetime"
    }
}
