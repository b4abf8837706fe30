//! # Coercion Factory
//!
//! Primitive schemas pre-wired with a lenient rewrite of the raw input.
//! The rewrite runs before the null check and the type check, and only
//! widens what is accepted; every constraint added afterwards behaves as it
//! does on the strict schema.
//!
//! | Factory      | Extra inputs accepted                                        |
//! |--------------|--------------------------------------------------------------|
//! | `string`     | any scalar, rendered as text                                 |
//! | `int`, `float`, `number`, `decimal` | padded numeric strings, booleans as 0/1 |
//! | `boolean`    | `true/1/yes/on`, `false/0/no/off/""` (any case), integers    |
//! | `date`, `datetime` | padded strings, integer Unix timestamps (seconds)      |

use chrono::DateTime;
use sieve_core::{Scalar, Value};

use crate::primitives::{
    BooleanSchema, DateSchema, DateTimeSchema, DecimalSchema, FloatSchema, IntSchema, StringSchema,
};

fn lenient_string(input: &Value) -> Value {
    match input {
        Value::Scalar(Scalar::String(_)) => input.clone(),
        Value::Scalar(scalar) => Value::string(scalar.render()),
        other => other.clone(),
    }
}

fn lenient_number(input: &Value) -> Value {
    match input {
        Value::Scalar(Scalar::String(s)) => Value::string(s.trim()),
        Value::Scalar(Scalar::Bool(b)) => Value::Scalar(Scalar::Int(i64::from(*b))),
        other => other.clone(),
    }
}

fn lenient_boolean(input: &Value) -> Value {
    let token = match input {
        Value::Scalar(Scalar::String(s)) => s.trim().to_ascii_lowercase(),
        Value::Scalar(Scalar::Int(i)) => return Value::Scalar(Scalar::Bool(*i != 0)),
        other => return other.clone(),
    };
    match token.as_str() {
        "true" | "1" | "yes" | "on" => Value::Scalar(Scalar::Bool(true)),
        "false" | "0" | "no" | "off" | "" => Value::Scalar(Scalar::Bool(false)),
        _ => input.clone(),
    }
}

fn lenient_temporal(input: &Value) -> Value {
    match input {
        Value::Scalar(Scalar::String(s)) => Value::string(s.trim()),
        Value::Scalar(Scalar::Int(secs)) => DateTime::from_timestamp(*secs, 0)
            .map(Value::from)
            .unwrap_or_else(|| input.clone()),
        other => other.clone(),
    }
}

/// A string schema accepting any scalar.
pub fn string() -> StringSchema {
    StringSchema::new().with_coercion(lenient_string)
}

/// An integer schema accepting padded strings and booleans.
pub fn int() -> IntSchema {
    IntSchema::new().with_coercion(lenient_number)
}

/// A float schema accepting padded strings and booleans.
pub fn float() -> FloatSchema {
    FloatSchema::new().with_coercion(lenient_number)
}

/// Alias of [`float`].
pub fn number() -> FloatSchema {
    float()
}

/// A decimal schema accepting padded strings and booleans.
pub fn decimal() -> DecimalSchema {
    DecimalSchema::new().with_coercion(lenient_number)
}

/// A boolean schema accepting the token vocabulary and integers.
pub fn boolean() -> BooleanSchema {
    BooleanSchema::new().with_coercion(lenient_boolean)
}

/// A date schema accepting padded strings and Unix timestamps.
pub fn date() -> DateSchema {
    DateSchema::new().with_coercion(lenient_temporal)
}

/// A date-time schema accepting padded strings and Unix timestamps.
pub fn datetime() -> DateTimeSchema {
    DateTimeSchema::new().with_coercion(lenient_temporal)
}
