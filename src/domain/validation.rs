//! Request payload validation.
//!
//! Payloads arrive as untyped JSON so that every field can be checked
//! independently and reported back in a single field-error map, e.g.
//! `{"hours_studied": ["A valid integer is required."]}`.

use crate::domain::records::{PerformanceSample, StudentInputs};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Key used for errors that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Upper bound for hours studied plus hours slept in one day.
pub const MAX_DAILY_HOURS: u32 = 24;

pub const HOURS_STUDIED_RANGE: (i64, i64) = (0, 24);
pub const PREVIOUS_SCORES_RANGE: (i64, i64) = (0, 100);
pub const SLEEP_HOURS_RANGE: (i64, i64) = (0, 24);
pub const SAMPLE_PAPERS_RANGE: (i64, i64) = (0, 50);
pub const PERFORMANCE_INDEX_RANGE: (f64, f64) = (0.0, 100.0);

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const INVALID_INTEGER: &str = "A valid integer is required.";
const INVALID_NUMBER: &str = "A valid number is required.";
const INVALID_BOOLEAN: &str = "Must be a valid boolean.";

const TRUE_VALUES: &[&str] = &[
    "t", "T", "y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON", "1",
];
const FALSE_VALUES: &[&str] = &[
    "f", "F", "n", "N", "no", "No", "NO", "false", "False", "FALSE", "off", "Off", "OFF", "0",
];

/// Field name to list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Validates a `POST /api/predict/` body.
///
/// On top of the per-field ranges, hours studied plus hours slept may not
/// exceed a day.
pub fn validate_prediction_request(body: &Value) -> Result<StudentInputs, FieldErrors> {
    let obj = expect_object(body)?;
    let mut errors = FieldErrors::new();
    let inputs = parse_inputs(obj, &mut errors);

    match inputs {
        Some(inputs) if errors.is_empty() => {
            if inputs.daily_hours() > MAX_DAILY_HOURS {
                return Err(FieldErrors::non_field(format!(
                    "Hours studied plus sleep hours cannot exceed {}.",
                    MAX_DAILY_HOURS
                )));
            }
            Ok(inputs)
        }
        _ => Err(errors),
    }
}

/// Validates a record create/update body. Read-only fields are ignored.
pub fn validate_record_payload(body: &Value) -> Result<PerformanceSample, FieldErrors> {
    let obj = expect_object(body)?;
    let mut errors = FieldErrors::new();
    let inputs = parse_inputs(obj, &mut errors);
    let performance_index =
        number_field(obj, "performance_index", PERFORMANCE_INDEX_RANGE, &mut errors);

    match (inputs, performance_index) {
        (Some(inputs), Some(index)) if errors.is_empty() => {
            Ok(PerformanceSample::new(inputs, index))
        }
        _ => Err(errors),
    }
}

fn expect_object(body: &Value) -> Result<&Map<String, Value>, FieldErrors> {
    body.as_object().ok_or_else(|| {
        FieldErrors::non_field(format!(
            "Invalid data. Expected a dictionary, but got {}.",
            json_type_name(body)
        ))
    })
}

fn parse_inputs(obj: &Map<String, Value>, errors: &mut FieldErrors) -> Option<StudentInputs> {
    let hours_studied = integer_field(obj, "hours_studied", HOURS_STUDIED_RANGE, errors);
    let previous_scores = integer_field(obj, "previous_scores", PREVIOUS_SCORES_RANGE, errors);
    let extracurricular = boolean_field(obj, "extracurricular", errors);
    let sleep_hours = integer_field(obj, "sleep_hours", SLEEP_HOURS_RANGE, errors);
    let sample_papers = integer_field(obj, "sample_papers", SAMPLE_PAPERS_RANGE, errors);

    Some(StudentInputs {
        hours_studied: hours_studied?,
        previous_scores: previous_scores?,
        extracurricular: extracurricular?,
        sleep_hours: sleep_hours?,
        sample_papers: sample_papers?,
    })
}

fn present<'a>(
    obj: &'a Map<String, Value>,
    name: &str,
    errors: &mut FieldErrors,
) -> Option<&'a Value> {
    match obj.get(name) {
        None => {
            errors.add(name, REQUIRED);
            None
        }
        Some(Value::Null) => {
            errors.add(name, NOT_NULL);
            None
        }
        Some(value) => Some(value),
    }
}

fn integer_field(
    obj: &Map<String, Value>,
    name: &str,
    (min, max): (i64, i64),
    errors: &mut FieldErrors,
) -> Option<u32> {
    let value = present(obj, name, errors)?;
    let Some(parsed) = parse_integer(value) else {
        errors.add(name, INVALID_INTEGER);
        return None;
    };

    if parsed < min {
        errors.add(name, format!("Ensure this value is greater than or equal to {}.", min));
        return None;
    }
    if parsed > max {
        errors.add(name, format!("Ensure this value is less than or equal to {}.", max));
        return None;
    }
    u32::try_from(parsed).ok()
}

fn number_field(
    obj: &Map<String, Value>,
    name: &str,
    (min, max): (f64, f64),
    errors: &mut FieldErrors,
) -> Option<f64> {
    let value = present(obj, name, errors)?;
    let Some(parsed) = parse_number(value) else {
        errors.add(name, INVALID_NUMBER);
        return None;
    };

    if parsed < min {
        errors.add(name, format!("Ensure this value is greater than or equal to {}.", min));
        return None;
    }
    if parsed > max {
        errors.add(name, format!("Ensure this value is less than or equal to {}.", max));
        return None;
    }
    Some(parsed)
}

fn boolean_field(obj: &Map<String, Value>, name: &str, errors: &mut FieldErrors) -> Option<bool> {
    let value = present(obj, name, errors)?;
    let parsed = parse_boolean(value);
    if parsed.is_none() {
        errors.add(name, INVALID_BOOLEAN);
    }
    parsed
}

fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn parse_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 1.0 => Some(true),
            Some(v) if v == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) if TRUE_VALUES.contains(&s.as_str()) => Some(true),
        Value::String(s) if FALSE_VALUES.contains(&s.as_str()) => Some(false),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
