//! Datetime builtins.
//!
//! Every function in this family accepts its time argument as a
//! [`Value::DateTime`], a Unix timestamp (integer or float seconds), or a
//! parsable date string. Nil and unparsable strings are rejected.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use prompty_value::Value;

use crate::error::{FuncError, FuncResult};
use crate::registry::FunctionRegistry;

pub(crate) fn register(registry: &mut FunctionRegistry) -> FuncResult<()> {
    registry.register("now", 0, Some(0), now)?;
    registry.register("formatDate", 1, Some(2), format_date)?;
    registry.register("parseDate", 1, Some(2), parse_date)?;
    registry.register("addDays", 2, Some(2), add_days)?;
    registry.register("addHours", 2, Some(2), add_hours)?;
    registry.register("addMinutes", 2, Some(2), add_minutes)?;
    registry.register("diffDays", 2, Some(2), diff_days)?;
    registry.register("year", 1, Some(1), year)?;
    registry.register("month", 1, Some(1), month)?;
    registry.register("day", 1, Some(1), day)?;
    registry.register("weekday", 1, Some(1), weekday)?;
    registry.register("isAfter", 2, Some(2), is_after)?;
    registry.register("isBefore", 2, Some(2), is_before)?;
    Ok(())
}

/// Layouts tried in order when no explicit layout is given.
///
/// RFC 3339 (with or without fractional seconds) is attempted first via the
/// dedicated chrono parser, then these format strings.
const AUTO_DATETIME_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S"];
const AUTO_DATE_LAYOUTS: &[&str] =
    &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%b %d, %Y", "%B %d, %Y"];

/// Parse a date string by auto-detection across the fixed layout list
pub(crate) fn parse_auto(input: &str) -> FuncResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    for layout in AUTO_DATETIME_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, layout) {
            return Ok(naive.and_utc());
        }
    }
    for layout in AUTO_DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(input, layout) {
            return Ok(midnight(date));
        }
    }
    Err(FuncError::InvalidTimeFormat { input: input.to_string() })
}

fn parse_with_layout(input: &str, layout: &str) -> FuncResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_str(input, layout) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, layout) {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, layout) {
        return Ok(midnight(date));
    }
    Err(FuncError::InvalidTimeFormat { input: input.to_string() })
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

/// Coerce a value to a UTC datetime per the family-wide acceptance rules
pub(crate) fn as_datetime(name: &str, value: &Value) -> FuncResult<DateTime<Utc>> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        Value::Int(secs) => DateTime::from_timestamp(*secs, 0)
            .ok_or_else(|| FuncError::InvalidTimeFormat { input: secs.to_string() }),
        Value::Float(secs) => {
            let whole = secs.trunc() as i64;
            let nanos = (secs.fract().abs() * 1_000_000_000.0) as u32;
            DateTime::from_timestamp(whole, nanos)
                .ok_or_else(|| FuncError::InvalidTimeFormat { input: secs.to_string() })
        }
        Value::String(s) => parse_auto(s),
        other => {
            Err(FuncError::ExpectedTime { name: name.to_string(), got: other.type_name() })
        }
    }
}

fn int_arg(name: &str, value: &Value) -> FuncResult<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::Float(n) if n.fract() == 0.0 => Ok(*n as i64),
        other => {
            Err(FuncError::ExpectedInteger { name: name.to_string(), got: other.to_string() })
        }
    }
}

fn now(_args: &[Value]) -> FuncResult<Value> {
    Ok(Value::DateTime(Utc::now()))
}

fn format_date(args: &[Value]) -> FuncResult<Value> {
    let dt = as_datetime("formatDate", &args[0])?;
    match args.get(1) {
        None => Ok(Value::from(dt.to_rfc3339_opts(SecondsFormat::Secs, true))),
        Some(Value::String(layout)) => Ok(Value::from(dt.format(layout).to_string())),
        Some(other) => Err(FuncError::ExpectedTimeLayout {
            name: "formatDate".to_string(),
            got: other.type_name(),
        }),
    }
}

fn parse_date(args: &[Value]) -> FuncResult<Value> {
    // An already-parsed datetime passes through unchanged
    if let Value::DateTime(dt) = &args[0] {
        return Ok(Value::DateTime(*dt));
    }
    let Value::String(input) = &args[0] else {
        return Err(FuncError::ExpectedTime {
            name: "parseDate".to_string(),
            got: args[0].type_name(),
        });
    };
    let dt = match args.get(1) {
        None => parse_auto(input)?,
        Some(Value::String(layout)) => parse_with_layout(input, layout)?,
        Some(other) => {
            return Err(FuncError::ExpectedTimeLayout {
                name: "parseDate".to_string(),
                got: other.type_name(),
            });
        }
    };
    Ok(Value::DateTime(dt))
}

fn shift(name: &str, dt: DateTime<Utc>, delta: Option<Duration>) -> FuncResult<Value> {
    delta
        .and_then(|delta| dt.checked_add_signed(delta))
        .map(Value::DateTime)
        .ok_or_else(|| FuncError::InvalidTimeFormat { input: format!("{name} out of range") })
}

fn add_days(args: &[Value]) -> FuncResult<Value> {
    let dt = as_datetime("addDays", &args[0])?;
    let n = int_arg("addDays", &args[1])?;
    shift("addDays", dt, Duration::try_days(n))
}

fn add_hours(args: &[Value]) -> FuncResult<Value> {
    let dt = as_datetime("addHours", &args[0])?;
    let n = int_arg("addHours", &args[1])?;
    shift("addHours", dt, Duration::try_hours(n))
}

fn add_minutes(args: &[Value]) -> FuncResult<Value> {
    let dt = as_datetime("addMinutes", &args[0])?;
    let n = int_arg("addMinutes", &args[1])?;
    shift("addMinutes", dt, Duration::try_minutes(n))
}

/// Whole days from the first time to the second
fn diff_days(args: &[Value]) -> FuncResult<Value> {
    let from = as_datetime("diffDays", &args[0])?;
    let to = as_datetime("diffDays", &args[1])?;
    Ok(Value::Int((to - from).num_days()))
}

fn year(args: &[Value]) -> FuncResult<Value> {
    Ok(Value::Int(as_datetime("year", &args[0])?.year().into()))
}

fn month(args: &[Value]) -> FuncResult<Value> {
    Ok(Value::Int(as_datetime("month", &args[0])?.month().into()))
}

fn day(args: &[Value]) -> FuncResult<Value> {
    Ok(Value::Int(as_datetime("day", &args[0])?.day().into()))
}

fn weekday(args: &[Value]) -> FuncResult<Value> {
    let dt = as_datetime("weekday", &args[0])?;
    Ok(Value::from(dt.format("%A").to_string()))
}

fn is_after(args: &[Value]) -> FuncResult<Value> {
    let a = as_datetime("isAfter", &args[0])?;
    let b = as_datetime("isAfter", &args[1])?;
    Ok(Value::Bool(a > b))
}

fn is_before(args: &[Value]) -> FuncResult<Value> {
    let a = as_datetime("isBefore", &args[0])?;
    let b = as_datetime("isBefore", &args[1])?;
    Ok(Value::Bool(a < b))
}
