//! Cell coercion: raw text to typed values.
//!
//! Knows nothing about tables or rows. [`coerce`] is the entry point; the
//! per-type parsers are exposed for callers that already know a cell is
//! non-empty.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::schema::ValueType;

/// Cell contents that mean "no value", compared after trimming.
pub const EMPTY_MARKERS: [&str; 3] = ["", "-", "N/A"];

/// Whether a present cell counts as empty.
pub fn is_empty_cell(raw: &str) -> bool {
    EMPTY_MARKERS.contains(&raw.trim())
}

// ===========================================================================
// Values
// ===========================================================================

/// A coerced cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Empty cell, or a sentinel constant.
    Missing,
    Text(String),
    Number(i64),
    Bool(bool),
    Die(Die),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Die(Die::Fixed(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Missing => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Number(n) => serializer.serialize_i64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Die(die) => die.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str("-"),
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Die(die) => write!(f, "{die}"),
        }
    }
}

/// A characteristic that is either flat or rolled.
///
/// Rolled expressions are validated and then kept as their original text;
/// the components are exposed for consumers that want to roll them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Die {
    Fixed(i64),
    Roll {
        /// Dice rolled, for `2D6`-style expressions.
        count: Option<i64>,
        sides: i64,
        bonus: Option<i64>,
        text: String,
    },
}

impl Die {
    pub fn parse(raw: &str) -> Result<Die, CoerceError> {
        let text = raw.trim();
        let Some((count, rest)) = text.split_once('D') else {
            return parse_number(text).map(Die::Fixed);
        };

        let die_error = |detail: String| CoerceError::Die {
            raw: text.to_string(),
            detail,
        };

        let count = match count {
            "" => None,
            n => Some(parse_number(n).map_err(|e| die_error(e.to_string()))?),
        };

        let mut parts = rest.split('+');
        let sides = parts.next().unwrap_or_default();
        let bonus = parts.next();
        if parts.next().is_some() {
            return Err(die_error("too many '+' characters".to_string()));
        }

        let sides = parse_number(sides).map_err(|e| die_error(e.to_string()))?;
        let bonus = bonus
            .map(parse_number)
            .transpose()
            .map_err(|e| die_error(e.to_string()))?;

        Ok(Die::Roll {
            count,
            sides,
            bonus,
            text: text.to_string(),
        })
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Die::Fixed(_))
    }
}

impl Serialize for Die {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Die::Fixed(n) => serializer.serialize_i64(*n),
            Die::Roll { text, .. } => serializer.serialize_str(text),
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Die::Fixed(n) => write!(f, "{n}"),
            Die::Roll { text, .. } => f.write_str(text),
        }
    }
}

/// A number column with one reserved "not applicable" literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumOrConstant {
    Numeric(i64),
    Sentinel,
}

impl From<NumOrConstant> for Value {
    fn from(value: NumOrConstant) -> Self {
        match value {
            NumOrConstant::Numeric(n) => Value::Number(n),
            NumOrConstant::Sentinel => Value::Missing,
        }
    }
}

// ===========================================================================
// Errors
// ===========================================================================

/// A non-empty cell that does not match its declared type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    #[error("failed to parse number \"{raw}\"")]
    Number { raw: String },
    #[error("failed to parse boolean \"{raw}\"")]
    Boolean { raw: String },
    #[error("error parsing die value \"{raw}\": {detail}")]
    Die { raw: String, detail: String },
    #[error("min value should end with a '+': \"{raw}\"")]
    MinVal { raw: String },
}

// ===========================================================================
// Parsers
// ===========================================================================

pub fn parse_number(raw: &str) -> Result<i64, CoerceError> {
    raw.trim().parse().map_err(|_| CoerceError::Number {
        raw: raw.to_string(),
    })
}

pub fn parse_boolean(raw: &str) -> Result<bool, CoerceError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(CoerceError::Boolean {
            raw: raw.to_string(),
        }),
    }
}

pub fn parse_min_val(raw: &str) -> Result<i64, CoerceError> {
    let text = raw.trim();
    let threshold = text.strip_suffix('+').ok_or_else(|| CoerceError::MinVal {
        raw: text.to_string(),
    })?;
    parse_number(threshold)
}

pub fn parse_num_or_constant(raw: &str, constant: &str) -> Result<NumOrConstant, CoerceError> {
    if raw.trim() == constant {
        return Ok(NumOrConstant::Sentinel);
    }
    parse_number(raw).map(NumOrConstant::Numeric)
}

impl ValueType {
    /// Coerce a cell already known to be non-empty.
    pub fn parse(&self, raw: &str) -> Result<Value, CoerceError> {
        match self {
            ValueType::String => Ok(Value::Text(raw.to_string())),
            ValueType::Number => parse_number(raw).map(Value::Number),
            ValueType::Boolean => parse_boolean(raw).map(Value::Bool),
            ValueType::Die => Die::parse(raw).map(Value::Die),
            ValueType::MinVal => parse_min_val(raw).map(Value::Number),
            ValueType::NumOrConstant { constant } => {
                parse_num_or_constant(raw, constant).map(Value::from)
            }
        }
    }
}

/// Coerce one cell. Empty cells become [`Value::Missing`] for every type.
pub fn coerce(raw: &str, value_type: &ValueType) -> Result<Value, CoerceError> {
    if is_empty_cell(raw) {
        return Ok(Value::Missing);
    }
    value_type.parse(raw)
}
