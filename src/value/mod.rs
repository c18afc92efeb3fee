//=====================================================
// File: value/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Polymorphic scenario values
// Objective: Closed value model with explicit cross-kind equality, ordering,
//            display and truthiness rules
//=====================================================

mod address;
mod number;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use num_rational::BigRational;
use serde_json::Value as JsonValue;

use crate::event::Event;
use crate::interpreter::{ScenarioError, ScenarioResult};

pub use address::{ADDRESS_BYTES, Address};
pub use number::{MANTISSA_DECIMALS, Number, NumberFormat};

//=====================================================
// Section 1.0 - Kinds
//=====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    String,
    Address,
    Number,
    Precise,
    List,
    Array,
    Map,
    Event,
    Anything,
    Nothing,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Bool => "BoolV",
            ValueKind::String => "StringV",
            ValueKind::Address => "AddressV",
            ValueKind::Number => "NumberV",
            ValueKind::Precise => "PreciseV",
            ValueKind::List => "ListV",
            ValueKind::Array => "ArrayV",
            ValueKind::Map => "MapV",
            ValueKind::Event => "EventV",
            ValueKind::Anything => "AnythingV",
            ValueKind::Nothing => "NothingV",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=====================================================
// Section 2.0 - Precise numbers
//=====================================================

/// A number tagged with a significant-figure count, only used for
/// approximate-equality assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct Precise {
    val: Number,
    precision: u32,
}

impl Precise {
    pub fn new(val: Number, precision: u32) -> Self {
        Self { val, precision }
    }

    pub fn number(&self) -> &Number {
        &self.val
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Both sides truncated toward zero to this value's significant figures.
    pub fn matches(&self, other: &Number) -> bool {
        number::truncate_significant(self.val.value(), self.precision)
            == number::truncate_significant(other.value(), self.precision)
    }
}

//=====================================================
// Section 3.0 - Values
//=====================================================

#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    String(String),
    Address(Address),
    Number(Number),
    Precise(Precise),
    List(Vec<Value>),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Event(Event),
    Anything,
    Nothing,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
            Value::Address(_) => ValueKind::Address,
            Value::Number(_) => ValueKind::Number,
            Value::Precise(_) => ValueKind::Precise,
            Value::List(_) => ValueKind::List,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
            Value::Event(_) => ValueKind::Event,
            Value::Anything => ValueKind::Anything,
            Value::Nothing => ValueKind::Nothing,
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    pub fn number(text: &str) -> ScenarioResult<Self> {
        Number::parse(text).map(Value::Number)
    }

    pub fn integer(val: i64) -> Self {
        Value::Number(Number::from_integer(val))
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(address) => Some(*address),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Value::Event(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Value::Nothing)
    }

    //Function: compare_to
    //Purpose: Equality with the fixed cross-kind coercion table
    //Inputs: self (expected side), given (actual side)
    //Returns: Ok(bool), or ComparisonType for pairs with no coercion
    pub fn compare_to(&self, given: &Value) -> ScenarioResult<bool> {
        match (self, given) {
            (Value::Anything, _) | (_, Value::Anything) => Ok(true),
            (Value::Nothing, _) | (_, Value::Nothing) => Ok(false),

            (Value::Number(left), Value::Number(right)) => Ok(left == right),
            (Value::Number(number), Value::Precise(precise))
            | (Value::Precise(precise), Value::Number(number)) => Ok(precise.matches(number)),
            (Value::Precise(left), Value::Precise(right)) => Ok(left.matches(right.number())),
            (Value::Number(number), Value::String(text))
            | (Value::String(text), Value::Number(number)) => {
                Ok(Number::parse(text).is_ok_and(|parsed| &parsed == number))
            }
            (Value::Precise(precise), Value::String(text))
            | (Value::String(text), Value::Precise(precise)) => {
                Ok(Number::parse(text).is_ok_and(|parsed| precise.matches(&parsed)))
            }

            (Value::Address(left), Value::Address(right)) => Ok(left == right),
            (Value::Address(address), Value::String(text))
            | (Value::String(text), Value::Address(address)) => {
                Ok(Address::parse(text).is_ok_and(|parsed| &parsed == address))
            }

            (Value::Bool(left), Value::Bool(right)) => Ok(left == right),
            (Value::Bool(flag), Value::Number(number))
            | (Value::Number(number), Value::Bool(flag)) => Ok(bool_matches_number(*flag, number)),
            (Value::Bool(flag), Value::String(text))
            | (Value::String(text), Value::Bool(flag)) => {
                Ok(match text.to_ascii_lowercase().as_str() {
                    "true" => *flag,
                    "false" => !*flag,
                    _ => false,
                })
            }

            (Value::String(left), Value::String(right)) => Ok(left == right),

            (
                Value::List(expected) | Value::Array(expected),
                Value::List(actual) | Value::Array(actual),
            ) => compare_elements(expected, actual),

            (Value::Map(expected), Value::Map(actual)) => {
                if expected.len() != actual.len() {
                    return Ok(false);
                }
                for (key, value) in expected {
                    let Some(other) = actual.get(key) else {
                        return Ok(false);
                    };
                    if !value.compare_to(other)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }

            (Value::Event(left), Value::Event(right)) => Ok(left == right),

            (left, right) => Err(ScenarioError::ComparisonType {
                left: left.kind(),
                right: right.kind(),
            }),
        }
    }

    /// Ordering is only defined between number-like values.
    pub fn compare_order(&self, other: &Value) -> ScenarioResult<Ordering> {
        match (self.numeric(), other.numeric()) {
            (Some(left), Some(right)) => Ok(left.cmp(right)),
            _ => Err(ScenarioError::Ordering {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }

    fn numeric(&self) -> Option<&BigRational> {
        match self {
            Value::Number(number) => Some(number.value()),
            Value::Precise(precise) => Some(precise.number().value()),
            _ => None,
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(flag) => *flag,
            Value::String(text) => !text.is_empty(),
            Value::Address(address) => !address.is_zero(),
            Value::Number(number) => !number.is_zero(),
            Value::Precise(precise) => !precise.number().is_zero(),
            Value::List(items) | Value::Array(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Event(_) | Value::Anything => true,
            Value::Nothing => false,
        }
    }

    //Function: from_json
    //Purpose: Wrap a raw transport result into a typed value
    //Inputs: raw: serde_json::Value
    //Returns: Value
    pub fn from_json(raw: JsonValue) -> Value {
        match raw {
            JsonValue::Null => Value::Nothing,
            JsonValue::Bool(flag) => Value::Bool(flag),
            JsonValue::Number(number) => Number::parse(&number.to_string())
                .map(Value::Number)
                .unwrap_or_else(|_| Value::String(number.to_string())),
            JsonValue::String(text) => {
                if let Ok(address) = Address::parse(&text) {
                    Value::Address(address)
                } else if let Ok(number) = Number::parse(&text) {
                    Value::Number(number)
                } else {
                    Value::String(text)
                }
            }
            JsonValue::Array(items) => Value::List(items.into_iter().map(Value::from_json).collect()),
            JsonValue::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Inverse of [`Value::from_json`], used when handing arguments to a transport.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Bool(flag) => JsonValue::Bool(*flag),
            Value::String(text) => JsonValue::String(text.clone()),
            Value::Address(address) => JsonValue::String(address.to_string()),
            Value::Number(number) => JsonValue::String(number.to_plain_string()),
            Value::Precise(precise) => JsonValue::String(precise.number().to_plain_string()),
            Value::List(items) | Value::Array(items) => {
                JsonValue::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Event(event) => JsonValue::String(event.to_string()),
            Value::Anything => JsonValue::String("Anything".into()),
            Value::Nothing => JsonValue::Null,
        }
    }
}

fn bool_matches_number(flag: bool, number: &Number) -> bool {
    let expected = if flag { 1 } else { 0 };
    number == &Number::from_integer(expected)
}

/// Walk both lists to the longer length; a missing element on either side
/// stands in as `Nothing`.
fn compare_elements(expected: &[Value], actual: &[Value]) -> ScenarioResult<bool> {
    for index in 0..expected.len().max(actual.len()) {
        let want = expected.get(index).unwrap_or(&Value::Nothing);
        let given = actual.get(index).unwrap_or(&Value::Nothing);
        if !want.compare_to(given)? {
            return Ok(false);
        }
    }
    Ok(true)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::String(text) => f.write_str(text),
            Value::Address(address) => write!(f, "{address}"),
            Value::Number(number) => write!(f, "{number}"),
            Value::Precise(precise) => {
                write!(f, "{} (precision {})", precise.number(), precise.precision())
            }
            Value::List(items) | Value::Array(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Event(event) => write!(f, "{event}"),
            Value::Anything => f.write_str("Anything"),
            Value::Nothing => f.write_str("Nothing"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value)
    }
}

impl From<BigRational> for Value {
    fn from(value: BigRational) -> Self {
        Value::Number(Number::new(value))
    }
}

//=====================================================
// End of file
//=====================================================
