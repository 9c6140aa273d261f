//! Bookmark values and their ordering.
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Value of the increasing field at some position in the stream.
///
/// Ordering is only defined between values of the same kind:
///
/// | Kind | Order |
/// |------|-------|
/// | numbers | numeric, exact across integers and floats |
/// | strings | lexicographic by bytes |
/// | booleans | `false < true` |
///
/// Anything else, including mixed kinds, is incomparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedValue(Value);

impl TrackedValue {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Orders `self` against `other`, or `None` when they are incomparable.
    pub fn compare(&self, other: &TrackedValue) -> Option<Ordering> {
        match (&self.0, &other.0) {
            (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// 2^127; every integral `f64` below this magnitude fits in `i128`.
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

enum Exact {
    Int(i128),
    Float(f64),
}

fn exact(n: &Number) -> Option<Exact> {
    if let Some(i) = n.as_i64() {
        return Some(Exact::Int(i.into()));
    }
    if let Some(u) = n.as_u64() {
        return Some(Exact::Int(u.into()));
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= -I128_BOUND && f < I128_BOUND {
        Some(Exact::Int(f as i128))
    } else {
        Some(Exact::Float(f))
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (exact(a)?, exact(b)?) {
        (Exact::Int(a), Exact::Int(b)) => Some(a.cmp(&b)),
        (Exact::Float(a), Exact::Float(b)) => a.partial_cmp(&b),
        (Exact::Int(a), Exact::Float(b)) => int_against_float(a, b),
        (Exact::Float(a), Exact::Int(b)) => int_against_float(b, a).map(Ordering::reverse),
    }
}

// `f` is fractional or outside the i128 range here.
fn int_against_float(i: i128, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= I128_BOUND {
        return Some(Ordering::Less);
    }
    if f < -I128_BOUND {
        return Some(Ordering::Greater);
    }
    match i.cmp(&(f.floor() as i128)) {
        Ordering::Equal => Some(Ordering::Less),
        other => Some(other),
    }
}

impl From<Value> for TrackedValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for TrackedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
