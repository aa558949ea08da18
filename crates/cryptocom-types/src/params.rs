//! Request parameter values
//!
//! Parameters are a closed set of value kinds: scalars, nested maps and
//! ordered lists. [`Params`] keeps its keys in a `BTreeMap`, so iteration is
//! always in byte-wise key order, which is the order the exchange expects
//! when it recomputes a request signature.
//!
//! # Numeric stability
//!
//! A float that carries an integral value (`1.0`) is the same parameter as the
//! integer `1`. [`ParamValue::from`] normalizes such floats to
//! [`ParamValue::Integer`]. Serialization writes every [`ParamValue::Float`]
//! as the text [`format_float`] produces, the same text the signer sees, so
//! the JSON body never carries exponent notation the signature did not cover.

use rust_decimal::Decimal;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use std::collections::BTreeMap;

/// Lower bound (inclusive) of floats that convert losslessly to `i64`.
const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;
/// Upper bound (exclusive) of floats that convert losslessly to `i64`.
const I64_MAX_F64: f64 = 9_223_372_036_854_775_808.0;

/// Returns the integer a float represents, if it has no fractional part and
/// fits in an `i64`. `-0.0` maps to `0`.
pub fn integral_value(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && (I64_MIN_F64..I64_MAX_F64).contains(&value) {
        Some(value as i64)
    } else {
        None
    }
}

/// Plain decimal text of a float, or `None` if it is not finite
///
/// Integral values render as the integer (`-0.0` is `0`). Others use the
/// shortest round-trip form, which never switches to exponent notation.
pub fn format_float(value: f64) -> Option<String> {
    if let Some(i) = integral_value(value) {
        return Some(i.to_string());
    }
    value.is_finite().then(|| value.to_string())
}

/// A single request parameter value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean, rendered as `true` / `false`
    Bool(bool),
    /// Signed integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// String, rendered verbatim
    String(String),
    /// Ordered sequence; order is significant
    List(Vec<ParamValue>),
    /// Nested mapping; keys are sorted
    Map(Params),
}

impl ParamValue {
    /// Returns the string value, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, including integral floats
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Float(f) => integral_value(*f),
            _ => None,
        }
    }

    /// Returns true for scalar (non-container) values
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => match integral_value(*f) {
                Some(i) => serializer.serialize_i64(i),
                None => {
                    let text = format_float(*f)
                        .ok_or_else(|| S::Error::custom(format!("non-finite number {f}")))?;
                    RawValue::from_string(text)
                        .map_err(S::Error::custom)?
                        .serialize(serializer)
                }
            },
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Map(params) => params.serialize(serializer),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u16> for ParamValue {
    fn from(value: u16) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        match integral_value(value) {
            Some(i) => Self::Integer(i),
            None => Self::Float(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

/// Decimals travel as normalized strings (`1.50` becomes `"1.5"`), which keeps
/// prices and quantities out of float rendering entirely.
impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        Self::String(value.normalize().to_string())
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Params> for ParamValue {
    fn from(value: Params) -> Self {
        Self::Map(value)
    }
}

/// Parameter map of a single request
///
/// # Example
///
/// ```
/// use cryptocom_types::Params;
///
/// let params = Params::new()
///     .with("instrument_name", "BTC_USDT")
///     .with("page", 0)
///     .with_opt("page_size", None::<u32>);
///
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Add a parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a parameter only when a value is present
    ///
    /// Absent optional parameters never appear in the map, so omission and
    /// explicit absence are indistinguishable.
    pub fn with_opt<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate parameters in byte-wise key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
