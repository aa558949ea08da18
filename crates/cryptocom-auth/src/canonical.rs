//! Canonical parameter string used as signature input
//!
//! The exchange recomputes the signature from the parameters it received, so
//! both sides must agree on one textual form:
//!
//! 1. Map keys are visited in byte-wise order.
//! 2. Each entry contributes `key` immediately followed by its value's form,
//!    with no separators.
//! 3. Strings render verbatim, booleans as `true` / `false`, integers in
//!    decimal.
//! 4. Nested maps recurse with the same rule; lists concatenate their
//!    elements in their original order.
//!
//! Floats with an integral value render exactly like the integer (`1.0` is
//! `1`, `-0.0` is `0`). Other floats use the shortest decimal text that
//! round-trips, which never switches to exponent notation. NaN and infinity
//! are rejected.

use cryptocom_types::{ParamValue, Params};

/// Floats are signed in the same text the JSON body carries
pub use cryptocom_types::format_float;

use crate::error::{AuthError, AuthResult};

/// Build the canonical string for a parameter map
///
/// # Example
///
/// ```
/// use cryptocom_auth::canonicalize;
/// use cryptocom_types::Params;
///
/// let params = Params::new()
///     .with("page_size", 100)
///     .with("instrument_name", "BTC_USDT");
///
/// assert_eq!(canonicalize(&params).unwrap(), "instrument_nameBTC_USDTpage_size100");
/// ```
pub fn canonicalize(params: &Params) -> AuthResult<String> {
    let mut out = String::new();
    write_map(&mut out, None, params)?;
    Ok(out)
}

/// Render a single value in canonical form
///
/// `key` only names the value in errors.
pub fn canonical_value(key: &str, value: &ParamValue) -> AuthResult<String> {
    let mut out = String::new();
    write_value(&mut out, key, value)?;
    Ok(out)
}

fn write_map(out: &mut String, parent: Option<&str>, params: &Params) -> AuthResult<()> {
    for (key, value) in params.iter() {
        out.push_str(key);
        match parent {
            Some(parent) => write_value(out, &format!("{parent}.{key}"), value)?,
            None => write_value(out, key, value)?,
        }
    }
    Ok(())
}

fn write_value(out: &mut String, path: &str, value: &ParamValue) -> AuthResult<()> {
    match value {
        ParamValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ParamValue::Integer(i) => out.push_str(&i.to_string()),
        ParamValue::Float(f) => {
            let text = format_float(*f).ok_or_else(|| AuthError::NonFiniteNumber {
                key: path.to_string(),
            })?;
            out.push_str(&text);
        }
        ParamValue::String(s) => out.push_str(s),
        ParamValue::List(items) => {
            for (i, item) in items.iter().enumerate() {
                write_value(out, &format!("{path}[{i}]"), item)?;
            }
        }
        ParamValue::Map(params) => write_map(out, Some(path), params)?,
    }
    Ok(())
}
