//! JSON value types and utilities.
//!
//! This module defines the [`Value`] enum, the document tree handed to the
//! completion callback, and the string escaping used to render it back to
//! JSON text.
use indexmap::IndexMap;

/// Object members in insertion order.
pub type Map = IndexMap<String, Value>;
/// Array elements.
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// Integers and floats are kept apart: a number written without fraction or
/// exponent is an [`Integer`](Value::Integer), any other number is a
/// [`Float`](Value::Float).
///
/// # Examples
///
/// ```
/// use jsonfeed::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// map.insert("n".to_string(), Value::Integer(3));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value","n":3}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
// `untagged` keeps the serde representation JSON-shaped, so a `Value` can be
// converted into typed models through any serde data format.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// `null`
    #[default]
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// A number without fraction or exponent.
    Integer(i64),
    /// A number with a fraction or an exponent.
    Float(f64),
    /// A string.
    String(String),
    /// An array.
    Array(Array),
    /// An object.
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Creates an empty object.
    #[must_use]
    pub fn new_object() -> Self {
        Self::Object(Map::new())
    }

    /// Creates an empty array.
    #[must_use]
    pub fn new_array() -> Self {
        Self::Array(Array::new())
    }

    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonfeed::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::Boolean(false).is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is [`Integer`].
    ///
    /// [`Integer`]: Value::Integer
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(..))
    }

    /// Returns `true` if the value is [`Float`].
    ///
    /// [`Float`]: Value::Float
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(..))
    }

    /// Returns `true` if the value is an [`Integer`] or a [`Float`].
    ///
    /// [`Integer`]: Value::Integer
    /// [`Float`]: Value::Float
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonfeed::Value;
    ///
    /// assert!(Value::Integer(42).is_number());
    /// assert!(Value::Float(4.2).is_number());
    /// assert!(!Value::Null.is_number());
    /// ```
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(..) | Self::Float(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonfeed::Value;
    ///
    /// assert!(Value::new_object().is_object());
    /// assert!(!Value::new_array().is_object());
    /// ```
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Returns the integer, if this is one. Floats are not converted.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        if let Self::Integer(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    /// Returns the number as `f64`; integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Returns the elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        if let Self::Array(a) = self {
            Some(a)
        } else {
            None
        }
    }

    /// Returns the members, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        if let Self::Object(o) = self {
            Some(o)
        } else {
            None
        }
    }

    /// Looks up a member of an object.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonfeed::{Map, Value};
    ///
    /// let v = Value::Object(Map::from([("a".to_string(), Value::Integer(1))]));
    /// assert_eq!(v.get("a"), Some(&Value::Integer(1)));
    /// assert_eq!(v.get("b"), None);
    /// assert_eq!(Value::Null.get("a"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

/// Escapes a string for inclusion in a JSON string literal.
///
/// Quotes, backslashes, control characters and the Unicode line separators
/// are written as JSON escape sequences.
pub(crate) fn write_escaped_string<W: core::fmt::Write>(src: &str, f: &mut W) -> core::fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            // Pre-2019 JSON consumers may choke on raw line separators.
            '\u{2028}' | '\u{2029}' => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            // Only BMP control characters fit a four-digit escape.
            c if c.is_ascii_control() || c.is_control() && c as u32 <= 0xFFFF => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

// The default drop recurses once per nesting level, which overflows the
// stack on very deep documents. Children that are themselves containers are
// moved onto a heap stack and emptied there before they are dropped.
impl Drop for Value {
    fn drop(&mut self) {
        fn is_container(value: &Value) -> bool {
            matches!(value, Value::Array(_) | Value::Object(_))
        }

        let mut pending: Vec<Value> = match self {
            Value::Array(items) if items.iter().any(is_container) => core::mem::take(items),
            Value::Object(map) if map.values().any(is_container) => {
                map.drain(..).map(|(_, value)| value).collect()
            }
            _ => return,
        };
        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::Array(items) => pending.append(items),
                Value::Object(map) => pending.extend(map.drain(..).map(|(_, value)| value)),
                _ => {}
            }
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Integer(n) => write!(f, "{n}"),
            // `Debug` keeps a `.0` or an exponent, so the text reads back as a float.
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f)?;
                f.write_str("\"")
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_insertion_order() {
        let mut map = Map::new();
        map.insert("z".into(), Value::Integer(1));
        map.insert("a".into(), Value::Array(vec![Value::Null, Value::Boolean(true)]));
        assert_eq!(Value::Object(map).to_string(), r#"{"z":1,"a":[null,true]}"#);
    }

    #[test]
    fn display_floats_read_back_as_floats() {
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(-0.5).to_string(), "-0.5");
        assert_eq!(Value::Float(1e300).to_string(), "1e300");
        assert_eq!(Value::Integer(-7).to_string(), "-7");
    }

    #[test]
    fn display_escapes_strings() {
        let v = Value::String("a\"b\\c\nd\u{1}\u{2028}".into());
        assert_eq!(v.to_string(), r#""a\"b\\c\nd\u0001\u2028""#);
    }

    #[test]
    fn dropping_a_deep_tree_does_not_recurse() {
        let mut value = Value::new_array();
        for depth in 0..1_000_000 {
            value = if depth % 2 == 0 {
                Value::Array(vec![value, Value::Null])
            } else {
                Value::Object(Map::from([("k".to_string(), value)]))
            };
        }
        drop(value);
    }

    #[test]
    fn serde_representation_is_untagged() {
        let json = r#"{"s":"x","i":1,"f":1.5,"b":false,"n":null,"a":[1,2]}"#;
        let value: Value = serde_json::from_str(json).unwrap();
        assert_eq!(value.get("i"), Some(&Value::Integer(1)));
        assert_eq!(value.get("f"), Some(&Value::Float(1.5)));
        assert_eq!(serde_json::to_string(&value).unwrap(), json);
    }
}
