//! JSON to SQL parameter conversion for the load path.

use serde_json::Value;

/// A value ready to be bound as a positional SQL parameter.
///
/// Built from one JSON cell of an input row-object. Nested objects and
/// arrays become [`BindValue::Blob`] holding their compact JSON encoding,
/// so columns that store JSON documents as BLOBs round-trip through a dump.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl BindValue {
    /// Converts one JSON cell into a bind parameter.
    ///
    /// Booleans bind as integers `1`/`0`. Integers that do not fit `i64`
    /// bind as reals.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if a nested document cannot be encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use table_json_core::BindValue;
    ///
    /// assert_eq!(BindValue::from_json(&json!(2)).unwrap(), BindValue::Integer(2));
    /// assert_eq!(BindValue::from_json(&json!(true)).unwrap(), BindValue::Integer(1));
    /// assert_eq!(
    ///     BindValue::from_json(&json!({"age": 40})).unwrap(),
    ///     BindValue::Blob(br#"{"age":40}"#.to_vec())
    /// );
    /// ```
    pub fn from_json(value: &Value) -> serde_json::Result<Self> {
        let bound = match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Integer(i64::from(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Real(f)
                } else {
                    Self::Null
                }
            }
            Value::String(s) => Self::Text(s.clone()),
            Value::Object(_) | Value::Array(_) => Self::Blob(serde_json::to_vec(value)?),
        };
        Ok(bound)
    }
}
