use serde::{
    Serialize,
    ser::{self, Impossible},
};
use serde_json::{Number, Value};
use std::borrow::Cow;

/// A logged payload, captured as a JSON value.
///
/// Values that fail to serialize are kept as [`Message::Undefined`] rather
/// than surfacing an error from the logging call. NaN and the infinities
/// have no JSON form and are kept as [`Message::NonFinite`].
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Undefined,
    NonFinite(f64),
    Value(Value),
}

impl Message {
    pub fn capture<M: Serialize + ?Sized>(message: &M) -> Self {
        if let Some(float) = NonFiniteFloat::detect(message) {
            return Message::NonFinite(float);
        }
        serde_json::to_value(message)
            .map(Message::Value)
            .unwrap_or(Message::Undefined)
    }

    /// Objects and arrays. `null` is not structured.
    pub fn is_structured(&self) -> bool {
        matches!(self, Message::Value(Value::Array(_) | Value::Object(_)))
    }

    /// Short runtime type name, `array[<len>]` for sequences.
    pub fn type_descriptor(&self) -> Cow<'static, str> {
        match self {
            Message::Undefined => Cow::Borrowed("undefined"),
            Message::NonFinite(_) => Cow::Borrowed("number"),
            Message::Value(value) => match value {
                Value::Array(items) => Cow::Owned(format!("array[{}]", items.len())),
                Value::String(_) => Cow::Borrowed("string"),
                Value::Number(_) => Cow::Borrowed("number"),
                Value::Bool(_) => Cow::Borrowed("boolean"),
                Value::Null | Value::Object(_) => Cow::Borrowed("object"),
            },
        }
    }

    /// Text written next to the prefix.
    pub fn render(&self) -> String {
        match self {
            Message::Undefined => "undefined".to_string(),
            Message::NonFinite(float) => float_text(*float),
            Message::Value(Value::String(text)) => text.clone(),
            Message::Value(Value::Number(number)) => number_text(number),
            Message::Value(value) => value.to_string(),
        }
    }

    /// Full multi-line view of the value.
    pub fn inspect(&self) -> String {
        match self {
            Message::Undefined => "undefined".to_string(),
            Message::NonFinite(float) => float_text(*float),
            Message::Value(value) => format!("{value:#}"),
        }
    }

    /// Text carried by a [`LoggedError`](crate::LoggedError).
    pub fn stringify(&self) -> String {
        match self {
            Message::Undefined => String::new(),
            Message::NonFinite(float) => float_text(*float),
            Message::Value(value) => stringify_value(value),
        }
    }
}

fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => float_text(float),
        _ => number.to_string(),
    }
}

/// Whole floats drop their fraction, `-0.0` reads as `0`.
fn float_text(float: f64) -> String {
    if float.is_nan() {
        "NaN".to_string()
    } else if float.is_infinite() {
        let text = if float > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if float == 0.0 {
        "0".to_string()
    } else if float.fract() == 0.0 && float.abs() < 1e21 {
        format!("{float:.0}")
    } else {
        float.to_string()
    }
}

/// Finds a top-level NaN or infinite float before JSON conversion turns it
/// into `null`. Anything else yields `None`.
struct NonFiniteFloat;

impl NonFiniteFloat {
    fn detect<M: Serialize + ?Sized>(message: &M) -> Option<f64> {
        message.serialize(NonFiniteFloat).ok().flatten()
    }
}

type Detected = Result<Option<f64>, serde_json::Error>;
type Compound = Impossible<Option<f64>, serde_json::Error>;

fn compound() -> serde_json::Error {
    ser::Error::custom("compound value")
}

impl ser::Serializer for NonFiniteFloat {
    type Ok = Option<f64>;
    type Error = serde_json::Error;
    type SerializeSeq = Compound;
    type SerializeTuple = Compound;
    type SerializeTupleStruct = Compound;
    type SerializeTupleVariant = Compound;
    type SerializeMap = Compound;
    type SerializeStruct = Compound;
    type SerializeStructVariant = Compound;

    fn serialize_f64(self, v: f64) -> Detected {
        Ok((!v.is_finite()).then_some(v))
    }

    fn serialize_f32(self, v: f32) -> Detected {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Detected {
        value.serialize(self)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Detected {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Detected {
        Ok(None)
    }

    fn serialize_i8(self, _v: i8) -> Detected {
        Ok(None)
    }

    fn serialize_i16(self, _v: i16) -> Detected {
        Ok(None)
    }

    fn serialize_i32(self, _v: i32) -> Detected {
        Ok(None)
    }

    fn serialize_i64(self, _v: i64) -> Detected {
        Ok(None)
    }

    fn serialize_u8(self, _v: u8) -> Detected {
        Ok(None)
    }

    fn serialize_u16(self, _v: u16) -> Detected {
        Ok(None)
    }

    fn serialize_u32(self, _v: u32) -> Detected {
        Ok(None)
    }

    fn serialize_u64(self, _v: u64) -> Detected {
        Ok(None)
    }

    fn serialize_char(self, _v: char) -> Detected {
        Ok(None)
    }

    fn serialize_str(self, _v: &str) -> Detected {
        Ok(None)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Detected {
        Ok(None)
    }

    fn serialize_none(self) -> Detected {
        Ok(None)
    }

    fn serialize_unit(self) -> Detected {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Detected {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Detected {
        Ok(None)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Detected {
        Ok(None)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound, serde_json::Error> {
        Err(compound())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Compound, serde_json::Error> {
        Err(compound())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Compound, serde_json::Error> {
        Err(compound())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Compound, serde_json::Error> {
        Err(compound())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Compound, serde_json::Error> {
        Err(compound())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Compound, serde_json::Error> {
        Err(compound())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Compound, serde_json::Error> {
        Err(compound())
    }
}

fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(text) => text.clone(),
        Value::Bool(_) => value.to_string(),
        Value::Number(number) => number_text(number),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                // nulls collapse to empty slots when joined
                Value::Null => String::new(),
                other => stringify_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_descriptor() {
        assert_eq!(Message::capture("hi").type_descriptor(), "string");
        assert_eq!(Message::capture(&42).type_descriptor(), "number");
        assert_eq!(Message::capture(&true).type_descriptor(), "boolean");
        assert_eq!(Message::capture(&[1, 2, 3]).type_descriptor(), "array[3]");
        assert_eq!(Message::capture(&json!({"a": 1})).type_descriptor(), "object");
        assert_eq!(Message::capture(&()).type_descriptor(), "object");
        assert_eq!(Message::Undefined.type_descriptor(), "undefined");
    }

    #[test]
    fn test_null_is_not_structured() {
        assert!(!Message::capture(&()).is_structured());
        assert!(!Message::capture("x").is_structured());
        assert!(Message::capture(&Vec::<u8>::new()).is_structured());
        assert!(Message::capture(&json!({})).is_structured());
    }

    #[test]
    fn test_render() {
        assert_eq!(Message::capture("hello").render(), "hello");
        assert_eq!(Message::capture(&1.5).render(), "1.5");
        assert_eq!(Message::capture(&json!({"a": [1, 2]})).render(), r#"{"a":[1,2]}"#);
        assert_eq!(Message::Undefined.render(), "undefined");
    }

    #[test]
    fn test_inspect_is_pretty() {
        let inspected = Message::capture(&json!({"a": 1})).inspect();
        assert_eq!(inspected, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_stringify() {
        assert_eq!(Message::capture("boom").stringify(), "boom");
        assert_eq!(Message::capture(&7).stringify(), "7");
        assert_eq!(Message::capture(&false).stringify(), "false");
        assert_eq!(Message::capture(&()).stringify(), "null");
        assert_eq!(Message::capture(&json!([1, null, "a", [2, 3]])).stringify(), "1,,a,2,3");
        assert_eq!(Message::capture(&json!({"a": 1})).stringify(), "[object Object]");
        assert_eq!(Message::Undefined.stringify(), "");
    }

    #[test]
    fn test_non_finite_floats_stay_numbers() {
        let nan = Message::capture(&f64::NAN);
        assert!(matches!(nan, Message::NonFinite(v) if v.is_nan()));
        assert_eq!(nan.type_descriptor(), "number");
        assert_eq!(nan.render(), "NaN");
        assert_eq!(nan.stringify(), "NaN");
        assert!(!nan.is_structured());

        assert_eq!(Message::capture(&f64::INFINITY).render(), "Infinity");
        assert_eq!(Message::capture(&f32::NEG_INFINITY).stringify(), "-Infinity");
        assert_eq!(Message::capture(&Some(f64::NAN)).type_descriptor(), "number");
        // nested non-finite values still become null
        assert_eq!(Message::capture(&[f64::NAN]).render(), "[null]");
    }

    #[test]
    fn test_whole_floats_drop_fraction() {
        assert_eq!(Message::capture(&1.0).render(), "1");
        assert_eq!(Message::capture(&-0.0).render(), "0");
        assert_eq!(Message::capture(&-3.0).stringify(), "-3");
        assert_eq!(Message::capture(&2.5).stringify(), "2.5");
        assert_eq!(Message::capture(&json!([1.0, 0.5])).stringify(), "1,0.5");
    }

    #[test]
    fn test_unserializable_message_is_undefined() {
        use std::collections::HashMap;

        // non-string map keys cannot become JSON object keys
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1u8);
        assert_eq!(Message::capture(&map), Message::Undefined);
    }
}
