//! Compact JSON rendering of a value tree.

use core::fmt::Write as _;

use hexjson_value::{JsonArray, JsonNode, JsonObject, JsonValue};

use crate::FormatOptions;

/// Largest magnitude below which every integral double is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Anything the formatter can render: a node, a container or a leaf.
pub trait ToJson {
    /// Append the compact JSON text of `self` through `f`.
    fn write_json(&self, f: &mut Formatter<'_>);
}

impl ToJson for JsonNode {
    fn write_json(&self, f: &mut Formatter<'_>) {
        f.write_node(self);
    }
}

impl ToJson for JsonObject {
    fn write_json(&self, f: &mut Formatter<'_>) {
        f.write_object(self);
    }
}

impl ToJson for JsonArray {
    fn write_json(&self, f: &mut Formatter<'_>) {
        f.write_array(self);
    }
}

impl ToJson for JsonValue {
    fn write_json(&self, f: &mut Formatter<'_>) {
        f.write_value(self);
    }
}

/// Depth-first renderer appending to a caller-owned `String`.
pub struct Formatter<'a> {
    out: &'a mut String,
    escape_non_ascii: bool,
}

impl<'a> Formatter<'a> {
    /// Create a formatter appending to `out`.
    pub fn new(out: &'a mut String, options: &FormatOptions) -> Self {
        Formatter {
            out,
            escape_non_ascii: options.escape_non_ascii,
        }
    }

    /// Render any node.
    pub fn write_node(&mut self, node: &JsonNode) {
        match node {
            JsonNode::Value(v) => self.write_value(v),
            JsonNode::Array(a) => self.write_array(a),
            JsonNode::Object(o) => self.write_object(o),
        }
    }

    /// Render an object as `{"key":value,...}`.
    pub fn write_object(&mut self, obj: &JsonObject) {
        self.out.push('{');
        for (key, node) in obj {
            self.write_str(key);
            self.out.push(':');
            self.write_node(node);
            self.out.push(',');
        }
        self.trim_separator();
        self.out.push('}');
    }

    /// Render an array as `[value,...]`.
    pub fn write_array(&mut self, arr: &JsonArray) {
        self.out.push('[');
        for node in arr {
            self.write_node(node);
            self.out.push(',');
        }
        self.trim_separator();
        self.out.push(']');
    }

    /// Render a leaf.
    pub fn write_value(&mut self, value: &JsonValue) {
        match value {
            JsonValue::Null => self.out.push_str("null"),
            JsonValue::Boolean(true) => self.out.push_str("true"),
            JsonValue::Boolean(false) => self.out.push_str("false"),
            JsonValue::Number(n) => self.write_number(*n),
            JsonValue::String(s) => self.write_str(s),
        }
    }

    fn trim_separator(&mut self) {
        if self.out.ends_with(',') {
            self.out.pop();
        }
    }

    fn write_number(&mut self, n: f64) {
        if !n.is_finite() {
            self.out.push_str("null");
        } else if n.fract() == 0.0
            && n.abs() < MAX_SAFE_INTEGER
            && !(n == 0.0 && n.is_sign_negative())
        {
            let mut buf = itoa::Buffer::new();
            self.out.push_str(buf.format(n as i64));
        } else {
            // f64's Display is shortest round-trip and never uses exponent notation.
            let _ = write!(self.out, "{n}");
        }
    }

    fn write_str(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            self.write_char(c);
        }
        self.out.push('"');
    }

    fn write_char(&mut self, c: char) {
        match c {
            '"' => self.out.push_str("\\\""),
            '\\' => self.out.push_str("\\\\"),
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            '\t' => self.out.push_str("\\t"),
            '\u{08}' => self.out.push_str("\\b"),
            '\u{0C}' => self.out.push_str("\\f"),
            c if c.is_ascii_control() => self.write_unit(c as u16),
            c if c.is_ascii() || !self.escape_non_ascii => self.out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    self.write_unit(*unit);
                }
            }
        }
    }

    fn write_unit(&mut self, unit: u16) {
        let _ = write!(self.out, "\\u{unit:04x}");
    }
}

/// Render `value` as compact JSON with default options (non-ASCII escaped).
pub fn to_string<T: ToJson + ?Sized>(value: &T) -> String {
    to_string_with_options(value, &FormatOptions::default())
}

/// Render `value` as compact JSON.
pub fn to_string_with_options<T: ToJson + ?Sized>(value: &T, options: &FormatOptions) -> String {
    let mut out = String::new();
    value.write_json(&mut Formatter::new(&mut out, options));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexjson_testhelpers::test;

    fn num(n: f64) -> String {
        to_string(&JsonValue::Number(n))
    }

    #[test]
    fn numbers() {
        assert_eq!(num(3.0), "3");
        assert_eq!(num(-0.5), "-0.5");
        assert_eq!(num(-0.0), "-0");
        assert_eq!(num(1e21), "1000000000000000000000");
        assert_eq!(num(0.1), "0.1");
        assert_eq!(num(f64::NAN), "null");
        assert_eq!(num(f64::INFINITY), "null");
        assert_eq!(num(9007199254740991.0), "9007199254740991");
    }

    #[test]
    fn escapes_structural_characters() {
        let s = JsonValue::from("a\"b\\c\nd\u{1}");
        assert_eq!(to_string(&s), r#""a\"b\\c\nd\u0001""#);
    }

    #[test]
    fn non_ascii_modes() {
        let s = JsonValue::from("é😀");
        assert_eq!(to_string(&s), r#""\u00e9\ud83d\ude00""#);
        assert_eq!(
            to_string_with_options(&s, &FormatOptions::new().preserve_non_ascii()),
            "\"é😀\""
        );
    }

    #[test]
    fn separators_are_trimmed() {
        let mut obj = JsonObject::new();
        obj.insert("a", 1);
        obj.insert("b", JsonArray::from_iter([true, false]));
        obj.insert("c", JsonArray::new());
        obj.insert("d", JsonObject::new());
        assert_eq!(to_string(&obj), r#"{"a":1,"b":[true,false],"c":[],"d":{}}"#);
    }

    #[test]
    fn appends_to_existing_buffer() {
        let mut out = String::from("data=");
        let mut arr = JsonArray::new();
        arr.push(JsonValue::Null);
        Formatter::new(&mut out, &FormatOptions::default()).write_array(&arr);
        assert_eq!(out, "data=[null]");
    }

    #[test]
    fn empty_buffer_has_no_separator_to_trim() {
        let mut out = String::from("x,");
        Formatter::new(&mut out, &FormatOptions::default()).write_array(&JsonArray::new());
        assert_eq!(out, "x,[]");
    }
}
