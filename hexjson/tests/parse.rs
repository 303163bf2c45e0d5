use hexjson::{
    DuplicateKeys, ExponentMode, JsonNode, JsonValue, ParseErrorKind, ParseOptions, parse,
    parse_array, parse_object, parse_slice, parse_with_options,
};
use hexjson_testhelpers::test;

fn parse_err(text: &str) -> String {
    parse(text).unwrap_err().to_string()
}

#[test]
fn nested_document() {
    let root = parse(r#"{"a": [1, {"b": null}], "c": "x", "d": true}"#).unwrap();
    let obj = root.as_object().unwrap();

    let a = obj.get_array("a").unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(a.get_value(0), Some(&JsonValue::Number(1.0)));
    assert!(a.get_object(1).unwrap()["b"].is_null());
    assert_eq!(obj.get_value("c").unwrap().as_str().unwrap(), "x");
    assert!(obj.get_value("d").unwrap().as_bool().unwrap());
}

#[test]
fn numbers_are_doubles() {
    let arr = parse_array("[-0.5, 3, 3.0, 0, -12]").unwrap();
    let numbers: Vec<f64> = arr
        .iter()
        .map(|n| n.as_value().unwrap().as_f64().unwrap())
        .collect();
    assert_eq!(numbers, [-0.5, 3.0, 3.0, 0.0, -12.0]);
}

#[test]
fn empty_containers() {
    assert!(parse_object("{}").unwrap().is_empty());
    assert!(parse_array("[]").unwrap().is_empty());
    assert!(parse_array(" [ [ ] , { } ] ").unwrap()[0].as_array().unwrap().is_empty());
}

#[test]
fn exponent_modes() {
    // mantissa raised to the exponent
    let arr = parse_array("[2e3, 1.5E2, 4e0.5]").unwrap();
    assert_eq!(arr.get_value(0), Some(&JsonValue::Number(8.0)));
    assert_eq!(arr.get_value(1), Some(&JsonValue::Number(2.25)));
    assert!(matches!(arr.get_value(2), Some(JsonValue::Number(n)) if (n - 2.0).abs() < 1e-12));

    let standard = ParseOptions::new().standard_exponent();
    let root = parse_with_options("[2e3, 1.5E+2, 5e-1]", &standard).unwrap();
    let arr = root.as_array().unwrap();
    assert_eq!(arr.get_value(0), Some(&JsonValue::Number(2000.0)));
    assert_eq!(arr.get_value(1), Some(&JsonValue::Number(150.0)));
    assert_eq!(arr.get_value(2), Some(&JsonValue::Number(0.5)));

    let power = ParseOptions::new().exponent(ExponentMode::Power);
    assert!(parse_with_options("[1e+2]", &power).is_err());
}

#[test]
fn escapes_decode() {
    let arr = parse_array(r#"["a\"b\\c\/d\b\f\n\r\t", "\u00e9\u00C9", "\ud83d\uDE00"]"#).unwrap();
    assert_eq!(
        arr.get_value(0).unwrap().as_str().unwrap(),
        "a\"b\\c/d\u{8}\u{c}\n\r\t"
    );
    assert_eq!(arr.get_value(1).unwrap().as_str().unwrap(), "éÉ");
    assert_eq!(arr.get_value(2).unwrap().as_str().unwrap(), "😀");
}

#[test]
fn duplicate_keys() {
    let err = parse(r#"{"a": 1, "a": 2}"#).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::DuplicateKey {
            key: "a".to_owned()
        }
    );
    assert_eq!(err.offset, 9);

    let last_wins = ParseOptions::new().duplicate_keys(DuplicateKeys::LastWins);
    let root = parse_with_options(r#"{"a": 1, "b": 0, "a": 2}"#, &last_wins).unwrap();
    let obj = root.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert_eq!(obj.keys().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(obj.get_value("a"), Some(&JsonValue::Number(2.0)));
}

#[test]
fn trailing_comma_in_object() {
    insta::assert_snapshot!(parse_err(r#"{"a":1,}"#), @"expected string key, found `}` at byte 7");
}

#[test]
fn missing_comma_in_array() {
    insta::assert_snapshot!(parse_err("[1 2]"), @"expected `,` or `]`, found number at byte 3");
}

#[test]
fn malformed_input() {
    insta::assert_snapshot!(parse_err(""), @"unexpected end of input, expected `{` or `[` at byte 0");
    insta::assert_snapshot!(parse_err("42"), @"expected `{` or `[`, found number at byte 0");
    insta::assert_snapshot!(parse_err("[1, 2"), @"unexpected end of input, expected `,` or `]` at byte 5");
    insta::assert_snapshot!(parse_err("[1.2.3]"), @"malformed number at byte 4");
    insta::assert_snapshot!(parse_err("[-]"), @"malformed number at byte 1");
    insta::assert_snapshot!(parse_err("[nul]"), @"invalid literal, expected `null` at byte 1");
    insta::assert_snapshot!(parse_err(r#"["\q"]"#), @r"invalid escape `\q` at byte 2");
    insta::assert_snapshot!(parse_err(r#"["\udc00"]"#), @"invalid unicode escape at byte 2");
    insta::assert_snapshot!(parse_err("[@]"), @"unexpected character '@' at byte 1");
    insta::assert_snapshot!(parse_err("{} []"), @"trailing characters after the document at byte 3");
}

#[test]
fn depth_limit() {
    let shallow = ParseOptions::new().max_depth(2);
    assert!(parse_with_options("[[1]]", &shallow).is_ok());
    let err = parse_with_options("[[[1]]]", &shallow).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DepthLimitExceeded { limit: 2 });

    let deep = "[".repeat(10_000);
    assert!(parse(&deep).is_err());
}

#[test]
fn typed_roots() {
    assert!(parse_object("[1]").is_err());
    assert!(parse_array(r#"{"a":1}"#).is_err());
    assert!(matches!(parse("[1]").unwrap(), JsonNode::Array(_)));
}

#[test]
fn byte_input() {
    let root = parse_slice("{\"name\": \"café\"}".as_bytes()).unwrap();
    let name = root.as_object().unwrap().get_value("name").unwrap();
    assert_eq!(name.as_str().unwrap(), "café");

    let err = parse_slice(b"[\"ab\xff\"]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
    assert_eq!(err.offset, 4);
}

#[test]
fn numbers_must_be_finite() {
    let err = parse("[10e400]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NumberOutOfRange);
    insta::assert_snapshot!(err, @"number is not a finite double at byte 1");

    // negative base under a fractional power
    let err = parse("[1, -2e0.5]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NumberOutOfRange);
    assert_eq!(err.offset, 4);

    let standard = ParseOptions::new().standard_exponent();
    let err = parse_with_options(r#"{"n": 1e999}"#, &standard).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NumberOutOfRange);
    assert_eq!(err.offset, 6);
    assert!(parse_with_options("[1e308, -1e308]", &standard).is_ok());
}

#[test]
fn error_codes() {
    let code = |text: &str| parse(text).unwrap_err().kind.code();
    assert_eq!(code(r#"{"a":1,"a":2}"#), "hexjson::duplicate_key");
    assert_eq!(code("[1 2]"), "hexjson::unexpected_token");
    assert_eq!(code("[1.2.3]"), "hexjson::malformed_number");
    assert_eq!(code("[10e400]"), "hexjson::number_out_of_range");
    assert_eq!(code("{} []"), "hexjson::trailing_characters");
    assert_eq!(code("[1"), "hexjson::unexpected_eof");
}
