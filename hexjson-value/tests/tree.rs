use hexjson_testhelpers::test;
use hexjson_value::{JsonArray, JsonNode, JsonObject, JsonValue, ValueType};

fn sample() -> JsonObject {
    let mut point = JsonObject::new();
    point.insert("x", 1);
    point.insert("y", 2);

    let mut tags = JsonArray::new();
    tags.push("a");
    tags.push(JsonValue::Null);

    let mut root = JsonObject::new();
    root.insert("point", point);
    root.insert("tags", tags);
    root.insert("ok", true);
    root
}

#[test]
fn nested_lookup_by_shape() {
    let root = sample();

    let point = root.get_object("point").unwrap();
    assert_eq!(point.get_value("x").unwrap().as_i32(), Ok(1));

    let tags = root.get_array("tags").unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags.get_value(0).unwrap().as_str(), Ok("a"));
    assert!(tags.get_value(1).unwrap().is_null());

    assert!(root.get_array("point").is_none());
    assert!(root.get_object("ok").is_none());
    assert_eq!(root.get_value("ok").unwrap().as_bool(), Ok(true));
}

#[test]
fn value_types_of_nodes() {
    let root = JsonNode::from(sample());
    assert_eq!(root.value_type(), ValueType::Object);
    let obj = root.as_object().unwrap();
    let kinds: Vec<ValueType> = obj.iter().map(|(_, n)| n.value_type()).collect();
    assert_eq!(
        kinds,
        [ValueType::Object, ValueType::Array, ValueType::Boolean]
    );
    assert!(kinds.iter().all(|k| !k.is_leaf() || *k == ValueType::Boolean));
}

#[test]
fn caller_owned_edits() {
    let mut root = JsonNode::from(sample());
    let obj = root.as_object_mut().unwrap();
    obj.remove("tags");
    obj.insert("extra", "value");

    let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    assert_eq!(keys, ["point", "ok", "extra"]);

    let arr = JsonNode::from(JsonArray::new());
    assert!(arr.into_object().is_err());
}
