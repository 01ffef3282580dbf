use listsync_types::Record;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn user(id: i64, name: &str) -> Record {
    Record::new().with("id", id).with("name", name)
}

#[test]
fn id_and_fields() {
    let record = user(7, "Leanne");
    assert_eq!(record.id(), Some(&json!(7)));
    assert_eq!(record.get_str("name"), Some("Leanne"));
    assert_eq!(record.get_number("id"), Some(7.0));
    assert!(record.get("email").is_none());
}

#[test]
fn missing_id() {
    let record = Record::new().with("name", "anonymous");
    assert!(record.id().is_none());
}

#[test]
fn insert_replaces_previous_value() {
    let mut record = user(1, "Bob");
    let previous = record.insert("name", json!("Robert"));
    assert_eq!(previous, Some(json!("Bob")));
    assert_eq!(record.get_str("name"), Some("Robert"));
}

#[test]
fn try_from_object() {
    let record = Record::try_from(json!({"id": 1, "title": "hello"})).unwrap();
    assert_eq!(record.get_str("title"), Some("hello"));
}

#[test]
fn try_from_non_object_is_rejected() {
    let rejected = Record::try_from(json!([1, 2, 3])).unwrap_err();
    assert_eq!(rejected, json!([1, 2, 3]));
}

#[test]
fn serializes_as_plain_object() {
    let record = user(2, "Alice").with("address", json!({"city": "Gwenborough"}));
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        json!({"id": 2, "name": "Alice", "address": {"city": "Gwenborough"}})
    );

    let back: Record = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}

#[test]
fn deserializing_a_non_object_fails() {
    let result: Result<Record, _> = serde_json::from_str("\"just a string\"");
    assert!(result.is_err());
}

#[test]
fn into_value() {
    let value: Value = user(3, "Clementine").into();
    assert_eq!(value["name"], json!("Clementine"));
}
