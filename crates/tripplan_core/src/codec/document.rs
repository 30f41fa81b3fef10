//! JSON document encoding and structural import checks.

use crate::codec::{CodecError, CodecResult};
use crate::model::itinerary::{Itinerary, DATE_FORMAT};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "title",
    "startDate",
    "endDate",
    "items",
    "createdAt",
    "updatedAt",
];
const NON_BLANK_STRING_FIELDS: [&str; 6] =
    ["id", "title", "startDate", "endDate", "createdAt", "updatedAt"];
const ITEM_STRING_FIELDS: [&str; 5] = ["id", "date", "time", "content", "note"];

/// Encodes an itinerary as the pretty-printed export document.
pub fn encode_document(itinerary: &Itinerary) -> CodecResult<String> {
    serde_json::to_string_pretty(itinerary)
        .map_err(|err| CodecError::Format(format!("failed to encode itinerary: {err}")))
}

/// Encodes an itinerary as a single-line document for storage backends.
pub fn encode_compact(itinerary: &Itinerary) -> CodecResult<String> {
    serde_json::to_string(itinerary)
        .map_err(|err| CodecError::Format(format!("failed to encode itinerary: {err}")))
}

/// Decodes and validates a document from JSON text.
pub fn decode_document(text: &str) -> CodecResult<Itinerary> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| CodecError::Format(format!("not a valid JSON document: {err}")))?;
    decode_value(value)
}

/// Decodes and validates an already-parsed JSON value.
///
/// Structural checks run first; the typed record is then checked against the
/// business rules so an accepted document is ready for persistence.
pub fn decode_value(value: Value) -> CodecResult<Itinerary> {
    let itinerary = decode_stored_value(value)?;
    itinerary.validate().map_err(CodecError::Invalid)?;
    Ok(itinerary)
}

/// Decodes a record read back from storage: structural checks only.
///
/// Business rules are left to the next write, so one out-of-rule record does not
/// make the rest of a store unreadable.
pub fn decode_stored_value(value: Value) -> CodecResult<Itinerary> {
    check_structure(&value)?;
    serde_json::from_value(value).map_err(|err| CodecError::Format(err.to_string()))
}

fn check_structure(value: &Value) -> CodecResult<()> {
    let Value::Object(document) = value else {
        return Err(format_error(format!(
            "top-level value must be an object, got {}",
            kind_of(value)
        )));
    };

    for field in REQUIRED_FIELDS {
        if !document.contains_key(field) {
            return Err(format_error(format!("missing required field `{field}`")));
        }
    }

    for field in NON_BLANK_STRING_FIELDS {
        match document.get(field).and_then(Value::as_str) {
            Some(text) if !text.trim().is_empty() => {}
            _ => {
                return Err(format_error(format!(
                    "`{field}` must be a non-empty string"
                )))
            }
        }
    }

    let Some(items) = document.get("items").and_then(Value::as_array) else {
        return Err(format_error("`items` must be an array"));
    };

    for field in ["startDate", "endDate"] {
        let text = string_field(document, field);
        if NaiveDate::parse_from_str(text, DATE_FORMAT).is_err() {
            return Err(format_error(format!(
                "`{field}` is not a valid date: `{text}`"
            )));
        }
    }

    for field in ["createdAt", "updatedAt"] {
        let text = string_field(document, field);
        if DateTime::parse_from_rfc3339(text).is_err() {
            return Err(format_error(format!(
                "`{field}` is not a valid timestamp: `{text}`"
            )));
        }
    }

    match document.get("coverImage") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => return Err(format_error("`coverImage` must be a string")),
    }

    for (index, entry) in items.iter().enumerate() {
        check_item(index, entry)?;
    }

    Ok(())
}

fn check_item(index: usize, entry: &Value) -> CodecResult<()> {
    let Value::Object(item) = entry else {
        return Err(format_error(format!("item {index} must be an object")));
    };

    for field in ITEM_STRING_FIELDS {
        if !item.get(field).is_some_and(Value::is_string) {
            return Err(format_error(format!(
                "item {index}: `{field}` must be a string"
            )));
        }
    }

    let Some(amount) = item.get("amount").and_then(Value::as_f64) else {
        return Err(format_error(format!(
            "item {index}: `amount` must be a number"
        )));
    };
    if amount < 0.0 {
        return Err(format_error(format!(
            "item {index}: `amount` must not be negative"
        )));
    }

    Ok(())
}

fn string_field<'a>(document: &'a Map<String, Value>, field: &str) -> &'a str {
    document.get(field).and_then(Value::as_str).unwrap_or_default()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn format_error(message: impl Into<String>) -> CodecError {
    CodecError::Format(message.into())
}

#[cfg(test)]
mod tests {
    use super::{decode_document, decode_stored_value, decode_value, encode_document};
    use crate::codec::CodecError;
    use serde_json::json;

    fn kyoto() -> serde_json::Value {
        json!({
            "id": "trip-1",
            "title": "Kyoto Trip",
            "startDate": "2024-05-01",
            "endDate": "2024-05-03",
            "items": [
                {"id": "a", "date": "2024-05-01", "time": "09:00", "content": "Temple", "amount": 1500, "note": ""},
                {"id": "b", "date": "2024-05-02", "time": "10:00", "content": "Museum", "amount": 2000, "note": ""}
            ],
            "createdAt": "2024-04-01T09:00:00Z",
            "updatedAt": "2024-04-02T09:00:00.250Z"
        })
    }

    fn format_message(err: CodecError) -> String {
        match err {
            CodecError::Format(message) => message,
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn decodes_well_formed_document() {
        let itinerary = decode_value(kyoto()).unwrap();
        assert_eq!(itinerary.title, "Kyoto Trip");
        assert_eq!(itinerary.items.len(), 2);
        assert_eq!(itinerary.items[0].amount, 1500.0);
        assert_eq!(itinerary.cover_image, None);
    }

    #[test]
    fn export_is_byte_stable_across_reimport() {
        let first = encode_document(&decode_value(kyoto()).unwrap()).unwrap();
        let second = encode_document(&decode_document(&first).unwrap()).unwrap();
        assert_eq!(first, second);
        assert!(!first.contains("coverImage"));
    }

    #[test]
    fn rejects_non_object_top_level() {
        for value in [json!([1, 2]), json!(42), json!("text"), json!(null)] {
            let message = format_message(decode_value(value).unwrap_err());
            assert!(message.contains("top-level"), "{message}");
        }
    }

    #[test]
    fn rejects_missing_items_and_blank_strings() {
        let mut document = kyoto();
        document.as_object_mut().unwrap().remove("items");
        let message = format_message(decode_value(document).unwrap_err());
        assert!(message.contains("`items`"), "{message}");

        let mut document = kyoto();
        document["title"] = json!("   ");
        let message = format_message(decode_value(document).unwrap_err());
        assert!(message.contains("`title`"), "{message}");
    }

    #[test]
    fn rejects_bad_dates_and_timestamps() {
        let mut document = kyoto();
        document["startDate"] = json!("not-a-date");
        let message = format_message(decode_value(document).unwrap_err());
        assert!(message.contains("`startDate`"), "{message}");

        let mut document = kyoto();
        document["updatedAt"] = json!("yesterday");
        let message = format_message(decode_value(document).unwrap_err());
        assert!(message.contains("`updatedAt`"), "{message}");
    }

    #[test]
    fn rejects_malformed_items() {
        let mut document = kyoto();
        document["items"][1]["amount"] = json!(-1);
        let message = format_message(decode_value(document).unwrap_err());
        assert!(message.contains("item 1"), "{message}");

        let mut document = kyoto();
        document["items"][0]["time"] = json!(900);
        let message = format_message(decode_value(document).unwrap_err());
        assert!(message.contains("`time`"), "{message}");

        let mut document = kyoto();
        document["items"][0]["amount"] = json!("1500");
        assert!(matches!(
            decode_value(document).unwrap_err(),
            CodecError::Format(_)
        ));

        let mut document = kyoto();
        document["items"] = json!(["not an item"]);
        let message = format_message(decode_value(document).unwrap_err());
        assert!(message.contains("item 0 must be an object"), "{message}");
    }

    #[test]
    fn rejects_syntax_errors() {
        let message = format_message(decode_document("{\"id\": ").unwrap_err());
        assert!(message.contains("JSON"), "{message}");
    }

    #[test]
    fn business_rules_apply_after_structure() {
        let mut document = kyoto();
        document["startDate"] = json!("2024-01-01");
        document["endDate"] = json!("2025-02-04");
        match decode_value(document).unwrap_err() {
            CodecError::Invalid(errors) => assert!(errors.contains("dates")),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn rejects_update_timestamp_before_creation() {
        let mut document = kyoto();
        document["createdAt"] = json!("2024-05-10T00:00:00Z");
        document["updatedAt"] = json!("2024-01-01T00:00:00Z");
        match decode_value(document).unwrap_err() {
            CodecError::Invalid(errors) => assert_eq!(errors.fields(), vec!["updatedAt"]),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn stored_records_skip_business_rules_but_not_structure() {
        let mut document = kyoto();
        document["startDate"] = json!("2024-01-01");
        document["endDate"] = json!("2025-02-04");
        let itinerary = decode_stored_value(document).unwrap();
        assert!(itinerary.validate().is_err());

        let mut document = kyoto();
        document.as_object_mut().unwrap().remove("items");
        assert!(matches!(
            decode_stored_value(document).unwrap_err(),
            CodecError::Format(_)
        ));
    }
}
