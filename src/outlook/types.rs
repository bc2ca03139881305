//! Microsoft Graph message types
//!
//! Only the fields selected by the message fetch are modelled. Everything is
//! optional on the wire; absent values deserialize to empty strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// Fallback when a message carries neither a sender name nor an address
pub const UNKNOWN_SENDER: &str = "Unknown sender";

/// Name and address of a participant
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EmailAddress {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub address: String,
}

/// Graph `recipient` resource
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(default)]
    pub email_address: EmailAddress,
}

/// A mailbox message, projected to subject, preview, timestamp and sender
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Sender; absent on some drafts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Recipient>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,

    /// Plain-text preview of the body (first ~255 characters)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body_preview: String,

    /// ISO 8601 timestamp as sent by Graph
    #[serde(default, deserialize_with = "null_as_empty")]
    pub received_date_time: String,
}

impl Message {
    /// Display name of the sender, falling back to the address
    pub fn sender(&self) -> &str {
        let Some(from) = &self.from else {
            return UNKNOWN_SENDER;
        };
        let address = &from.email_address;
        if !address.name.is_empty() {
            &address.name
        } else if !address.address.is_empty() {
            &address.address
        } else {
            UNKNOWN_SENDER
        }
    }
}

/// Graph sends `null` for cleared subjects
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a Graph collection response into messages.
///
/// A missing `value` field is an empty batch. A `value` that is not an array,
/// or an element that is not a message object, is malformed.
pub fn parse_message_list(body: &str) -> std::result::Result<Vec<Message>, FetchError> {
    let root: Value = serde_json::from_str(body).map_err(|e| FetchError::MalformedResponse {
        message: format!("response is not JSON: {}", e),
    })?;

    let value = match root {
        Value::Object(mut map) => map.remove("value"),
        other => {
            return Err(FetchError::MalformedResponse {
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            })
        }
    };

    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|e| FetchError::MalformedResponse {
                    message: format!("message {}: {}", index, e),
                })
            })
            .collect(),
        Some(other) => Err(FetchError::MalformedResponse {
            message: format!("'value' is {}, expected an array", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_deserialize() {
        let json = r#"{
            "@odata.etag": "W/\"abc\"",
            "id": "AAMkAD",
            "receivedDateTime": "2024-05-02T09:15:00Z",
            "subject": "Meeting tomorrow",
            "bodyPreview": "Let's meet at 10am",
            "from": {"emailAddress": {"name": "Alice", "address": "alice@contoso.com"}}
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.subject, "Meeting tomorrow");
        assert_eq!(message.body_preview, "Let's meet at 10am");
        assert_eq!(message.received_date_time, "2024-05-02T09:15:00Z");
        assert_eq!(message.sender(), "Alice");
    }

    #[test]
    fn test_sender_fallbacks() {
        let mut message = Message {
            from: Some(Recipient {
                email_address: EmailAddress {
                    name: String::new(),
                    address: "bob@contoso.com".to_string(),
                },
            }),
            ..Default::default()
        };
        assert_eq!(message.sender(), "bob@contoso.com");

        message.from = Some(Recipient::default());
        assert_eq!(message.sender(), UNKNOWN_SENDER);

        message.from = None;
        assert_eq!(message.sender(), UNKNOWN_SENDER);
    }

    #[test]
    fn test_null_subject_is_empty() {
        let message: Message = serde_json::from_str(r#"{"subject": null}"#).unwrap();
        assert_eq!(message.subject, "");
    }

    #[test]
    fn test_parse_missing_value_is_empty() {
        let messages = parse_message_list(r#"{"@odata.context": "x"}"#).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_parse_preserves_order() {
        let body = r#"{"value": [{"subject": "first"}, {"subject": "second"}]}"#;
        let messages = parse_message_list(body).unwrap();
        let subjects: Vec<_> = messages.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["first", "second"]);
    }

    #[test]
    fn test_parse_value_not_array_is_malformed() {
        let err = parse_message_list(r#"{"value": {"subject": "x"}}"#).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse { .. }));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_parse_element_not_object_is_malformed() {
        let err = parse_message_list(r#"{"value": ["oops"]}"#).unwrap_err();
        assert!(err.to_string().contains("message 0"));
    }

    #[test]
    fn test_parse_non_json_is_malformed() {
        let err = parse_message_list("<html>gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse { .. }));
    }
}
