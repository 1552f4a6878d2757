//! Domain model and normalization of Gmail message resources.
//!
//! Headers are matched case-insensitively and absent headers normalize to
//! the empty string.  Body extraction prefers the top-level payload body,
//! then the first first-level `text/plain` part; anything else yields a
//! literal marker instead of an error.

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

use crate::api::{GmailMessage, MessagePayload};
use crate::client::{LABEL_IMPORTANT, LABEL_STARRED, LABEL_UNREAD};

/// Marker returned when a message has no extractable plain-text body.
pub const CONTENT_UNAVAILABLE: &str = "(content unavailable)";

/// Marker returned when body data exists but cannot be decoded.
pub const CONTENT_UNREADABLE: &str = "(error reading content)";

/// A message sender split into display name and address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Display name; empty when the From header carried a bare address.
    pub display_name: String,
    /// The address itself.
    pub address: String,
}

impl Sender {
    /// Parse an RFC 5322 From header value of the form `Name <addr>` or a
    /// bare address.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Some(open) = raw.rfind('<')
            && let Some(close) = raw.rfind('>')
            && close > open
        {
            let display_name = raw[..open].trim().trim_matches('"').to_owned();
            let address = raw[open + 1..close].trim().to_owned();
            return Self {
                display_name,
                address,
            };
        }

        Self {
            display_name: String::new(),
            address: raw.to_owned(),
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} <{}>", self.display_name, self.address)
        }
    }
}

/// A normalized mail message, built transiently per request.
#[derive(Debug, Clone)]
pub struct MailMessage {
    /// Opaque provider message id.
    pub id: String,
    /// Parsed From header.
    pub sender: Sender,
    /// To header, verbatim.
    pub to: String,
    /// Subject header, verbatim (empty when absent).
    pub subject: String,
    /// Plain-text body or one of the literal markers.
    pub body: String,
    /// Date header, verbatim — the provider-native string, not parsed.
    pub date: String,
    /// Whether the UNREAD label is attached.
    pub unread: bool,
    /// Whether the IMPORTANT label is attached.
    pub important: bool,
    /// Whether the STARRED label is attached.
    pub starred: bool,
}

impl From<&GmailMessage> for MailMessage {
    fn from(msg: &GmailMessage) -> Self {
        Self {
            id: msg.id.clone(),
            sender: Sender::parse(&header_value(msg.payload.as_ref(), "From")),
            to: header_value(msg.payload.as_ref(), "To"),
            subject: header_value(msg.payload.as_ref(), "Subject"),
            body: extract_body(msg.payload.as_ref()),
            date: header_value(msg.payload.as_ref(), "Date"),
            unread: msg.has_label(LABEL_UNREAD),
            important: msg.has_label(LABEL_IMPORTANT),
            starred: msg.has_label(LABEL_STARRED),
        }
    }
}

/// Look up a header by case-insensitive name; absent headers yield "".
pub fn header_value(payload: Option<&MessagePayload>, name: &str) -> String {
    payload
        .and_then(|p| p.headers.as_ref())
        .and_then(|headers| {
            headers
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(name))
                .map(|h| h.value.clone())
        })
        .unwrap_or_default()
}

/// Extract the plain-text body of a message.
///
/// Preference order: the top-level payload body if it carries data, then
/// the first first-level part whose MIME type is exactly `text/plain`.
/// Messages with neither yield [`CONTENT_UNAVAILABLE`]; undecodable data
/// yields [`CONTENT_UNREADABLE`].
pub fn extract_body(payload: Option<&MessagePayload>) -> String {
    let Some(payload) = payload else {
        return CONTENT_UNAVAILABLE.to_owned();
    };

    if let Some(data) = payload.body.as_ref().and_then(|b| b.data.as_deref()) {
        return decode_body_data(data);
    }

    if let Some(parts) = payload.parts.as_ref() {
        for part in parts {
            if part.mime_type.as_deref() == Some("text/plain")
                && let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref())
            {
                return decode_body_data(data);
            }
        }
    }

    CONTENT_UNAVAILABLE.to_owned()
}

/// Decode base64url body data, tolerating both padded and unpadded input.
fn decode_body_data(data: &str) -> String {
    let decoded = URL_SAFE_NO_PAD
        .decode(data)
        .or_else(|_| URL_SAFE.decode(data));

    match decoded {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => CONTENT_UNREADABLE.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Header, MessageBody, MessagePart};

    fn payload_with_headers(headers: Vec<(&str, &str)>) -> MessagePayload {
        MessagePayload {
            headers: Some(
                headers
                    .into_iter()
                    .map(|(n, v)| Header {
                        name: n.to_owned(),
                        value: v.to_owned(),
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    fn part(mime_type: &str, data: Option<&str>) -> MessagePart {
        MessagePart {
            mime_type: Some(mime_type.to_owned()),
            body: Some(MessageBody {
                size: None,
                data: data.map(str::to_owned),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let payload = payload_with_headers(vec![("FROM", "a@b.c"), ("Subject", "Hi")]);
        assert_eq!(header_value(Some(&payload), "from"), "a@b.c");
        assert_eq!(header_value(Some(&payload), "SUBJECT"), "Hi");
    }

    #[test]
    fn absent_header_yields_empty_string() {
        let payload = payload_with_headers(vec![("From", "a@b.c")]);
        assert_eq!(header_value(Some(&payload), "Date"), "");
        assert_eq!(header_value(None, "From"), "");
    }

    #[test]
    fn sender_parses_display_name_and_address() {
        let s = Sender::parse("Maria Silva <maria@example.com>");
        assert_eq!(s.display_name, "Maria Silva");
        assert_eq!(s.address, "maria@example.com");
        assert_eq!(s.to_string(), "Maria Silva <maria@example.com>");

        let bare = Sender::parse("bob@example.com");
        assert_eq!(bare.display_name, "");
        assert_eq!(bare.to_string(), "bob@example.com");

        let quoted = Sender::parse("\"Silva, Maria\" <maria@example.com>");
        assert_eq!(quoted.display_name, "Silva, Maria");
    }

    #[test]
    fn body_prefers_top_level_payload_data() {
        // "top level" / "from part", base64url
        let payload = MessagePayload {
            body: Some(MessageBody {
                size: None,
                data: Some("dG9wIGxldmVs".into()),
            }),
            parts: Some(vec![part("text/plain", Some("ZnJvbSBwYXJ0"))]),
            ..Default::default()
        };
        assert_eq!(extract_body(Some(&payload)), "top level");
    }

    #[test]
    fn body_falls_back_to_first_text_plain_part() {
        let payload = MessagePayload {
            parts: Some(vec![
                part("text/html", Some("PGI-aHRtbDwvYj4")),
                part("text/plain", Some("cGxhaW4gdGV4dA")),
                part("text/plain", Some("c2Vjb25k")),
            ]),
            ..Default::default()
        };
        assert_eq!(extract_body(Some(&payload)), "plain text");
    }

    #[test]
    fn body_without_text_plain_part_is_unavailable() {
        let payload = MessagePayload {
            parts: Some(vec![part("text/html", Some("PGI-aHRtbDwvYj4"))]),
            ..Default::default()
        };
        assert_eq!(extract_body(Some(&payload)), CONTENT_UNAVAILABLE);
        assert_eq!(extract_body(None), CONTENT_UNAVAILABLE);
    }

    #[test]
    fn undecodable_body_data_is_marked_unreadable() {
        let payload = MessagePayload {
            body: Some(MessageBody {
                size: None,
                data: Some("not!valid|base64%".into()),
            }),
            ..Default::default()
        };
        assert_eq!(extract_body(Some(&payload)), CONTENT_UNREADABLE);
    }

    #[test]
    fn padded_base64url_decodes_too() {
        let payload = MessagePayload {
            body: Some(MessageBody {
                size: None,
                data: Some("aGVsbG8=".into()),
            }),
            ..Default::default()
        };
        assert_eq!(extract_body(Some(&payload)), "hello");
    }

    #[test]
    fn flags_come_from_label_ids() {
        let msg: GmailMessage = serde_json::from_str(
            r#"{"id": "m1", "labelIds": ["INBOX", "UNREAD", "STARRED"], "payload": {
                "headers": [
                    {"name": "From", "value": "Ana <ana@example.com>"},
                    {"name": "Subject", "value": "Lunch"},
                    {"name": "Date", "value": "Mon, 3 Aug 2026 10:00:00 -0300"}
                ]
            }}"#,
        )
        .unwrap();

        let mail = MailMessage::from(&msg);
        assert!(mail.unread);
        assert!(mail.starred);
        assert!(!mail.important);
        assert_eq!(mail.sender.address, "ana@example.com");
        assert_eq!(mail.date, "Mon, 3 Aug 2026 10:00:00 -0300");
        assert_eq!(mail.body, CONTENT_UNAVAILABLE);
    }
}
