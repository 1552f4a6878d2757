//! Outgoing message construction.
//!
//! The send endpoint takes a full RFC 2822 message, base64url-encoded.
//! Only plain-text single-part messages are produced here.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

/// Build a plain-text RFC 2822 message.  `From: me` lets the provider
/// substitute the authenticated account's address.
pub fn build_text_message(to: &str, subject: &str, body: &str) -> String {
    format!(
        "From: me\r\n\
         To: {to}\r\n\
         Subject: {subject}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: text/plain; charset=UTF-8\r\n\
         \r\n\
         {body}"
    )
}

/// Encode a message for the send endpoint's `raw` field.
pub fn encode_raw(message: &str) -> String {
    URL_SAFE.encode(message.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_all_headers_and_body() {
        let msg = build_text_message("ana@example.com", "Lunch", "Tomorrow at noon?");

        assert!(msg.starts_with("From: me\r\n"));
        assert!(msg.contains("To: ana@example.com\r\n"));
        assert!(msg.contains("Subject: Lunch\r\n"));
        assert!(msg.contains("Content-Type: text/plain; charset=UTF-8\r\n"));
        assert!(msg.ends_with("\r\n\r\nTomorrow at noon?"));
    }

    #[test]
    fn raw_encoding_is_urlsafe_base64() {
        let encoded = encode_raw("hello?>");
        // '?' and '>' force characters outside the standard alphabet
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));

        let decoded = URL_SAFE.decode(&encoded).unwrap();
        assert_eq!(decoded, b"hello?>");
    }
}
