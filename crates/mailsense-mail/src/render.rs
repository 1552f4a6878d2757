//! Presentation of structured mail results as assistant-facing text.
//!
//! The toolbox returns typed values; this module is the only place that
//! turns them into the prose the LLM sees.  Keeping the formatting here
//! keeps the operations themselves testable as data.

use crate::error::MailError;
use crate::message::MailMessage;

/// Text for an inbox listing with no messages.
pub const EMPTY_INBOX: &str = "Inbox is empty.";

/// Text for an unread listing with no messages.
pub const NO_UNREAD: &str = "No unread emails.";

/// Text for a search with no matches.
pub fn no_matches(query: &str) -> String {
    format!("No emails found for: {query}")
}

/// Render an inbox listing, marking unread messages.
pub fn inbox_listing(messages: &[MailMessage]) -> String {
    if messages.is_empty() {
        return EMPTY_INBOX.to_owned();
    }

    let mut out = format!("Total: {} emails\n\n", messages.len());
    for (i, msg) in messages.iter().enumerate() {
        message_block(&mut out, i + 1, msg, msg.unread);
    }
    out
}

/// Render an unread-only listing.
pub fn unread_listing(messages: &[MailMessage]) -> String {
    if messages.is_empty() {
        return NO_UNREAD.to_owned();
    }

    let mut out = format!("Unread emails: {}\n\n", messages.len());
    for (i, msg) in messages.iter().enumerate() {
        message_block(&mut out, i + 1, msg, true);
    }
    out
}

/// Render a search result listing.
pub fn search_listing(query: &str, messages: &[MailMessage]) -> String {
    if messages.is_empty() {
        return no_matches(query);
    }

    let mut out = format!("Found {} emails for '{}':\n\n", messages.len(), query);
    for (i, msg) in messages.iter().enumerate() {
        message_block(&mut out, i + 1, msg, false);
    }
    out
}

/// Render the full content of one message.
pub fn email_detail(msg: &MailMessage) -> String {
    format!(
        "Email ID: {}\n\n\
         From: {}\n\
         To: {}\n\
         Subject: {}\n\
         Date: {}\n\n\
         Content:\n\
         ---------------------------------\n\
         {}\n\
         ---------------------------------\n",
        msg.id,
        msg.sender,
        msg.to,
        subject_or_placeholder(&msg.subject),
        msg.date,
        msg.body,
    )
}

/// Render a successful send confirmation.
pub fn send_receipt(id: &str, to: &str, subject: &str, body: &str) -> String {
    format!(
        "EMAIL SENT\n\n\
         To: {to}\n\
         Subject: {subject}\n\
         Message ID: {id}\n\n\
         Content:\n{body}"
    )
}

/// Confirmation for a read-state change.
pub fn marked_read(id: &str) -> String {
    format!("Email {id} marked as read.")
}

/// Confirmation for an unread-state change.
pub fn marked_unread(id: &str) -> String {
    format!("Email {id} marked as unread.")
}

/// Confirmation for a permanent delete.
pub fn deleted(id: &str) -> String {
    format!("Email {id} permanently deleted.")
}

/// Confirmation for a move to trash.
pub fn trashed(id: &str) -> String {
    format!("Email {id} moved to trash.")
}

/// Render an adapter error in its user-facing category text.
pub fn error_text(err: &MailError) -> String {
    match err {
        MailError::Auth { .. } => {
            "Authentication failed: check the configured refresh token.".to_owned()
        }
        MailError::NotFound { .. } => "Email not found.".to_owned(),
        MailError::Permission { .. } => "Access denied: insufficient permissions.".to_owned(),
        other => format!("Error: {other}"),
    }
}

/// One listing block: index, optional unread marker, sender, subject,
/// date, and id.
fn message_block(out: &mut String, index: usize, msg: &MailMessage, unread: bool) {
    let marker = if unread { " [UNREAD]" } else { "" };
    out.push_str(&format!(
        "#{index}{marker}\n   From: {}\n   Subject: {}\n   Date: {}\n   ID: {}\n\n",
        msg.sender,
        subject_or_placeholder(&msg.subject),
        msg.date,
        msg.id,
    ));
}

fn subject_or_placeholder(subject: &str) -> &str {
    if subject.is_empty() {
        "(no subject)"
    } else {
        subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    fn sample(id: &str, unread: bool) -> MailMessage {
        MailMessage {
            id: id.to_owned(),
            sender: Sender::parse("Ana <ana@example.com>"),
            to: "me@example.com".to_owned(),
            subject: "Quarterly report".to_owned(),
            body: "Numbers attached.".to_owned(),
            date: "Mon, 3 Aug 2026 10:00:00 -0300".to_owned(),
            unread,
            important: false,
            starred: false,
        }
    }

    #[test]
    fn empty_listings_use_the_markers() {
        assert_eq!(inbox_listing(&[]), EMPTY_INBOX);
        assert_eq!(unread_listing(&[]), NO_UNREAD);
        assert_eq!(search_listing("invoice", &[]), "No emails found for: invoice");
    }

    #[test]
    fn inbox_listing_reports_count_and_blocks() {
        let messages = vec![sample("m1", true), sample("m2", false)];
        let text = inbox_listing(&messages);

        assert!(text.starts_with("Total: 2 emails\n"));
        assert!(text.contains("#1 [UNREAD]\n"));
        assert!(text.contains("#2\n"));
        assert!(text.contains("From: Ana <ana@example.com>"));
        assert!(text.contains("Subject: Quarterly report"));
        assert!(text.contains("Date: Mon, 3 Aug 2026 10:00:00 -0300"));
        assert!(text.contains("ID: m1"));
        assert!(text.contains("ID: m2"));
    }

    #[test]
    fn empty_subject_gets_a_placeholder() {
        let mut msg = sample("m1", false);
        msg.subject.clear();
        let text = inbox_listing(&[msg]);
        assert!(text.contains("Subject: (no subject)"));
    }

    #[test]
    fn detail_includes_headers_and_body() {
        let text = email_detail(&sample("m9", false));
        assert!(text.starts_with("Email ID: m9\n"));
        assert!(text.contains("To: me@example.com"));
        assert!(text.contains("Content:\n"));
        assert!(text.contains("Numbers attached."));
    }

    #[test]
    fn error_categories_render_their_texts() {
        let auth = MailError::Auth {
            reason: "bad token".into(),
        };
        assert_eq!(
            error_text(&auth),
            "Authentication failed: check the configured refresh token."
        );

        let not_found = MailError::NotFound {
            reason: "gone".into(),
        };
        assert_eq!(error_text(&not_found), "Email not found.");

        let forbidden = MailError::Permission {
            reason: "scope".into(),
        };
        assert_eq!(error_text(&forbidden), "Access denied: insufficient permissions.");

        let other = MailError::Provider {
            status: 500,
            message: "backend".into(),
        };
        assert!(error_text(&other).starts_with("Error: "));
    }
}
