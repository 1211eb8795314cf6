use std::sync::LazyLock;

use async_session::async_trait;
use regex::Regex;
use thiserror::Error;

pub mod twilio;

pub use twilio::TwilioSender;

/// Permissive E.164-ish shape: optional leading `+`, digits first and last,
/// in between digits may be broken up by spaces, dashes, dots or parentheses.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 .\-()]*[0-9]$").expect("phone pattern is valid"));

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("invalid recipient phone number: {0}")]
    InvalidRecipient(String),

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("{0}")]
    Provider(String),
}

/// Outbound text-message delivery.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), SmsError>;
}

/// Checks the recipient before anything touches the network: the pattern
/// above plus 2-15 digits overall.
pub fn validate_recipient(to: &str) -> Result<(), SmsError> {
    let digits = to.chars().filter(|c| c.is_ascii_digit()).count();
    if !PHONE_RE.is_match(to) || !(2..=15).contains(&digits) {
        return Err(SmsError::InvalidRecipient(to.to_string()));
    }
    Ok(())
}

pub fn validate_message(message: &str) -> Result<(), SmsError> {
    if message.trim().is_empty() {
        return Err(SmsError::EmptyMessage);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_formatted_numbers() {
        assert!(validate_recipient("+15555551212").is_ok());
        assert!(validate_recipient("15555551212").is_ok());
        assert!(validate_recipient("+1 (555) 555-1212").is_ok());
        assert!(validate_recipient("07").is_ok());
    }

    #[test]
    fn rejects_garbage_recipients() {
        assert!(matches!(
            validate_recipient("not-a-number"),
            Err(SmsError::InvalidRecipient(_))
        ));
        assert!(validate_recipient("").is_err());
        assert!(validate_recipient("+").is_err());
        // too many digits
        assert!(validate_recipient("1234567890123456").is_err());
        // too few
        assert!(validate_recipient("1").is_err());
        // digits must come first
        assert!(validate_recipient("(555) 555-1212x").is_err());
    }

    #[test]
    fn rejects_blank_messages() {
        assert!(matches!(validate_message(""), Err(SmsError::EmptyMessage)));
        assert!(matches!(validate_message("   "), Err(SmsError::EmptyMessage)));
        assert!(validate_message("your code is 123456").is_ok());
    }
}
