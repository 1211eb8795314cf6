use async_session::async_trait;
use tracing::debug;

use super::{SmsError, SmsSender, validate_message, validate_recipient};
use crate::config::TwilioConfig;

const PROVIDER_ERROR_PREFIX: &str = "sms delivery failed";

/// Twilio-backed delivery through the Messages endpoint.
#[derive(Debug, Clone)]
pub struct TwilioSender {
    account_sid: String,
    auth_token: String,
    from_number: String,
    http: reqwest::Client,
}

impl TwilioSender {
    /// Credentials are checked here so a misconfigured deployment dies at
    /// startup rather than on the first login attempt.
    pub fn new(config: &TwilioConfig) -> anyhow::Result<Self> {
        if config.account_sid.is_empty() || config.auth_token.is_empty() {
            anyhow::bail!("Twilio credentials are not configured");
        }
        validate_recipient(&config.from_number)
            .map_err(|_| anyhow::anyhow!("TWILIO_FROM_NUMBER is not a usable phone number"))?;

        Ok(Self {
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
            http: reqwest::Client::new(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioSender {
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), SmsError> {
        validate_recipient(to)?;
        validate_message(message)?;

        let form = [("To", to), ("From", &self.from_number), ("Body", message)];
        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| SmsError::Provider(format!("{PROVIDER_ERROR_PREFIX}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Provider(format!(
                "{PROVIDER_ERROR_PREFIX}: {status} {body}"
            )));
        }

        debug!("sent sms to {to}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> TwilioSender {
        TwilioSender::new(&TwilioConfig {
            account_sid: "AC0123456789".into(),
            auth_token: "secret".into(),
            from_number: "+15555550100".into(),
        })
        .unwrap()
    }

    #[test]
    fn construction_fails_without_credentials() {
        let missing = TwilioConfig {
            account_sid: String::new(),
            auth_token: "secret".into(),
            from_number: "+15555550100".into(),
        };
        assert!(TwilioSender::new(&missing).is_err());

        let bad_from = TwilioConfig {
            account_sid: "AC0123456789".into(),
            auth_token: "secret".into(),
            from_number: "office".into(),
        };
        assert!(TwilioSender::new(&bad_from).is_err());
    }

    // Both precondition failures reject before the provider is contacted;
    // no request leaves the process.
    #[tokio::test]
    async fn bad_recipient_rejects_without_io() {
        let err = sender().send_sms("not-a-number", "hi").await.unwrap_err();
        assert!(matches!(err, SmsError::InvalidRecipient(_)));
    }

    #[tokio::test]
    async fn empty_message_rejects_without_io() {
        let err = sender().send_sms("+15555551212", "  ").await.unwrap_err();
        assert!(matches!(err, SmsError::EmptyMessage));
    }
}
