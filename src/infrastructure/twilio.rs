// SMS delivery via the Twilio REST API
use crate::application::notifier::Notifier;
use crate::infrastructure::config::TwilioSettings;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("twilio request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("twilio rejected message with status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub struct TwilioNotifier {
    client: reqwest::Client,
    settings: TwilioSettings,
}

impl TwilioNotifier {
    pub fn new(settings: TwilioSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    async fn post_message(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.settings.account_sid
        );
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(&[
                ("From", self.settings.from_number.as_str()),
                ("To", to),
                ("Body", body),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(&self, to: &str, message: &str) -> anyhow::Result<()> {
        tracing::debug!("sending alert to {to}");
        self.post_message(to, message).await?;
        Ok(())
    }
}

/// Stand-in used when no Twilio credentials are configured. Alerts are
/// logged and dropped.
pub struct LogOnlyNotifier;

#[async_trait]
impl Notifier for LogOnlyNotifier {
    async fn send(&self, to: &str, message: &str) -> anyhow::Result<()> {
        tracing::warn!("sms delivery unconfigured; dropping alert to {to}: {message}");
        Ok(())
    }
}
