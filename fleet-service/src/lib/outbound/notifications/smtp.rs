use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::Message;
use lettre::SmtpTransport;
use lettre::Transport;

use crate::config::MailConfig;
use crate::domain::auth::errors::NotifyError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::ports::ResetNotifier;

/// SMTP-backed delivery channel for password-reset links.
#[derive(Clone)]
pub struct SmtpResetNotifier {
    mailer: SmtpTransport,
    sender: String,
    reset_base_url: String,
}

impl SmtpResetNotifier {
    /// Build a notifier from mail configuration.
    ///
    /// # Errors
    /// Returns an error when the SMTP relay host cannot be resolved or the
    /// sender address does not parse.
    pub fn new(config: &MailConfig) -> Result<Self, anyhow::Error> {
        let credentials = Credentials::new(config.smtp_user.clone(), config.smtp_password.clone());

        let mailer = SmtpTransport::relay(&config.smtp_host)
            .context("failed to configure SMTP relay")?
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            sender: config.sender.clone(),
            reset_base_url: config.reset_base_url.clone(),
        })
    }
}

#[async_trait]
impl ResetNotifier for SmtpResetNotifier {
    async fn send_reset_link(
        &self,
        recipient: &EmailAddress,
        token: &str,
    ) -> Result<(), NotifyError> {
        let reset_link = format!("{}?token={}", self.reset_base_url, token);

        let message = Message::builder()
            .from(
                self.sender
                    .parse()
                    .map_err(|e| NotifyError::SendFailed(format!("invalid sender: {e}")))?,
            )
            .to(recipient
                .as_str()
                .parse()
                .map_err(|e| NotifyError::SendFailed(format!("invalid recipient: {e}")))?)
            .subject("Password reset request")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "A password reset was requested for your account.\n\n\
                 Open the link below to choose a new password. The link is \
                 valid for a limited time and can be used once.\n\n{reset_link}\n\n\
                 If you did not request this, you can ignore this message.",
            ))
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        // The sync transport blocks on the SMTP round trip.
        let mailer = self.mailer.clone();
        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        Ok(())
    }
}
