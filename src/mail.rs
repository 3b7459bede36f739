use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// A fully composed message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport rejected message: {0}")]
    Rejected(String),

    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

/// Outbound mail transport. Sending is awaited in-line and failures are
/// returned to the caller, never swallowed.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Transport that writes every message to the log instead of delivering it.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if mail.to.is_empty() {
            return Err(MailError::Rejected("no recipients".into()));
        }
        tracing::info!(
            to = ?mail.to,
            from = %mail.from,
            subject = %mail.subject,
            "sending mail"
        );
        tracing::debug!(body = %mail.body, "mail body");
        Ok(())
    }
}
