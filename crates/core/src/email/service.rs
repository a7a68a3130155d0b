//! Email transport.
//!
//! The [`EmailSender`] trait hides the transport so the reset flow can run
//! against a mock in tests and against SMTP in production. Messages always
//! carry both an HTML and a plain-text body.

use async_trait::async_trait;
use folio_types::error::{Error, Result};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};

use crate::mailer::OutboundEmail;

/// Delivers outbound messages
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn deliver(&self, email: &OutboundEmail) -> Result<()>;
}

/// Facade over the configured sender
pub struct EmailService {
    sender: Box<dyn EmailSender>,
}

impl EmailService {
    pub fn new(sender: Box<dyn EmailSender>) -> Self {
        Self { sender }
    }

    /// Deliver one message through the configured sender
    pub async fn send(&self, email: &OutboundEmail) -> Result<()> {
        self.sender.deliver(email).await
    }
}

/// SMTP delivery over `lettre`
pub struct SmtpEmailService {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    /// Build the transport and parse the sender mailbox
    ///
    /// With `insecure` the connection skips TLS entirely, for talking to a
    /// local development relay. Credentials must be given either both or
    /// not at all.
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        from_address: String,
        from_name: String,
        insecure: bool,
    ) -> Result<Self> {
        if username.is_empty() != password.is_empty() {
            return Err(Error::validation(
                "SMTP username and password must be set together",
            ));
        }

        let transport = if insecure {
            tracing::warn!(%host, port, "SMTP transport is unencrypted");
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port).build()
        } else {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| Error::internal(format!("Failed to create SMTP transport: {e}")))?
                .port(port);
            if !username.is_empty() {
                builder =
                    builder.credentials(Credentials::new(username.to_owned(), password.to_owned()));
            }
            builder.build()
        };

        let from = format!("{from_name} <{from_address}>")
            .parse()
            .map_err(|e| Error::config(format!("Invalid sender address: {e}")))?;

        Ok(Self { from, transport })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailService {
    async fn deliver(&self, email: &OutboundEmail) -> Result<()> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| Error::validation(format!("Invalid recipient address: {e}")))?;

        // Plain part first; RFC 2046 wants the preferred alternative last
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .multipart(MultiPart::alternative_plain_html(
                email.body_text.clone(),
                email.body_html.clone(),
            ))
            .map_err(|e| Error::internal(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::external(format!("SMTP delivery failed: {e}")))?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email delivered");
        Ok(())
    }
}

/// Test sender: records messages instead of delivering them
#[derive(Default)]
pub struct MockEmailSender {
    fail: bool,
    sent: std::sync::Mutex<Vec<OutboundEmail>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails
    pub fn new_failing() -> Self {
        Self { fail: true, sent: std::sync::Mutex::new(Vec::new()) }
    }

    /// Messages recorded so far
    pub fn sent(&self) -> Vec<OutboundEmail> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn deliver(&self, email: &OutboundEmail) -> Result<()> {
        if self.fail {
            return Err(Error::external("mock delivery failure"));
        }
        if let Ok(mut guard) = self.sent.lock() {
            guard.push(email.clone());
        }
        tracing::debug!(to = %email.to, subject = %email.subject, "Email recorded, not sent");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample() -> OutboundEmail {
        OutboundEmail {
            to: "ada@example.com".into(),
            subject: "Hello".into(),
            body_html: "<p>Hi</p>".into(),
            body_text: "Hi".into(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_deliveries() {
        let mock = MockEmailSender::new();
        mock.deliver(&sample()).await.unwrap();
        mock.deliver(&sample()).await.unwrap();

        let sent = mock.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "ada@example.com");
    }

    #[tokio::test]
    async fn test_failing_mock_records_nothing() {
        let mock = MockEmailSender::new_failing();
        assert!(mock.deliver(&sample()).await.is_err());
        assert!(mock.sent().is_empty());
    }

    #[test]
    fn test_mismatched_credentials_are_rejected() {
        let result = SmtpEmailService::new(
            "smtp.example.com",
            587,
            "user",
            "",
            "noreply@example.com".into(),
            "Folio".into(),
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_sender_address_fails_at_construction() {
        let result = SmtpEmailService::new(
            "smtp.example.com",
            587,
            "",
            "",
            "not an address".into(),
            "Folio".into(),
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_plain_part_precedes_html() {
        let message = Message::builder()
            .from("noreply@example.com".parse::<Mailbox>().unwrap())
            .to("ada@example.com".parse::<Mailbox>().unwrap())
            .subject("Hello")
            .multipart(MultiPart::alternative_plain_html(
                "plain".to_string(),
                "<p>html</p>".to_string(),
            ))
            .unwrap();

        let rendered = String::from_utf8(message.formatted()).unwrap();
        let plain = rendered.find("Content-Type: text/plain").unwrap();
        let html = rendered.find("Content-Type: text/html").unwrap();
        assert!(plain < html);
    }
}
