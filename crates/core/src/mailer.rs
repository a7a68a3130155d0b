//! Background email delivery.
//!
//! Handlers enqueue messages onto an unbounded channel and return without
//! waiting on SMTP. A single spawned task drains the channel; delivery
//! failures are logged and never surface to the request that queued them.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::email::EmailService;

/// A queued outbound message
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body_html: String,
    pub body_text: String,
}

/// Handle for enqueueing outbound email
#[derive(Clone)]
pub struct Mailer {
    tx: mpsc::UnboundedSender<OutboundEmail>,
}

impl Mailer {
    /// Spawn the delivery task and return a handle to it
    pub fn spawn(service: Arc<EmailService>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<OutboundEmail>();

        tokio::spawn(async move {
            while let Some(email) = rx.recv().await {
                if let Err(e) = service.send(&email).await {
                    tracing::error!(
                        to = %email.to,
                        subject = %email.subject,
                        error = %e,
                        "Failed to deliver queued email"
                    );
                }
            }
            tracing::debug!("Mailer channel closed, delivery task exiting");
        });

        Self { tx }
    }

    /// Queue a message for delivery
    ///
    /// Send errors only occur after the delivery task has exited, which
    /// happens at shutdown; the message is dropped with a log line.
    pub fn enqueue(&self, email: OutboundEmail) {
        if let Err(e) = self.tx.send(email) {
            tracing::warn!(error = %e, "Dropping email: delivery task is not running");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::email::MockEmailSender;

    use super::*;

    #[tokio::test]
    async fn test_enqueue_delivers_in_background() {
        let service = Arc::new(EmailService::new(Box::new(MockEmailSender::new())));
        let mailer = Mailer::spawn(service);

        mailer.enqueue(OutboundEmail {
            to: "user@example.com".into(),
            subject: "Hello".into(),
            body_html: "<p>Hi</p>".into(),
            body_text: "Hi".into(),
        });

        // Give the delivery task a chance to drain the queue
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_propagate() {
        let service = Arc::new(EmailService::new(Box::new(MockEmailSender::new_failing())));
        let mailer = Mailer::spawn(service);

        // Enqueue must not fail even though delivery will
        mailer.enqueue(OutboundEmail {
            to: "user@example.com".into(),
            subject: "Hello".into(),
            body_html: "<p>Hi</p>".into(),
            body_text: "Hi".into(),
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}
