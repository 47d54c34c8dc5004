//! Outbound notifications (email / SMS)
//!
//! Delivery is best-effort: callers turn a failed send into a warning on
//! their response and never roll back the business write that preceded it.

use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// A message to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Email {
        to: String,
        subject: String,
        body: String,
    },
    Sms {
        to: String,
        body: String,
    },
}

impl Notification {
    pub fn email(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Email {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn sms(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Sms {
            to: to.into(),
            body: body.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Self::Email { to, .. } | Self::Sms { to, .. } => to,
        }
    }

    fn channel(&self) -> &'static str {
        match self {
            Self::Email { .. } => "email",
            Self::Sms { .. } => "sms",
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("{0} delivery is not configured")]
    NotConfigured(&'static str),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

pub type SharedNotifier = Arc<dyn Notifier>;

// ========== AWS SES ==========

/// Email through AWS SES v2
pub struct SesNotifier {
    client: SesClient,
    from: String,
}

impl SesNotifier {
    pub fn new(client: SesClient, from: impl Into<String>) -> Self {
        Self {
            client,
            from: from.into(),
        }
    }

    /// Client from the default AWS credential chain, optionally pinned to a region
    pub async fn connect(from: impl Into<String>, region: Option<String>) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = if let Some(region) = region {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };
        Self::new(client, from)
    }
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let Notification::Email { to, subject, body } = notification else {
            return Err(NotifyError::NotConfigured("sms"));
        };

        let subject = Content::builder()
            .data(subject)
            .build()
            .map_err(|e| NotifyError::InvalidMessage(e.to_string()))?;
        let body = Body::builder()
            .text(
                Content::builder()
                    .data(body)
                    .build()
                    .map_err(|e| NotifyError::InvalidMessage(e.to_string()))?,
            )
            .build();
        let message = Message::builder().subject(subject).body(body).build();

        self.client
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        tracing::info!(to = %to, "Email sent");
        Ok(())
    }
}

// ========== SMS gateway ==========

/// SMS through an HTTP gateway accepting a form POST
pub struct SmsGateway {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl SmsGateway {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Notifier for SmsGateway {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let Notification::Sms { to, body } = notification else {
            return Err(NotifyError::NotConfigured("email"));
        };

        let mut form = vec![("to", to.as_str()), ("message", body.as_str())];
        if let Some(key) = &self.api_key {
            form.push(("api_key", key.as_str()));
        }

        let resp = self
            .http
            .post(&self.url)
            .form(&form)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Delivery(format!(
                "SMS gateway returned {}",
                resp.status()
            )));
        }
        tracing::info!(to = %to, "SMS sent");
        Ok(())
    }
}

// ========== Log only ==========

/// Logs instead of delivering and keeps an outbox for inspection
#[derive(Default)]
pub struct LogNotifier {
    outbox: Mutex<Vec<Notification>>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything "sent" so far
    pub fn sent(&self) -> Vec<Notification> {
        self.outbox.lock().clone()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            channel = notification.channel(),
            to = %notification.recipient(),
            "Notification delivered (simulated)"
        );
        self.outbox.lock().push(notification.clone());
        Ok(())
    }
}

// ========== Routing ==========

/// Routes email and SMS to separate backends
pub struct CompositeNotifier {
    email: Option<SharedNotifier>,
    sms: Option<SharedNotifier>,
}

impl CompositeNotifier {
    pub fn new(email: Option<SharedNotifier>, sms: Option<SharedNotifier>) -> Self {
        Self { email, sms }
    }
}

#[async_trait]
impl Notifier for CompositeNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let backend = match notification {
            Notification::Email { .. } => self.email.as_ref(),
            Notification::Sms { .. } => self.sms.as_ref(),
        };
        match backend {
            Some(backend) => backend.send(notification).await,
            None => Err(NotifyError::NotConfigured(notification.channel())),
        }
    }
}

/// Send and turn a failure into a warning line
pub async fn deliver(notifier: &dyn Notifier, notification: &Notification) -> Option<String> {
    match notifier.send(notification).await {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(
                channel = notification.channel(),
                to = %notification.recipient(),
                error = %e,
                "Notification delivery failed"
            );
            Some(format!(
                "Could not send {} to {}: {}",
                notification.channel(),
                notification.recipient(),
                e
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_records_outbox() {
        let log = LogNotifier::new();
        log.send(&Notification::email("a@example.com", "Hi", "Body"))
            .await
            .unwrap();
        assert_eq!(log.sent().len(), 1);
        assert_eq!(log.sent()[0].recipient(), "a@example.com");
    }

    #[tokio::test]
    async fn test_composite_routes_by_channel() {
        let email = Arc::new(LogNotifier::new());
        let composite = CompositeNotifier::new(Some(email.clone()), None);

        composite
            .send(&Notification::email("a@example.com", "Hi", "Body"))
            .await
            .unwrap();
        assert_eq!(email.sent().len(), 1);

        let err = composite
            .send(&Notification::sms("+34600000000", "Hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::NotConfigured("sms")));
    }

    #[tokio::test]
    async fn test_deliver_turns_failure_into_warning() {
        let composite = CompositeNotifier::new(None, None);
        let warning = deliver(&composite, &Notification::email("a@example.com", "Hi", "Body")).await;
        assert!(warning.unwrap().contains("a@example.com"));

        let log = LogNotifier::new();
        assert!(deliver(&log, &Notification::sms("+1", "Hi")).await.is_none());
    }
}
