mod sendgrid;
mod smtp;

pub use sendgrid::{DEFAULT_BASE_URL as DEFAULT_SENDGRID_URL, SendGridConfig, SendGridMailer};
pub use smtp::{SesConfig, SesMailer, SmtpConfig, SmtpMailer};

use async_trait::async_trait;

use crate::error::TransportError;

// The three outbound routes an email can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMethod {
    Smtp,
    SendGrid,
    Ses,
}

impl SendMethod {
    // Label used in response bodies, logs and metrics
    pub fn label(self) -> &'static str {
        match self {
            SendMethod::Smtp => "SMTP",
            SendMethod::SendGrid => "SendGrid",
            SendMethod::Ses => "Amazon SES",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            SendMethod::Smtp => "Email sent successfully via SMTP (Java Mailer)!",
            SendMethod::SendGrid => "Email sent successfully via SendGrid!",
            SendMethod::Ses => "Email sent successfully via Amazon SES!",
        }
    }
}

// A single-shot mail sender. Implementations never retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    fn method(&self) -> SendMethod;

    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError>;
}

// Stand-in for a transport whose credentials were not supplied
pub struct Unconfigured(pub SendMethod);

#[async_trait]
impl MailTransport for Unconfigured {
    fn method(&self) -> SendMethod {
        self.0
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), TransportError> {
        Err(TransportError::NotConfigured(self.0.label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_transport_always_fails() {
        let transport = Unconfigured(SendMethod::Ses);

        let err = transport
            .send("someone@example.com", "hi", "there")
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::NotConfigured("Amazon SES")));
        assert_eq!(transport.method(), SendMethod::Ses);
        assert!(!transport.is_configured());
    }
}
