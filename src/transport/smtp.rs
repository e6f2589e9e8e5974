use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailTransport, SendMethod};
use crate::error::TransportError;

// SMTP submission settings
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

// Amazon SES, reached through its regional SMTP interface
#[derive(Clone, Debug)]
pub struct SesConfig {
    pub region: String,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

impl SesConfig {
    pub fn endpoint(&self) -> String {
        format!("email-smtp.{}.amazonaws.com", self.region)
    }
}

// STARTTLS submission through an authenticated relay.
pub struct SmtpMailer {
    method: SendMethod,
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        Self::relay(SendMethod::Smtp, config)
    }

    fn relay(method: SendMethod, config: &SmtpConfig) -> Result<Self, TransportError> {
        let from: Mailbox = config.from_address.parse()?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        // connections are opened lazily, on the first send
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            method,
            from,
            transport,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    fn method(&self) -> SendMethod {
        self.method
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())?;

        let response = self.transport.send(message).await?;

        tracing::info!(
            method = self.method.label(),
            code = %response.code(),
            "smtp relay accepted message"
        );
        Ok(())
    }
}

pub struct SesMailer {
    inner: SmtpMailer,
}

impl SesMailer {
    const SUBMISSION_PORT: u16 = 587;

    pub fn new(config: &SesConfig) -> Result<Self, TransportError> {
        let smtp = SmtpConfig {
            host: config.endpoint(),
            port: Self::SUBMISSION_PORT,
            username: config.username.clone(),
            password: config.password.clone(),
            from_address: config.from_address.clone(),
        };

        Ok(Self {
            inner: SmtpMailer::relay(SendMethod::Ses, &smtp)?,
        })
    }
}

#[async_trait]
impl MailTransport for SesMailer {
    fn method(&self) -> SendMethod {
        SendMethod::Ses
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        self.inner.send(to, subject, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "user".into(),
            password: "secret".into(),
            from_address: "Mailer <noreply@example.com>".into(),
        }
    }

    #[test]
    fn ses_endpoint_follows_region() {
        let config = SesConfig {
            region: "eu-west-1".into(),
            username: "AKIA".into(),
            password: "secret".into(),
            from_address: "noreply@example.com".into(),
        };

        assert_eq!(config.endpoint(), "email-smtp.eu-west-1.amazonaws.com");
    }

    #[tokio::test]
    async fn rejects_bad_sender_address() {
        let mut config = smtp_config();
        config.from_address = "not an address".into();

        let result = SmtpMailer::new(&config);
        assert!(matches!(result, Err(TransportError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn rejects_bad_recipient_before_connecting() {
        let mailer = SmtpMailer::new(&smtp_config()).unwrap();

        let err = mailer.send("nope", "subject", "body").await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress(_)));
        assert_eq!(mailer.method(), SendMethod::Smtp);
    }
}
