use async_trait::async_trait;
use serde::Serialize;

use super::{MailTransport, SendMethod};
use crate::error::TransportError;

pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

#[derive(Clone, Debug)]
pub struct SendGridConfig {
    pub api_key: String,
    pub from_address: String,
    pub base_url: String,
}

// v3 mail/send request body
#[derive(Serialize)]
struct MailSend<'a> {
    personalizations: [Personalization<'a>; 1],
    from: EmailAddress<'a>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [EmailAddress<'a>; 1],
}

#[derive(Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

// Client for the SendGrid transactional-email API.
pub struct SendGridMailer {
    client: reqwest::Client,
    config: SendGridConfig,
}

impl SendGridMailer {
    pub fn new(client: reqwest::Client, config: SendGridConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/v3/mail/send", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl MailTransport for SendGridMailer {
    fn method(&self) -> SendMethod {
        SendMethod::SendGrid
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        let payload = MailSend {
            personalizations: [Personalization {
                to: [EmailAddress { email: to }],
            }],
            from: EmailAddress {
                email: &self.config.from_address,
            },
            subject,
            content: [Content {
                content_type: "text/plain",
                value: body,
            }],
        };

        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            // error body is best effort, the status alone is enough to fail
            let body = res.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(status = status.as_u16(), "sendgrid accepted message");
        Ok(())
    }
}
