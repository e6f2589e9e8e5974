use std::sync::Arc;

use crate::config::Args;
use crate::error::TransportError;
use crate::rate_limit::RateLimiter;
use crate::transport::{
    MailTransport, SendGridMailer, SendMethod, SesMailer, SmtpMailer, Unconfigured,
};

// app's shared state
pub struct AppState {
    pub rate_limiter: Arc<RateLimiter>,
    pub trust_forwarded_headers: bool, // honour X-Forwarded-For / X-Real-IP
    pub smtp: Arc<dyn MailTransport>,
    pub sendgrid: Arc<dyn MailTransport>,
    pub ses: Arc<dyn MailTransport>,
}

impl AppState {
    pub fn from_args(args: &Args, client: reqwest::Client) -> Result<Self, TransportError> {
        let smtp: Arc<dyn MailTransport> = match args.smtp() {
            Some(config) => Arc::new(SmtpMailer::new(&config)?),
            None => Arc::new(Unconfigured(SendMethod::Smtp)),
        };

        let sendgrid: Arc<dyn MailTransport> = match args.sendgrid() {
            Some(config) => Arc::new(SendGridMailer::new(client, config)),
            None => Arc::new(Unconfigured(SendMethod::SendGrid)),
        };

        let ses: Arc<dyn MailTransport> = match args.ses() {
            Some(config) => Arc::new(SesMailer::new(&config)?),
            None => Arc::new(Unconfigured(SendMethod::Ses)),
        };

        for transport in [&smtp, &sendgrid, &ses] {
            tracing::info!(
                method = transport.method().label(),
                configured = transport.is_configured(),
                "mail transport ready"
            );
        }

        Ok(Self {
            rate_limiter: Arc::new(RateLimiter::new()),
            trust_forwarded_headers: args.trust_forwarded_headers,
            smtp,
            sendgrid,
            ses,
        })
    }

    pub fn transport(&self, method: SendMethod) -> &Arc<dyn MailTransport> {
        match method {
            SendMethod::Smtp => &self.smtp,
            SendMethod::SendGrid => &self.sendgrid,
            SendMethod::Ses => &self.ses,
        }
    }
}
