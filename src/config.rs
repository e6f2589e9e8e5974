use clap::Parser;

use crate::transport::{SendGridConfig, SesConfig, SmtpConfig};

// CLI argument structure - every option can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "mail-gateway")]
#[command(about = "HTTP front-end dispatching email through SMTP, SendGrid or Amazon SES")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Interface to bind
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Use X-Forwarded-For / X-Real-IP as the client id.
    // Only safe behind a reverse proxy that sets them.
    #[arg(long, env = "TRUST_FORWARDED_HEADERS", default_value_t = false)]
    pub trust_forwarded_headers: bool,

    // How often stale rate limit entries are swept, in seconds
    #[arg(long, env = "RATE_LIMIT_SWEEP_INTERVAL", default_value_t = 60)]
    pub sweep_interval: u64,

    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    #[arg(long, env = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    #[arg(long, env = "SMTP_FROM")]
    pub smtp_from: Option<String>,

    #[arg(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
    pub sendgrid_api_key: Option<String>,

    #[arg(long, env = "SENDGRID_FROM")]
    pub sendgrid_from: Option<String>,

    #[arg(long, env = "SENDGRID_BASE_URL", default_value = crate::transport::DEFAULT_SENDGRID_URL)]
    pub sendgrid_base_url: String,

    #[arg(long, env = "AWS_SES_REGION")]
    pub ses_region: Option<String>,

    // SES SMTP credentials (not the IAM access key pair)
    #[arg(
        long,
        env = "AWS_SES_SMTP_USERNAME",
        help = "SES SMTP username; this is the access key id of the IAM user allowed to send"
    )]
    pub ses_username: Option<String>,

    #[arg(
        long,
        env = "AWS_SES_SMTP_PASSWORD",
        hide_env_values = true,
        help = "SES SMTP password, derived from the IAM secret access key for the region \
                (SES console \"Create SMTP credentials\", or HMAC-SHA256 over \"SendRawEmail\" \
                with the secret per the SES SMTP credentials docs); not the secret key itself"
    )]
    pub ses_password: Option<String>,

    #[arg(long, env = "AWS_SES_FROM")]
    pub ses_from: Option<String>,
}

impl Args {
    // Each transport is only configured when all of its settings are present
    pub fn smtp(&self) -> Option<SmtpConfig> {
        Some(SmtpConfig {
            host: self.smtp_host.clone()?,
            port: self.smtp_port,
            username: self.smtp_username.clone()?,
            password: self.smtp_password.clone()?,
            from_address: self.smtp_from.clone()?,
        })
    }

    pub fn sendgrid(&self) -> Option<SendGridConfig> {
        Some(SendGridConfig {
            api_key: self.sendgrid_api_key.clone()?,
            from_address: self.sendgrid_from.clone()?,
            base_url: self.sendgrid_base_url.clone(),
        })
    }

    pub fn ses(&self) -> Option<SesConfig> {
        Some(SesConfig {
            region: self.ses_region.clone()?,
            username: self.ses_username.clone()?,
            password: self.ses_password.clone()?,
            from_address: self.ses_from.clone()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn defaults_leave_transports_unconfigured() {
        let args = Args::try_parse_from(["mail-gateway"]).unwrap();

        assert!(!args.trust_forwarded_headers);
        assert!(args.smtp().is_none());
        assert!(args.sendgrid().is_none());
        assert!(args.ses().is_none());
    }

    #[test]
    fn partial_smtp_settings_are_not_enough() {
        let args = Args::try_parse_from([
            "mail-gateway",
            "--smtp-host",
            "smtp.example.com",
            "--smtp-username",
            "user",
        ])
        .unwrap();

        assert!(args.smtp().is_none());
    }

    #[test]
    fn complete_ses_settings() {
        let args = Args::try_parse_from([
            "mail-gateway",
            "--trust-forwarded-headers",
            "--ses-region",
            "us-east-1",
            "--ses-username",
            "AKIA",
            "--ses-password",
            "secret",
            "--ses-from",
            "noreply@example.com",
        ])
        .unwrap();

        assert!(args.trust_forwarded_headers);
        let ses = args.ses().unwrap();
        assert_eq!(ses.endpoint(), "email-smtp.us-east-1.amazonaws.com");
    }

    #[test]
    fn ses_password_help_explains_derivation() {
        let help = Args::command().render_long_help().to_string();

        assert!(help.contains("derived from the IAM secret access key"));
        assert!(help.contains("not the secret key itself"));
    }
}
