use lettre::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_SUBJECT_CHARS: usize = 200;
pub const MAX_BODY_CHARS: usize = 10_000;

// Send-email request format, shared by all three transports.
// Missing fields come through as empty strings and fail validation.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct EmailRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl EmailRequest {
    // Checks every field and returns all failures, keyed by field name.
    pub fn validate(&self) -> Result<(), BTreeMap<&'static str, &'static str>> {
        let mut errors = BTreeMap::new();

        if is_blank(&self.to) {
            errors.insert("to", "Recipient email is required");
        } else if self.to.parse::<Address>().is_err() {
            errors.insert("to", "Invalid email format");
        }

        if is_blank(&self.subject) {
            errors.insert("subject", "Subject is required");
        } else if self.subject.chars().count() > MAX_SUBJECT_CHARS {
            errors.insert("subject", "Subject must not exceed 200 characters");
        }

        if is_blank(&self.body) {
            errors.insert("body", "Email body is required");
        } else if self.body.chars().count() > MAX_BODY_CHARS {
            errors.insert("body", "Email body must not exceed 10000 characters");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl StatusResponse {
    pub fn success(message: &str, method: Option<&str>) -> Self {
        Self {
            message: message.to_string(),
            status: "success".to_string(),
            method: method.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(to: &str, subject: &str, body: &str) -> EmailRequest {
        EmailRequest {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request("recipient@example.com", "Test Email", "hello").validate().is_ok());
    }

    #[test]
    fn blank_fields_are_required() {
        let errors = request("  ", "", "\n").validate().unwrap_err();

        assert_eq!(errors["to"], "Recipient email is required");
        assert_eq!(errors["subject"], "Subject is required");
        assert_eq!(errors["body"], "Email body is required");
    }

    #[test]
    fn malformed_recipient_is_rejected() {
        for to in ["plainaddress", "@example.com", "a@", "two@@example.com", " a@example.com "] {
            let errors = request(to, "s", "b").validate().unwrap_err();
            assert_eq!(errors["to"], "Invalid email format", "accepted {to}");
        }
    }

    #[test]
    fn length_limits_count_characters() {
        let subject = "é".repeat(MAX_SUBJECT_CHARS);
        assert!(request("a@example.com", &subject, "b").validate().is_ok());

        let errors = request("a@example.com", &"x".repeat(MAX_SUBJECT_CHARS + 1), &"y".repeat(MAX_BODY_CHARS + 1))
            .validate()
            .unwrap_err();
        assert_eq!(errors["subject"], "Subject must not exceed 200 characters");
        assert_eq!(errors["body"], "Email body must not exceed 10000 characters");
    }

    #[test]
    fn missing_fields_deserialize_as_blank() {
        let req: EmailRequest = serde_json::from_str(r#"{"to":"a@example.com"}"#).unwrap();

        let errors = req.validate().unwrap_err();
        assert!(!errors.contains_key("to"));
        assert_eq!(errors.len(), 2);
    }
}
