use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Outbound message for the transactional-email API. Field names follow the
/// Resend wire format.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub filename: String,
    /// Base64-encoded file content, forwarded as received from the client.
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mail API returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("mail API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One-shot client for the mail API. No retry: a transient provider failure
/// surfaces to the submitter, who tries again.
pub struct Mailer {
    client: Client,
    api_url: String,
    api_key: String,
}

impl Mailer {
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("leadgate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Mailer {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        log::debug!("Mail accepted by provider for {:?}", email.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_resend_wire_shape() {
        let email = OutboundEmail {
            from: "forms@example.com".to_string(),
            to: vec!["inbox@example.com".to_string()],
            reply_to: Some("jane@example.com".to_string()),
            subject: "New quote request".to_string(),
            html: "<p>hi</p>".to_string(),
            attachments: vec![Attachment {
                filename: "resume.pdf".to_string(),
                content: "aGVsbG8=".to_string(),
            }],
        };
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["from"], "forms@example.com");
        assert_eq!(json["reply_to"], "jane@example.com");
        assert_eq!(json["attachments"][0]["filename"], "resume.pdf");
    }

    #[test]
    fn omits_empty_optionals() {
        let email = OutboundEmail {
            from: "forms@example.com".to_string(),
            to: vec!["inbox@example.com".to_string()],
            reply_to: None,
            subject: "s".to_string(),
            html: "h".to_string(),
            attachments: Vec::new(),
        };
        let json = serde_json::to_value(&email).unwrap();
        assert!(json.get("reply_to").is_none());
        assert!(json.get("attachments").is_none());
    }
}
