use crate::spam::Submission;

use serde::Deserialize;

/// Quote request body. `/api/contact` submits the same shape (a contact
/// message is a quote request without a chosen service package).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub service: Option<String>,
    pub message: Option<String>,
    pub website: Option<String>,
    #[serde(rename = "_formLoadedAt")]
    pub form_loaded_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "resumeBase64")]
    pub resume_base64: Option<String>,
    #[serde(rename = "resumeFilename")]
    pub resume_filename: Option<String>,
    pub website: Option<String>,
    #[serde(rename = "_formLoadedAt")]
    pub form_loaded_at: Option<i64>,
}

pub const QUOTE_REQUIRED_MSG: &str = "Name, phone, and service are required.";
pub const APPLICATION_REQUIRED_MSG: &str = "Name, phone, email, and position are required.";

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl QuoteRequest {
    /// Required-field gate: name, phone, service. Empty strings count as
    /// missing, matching what the form itself would never submit.
    pub fn has_required_fields(&self) -> bool {
        present(&self.name) && present(&self.phone) && present(&self.service)
    }

    pub fn to_submission(&self) -> Submission {
        Submission {
            name: self.name.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            email: self.email.clone(),
            message: self.message.clone(),
            website: self.website.clone(),
            form_loaded_at: self.form_loaded_at,
        }
    }
}

impl ApplicationRequest {
    pub fn has_required_fields(&self) -> bool {
        present(&self.name)
            && present(&self.phone)
            && present(&self.email)
            && present(&self.position)
    }

    pub fn to_submission(&self) -> Submission {
        Submission {
            name: self.name.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            email: self.email.clone(),
            message: self.message.clone(),
            website: self.website.clone(),
            form_loaded_at: self.form_loaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_field_names() {
        let body = r#"{
            "name": "Jane Doe",
            "phone": "(281) 555-0123",
            "service": "Fences",
            "website": "",
            "_formLoadedAt": 1700000000000
        }"#;
        let req: QuoteRequest = serde_json::from_str(body).unwrap();
        assert!(req.has_required_fields());
        assert_eq!(req.form_loaded_at, Some(1_700_000_000_000));
        assert_eq!(req.website.as_deref(), Some(""));
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let req = QuoteRequest {
            name: Some("Jane".to_string()),
            phone: Some("  ".to_string()),
            service: Some("Fences".to_string()),
            ..Default::default()
        };
        assert!(!req.has_required_fields());
    }

    #[test]
    fn application_requires_email_and_position() {
        let req: ApplicationRequest = serde_json::from_str(
            r#"{"name":"Jane Doe","phone":"2815550123","email":"jane@example.com"}"#,
        )
        .unwrap();
        assert!(!req.has_required_fields());

        let req: ApplicationRequest = serde_json::from_str(
            r#"{"name":"Jane Doe","phone":"2815550123","email":"jane@example.com",
                "position":"Welder","resumeBase64":"aGVsbG8=","resumeFilename":"resume.pdf"}"#,
        )
        .unwrap();
        assert!(req.has_required_fields());
        assert_eq!(req.resume_filename.as_deref(), Some("resume.pdf"));
    }

    #[test]
    fn to_submission_carries_spam_fields() {
        let req = QuoteRequest {
            name: Some("Jane".to_string()),
            phone: Some("2815550123".to_string()),
            website: Some("bot-filled".to_string()),
            form_loaded_at: Some(42),
            ..Default::default()
        };
        let sub = req.to_submission();
        assert_eq!(sub.website.as_deref(), Some("bot-filled"));
        assert_eq!(sub.form_loaded_at, Some(42));
    }
}
