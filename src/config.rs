use serde::{Deserialize, Serialize};

const FALLBACK_QUOTE_EMAIL: &str = "quotes@lonestarfenceiron.com";
const FALLBACK_APPLICATION_EMAIL: &str = "careers@lonestarfenceiron.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    /// Endpoint of the transactional-email API (Resend-compatible).
    pub mail_api_url: String,
    /// Sender address stamped on every outbound notification.
    pub from_address: String,
    /// Inbox for quote/contact submissions.
    pub quote_email: String,
    /// Inbox for job applications.
    pub application_email: String,
    /// Bearer key for the mail API. Normally supplied via RESEND_API_KEY;
    /// a missing key keeps the server up but fails every send with 500.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub rules: RuleSet,
}

/// Static spam tables. Data, not logic: the guard walks these, it never
/// hardcodes a domain or phrase in control flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Exact-match blocked sender domains (compared lowercased).
    pub blocked_domains: Vec<String>,
    /// Regex patterns matched against the sender domain, anchored prefixes.
    pub blocked_domain_patterns: Vec<String>,
    /// Case-insensitive substrings that mark a message as solicitation spam.
    pub blocked_phrases: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            blocked_domains: [
                "searchregister.info",
                "searchindexer.online",
                "getlistedfast.com",
                "webrankers.net",
                "trafficwizards.biz",
                "quickindexnow.com",
                "sitepromoters.org",
                "bizlistings.pro",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            blocked_domain_patterns: [
                "^search-",
                "^seo-",
                "^register-",
                "^indexing-",
                "^ranking-",
                "^boost-",
                "^submit-",
                "^listing-",
                "^directory-",
                "^webmaster-",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            blocked_phrases: [
                "search indexing",
                "search engine optimization",
                "seo service",
                "seo package",
                "seo audit",
                "link building",
                "backlink",
                "google ranking",
                "first page of google",
                "rank higher",
                "increase your traffic",
                "website traffic",
                "web traffic",
                "domain listing",
                "business directory",
                "guest post",
                "guest posting",
                "content writing services",
                "web design services",
                "website redesign",
                "mobile app development",
                "digital marketing services",
                "lead generation services",
                "business loan",
                "merchant funding",
                "crypto investment",
                "make money online",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: "127.0.0.1:8380".to_string(),
            mail_api_url: "https://api.resend.com/emails".to_string(),
            from_address: "Lone Star Fence & Ironworks <forms@lonestarfenceiron.com>".to_string(),
            quote_email: FALLBACK_QUOTE_EMAIL.to_string(),
            application_email: FALLBACK_APPLICATION_EMAIL.to_string(),
            api_key: None,
            rules: RuleSet::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Environment takes precedence over the file for deploy-time secrets
    /// and inbox routing: RESEND_API_KEY, QUOTE_EMAIL, APPLICATION_EMAIL.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("RESEND_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(addr) = std::env::var("QUOTE_EMAIL") {
            if !addr.is_empty() {
                self.quote_email = addr;
            }
        }
        if let Ok(addr) = std::env::var("APPLICATION_EMAIL") {
            if !addr.is_empty() {
                self.application_email = addr;
            }
        }
    }
}
