use crate::config::RuleSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Submissions younger than this are assumed to be scripted. Humans need a
/// few seconds just to read the form.
pub const MIN_FILL_TIME_MS: i64 = 3000;

/// Deltas beyond this are treated as clock garbage, not as a signal.
const MAX_PLAUSIBLE_FORM_AGE_MS: i64 = 365 * 24 * 60 * 60 * 1000;

/// The guard's view of a form submission. Endpoint-specific fields
/// (service, position, resume) are irrelevant to classification and are
/// not carried here.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub email: Option<String>,
    pub message: Option<String>,
    /// Honeypot field. Hidden from humans by the form layout; anything in
    /// here was put there by an automated form-filler.
    pub website: Option<String>,
    /// Epoch milliseconds captured when the client rendered the form.
    /// Client-supplied and untrusted.
    pub form_loaded_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpamReason {
    Honeypot,
    Timing,
    InvalidPhone,
    BlockedDomain,
    BlockedDomainPattern,
    BlockedPhrase,
    UrlInMessage,
}

impl std::fmt::Display for SpamReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpamReason::Honeypot => "honeypot",
            SpamReason::Timing => "timing",
            SpamReason::InvalidPhone => "invalid-phone",
            SpamReason::BlockedDomain => "blocked-domain",
            SpamReason::BlockedDomainPattern => "blocked-domain-pattern",
            SpamReason::BlockedPhrase => "blocked-phrase",
            SpamReason::UrlInMessage => "url-in-message",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpamVerdict {
    pub blocked: bool,
    pub reason: Option<SpamReason>,
}

impl SpamVerdict {
    pub fn clean() -> Self {
        SpamVerdict {
            blocked: false,
            reason: None,
        }
    }

    pub fn blocked(reason: SpamReason) -> Self {
        SpamVerdict {
            blocked: true,
            reason: Some(reason),
        }
    }
}

/// Rule engine gating whether a submission reaches the business inbox.
/// Evaluation is a pure function of the submission, the ruleset, and the
/// caller-supplied clock reading; no I/O happens here.
pub struct SpamGuard {
    blocked_domains: HashSet<String>,
    domain_patterns: Vec<Regex>,
    blocked_phrases: Vec<String>,
}

impl SpamGuard {
    /// Builds the guard, pre-compiling every domain pattern. A pattern that
    /// fails to compile is a configuration error, not a runtime concern.
    pub fn new(rules: &RuleSet) -> anyhow::Result<Self> {
        let mut domain_patterns = Vec::with_capacity(rules.blocked_domain_patterns.len());
        for pattern in &rules.blocked_domain_patterns {
            let regex = Regex::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid domain pattern '{pattern}': {e}"))?;
            domain_patterns.push(regex);
        }

        Ok(SpamGuard {
            blocked_domains: rules
                .blocked_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            domain_patterns,
            blocked_phrases: rules
                .blocked_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        })
    }

    /// Classifies a submission. First matching rule wins; later checks are
    /// never evaluated once one fires. Absent optional fields skip their
    /// checks entirely.
    pub fn evaluate(&self, submission: &Submission, now_ms: i64) -> SpamVerdict {
        // Honeypot first: the strongest signal, independent of everything else.
        if let Some(website) = &submission.website {
            if !website.is_empty() {
                return SpamVerdict::blocked(SpamReason::Honeypot);
            }
        }

        if let Some(loaded_at) = submission.form_loaded_at {
            match now_ms.checked_sub(loaded_at) {
                Some(delta) if delta >= 0 && delta <= MAX_PLAUSIBLE_FORM_AGE_MS => {
                    if delta < MIN_FILL_TIME_MS {
                        return SpamVerdict::blocked(SpamReason::Timing);
                    }
                }
                // Negative or absurd delta: clock skew or a tampered
                // timestamp. No timing signal either way.
                _ => {
                    log::debug!(
                        "Ignoring implausible form timestamp: loaded_at={loaded_at}, now={now_ms}"
                    );
                }
            }
        }

        if !submission.phone.is_empty() {
            let digits = submission.phone.chars().filter(|c| c.is_ascii_digit()).count();
            if digits != 10 {
                return SpamVerdict::blocked(SpamReason::InvalidPhone);
            }
        }

        if let Some(email) = &submission.email {
            if let Some(domain) = email.rsplit_once('@').map(|(_, d)| d.to_lowercase()) {
                if self.blocked_domains.contains(&domain) {
                    return SpamVerdict::blocked(SpamReason::BlockedDomain);
                }
                if self.domain_patterns.iter().any(|p| p.is_match(&domain)) {
                    return SpamVerdict::blocked(SpamReason::BlockedDomainPattern);
                }
            }
        }

        if let Some(message) = &submission.message {
            let lowered = message.to_lowercase();
            if let Some(phrase) = self.blocked_phrases.iter().find(|p| lowered.contains(p.as_str())) {
                log::debug!("Message matched blocked phrase: {phrase}");
                return SpamVerdict::blocked(SpamReason::BlockedPhrase);
            }
            if lowered.contains("http://") || lowered.contains("https://") {
                return SpamVerdict::blocked(SpamReason::UrlInMessage);
            }
        }

        SpamVerdict::clean()
    }
}
