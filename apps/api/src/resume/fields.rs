//! Contact-field matcher: fixed regular expressions over extracted resume
//! text. Pattern match only — no checksum or locale validation; the client
//! prompts the candidate for anything left null.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Name[:\s]*([A-Za-z ]+)").unwrap())
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[a-zA-Z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").unwrap())
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\+?\d{1,4}[-.\s]?)?\d{10}").unwrap())
}

/// Applies the three field patterns to `text`, first match each.
pub fn match_fields(text: &str) -> CandidateInfo {
    let name = name_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    let email = email_re().find(text).map(|m| m.as_str().to_string());

    let phone = phone_re().find(text).map(|m| m.as_str().to_string());

    CandidateInfo { name, email, phone }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_all_three_fields() {
        let text = "Name: Jane Doe\njane@x.com\n9876543210\nExperience: ...";
        let info = match_fields(text);
        assert_eq!(info.name.as_deref(), Some("Jane Doe"));
        assert_eq!(info.email.as_deref(), Some("jane@x.com"));
        assert_eq!(info.phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn no_patterns_yields_all_null() {
        let info = match_fields("A resume with no contact block at all.");
        assert_eq!(
            info,
            CandidateInfo {
                name: None,
                email: None,
                phone: None
            }
        );
    }

    #[test]
    fn phone_keeps_country_code_prefix() {
        let info = match_fields("call +91 9876543210 anytime");
        assert_eq!(info.phone.as_deref(), Some("+91 9876543210"));
    }

    #[test]
    fn name_capture_stops_at_line_end() {
        let info = match_fields("Name: Jane Doe\nBackend Engineer");
        assert_eq!(info.name.as_deref(), Some("Jane Doe"));
    }
}
