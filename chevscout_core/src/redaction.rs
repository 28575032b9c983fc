use regex::Regex;
use std::sync::OnceLock;

/// Redacts credential-bearing patterns from session-log text while keeping
/// the surrounding structure readable.
pub fn redact_sensitive_text(input: &str) -> String {
    static GOOG_KEY_RE: OnceLock<Regex> = OnceLock::new();
    static AUTH_BEARER_RE: OnceLock<Regex> = OnceLock::new();
    static QUERY_KEY_RE: OnceLock<Regex> = OnceLock::new();
    static KEY_LIKE_RE: OnceLock<Regex> = OnceLock::new();

    let goog_key_re = GOOG_KEY_RE.get_or_init(|| {
        Regex::new(r#"(?i)(x-goog-api-key\s*:\s*)([A-Za-z0-9._~+/=-]+)"#).unwrap()
    });
    let auth_bearer_re = AUTH_BEARER_RE.get_or_init(|| {
        Regex::new(r#"(?i)(authorization\s*:\s*bearer\s+)([A-Za-z0-9._~+/=-]+)"#).unwrap()
    });
    let query_key_re = QUERY_KEY_RE.get_or_init(|| {
        Regex::new(r#"(?i)([?&](?:key|token|access_token|api_key|apikey)=)([^&\s"']+)"#).unwrap()
    });
    // Google API keys are AIza-prefixed strings.
    let key_like_re =
        KEY_LIKE_RE.get_or_init(|| Regex::new(r#"\bAIza[A-Za-z0-9_-]{12,}\b"#).unwrap());

    let step1 = goog_key_re.replace_all(input, "$1[REDACTED]").to_string();
    let step2 = auth_bearer_re
        .replace_all(&step1, "$1[REDACTED]")
        .to_string();
    let step3 = query_key_re.replace_all(&step2, "$1[REDACTED]").to_string();
    key_like_re.replace_all(&step3, "[REDACTED]").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_masks_api_credentials() {
        let raw = r#"x-goog-api-key: AIzaSyFakeKey1234567890
Authorization: Bearer abc123token
https://generativelanguage.googleapis.com/v1beta/models/x:generateContent?key=AIzaSyOther123456789"#;

        let masked = redact_sensitive_text(raw);
        assert!(!masked.contains("AIzaSyFakeKey1234567890"));
        assert!(!masked.contains("abc123token"));
        assert!(!masked.contains("AIzaSyOther123456789"));
        assert!(masked.contains("x-goog-api-key: [REDACTED]"));
        assert!(masked.contains("Authorization: Bearer [REDACTED]"));
        assert!(masked.contains("key=[REDACTED]"));
    }

    #[test]
    fn ordinary_text_passes_through() {
        let raw = "MSc Public Health at Leeds, fee 26,500 GBP";
        assert_eq!(redact_sensitive_text(raw), raw);
    }
}
