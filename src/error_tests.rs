//! Tests for error types

#[cfg(test)]
mod tests {
    use super::super::error::{truncate_body, PulseError};

    #[test]
    fn test_auth_error() {
        let err = PulseError::Auth("metadata server unreachable".to_string());
        assert!(err.to_string().contains("Authentication error"));
        assert!(err.to_string().contains("metadata server unreachable"));
    }

    #[test]
    fn test_api_error_includes_status_and_body() {
        let err = PulseError::Api {
            status: 500,
            body: "internal".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("internal"));
    }

    #[test]
    fn test_exhausted_error_carries_last_error() {
        let err = PulseError::AllCandidatesExhausted {
            candidates: "a, b".to_string(),
            last_error: "API error: 503".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a, b"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn test_unknown_countries_lists_every_key() {
        let err = PulseError::UnknownCountries(vec!["Atlantis".to_string(), "Oz".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("Atlantis"));
        assert!(msg.contains("Oz"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(PulseError::Api { status: 429, body: String::new() }.is_transient());
        assert!(PulseError::MalformedResponse("no parts".into()).is_transient());
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert!(PulseError::Json(json_err).is_transient());

        assert!(!PulseError::Auth("x".into()).is_transient());
        assert!(!PulseError::UnknownCountries(vec![]).is_transient());
        assert!(!PulseError::Config("x".into()).is_transient());
    }

    #[test]
    fn test_error_variants_distinct() {
        let auth = PulseError::Auth("test".to_string());
        let process = PulseError::ExternalProcess("test".to_string());
        assert_ne!(auth.to_string(), process.to_string());
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        assert_eq!(truncate_body("short", 10), "short");
        assert_eq!(truncate_body("abcdef", 3), "abc...");
        assert_eq!(truncate_body("ééééé", 2), "éé...");
    }
}
