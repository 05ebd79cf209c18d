//! Tests for result normalization

#[cfg(test)]
mod tests {
    use super::super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_well_formed_reply() {
        let raw = json!({
            "country": "United States of America",
            "topic": "inflation",
            "sentiment_score": -0.42,
            "summary": "Prices remain a concern.",
            "keywords": ["prices", "wages", "rates"]
        });

        let result = normalize(&raw, "USA", "inflation");
        assert_eq!(result.country_key, "USA");
        assert_eq!(result.topic, "inflation");
        assert_eq!(result.sentiment_score, -0.42);
        assert_eq!(result.summary, "Prices remain a concern.");
        assert_eq!(result.keywords, vec!["prices", "wages", "rates"]);
        assert_eq!(result.status, ResultStatus::Ok);
    }

    #[test]
    fn test_caller_values_override_echoed_fields() {
        let raw = json!({"country": "Somewhere Else", "topic": "other", "sentiment_score": 0.1});
        let result = normalize(&raw, "Brazil", "elections");
        assert_eq!(result.country_key, "Brazil");
        assert_eq!(result.topic, "elections");
    }

    #[test]
    fn test_numeric_string_score_is_coerced() {
        let result = normalize(&json!({"sentiment_score": " 0.25 "}), "Chile", "t");
        assert_eq!(result.sentiment_score, 0.25);
    }

    #[test]
    fn test_invalid_scores_become_zero() {
        for raw in [
            json!({}),
            json!({"sentiment_score": null}),
            json!({"sentiment_score": "very positive"}),
            json!({"sentiment_score": [0.5]}),
            json!({"sentiment_score": {"value": 0.5}}),
            json!({"sentiment_score": "NaN"}),
            json!({"sentiment_score": "inf"}),
        ] {
            let result = normalize(&raw, "Peru", "t");
            assert_eq!(result.sentiment_score, 0.0, "raw: {raw}");
        }
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        assert_eq!(normalize(&json!({"sentiment_score": 3}), "Peru", "t").sentiment_score, 1.0);
        assert_eq!(
            normalize(&json!({"sentiment_score": -7.5}), "Peru", "t").sentiment_score,
            -1.0
        );
    }

    #[test]
    fn test_bool_score_follows_numeric_truthiness() {
        assert_eq!(normalize(&json!({"sentiment_score": true}), "Peru", "t").sentiment_score, 1.0);
        assert_eq!(normalize(&json!({"sentiment_score": false}), "Peru", "t").sentiment_score, 0.0);
    }

    #[test]
    fn test_non_list_keywords_become_empty() {
        for raw in [
            json!({"keywords": "a, b, c"}),
            json!({"keywords": null}),
            json!({"keywords": {"0": "a"}}),
            json!({}),
        ] {
            let result = normalize(&raw, "Kenya", "t");
            assert!(result.keywords.is_empty(), "raw: {raw}");
        }
    }

    #[test]
    fn test_keyword_entries_are_stringified() {
        let raw = json!({"keywords": ["growth", 2025, true, null, {"x": 1}]});
        let result = normalize(&raw, "Kenya", "t");
        assert_eq!(result.keywords, vec!["growth", "2025", "true"]);
    }

    #[test]
    fn test_missing_summary_is_empty() {
        assert_eq!(normalize(&json!({"summary": 42}), "Kenya", "t").summary, "");
    }

    #[test]
    fn test_non_object_reply_is_empty_but_ok() {
        for raw in [json!([1, 2]), json!("text"), json!(0.9)] {
            let result = normalize(&raw, "Ghana", "cocoa");
            assert_eq!(result.sentiment_score, 0.0, "raw: {raw}");
            assert_eq!(result.summary, "");
            assert!(result.keywords.is_empty());
            assert_eq!(result.status, ResultStatus::Ok);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = json!({
            "country": "x",
            "sentiment_score": "0.7",
            "summary": "Upbeat.",
            "keywords": ["one", 2, "three"]
        });
        let first = normalize(&raw, "Japan", "tourism");
        let again = normalize(&serde_json::to_value(&first).unwrap(), "Japan", "tourism");

        assert_eq!(first, again);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }

    #[test]
    fn test_normalize_is_idempotent_through_json_text() {
        let mut scores = vec![0.18017933438838418, -0.9999999999999999, 1.0 / 3.0];
        scores.extend((0..2000).map(|i| (i as f64 * 0.7390851332151607).sin()));

        for score in scores {
            let raw = json!({"sentiment_score": score, "summary": "s", "keywords": ["k"]});
            let first = serde_json::to_string(&normalize(&raw, "Chile", "copper")).unwrap();

            let parsed: Value = serde_json::from_str(&first).unwrap();
            let again = serde_json::to_string(&normalize(&parsed, "Chile", "copper")).unwrap();

            assert_eq!(first, again, "score {score}");
        }
    }

    #[test]
    fn test_degraded_result_shape() {
        let result = SentimentResult::degraded("Iceland", "volcanoes", "API error: 503");
        assert_eq!(result.sentiment_score, 0.0);
        assert_eq!(result.keywords, vec!["API_FAILURE", "NO_DATA", "SYSTEM_ERROR"]);
        assert!(result.summary.contains("API error: 503"));
        assert!(result.is_degraded());
    }

    #[test]
    fn test_serialized_field_names() {
        let result = SentimentResult::degraded("Iceland", "volcanoes", "boom");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["country"], "Iceland");
        assert_eq!(value["status"], "degraded");
        assert!(value.get("country_key").is_none());
    }
}
