//! Provider response normalization.
//!
//! The provider does not guarantee where the video URL lives in its result
//! payload. [`EXTRACTION_RULES`] lists every known location in priority
//! order; [`extract_video_url`] walks the table and returns the first
//! non-empty string it finds. When two rules match, table order decides.

use serde_json::Value;

/// A single named location where a video URL may be found.
pub struct ExtractionRule {
    /// Human-readable path, used in logs.
    pub name: &'static str,
    pub extract: fn(&Value) -> Option<&str>,
}

/// Known URL locations, highest priority first.
pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "video.url",
        extract: video_url,
    },
    ExtractionRule {
        name: "data.video.url",
        extract: data_video_url,
    },
    ExtractionRule {
        name: "data.url",
        extract: data_url,
    },
    ExtractionRule {
        name: "url",
        extract: root_url,
    },
    ExtractionRule {
        name: "output.url",
        extract: output_url,
    },
    ExtractionRule {
        name: "output.video.url",
        extract: output_video_url,
    },
    ExtractionRule {
        name: "<string result>",
        extract: Value::as_str,
    },
];

fn video_url(v: &Value) -> Option<&str> {
    string_at(v, &["video", "url"])
}

fn data_video_url(v: &Value) -> Option<&str> {
    string_at(v, &["data", "video", "url"])
}

fn data_url(v: &Value) -> Option<&str> {
    string_at(v, &["data", "url"])
}

fn root_url(v: &Value) -> Option<&str> {
    string_at(v, &["url"])
}

fn output_url(v: &Value) -> Option<&str> {
    string_at(v, &["output", "url"])
}

fn output_video_url(v: &Value) -> Option<&str> {
    string_at(v, &["output", "video", "url"])
}

/// A URL extracted from a provider result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUrl {
    pub url: String,
    /// Name of the rule that matched.
    pub rule: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// No rule produced a usable URL.
    #[error("Video URL not found in provider response (available keys: {})", format_keys(.available_keys))]
    UrlNotFound {
        /// Top-level keys of the result, empty when it is not an object.
        available_keys: Vec<String>,
    },
}

/// Extract the canonical video URL from a provider result.
///
/// Empty strings count as absent, so a rule matching `""` falls through to
/// the next one.
pub fn extract_video_url(result: &Value) -> Result<ExtractedUrl, NormalizeError> {
    EXTRACTION_RULES
        .iter()
        .find_map(|rule| {
            (rule.extract)(result)
                .filter(|url| !url.trim().is_empty())
                .map(|url| ExtractedUrl {
                    url: url.to_string(),
                    rule: rule.name,
                })
        })
        .ok_or_else(|| NormalizeError::UrlNotFound {
            available_keys: top_level_keys(result),
        })
}

/// Top-level object keys, for diagnostics.
pub fn top_level_keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}

/// Follow `path` through nested objects and return the string at the end.
fn string_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .and_then(Value::as_str)
}

fn format_keys(keys: &[String]) -> String {
    if keys.is_empty() {
        "none".to_string()
    } else {
        keys.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn url_of(value: Value) -> ExtractedUrl {
        extract_video_url(&value).unwrap()
    }

    #[test]
    fn each_rule_matches_its_own_shape() {
        let cases = [
            (json!({"video": {"url": "u1"}}), "video.url"),
            (json!({"data": {"video": {"url": "u2"}}}), "data.video.url"),
            (json!({"data": {"url": "u3"}}), "data.url"),
            (json!({"url": "u4"}), "url"),
            (json!({"output": {"url": "u5"}}), "output.url"),
            (json!({"output": {"video": {"url": "u6"}}}), "output.video.url"),
            (json!("u7"), "<string result>"),
        ];

        for (value, rule) in cases {
            assert_eq!(url_of(value).rule, rule);
        }
    }

    #[test]
    fn data_url_shape_returns_field_value() {
        let extracted = url_of(json!({
            "data": {"url": "https://cdn.example.com/clip.mp4", "seed": 7},
            "request_id": "abc"
        }));
        assert_eq!(extracted.url, "https://cdn.example.com/clip.mp4");
        assert_eq!(extracted.rule, "data.url");
    }

    #[test]
    fn rule_order_breaks_ties() {
        let extracted = url_of(json!({
            "url": "https://cdn.example.com/top-level.mp4",
            "video": {"url": "https://cdn.example.com/nested.mp4"}
        }));
        assert_eq!(extracted.url, "https://cdn.example.com/nested.mp4");
        assert_eq!(extracted.rule, "video.url");
    }

    #[test]
    fn empty_string_is_treated_as_absent() {
        let extracted = url_of(json!({
            "video": {"url": ""},
            "url": "https://cdn.example.com/fallback.mp4"
        }));
        assert_eq!(extracted.url, "https://cdn.example.com/fallback.mp4");

        assert_matches!(
            extract_video_url(&json!({"url": ""})),
            Err(NormalizeError::UrlNotFound { .. })
        );
        assert_matches!(
            extract_video_url(&json!("")),
            Err(NormalizeError::UrlNotFound { .. })
        );
    }

    #[test]
    fn non_string_values_do_not_match() {
        assert_matches!(
            extract_video_url(&json!({"video": {"url": 42}, "url": null})),
            Err(NormalizeError::UrlNotFound { .. })
        );
    }

    #[test]
    fn unknown_shape_reports_available_keys() {
        let err = extract_video_url(&json!({"files": [], "timings": {}})).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::UrlNotFound {
                available_keys: vec!["files".to_string(), "timings".to_string()],
            }
        );
        assert_eq!(
            err.to_string(),
            "Video URL not found in provider response (available keys: files, timings)"
        );
    }

    #[test]
    fn non_object_result_reports_no_keys() {
        let err = extract_video_url(&Value::Null).unwrap_err();
        assert!(err.to_string().ends_with("(available keys: none)"));
    }
}
