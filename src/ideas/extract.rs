//! Recovery of structured JSON from free-form model text.
//!
//! Models instructed to answer with raw JSON still wrap it in prose or code
//! fences often enough that strict parsing alone is not viable. The recovery
//! chain is: strict parse, then balanced-object extraction, then give up.

use regex::Regex;
use serde_json::Value;

/// Scanner state for balanced-object extraction. Braces inside string
/// literals (including escaped quotes) must not perturb the depth counter.
enum ScanState {
    Normal,
    InString,
    InStringEscape,
}

/// Strict JSON parse that never panics.
pub fn try_parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Parse model output into a JSON value, tolerating surrounding prose.
///
/// Returns `None` only when neither the raw text nor the first balanced
/// object embedded in it is valid JSON.
pub fn recover_json_object(raw_text: &str) -> Option<Value> {
    if let Some(parsed) = try_parse_json(raw_text) {
        return Some(parsed);
    }
    extract_first_json_object(raw_text).and_then(|obj| try_parse_json(&obj))
}

/// Find the first balanced top-level `{...}` in `text`.
///
/// Code fences are stripped first. Returns the exact substring spanning the
/// outermost object, or `None` when no balanced object exists.
pub fn extract_first_json_object(text: &str) -> Option<String> {
    let cleaned = strip_code_fence(text);

    let mut state = ScanState::Normal;
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, ch) in cleaned.char_indices() {
        match state {
            ScanState::InString => match ch {
                '\\' => state = ScanState::InStringEscape,
                '"' => state = ScanState::Normal,
                _ => {}
            },
            ScanState::InStringEscape => state = ScanState::InString,
            ScanState::Normal => match ch {
                '"' => state = ScanState::InString,
                '{' => {
                    if depth == 0 {
                        start = Some(i);
                    }
                    depth += 1;
                }
                '}' => {
                    if depth > 0 {
                        depth -= 1;
                        if depth == 0 {
                            if let Some(s) = start {
                                return Some(cleaned[s..i + 1].to_string());
                            }
                        }
                    }
                }
                _ => {}
            },
        }
    }

    None
}

/// Drop a leading ```lang fence line and a trailing ``` fence, if present.
fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut cleaned = trimmed.to_string();
    if let Ok(re) = Regex::new(r"^```[a-zA-Z]*\n?") {
        cleaned = re.replace(&cleaned, "").into_owned();
    }
    if let Some(stripped) = cleaned.strip_suffix("```") {
        cleaned = stripped.to_string();
    }
    cleaned
}
