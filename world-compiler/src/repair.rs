/// Recovery of world plans from raw generator output.
/// The generator is length-limited and chatty, so the JSON object may be
/// surrounded by log noise and cut off before its closing delimiters.
use crate::plan::WorldPlan;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a raw generator response could not be turned into a plan.
#[derive(Debug, Error, PartialEq)]
pub enum RepairFailure {
    #[error("no JSON object found in generator output")]
    NoStructuredContent,
    #[error("JSON parse error: {0}")]
    Malformed(String),
    #[error("parsed JSON is not an object")]
    NotAnObject,
    #[error("JSON doesn't match the world plan format: missing `{0}`")]
    MissingField(&'static str),
}

/// Keys accepted as the plan's identity.
const NAME_KEYS: &[&str] = &["name", "world_name"];

/// Returns the plan embedded in `raw`, or `None` when nothing usable is there.
pub fn repair(raw: &str) -> Option<WorldPlan> {
    match try_repair(raw) {
        Ok(plan) => Some(plan),
        Err(failure) => {
            warn!("Plan repair failed: {}", failure);
            None
        }
    }
}

/// Extracts, closes, parses and validates the plan embedded in `raw`.
pub fn try_repair(raw: &str) -> Result<WorldPlan, RepairFailure> {
    let candidate = extract_object_span(raw).ok_or(RepairFailure::NoStructuredContent)?;
    let repaired = close_unbalanced(candidate);

    let value: Value = serde_json::from_str(&repaired).map_err(|e| {
        debug!("Attempted JSON: {}", repaired);
        RepairFailure::Malformed(e.to_string())
    })?;

    let object = value.as_object().ok_or(RepairFailure::NotAnObject)?;
    if !NAME_KEYS.iter().any(|key| object.contains_key(*key)) {
        return Err(RepairFailure::MissingField("name"));
    }
    if !object.contains_key("models") {
        return Err(RepairFailure::MissingField("models"));
    }

    serde_json::from_value(value).map_err(|e| RepairFailure::Malformed(e.to_string()))
}

/// Span from the first `{` through the last `}` after it.
/// Output truncated before any `}` keeps everything from the first `{` on.
fn extract_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let tail = &raw[start..];
    match tail.rfind('}') {
        Some(end) => Some(&tail[..=end]),
        None => Some(tail),
    }
}

/// Appends the closers still owed by `candidate`, innermost first.
/// Delimiters inside string literals are counted like any other; a mismatched
/// or surplus closer leaves the text untouched so the parse step rejects it.
fn close_unbalanced(candidate: &str) -> String {
    let mut open: Vec<char> = Vec::new();

    for c in candidate.chars() {
        match c {
            '{' | '[' => open.push(c),
            '}' | ']' => {
                let expected = if c == '}' { '{' } else { '[' };
                if open.pop() != Some(expected) {
                    return candidate.to_string();
                }
            }
            _ => {}
        }
    }

    let mut repaired = String::with_capacity(candidate.len() + open.len());
    repaired.push_str(candidate);
    repaired.extend(open.iter().rev().map(|c| if *c == '{' { '}' } else { ']' }));
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_object_passes_through() {
        let json = r#"{"name":"yard","models":[{"name":"crate","type":"box","scale":{"x":2,"y":1,"z":1}}],"lighting":[]}"#;
        let expected: WorldPlan = serde_json::from_str(json).unwrap();

        let plan = repair(json).unwrap();
        assert_eq!(plan, expected);
        assert_eq!(plan.name(), "yard");
        assert_eq!(plan.models[0].scale(), [2.0, 1.0, 1.0]);
    }

    #[test]
    fn strips_surrounding_noise() {
        let raw = "llama_model_load: done\n{\"world_name\":\"w\",\"models\":[]}\n[end of text]";
        let plan = repair(raw).unwrap();
        assert_eq!(plan.name(), "w");
        assert!(plan.models.is_empty());
    }

    #[test]
    fn closes_truncated_output() {
        let plan = repair(r#"{"name":"w","models":[{"name":"a""#).unwrap();
        assert_eq!(plan.models.len(), 1);
        assert_eq!(plan.models[0].name(), "a");
    }

    #[test]
    fn drops_partial_tail_after_last_closer() {
        let plan = repair(r#"{"name":"w","models":[{"name":"a"},{"name":"b"#).unwrap();
        assert_eq!(plan.models.len(), 1);
        assert_eq!(plan.models[0].name(), "a");
    }

    #[test]
    fn closes_missing_object_braces() {
        let raw = r#"{"world_name":"w","models":[{"name":"a"}],"physics":{"max_step_size":0.01}"#;
        let plan = repair(raw).unwrap();
        assert_eq!(plan.physics().max_step_size(), 0.01);
    }

    #[test]
    fn surplus_closers_still_fail() {
        assert_eq!(
            try_repair(r#"{"name":"w","models":[]}]}"#),
            Err(RepairFailure::Malformed(
                serde_json::from_str::<Value>(r#"{"name":"w","models":[]}]}"#)
                    .unwrap_err()
                    .to_string()
            ))
        );
        assert!(repair(r#"{"name":"w","models":[}"#).is_none());
    }

    #[test]
    fn no_brace_means_no_plan() {
        assert_eq!(
            try_repair("the model produced no json"),
            Err(RepairFailure::NoStructuredContent)
        );
        assert!(repair("").is_none());
    }

    #[test]
    fn requires_name_and_models() {
        assert_eq!(
            try_repair(r#"{"models":[]}"#),
            Err(RepairFailure::MissingField("name"))
        );
        assert_eq!(
            try_repair(r#"{"name":"w"}"#),
            Err(RepairFailure::MissingField("models"))
        );
    }

    #[test]
    fn models_may_be_any_type() {
        let plan = repair(r#"{"name":"w","models":"none"}"#).unwrap();
        assert!(plan.models.is_empty());
    }

    #[test]
    fn garbage_inside_braces_is_malformed() {
        assert!(matches!(
            try_repair("{not json at all}"),
            Err(RepairFailure::Malformed(_))
        ));
    }
}
