use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static CODE_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*\n?(.*?)\n?\s*```$").unwrap());

/// Reduces a model answer to the JSON text it carries.
///
/// Structured output mode normally returns bare JSON, but some models still
/// wrap it in a markdown fence or prepend reasoning tags.
pub fn clean_json_response(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    let trimmed = cleaned.trim();
    match CODE_FENCE_PATTERN.captures(trimmed) {
        Some(caps) => caps[1].trim().to_string(),
        None => trimmed.to_string(),
    }
}
