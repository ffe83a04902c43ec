//! Pull a JSON object out of free-form model output.
//!
//! Models wrap JSON in markdown fences, prepend prose, or append commentary.
//! These helpers find the first balanced `{...}` object and ignore the rest.

use serde::de::DeserializeOwned;

/// Strip a surrounding ```json / ``` fence if present.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Return the first balanced JSON object in `raw`, honoring string literals.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let text = strip_code_fence(raw);
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract and deserialize the first JSON object in `raw`.
pub fn parse_json_object<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let json = extract_json_object(raw).ok_or_else(|| "no JSON object found".to_string())?;
    serde_json::from_str(json).map_err(|e| e.to_string())
}
