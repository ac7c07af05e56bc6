//! Tolerant JSON parsing for model output.
//!
//! Models frequently wrap JSON in markdown code fences or emit
//! trailing commas. [`parse_with_fences`] tries strict parsing first
//! and only then applies the repairs, so well-formed output never
//! pays for them.

use serde_json::Value;

/// Strip a surrounding markdown code fence, with or without a language
/// tag. Returns the input unchanged when no fence is present.
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag line ("json", "JSON", ...) if present.
    let body = match body.split_once('\n') {
        Some((first, tail)) if first.trim().chars().all(|c| c.is_ascii_alphanumeric()) => tail,
        _ => body,
    };
    body.trim()
}

/// Remove commas that directly precede a closing bracket or brace,
/// skipping string literals.
pub fn fix_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let chars: Vec<char> = text.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                // Drop the comma when the next non-whitespace closes a
                // container.
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parse model output as JSON, tolerating fences and trailing commas.
pub fn parse_with_fences(text: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(_) => {
            let stripped = strip_fences(text);
            match serde_json::from_str(stripped) {
                Ok(value) => Ok(value),
                Err(_) => serde_json::from_str(&fix_trailing_commas(stripped)),
            }
        }
    }
}
