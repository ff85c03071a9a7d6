//! JSON Pointer (RFC 6901) evaluation over YAML values

use crate::error::PointerError;
use serde_yaml::Value;

/// Split a pointer into its unescaped reference tokens.
///
/// An empty pointer addresses the whole document.
pub fn parse_pointer(pointer: &str) -> Result<Vec<String>, PointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }

    let rest = pointer
        .strip_prefix('/')
        .ok_or_else(|| PointerError::MissingLeadingSlash(pointer.to_string()))?;

    rest.split('/')
        .map(|token| {
            unescape(token).ok_or_else(|| PointerError::InvalidEscape {
                pointer: pointer.to_string(),
                token: token.to_string(),
            })
        })
        .collect()
}

fn unescape(token: &str) -> Option<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return None,
        }
    }
    Some(out)
}

/// Format tokens back into pointer syntax
pub fn format_pointer(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| format!("/{}", t.replace('~', "~0").replace('/', "~1")))
        .collect()
}

/// Walk `root` along `tokens`
pub fn lookup<'a>(root: &'a Value, tokens: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for token in tokens {
        current = match current {
            Value::Mapping(map) => map.get(token.as_str())?,
            Value::Sequence(seq) => seq.get(parse_index(token)?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn parse_index(token: &str) -> Option<usize> {
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
