//! Helpers over upstream user/post JSON.
//!
//! Records are kept as `serde_json::Value` so that every field the upstream service
//! sends is relayed and persisted untouched.

use serde_json::Value;

/// Number of leading entries relayed or persisted from an upstream collection.
pub const PAGE_SIZE: usize = 10;

/// Keeps at most `n` leading entries, preserving upstream order.
pub fn take_first(items: Vec<Value>, n: usize) -> Vec<Value> {
    items.into_iter().take(n).collect()
}

/// Loose comparison of a post's `userId` against a raw path id.
///
/// A numeric `userId` matches when the trimmed id parses to the same number, so
/// `"1"`, `" 1 "` and `"1.0"` all match `1`. A string `userId` must match the id
/// text exactly. Any other type, or an empty id, never matches.
pub fn user_id_matches(post: &Value, id: &str) -> bool {
    match post.get("userId") {
        Some(Value::Number(n)) => {
            let trimmed = id.trim();
            if trimmed.is_empty() {
                return false;
            }
            match (trimmed.parse::<f64>(), n.as_f64()) {
                (Ok(wanted), Some(actual)) => wanted == actual,
                _ => false,
            }
        }
        Some(Value::String(s)) => s == id,
        _ => false,
    }
}

/// Integer-prefix parse of a path id: leading whitespace and a sign are allowed,
/// parsing stops at the first non-digit. `"12abc"` yields 12; `"abc"` yields `None`.
/// A `0x`/`0X` prefix switches to hexadecimal, so `"0xA"` yields 10.
pub fn parse_post_id(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (digits, radix) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (&unsigned[2..], 16),
        _ => (unsigned, 10),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -value } else { value })
}

/// First post whose numeric `id` equals `id`. String ids never match.
pub fn find_post(posts: &[Value], id: i64) -> Option<&Value> {
    posts.iter().find(|post| match post.get("id") {
        Some(Value::Number(n)) => n.as_i64() == Some(id) || n.as_f64() == Some(id as f64),
        _ => false,
    })
}
