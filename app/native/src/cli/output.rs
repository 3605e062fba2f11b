//! CLI output formatting utilities.
//!
//! - Tables for structured data display
//! - JSON syntax highlighting

use std::fmt::Write as _;

use colored::Colorize;
use serde::Serialize;

/// Prints a serializable value as pretty, syntax-highlighted JSON.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", highlight_json(&json));
    Ok(())
}

/// Colors a pretty-printed JSON document.
///
/// Keys are cyan, strings green, numbers yellow, booleans and null magenta.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut in_string = false;
    let mut is_key = false;
    let mut escape_next = false;
    let mut after_colon = false;
    let mut token = String::new();

    for ch in json.chars() {
        if escape_next {
            token.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            token.push(ch);
            escape_next = true;
            continue;
        }

        match ch {
            '"' if in_string => {
                token.push(ch);
                let colored = if is_key { token.cyan() } else { token.green() };
                let _ = write!(out, "{colored}");
                token.clear();
                in_string = false;
                is_key = false;
            }
            '"' => {
                flush_scalar(&mut out, &mut token, after_colon);
                token.push(ch);
                in_string = true;
                is_key = !after_colon;
                after_colon = false;
            }
            ':' if !in_string => {
                flush_scalar(&mut out, &mut token, false);
                out.push(':');
                after_colon = true;
            }
            ',' if !in_string => {
                flush_scalar(&mut out, &mut token, after_colon);
                out.push(',');
                after_colon = false;
            }
            '{' | '}' | '[' | ']' if !in_string => {
                flush_scalar(&mut out, &mut token, after_colon);
                let _ = write!(out, "{}", ch.to_string().bold());
                after_colon = false;
            }
            _ => token.push(ch),
        }
    }

    flush_scalar(&mut out, &mut token, after_colon);
    out
}

/// Appends a pending non-string token, coloring it if it is a scalar value.
fn flush_scalar(out: &mut String, token: &mut String, is_value: bool) {
    if token.is_empty() {
        return;
    }

    let start = token.find(|c: char| !c.is_whitespace());
    match start {
        Some(start) if is_value => {
            let end = token.rfind(|c: char| !c.is_whitespace()).map_or(token.len(), |i| i + 1);
            let value = &token[start..end];
            out.push_str(&token[..start]);
            if matches!(value, "true" | "false" | "null") {
                let _ = write!(out, "{}", value.magenta());
            } else if value.parse::<f64>().is_ok() {
                let _ = write!(out, "{}", value.yellow());
            } else {
                out.push_str(value);
            }
            out.push_str(&token[end..]);
        }
        _ => out.push_str(token),
    }

    token.clear();
}

/// Truncates a string to `max_chars` characters, keeping the end and adding a leading ellipsis.
///
/// Paths are more recognizable by their tail, so the beginning is dropped.
#[must_use]
pub fn truncate_start(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        let skip = char_count - (max_chars - 1);
        let start = s.char_indices().nth(skip).map_or(s.len(), |(idx, _)| idx);
        format!("…{}", &s[start..])
    }
}

/// Formats a boolean as a colored check mark or cross.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> String {
        colored::control::set_override(false);
        highlight_json(s)
    }

    #[test]
    fn test_highlight_preserves_text_without_colors() {
        let json = "{\n  \"count\": 2,\n  \"path\": \"/a \\\"b\\\"\",\n  \"ok\": true\n}";
        assert_eq!(plain(json), json);
    }

    #[test]
    fn test_truncate_start_short_string() {
        assert_eq!(truncate_start("/a/b.jpg", 20), "/a/b.jpg");
    }

    #[test]
    fn test_truncate_start_keeps_tail() {
        assert_eq!(truncate_start("/walls/nature/forest.jpg", 11), "…forest.jpg");
    }

    #[test]
    fn test_truncate_start_exact_length() {
        assert_eq!(truncate_start("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_start_min_length() {
        assert_eq!(truncate_start("hello", 1), "…");
    }

    #[test]
    fn test_truncate_start_multibyte() {
        assert_eq!(truncate_start("/fotos/praia/verão.png", 10), "…verão.png");
    }

    #[test]
    fn test_format_bool() {
        assert!(format_bool(true).contains('✓'));
        assert!(format_bool(false).contains('✗'));
    }
}
