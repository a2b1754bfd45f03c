//! Shared helpers for document rendering.

/// Format a currency amount as `$` plus two decimals with thousands
/// separators, e.g. `$15,585.00` or `-$12.50`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0.00" would be misleading for tiny negative rounding noise
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Escape special characters for Typst string literals.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\r', "")
        .replace('\n', r"\n")
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty() {
            result.push('-');
            last_dash = true;
        }
    }

    let trimmed = result.trim_matches('-');
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(150.0), "$150.00");
        assert_eq!(format_currency(15585.0), "$15,585.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-12.5), "-$12.50");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_escape_typst_string() {
        assert_eq!(escape_typst_string(r#"Say "hi""#), r#"Say \"hi\""#);
        assert_eq!(escape_typst_string("Line1\r\nLine2"), r"Line1\nLine2");
        assert_eq!(escape_typst_string(r"C:\path"), r"C:\\path");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Quote 1000136", "quote"), "quote-1000136");
        assert_eq!(sanitize_filename("  Spaces  ", "fallback"), "spaces");
        assert_eq!(sanitize_filename("#/?", "fallback"), "fallback");
        assert_eq!(sanitize_filename("A--B", "fb"), "a-b");
    }
}
