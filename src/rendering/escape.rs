/*!
 * HTML escaping for text and attribute contexts.
 */

/// Escape text for literal display inside markup
///
/// Covers the five HTML metacharacters `& < > " '`.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a value for a quoted attribute
///
/// Maps `" ' ` < >` to entities. `&` is escaped as well so that the
/// attribute decodes back to exactly the original value.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '`' => escaped.push_str("&#96;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Schemes that must never reach an href or src
const SCRIPT_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Whether a URL would execute or embed content when followed
///
/// Browsers ignore whitespace and control characters inside the scheme and
/// compare it case-insensitively, so both are normalised before matching.
pub fn is_script_url(url: &str) -> bool {
    let normalised: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .flat_map(char::to_lowercase)
        .collect();

    SCRIPT_SCHEMES.iter().any(|scheme| normalised.starts_with(scheme))
}
