//! HTML escaping for user text interpolated into email bodies.

/// Escape `& < > " ' /` so user text cannot inject markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape, then turn line breaks into `<br>` for display.
pub fn escape_multiline(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}
