//! Rendering raw comment text into HTML.

/// Renders raw comment content. Implementations must be pure: called once per
/// create/update with no side effects.
pub trait Formatter: Send + Sync {
    fn render(&self, raw: &str) -> String;
}

/// Minimal, safe renderer: escapes HTML, wraps blank-line-separated blocks in
/// `<p>`, turns single newlines into `<br>` and `` `code` `` into `<code>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

impl Formatter for HtmlFormatter {
    fn render(&self, raw: &str) -> String {
        let normalized = raw.replace("\r\n", "\n");
        let mut out = String::with_capacity(normalized.len() + 16);
        for block in normalized.split("\n\n") {
            let block = block.trim_matches('\n');
            if block.trim().is_empty() {
                continue;
            }
            out.push_str("<p>");
            for (i, line) in block.split('\n').enumerate() {
                if i > 0 {
                    out.push_str("<br>");
                }
                render_inline(line, &mut out);
            }
            out.push_str("</p>");
        }
        out
    }
}

/// Escapes a line and converts backtick spans. An unmatched backtick is kept
/// literally.
fn render_inline(line: &str, out: &mut String) {
    let mut parts = line.split('`').peekable();
    let mut in_code = false;
    while let Some(part) = parts.next() {
        if in_code {
            if parts.peek().is_none() {
                // unmatched
                out.push('`');
                escape_into(part, out);
            } else {
                out.push_str("<code>");
                escape_into(part, out);
                out.push_str("</code>");
            }
        } else {
            escape_into(part, out);
        }
        in_code = !in_code;
    }
}

fn escape_into(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}
