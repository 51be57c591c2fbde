//! HTML rendering of rich-text documents for the view pages.

use super::{Block, Document, ImageAttrs, Inline, ListItem, Mark};

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render a document to an HTML fragment.
pub fn render_html(doc: &Document) -> String {
    let mut out = String::new();
    for block in &doc.content {
        render_block(block, &mut out);
    }
    out
}

fn render_block(block: &Block, out: &mut String) {
    match block {
        Block::Paragraph { content } => {
            out.push_str("<p>");
            render_inlines(content, out);
            out.push_str("</p>");
        }
        Block::Heading { attrs, content } => {
            let level = attrs.level.get();
            out.push_str(&format!("<h{}>", level));
            render_inlines(content, out);
            out.push_str(&format!("</h{}>", level));
        }
        Block::BulletList { content } => {
            out.push_str("<ul>");
            render_items(content, out);
            out.push_str("</ul>");
        }
        Block::OrderedList { attrs, content } => {
            if attrs.start == 1 {
                out.push_str("<ol>");
            } else {
                out.push_str(&format!("<ol start=\"{}\">", attrs.start));
            }
            render_items(content, out);
            out.push_str("</ol>");
        }
        Block::Blockquote { content } => {
            out.push_str("<blockquote>");
            for child in content {
                render_block(child, out);
            }
            out.push_str("</blockquote>");
        }
        Block::CodeBlock { attrs, content } => {
            match attrs.language.as_deref().filter(|l| !l.is_empty()) {
                Some(language) => out.push_str(&format!(
                    "<pre><code class=\"language-{}\">",
                    escape_html(language)
                )),
                None => out.push_str("<pre><code>"),
            }
            // Marks are meaningless inside code blocks
            for inline in content {
                match inline {
                    Inline::Text { text, .. } => out.push_str(&escape_html(text)),
                    Inline::HardBreak => out.push('\n'),
                }
            }
            out.push_str("</code></pre>");
        }
        Block::HorizontalRule => out.push_str("<hr>"),
        Block::Image { attrs } => render_image(attrs, out),
    }
}

fn render_items(items: &[ListItem], out: &mut String) {
    for item in items {
        out.push_str("<li>");
        for child in &item.content {
            render_block(child, out);
        }
        out.push_str("</li>");
    }
}

fn render_image(attrs: &ImageAttrs, out: &mut String) {
    out.push_str(&format!("<img src=\"{}\"", escape_html(&attrs.src)));
    if let Some(alt) = &attrs.alt {
        out.push_str(&format!(" alt=\"{}\"", escape_html(alt)));
    }
    if let Some(title) = &attrs.title {
        out.push_str(&format!(" title=\"{}\"", escape_html(title)));
    }
    out.push_str(&format!(" style=\"{}\">", escape_html(&attrs.style())));
}

fn render_inlines(content: &[Inline], out: &mut String) {
    for inline in content {
        match inline {
            Inline::Text { text, marks } => render_text(text, marks, out),
            Inline::HardBreak => out.push_str("<br>"),
        }
    }
}

fn render_text(text: &str, marks: &[Mark], out: &mut String) {
    let mut closing = Vec::with_capacity(marks.len());
    for mark in marks {
        match mark {
            Mark::Bold => {
                out.push_str("<strong>");
                closing.push("</strong>");
            }
            Mark::Italic => {
                out.push_str("<em>");
                closing.push("</em>");
            }
            Mark::Strike => {
                out.push_str("<s>");
                closing.push("</s>");
            }
            Mark::Code => {
                out.push_str("<code>");
                closing.push("</code>");
            }
            Mark::Link { attrs } => {
                // Unsafe URLs are dropped, the text stays
                if !is_safe_href(&attrs.href) {
                    continue;
                }
                out.push_str(&format!("<a href=\"{}\"", escape_html(&attrs.href)));
                if let Some(target) = &attrs.target {
                    out.push_str(&format!(" target=\"{}\"", escape_html(target)));
                }
                out.push_str(" rel=\"noopener noreferrer\">");
                closing.push("</a>");
            }
        }
    }

    out.push_str(&escape_html(text));

    for tag in closing.iter().rev() {
        out.push_str(tag);
    }
}

const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// Relative and fragment links pass; absolute ones need an allowed scheme.
///
/// Browsers ignore leading control characters and spaces, and tabs or line
/// breaks anywhere, before reading the scheme, so the check does the same.
fn is_safe_href(href: &str) -> bool {
    let normalized: String = href
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();

    let Some(colon) = normalized.find(':') else {
        return true;
    };
    let scheme = &normalized[..colon];
    if scheme.contains(|c| matches!(c, '/' | '?' | '#')) {
        return true;
    }
    ALLOWED_SCHEMES
        .iter()
        .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
}
