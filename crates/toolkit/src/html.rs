//! HTML-to-text conversion for fetched pages.
//!
//! Pragmatic converter, not a full renderer: drops scripts, styles, and
//! comments, keeps link targets, breaks lines on block elements, decodes
//! common entities. Non-HTML content should bypass this module entirely.

/// Returns true iff the content-type header value denotes an HTML document.
pub fn is_html_content_type(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.contains("text/html") || ct.contains("application/xhtml+xml")
}

/// Convert an HTML document to a plain-text rendering.
pub fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len() / 2);
    let mut rest = html;
    let mut pending_href: Option<String> = None;

    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        rest = &rest[lt..];

        if rest.starts_with("<!--") {
            rest = match rest.find("-->") {
                Some(end) => &rest[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(gt) = rest.find('>') else {
            // Truncated tag at end of input.
            rest = "";
            break;
        };
        let tag = &rest[1..gt];
        rest = &rest[gt + 1..];

        let closing = tag.starts_with('/');
        let body = tag.trim_start_matches('/');
        let name: String = body
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '/')
            .collect::<String>()
            .to_ascii_lowercase();

        match name.as_str() {
            "script" | "style" if !closing => {
                rest = skip_past_close_tag(rest, &name);
            }
            "br" => text.push('\n'),
            "li" if !closing => text.push_str("\n- "),
            "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" | "ul" | "ol"
            | "table" | "tr" | "blockquote" | "pre" | "section" | "article" | "header"
            | "footer" | "nav" | "form" => text.push('\n'),
            "a" if !closing => pending_href = attr_value(body, "href"),
            "a" => {
                if let Some(href) = pending_href.take() {
                    if !href.is_empty() && !href.starts_with('#') {
                        text.push_str(&format!(" ({href})"));
                    }
                }
            }
            _ => {}
        }
    }
    text.push_str(rest);

    normalize_whitespace(&decode_entities(&text))
}

/// Advance past `</name ...>`, or to end of input if the close tag is missing.
fn skip_past_close_tag<'a>(rest: &'a str, name: &str) -> &'a str {
    let needle = format!("</{name}");
    let lower = rest.to_ascii_lowercase();
    match lower.find(&needle) {
        Some(pos) => match rest[pos..].find('>') {
            Some(gt) => &rest[pos + gt + 1..],
            None => "",
        },
        None => "",
    }
}

/// Extract a quoted attribute value from a tag body.
fn attr_value(tag_body: &str, attr: &str) -> Option<String> {
    let lower = tag_body.to_ascii_lowercase();
    let mut search = 0;
    while let Some(pos) = lower[search..].find(attr) {
        let start = search + pos;
        let after = &tag_body[start + attr.len()..];
        let after = after.trim_start();
        if let Some(after_eq) = after.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let quote = after_eq.chars().next()?;
            if quote == '"' || quote == '\'' {
                let value = &after_eq[1..];
                return value.find(quote).map(|end| value[..end].to_string());
            }
            // Unquoted value: read until whitespace.
            let end = after_eq
                .find(|c: char| c.is_whitespace())
                .unwrap_or(after_eq.len());
            return Some(after_eq[..end].to_string());
        }
        search = start + attr.len();
    }
    None
}

/// Decode the entities that actually show up in page text.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let semi = rest[..rest.len().min(32)].find(';');
        let Some(semi) = semi else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };

        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Collapse intra-line whitespace runs and drop empty lines: one line of
/// text per block element.
fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        let mut line = String::with_capacity(raw.len());
        let mut last_was_space = false;
        for c in raw.trim().chars() {
            if c.is_whitespace() {
                if !last_was_space {
                    line.push(' ');
                }
                last_was_space = true;
            } else {
                line.push(c);
                last_was_space = false;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_classifier() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("TEXT/HTML"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type("text/plain"));
    }

    #[test]
    fn test_basic_tags_stripped() {
        let text = html_to_text("<html><body><p>Hello <b>world</b></p></body></html>");
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn test_block_elements_break_lines() {
        let text = html_to_text("<h1>Title</h1><p>First</p><p>Second</p>");
        assert_eq!(text, "Title\nFirst\nSecond");
    }

    #[test]
    fn test_script_and_style_dropped() {
        let html = "<p>before</p><script>var x = '<p>not text</p>';</script>\
                    <style>p { color: red; }</style><p>after</p>";
        let text = html_to_text(html);
        assert_eq!(text, "before\nafter");
    }

    #[test]
    fn test_comments_dropped() {
        let text = html_to_text("a<!-- hidden <b>stuff</b> -->b");
        assert_eq!(text, "ab");
    }

    #[test]
    fn test_links_keep_target() {
        let text = html_to_text(r#"See <a href="https://example.com">the site</a>."#);
        assert_eq!(text, "See the site (https://example.com).");
    }

    #[test]
    fn test_fragment_links_dropped() {
        let text = html_to_text(r##"<a href="#top">Back to top</a>"##);
        assert_eq!(text, "Back to top");
    }

    #[test]
    fn test_list_items_bulleted() {
        let text = html_to_text("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(text, "- one\n- two");
    }

    #[test]
    fn test_entities_decoded() {
        let text = html_to_text("a &amp; b &lt;c&gt; &#65; &#x42; &nbsp;d &unknown;");
        assert_eq!(text, "a & b <c> A B d &unknown;");
    }

    #[test]
    fn test_blank_lines_squeezed() {
        let text = html_to_text("<div></div><div></div><div>x</div><div></div><div>y</div>");
        assert_eq!(text, "x\ny");
    }

    #[test]
    fn test_truncated_tag_at_end() {
        let text = html_to_text("ok <broken");
        assert_eq!(text, "ok");
    }
}
