//! HTML helper functions

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate an image tag; `alt` is escaped, `src` is used as given
pub fn image_tag(src: &str, alt: Option<&str>, size: Option<(u32, u32)>) -> String {
    let size_attr = size
        .map(|(w, h)| format!(r#" width="{}" height="{}""#, w, h))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" alt="{}"{} loading="lazy">"#,
        escape_html(src),
        escape_html(alt.unwrap_or("")),
        size_attr
    )
}

/// Truncate a string to `length` characters, omission included
pub fn truncate(s: &str, length: usize) -> String {
    const OMISSION: &str = "...";

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(length.saturating_sub(OMISSION.len())).collect();
        format!("{}{}", truncated.trim_end(), OMISSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_image_tag() {
        let tag = image_tag("/uploads/a.png", Some("A \"cat\""), Some((640, 480)));
        assert_eq!(
            tag,
            r#"<img src="/uploads/a.png" alt="A &quot;cat&quot;" width="640" height="480" loading="lazy">"#
        );
        assert!(image_tag("/a.png", None, None).contains(r#"alt="""#));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 10), "Hi");
    }
}
