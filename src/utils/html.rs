// src/utils/html.rs

/// Strips unsafe markup from user-authored text (journal entries, goal
/// titles and descriptions) using ammonia's whitelist.
///
/// Safe formatting tags survive; `<script>` and its body, event handler
/// attributes and `javascript:` links are removed.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// `clean_html` for optional fields.
pub fn clean_optional(input: Option<&str>) -> Option<String> {
    input.map(clean_html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_script_keeps_formatting() {
        let cleaned = clean_html("<b>Today</b> I practiced<script>alert(1)</script>");
        assert_eq!(cleaned, "<b>Today</b> I practiced");
    }

    #[test]
    fn removes_event_handlers() {
        let cleaned = clean_html(r#"<p onclick="steal()">hi</p>"#);
        assert_eq!(cleaned, "<p>hi</p>");
    }

    #[test]
    fn optional_passes_none_through() {
        assert_eq!(clean_optional(None), None);
        assert_eq!(clean_optional(Some("plain")), Some("plain".to_string()));
    }
}
