//! Markup escaping for user-controlled message text.
//!
//! Message text is fully attacker controlled. Every presenter that inserts
//! it into markup must pass it through [`escape_text`] first so raw text can
//! never be interpreted as structural content. This is a strict contract of
//! the rendering path, not an optimization.

use std::borrow::Cow;

/// Escape the markup-significant characters `&`, `<`, `>`, `"` and `'`.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>' | '"' | '\'');
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_text("follow the white rabbit"), Cow::Borrowed(_)));
    }

    #[test]
    fn structural_characters_are_neutralized() {
        assert_eq!(
            escape_text("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_text(r#"a "b" & c"#), "a &quot;b&quot; &amp; c");
    }

    #[test]
    fn ampersand_is_escaped_first_pass_only() {
        // No double escaping: the output of one pass contains '&' but a
        // presenter escapes raw text exactly once.
        assert_eq!(escape_text("&lt;"), "&amp;lt;");
    }

    proptest::proptest! {
        #[test]
        fn output_never_contains_structural_characters(text in ".*") {
            let escaped = escape_text(&text);
            proptest::prop_assert!(!escaped.contains('<'));
            proptest::prop_assert!(!escaped.contains('>'));
            proptest::prop_assert!(!escaped.contains('"'));
            proptest::prop_assert!(!escaped.contains('\''));
        }
    }
}
