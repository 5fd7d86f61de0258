//! Markup helpers for provider-supplied text
//!
//! Search results highlight matched terms with inline tags
//! (`<b>강남</b>구청`) and escape a handful of HTML entities.

/// Remove anything that looks like an HTML tag
///
/// An unterminated `<` swallows the rest of the input, matching how a
/// browser would treat it.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {},
        }
    }
    out
}

/// Decode the entities the search API emits
#[must_use]
pub fn decode_entities(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Strip tags, then decode entities
#[must_use]
pub fn to_plain_text(input: &str) -> String {
    decode_entities(&strip_tags(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_highlight_tags() {
        assert_eq!(strip_tags("<b>강남</b>구청"), "강남구청");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(strip_tags("Gangnam-gu Office"), "Gangnam-gu Office");
    }

    #[test]
    fn unterminated_tag_drops_remainder() {
        assert_eq!(strip_tags("abc<b"), "abc");
    }

    #[test]
    fn decodes_entities_after_stripping() {
        assert_eq!(to_plain_text("<b>Fish</b> &amp; Chips"), "Fish & Chips");
        assert_eq!(to_plain_text("&lt;b&gt;"), "<b>");
    }
}
