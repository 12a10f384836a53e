//! Embedding text composition.
//!
//! The text that gets embedded for a gem is composed from its metadata
//! fields in a fixed order, with empty sources omitted. Composition is
//! separated from embedding so the provider only ever sees a single string.

/// Character budget for the README section. Bounds embedding cost on
/// arbitrarily long documentation.
pub const README_CHAR_BUDGET: usize = 2000;

/// Compose the text to embed for a gem.
///
/// Sections appear in fixed order (name, description, comma-joined
/// keywords, bounded README prefix), each labelled and joined by newlines.
/// Sections whose source field is empty are omitted entirely.
pub fn compose_embedding_text(
    name: &str,
    description: &str,
    keywords: &[String],
    readme: &str,
) -> String {
    let mut parts = Vec::new();

    if !name.is_empty() {
        parts.push(format!("Gem: {name}"));
    }

    if !description.is_empty() {
        parts.push(format!("Description: {description}"));
    }

    if !keywords.is_empty() {
        parts.push(format!("Keywords: {}", keywords.join(", ")));
    }

    if !readme.is_empty() {
        parts.push(format!(
            "Documentation: {}",
            truncate_chars(readme, README_CHAR_BUDGET)
        ));
    }

    parts.join("\n")
}

/// Truncate a string to at most `budget` characters, on a char boundary.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_all_sections() {
        let keywords = vec!["web".to_string(), "mvc".to_string()];
        let text = compose_embedding_text("rails", "A web framework.", &keywords, "README body");

        assert_eq!(
            text,
            "Gem: rails\nDescription: A web framework.\nKeywords: web, mvc\nDocumentation: README body"
        );
    }

    #[test]
    fn test_compose_omits_empty_sections() {
        let text = compose_embedding_text("rails", "", &[], "");
        assert_eq!(text, "Gem: rails");

        let text = compose_embedding_text("", "", &[], "");
        assert!(text.is_empty());
    }

    #[test]
    fn test_compose_section_order_is_fixed() {
        let keywords = vec!["testing".to_string()];
        let text = compose_embedding_text("rspec", "BDD framework", &keywords, "docs");

        let name_at = text.find("Gem:").unwrap();
        let desc_at = text.find("Description:").unwrap();
        let kw_at = text.find("Keywords:").unwrap();
        let doc_at = text.find("Documentation:").unwrap();
        assert!(name_at < desc_at && desc_at < kw_at && kw_at < doc_at);
    }

    #[test]
    fn test_readme_truncated_to_budget() {
        let readme = "x".repeat(README_CHAR_BUDGET * 2);
        let text = compose_embedding_text("gem", "", &[], &readme);

        // "Documentation: " prefix plus exactly the budget of README chars.
        assert_eq!(text.chars().count(), "Documentation: ".len() + README_CHAR_BUDGET);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        // Multi-byte characters must not be split.
        let text = "héllo wörld";
        let cut = truncate_chars(text, 4);
        assert_eq!(cut, "héll");

        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 10), "");
    }
}
