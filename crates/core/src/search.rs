//! Search helpers shared by list endpoints.

/// Maximum length of a free-text search term.
pub const MAX_SEARCH_LEN: usize = 200;

/// Build a `LIKE`/`ILIKE` pattern matching `term` anywhere in the text.
///
/// `%`, `_` and the escape character itself are escaped with `\`, which is
/// PostgreSQL's default `LIKE` escape, so user input always matches literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Trim a search term, treating blank input as no search.
pub fn normalize_term(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.chars().take(MAX_SEARCH_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_term_is_wrapped() {
        assert_eq!(like_pattern("hello"), "%hello%");
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn blank_terms_are_ignored() {
        assert_eq!(normalize_term(None), None);
        assert_eq!(normalize_term(Some("   ")), None);
        assert_eq!(normalize_term(Some("  hero ")), Some("hero".to_string()));
    }
}
