// Text normalization and keyword matching shared by the classifier, the
// container heuristics, and the PDF field extractors.

/// Built-in include keywords: an item must mention one of these (whole-word)
/// to be treated as a job posting, unless a trusted job-board URL vouches
/// for it. Overridable through INCLUDE_KEYWORDS.
pub const DEFAULT_INCLUDE_KEYWORDS: &[&str] = &[
    "job",
    "jobs",
    "vacancy",
    "vacancies",
    "recruitment",
    "recruitments",
    "hiring",
    "post",
    "posts",
    "position",
    "positions",
    "opening",
    "openings",
    "career",
    "careers",
    "employment",
    "engagement",
    "apply",
    "interview",
    "walk in interview",
];

/// Built-in exclude keywords: government sites mix job notices with tenders,
/// exam results and administrative orders that share much of the same
/// vocabulary. A match here rejects the item outright. Overridable through
/// EXCLUDE_KEYWORDS.
pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &[
    "tender",
    "tenders",
    "quotation",
    "quotations",
    "procurement",
    "auction",
    "bid",
    "bids",
    "result",
    "results",
    "merit list",
    "answer key",
    "admit card",
    "hall ticket",
    "syllabus",
    "seniority list",
    "transfer",
    "postponed",
    "cancelled",
];

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase, replace every non-alphanumeric character with a space, and
/// collapse the result. Makes "Walk-In Interview!" and "walk in interview"
/// compare equal.
pub fn normalize_for_keyword_match(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    normalize_whitespace(&replaced)
}

/// Return the keywords that occur in `text` as whole words (or whole
/// phrases), in keyword-list order. Matching is space-padded so "post"
/// never matches inside "postpone" or "outpost".
pub fn find_matched_keywords<'a, S: AsRef<str>>(text: &str, keywords: &'a [S]) -> Vec<&'a str> {
    let haystack = format!(" {} ", normalize_for_keyword_match(text));
    keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|keyword| {
            let needle = normalize_for_keyword_match(keyword);
            !needle.is_empty() && haystack.contains(&format!(" {needle} "))
        })
        .collect()
}

/// Parse a comma-separated keyword override. The override replaces the
/// fallback entirely iff it yields at least one non-empty token; otherwise
/// the fallback list is used as-is.
pub fn parse_keyword_list(override_value: Option<&str>, fallback: &[&str]) -> Vec<String> {
    if let Some(raw) = override_value {
        let tokens: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        if !tokens.is_empty() {
            return tokens;
        }
    }
    fallback.iter().map(|s| s.to_string()).collect()
}

/// Truncate to at most `max_chars` characters, never splitting a UTF-8
/// code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(normalize_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn keyword_normalization_strips_punctuation() {
        assert_eq!(
            normalize_for_keyword_match("Walk-In INTERVIEW! (Shillong)"),
            "walk in interview shillong"
        );
    }

    #[test]
    fn whole_word_matching_rejects_substrings() {
        let keywords = vec!["post".to_string()];
        assert!(find_matched_keywords("outpost near the border", &keywords).is_empty());
        assert!(find_matched_keywords("the event was postponed", &keywords).is_empty());
        assert_eq!(
            find_matched_keywords("new job post today", &keywords),
            vec!["post"]
        );
    }

    #[test]
    fn matches_preserve_keyword_order() {
        let keywords = vec![
            "vacancy".to_string(),
            "recruitment".to_string(),
            "job".to_string(),
        ];
        let matched = find_matched_keywords("Job vacancy at the recruitment cell", &keywords);
        assert_eq!(matched, vec!["vacancy", "recruitment", "job"]);
    }

    #[test]
    fn multi_word_keywords_match_as_phrases() {
        let keywords = vec!["walk in interview".to_string()];
        assert_eq!(
            find_matched_keywords("Walk-in interview on Monday", &keywords),
            vec!["walk in interview"]
        );
        assert!(find_matched_keywords("interview walk on Monday in town", &keywords).is_empty());
    }

    #[test]
    fn override_replaces_fallback_entirely() {
        let parsed = parse_keyword_list(Some("clerk, peon ,driver"), DEFAULT_INCLUDE_KEYWORDS);
        assert_eq!(parsed, vec!["clerk", "peon", "driver"]);
    }

    #[test]
    fn blank_override_falls_back() {
        let parsed = parse_keyword_list(Some(" , ,"), &["job", "vacancy"]);
        assert_eq!(parsed, vec!["job", "vacancy"]);
        let parsed = parse_keyword_list(None, &["job"]);
        assert_eq!(parsed, vec!["job"]);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("abcdef", 4), "abcd");
        assert_eq!(truncate_chars("abc", 10), "abc");
        // Two-byte characters must not be split mid-sequence.
        assert_eq!(truncate_chars("₹₹₹₹", 2), "₹₹");
    }
}
