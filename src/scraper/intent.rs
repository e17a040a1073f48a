use url::Url;

use crate::scraper::text::find_matched_keywords;

/// Why an item was accepted or rejected by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentReason {
    ExcludeKeywordMatch,
    TrustedJobBoardUrl,
    IncludeKeywordMatch,
    MissingIncludeKeyword,
}

#[derive(Debug, Clone)]
pub struct IntentDecision {
    pub accepted: bool,
    pub reason: IntentReason,
    pub matched: Vec<String>,
}

/// Decide whether an extracted item is a genuine job posting rather than a
/// tender, result or administrative notice. Precedence is deliberate:
/// exclusions guard against procurement/result notices that share job
/// vocabulary, and the trusted-host bypass covers job boards whose listing
/// text never repeats generic "job" keywords.
pub fn classify_job_intent(
    title: &str,
    description: &str,
    item_url: &str,
    source_url: &str,
    include_keywords: &[String],
    exclude_keywords: &[String],
) -> IntentDecision {
    let haystack = format!("{title} {description} {item_url}");

    let excluded = find_matched_keywords(&haystack, exclude_keywords);
    if !excluded.is_empty() {
        return IntentDecision {
            accepted: false,
            reason: IntentReason::ExcludeKeywordMatch,
            matched: owned(excluded),
        };
    }

    if is_trusted_job_board_url(item_url) || is_trusted_job_board_url(source_url) {
        return IntentDecision {
            accepted: true,
            reason: IntentReason::TrustedJobBoardUrl,
            matched: Vec::new(),
        };
    }

    let included = find_matched_keywords(&haystack, include_keywords);
    if !included.is_empty() {
        return IntentDecision {
            accepted: true,
            reason: IntentReason::IncludeKeywordMatch,
            matched: owned(included),
        };
    }

    IntentDecision {
        accepted: false,
        reason: IntentReason::MissingIncludeKeyword,
        matched: Vec::new(),
    }
}

/// A LinkedIn host whose path is a job view or search page. The only
/// trusted job-board family for now.
pub fn is_trusted_job_board_url(raw_url: &str) -> bool {
    let Ok(url) = Url::parse(raw_url) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    is_job_board_host_name(host) && url.path().to_lowercase().contains("/jobs/")
}

/// Host-only check, independent of the URL path. Used to skip PDF
/// enrichment for job boards entirely.
pub fn is_job_board_url(raw_url: &str) -> bool {
    Url::parse(raw_url)
        .ok()
        .and_then(|url| url.host_str().map(is_job_board_host_name))
        .unwrap_or(false)
}

fn is_job_board_host_name(host: &str) -> bool {
    let host = host.to_lowercase();
    host == "linkedin.com" || host.ends_with(".linkedin.com")
}

fn owned(matched: Vec<&str>) -> Vec<String> {
    matched.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn include() -> Vec<String> {
        vec!["job".to_string(), "vacancy".to_string(), "post".to_string()]
    }

    fn exclude() -> Vec<String> {
        vec!["tender".to_string(), "result".to_string()]
    }

    #[test]
    fn exclude_keywords_take_precedence_over_include() {
        let decision = classify_job_intent(
            "Vacancy notice",
            "Tender for supply of office chairs",
            "https://example.gov.in/notice/1",
            "https://example.gov.in",
            &include(),
            &exclude(),
        );
        assert!(!decision.accepted);
        assert_eq!(decision.reason, IntentReason::ExcludeKeywordMatch);
        assert_eq!(decision.matched, vec!["tender"]);
    }

    #[test]
    fn trusted_linkedin_job_url_needs_no_include_keyword() {
        let decision = classify_job_intent(
            "Software Engineer",
            "",
            "https://www.linkedin.com/jobs/view/3791234567",
            "https://www.linkedin.com/jobs/search/?location=Shillong",
            &include(),
            &exclude(),
        );
        assert!(decision.accepted);
        assert_eq!(decision.reason, IntentReason::TrustedJobBoardUrl);
    }

    #[test]
    fn exclude_beats_trusted_host() {
        let decision = classify_job_intent(
            "Interview result announced",
            "",
            "https://www.linkedin.com/jobs/view/99",
            "https://www.linkedin.com/jobs/search/",
            &include(),
            &exclude(),
        );
        assert!(!decision.accepted);
        assert_eq!(decision.reason, IntentReason::ExcludeKeywordMatch);
    }

    #[test]
    fn include_keyword_accepts() {
        let decision = classify_job_intent(
            "Junior Clerk post at District Office",
            "Applications are invited",
            "https://example.gov.in/recruitment/1",
            "https://example.gov.in",
            &include(),
            &exclude(),
        );
        assert!(decision.accepted);
        assert_eq!(decision.reason, IntentReason::IncludeKeywordMatch);
        assert_eq!(decision.matched, vec!["post"]);
    }

    #[test]
    fn no_match_rejects() {
        let decision = classify_job_intent(
            "Annual sports day",
            "The event was a success",
            "https://example.gov.in/news/2",
            "https://example.gov.in",
            &include(),
            &exclude(),
        );
        assert!(!decision.accepted);
        assert_eq!(decision.reason, IntentReason::MissingIncludeKeyword);
    }

    #[test]
    fn linkedin_host_without_jobs_path_is_not_trusted() {
        assert!(!is_trusted_job_board_url("https://www.linkedin.com/company/acme"));
        assert!(is_trusted_job_board_url("https://in.linkedin.com/jobs/view/42"));
        assert!(!is_trusted_job_board_url("not a url"));
    }

    #[test]
    fn job_board_host_check_ignores_path() {
        assert!(is_job_board_url("https://www.linkedin.com/company/acme"));
        assert!(!is_job_board_url("https://megpolice.gov.in/recruitments"));
    }
}
