use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::ScraperConfig;
use crate::scraper::SourceStats;
use crate::scraper::intent::is_job_board_url;
use crate::scraper::services::ScraperServices;
use crate::scraper::text::{
    find_matched_keywords, normalize_for_keyword_match, normalize_whitespace, truncate_chars,
};

/// Ceiling on the merged description persisted per job.
const MAX_DESCRIPTION_CHARS: usize = 25_000;

/// Candidate PDFs examined per item. Caching happens for each; text
/// extraction additionally spends the per-source enrichment budget.
const MAX_PDF_CANDIDATES: usize = 3;

/// Chars scanned after a date keyword for an inline date token.
const DATE_WINDOW_CHARS: usize = 100;

/// Deadline synonyms, most specific first.
pub const APPLICATION_DATE_KEYWORDS: &[&str] = &[
    "last date of application",
    "last date for application",
    "last date of receipt",
    "last date for receipt",
    "last date of submission",
    "last date for submission",
    "last date",
    "closing date",
    "applications close",
    "apply before",
    "apply by",
    "deadline",
];

pub const NOTIFICATION_DATE_KEYWORDS: &[&str] = &[
    "date of notification",
    "notification date",
    "date of advertisement",
    "advertisement date",
    "date of issue",
    "published on",
    "dated",
];

/// Context vocabulary for scoring PDF candidates. Recruitment terms weigh
/// three, organization terms one.
const RECRUITMENT_CONTEXT_TERMS: &[&str] = &[
    "recruitment",
    "vacancy",
    "vacancies",
    "job",
    "jobs",
    "post",
    "posts",
    "advertisement",
    "notification",
    "apply",
    "application",
    "engagement",
    "walk in",
];

const ORGANIZATION_CONTEXT_TERMS: &[&str] = &[
    "government",
    "govt",
    "meghalaya",
    "department",
    "directorate",
    "commission",
    "board",
    "office",
    "secretariat",
];

static PDF_SOURCE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href], iframe[src], embed[src], object[data]").expect("valid selector")
});

static LABELLED_SALARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:salary|pay\s*scale|pay\s*band|scale\s*of\s*pay|remuneration|emoluments?|honorarium|consolidated\s*(?:pay|salary))\s*[:\-]\s*([^\r\n]{3,120})",
    )
    .expect("valid regex")
});

static CURRENCY_SALARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:₹|\brs\.?|\binr\b)\s*\d[\d,]*(?:\.\d+)?(?:\s*(?:-|to)\s*(?:₹|rs\.?|inr)?\s*\d[\d,]*(?:\.\d+)?)?(?:\s*/-)?(?:\s*(?:per\s+month|per\s+annum|per\s+year|p\.?m\.?|p\.?a\.?|lpa|monthly|annually))?",
    )
    .expect("valid regex")
});

static NORMS_SALARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bas\s+per\s+(?:\w+\.?\s+){0,2}norms\b").expect("valid regex"));

static INLINE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:\d{4}-\d{2}-\d{2}|\d{1,2}[./-]\d{1,2}[./-]\d{2,4}|\d{1,2}(?:st|nd|rd|th)?\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+\d{4}|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4})\b",
    )
    .expect("valid regex")
});

/// Tags whose text never belongs in a job description.
const SKIPPED_TEXT_TAGS: &[&str] = &[
    "script", "style", "noscript", "svg", "iframe", "form", "nav", "header", "footer", "aside",
];

/// Fields pulled out of extracted PDF text.
#[derive(Debug, Default, PartialEq)]
pub struct ExtractedPdfFields {
    pub salary: Option<String>,
    pub application_last_date: Option<String>,
    pub notification_date: Option<String>,
}

impl ExtractedPdfFields {
    pub fn count(&self) -> u32 {
        [
            self.salary.is_some(),
            self.application_last_date.is_some(),
            self.notification_date.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count() as u32
    }

    fn description_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(salary) = &self.salary {
            lines.push(format!("Salary: {salary}"));
        }
        if let Some(date) = &self.application_last_date {
            lines.push(format!("Application Last Date: {date}"));
        }
        if let Some(date) = &self.notification_date {
            lines.push(format!("Notification Date: {date}"));
        }
        lines
    }
}

/// What enrichment produced for one job.
#[derive(Debug)]
pub struct Enrichment {
    pub description: String,
    pub pdf_source_url: Option<String>,
    pub pdf_cached_url: Option<String>,
}

/// Job boards never need PDF enrichment; government pages usually publish
/// the substantive notice as a linked PDF, so those always qualify, as does
/// an item that is itself a PDF.
pub fn should_attempt_pdf_enrichment(item_url: &str, source_url: &str) -> bool {
    if is_job_board_url(item_url) || is_job_board_url(source_url) {
        return false;
    }
    url_path_is_pdf(item_url) || is_government_host(item_url) || is_government_host(source_url)
}

pub(crate) fn url_path_is_pdf(raw_url: &str) -> bool {
    match Url::parse(raw_url) {
        Ok(url) => url.path().to_ascii_lowercase().ends_with(".pdf"),
        Err(_) => false,
    }
}

fn is_government_host(raw_url: &str) -> bool {
    let Ok(url) = Url::parse(raw_url) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    host.ends_with(".gov") || host.ends_with(".gov.in") || host == "gov.in"
}

/// Collects `.pdf` URLs referenced by anchors, iframes, embeds and objects,
/// resolved against `base_url`, highest contextual score first.
pub fn pdf_candidates_from_html(html: &str, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut scored: Vec<(String, u32)> = Vec::new();
    for element in document.select(&PDF_SOURCE_SELECTOR) {
        let attr = match element.value().name() {
            "a" => "href",
            "object" => "data",
            _ => "src",
        };
        let Some(raw) = element.value().attr(attr) else {
            continue;
        };
        let Ok(resolved) = base.join(raw.trim()) else {
            continue;
        };
        if !resolved.path().to_ascii_lowercase().ends_with(".pdf") {
            continue;
        }
        let candidate = resolved.to_string();
        if !seen.insert(candidate.clone()) {
            continue;
        }
        let score = score_candidate_context(&candidate_context(element));
        scored.push((candidate, score));
    }
    scored.sort_by_key(|(_, score)| Reverse(*score));
    scored.into_iter().map(|(url, _)| url).collect()
}

// Parent text is consulted only for elements that carry no text of their
// own (iframes, embeds), otherwise one labelled link would lend its score
// to every sibling.
fn candidate_context(element: ElementRef) -> String {
    let mut parts: Vec<String> = vec![element.text().collect::<Vec<_>>().join(" ")];
    for attr in ["title", "class", "aria-label"] {
        if let Some(value) = element.value().attr(attr) {
            parts.push(value.to_string());
        }
    }
    if parts.iter().all(|part| part.trim().is_empty()) {
        if let Some(parent) = element.parent().and_then(ElementRef::wrap) {
            parts.push(parent.text().collect::<Vec<_>>().join(" "));
        }
    }
    normalize_whitespace(&parts.join(" "))
}

fn score_candidate_context(context: &str) -> u32 {
    let recruitment = find_matched_keywords(context, RECRUITMENT_CONTEXT_TERMS).len() as u32;
    let organization = find_matched_keywords(context, ORGANIZATION_CONTEXT_TERMS).len() as u32;
    recruitment * 3 + organization
}

/// Salary extraction: labelled value first, then a bare currency figure,
/// then the "as per norms" phrasing common in engagement notices.
pub fn extract_salary(text: &str) -> Option<String> {
    if let Some(caps) = LABELLED_SALARY_RE.captures(text) {
        if let Some(value) = caps.get(1) {
            let value = normalize_whitespace(value.as_str());
            let value = value.trim_end_matches(['.', ',', ';']).trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    if let Some(found) = CURRENCY_SALARY_RE.find(text) {
        return Some(normalize_whitespace(found.as_str()));
    }
    NORMS_SALARY_RE
        .find(text)
        .map(|found| normalize_whitespace(found.as_str()))
}

/// Finds the first inline date token within [`DATE_WINDOW_CHARS`] after any
/// of `keywords`, tried in list order. Keywords must be lowercase ASCII.
pub fn extract_date_by_keywords(text: &str, keywords: &[&str]) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    for keyword in keywords {
        for (idx, _) in lower.match_indices(keyword) {
            let window = truncate_chars(&text[idx + keyword.len()..], DATE_WINDOW_CHARS);
            if let Some(found) = INLINE_DATE_RE.find(&window) {
                return Some(found.as_str().to_string());
            }
        }
    }
    None
}

pub fn extract_pdf_fields(text: &str) -> ExtractedPdfFields {
    ExtractedPdfFields {
        salary: extract_salary(text),
        application_last_date: extract_date_by_keywords(text, APPLICATION_DATE_KEYWORDS),
        notification_date: extract_date_by_keywords(text, NOTIFICATION_DATE_KEYWORDS),
    }
}

/// Merges two description texts. When one side already contains the other
/// (after normalization) only the superset is kept, so boilerplate repeated
/// between the listing and the detail page is not duplicated.
pub fn merge_description_text(a: &str, b: &str) -> String {
    let a = a.trim();
    let b = b.trim();
    if a.is_empty() {
        return b.to_string();
    }
    if b.is_empty() {
        return a.to_string();
    }
    let norm_a = normalize_for_keyword_match(a);
    let norm_b = normalize_for_keyword_match(b);
    if norm_a.contains(&norm_b) {
        return a.to_string();
    }
    if norm_b.contains(&norm_a) {
        return b.to_string();
    }
    format!("{a}\n\n{b}")
}

/// Visible body text of an HTML page, boilerplate tags skipped.
pub fn html_body_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<String> = Vec::new();
    collect_visible_text(document.root_element(), &mut parts);
    normalize_whitespace(&parts.join(" "))
}

fn collect_visible_text(element: ElementRef, parts: &mut Vec<String>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if SKIPPED_TEXT_TAGS.contains(&child_element.value().name()) {
                continue;
            }
            collect_visible_text(child_element, parts);
        } else if let Some(text) = child.value().as_text() {
            parts.push(text.text.to_string());
        }
    }
}

/// Runs PDF enrichment for one accepted job.
///
/// Detail-page and extraction failures are soft: the job keeps its listing
/// description and the first-seen PDF URL/cache as metadata. The first
/// candidate that yields text wins. `pdf_url_cache` spans the whole run so
/// a PDF referenced from several listings is cached once; `pdf_budget` is
/// the source's remaining text-extraction allowance.
pub async fn enrich_job(
    services: &ScraperServices,
    config: &ScraperConfig,
    item_url: &str,
    source_url: &str,
    listing_description: &str,
    pdf_url_cache: &mut HashMap<String, Option<String>>,
    pdf_budget: &mut usize,
    stats: &mut SourceStats,
) -> Enrichment {
    if !should_attempt_pdf_enrichment(item_url, source_url) {
        return Enrichment {
            description: truncate_chars(listing_description.trim(), MAX_DESCRIPTION_CHARS),
            pdf_source_url: None,
            pdf_cached_url: None,
        };
    }

    let mut detail_text = String::new();
    let candidates = if url_path_is_pdf(item_url) {
        vec![item_url.to_string()]
    } else {
        match services.fetcher.fetch_html(item_url, config.timeout_ms).await {
            Ok(html) => {
                stats.fetched += 1;
                detail_text = html_body_text(&html);
                pdf_candidates_from_html(&html, item_url)
            }
            Err(e) => {
                tracing::warn!("Detail page fetch failed for {item_url}: {e}");
                Vec::new()
            }
        }
    };

    let base_description = merge_description_text(listing_description, &detail_text);
    let mut first_pdf_url: Option<String> = None;
    let mut first_cached_url: Option<String> = None;

    for candidate in candidates.into_iter().take(MAX_PDF_CANDIDATES) {
        let cached_url = match pdf_url_cache.get(&candidate) {
            Some(cached) => cached.clone(),
            None => {
                let cached = services.pdf_cache.cache_pdf(&candidate).await;
                pdf_url_cache.insert(candidate.clone(), cached.clone());
                cached
            }
        };
        if first_pdf_url.is_none() {
            first_pdf_url = Some(candidate.clone());
            first_cached_url = cached_url.clone();
        }

        if *pdf_budget == 0 {
            continue;
        }
        *pdf_budget -= 1;
        stats.pdf_detail_attempts += 1;

        match services.text_extractor.extract_text(&candidate).await {
            Some(text) if !text.trim().is_empty() => {
                stats.pdf_detail_successes += 1;
                let fields = extract_pdf_fields(&text);
                stats.pdf_fields_extracted += fields.count();

                let mut parts: Vec<String> = Vec::new();
                if !base_description.is_empty() {
                    parts.push(base_description.clone());
                }
                parts.extend(fields.description_lines());
                parts.push(format!("PDF Source: {candidate}"));
                parts.push(text.trim().to_string());
                return Enrichment {
                    description: truncate_chars(&parts.join("\n\n"), MAX_DESCRIPTION_CHARS),
                    pdf_source_url: Some(candidate),
                    pdf_cached_url: cached_url,
                };
            }
            _ => {
                stats.pdf_detail_failures += 1;
            }
        }
    }

    Enrichment {
        description: truncate_chars(&base_description, MAX_DESCRIPTION_CHARS),
        pdf_source_url: first_pdf_url,
        pdf_cached_url: first_cached_url,
    }
}
