use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::ScraperConfig;
use crate::error::AppError;
use crate::models::source::{LocationScope, SourceConfig, SourceSelectors};
use crate::scraper::dates::{is_within_lookback, parse_published_date};
use crate::scraper::fetch::fetch_with_retries;
use crate::scraper::intent::classify_job_intent;
use crate::scraper::pdf::enrich_job;
use crate::scraper::services::ScraperServices;
use crate::scraper::text::{find_matched_keywords, normalize_whitespace};
use crate::scraper::{ScrapedJob, SourceStats};

/// Containers shorter than this are navigation crumbs, not listings.
const MIN_CONTAINER_TEXT_CHARS: usize = 20;

/// Meghalaya and its districts/towns, for location-scope checks and
/// region inference. Matched as whole words.
const REGION_KEYWORDS: &[&str] = &[
    "meghalaya",
    "shillong",
    "tura",
    "jowai",
    "nongpoh",
    "nongstoin",
    "williamnagar",
    "baghmara",
    "resubelpara",
    "ampati",
    "mawkyrwat",
    "khliehriat",
    "mairang",
    "ri bhoi",
    "khasi hills",
    "garo hills",
    "jaintia hills",
];

/// Href fragments that mark an anchor as probably pointing at a job page.
const JOB_HREF_TERMS: &[&str] = &["job", "career", "vacancy", "opening", "recruit"];

/// Whole-word vocabulary that marks a container as listing-like.
const JOB_VOCAB_TERMS: &[&str] = &[
    "job",
    "jobs",
    "vacancy",
    "vacancies",
    "recruitment",
    "hiring",
    "career",
    "careers",
    "opening",
    "openings",
    "walk in",
];

const BLOCK_CONTAINER_TAGS: &[&str] = &["article", "li", "section", "div", "tr", "td"];

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

static GENERIC_CONTAINER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article, li, section, tr, div.card, div.job, div.listing")
        .expect("valid selector")
});

static PAGE_TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));

static TITLE_FALLBACK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, .title, .job-title, [class*='title']")
        .expect("valid selector")
});

static LOCATION_FALLBACK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".location, .job-location, [class*='location']").expect("valid selector")
});

static COMPANY_FALLBACK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".company, .employer, .organization, [class*='company']")
        .expect("valid selector")
});

static DESCRIPTION_FALLBACK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".description, .summary, .excerpt, [class*='desc']").expect("valid selector")
});

static DATE_FALLBACK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("time, .date, .posted, .published, [class*='date']").expect("valid selector")
});

/// Raw fields pulled from one container, before any filtering.
#[derive(Debug)]
struct RawItem {
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    description: Option<String>,
    link: Option<String>,
    date_text: Option<String>,
    container_text: String,
}

struct ParsedSelectors {
    job_container: Selector,
    title: Selector,
    link: Selector,
    location: Option<Selector>,
    company: Option<Selector>,
    description: Option<Selector>,
    published_at: Option<Selector>,
}

struct ListingExtract {
    items: Vec<RawItem>,
    page_title: String,
}

/// Scrape one source end to end. Never fails the run: any terminal error is
/// recorded in the stats and a partial (possibly empty) result is returned.
pub async fn scrape_source(
    services: &ScraperServices,
    config: &ScraperConfig,
    source: &SourceConfig,
    lookback_days: i64,
    now: DateTime<Utc>,
    pdf_url_cache: &mut HashMap<String, Option<String>>,
) -> (Vec<ScrapedJob>, SourceStats) {
    let mut stats = SourceStats {
        source: source.name.clone(),
        ..SourceStats::default()
    };
    let mut jobs = Vec::new();
    if let Err(e) = scrape_source_inner(
        services,
        config,
        source,
        lookback_days,
        now,
        pdf_url_cache,
        &mut jobs,
        &mut stats,
    )
    .await
    {
        tracing::warn!("Scrape failed for source '{}': {e}", source.name);
        if matches!(e, AppError::Parse(_)) {
            stats.parse_errors += 1;
        }
        stats.error_message = Some(e.to_string());
    }
    (jobs, stats)
}

#[allow(clippy::too_many_arguments)]
async fn scrape_source_inner(
    services: &ScraperServices,
    config: &ScraperConfig,
    source: &SourceConfig,
    lookback_days: i64,
    now: DateTime<Utc>,
    pdf_url_cache: &mut HashMap<String, Option<String>>,
    jobs: &mut Vec<ScrapedJob>,
    stats: &mut SourceStats,
) -> Result<(), AppError> {
    let selectors = parse_selectors(&source.selectors)?;
    let base = Url::parse(&source.url)
        .map_err(|e| AppError::Parse(format!("source url '{}' is invalid: {e}", source.url)))?;

    let html = fetch_with_retries(services.fetcher.as_ref(), &source.url, config).await?;
    stats.fetched += 1;

    let listing = extract_listing(&html, &selectors, config);
    stats.containers_scanned += listing.items.len() as u32;
    let mut pdf_budget = config.max_pdf_enrichments_per_source;

    for item in listing.items {
        let Some(title) = item.title.clone().filter(|title| !title.is_empty()) else {
            stats.parse_errors += 1;
            continue;
        };
        let Some(url) = item
            .link
            .as_deref()
            .and_then(|href| canonicalize_item_url(&base, href))
        else {
            stats.parse_errors += 1;
            continue;
        };
        stats.extracted += 1;

        let location = resolve_location(&item, &listing.page_title, source);
        if !passes_location_scope(&location, source.location_scope) {
            stats.filtered_by_location += 1;
            continue;
        }

        // An unparseable date is not a rejection: many government notices
        // carry no date at all.
        if let Some(published) =
            parse_published_date(item.date_text.as_deref().unwrap_or(""), &item.container_text, now)
        {
            if !is_within_lookback(published, lookback_days, now) {
                stats.filtered_by_date += 1;
                continue;
            }
        }

        let listing_description = item
            .description
            .clone()
            .filter(|description| !description.is_empty())
            .unwrap_or_else(|| item.container_text.clone());
        let decision = classify_job_intent(
            &title,
            &listing_description,
            &url,
            &source.url,
            &config.include_keywords,
            &config.exclude_keywords,
        );
        if !decision.accepted {
            stats.filtered_by_keyword += 1;
            tracing::debug!("Rejected '{title}' from {url}: {:?}", decision.reason);
            continue;
        }

        let enriched = enrich_job(
            services,
            config,
            &url,
            &source.url,
            &listing_description,
            pdf_url_cache,
            &mut pdf_budget,
            stats,
        )
        .await;

        jobs.push(ScrapedJob {
            title,
            company: item
                .company
                .clone()
                .filter(|company| !company.is_empty())
                .unwrap_or_else(|| source.name.clone()),
            location,
            description: enriched.description,
            source_url: url,
            pdf_source_url: enriched.pdf_source_url,
            pdf_cached_url: enriched.pdf_cached_url,
            source_name: source.name.clone(),
        });
    }
    Ok(())
}

fn parse_selectors(selectors: &SourceSelectors) -> Result<ParsedSelectors, AppError> {
    Ok(ParsedSelectors {
        job_container: parse_required("job_container", &selectors.job_container)?,
        title: parse_required("title", &selectors.title)?,
        link: parse_required("link", &selectors.link)?,
        location: parse_optional("location", &selectors.location)?,
        company: parse_optional("company", &selectors.company)?,
        description: parse_optional("description", &selectors.description)?,
        published_at: parse_optional(
            "published_at",
            selectors.published_at.as_deref().unwrap_or(""),
        )?,
    })
}

fn parse_required(field: &str, value: &str) -> Result<Selector, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Parse(format!("selector '{field}' is empty")));
    }
    Selector::parse(value)
        .map_err(|e| AppError::Parse(format!("selector '{field}' ('{value}') is invalid: {e}")))
}

fn parse_optional(field: &str, value: &str) -> Result<Option<Selector>, AppError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_required(field, value).map(Some)
}

/// Ranked container selection: the configured selector, then job-flavoured
/// anchors expanded to their nearest block ancestor, then generic listing
/// tags. The first non-empty tier wins.
fn extract_listing(html: &str, selectors: &ParsedSelectors, config: &ScraperConfig) -> ListingExtract {
    let document = Html::parse_document(html);
    let page_title = document
        .select(&PAGE_TITLE_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let mut containers: Vec<ElementRef> = document.select(&selectors.job_container).collect();
    if containers.is_empty() {
        containers = anchor_heuristic_containers(&document, config);
    }
    if containers.is_empty() {
        containers = generic_containers(&document, config);
    }

    let items = containers
        .into_iter()
        .take(config.max_items_per_source)
        .map(|container| extract_item(container, selectors))
        .collect();
    ListingExtract { items, page_title }
}

fn anchor_heuristic_containers<'a>(
    document: &'a Html,
    config: &ScraperConfig,
) -> Vec<ElementRef<'a>> {
    let mut seen = HashSet::new();
    let mut containers = Vec::new();
    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.to_lowercase();
        if !JOB_HREF_TERMS.iter().any(|term| href.contains(term)) {
            continue;
        }
        let container = block_ancestor(anchor).unwrap_or(anchor);
        if !container_is_relevant(&element_text(container), config) {
            continue;
        }
        if seen.insert(container.id()) {
            containers.push(container);
        }
    }
    containers
}

fn generic_containers<'a>(document: &'a Html, config: &ScraperConfig) -> Vec<ElementRef<'a>> {
    let mut seen_links = HashSet::new();
    let mut containers = Vec::new();
    for container in document.select(&GENERIC_CONTAINER_SELECTOR) {
        if !container_is_relevant(&element_text(container), config) {
            continue;
        }
        // Nested matches (an article wrapping an li) collapse onto the
        // same primary link.
        if let Some(link) = first_anchor(container).and_then(|anchor| {
            anchor.value().attr("href").map(str::to_string)
        }) {
            if !seen_links.insert(link) {
                continue;
            }
        }
        containers.push(container);
    }
    containers
}

fn container_is_relevant(text: &str, config: &ScraperConfig) -> bool {
    if text.chars().count() < MIN_CONTAINER_TEXT_CHARS {
        return false;
    }
    !find_matched_keywords(text, JOB_VOCAB_TERMS).is_empty()
        || !find_matched_keywords(text, &config.include_keywords).is_empty()
        || !find_matched_keywords(text, REGION_KEYWORDS).is_empty()
}

fn block_ancestor<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| BLOCK_CONTAINER_TAGS.contains(&ancestor.value().name()))
}

fn extract_item(container: ElementRef, selectors: &ParsedSelectors) -> RawItem {
    let container_text = element_text(container);
    let title = first_match_text(container, &selectors.title)
        .or_else(|| first_match_text(container, &TITLE_FALLBACK_SELECTOR))
        .or_else(|| first_anchor(container).map(element_text).filter(|text| !text.is_empty()));
    let company = selectors
        .company
        .as_ref()
        .and_then(|selector| first_match_text(container, selector))
        .or_else(|| first_match_text(container, &COMPANY_FALLBACK_SELECTOR));
    let location = selectors
        .location
        .as_ref()
        .and_then(|selector| first_match_text(container, selector))
        .or_else(|| first_match_text(container, &LOCATION_FALLBACK_SELECTOR));
    let description = selectors
        .description
        .as_ref()
        .and_then(|selector| first_match_text(container, selector))
        .or_else(|| first_match_text(container, &DESCRIPTION_FALLBACK_SELECTOR));
    let link = first_match_href(container, &selectors.link)
        .or_else(|| first_anchor(container).and_then(|anchor| {
            anchor.value().attr("href").map(str::to_string)
        }));
    let date_text = selectors
        .published_at
        .as_ref()
        .and_then(|selector| first_match_date(container, selector))
        .or_else(|| first_match_date(container, &DATE_FALLBACK_SELECTOR));

    RawItem {
        title,
        company,
        location,
        description,
        link,
        date_text,
        container_text,
    }
}

fn element_text(element: ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn first_match_text(container: ElementRef, selector: &Selector) -> Option<String> {
    container
        .select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn first_match_href(container: ElementRef, selector: &Selector) -> Option<String> {
    container
        .select(selector)
        .find_map(|element| element.value().attr("href").map(str::to_string))
}

// Prefers a machine-readable datetime attribute over display text.
fn first_match_date(container: ElementRef, selector: &Selector) -> Option<String> {
    container.select(selector).find_map(|element| {
        element
            .value()
            .attr("datetime")
            .map(str::to_string)
            .or_else(|| {
                let text = element_text(element);
                (!text.is_empty()).then_some(text)
            })
    })
}

fn first_anchor(container: ElementRef) -> Option<ElementRef> {
    if container.value().name() == "a" && container.value().attr("href").is_some() {
        return Some(container);
    }
    container.select(&ANCHOR_SELECTOR).next()
}

/// Canonical item URL: resolved against the source base, query string and
/// fragment stripped so tracking parameters never split one posting into
/// several rows. Non-HTTP schemes are dropped.
fn canonicalize_item_url(base: &Url, href: &str) -> Option<String> {
    let mut url = base.join(href.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

/// The explicit location field when present, otherwise the first regional
/// keyword found in the container text, page title or source hints.
fn resolve_location(item: &RawItem, page_title: &str, source: &SourceConfig) -> String {
    if let Some(location) = item.location.as_deref().map(str::trim) {
        if !location.is_empty() {
            return location.to_string();
        }
    }
    for text in [
        item.container_text.as_str(),
        page_title,
        source.name.as_str(),
        source.url.as_str(),
    ] {
        if let Some(keyword) = find_matched_keywords(text, REGION_KEYWORDS).first() {
            return title_case(keyword);
        }
    }
    String::new()
}

fn passes_location_scope(location: &str, scope: LocationScope) -> bool {
    match scope {
        LocationScope::AllLocations => true,
        LocationScope::MeghalayaOnly => !find_matched_keywords(location, REGION_KEYWORDS).is_empty(),
    }
}

fn title_case(words: &str) -> String {
    words
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;
    use crate::scraper::testing::{MapFetcher, StubPdfCache, StubTextExtractor, services_with};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    fn full_selectors() -> SourceSelectors {
        SourceSelectors {
            job_container: ".job".to_string(),
            title: ".title".to_string(),
            location: ".location".to_string(),
            company: ".company".to_string(),
            link: "a".to_string(),
            description: ".description".to_string(),
            published_at: Some(".date".to_string()),
        }
    }

    fn test_source(selectors: SourceSelectors, scope: LocationScope) -> SourceConfig {
        SourceConfig {
            name: "Education Department".to_string(),
            url: "https://education.gov.in/vacancies".to_string(),
            location_scope: scope,
            selectors,
        }
    }

    fn services_for(fetcher: MapFetcher) -> ScraperServices {
        services_with(
            Arc::new(fetcher),
            Arc::new(StubPdfCache::default()),
            Arc::new(StubTextExtractor::default()),
        )
    }

    const LISTING_URL: &str = "https://education.gov.in/vacancies";

    fn listing_html(location: &str) -> String {
        format!(
            r#"<html><head><title>Vacancies</title></head><body>
                <div class="job">
                    <h3 class="title">Junior Clerk Recruitment</h3>
                    <span class="location">{location}</span>
                    <span class="date">2 days ago</span>
                    <a href="/jobs/junior-clerk?utm_source=feed#details">View</a>
                    <p class="description">Applications are invited for the post of Junior Clerk.</p>
                </div>
            </body></html>"#
        )
    }

    #[tokio::test]
    async fn extracts_and_keeps_in_region_recent_item() {
        let fetcher = MapFetcher::default().with_html(LISTING_URL, &listing_html("Shillong, Meghalaya"));
        let services = services_for(fetcher);
        let source = test_source(full_selectors(), LocationScope::MeghalayaOnly);
        let mut pdf_url_cache = HashMap::new();

        let (jobs, stats) = scrape_source(
            &services,
            &ScraperConfig::default(),
            &source,
            10,
            fixed_now(),
            &mut pdf_url_cache,
        )
        .await;

        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.title, "Junior Clerk Recruitment");
        assert!(job.location.contains("Meghalaya"));
        assert_eq!(job.source_url, "https://education.gov.in/jobs/junior-clerk");
        assert_eq!(job.company, "Education Department");
        assert_eq!(job.source_name, "Education Department");
        assert_eq!(stats.fetched, 1);
        assert_eq!(stats.containers_scanned, 1);
        assert_eq!(stats.extracted, 1);
        assert_eq!(stats.filtered_by_location, 0);
        assert_eq!(stats.filtered_by_date, 0);
        assert!(stats.error_message.is_none());
    }

    #[tokio::test]
    async fn out_of_region_location_is_filtered() {
        let fetcher = MapFetcher::default().with_html(LISTING_URL, &listing_html("Mumbai, Maharashtra"));
        let services = services_for(fetcher);
        let source = test_source(full_selectors(), LocationScope::MeghalayaOnly);
        let mut pdf_url_cache = HashMap::new();

        let (jobs, stats) = scrape_source(
            &services,
            &ScraperConfig::default(),
            &source,
            10,
            fixed_now(),
            &mut pdf_url_cache,
        )
        .await;

        assert!(jobs.is_empty());
        assert_eq!(stats.extracted, 1);
        assert_eq!(stats.filtered_by_location, 1);
    }

    #[tokio::test]
    async fn stale_item_is_filtered_by_date() {
        let html = listing_html("Shillong, Meghalaya").replace("2 days ago", "15/02/2024");
        let fetcher = MapFetcher::default().with_html(LISTING_URL, &html);
        let services = services_for(fetcher);
        let source = test_source(full_selectors(), LocationScope::MeghalayaOnly);
        let mut pdf_url_cache = HashMap::new();

        let (jobs, stats) = scrape_source(
            &services,
            &ScraperConfig::default(),
            &source,
            10,
            fixed_now(),
            &mut pdf_url_cache,
        )
        .await;

        assert!(jobs.is_empty());
        assert_eq!(stats.filtered_by_date, 1);
    }

    #[tokio::test]
    async fn empty_required_selector_fails_fast() {
        let services = services_for(MapFetcher::default());
        let mut selectors = full_selectors();
        selectors.job_container = String::new();
        let source = test_source(selectors, LocationScope::MeghalayaOnly);
        let mut pdf_url_cache = HashMap::new();

        let (jobs, stats) = scrape_source(
            &services,
            &ScraperConfig::default(),
            &source,
            10,
            fixed_now(),
            &mut pdf_url_cache,
        )
        .await;

        assert!(jobs.is_empty());
        assert_eq!(stats.parse_errors, 1);
        assert_eq!(stats.fetched, 0);
        assert!(stats.error_message.as_deref().unwrap().contains("job_container"));
    }

    #[tokio::test]
    async fn fetch_failure_is_recorded_not_propagated() {
        let services = services_for(MapFetcher::default());
        let source = test_source(full_selectors(), LocationScope::MeghalayaOnly);
        let mut pdf_url_cache = HashMap::new();

        let (jobs, stats) = scrape_source(
            &services,
            &ScraperConfig::default(),
            &source,
            10,
            fixed_now(),
            &mut pdf_url_cache,
        )
        .await;

        assert!(jobs.is_empty());
        assert!(stats.error_message.is_some());
        assert_eq!(stats.parse_errors, 0);
    }

    #[tokio::test]
    async fn heuristic_containers_cover_unconfigured_markup() {
        let html = r#"<html><head><title>Notices</title></head><body>
            <ul>
                <li>Vacancy: Staff Nurse at Shillong Civil Hospital.
                    <a href="/recruitment/staff-nurse-2024">details</a> published 12/03/2024</li>
                <li><a href="/about">About us</a></li>
            </ul>
        </body></html>"#;
        let fetcher = MapFetcher::default().with_html(LISTING_URL, html);
        let services = services_for(fetcher);
        let source = test_source(full_selectors(), LocationScope::MeghalayaOnly);
        let mut pdf_url_cache = HashMap::new();

        let (jobs, stats) = scrape_source(
            &services,
            &ScraperConfig::default(),
            &source,
            10,
            fixed_now(),
            &mut pdf_url_cache,
        )
        .await;

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source_url, "https://education.gov.in/recruitment/staff-nurse-2024");
        assert_eq!(jobs[0].location, "Shillong");
        assert_eq!(stats.containers_scanned, 1);
    }

    #[tokio::test]
    async fn item_cap_bounds_containers_scanned() {
        let item = r#"<div class="job"><h3 class="title">Peon Post {n}</h3>
            <span class="location">Tura, Meghalaya</span>
            <a href="/jobs/peon-{n}">View</a></div>"#;
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            item.replace("{n}", "1"),
            item.replace("{n}", "2"),
            item.replace("{n}", "3"),
        );
        let fetcher = MapFetcher::default().with_html(LISTING_URL, &html);
        let services = services_for(fetcher);
        let source = test_source(full_selectors(), LocationScope::MeghalayaOnly);
        let config = ScraperConfig {
            max_items_per_source: 2,
            ..ScraperConfig::default()
        };
        let mut pdf_url_cache = HashMap::new();

        let (jobs, stats) = scrape_source(&services, &config, &source, 10, fixed_now(), &mut pdf_url_cache).await;

        assert_eq!(stats.containers_scanned, 2);
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn canonicalization_strips_query_and_fragment() {
        let base = Url::parse("https://education.gov.in/vacancies").unwrap();
        assert_eq!(
            canonicalize_item_url(&base, "/jobs/clerk?utm_campaign=x&ref=feed#apply").unwrap(),
            "https://education.gov.in/jobs/clerk"
        );
        assert_eq!(
            canonicalize_item_url(&base, "https://other.gov.in/jobs/clerk").unwrap(),
            "https://other.gov.in/jobs/clerk"
        );
        assert!(canonicalize_item_url(&base, "mailto:jobs@education.gov.in").is_none());
    }

    #[test]
    fn location_inference_walks_fallback_chain() {
        let item = RawItem {
            title: Some("Clerk".to_string()),
            company: None,
            location: None,
            description: None,
            link: None,
            date_text: None,
            container_text: "Clerk post at district office".to_string(),
        };
        let source = test_source(full_selectors(), LocationScope::MeghalayaOnly);
        let location = resolve_location(&item, "Government of Meghalaya - Vacancies", &source);
        assert_eq!(location, "Meghalaya");
        assert!(passes_location_scope(&location, LocationScope::MeghalayaOnly));
        assert!(!passes_location_scope("Mumbai", LocationScope::MeghalayaOnly));
        assert!(passes_location_scope("", LocationScope::AllLocations));
    }
}
