//! DuckDuckGo text search over the HTML endpoint

use super::error::EngineError;
use super::traits::*;
use crate::config::{OutgoingSettings, Settings, DEFAULT_HTML_URL};
use crate::network::{accept_language, HttpClient};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;
use url::Url;

/// Upper bound on pages fetched for one query
const MAX_PAGES: usize = 10;

static RESULT_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("div.result"));
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("a.result__a"));
static SNIPPET_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(".result__snippet"));
static NAV_FORM_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("div.nav-link form"));
static HIDDEN_INPUT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| selector(r#"input[type="hidden"]"#));
static SUBMIT_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"input[type="submit"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// DuckDuckGo web search backend
#[derive(Debug, Clone)]
pub struct DuckDuckGo {
    html_url: String,
    options: TextOptions,
    outgoing: OutgoingSettings,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self {
            html_url: DEFAULT_HTML_URL.to_string(),
            options: TextOptions::default(),
            outgoing: OutgoingSettings::default(),
        }
    }

    /// Build the backend from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            html_url: settings.search.html_url.clone(),
            options: settings.text_options(),
            outgoing: settings.outgoing.clone(),
        }
    }

    /// Point the backend at another endpoint
    pub fn with_html_url(mut self, url: impl Into<String>) -> Self {
        self.html_url = url.into();
        self
    }

    pub fn with_options(mut self, options: TextOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &TextOptions {
        &self.options
    }

    pub fn html_url(&self) -> &str {
        &self.html_url
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextSearch for DuckDuckGo {
    type Session = DuckDuckGoSession;

    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn open(&self) -> anyhow::Result<DuckDuckGoSession> {
        let client = HttpClient::with_settings(&self.outgoing)?;
        debug!(
            "Opened DuckDuckGo session on {} as '{}'",
            self.html_url,
            client.user_agent()
        );

        Ok(DuckDuckGoSession {
            client,
            html_url: self.html_url.clone(),
            options: self.options.clone(),
        })
    }
}

/// Session on the DuckDuckGo HTML endpoint.
///
/// Owns an HTTP client with its own cookie jar; dropping the session closes
/// its connections.
pub struct DuckDuckGoSession {
    client: HttpClient,
    html_url: String,
    options: TextOptions,
}

impl DuckDuckGoSession {
    /// Form for the first page of `query`
    fn first_form(&self, query: &str) -> HashMap<String, String> {
        let mut form = HashMap::new();
        form.insert("q".to_string(), query.to_string());
        form.insert("b".to_string(), String::new());
        form.insert("kl".to_string(), self.options.region.clone());
        self.apply_filters(&mut form);
        form
    }

    /// Safe search and time limit must ride along on every page
    fn apply_filters(&self, form: &mut HashMap<String, String>) {
        form.entry("kp".to_string())
            .or_insert_with(|| self.options.safesearch.as_param().to_string());
        if let Some(limit) = self.options.timelimit {
            form.entry("df".to_string())
                .or_insert_with(|| limit.as_param().to_string());
        }
    }

    async fn fetch_page(&self, mut form: HashMap<String, String>) -> anyhow::Result<Page> {
        self.apply_filters(&mut form);

        let request = EngineRequest::post(&self.html_url)
            .header("Referer", &self.html_url)
            .header("Accept-Language", accept_language(&self.options.region))
            .form(form);

        let response = self.client.execute(request).await?;

        if response.is_rate_limited() {
            return Err(EngineError::RateLimited {
                url: response.url,
                status: response.status,
            }
            .into());
        }
        if !response.is_success() {
            return Err(EngineError::Http {
                url: response.url,
                status: response.status,
            }
            .into());
        }

        let page = parse_page(&response.text);
        debug!(
            "DuckDuckGo page returned {} results (next page: {})",
            page.records.len(),
            page.next.is_some()
        );
        Ok(page)
    }
}

impl SearchSession for DuckDuckGoSession {
    fn text<'a>(&'a mut self, query: &'a str, max_results: Option<usize>) -> RecordStream<'a> {
        if query.is_empty() {
            let rejected: anyhow::Result<TextRecord> = Err(EngineError::EmptyQuery.into());
            return stream::iter([rejected]).boxed();
        }

        let session: &'a DuckDuckGoSession = self;
        let pager = Pager {
            session,
            next_form: Some(session.first_form(query)),
            buffered: VecDeque::new(),
            seen: HashSet::new(),
            remaining: max_results,
            pages: 0,
        };

        stream::try_unfold(pager, |mut pager| async move {
            let record = pager.next_record().await?;
            Ok::<_, anyhow::Error>(record.map(|record| (record, pager)))
        })
        .boxed()
    }
}

impl Drop for DuckDuckGoSession {
    fn drop(&mut self) {
        debug!("Closing DuckDuckGo session on {}", self.html_url);
    }
}

/// Walks result pages on demand, one request per exhausted buffer
struct Pager<'a> {
    session: &'a DuckDuckGoSession,
    next_form: Option<HashMap<String, String>>,
    buffered: VecDeque<TextRecord>,
    seen: HashSet<String>,
    remaining: Option<usize>,
    pages: usize,
}

impl Pager<'_> {
    async fn next_record(&mut self) -> anyhow::Result<Option<TextRecord>> {
        loop {
            if self.remaining == Some(0) {
                return Ok(None);
            }

            if let Some(record) = self.buffered.pop_front() {
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
                return Ok(Some(record));
            }

            let Some(form) = self.next_form.take() else {
                return Ok(None);
            };

            let page = self.session.fetch_page(form).await?;
            self.pages += 1;

            for record in page.records {
                if let Some(href) = &record.href {
                    if !self.seen.insert(href.clone()) {
                        continue;
                    }
                }
                self.buffered.push_back(record);
            }

            // A page with nothing new ends the walk
            if self.buffered.is_empty() {
                return Ok(None);
            }

            // Without a cap only the first page is used
            if self.remaining.is_some() && self.pages < MAX_PAGES {
                self.next_form = page.next;
            }
        }
    }
}

/// One parsed result page
#[derive(Debug, Default)]
struct Page {
    records: Vec<TextRecord>,
    next: Option<HashMap<String, String>>,
}

fn parse_page(html: &str) -> Page {
    let document = Html::parse_document(html);

    let records = document
        .select(&RESULT_SELECTOR)
        .filter(|element| !is_ad(element))
        .filter_map(|element| parse_result(&element))
        .collect();

    let next = document
        .select(&NAV_FORM_SELECTOR)
        .filter(is_next_form)
        .last()
        .map(|form| {
            form.select(&HIDDEN_INPUT_SELECTOR)
                .filter_map(|input| {
                    let name = input.value().attr("name")?;
                    let value = input.value().attr("value").unwrap_or_default();
                    Some((name.to_string(), value.to_string()))
                })
                .collect::<HashMap<_, _>>()
        })
        .filter(|form| !form.is_empty());

    Page { records, next }
}

fn is_ad(element: &ElementRef<'_>) -> bool {
    element.value().classes().any(|class| class == "result--ad")
}

fn is_next_form(form: &ElementRef<'_>) -> bool {
    form.select(&SUBMIT_SELECTOR).any(|submit| {
        submit
            .value()
            .attr("value")
            .map(|value| value.trim().eq_ignore_ascii_case("next"))
            .unwrap_or(false)
    })
}

fn parse_result(element: &ElementRef<'_>) -> Option<TextRecord> {
    let link = element.select(&TITLE_SELECTOR).next()?;
    let href = normalize_href(link.value().attr("href").unwrap_or_default())?;
    let title = clean_text(link.text());
    let body = element
        .select(&SNIPPET_SELECTOR)
        .next()
        .map(|snippet| clean_text(snippet.text()));

    Some(TextRecord {
        title: Some(title).filter(|t| !t.is_empty()),
        href: Some(href),
        body: body.filter(|b| !b.is_empty()),
    })
}

/// Collapse runs of whitespace left over from the page layout
fn clean_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a result link to its target, dropping ads and internal links
fn normalize_href(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let absolute = if raw.starts_with("//") {
        format!("https:{}", raw)
    } else if raw.starts_with('/') {
        format!("https://duckduckgo.com{}", raw)
    } else {
        raw.to_string()
    };

    let Ok(parsed) = Url::parse(&absolute) else {
        return Some(absolute);
    };

    let host = parsed.host_str().unwrap_or_default();
    if host == "duckduckgo.com" || host.ends_with(".duckduckgo.com") {
        if parsed.path().starts_with("/l/") {
            return parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
                .filter(|target| !target.is_empty());
        }
        return None;
    }

    if (host == "www.google.com" || host == "google.com") && parsed.path() == "/search" {
        return None;
    }

    Some(absolute)
}
