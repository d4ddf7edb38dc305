//! HTML fixtures shaped like DuckDuckGo's HTML endpoint

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::{Match, Request};

/// A result page with `(title, href, snippet)` rows and an optional next-page offset
pub fn results_page(rows: &[(&str, &str, &str)], next_offset: Option<u32>) -> String {
    let mut html = String::from("<html><body><div class=\"results\">\n");

    for (title, href, snippet) in rows {
        html.push_str(&format!(
            r#"<div class="result results_links results_links_deep web-result">
  <h2 class="result__title"><a rel="nofollow" class="result__a" href="{}">{}</a></h2>
  <a class="result__snippet" href="{}">{}</a>
</div>
"#,
            href, title, href, snippet
        ));
    }

    if let Some(offset) = next_offset {
        html.push_str(&format!(
            r#"<div class="nav-link">
  <form action="/html/" method="post">
    <input type="submit" class="btn btn--alt" value="Next" />
    <input type="hidden" name="q" value="rust" />
    <input type="hidden" name="s" value="{}" />
    <input type="hidden" name="dc" value="{}" />
    <input type="hidden" name="vqd" value="4-fixture" />
    <input type="hidden" name="kl" value="wt-wt" />
  </form>
</div>
"#,
            offset,
            offset + 1
        ));
    }

    html.push_str("</div></body></html>\n");
    html
}

/// `n` distinct rows numbered from `start`
pub fn rows(start: usize, n: usize) -> Vec<(String, String, String)> {
    (start..start + n)
        .map(|i| {
            (
                format!("Result {}", i),
                format!("https://example.com/{}", i),
                format!("Snippet {}", i),
            )
        })
        .collect()
}

pub fn as_refs(rows: &[(String, String, String)]) -> Vec<(&str, &str, &str)> {
    rows.iter()
        .map(|(t, h, s)| (t.as_str(), h.as_str(), s.as_str()))
        .collect()
}

/// Matches requests whose form body does not contain `needle`
pub struct BodyLacks(pub &'static str);

impl Match for BodyLacks {
    fn matches(&self, request: &Request) -> bool {
        !String::from_utf8_lossy(&request.body).contains(self.0)
    }
}

/// Settings file pointing the backend at `html_url`
pub fn settings_file(html_url: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create settings file");
    writeln!(
        file,
        "search:\n  html_url: {}\noutgoing:\n  request_timeout: 5.0\n  user_agent: ddg-search-tests",
        html_url
    )
    .expect("write settings file");
    file
}

/// Matches requests carrying header `name` with exactly `value`
pub struct HeaderIs(pub &'static str, pub &'static str);

impl Match for HeaderIs {
    fn matches(&self, request: &Request) -> bool {
        request
            .headers
            .get(self.0)
            .and_then(|value| value.to_str().ok())
            .map(|value| value == self.1)
            .unwrap_or(false)
    }
}
