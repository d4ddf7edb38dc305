//! Browser-like request headers
//!
//! DuckDuckGo's HTML endpoint serves degraded pages (or throttles) clients
//! that do not look like a desktop browser.

use rand::seq::SliceRandom;
use rand::Rng;

const PLATFORMS: [&str; 5] = [
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 14_5",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

const CHROME_VERSIONS: [&str; 4] = ["126.0.0.0", "127.0.0.0", "128.0.0.0", "129.0.0.0"];
const FIREFOX_VERSIONS: [&str; 3] = ["128.0", "129.0", "130.0"];

/// Generate a random but realistic desktop user agent string
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let platform = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);

    // Roughly two Chrome clients for every Firefox one
    if rng.gen_ratio(2, 3) {
        let version = CHROME_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(CHROME_VERSIONS[0]);
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            platform, version
        )
    } else {
        let version = FIREFOX_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(FIREFOX_VERSIONS[0]);
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            platform, version, version
        )
    }
}

/// Standard accept headers for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
}

/// Accept-Language header for a DuckDuckGo region code such as `us-en`
pub fn accept_language(region: &str) -> String {
    let mut parts = region.split('-');
    match (parts.next(), parts.next()) {
        (Some(country), Some(lang))
            if !country.is_empty() && !lang.is_empty() && region != "wt-wt" =>
        {
            format!(
                "{}-{},{};q=0.9,en;q=0.8",
                lang.to_ascii_lowercase(),
                country.to_ascii_uppercase(),
                lang.to_ascii_lowercase()
            )
        }
        _ => "en-US,en;q=0.9".to_string(),
    }
}
