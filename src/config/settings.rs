//! Settings structures for ddg-search configuration

use crate::engines::{SafeSearch, TextOptions, TimeLimit};
use crate::DEFAULT_MAX_RESULTS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default DuckDuckGo HTML endpoint
pub const DEFAULT_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// Main settings structure, loaded from a YAML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    /// Parse settings from YAML text. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Merge with environment variables (DDG_SEARCH_* prefix)
    pub fn merge_env(&mut self) -> Result<()> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any variable source
    pub(crate) fn merge_vars<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("DDG_SEARCH_REGION") {
            self.search.region = val;
        }
        if let Some(val) = var("DDG_SEARCH_SAFESEARCH") {
            self.search.safesearch = val
                .parse()
                .map_err(|e: String| anyhow::anyhow!("DDG_SEARCH_SAFESEARCH: {}", e))?;
        }
        if let Some(val) = var("DDG_SEARCH_TIMELIMIT") {
            self.search.timelimit = Some(
                val.parse()
                    .map_err(|e: String| anyhow::anyhow!("DDG_SEARCH_TIMELIMIT: {}", e))?,
            );
        }
        if let Some(val) = var("DDG_SEARCH_MAX_RESULTS") {
            self.search.max_results = val
                .trim()
                .parse()
                .with_context(|| format!("DDG_SEARCH_MAX_RESULTS: invalid integer '{}'", val))?;
        }
        if let Some(val) = var("DDG_SEARCH_HTML_URL") {
            self.search.html_url = val;
        }
        if let Some(val) = var("DDG_SEARCH_TIMEOUT") {
            self.outgoing.request_timeout = val
                .trim()
                .parse()
                .with_context(|| format!("DDG_SEARCH_TIMEOUT: invalid number '{}'", val))?;
        }
        if let Some(val) = var("DDG_SEARCH_PROXY") {
            self.outgoing.proxies.all = Some(val);
        }
        if let Some(val) = var("DDG_SEARCH_LOG") {
            self.logging.level = val;
        }
        Ok(())
    }

    /// Options handed to the search backend
    pub fn text_options(&self) -> TextOptions {
        TextOptions {
            region: self.search.region.clone(),
            safesearch: self.search.safesearch,
            timelimit: self.search.timelimit,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Result cap used when none is given on the command line
    pub max_results: i64,
    /// Region code (`wt-wt` = no region)
    pub region: String,
    /// Safe search level
    pub safesearch: SafeSearch,
    /// Optional time window
    pub timelimit: Option<TimeLimit>,
    /// Endpoint of the HTML search page
    pub html_url: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            region: "wt-wt".to_string(),
            safesearch: SafeSearch::default(),
            timelimit: None,
            html_url: DEFAULT_HTML_URL.to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Fixed user agent (none = random browser agent)
    pub user_agent: Option<String>,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            verify_ssl: true,
            user_agent: None,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
