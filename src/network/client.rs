//! HTTP client for talking to search backends

use super::user_agent::{accept_html, generate_user_agent};
use crate::config::OutgoingSettings;
use crate::engines::{EngineError, EngineRequest, EngineResponse};
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::trace;

/// HTTP client wrapper with browser-like defaults.
///
/// Each client keeps its own cookie jar, so one client is one backend session.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = Duration::try_from_secs_f64(settings.request_timeout).with_context(|| {
            format!("invalid request timeout {}", settings.request_timeout)
        })?;

        let mut builder = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: settings
                .user_agent
                .clone()
                .unwrap_or_else(generate_user_agent),
            extra_headers: settings.extra_headers.clone(),
        })
    }

    /// Send a form POST
    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse> {
        let mut req_builder = self
            .client
            .post(&request.url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_html())
            .header("DNT", "1")
            .header("Upgrade-Insecure-Requests", "1");

        for (key, value) in self.extra_headers.iter().chain(request.headers.iter()) {
            req_builder = req_builder.header(key, value);
        }

        trace!("POST {} with {} form fields", request.url, request.form.len());

        let response = req_builder
            .form(&request.form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Timeout {
                        url: request.url.clone(),
                    }
                } else {
                    EngineError::Request(e)
                }
            })?;

        Self::parse_response(response).await
    }

    /// Parse response into EngineResponse
    async fn parse_response(response: Response) -> Result<EngineResponse> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let text = response.text().await.map_err(EngineError::Request)?;

        Ok(EngineResponse {
            status,
            headers,
            text,
            url,
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
