// crates/content-gate-http/src/resolver.rs
// ============================================================================
// Module: HTTP URL Resolver
// Description: Redirect-following GET resolver with a hard timeout.
// Purpose: Report the last-hop URL and classify the final status.
// Dependencies: content-gate-core, reqwest, tokio, tracing
// ============================================================================

//! ## Overview
//! [`HttpResolver`] issues one GET per call, follows redirects through a
//! custom policy that logs each hop, and reports the URL of the last hop.
//! The request future is raced against a tokio timer; whichever finishes
//! first decides the outcome, and the losing request is dropped.
//! Invariants:
//! - Only `http` and `https` URLs are requested.
//! - The final status is classified by
//!   [`classify_status`](content_gate_core::classify_status), so every
//!   resolver shares one success band.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use content_gate_core::GateError;
use content_gate_core::Resolution;
use content_gate_core::UrlResolver;
use content_gate_core::classify_status;
use reqwest::Client;
use reqwest::Url;
use reqwest::redirect::Policy;
use serde::Deserialize;
use thiserror::Error;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::blocking::block_on_private;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for [`HttpResolver`].
///
/// # Invariants
/// - `max_redirects` bounds the number of followed hops; one more fails the
///   request.
/// - `allow_http = false` rejects cleartext URLs, including redirect targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpResolverConfig {
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Maximum redirect hops followed per request.
    pub max_redirects: usize,
    /// Allow cleartext HTTP.
    pub allow_http: bool,
}

impl Default for HttpResolverConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("content-gate/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
            allow_http: true,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing network collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpClientError {
    /// The HTTP client could not be built.
    #[error("http client build failed: {0}")]
    Client(String),
    /// The async runtime could not be started.
    #[error("async runtime start failed: {0}")]
    Runtime(String),
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// URL resolver backed by an async reqwest client.
pub struct HttpResolver {
    /// Resolver configuration.
    config: HttpResolverConfig,
    /// HTTP client with the redirect policy installed.
    client: Client,
    /// Runtime driving requests to completion.
    runtime: Runtime,
}

impl HttpResolver {
    /// Creates a resolver with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError`] when the client or runtime cannot be built.
    pub fn new(config: HttpResolverConfig) -> Result<Self, HttpClientError> {
        let client = build_http_client(&config)?;
        let runtime = build_runtime()?;
        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    /// Validates the scheme of a request URL.
    fn parse_request_url(&self, raw: &str) -> Result<Url, GateError> {
        let url = Url::parse(raw).map_err(|_| GateError::InvalidUrl)?;
        match url.scheme() {
            "https" => Ok(url),
            "http" if self.config.allow_http => Ok(url),
            _ => Err(GateError::InvalidUrl),
        }
    }
}

impl UrlResolver for HttpResolver {
    fn resolve(&self, url: &str, timeout: Duration) -> Result<Resolution, GateError> {
        let request_url = self.parse_request_url(url)?;
        debug!(url = %request_url, timeout_ms = timeout.as_millis(), "resolving destination");

        let response = block_on_private(&self.runtime, async {
            tokio::time::timeout(timeout, self.client.get(request_url).send()).await
        })
        .ok_or_else(|| GateError::NetworkError("resolver worker panicked".to_string()))?
        .map_err(|_| GateError::Timeout)?
        .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        debug!(final_url = %final_url, status, "destination responded");
        classify_status(status, final_url)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the async client with the logging redirect policy.
fn build_http_client(config: &HttpResolverConfig) -> Result<Client, HttpClientError> {
    let max_redirects = config.max_redirects;
    let allow_http = config.allow_http;
    let policy = Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            return attempt.error("too many redirects");
        }
        if !allow_http && attempt.url().scheme() != "https" {
            return attempt.error("redirect to cleartext http blocked");
        }
        let from = attempt.previous().last().map(Url::as_str).unwrap_or_default();
        debug!(from, to = %attempt.url(), status = attempt.status().as_u16(), "following redirect");
        attempt.follow()
    });
    Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(policy)
        .build()
        .map_err(|err| HttpClientError::Client(err.to_string()))
}

/// Builds the current-thread runtime used to drive requests.
fn build_runtime() -> Result<Runtime, HttpClientError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| HttpClientError::Runtime(err.to_string()))
}

/// Maps a reqwest transport failure onto the gate error taxonomy.
fn map_transport_error(err: reqwest::Error) -> GateError {
    if err.is_timeout() {
        GateError::Timeout
    } else if err.is_connect() || err.is_redirect() {
        GateError::NetworkError(err.to_string())
    } else {
        GateError::InvalidResponse
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
