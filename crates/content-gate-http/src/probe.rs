// crates/content-gate-http/src/probe.rs
// ============================================================================
// Module: TCP Connectivity Probe
// Description: Bounded reachability observation over concurrent TCP connects.
// Purpose: Answer "is the internet reachable" within a deadline.
// Dependencies: content-gate-core, tokio, tracing
// ============================================================================

//! ## Overview
//! [`TcpConnectivityProbe`] opens one TCP connection per configured endpoint
//! and reports reachable as soon as any connect succeeds. All attempts live
//! in a [`JoinSet`] owned by the call, so every path out of
//! `has_connectivity` (success, all failed, deadline) drops the set and
//! aborts the connects still in flight.

use std::time::Duration;

use content_gate_core::ConnectivityProbe;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::task::JoinSet;
use tracing::debug;

use crate::blocking::block_on_private;
use crate::resolver::HttpClientError;

/// Configuration for [`TcpConnectivityProbe`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// `host:port` endpoints tried concurrently.
    pub endpoints: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["1.1.1.1:443".to_string(), "8.8.8.8:53".to_string()],
        }
    }
}

/// Connectivity probe that races TCP connects to well-known endpoints.
pub struct TcpConnectivityProbe {
    /// Probe configuration.
    config: ProbeConfig,
    /// Runtime driving the connect attempts.
    runtime: Runtime,
}

impl TcpConnectivityProbe {
    /// Creates a probe for the configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::Runtime`] when the runtime cannot start.
    pub fn new(config: ProbeConfig) -> Result<Self, HttpClientError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| HttpClientError::Runtime(err.to_string()))?;
        Ok(Self {
            config,
            runtime,
        })
    }
}

impl ConnectivityProbe for TcpConnectivityProbe {
    fn has_connectivity(&self, timeout: Duration) -> bool {
        if self.config.endpoints.is_empty() {
            return false;
        }
        block_on_private(&self.runtime, async {
            let mut attempts = JoinSet::new();
            for endpoint in &self.config.endpoints {
                let endpoint = endpoint.clone();
                attempts.spawn(async move { TcpStream::connect(endpoint.as_str()).await.is_ok() });
            }
            let reachable =
                tokio::time::timeout(timeout, first_success(&mut attempts)).await.unwrap_or(false);
            debug!(reachable, pending = attempts.len(), "connectivity observed");
            reachable
        })
        .unwrap_or(false)
    }
}

/// Waits for the first successful attempt; false once every attempt failed.
async fn first_success(attempts: &mut JoinSet<bool>) -> bool {
    while let Some(joined) = attempts.join_next().await {
        if matches!(joined, Ok(true)) {
            return true;
        }
    }
    false
}
