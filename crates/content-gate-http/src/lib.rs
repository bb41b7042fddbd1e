// crates/content-gate-http/src/lib.rs
// ============================================================================
// Module: Content Gate HTTP Library
// Description: Network collaborators for the gate engine.
// Purpose: Resolve destination URLs and observe internet reachability.
// Dependencies: content-gate-core, reqwest, tokio
// ============================================================================

//! ## Overview
//! Implements the core [`UrlResolver`](content_gate_core::UrlResolver) and
//! [`ConnectivityProbe`](content_gate_core::ConnectivityProbe) interfaces
//! over real sockets. Both collaborators expose a blocking API and drive
//! their async internals on a private current-thread tokio runtime. Calls
//! made from inside a host runtime are moved off the host's thread first.
//! Each collaborator owns a runtime, so its last handle must be dropped
//! outside async context.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod blocking;
pub mod probe;
pub mod resolver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use probe::ProbeConfig;
pub use probe::TcpConnectivityProbe;
pub use resolver::HttpClientError;
pub use resolver::HttpResolver;
pub use resolver::HttpResolverConfig;
