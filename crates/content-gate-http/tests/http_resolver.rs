// crates/content-gate-http/tests/http_resolver.rs
// ============================================================================
// Module: HTTP Resolver Tests
// Description: Resolver behavior against local tiny_http and raw TCP servers.
// Purpose: Validate last-hop capture, status band, timeouts, and error mapping.
// ============================================================================

//! ## Overview
//! Each test binds a server on `127.0.0.1:0`, serves a fixed number of
//! requests from a background thread, and resolves against it.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::io::Read;
use std::io::Write;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use content_gate_core::GateError;
use content_gate_core::UrlResolver;
use content_gate_http::HttpResolver;
use content_gate_http::HttpResolverConfig;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

const TIMEOUT: Duration = Duration::from_secs(5);

fn resolver() -> HttpResolver {
    HttpResolver::new(HttpResolverConfig::default()).unwrap()
}

/// Serves `count` requests with the given status and no body.
fn status_server(status: u16, count: usize) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        for _ in 0 .. count {
            if let Ok(request) = server.recv() {
                let _ = request.respond(Response::empty(status));
            }
        }
    });
    (format!("http://{addr}"), handle)
}

fn location(target: &str) -> Header {
    Header::from_bytes(&b"Location"[..], target.as_bytes()).unwrap()
}

// ============================================================================
// SECTION: Status Classification
// ============================================================================

#[test]
fn ok_response_reports_request_url() {
    let (base, handle) = status_server(200, 1);
    let url = format!("{base}/landing?push_id=abc123defg");
    let resolution = resolver().resolve(&url, TIMEOUT).unwrap();
    handle.join().unwrap();

    assert_eq!(resolution.status, 200);
    assert_eq!(resolution.final_url, url);
}

#[test]
fn forbidden_is_inside_success_band() {
    let (base, handle) = status_server(403, 1);
    let resolution = resolver().resolve(&format!("{base}/"), TIMEOUT).unwrap();
    handle.join().unwrap();
    assert_eq!(resolution.status, 403);
}

#[test]
fn not_found_and_server_errors_are_rejected() {
    for status in [404, 500, 503] {
        let (base, handle) = status_server(status, 1);
        let result = resolver().resolve(&format!("{base}/"), TIMEOUT);
        handle.join().unwrap();
        assert_eq!(result, Err(GateError::ServerError(status)));
    }
}

#[test]
fn status_below_success_band_never_resolves() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(b"HTTP/1.1 199 Early\r\nContent-Length: 0\r\n\r\n");
            let _ = stream.flush();
            thread::sleep(Duration::from_millis(800));
        }
    });

    let result = resolver().resolve(&format!("http://{addr}/"), Duration::from_millis(300));
    handle.join().unwrap();

    assert!(
        matches!(
            result,
            Err(GateError::Timeout
                | GateError::ServerError(199)
                | GateError::InvalidResponse
                | GateError::NetworkError(_))
        ),
        "{result:?}"
    );
}

// ============================================================================
// SECTION: Redirects
// ============================================================================

#[test]
fn redirect_chain_reports_last_hop() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let target = format!("http://{addr}/play?pathid=abc");
    let redirect_target = target.clone();
    let handle = thread::spawn(move || {
        for _ in 0 .. 2 {
            let Ok(request) = server.recv() else {
                return;
            };
            let response = if request.url().starts_with("/start") {
                Response::empty(302).with_header(location(&redirect_target))
            } else {
                Response::empty(200)
            };
            let _ = request.respond(response);
        }
    });

    let resolution = resolver().resolve(&format!("http://{addr}/start"), TIMEOUT).unwrap();
    handle.join().unwrap();

    assert_eq!(resolution.status, 200);
    assert_eq!(resolution.final_url, target);
}

#[test]
fn redirect_limit_is_a_network_error() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        for _ in 0 .. 3 {
            if let Ok(request) = server.recv() {
                let _ = request.respond(Response::empty(302).with_header(location("/loop")));
            }
        }
    });

    let resolver = HttpResolver::new(HttpResolverConfig {
        max_redirects: 2,
        ..HttpResolverConfig::default()
    })
    .unwrap();
    let result = resolver.resolve(&format!("http://{addr}/loop"), TIMEOUT);
    handle.join().unwrap();

    assert!(matches!(result, Err(GateError::NetworkError(_))), "{result:?}");
}

#[test]
fn redirect_without_follow_target_is_terminal() {
    let (base, handle) = status_server(304, 1);
    let resolution = resolver().resolve(&format!("{base}/cached"), TIMEOUT).unwrap();
    handle.join().unwrap();
    assert_eq!(resolution.status, 304);
    assert_eq!(resolution.final_url, format!("{base}/cached"));
}

// ============================================================================
// SECTION: Transport Failures
// ============================================================================

#[test]
fn hanging_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            thread::sleep(Duration::from_millis(1500));
        }
    });

    let started = Instant::now();
    let result = resolver().resolve(&format!("http://{addr}/"), Duration::from_millis(200));
    let elapsed = started.elapsed();
    handle.join().unwrap();

    assert_eq!(result, Err(GateError::Timeout));
    assert!(elapsed < Duration::from_millis(1200), "timeout took {elapsed:?}");
}

#[test]
fn refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = resolver().resolve(&format!("http://{addr}/"), TIMEOUT);
    assert!(matches!(result, Err(GateError::NetworkError(_))), "{result:?}");
}

#[test]
fn malformed_url_is_rejected_before_any_request() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("not a url", TIMEOUT), Err(GateError::InvalidUrl));
    assert_eq!(resolver.resolve("mailto:someone@example.com", TIMEOUT), Err(GateError::InvalidUrl));
}
