// crates/content-gate-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing, overrides, and commands.
// Purpose: Ensure flags override config values and bootstrap errors fail.
// Dependencies: content-gate-cli main helpers
// ============================================================================

//! ## Overview
//! Validates clap wiring, override precedence, and the offline commands
//! (`state`, `device-id`) against a temporary SQLite store.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use clap::CommandFactory;
use clap::Parser;
use content_gate_config::ContentGateConfig;
use content_gate_core::DEVICE_ID_KEY;
use content_gate_core::DeviceClass;
use content_gate_core::KeyValueStore;
use content_gate_store_sqlite::SqliteKeyValueStore;
use content_gate_store_sqlite::SqliteStoreConfig;
use tempfile::TempDir;

use super::Cli;
use super::Commands;
use super::GateOverrides;
use super::StoreOverride;
use super::apply_overrides;
use super::run;

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn evaluate_flags_parse() {
    let cli = Cli::try_parse_from([
        "content-gate",
        "evaluate",
        "--url",
        "https://example.com/landing",
        "--target-date",
        "2025-06-01T00:00:00Z",
        "--no-device-check",
        "--timeout-ms",
        "3000",
        "--device-class",
        "tablet",
        "--store",
        "gate.db",
    ])
    .unwrap();
    let Commands::Evaluate(overrides) = cli.command else {
        panic!("expected evaluate command");
    };
    assert_eq!(overrides.url.as_deref(), Some("https://example.com/landing"));
    assert!(overrides.no_device_check);
    assert_eq!(overrides.timeout_ms, Some(3000));
    assert_eq!(overrides.device_class, Some(DeviceClass::Tablet));
    assert_eq!(overrides.store.path, Some(PathBuf::from("gate.db")));
}

#[test]
fn unknown_device_class_is_rejected() {
    let result = Cli::try_parse_from(["content-gate", "evaluate", "--device-class", "watch"]);
    assert!(result.is_err());
}

#[test]
fn global_config_flag_follows_subcommand() {
    let cli = Cli::try_parse_from(["content-gate", "device-id", "--config", "alt.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

#[test]
fn overrides_replace_config_values() {
    let mut config = ContentGateConfig::from_toml(
        "[gate]\nurl = \"https://old.example/\"\ntimeout_ms = 5000\n[device]\nclass = \"phone\"\n",
    )
    .unwrap();
    apply_overrides(
        &mut config,
        GateOverrides {
            url: Some("https://new.example/".to_string()),
            no_device_check: true,
            cache_key: Some("promo".to_string()),
            ..GateOverrides::default()
        },
    )
    .unwrap();

    assert_eq!(config.gate.url.as_deref(), Some("https://new.example/"));
    assert_eq!(config.gate.timeout_ms, 5000);
    assert!(!config.gate.check_device);
    assert_eq!(config.gate.cache_key.as_deref(), Some("promo"));
    assert_eq!(config.device.class, DeviceClass::Phone);
}

#[test]
fn invalid_override_fails_validation() {
    let mut config = ContentGateConfig::default();
    let result = apply_overrides(
        &mut config,
        GateOverrides {
            timeout_ms: Some(5),
            ..GateOverrides::default()
        },
    );
    assert!(result.is_err());
}

// ============================================================================
// SECTION: Commands
// ============================================================================

#[test]
fn device_id_command_persists_identity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gate.db");
    let cli = Cli {
        config: None,
        command: Commands::DeviceId(StoreOverride {
            path: Some(path.clone()),
        }),
    };
    assert!(run(cli).is_ok());

    let store = SqliteKeyValueStore::new(&SqliteStoreConfig::new(&path)).unwrap();
    let id = store.get_string(DEVICE_ID_KEY).unwrap().unwrap();
    assert!((10 ..= 20).contains(&id.len()));
}

#[test]
fn state_command_requires_url() {
    let dir = TempDir::new().unwrap();
    let cli = Cli {
        config: None,
        command: Commands::State(GateOverrides {
            store: StoreOverride {
                path: Some(dir.path().join("gate.db")),
            },
            ..GateOverrides::default()
        }),
    };
    assert!(run(cli).is_err());
}

#[test]
fn evaluate_without_target_date_is_a_bootstrap_error() {
    let dir = TempDir::new().unwrap();
    let cli = Cli {
        config: None,
        command: Commands::Evaluate(GateOverrides {
            url: Some("https://example.com/".to_string()),
            store: StoreOverride {
                path: Some(dir.path().join("gate.db")),
            },
            ..GateOverrides::default()
        }),
    };
    let err = run(cli).unwrap_err();
    assert!(err.to_string().contains("target_date"));
}
