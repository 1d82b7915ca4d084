//! Integration tests for hlsdeck
//!
//! Tests are organized by component:
//! - catalog_test: catalog HTTP client, origin and URL normalization
//! - playback_test: source selection, stepping, auto-advance, checkpoints, sleep, PiP
//! - progress_test: checkpoint store and resume validation
//! - cli_test: argument parsing, JSON envelopes, command exit codes
//! - ui_test: rendering and key handling
//! - e2e_test: backend -> catalog -> resume -> playback -> auto-advance

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
