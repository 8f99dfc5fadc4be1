//! Integration tests for StreamAgg
//!
//! Tests are organized by component:
//! - backend_test: Backend HTTP client (endpoints, bodies, error mapping)
//! - flow_test: Orchestrator flows against a mocked backend
//! - ui_test: Full-screen rendering into a TestBackend
//! - cli_test: Argument parsing and command handlers

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
