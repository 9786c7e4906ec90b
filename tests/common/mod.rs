//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{run_cli, TestWorkspace};
//!
//! #[test]
//! fn test_empty_manifest() {
//!     let ws = TestWorkspace::new();
//!     let run = run_cli(ws.root(), &["convert", "--manifest", "[]"]);
//!     assert_eq!(run.exit_code, Some(0));
//! }
//! ```

mod cli;
mod constants;
mod fixtures;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use cli::{run_cli, CliRun};
#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{manifest_json, TestWorkspace};
