//! # ashwam-cli
//!
//! The `ashwam` binary and the edge I/O it needs: JSONL loading with
//! per-line error collection, JSON/markdown report writing, and one handler
//! per subcommand. The engines never see a file path.

pub mod cli;
pub mod commands;
pub mod loader;
pub mod writer;
