//! CLI command handlers, one file per command.

mod config;
mod mirror;
mod sheets;

pub use config::run_config;
pub use mirror::{completion_report, run_mirror};
pub use sheets::run_sheets;
