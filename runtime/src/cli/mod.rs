//! CLI subcommand implementations for the `zebulon` binary.

pub mod output;
pub mod parse_cmd;
pub mod scrape_cmd;
