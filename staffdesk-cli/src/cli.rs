//! Command line definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use staffdesk_core::types::{Filters, RecordId};

#[derive(Parser)]
#[command(
    name = "staffdesk",
    version,
    about = "Browse and bulk-manage staffdesk records from the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config with [server] and [controller] tables.
    #[arg(long, value_name = "PATH", default_value = "staffdesk.toml", global = true)]
    pub config: PathBuf,

    /// API root; overrides `server.base_url`.
    #[arg(long, env = "STAFFDESK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token; overrides `server.bearer_token`.
    #[arg(long, env = "STAFFDESK_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print one page of records as JSON lines.
    List(ListArgs),

    /// Delete records by id, or every record matching the filters.
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(value_enum)]
    pub resource: ResourceArg,

    /// Filter as key=value; repeatable.
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Records per page; overrides `controller.page_size`.
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(value_enum)]
    pub resource: ResourceArg,

    /// Record id to delete; repeatable.
    #[arg(long = "id", value_name = "ID", required_unless_present = "all_matching")]
    pub ids: Vec<RecordId>,

    /// Delete every record matching the filters, across all pages.
    #[arg(long, conflicts_with = "ids")]
    pub all_matching: bool,

    /// Filter as key=value; repeatable. Only used with --all-matching.
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter, conflicts_with = "ids")]
    pub filters: Vec<(String, String)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResourceArg {
    Hospitals,
    Professionals,
    Memberships,
    Accounts,
    Profiles,
}

pub fn to_filters(pairs: &[(String, String)]) -> Filters {
    pairs.iter().cloned().collect()
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("filter key is empty in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
