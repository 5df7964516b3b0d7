use crate::app::{AppConfig, Page};
use crate::list_view::DEFAULT_PAGE_SIZE;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "craftai",
    version,
    about = "Terminal dashboard for chat-bots, agents, tasks and connectors"
)]
pub struct Cli {
    /// JSON dataset to display (built-in sample data when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Rows per table page
    #[arg(short = 'n', long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Page shown at startup (overview, chatbots, agents, tasks, connectors, settings)
    #[arg(short, long, default_value = "overview", value_parser = parse_page)]
    pub page: Page,

    /// Reload the dataset every N seconds (0 disables)
    #[arg(short, long, default_value_t = 0)]
    pub interval: u64,

    /// Enable verbose logging to $XDG_STATE_HOME/craftai/debug.log
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn app_config(&self, source_label: String) -> AppConfig {
        AppConfig {
            page_size: self.page_size,
            start_page: self.page,
            source_label,
            reload_interval: self.interval,
            version_string: format!("craftai v{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Page size must be at least one row.
pub fn parse_page_size(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid page size '{s}'. Expected a positive integer."))?;
    if n == 0 {
        return Err("Page size must be at least 1.".to_string());
    }
    Ok(n)
}

pub fn parse_page(s: &str) -> Result<Page, String> {
    s.parse::<Page>().map_err(|e| {
        let known: Vec<&str> = Page::ALL
            .iter()
            .map(|p| p.route().trim_start_matches('/'))
            .filter(|name| !name.is_empty())
            .collect();
        format!("{e}. Expected overview or one of: {}", known.join(", "))
    })
}
