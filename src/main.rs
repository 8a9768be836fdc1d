use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use villa::LocatorKind;
use villa::api::HttpTransport;
use villa::core::Navigator;
use villa::core::config::{self, CliOverrides};
use villa::core::locator::locator_for;
use villa::host::{BrowserHistory, ConsoleNotifier, MemoryDocument};

#[derive(Parser)]
#[command(name = "villa", about = "Headless browser for the course catalog front end")]
struct Args {
    /// Origin of the course catalog server
    #[arg(short, long)]
    base_url: Option<String>,

    /// How page ids appear in the address bar
    #[arg(short, long, value_enum)]
    locator: Option<LocatorKind>,

    /// Page to open when the address names none
    #[arg(short, long)]
    page: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to villa.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("villa.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("{e}; using defaults");
        log::warn!("{}", e);
        config::VillaConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            locator: args.locator,
            page: args.page,
        },
    );

    log::info!(
        "Villa starting up against {} ({:?} locator)",
        resolved.base_url,
        resolved.locator
    );

    let transport = HttpTransport::new(&resolved.base_url, Some(resolved.timeout))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let nav = Navigator::new(
        Box::new(MemoryDocument::new()),
        BrowserHistory::new("/"),
        Arc::new(transport),
        locator_for(resolved.locator),
        Arc::new(ConsoleNotifier),
        resolved.engine,
    );

    villa::repl::run(nav, resolved.initial_page).await
}
