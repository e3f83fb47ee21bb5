// DNS Filter Console
// TUI for the blocked-domain, trusted-site and device lists of a filtering appliance

// IMPORTS ------------------>>

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use dnsfilter_console::config_validation::{load_and_validate_config, validate_config};
use dnsfilter_console::core::App;
use dnsfilter_console::logging::{init_logging, resolve_level, LogTarget};
use dnsfilter_console::operations::{
    HttpApplianceApi, ListSurfaces, ListSyncController, NoticeBoard, TaskDispatcher,
};
use dnsfilter_console::ui::{run_app, ListPanel, ListRenderer};

//--------------------------------------------------------<<

#[derive(Parser)]
#[command(name = "dnsfilter-console", version, about = "DNS filter appliance console")]
struct Args {
    /// Console config file (YAML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Appliance base URL, overriding the config file
    #[arg(long)]
    appliance: Option<String>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    /// Only log errors
    #[arg(long)]
    quiet: bool,

    /// Append logs to this file
    #[arg(long)]
    logfile: Option<PathBuf>,
}

// ┌──────────────────────────────────────────────────────────────────────────────┐
// │                               MAIN ENTRY POINT                               │
// └──────────────────────────────────────────────────────────────────────────────┘

fn main() -> Result<()> {
    let args = Args::parse();

    // Load and validate configuration from YAML file
    let loaded = load_and_validate_config(args.config.as_deref())?;
    let mut config = loaded.config.clone();
    if let Some(url) = args.appliance {
        config.appliance.base_url = url;
        validate_config(&config)?;
    }

    // The terminal owns stdout, so logs only go to a file
    let level = resolve_level(&config.logging.level, args.debug, args.quiet);
    let target = match args.logfile.or_else(|| config.logging.file.clone()) {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Off,
    };
    init_logging(&level, &target)?;
    loaded.log_source();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let _guard = runtime.enter();

    let api = HttpApplianceApi::new(&config.appliance.base_url)?;
    tracing::info!(appliance = %api.base_url(), "Console starting");

    let (dispatcher, mut completions) = TaskDispatcher::new(api, runtime.handle().clone());
    let surfaces = ListSurfaces::from_fn(|kind| ListPanel::new(config.lists.get(kind).clone()));
    let controller = ListSyncController::new(
        dispatcher,
        NoticeBoard::new(config.ui.notice_capacity),
        ListRenderer::new(config.lists.clone()),
        surfaces,
        config.sync.clone(),
    );

    let mut app = App::new(controller, config.appliance.base_url.clone());
    app.notice_ttl = Duration::from_secs(config.ui.notice_secs);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &mut app,
        &mut completions,
        Duration::from_millis(config.ui.tick_ms),
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!(pending = app.controller.in_flight(), "Console stopped");
    result
}
