// DNS Filter Control
// Headless list management against the appliance, one command per run

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::cell::Cell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;

use dnsfilter_console::config_validation::{load_and_validate_config, validate_config};
use dnsfilter_console::core::CollectionKind;
use dnsfilter_console::logging::{init_logging, resolve_level, LogTarget};
use dnsfilter_console::operations::{
    Completion, Failure, FailureChannel, HttpApplianceApi, ListSurfaces, ListSyncController,
    TaskDispatcher,
};
use dnsfilter_console::ui::{row_text, ListPanel, ListRenderer};

#[derive(Parser)]
#[command(name = "dnsfilter-ctl", version, about = "Manage DNS filter lists without the TUI")]
struct Cli {
    /// Console config file (YAML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Appliance base URL, overriding the config file
    #[arg(long, global = true)]
    appliance: Option<String>,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    /// Only log errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    logfile: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one list, or all of them
    List {
        /// domains, sites or devices
        kind: Option<CollectionKind>,
    },
    /// Add a domain or site
    Add { kind: CollectionKind, name: String },
    /// Remove a domain or site
    Remove { kind: CollectionKind, name: String },
    /// Flip filtering for a device
    Toggle {
        /// Device name or display label
        device: String,
    },
    /// Set a device's display label
    Rename { device: String, label: String },
    /// Print the effective configuration as YAML
    Config,
}

/// Controller plus the runtime its requests run on
struct Session<F> {
    controller: ListSyncController<TaskDispatcher<HttpApplianceApi>, F, ListPanel>,
    completions: UnboundedReceiver<Completion>,
    runtime: Runtime,
}

impl<F: FailureChannel> Session<F> {
    /// Block until every dispatched request, including re-fetches, has completed
    fn settle(&mut self) {
        while !self.controller.is_idle() {
            match self.runtime.block_on(self.completions.recv()) {
                Some(completion) => {
                    self.controller.handle_completion(completion);
                }
                None => break,
            }
        }
    }

    fn print(&self, kind: CollectionKind, with_title: bool) {
        let panel = self.controller.surface(kind);
        if with_title {
            println!("== {} ==", panel.container.title);
        }
        for row in panel.rows().iter().filter(|row| !row.is_input()) {
            println!("{}", row_text(row));
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let loaded = load_and_validate_config(cli.config.as_deref())?;
    let mut config = loaded.config.clone();
    if let Some(url) = cli.appliance {
        config.appliance.base_url = url;
        validate_config(&config)?;
    }

    if let Commands::Config = cli.command {
        print!("{}", config.to_yaml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let level = resolve_level(&config.logging.level, cli.debug, cli.quiet);
    let target = match cli.logfile {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Stderr,
    };
    init_logging(&level, &target)?;
    loaded.log_source();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let api = {
        let _guard = runtime.enter();
        HttpApplianceApi::new(&config.appliance.base_url)?
    };
    let (dispatcher, completions) = TaskDispatcher::new(api, runtime.handle().clone());

    let failed = Rc::new(Cell::new(0usize));
    let failures = {
        let failed = Rc::clone(&failed);
        move |failure: Failure| {
            tracing::debug!(error = ?failure.error, "Request failed");
            eprintln!("{}", failure.summary());
            failed.set(failed.get() + 1);
        }
    };

    let controller = ListSyncController::new(
        dispatcher,
        failures,
        ListRenderer::new(config.lists.clone()),
        ListSurfaces::from_fn(|kind| ListPanel::new(config.lists.get(kind).clone())),
        config.sync.clone(),
    );
    let mut session = Session {
        controller,
        completions,
        runtime,
    };

    match cli.command {
        Commands::List { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => CollectionKind::ALL.to_vec(),
            };
            for kind in &kinds {
                session.controller.fetch_collection(*kind);
            }
            session.settle();
            for kind in &kinds {
                session.print(*kind, kinds.len() > 1);
            }
        }
        Commands::Add { kind, name } => {
            if session.controller.add_entry(kind, &name).is_none() {
                bail!("Nothing to add: '{name}' is blank or {kind} cannot be edited");
            }
            session.settle();
            session.print(kind, false);
        }
        Commands::Remove { kind, name } => {
            if session.controller.remove_entry(kind, &name).is_none() {
                bail!("Cannot remove '{name}' from {kind}");
            }
            session.settle();
            session.print(kind, false);
        }
        Commands::Toggle { device } => {
            session.controller.fetch_collection(CollectionKind::Devices);
            session.settle();

            let action = session
                .controller
                .surface(CollectionKind::Devices)
                .rows()
                .iter()
                .find(|row| row.entry_name() == Some(device.as_str()) || row.label == device)
                .map(|row| row.action.clone());
            let Some(action) = action else {
                if failed.get() == 0 {
                    bail!("No device named '{device}'");
                }
                return Ok(ExitCode::FAILURE);
            };

            session.controller.activate(&action, "");
            session.settle();
            session.print(CollectionKind::Devices, false);
        }
        Commands::Rename { device, label } => {
            if session.controller.rename_device(&device, &label).is_none() {
                bail!("Device name and label must not be blank");
            }
            session.settle();
            session.print(CollectionKind::Devices, false);
        }
        // Printed before logging starts
        Commands::Config => {}
    }

    if failed.get() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
