// UI module
// Terminal rendering of the appliance lists and the event loop

pub mod app_view;
pub mod list_panel;
pub mod renderer;
pub mod styles;

use anyhow::Result;
use crossterm::event;
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::{App, EventHandler};
use crate::operations::{Completion, Dispatcher};

pub use app_view::render_app;
pub use list_panel::{render_list_panel, row_text, ListPanel};
pub use renderer::{DisplayRow, ListRenderer, ListSurface, RenderStats, RowAction, StatusIcon};
pub use styles::Styles;

/// Run the main application event loop
pub fn run_app<B, D>(
    terminal: &mut Terminal<B>,
    app: &mut App<D>,
    completions: &mut UnboundedReceiver<Completion>,
    tick: Duration,
) -> Result<()>
where
    B: Backend,
    D: Dispatcher,
{
    loop {
        // Apply whatever finished since the last frame
        drain_completions(app, completions);

        // Render the UI
        terminal.draw(|f| render_app(f, app))?;

        // Handle events
        if event::poll(tick)? {
            let event = event::read()?;
            let app_event = EventHandler::handle(event, app.is_typing());
            app.handle_event(app_event);
        }

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}

/// Apply every completion already queued, without blocking
pub fn drain_completions<D: Dispatcher>(
    app: &mut App<D>,
    completions: &mut UnboundedReceiver<Completion>,
) -> usize {
    let mut applied = 0;
    loop {
        match completions.try_recv() {
            Ok(completion) => {
                app.apply_completion(completion);
                applied += 1;
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                tracing::debug!("Completion channel closed");
                break;
            }
        }
    }
    applied
}
