// Application State
// Focus, prompts and the list controller behind the console

use std::time::Duration;

use crate::core::{AppEvent, CollectionKind};
use crate::operations::{Completion, Dispatcher, ListSyncController, NoticeBoard};
use crate::ui::{ListPanel, RowAction};

/// Controller wired to terminal panels and the notice board
pub type ConsoleController<D> = ListSyncController<D, NoticeBoard, ListPanel>;

/// What keystrokes currently edit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating lists; the new-entry row takes text when selected
    Browse,
    /// Editing a device's display name
    Rename { device: String, buffer: String },
}

/// Main application state
pub struct App<D> {
    /// Owns the displayed lists and issues every request
    pub controller: ConsoleController<D>,

    /// Panel receiving navigation and activation
    pub focus: CollectionKind,

    pub mode: InputMode,

    /// Appliance address shown in the header
    pub appliance: String,

    /// How long a failure notice stays in the footer
    pub notice_ttl: Duration,

    /// Whether the application should quit
    pub should_quit: bool,
}

impl<D: Dispatcher> App<D> {
    /// Create a new application instance
    pub fn new(controller: ConsoleController<D>, appliance: impl Into<String>) -> Self {
        Self {
            controller,
            focus: CollectionKind::Domains,
            mode: InputMode::Browse,
            appliance: appliance.into(),
            notice_ttl: Duration::from_secs(10),
            should_quit: false,
        }
    }

    /// Issue the initial fetch of every list
    pub fn start(&mut self) {
        self.controller.refresh_all();
    }

    pub fn panel(&self, kind: CollectionKind) -> &ListPanel {
        self.controller.surface(kind)
    }

    pub fn focused_panel(&self) -> &ListPanel {
        self.panel(self.focus)
    }

    fn focused_panel_mut(&mut self) -> &mut ListPanel {
        self.controller.surface_mut(self.focus)
    }

    /// Whether printable keys should be treated as text
    pub fn is_typing(&self) -> bool {
        match self.mode {
            InputMode::Rename { .. } => true,
            InputMode::Browse => self.focused_panel().is_editing(),
        }
    }

    /// Apply a finished request
    pub fn apply_completion(&mut self, completion: Completion) {
        self.controller.handle_completion(completion);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle an application event
    pub fn handle_event(&mut self, event: AppEvent) {
        if event == AppEvent::Quit {
            self.quit();
            return;
        }

        if let InputMode::Rename { device, buffer } = &mut self.mode {
            match event {
                AppEvent::Input(c) => buffer.push(c),
                AppEvent::Backspace => {
                    buffer.pop();
                }
                AppEvent::Activate => {
                    let (device, label) = (device.clone(), buffer.clone());
                    self.mode = InputMode::Browse;
                    self.controller.rename_device(&device, &label);
                }
                AppEvent::Back => self.mode = InputMode::Browse,
                _ => {}
            }
            return;
        }

        match event {
            AppEvent::FocusNext => self.cycle_focus(1),
            AppEvent::FocusPrevious => self.cycle_focus(CollectionKind::ALL.len() - 1),
            AppEvent::SelectPrevious => self.focused_panel_mut().select_previous(),
            AppEvent::SelectNext => self.focused_panel_mut().select_next(),
            AppEvent::Activate => self.activate_selected(),
            AppEvent::Input(c) => {
                if self.focused_panel().is_editing() {
                    self.focused_panel_mut().push_char(c);
                }
            }
            AppEvent::Backspace => {
                if self.focused_panel().is_editing() {
                    self.focused_panel_mut().pop_char();
                }
            }
            AppEvent::Refresh => {
                self.controller.fetch_collection(self.focus);
            }
            AppEvent::RefreshAll => {
                self.controller.refresh_all();
            }
            AppEvent::Rename => self.begin_rename(),
            AppEvent::Back => self.controller.failures_mut().dismiss(),
            AppEvent::Quit | AppEvent::None => {}
        }
    }

    fn cycle_focus(&mut self, step: usize) {
        let kinds = CollectionKind::ALL;
        let current = kinds.iter().position(|k| *k == self.focus).unwrap_or(0);
        self.focus = kinds[(current + step) % kinds.len()];
    }

    fn activate_selected(&mut self) {
        let panel = self.focused_panel();
        let Some(row) = panel.selected_row() else {
            return;
        };
        let action = row.action.clone();
        let input = panel.input().to_string();
        self.controller.activate(&action, &input);
    }

    fn begin_rename(&mut self) {
        if self.focus != CollectionKind::Devices {
            return;
        }
        if let Some(row) = self.focused_panel().selected_row() {
            if let RowAction::ToggleFilter { device, .. } = &row.action {
                self.mode = InputMode::Rename {
                    device: device.clone(),
                    buffer: row.label.clone(),
                };
            }
        }
    }
}
