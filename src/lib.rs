// DNS Filter Console Library
// Keeps the blocked-domain, trusted-site and device lists of a DNS filtering
// appliance in sync with what the console displays

// Core infrastructure - domain types, events and application state
pub mod core;

// Operations - appliance requests and the list sync controller
pub mod operations;

// UI - list rendering and TUI views
pub mod ui;

// Utilities - helper functions and tools
pub mod utilities;

// Configuration file and its validation
pub mod config;
pub mod config_validation;

// tracing subscriber setup
pub mod logging;

// Re-export commonly used items for convenience
pub use config::ConsoleConfig;
pub use self::core::{App, Collection, CollectionKind};
pub use operations::{HttpApplianceApi, ListSyncController, TaskDispatcher};
pub use ui::{ListPanel, ListRenderer};
