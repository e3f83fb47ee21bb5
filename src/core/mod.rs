// Core infrastructure module
// Domain types, terminal events and application state

pub mod app;
pub mod events;
pub mod model;

pub use app::{App, ConsoleController, InputMode};
pub use events::{AppEvent, EventHandler};
pub use model::{
    normalize_name, parse_boolean, parse_devices, parse_domain_listing, parse_sites, Collection,
    CollectionKind, Device, Domain, FlagValue, Site, UnknownKind,
};
