// List Renderer
// Projects a fetched collection into display rows on a list surface

use crate::config::{ListContainer, ListContainers};
use crate::core::{Collection, CollectionKind, Device};

/// Indicator shown next to a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    /// The device is filtered
    Locked,
}

/// What activating a row does; captured when the row is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Commit the input row as a new entry
    NewEntry { kind: CollectionKind },

    /// Remove the named entry
    Remove { kind: CollectionKind, name: String },

    /// Flip filtering for the device, given the state it was rendered with
    ToggleFilter { device: String, is_filtered: bool },
}

/// One displayed row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub label: String,
    pub icon: Option<StatusIcon>,
    pub action: RowAction,
}

impl DisplayRow {
    /// Identity of the entry behind the row (None for the input row)
    pub fn entry_name(&self) -> Option<&str> {
        match &self.action {
            RowAction::NewEntry { .. } => None,
            RowAction::Remove { name, .. } => Some(name.as_str()),
            RowAction::ToggleFilter { device, .. } => Some(device.as_str()),
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self.action, RowAction::NewEntry { .. })
    }
}

/// List-widget collaborator the renderer draws into
pub trait ListSurface {
    /// Remove every row
    fn clear(&mut self);

    /// Append a row at the end
    fn append(&mut self, row: DisplayRow);

    /// Update the visual state after a render pass
    fn refresh(&mut self);
}

/// Counts from one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Rows appended, input row included
    pub rows: usize,
    /// Entries dropped for a missing identity
    pub skipped: usize,
}

/// Turns collections into rows, replacing a surface's contents wholesale
#[derive(Debug, Clone)]
pub struct ListRenderer {
    containers: ListContainers,
}

impl ListRenderer {
    pub fn new(containers: ListContainers) -> Self {
        Self { containers }
    }

    pub fn container(&self, kind: CollectionKind) -> &ListContainer {
        self.containers.get(kind)
    }

    /// Render any collection with the layout its kind calls for
    pub fn render<S: ListSurface + ?Sized>(
        &self,
        surface: &mut S,
        collection: &Collection,
    ) -> RenderStats {
        match collection {
            Collection::Domains(domains) => self.render_editable_list(
                surface,
                CollectionKind::Domains,
                domains.iter().map(|d| d.name.as_str()),
            ),
            Collection::Sites(sites) => self.render_editable_list(
                surface,
                CollectionKind::Sites,
                sites.iter().map(|s| s.name.as_str()),
            ),
            Collection::Devices(devices) => self.render_status_list(surface, devices),
        }
    }

    /// Input row first, then one removable row per non-blank name
    pub fn render_editable_list<'a, S, I>(
        &self,
        surface: &mut S,
        kind: CollectionKind,
        names: I,
    ) -> RenderStats
    where
        S: ListSurface + ?Sized,
        I: IntoIterator<Item = &'a str>,
    {
        let mut stats = RenderStats::default();
        surface.clear();

        surface.append(DisplayRow {
            label: self.container(kind).input_placeholder.clone(),
            icon: None,
            action: RowAction::NewEntry { kind },
        });
        stats.rows += 1;

        for name in names {
            if name.trim().is_empty() {
                stats.skipped += 1;
                continue;
            }
            surface.append(DisplayRow {
                label: name.to_string(),
                icon: None,
                action: RowAction::Remove {
                    kind,
                    name: name.to_string(),
                },
            });
            stats.rows += 1;
        }

        surface.refresh();
        self.log_pass(kind, stats);
        stats
    }

    /// One row per identified device, locked icon when filtered
    pub fn render_status_list<S>(&self, surface: &mut S, devices: &[Device]) -> RenderStats
    where
        S: ListSurface + ?Sized,
    {
        let mut stats = RenderStats::default();
        surface.clear();

        for device in devices {
            if device.name.trim().is_empty() {
                stats.skipped += 1;
                continue;
            }
            surface.append(DisplayRow {
                label: device.label().to_string(),
                icon: device.is_filtered.then_some(StatusIcon::Locked),
                action: RowAction::ToggleFilter {
                    device: device.name.clone(),
                    is_filtered: device.is_filtered,
                },
            });
            stats.rows += 1;
        }

        surface.refresh();
        self.log_pass(CollectionKind::Devices, stats);
        stats
    }

    fn log_pass(&self, kind: CollectionKind, stats: RenderStats) {
        if stats.skipped > 0 {
            tracing::debug!(
                container = %self.container(kind).id,
                skipped = stats.skipped,
                "Skipped entries without a name"
            );
        }
        tracing::debug!(container = %self.container(kind).id, rows = stats.rows, "Rendered list");
    }
}
