// List Sync Controller
// Turns add/remove/toggle intents into appliance requests and re-derives the
// displayed lists from a fresh fetch after every accepted mutation

use std::collections::{BTreeMap, HashMap};

use super::api::{ApiRequest, Outcome};
use super::dispatch::{Completion, Dispatcher, RequestId};
use super::failure::{Failure, FailureChannel};
use crate::config::SyncSettings;
use crate::core::{normalize_name, parse_boolean, Collection, CollectionKind, FlagValue};
use crate::ui::renderer::{ListRenderer, ListSurface, RenderStats, RowAction};

/// One surface per collection kind
#[derive(Debug, Clone, Default)]
pub struct ListSurfaces<S> {
    pub domains: S,
    pub sites: S,
    pub devices: S,
}

impl<S> ListSurfaces<S> {
    /// Build all three surfaces from a constructor
    pub fn from_fn(mut make: impl FnMut(CollectionKind) -> S) -> Self {
        Self {
            domains: make(CollectionKind::Domains),
            sites: make(CollectionKind::Sites),
            devices: make(CollectionKind::Devices),
        }
    }

    pub fn get(&self, kind: CollectionKind) -> &S {
        match kind {
            CollectionKind::Domains => &self.domains,
            CollectionKind::Sites => &self.sites,
            CollectionKind::Devices => &self.devices,
        }
    }

    pub fn get_mut(&mut self, kind: CollectionKind) -> &mut S {
        match kind {
            CollectionKind::Domains => &mut self.domains,
            CollectionKind::Sites => &mut self.sites,
            CollectionKind::Devices => &mut self.devices,
        }
    }
}

/// What became of a completion once applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A fetch replaced the displayed list
    Rendered(RenderStats),
    /// A mutation was accepted and a re-fetch was issued
    Refetching(RequestId),
    /// A fetch older than the displayed list was ignored
    Stale,
    /// The request failed and was reported
    Failed,
}

/// Keeps each displayed list a projection of the last server read
pub struct ListSyncController<D, F, S> {
    dispatcher: D,
    failures: F,
    renderer: ListRenderer,
    surfaces: ListSurfaces<S>,
    settings: SyncSettings,
    next_id: u64,
    in_flight: BTreeMap<RequestId, ApiRequest>,
    displayed: HashMap<CollectionKind, RequestId>,
}

impl<D, F, S> ListSyncController<D, F, S>
where
    D: Dispatcher,
    F: FailureChannel,
    S: ListSurface,
{
    pub fn new(
        dispatcher: D,
        failures: F,
        renderer: ListRenderer,
        surfaces: ListSurfaces<S>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            dispatcher,
            failures,
            renderer,
            surfaces,
            settings,
            next_id: 1,
            in_flight: BTreeMap::new(),
            displayed: HashMap::new(),
        }
    }

    /// Read a collection; its surface is re-rendered when the read completes
    pub fn fetch_collection(&mut self, kind: CollectionKind) -> RequestId {
        self.send(ApiRequest::Fetch { kind })
    }

    /// Fetch all three collections
    pub fn refresh_all(&mut self) -> Vec<RequestId> {
        CollectionKind::ALL
            .into_iter()
            .map(|kind| self.fetch_collection(kind))
            .collect()
    }

    /// Submit a new entry. Blank input and non-editable kinds send nothing.
    pub fn add_entry(&mut self, kind: CollectionKind, raw_name: &str) -> Option<RequestId> {
        if !kind.is_editable() {
            tracing::debug!(%kind, "Entries cannot be added to this list");
            return None;
        }
        let Some(name) = normalize_name(raw_name) else {
            tracing::debug!(%kind, "Ignoring blank entry");
            return None;
        };
        Some(self.send(ApiRequest::Add { kind, name }))
    }

    /// Delete an entry by name
    pub fn remove_entry(&mut self, kind: CollectionKind, name: &str) -> Option<RequestId> {
        if !kind.is_editable() || name.trim().is_empty() {
            tracing::debug!(%kind, name, "Ignoring remove request");
            return None;
        }
        Some(self.send(ApiRequest::Remove {
            kind,
            name: name.to_string(),
        }))
    }

    /// Ask for the inverse of the device's current filtering state
    pub fn toggle_device_filter(
        &mut self,
        device: &str,
        current_is_filtered: impl Into<FlagValue>,
    ) -> RequestId {
        let value = !parse_boolean(&current_is_filtered.into());
        self.send(ApiRequest::SetFiltered {
            device: device.to_string(),
            value,
        })
    }

    /// Change a device's display label. A blank label sends nothing.
    pub fn rename_device(&mut self, device: &str, display_name: &str) -> Option<RequestId> {
        let display_name = display_name.trim();
        if device.trim().is_empty() || display_name.is_empty() {
            tracing::debug!(device, "Ignoring blank rename");
            return None;
        }
        Some(self.send(ApiRequest::RenameDevice {
            device: device.to_string(),
            display_name: display_name.to_string(),
        }))
    }

    /// Run the handler a row was built with. `input` is the new-entry text.
    pub fn activate(&mut self, action: &RowAction, input: &str) -> Option<RequestId> {
        match action {
            RowAction::NewEntry { kind } => self.add_entry(*kind, input),
            RowAction::Remove { kind, name } => self.remove_entry(*kind, name),
            RowAction::ToggleFilter {
                device,
                is_filtered,
            } => Some(self.toggle_device_filter(device, *is_filtered)),
        }
    }

    /// Apply a finished request on the UI thread
    pub fn handle_completion(&mut self, completion: Completion) -> Applied {
        let Completion {
            id,
            request,
            result,
        } = completion;
        self.in_flight.remove(&id);

        match result {
            Err(error) => {
                self.failures.report(Failure { request, error });
                Applied::Failed
            }
            Ok(Outcome::Applied) => {
                tracing::info!(%id, %request, "Appliance accepted change");
                Applied::Refetching(self.fetch_collection(request.kind()))
            }
            Ok(Outcome::Fetched(collection)) => self.apply_fetch(id, &request, collection),
        }
    }

    fn apply_fetch(&mut self, id: RequestId, request: &ApiRequest, collection: Collection) -> Applied {
        let kind = collection.kind();
        if kind != request.kind() {
            tracing::warn!(%id, %request, received = %kind, "Fetch returned another collection");
        }

        if self.settings.discard_stale_fetches {
            if let Some(shown) = self.displayed.get(&kind) {
                if id < *shown {
                    tracing::debug!(%id, shown = %shown, %kind, "Discarding stale fetch");
                    return Applied::Stale;
                }
            }
        }

        let stats = self.renderer.render(self.surfaces.get_mut(kind), &collection);
        self.displayed.insert(kind, id);
        tracing::info!(%id, %kind, entries = collection.len(), rows = stats.rows, "List refreshed");
        Applied::Rendered(stats)
    }

    fn send(&mut self, request: ApiRequest) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        tracing::debug!(%id, %request, "Dispatching");
        self.in_flight.insert(id, request.clone());
        self.dispatcher.dispatch(id, request);
        id
    }

    /// Requests dispatched and not yet completed
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Request whose fetch produced the displayed list
    pub fn displayed_generation(&self, kind: CollectionKind) -> Option<RequestId> {
        self.displayed.get(&kind).copied()
    }

    pub fn surface(&self, kind: CollectionKind) -> &S {
        self.surfaces.get(kind)
    }

    pub fn surface_mut(&mut self, kind: CollectionKind) -> &mut S {
        self.surfaces.get_mut(kind)
    }

    pub fn renderer(&self) -> &ListRenderer {
        &self.renderer
    }

    pub fn failures(&self) -> &F {
        &self.failures
    }

    pub fn failures_mut(&mut self) -> &mut F {
        &mut self.failures
    }
}
