use std::cell::{Cell, RefCell};
use std::rc::Rc;

use shared::{
    ActionKind, CatchAction, CatchId, CatchRecord, Coordinates, FilterState, LENGTH_STEPS, RangeSelection,
    StepTable, WEIGHT_STEPS,
};
use zoon::{Mutable, Signal};

use super::data_store::DataStore;
use super::listeners::{ListenerRegistry, ListenerTarget};
use super::marker_layer::{MapWidget, MarkerLayer, PopupContext};
use crate::debug_utils::DEBUG_MAP_VIEW;
use crate::error_display::NotificationVariant;
use crate::platform::MapPlatform;

/// Parameters of one map view activation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MapActivation {
    /// Explicit map center, e.g. the position of a freshly logged catch.
    pub center: Option<Coordinates>,
    /// Catch whose popup opens once the markers are built.
    pub open_catch_id: Option<CatchId>,
}

impl MapActivation {
    pub fn focused_on(catch_id: CatchId) -> Self {
        Self {
            center: None,
            open_catch_id: Some(catch_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Rendered,
    LoadFailed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: Coordinates,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeAxis {
    Length,
    Weight,
}

impl RangeAxis {
    pub fn steps(&self) -> StepTable {
        match self {
            RangeAxis::Length => LENGTH_STEPS,
            RangeAxis::Weight => WEIGHT_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeHandle {
    From,
    To,
}

struct ActiveView<W: MapWidget> {
    store: DataStore,
    filter: FilterState,
    activation: MapActivation,
    markers: Option<MarkerLayer<W>>,
}

impl<W: MapWidget> Default for ActiveView<W> {
    fn default() -> Self {
        Self {
            store: DataStore::default(),
            filter: FilterState::widest(),
            activation: MapActivation::default(),
            markers: None,
        }
    }
}

/// Drives the map view through `Idle → Loading → {Rendered | LoadFailed}`.
///
/// Every `init` starts a new activation with its own generation number. Work
/// that finishes for an older generation (a late fetch, a map container
/// inserted after the view moved on) is discarded.
pub struct MapViewController<P: MapPlatform> {
    platform: P,
    generation: Cell<u64>,
    state: Mutable<ViewState>,
    total_count: Mutable<usize>,
    visible_count: Mutable<usize>,
    length_selection: Mutable<RangeSelection>,
    weight_selection: Mutable<RangeSelection>,
    view: RefCell<ActiveView<P::Map>>,
    listeners: RefCell<ListenerRegistry<P::Listener, P::Tracking>>,
}

impl<P: MapPlatform> MapViewController<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            generation: Cell::new(0),
            state: Mutable::new(ViewState::Idle),
            total_count: Mutable::new(0),
            visible_count: Mutable::new(0),
            length_selection: Mutable::new(LENGTH_STEPS.full_range()),
            weight_selection: Mutable::new(WEIGHT_STEPS.full_range()),
            view: RefCell::new(ActiveView::default()),
            listeners: RefCell::new(ListenerRegistry::new()),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    // ===== LIFECYCLE =====

    /// Starts a new activation: tears down the previous one, fetches the
    /// catches and renders them. A fetch that resolves after a newer `init`
    /// leaves the view untouched.
    pub async fn init(self: &Rc<Self>, activation: MapActivation) {
        let generation = self.begin_activation(activation);

        let loaded = DataStore::load(&self.platform).await;

        if generation != self.generation.get() {
            debug_log!(DEBUG_MAP_VIEW, "MapView: discarding catches of stale activation {generation}");
            return;
        }

        match loaded {
            Ok(store) => self.render(store),
            Err(error) => {
                console_error!("MapView: loading catches failed: {error}");
                self.state.set(ViewState::LoadFailed);
                self.platform.flash(error.user_message(), NotificationVariant::Error);
            }
        }
    }

    fn begin_activation(&self, activation: MapActivation) -> u64 {
        self.listeners.borrow_mut().clear_all();

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let previous = std::mem::replace(
            &mut *self.view.borrow_mut(),
            ActiveView {
                activation,
                ..ActiveView::default()
            },
        );
        if let Some(markers) = previous.markers {
            markers.dispose();
        }

        self.state.set(ViewState::Loading);
        debug_log!(DEBUG_MAP_VIEW, "MapView: activation {generation} loading");
        generation
    }

    fn render(self: &Rc<Self>, store: DataStore) {
        let (total, visible) = {
            let mut view = self.view.borrow_mut();
            view.store = store;
            view.filter = FilterState::widest();
            (view.store.len(), mappable_count(&view.store.visible(&view.filter)))
        };
        self.length_selection.set(LENGTH_STEPS.full_range());
        self.weight_selection.set(WEIGHT_STEPS.full_range());
        self.total_count.set(total);
        self.visible_count.set(visible);

        let controller = Rc::downgrade(self);
        let delegate = self.platform.install_click_delegate(Box::new(move |action| {
            if let Some(controller) = controller.upgrade() {
                controller.dispatch_action(action);
            }
        }));
        self.listeners.borrow_mut().register_click_delegate(delegate);

        self.state.set(ViewState::Rendered);
    }

    /// Hands the freshly created map widget to the activation that asked for
    /// it. Builds the markers and starts position tracking. Returns `false`
    /// and disposes the widget when the activation is stale or already has a
    /// map.
    pub fn attach_map(&self, generation: u64, map: P::Map) -> bool {
        if generation != self.generation.get() || self.state.get() != ViewState::Rendered {
            debug_log!(DEBUG_MAP_VIEW, "MapView: map of stale activation {generation} disposed");
            map.dispose();
            return false;
        }

        let mut view = self.view.borrow_mut();
        if view.markers.is_some() {
            map.dispose();
            return false;
        }

        let tracking = self.platform.start_position_tracking(&map);
        if let Err(error) = self.listeners.borrow_mut().register_periodic_task(tracking) {
            console_error!("MapView: {error}");
        }

        let popup = PopupContext {
            viewer: self.platform.session_username(),
            config: self.platform.client_config(),
        };
        let mut layer = MarkerLayer::new(map, popup);
        let visible = view.store.visible(&view.filter);
        layer.build(&visible, view.activation.open_catch_id);
        drop(visible);
        view.markers = Some(layer);
        true
    }

    /// Records a listener attached to one of the filter controls. Listeners
    /// of a stale activation are dropped immediately.
    pub fn register_control_listener(
        &self,
        generation: u64,
        event_type: &'static str,
        target: ListenerTarget,
        listener: P::Listener,
    ) -> bool {
        if generation != self.generation.get() {
            return false;
        }
        self.listeners
            .borrow_mut()
            .register_listener(event_type, target, listener);
        true
    }

    // ===== FILTERING =====

    pub fn set_species_filter(&self, species_substring: &str) {
        self.update_filter(|filter| filter.species_substring = species_substring.to_string());
    }

    /// Moves one handle of a range control and returns the resulting
    /// selection, which may be clamped against the other handle.
    pub fn move_range_handle(&self, axis: RangeAxis, handle: RangeHandle, index: usize) -> RangeSelection {
        let steps = axis.steps();
        let selection = self.selection_mutable(axis);
        let current = selection.get();
        if self.state.get() != ViewState::Rendered {
            return current;
        }

        let moved = match handle {
            RangeHandle::From => current.with_from(index, &steps),
            RangeHandle::To => current.with_to(index, &steps),
        };
        selection.set_neq(moved);

        let range = steps.value_range(moved);
        self.update_filter(|filter| match axis {
            RangeAxis::Length => filter.length = range,
            RangeAxis::Weight => filter.weight = range,
        });
        moved
    }

    fn update_filter(&self, change: impl FnOnce(&mut FilterState)) {
        if self.state.get() != ViewState::Rendered {
            return;
        }

        let visible_count = {
            let mut view = self.view.borrow_mut();
            let ActiveView {
                store,
                filter,
                markers,
                ..
            } = &mut *view;
            change(filter);
            let visible = store.visible(filter);
            match markers {
                Some(markers) => {
                    markers.build(&visible, None);
                    markers.len()
                }
                None => mappable_count(&visible),
            }
        };
        self.visible_count.set_neq(visible_count);
    }

    fn selection_mutable(&self, axis: RangeAxis) -> &Mutable<RangeSelection> {
        match axis {
            RangeAxis::Length => &self.length_selection,
            RangeAxis::Weight => &self.weight_selection,
        }
    }

    // ===== ACTIONS =====

    pub fn dispatch_action(&self, action: CatchAction) {
        debug_log!(DEBUG_MAP_VIEW, "MapView: {} catch {}", action.kind, action.catch_id);
        match action.kind {
            ActionKind::Edit => self.platform.edit_catch(action.catch_id),
            ActionKind::Delete => self.platform.delete_catch(action.catch_id),
        }
    }

    // ===== QUERIES =====

    /// Where the map opens: the explicit center, else the catch whose popup
    /// will open, else the user's last position, else the configured default.
    pub fn viewport(&self) -> MapViewport {
        let config = self.platform.client_config();
        let view = self.view.borrow();
        let activation = view.activation;

        let focused = activation
            .center
            .or_else(|| {
                activation
                    .open_catch_id
                    .and_then(|catch_id| view.store.find(catch_id))
                    .and_then(|record| record.coordinates().ok())
            })
            .or_else(|| self.platform.user_position());

        match focused {
            Some(center) => MapViewport {
                center,
                zoom: config.focused_zoom,
            },
            None => MapViewport {
                center: config.default_center,
                zoom: config.default_zoom,
            },
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn state(&self) -> ViewState {
        self.state.get()
    }

    pub fn state_signal(&self) -> impl Signal<Item = ViewState> + use<P> {
        self.state.signal()
    }

    pub fn visible_count_signal(&self) -> impl Signal<Item = usize> + use<P> {
        self.visible_count.signal()
    }

    pub fn total_count_signal(&self) -> impl Signal<Item = usize> + use<P> {
        self.total_count.signal()
    }

    pub fn selection(&self, axis: RangeAxis) -> RangeSelection {
        self.selection_mutable(axis).get()
    }

    pub fn selection_signal(&self, axis: RangeAxis) -> impl Signal<Item = RangeSelection> + use<P> {
        self.selection_mutable(axis).signal()
    }

    pub fn marker_count(&self) -> usize {
        self.view
            .borrow()
            .markers
            .as_ref()
            .map_or(0, |markers| markers.len())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().listener_count()
    }

    pub fn has_position_tracking(&self) -> bool {
        self.listeners.borrow().has_periodic_task()
    }
}

/// Records that can be placed on the map. Malformed locations are skipped by
/// the marker layer, so they are not counted as visible either.
fn mappable_count(records: &[&CatchRecord]) -> usize {
    records
        .iter()
        .filter(|record| record.coordinates().is_ok())
        .count()
}
