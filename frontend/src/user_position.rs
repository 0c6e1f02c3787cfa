//! Live user position on the map.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Interval;
use shared::Coordinates;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{GeolocationPosition, PositionOptions};
use zoon::Task;

use crate::debug_utils::DEBUG_POSITION;
use crate::leaflet::{CircleMarker, LeafletMap};

thread_local! {
    static LAST_POSITION: Cell<Option<Coordinates>> = const { Cell::new(None) };
}

/// Last geolocation fix, kept across map activations.
pub fn last_position() -> Option<Coordinates> {
    LAST_POSITION.with(Cell::get)
}

/// At most one geolocation request in flight, and nothing applied after stop.
#[derive(Debug)]
struct RequestGate {
    active: Cell<bool>,
    pending: Cell<bool>,
}

impl RequestGate {
    fn new() -> Self {
        Self {
            active: Cell::new(true),
            pending: Cell::new(false),
        }
    }

    /// `false` while stopped or while the previous request is unanswered.
    fn try_begin(&self) -> bool {
        if !self.active.get() || self.pending.get() {
            return false;
        }
        self.pending.set(true);
        true
    }

    /// Marks the request answered. Returns whether its result may be applied.
    fn settle(&self) -> bool {
        self.pending.set(false);
        self.active.get()
    }

    /// Returns whether a request is still in flight.
    fn stop(&self) -> bool {
        self.active.set(false);
        self.pending.get()
    }
}

struct TrackingState {
    gate: RequestGate,
    map: LeafletMap,
    circle: RefCell<Option<CircleMarker>>,
    // Callbacks of a request that outlived its tracking guard
    retired: RefCell<Option<Rc<GeolocationCallbacks>>>,
}

impl TrackingState {
    fn apply(&self, position: Coordinates) {
        LAST_POSITION.with(|last| last.set(Some(position)));

        let mut slot = self.circle.borrow_mut();
        let moved = match slot.take() {
            Some(existing) => {
                existing.move_to(position);
                Some(existing)
            }
            None => self
                .map
                .add_position_marker(position)
                .inspect_err(|error| console_error!("Position marker: {error}"))
                .ok(),
        };
        *slot = moved;
    }

    /// Called from inside a callback once the request has settled after stop.
    /// The callbacks are freed on a later tick, never while one is running.
    fn release_retired(&self) {
        if let Some(retired) = self.retired.borrow_mut().take() {
            Task::start(async move { drop(retired) });
        }
    }
}

struct GeolocationCallbacks {
    on_position: Closure<dyn FnMut(GeolocationPosition)>,
    on_error: Closure<dyn FnMut(JsValue)>,
}

impl GeolocationCallbacks {
    fn new(state: &Rc<TrackingState>) -> Self {
        let on_position = {
            let state = state.clone();
            Closure::new(move |position: GeolocationPosition| {
                if !state.gate.settle() {
                    state.release_retired();
                    return;
                }
                let coords = position.coords();
                state.apply(Coordinates::new(coords.latitude(), coords.longitude()));
            })
        };
        let on_error = {
            let state = state.clone();
            Closure::new(move |error: JsValue| {
                if !state.gate.settle() {
                    state.release_retired();
                    return;
                }
                debug_log!(DEBUG_POSITION, "Geolocation unavailable: {error:?}");
            })
        };
        Self { on_position, on_error }
    }
}

/// Polls the browser's geolocation while alive. Dropping it stops polling,
/// and a fix still in flight is ignored when it arrives.
pub struct PositionTracking {
    state: Rc<TrackingState>,
    callbacks: Option<Rc<GeolocationCallbacks>>,
    _interval: Interval,
}

impl Drop for PositionTracking {
    fn drop(&mut self) {
        if self.state.gate.stop() {
            // geolocation still holds the callbacks; they go once it answers
            *self.state.retired.borrow_mut() = self.callbacks.take();
        }
        debug_log!(DEBUG_POSITION, "Position tracking stopped");
    }
}

pub fn start(map: &LeafletMap, interval_ms: u32) -> PositionTracking {
    let state = Rc::new(TrackingState {
        gate: RequestGate::new(),
        map: map.clone(),
        circle: RefCell::default(),
        retired: RefCell::default(),
    });
    let callbacks = Rc::new(GeolocationCallbacks::new(&state));

    let update = {
        let state = state.clone();
        let callbacks = callbacks.clone();
        move || request_position(&state, &callbacks, interval_ms)
    };
    update();
    debug_log!(DEBUG_POSITION, "Position tracking every {interval_ms} ms");

    PositionTracking {
        state,
        callbacks: Some(callbacks),
        _interval: Interval::new(interval_ms, update),
    }
}

fn request_position(state: &TrackingState, callbacks: &GeolocationCallbacks, interval_ms: u32) {
    let Some(geolocation) = web_sys::window().and_then(|window| window.navigator().geolocation().ok()) else {
        return;
    };
    if !state.gate.try_begin() {
        return;
    }

    // A timeout guarantees every request is answered, so retired callbacks are freed
    let options = PositionOptions::new();
    options.set_timeout(interval_ms);
    options.set_maximum_age(interval_ms);

    if let Err(error) = geolocation.get_current_position_with_error_callback_and_options(
        callbacks.on_position.as_ref().unchecked_ref(),
        Some(callbacks.on_error.as_ref().unchecked_ref()),
        &options,
    ) {
        state.gate.settle();
        debug_log!(DEBUG_POSITION, "Geolocation request failed: {error:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_polls_wait_for_answer() {
        let gate = RequestGate::new();
        assert!(gate.try_begin());
        assert!(!gate.try_begin());

        assert!(gate.settle());
        assert!(gate.try_begin());
    }

    #[test]
    fn test_fix_after_stop_is_ignored() {
        let gate = RequestGate::new();
        assert!(gate.try_begin());

        // teardown while the request is in flight
        assert!(gate.stop());
        assert!(!gate.settle());
        assert!(!gate.try_begin());
    }

    #[test]
    fn test_stop_without_request_in_flight() {
        let gate = RequestGate::new();
        assert!(!gate.stop());
        assert!(!gate.try_begin());
    }
}
