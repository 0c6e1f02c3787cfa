//! In-memory stand-ins for the browser: a map widget, a platform and guard
//! types that count how many of them are alive.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use shared::{CatchAction, CatchId, CatchRecord, ClientConfig, Coordinates};

use super::marker_layer::MapWidget;
use crate::catch_service::FetchError;
use crate::error_display::NotificationVariant;
use crate::platform::MapPlatform;

pub fn record(id: i64, species: &str, length: f64, weight: f64, location: &str, username: &str) -> CatchRecord {
    CatchRecord {
        id: CatchId(id),
        species: species.to_string(),
        length,
        weight,
        location: location.to_string(),
        date: "2021-06-01".to_string(),
        image_url: format!("/images/{id}.jpg"),
        username: username.to_string(),
    }
}

// ===== GUARDS =====

#[derive(Clone, Default)]
pub struct GuardCounter {
    created: Rc<Cell<usize>>,
    live: Rc<Cell<usize>>,
}

impl GuardCounter {
    pub fn guard(&self) -> TestGuard {
        self.created.set(self.created.get() + 1);
        self.live.set(self.live.get() + 1);
        TestGuard {
            live: self.live.clone(),
        }
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn live(&self) -> usize {
        self.live.get()
    }
}

pub struct TestGuard {
    live: Rc<Cell<usize>>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

// ===== MAP =====

struct FakeMarker {
    id: usize,
    catch_id: CatchId,
    popup_html: String,
    popup_open: bool,
}

#[derive(Default)]
struct FakeMapState {
    next_id: usize,
    markers: Vec<FakeMarker>,
    disposed: bool,
}

#[derive(Clone, Default)]
pub struct FakeMap {
    state: Rc<RefCell<FakeMapState>>,
}

impl FakeMap {
    pub fn marker_count(&self) -> usize {
        self.state.borrow().markers.len()
    }

    pub fn open_popups(&self) -> Vec<CatchId> {
        self.state
            .borrow()
            .markers
            .iter()
            .filter(|marker| marker.popup_open)
            .map(|marker| marker.catch_id)
            .collect()
    }

    pub fn popup_html(&self, catch_id: CatchId) -> Option<String> {
        self.state
            .borrow()
            .markers
            .iter()
            .find(|marker| marker.catch_id == catch_id)
            .map(|marker| marker.popup_html.clone())
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }
}

impl MapWidget for FakeMap {
    type Marker = usize;

    fn add_marker(&self, catch_id: CatchId, _position: Coordinates, popup_html: &str) -> usize {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.markers.push(FakeMarker {
            id,
            catch_id,
            popup_html: popup_html.to_string(),
            popup_open: false,
        });
        id
    }

    fn open_popup(&self, marker: &usize) {
        let mut state = self.state.borrow_mut();
        for candidate in state.markers.iter_mut() {
            candidate.popup_open = candidate.id == *marker;
        }
    }

    fn remove_marker(&self, marker: &usize) {
        self.state.borrow_mut().markers.retain(|candidate| candidate.id != *marker);
    }

    fn dispose(&self) {
        let mut state = self.state.borrow_mut();
        state.markers.clear();
        state.disposed = true;
    }
}

// ===== PLATFORM =====

type FetchResult = Result<Vec<CatchRecord>, FetchError>;

#[derive(Default)]
struct FakePlatformState {
    responses: RefCell<VecDeque<oneshot::Receiver<FetchResult>>>,
    delegate: RefCell<Option<Box<dyn Fn(CatchAction)>>>,
    flashes: RefCell<Vec<(String, NotificationVariant)>>,
    edited: RefCell<Vec<CatchId>>,
    deleted: RefCell<Vec<CatchId>>,
    username: RefCell<Option<String>>,
    position: Cell<Option<Coordinates>>,
    config: ClientConfig,
}

/// Cloning shares the state, so a test keeps a handle to the platform it
/// moved into the controller.
#[derive(Clone, Default)]
pub struct FakePlatform {
    state: Rc<FakePlatformState>,
    pub listeners: GuardCounter,
    pub tracking: GuardCounter,
}

impl FakePlatform {
    /// Queues a response the next fetch receives immediately.
    pub fn respond_with(&self, result: FetchResult) {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(result);
        self.state.responses.borrow_mut().push_back(receiver);
    }

    /// Queues a response that stays pending until the returned sender fires.
    pub fn defer_response(&self) -> oneshot::Sender<FetchResult> {
        let (sender, receiver) = oneshot::channel();
        self.state.responses.borrow_mut().push_back(receiver);
        sender
    }

    pub fn log_in(&self, username: &str) {
        *self.state.username.borrow_mut() = Some(username.to_string());
    }

    pub fn set_position(&self, position: Coordinates) {
        self.state.position.set(Some(position));
    }

    /// Simulates a click on a popup action button.
    pub fn click(&self, action: CatchAction) {
        if let Some(delegate) = self.state.delegate.borrow().as_ref() {
            delegate(action);
        }
    }

    pub fn flashes(&self) -> Vec<(String, NotificationVariant)> {
        self.state.flashes.borrow().clone()
    }

    pub fn edited(&self) -> Vec<CatchId> {
        self.state.edited.borrow().clone()
    }

    pub fn deleted(&self) -> Vec<CatchId> {
        self.state.deleted.borrow().clone()
    }
}

impl MapPlatform for FakePlatform {
    type Map = FakeMap;
    type Listener = TestGuard;
    type Tracking = TestGuard;

    async fn fetch_catches(&self) -> FetchResult {
        let receiver = self.state.responses.borrow_mut().pop_front();
        match receiver {
            Some(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(FetchError::Network("response dropped".to_string()))),
            None => Err(FetchError::Network("no response queued".to_string())),
        }
    }

    fn install_click_delegate(&self, on_action: Box<dyn Fn(CatchAction)>) -> TestGuard {
        *self.state.delegate.borrow_mut() = Some(on_action);
        self.listeners.guard()
    }

    fn start_position_tracking(&self, _map: &FakeMap) -> TestGuard {
        self.tracking.guard()
    }

    fn user_position(&self) -> Option<Coordinates> {
        self.state.position.get()
    }

    fn session_username(&self) -> Option<String> {
        self.state.username.borrow().clone()
    }

    fn client_config(&self) -> ClientConfig {
        self.state.config.clone()
    }

    fn flash(&self, message: String, variant: NotificationVariant) {
        self.state.flashes.borrow_mut().push((message, variant));
    }

    fn edit_catch(&self, catch_id: CatchId) {
        self.state.edited.borrow_mut().push(catch_id);
    }

    fn delete_catch(&self, catch_id: CatchId) {
        self.state.deleted.borrow_mut().push(catch_id);
    }
}
