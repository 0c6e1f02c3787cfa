//! Browser implementation of the map view platform.

use gloo_events::EventListener;
use shared::{ACTION_ATTRIBUTE, CATCH_ID_ATTRIBUTE, CatchAction, CatchId, CatchRecord, ClientConfig, Coordinates};
use wasm_bindgen::JsCast;
use zoon::Task;

use crate::catch_service::{self, FetchError};
use crate::dataflow::Relay;
use crate::error_display::{FlashMessage, FlashMessages, NotificationVariant};
use crate::leaflet::LeafletMap;
use crate::map_view::MapActivation;
use crate::platform::MapPlatform;
use crate::session;
use crate::user_position::{self, PositionTracking};

#[derive(Clone)]
pub struct WebPlatform {
    config: ClientConfig,
    flash_messages: FlashMessages,
    map_requested_relay: Relay<MapActivation>,
}

impl WebPlatform {
    pub fn new(config: ClientConfig, flash_messages: FlashMessages, map_requested_relay: Relay<MapActivation>) -> Self {
        Self {
            config,
            flash_messages,
            map_requested_relay,
        }
    }

    fn confirm(&self, question: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(question).ok())
            .unwrap_or(false)
    }
}

/// Finds the action button the click landed on, or inside of.
fn action_from_event(event: &web_sys::Event) -> Option<CatchAction> {
    let target = event.target()?.dyn_into::<web_sys::Element>().ok()?;
    let button = target.closest(&format!("[{ACTION_ATTRIBUTE}]")).ok()??;
    CatchAction::from_attributes(
        button.get_attribute(ACTION_ATTRIBUTE).as_deref(),
        button.get_attribute(CATCH_ID_ATTRIBUTE).as_deref(),
    )
}

impl MapPlatform for WebPlatform {
    type Map = LeafletMap;
    type Listener = EventListener;
    type Tracking = PositionTracking;

    async fn fetch_catches(&self) -> Result<Vec<CatchRecord>, FetchError> {
        catch_service::fetch_catches(&self.config).await
    }

    fn install_click_delegate(&self, on_action: Box<dyn Fn(CatchAction)>) -> EventListener {
        EventListener::new(&zoon::document(), "click", move |event| {
            if let Some(action) = action_from_event(event) {
                on_action(action);
            }
        })
    }

    fn start_position_tracking(&self, map: &LeafletMap) -> PositionTracking {
        user_position::start(map, self.config.position_update_interval_ms)
    }

    fn user_position(&self) -> Option<Coordinates> {
        user_position::last_position()
    }

    fn session_username(&self) -> Option<String> {
        session::username()
    }

    fn client_config(&self) -> ClientConfig {
        self.config.clone()
    }

    fn flash(&self, message: String, variant: NotificationVariant) {
        self.flash_messages
            .flash(FlashMessage::new(message, variant, self.config.flash_dismiss_ms));
    }

    /// Reopens the map focused on the catch with its popup open.
    fn edit_catch(&self, catch_id: CatchId) {
        self.map_requested_relay.send(MapActivation::focused_on(catch_id));
    }

    fn delete_catch(&self, catch_id: CatchId) {
        let Some(token) = session::token() else {
            self.flash("Please log in to delete catches.".to_string(), NotificationVariant::Error);
            return;
        };
        if !self.confirm("Delete this catch?") {
            return;
        }

        let platform = self.clone();
        Task::start(async move {
            match catch_service::delete_catch(&platform.config, catch_id, &token).await {
                Ok(()) => {
                    platform.flash("Catch deleted.".to_string(), NotificationVariant::Success);
                    platform.map_requested_relay.send(MapActivation::default());
                }
                Err(error) => {
                    console_error!("Deleting catch {catch_id} failed: {error}");
                    platform.flash(error.user_message(), NotificationVariant::Error);
                }
            }
        });
    }
}
