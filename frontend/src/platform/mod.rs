//! Platform abstraction for the map view
//!
//! Everything the map view needs from the browser (catch service, document
//! click delegation, geolocation, session, flash messages and the edit/delete
//! collaborators) goes through [`MapPlatform`]. The browser implementation is
//! [`WebPlatform`]; unit tests use an in-memory one.

use shared::{CatchAction, CatchId, CatchRecord, ClientConfig, Coordinates};

use crate::catch_service::FetchError;
use crate::error_display::NotificationVariant;
use crate::map_view::MapWidget;

pub mod web;
pub use web::WebPlatform;

pub trait MapPlatform: 'static {
    type Map: MapWidget;
    /// Guard of an attached DOM listener; dropping it detaches the listener.
    type Listener;
    /// Guard of the position-update task; dropping it cancels the task.
    type Tracking;

    async fn fetch_catches(&self) -> Result<Vec<CatchRecord>, FetchError>;

    /// Attaches one document-level click listener that decodes [`CatchAction`]s
    /// from clicked popup buttons.
    fn install_click_delegate(&self, on_action: Box<dyn Fn(CatchAction)>) -> Self::Listener;

    fn start_position_tracking(&self, map: &Self::Map) -> Self::Tracking;

    /// Last known position of the user, if any fix arrived yet.
    fn user_position(&self) -> Option<Coordinates>;

    fn session_username(&self) -> Option<String>;

    fn client_config(&self) -> ClientConfig;

    fn flash(&self, message: String, variant: NotificationVariant);

    fn edit_catch(&self, catch_id: CatchId);

    fn delete_catch(&self, catch_id: CatchId);
}
