//! FishingLogApp - navigation shell around the map view

use std::rc::Rc;

use futures::StreamExt;
use shared::ClientConfig;
use zoon::*;

use crate::connection::{ConnectionAdapter, load_client_config};
use crate::dataflow::{Relay, relay};
use crate::debug_utils::debug_critical;
use crate::error_display::{FlashMessage, FlashMessages};
use crate::error_ui::flash_messages_container;
use crate::map_view::{MapActivation, MapViewController, map_view};
use crate::platform::WebPlatform;
use crate::session;

pub struct FishingLogApp {
    pub flash_messages: FlashMessages,

    pub map_view: Rc<MapViewController<WebPlatform>>,

    // === EVENT-SOURCE RELAYS ===
    /// Map view (re)activation requested: navigation, edit, finished delete
    pub map_requested_relay: Relay<MapActivation>,

    connection: ConnectionAdapter,
    activation_task: TaskHandle,
}

impl FishingLogApp {
    pub async fn new() -> Self {
        let flash_messages = FlashMessages::new();

        let (connection, mut down_msg_stream) = ConnectionAdapter::new();
        let config = match load_client_config(&connection, &mut down_msg_stream).await {
            Ok(config) => config,
            Err(error) => {
                debug_critical(&format!("Client configuration unavailable: {error}"));
                let config = ClientConfig::default();
                flash_messages.flash(FlashMessage::error(&error, config.flash_dismiss_ms));
                config
            }
        };

        let (map_requested_relay, mut map_requested_stream) = relay::<MapActivation>();
        let platform = WebPlatform::new(config, flash_messages.clone(), map_requested_relay.clone());
        let map_view = Rc::new(MapViewController::new(platform));

        let activation_task = Task::start_droppable({
            let map_view = map_view.clone();
            async move {
                while let Some(activation) = map_requested_stream.next().await {
                    let map_view = map_view.clone();
                    Task::start(async move { map_view.init(activation).await });
                }
            }
        });

        map_requested_relay.send(MapActivation::default());

        Self {
            flash_messages,
            map_view,
            map_requested_relay,
            connection,
            activation_task,
        }
    }

    /// Root element; owns the app for as long as it is mounted.
    pub fn root(self) -> impl Element {
        let Self {
            flash_messages,
            map_view: controller,
            map_requested_relay,
            connection,
            activation_task,
        } = self;

        Column::new()
            .s(Width::fill())
            .s(Height::fill())
            .s(Font::new().family([FontFamily::new("Inter"), FontFamily::SansSerif]))
            .item(navigation(map_requested_relay))
            .item(
                El::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .update_raw_el(|raw_el| raw_el.attr("id", "content"))
                    .child(map_view(controller)),
            )
            .item(flash_messages_container(flash_messages))
            .after_remove(move |_| {
                drop(activation_task);
                drop(connection);
            })
    }
}

fn navigation(map_requested_relay: Relay<MapActivation>) -> impl Element {
    let (hovered, hovered_signal) = Mutable::new_and_signal(false);

    Row::new()
        .s(Width::fill())
        .s(Padding::new().x(16).y(10))
        .s(Gap::new().x(16))
        .s(Background::new().color(hsluv!(220, 40, 25)))
        .s(Font::new().color(hsluv!(0, 0, 100)))
        .item(
            El::new()
                .s(Font::new().size(20).weight(FontWeight::Bold))
                .child("Fishing Log"),
        )
        .item(
            Button::new()
                .s(Padding::new().x(12).y(6))
                .s(RoundedCorners::all(4))
                .s(Background::new().color_signal(
                    hovered_signal.map_bool(|| hsluv!(220, 40, 45), || hsluv!(220, 40, 35)),
                ))
                .on_hovered_change(move |is_hovered| hovered.set_neq(is_hovered))
                .label("Show map")
                .on_press(move || map_requested_relay.send(MapActivation::default())),
        )
        .item(
            El::new()
                .s(Align::new().right())
                .s(Font::new().size(14))
                .child(match session::username() {
                    Some(username) => format!("Logged in as {username}"),
                    None => "Not logged in".to_string(),
                }),
        )
}
