use futures::{FutureExt, select, stream::StreamExt};
use zoon::events::Click;
use zoon::*;

use crate::dataflow::{Actor, relay};
use crate::error_display::{FlashMessage, FlashMessages, NotificationVariant};

/// Remaining share of the auto-dismiss timer (100.0 down to 0.0)
type Progress = f32;

fn background_color(variant: NotificationVariant) -> HSLuv {
    match variant {
        NotificationVariant::Error => hsluv!(12, 90, 96),
        NotificationVariant::Info => hsluv!(250, 90, 96),
        NotificationVariant::Success => hsluv!(130, 90, 96),
    }
}

fn border_color(variant: NotificationVariant) -> HSLuv {
    match variant {
        NotificationVariant::Error => hsluv!(12, 80, 55),
        NotificationVariant::Info => hsluv!(250, 80, 55),
        NotificationVariant::Success => hsluv!(130, 80, 55),
    }
}

fn text_color(variant: NotificationVariant) -> HSLuv {
    match variant {
        NotificationVariant::Error => hsluv!(12, 80, 30),
        NotificationVariant::Info => hsluv!(250, 80, 30),
        NotificationVariant::Success => hsluv!(130, 80, 30),
    }
}

/// Fixed layer in the top-right corner stacking the active flash messages.
pub fn flash_messages_container(flash_messages: FlashMessages) -> impl Element {
    El::new()
        .s(Width::fill())
        .s(Align::new().top().right())
        .s(Padding::all(16))
        .update_raw_el(|raw_el| {
            raw_el
                .style("position", "fixed")
                .style("top", "0")
                .style("right", "0")
                .style("pointer-events", "none")
                .style("z-index", "1000")
        })
        .child(
            Column::new()
                .s(Gap::new().y(8))
                .s(Width::exact(360))
                .s(Align::new().right())
                .update_raw_el(|raw_el| raw_el.style("pointer-events", "auto"))
                .items_signal_vec(
                    flash_messages
                        .active_messages
                        .signal_vec()
                        .map(move |message| flash_element(message, flash_messages.clone())),
                ),
        )
}

fn flash_element(message: FlashMessage, flash_messages: FlashMessages) -> impl Element {
    let (flash_clicked_relay, mut flash_clicked_stream) = relay::<()>();
    let (dismiss_button_clicked_relay, mut dismiss_button_clicked_stream) = relay::<()>();
    let variant = message.variant;
    let auto_dismiss_ms = message.auto_dismiss_ms as f32;
    let message_id = message.id.clone();

    let timer_actor = Actor::new(100.0 as Progress, async move |progress| {
        let update_interval_ms = 50.0f32;
        let mut elapsed_ms = 0.0f32;
        let mut is_paused = false;

        loop {
            select! {
                _ = Timer::sleep(update_interval_ms as u32).fuse() => {
                    if auto_dismiss_ms > 0.0 && !is_paused {
                        elapsed_ms += update_interval_ms;
                        progress.set((100.0 - elapsed_ms / auto_dismiss_ms * 100.0).max(0.0));
                        if elapsed_ms >= auto_dismiss_ms {
                            flash_messages.dismiss(&message_id);
                            break;
                        }
                    }
                }
                clicked = flash_clicked_stream.next() => {
                    if clicked.is_some() {
                        is_paused = !is_paused;
                    }
                }
                clicked = dismiss_button_clicked_stream.next() => {
                    if clicked.is_some() {
                        flash_messages.dismiss(&message_id);
                        break;
                    }
                }
            }
        }
    });

    Column::new()
        .s(Width::fill())
        .s(Background::new().color(background_color(variant)))
        .s(Borders::all(Border::new().width(1).color(border_color(variant))))
        .s(RoundedCorners::all(8))
        .s(Shadows::new([Shadow::new().color(hsluv!(0, 0, 0, 10)).y(2).blur(8)]))
        .s(Cursor::new(CursorIcon::Pointer))
        .update_raw_el(|raw_el| raw_el.attr("title", "Click to pause/resume auto-dismiss"))
        .on_click(move || flash_clicked_relay.send(()))
        .item(
            Row::new()
                .s(Width::fill())
                .s(Padding::all(12))
                .s(Gap::new().x(8))
                .item(
                    Column::new()
                        .s(Width::fill())
                        .s(Gap::new().y(4))
                        .item(
                            El::new()
                                .s(Font::new().size(16).weight(FontWeight::SemiBold).color(text_color(variant)))
                                .child(variant.title()),
                        )
                        .item(
                            El::new()
                                .s(Font::new().size(14).color(text_color(variant)).wrap_anywhere())
                                .child(message.message),
                        ),
                )
                .item(
                    El::new()
                        .s(Font::new().size(14).color(text_color(variant)))
                        .s(Padding::all(4))
                        .child("✕")
                        .update_raw_el(move |raw_el| {
                            raw_el.event_handler(move |event: Click| {
                                event.stop_propagation();
                                dismiss_button_clicked_relay.send(());
                            })
                        }),
                ),
        )
        .item(
            El::new()
                .s(Width::fill())
                .s(Height::exact(3))
                .child(
                    El::new()
                        .s(Height::fill())
                        .s(Width::percent_signal(timer_actor.signal()))
                        .s(Background::new().color(border_color(variant)))
                        .s(Transitions::new([Transition::property("width").duration(150)])),
                ),
        )
        .after_remove(move |_| drop(timer_actor))
}
