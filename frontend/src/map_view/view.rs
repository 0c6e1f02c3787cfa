use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlInputElement};
use zoon::*;

use super::controller::{MapViewController, RangeAxis, RangeHandle, ViewState};
use super::listeners::ListenerTarget;
use crate::debug_utils::debug_critical;
use crate::leaflet::LeafletMap;
use crate::platform::{MapPlatform, WebPlatform};

type Controller = Rc<MapViewController<WebPlatform>>;

const MAP_HEIGHT: u32 = 560;

/// Map page content. Re-renders from scratch on every activation.
pub fn map_view(controller: Controller) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(12))
        .s(Padding::all(16))
        .item(
            El::new()
                .s(Font::new().size(24).weight(FontWeight::Bold))
                .child("Catches"),
        )
        .item_signal(controller.state_signal().map({
            let controller = controller.clone();
            move |state| match state {
                ViewState::Idle => None,
                ViewState::Loading => Some(status_text("Loading catches…").unify()),
                ViewState::LoadFailed => Some(status_text("Catches could not be loaded.").unify()),
                ViewState::Rendered => {
                    Some(rendered_view(controller.clone(), controller.generation()).unify())
                }
            }
        }))
}

fn status_text(text: &str) -> impl Element {
    El::new()
        .s(Font::new().size(14).color(hsluv!(0, 0, 45)))
        .child(text.to_string())
}

fn rendered_view(controller: Controller, generation: u64) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(12))
        .item(filter_controls(controller.clone(), generation))
        .item(map_container(controller, generation))
}

// ===== FILTER CONTROLS =====

fn filter_controls(controller: Controller, generation: u64) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(8))
        .update_raw_el(|raw_el| raw_el.class("filters"))
        .item(species_input(controller.clone(), generation))
        .item(range_control(controller.clone(), generation, RangeAxis::Length))
        .item(range_control(controller.clone(), generation, RangeAxis::Weight))
        .item(
            El::new()
                .s(Font::new().size(14).color(hsluv!(0, 0, 45)))
                .child_signal(map_ref! {
                    let visible = controller.visible_count_signal(),
                    let total = controller.total_count_signal() =>
                    format!("{visible} of {total} catches")
                }),
        )
}

fn species_input(controller: Controller, generation: u64) -> impl Element {
    RawHtmlEl::new("input")
        .class("input")
        .attr("type", "text")
        .attr("placeholder", "Filter by species")
        .after_insert(move |element: HtmlElement| {
            let Ok(input) = element.dyn_into::<HtmlInputElement>() else {
                return;
            };
            let listener = EventListener::new(&input.clone(), "input", {
                let controller = controller.clone();
                move |_| controller.set_species_filter(&input.value())
            });
            controller.register_control_listener(
                generation,
                "input",
                ListenerTarget::Element("species"),
                listener,
            );
        })
}

fn range_control(controller: Controller, generation: u64, axis: RangeAxis) -> impl Element {
    let steps = axis.steps();
    let selection = controller.selection(axis);

    Column::new()
        .s(Gap::new().y(4))
        .item(
            Row::new()
                .s(Gap::new().x(8))
                .item(El::new().s(Font::new().weight(FontWeight::SemiBold)).child(steps.label))
                .item(
                    El::new().child_signal(
                        controller
                            .selection_signal(axis)
                            .map(move |selection| steps.selection_label(selection)),
                    ),
                ),
        )
        .item(
            Row::new()
                .s(Gap::new().x(8))
                .item(range_handle(controller.clone(), generation, axis, RangeHandle::From, selection.from))
                .item(range_handle(controller, generation, axis, RangeHandle::To, selection.to)),
        )
}

fn handle_target(axis: RangeAxis, handle: RangeHandle) -> ListenerTarget {
    ListenerTarget::Element(match (axis, handle) {
        (RangeAxis::Length, RangeHandle::From) => "length_from",
        (RangeAxis::Length, RangeHandle::To) => "length_to",
        (RangeAxis::Weight, RangeHandle::From) => "weight_from",
        (RangeAxis::Weight, RangeHandle::To) => "weight_to",
    })
}

fn range_handle(
    controller: Controller,
    generation: u64,
    axis: RangeAxis,
    handle: RangeHandle,
    index: usize,
) -> impl Element {
    let steps = axis.steps();

    RawHtmlEl::new("input")
        .attr("type", "range")
        .attr("min", "0")
        .attr("max", &steps.last_index().to_string())
        .attr("step", "1")
        .attr("value", &index.to_string())
        .style("flex", "1")
        .after_insert(move |element: HtmlElement| {
            let Ok(input) = element.dyn_into::<HtmlInputElement>() else {
                return;
            };
            let listener = EventListener::new(&input.clone(), "input", {
                let controller = controller.clone();
                move |_| {
                    let Ok(requested) = input.value().parse::<usize>() else {
                        return;
                    };
                    let selection = controller.move_range_handle(axis, handle, requested);
                    let clamped = match handle {
                        RangeHandle::From => selection.from,
                        RangeHandle::To => selection.to,
                    };
                    if clamped != requested {
                        input.set_value(&clamped.to_string());
                    }
                }
            });
            controller.register_control_listener(generation, "input", handle_target(axis, handle), listener);
        })
}

// ===== MAP =====

fn map_container(controller: Controller, generation: u64) -> impl Element {
    El::new()
        .s(Width::fill())
        .s(Height::exact(MAP_HEIGHT))
        .update_raw_el(|raw_el| raw_el.attr("id", "map").class("full_height"))
        .after_insert(move |element: HtmlElement| {
            let config = controller.platform().client_config();
            match LeafletMap::new(&element, controller.viewport(), &config) {
                Ok(map) => {
                    controller.attach_map(generation, map);
                }
                Err(error) => debug_critical(&error),
            }
        })
}
