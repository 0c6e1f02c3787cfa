//! Map view: catches as markers on a Leaflet map, filterable by species,
//! length and weight.
//!
//! [`MapViewController`] owns one activation at a time: the [`DataStore`], the
//! [`MarkerLayer`] and the [`ListenerRegistry`] holding every listener and the
//! position-update task of that activation.

mod controller;
mod data_store;
mod listeners;
mod marker_layer;
mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{MapActivation, MapViewController, MapViewport};
pub use marker_layer::MapWidget;
pub use view::map_view;
