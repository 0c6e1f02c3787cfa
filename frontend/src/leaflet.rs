//! Bindings to the subset of Leaflet the map view uses.
//!
//! Leaflet itself is loaded by the backend's `<head>` as the global `L`.

use serde::Serialize;
use shared::{CatchId, ClientConfig, Coordinates};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::map_view::{MapViewport, MapWidget};

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type LMap;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn create_map(element: &HtmlElement) -> Result<LMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LMap, center: &js_sys::Array, zoom: u8);

    #[wasm_bindgen(method)]
    fn remove(this: &LMap);

    #[derive(Debug, Clone)]
    type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url_template: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &LMap);

    #[derive(Debug, Clone)]
    type FeatureGroup;

    #[wasm_bindgen(js_namespace = L, js_name = featureGroup)]
    fn feature_group() -> FeatureGroup;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &FeatureGroup, map: &LMap);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &FeatureGroup, layer: &LMarker);

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &FeatureGroup, layer: &LMarker);

    #[derive(Debug, Clone)]
    pub type LMarker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(lat_lng: &js_sys::Array) -> LMarker;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &LMarker, content: &str);

    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &LMarker);

    #[derive(Debug, Clone)]
    pub type CircleMarker;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    fn circle_marker(lat_lng: &js_sys::Array, options: &JsValue) -> CircleMarker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &CircleMarker, map: &LMap);

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &CircleMarker, lat_lng: &js_sys::Array);
}

#[derive(Serialize)]
struct TileLayerOptions<'a> {
    attribution: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CircleMarkerOptions {
    radius: u8,
    color: &'static str,
    fill_opacity: f32,
}

fn lat_lng(position: Coordinates) -> js_sys::Array {
    js_sys::Array::of2(&JsValue::from_f64(position.lat), &JsValue::from_f64(position.lon))
}

/// A Leaflet map with its tile layer and one feature group for catch markers.
#[derive(Debug, Clone)]
pub struct LeafletMap {
    map: LMap,
    markers: FeatureGroup,
}

impl LeafletMap {
    pub fn new(element: &HtmlElement, viewport: MapViewport, config: &ClientConfig) -> Result<Self, String> {
        let map = create_map(element).map_err(|error| format!("Leaflet map creation failed: {error:?}"))?;
        map.set_view(&lat_lng(viewport.center), viewport.zoom);

        let tile_options = serde_wasm_bindgen::to_value(&TileLayerOptions {
            attribution: &config.tile_attribution,
        })
        .map_err(|error| error.to_string())?;
        tile_layer(&config.tile_url, &tile_options).add_to(&map);

        let markers = feature_group();
        markers.add_to(&map);

        Ok(Self { map, markers })
    }

    /// Circle marker showing the user's own position.
    pub fn add_position_marker(&self, position: Coordinates) -> Result<CircleMarker, String> {
        let options = serde_wasm_bindgen::to_value(&CircleMarkerOptions {
            radius: 8,
            color: "#1e66f5",
            fill_opacity: 0.6,
        })
        .map_err(|error| error.to_string())?;
        let circle = circle_marker(&lat_lng(position), &options);
        circle.add_to(&self.map);
        Ok(circle)
    }
}

impl CircleMarker {
    pub fn move_to(&self, position: Coordinates) {
        self.set_lat_lng(&lat_lng(position));
    }
}

impl MapWidget for LeafletMap {
    type Marker = LMarker;

    fn add_marker(&self, _catch_id: CatchId, position: Coordinates, popup_html: &str) -> LMarker {
        let marker = marker(&lat_lng(position));
        marker.bind_popup(popup_html);
        self.markers.add_layer(&marker);
        marker
    }

    fn open_popup(&self, marker: &LMarker) {
        marker.open_popup();
    }

    fn remove_marker(&self, marker: &LMarker) {
        self.markers.remove_layer(marker);
    }

    fn dispose(&self) {
        self.map.remove();
    }
}
