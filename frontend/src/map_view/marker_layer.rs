use shared::{ActionKind, CatchAction, CatchId, CatchRecord, ClientConfig, Coordinates};

use crate::debug_utils::DEBUG_MAP_VIEW;

/// The parts of the map engine the marker layer drives.
pub trait MapWidget {
    type Marker;

    /// Creates a marker with a bound popup and adds it to the marker group.
    fn add_marker(&self, catch_id: CatchId, position: Coordinates, popup_html: &str) -> Self::Marker;
    fn open_popup(&self, marker: &Self::Marker);
    fn remove_marker(&self, marker: &Self::Marker);
    /// Tears the whole widget down; the widget is unusable afterwards.
    fn dispose(&self);
}

pub struct MarkerHandle<M> {
    pub catch_id: CatchId,
    pub marker: M,
}

/// What a popup needs besides the record itself.
#[derive(Debug, Clone, Default)]
pub struct PopupContext {
    /// Session username; owners get edit/delete buttons.
    pub viewer: Option<String>,
    pub config: ClientConfig,
}

/// Exclusive owner of the markers on one map widget.
pub struct MarkerLayer<W: MapWidget> {
    map: W,
    handles: Vec<MarkerHandle<W::Marker>>,
    popup: PopupContext,
}

impl<W: MapWidget> MarkerLayer<W> {
    pub fn new(map: W, popup: PopupContext) -> Self {
        Self {
            map,
            handles: Vec::new(),
            popup,
        }
    }

    /// Replaces every marker with one per record. Records whose location does
    /// not parse are logged and skipped. When `open_catch_id` matches a
    /// record, that marker's popup is opened.
    pub fn build(&mut self, records: &[&CatchRecord], open_catch_id: Option<CatchId>) {
        self.clear();

        for record in records {
            let position = match record.coordinates() {
                Ok(position) => position,
                Err(error) => {
                    console_error!("Skipping catch {}: {}", record.id, error);
                    continue;
                }
            };
            let marker = self
                .map
                .add_marker(record.id, position, &popup_html(record, &self.popup));
            if open_catch_id == Some(record.id) {
                self.map.open_popup(&marker);
            }
            self.handles.push(MarkerHandle {
                catch_id: record.id,
                marker,
            });
        }

        debug_log!(DEBUG_MAP_VIEW, "MarkerLayer: built {} markers", self.handles.len());
    }

    /// Removes all markers, leaving the map itself in place.
    pub fn clear(&mut self) {
        for handle in self.handles.drain(..) {
            self.map.remove_marker(&handle.marker);
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    #[cfg(test)]
    pub fn catch_ids(&self) -> impl Iterator<Item = CatchId> + '_ {
        self.handles.iter().map(|handle| handle.catch_id)
    }

    /// Removes the markers and the widget.
    pub fn dispose(mut self) {
        self.clear();
        self.map.dispose();
    }
}

pub fn popup_html(record: &CatchRecord, context: &PopupContext) -> String {
    let species = escape_html(&record.species);
    let image_url = escape_html(&context.config.image_url(&record.image_url));
    let action_buttons = if record.is_owned_by(context.viewer.as_deref()) {
        let buttons: String = [ActionKind::Edit, ActionKind::Delete]
            .into_iter()
            .map(|kind| action_button(CatchAction::new(kind, record.id)))
            .collect();
        format!(r#"<div class="editButtons">{buttons}</div>"#)
    } else {
        String::new()
    };

    format!(
        r#"<section><h2>{species}</h2><img src="{image_url}" alt="{species}"/><p>{date}</p><p>{length} cm</p><p>{weight} g</p><p>Caught by {username}</p>{action_buttons}</section>"#,
        date = escape_html(&record.date),
        length = record.length,
        weight = record.weight,
        username = escape_html(&record.username),
    )
}

fn action_button(action: CatchAction) -> String {
    let attributes: String = action
        .attributes()
        .iter()
        .map(|(name, value)| format!(r#" {name}="{}""#, escape_html(value)))
        .collect();
    format!("<button{attributes}>{}</button>", action.kind.button_label())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
