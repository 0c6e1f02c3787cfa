//! Fishing Log frontend entry point

use std::sync::OnceLock;
use zoon::*;

/// Stores the main application task handle to prevent it from being dropped.
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

#[macro_use]
mod debug_utils;

mod app;
mod catch_service;
mod connection;
mod dataflow;
mod error_display;
mod error_ui;
mod leaflet;
mod map_view;
mod platform;
mod session;
mod user_position;

pub fn main() {
    let handle = Task::start_droppable(async {
        let app = crate::app::FishingLogApp::new().await;
        let root_element = app.root();
        start_app("app", move || root_element);
    });
    let _ = MAIN_TASK.set(handle);
}
