use serde::{Deserialize, Serialize};

mod action;
mod catches;
mod config;
mod filter;

pub use action::{ACTION_ATTRIBUTE, ActionKind, CATCH_ID_ATTRIBUTE, CatchAction};
pub use catches::{CatchId, CatchRecord, CatchesResponse, Coordinates, LocationError};
pub use config::{ClientConfig, ConfigError, MAX_ZOOM, MIN_POSITION_UPDATE_INTERVAL_MS};
pub use filter::{
    FilterState, LENGTH_STEPS, RangeSelection, Step, StepTable, UpperBound, ValueRange,
    WEIGHT_STEPS, compute_visible,
};

// ===== MESSAGE TYPES =====

#[derive(Serialize, Deserialize, Debug)]
pub enum UpMsg {
    LoadConfig,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum DownMsg {
    ConfigLoaded(ClientConfig),
    ConfigError(String),
}
