// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod chatbot;
pub mod config;
pub mod models;
pub mod responses;
pub mod seed;
pub mod session;
pub mod store;

use directories::ProjectDirs;
use std::path::PathBuf;

pub use chatbot::Chatbot;
pub use config::{AppConfig, ConfigError};
pub use models::{Booking, BookingError, FlightRecord};
pub use responses::Responses;
pub use session::{BookingOutcome, BookingSession};
pub use store::{FlightStore, SearchOutcome, SearchTier, StoreError};

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "skybook", "skybook")
}

/// Directory holding `config.json` and `intents.json`.
pub fn get_config_root() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".skybook"))
}

/// Directory holding the flight database.
pub fn get_data_root() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".skybook"))
}
