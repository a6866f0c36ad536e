// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};
use skybook_nlp::booking_prompt::BookingExtractor;
use skybook_nlp::location::Vocabulary;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("No {0} configured")]
    EmptyVocabulary(&'static str),
    #[error("City '{0}' is listed more than once")]
    DuplicateCity(String),
    #[error("City '{0}' is both an origin and a destination")]
    OverlappingCity(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
    /// Largest Levenshtein distance accepted when matching city names.
    pub max_edit_distance: usize,
    /// Widen an empty exact search to +/- `flex_window_days`.
    pub flexible_search: bool,
    pub flex_window_days: u32,
    /// Regenerate synthetic flights when the chat starts.
    pub seed_on_start: bool,
    pub seed_days: u32,
    pub database_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origins: ["London", "Toronto", "Sydney", "Dubai", "Frankfurt", "Mumbai"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            destinations: ["Paris", "New York", "Berlin", "Singapore", "Tokyo", "Amsterdam"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_edit_distance: 2,
            flexible_search: true,
            flex_window_days: 7,
            seed_on_start: true,
            seed_days: 30,
            database_path: crate::get_data_root().join("flight_booking.db"),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        crate::get_config_root().join("config.json")
    }

    /// Loads and validates `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("[Config] No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        log::debug!("[Config] Loading config from: {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)
    }

    /// Vocabularies must be non-empty, free of duplicates and disjoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origins.is_empty() {
            return Err(ConfigError::EmptyVocabulary("origins"));
        }
        if self.destinations.is_empty() {
            return Err(ConfigError::EmptyVocabulary("destinations"));
        }

        let mut origins = HashSet::new();
        for city in &self.origins {
            if !origins.insert(city.trim().to_lowercase()) {
                return Err(ConfigError::DuplicateCity(city.clone()));
            }
        }
        let mut destinations = HashSet::new();
        for city in &self.destinations {
            let key = city.trim().to_lowercase();
            if origins.contains(&key) {
                return Err(ConfigError::OverlappingCity(city.clone()));
            }
            if !destinations.insert(key) {
                return Err(ConfigError::DuplicateCity(city.clone()));
            }
        }
        Ok(())
    }

    pub fn origin_vocabulary(&self) -> Vocabulary {
        Vocabulary::new(&self.origins)
    }

    pub fn destination_vocabulary(&self) -> Vocabulary {
        Vocabulary::new(&self.destinations)
    }

    pub fn extractor(&self) -> BookingExtractor {
        BookingExtractor::new(
            self.origin_vocabulary(),
            self.destination_vocabulary(),
            self.max_edit_distance,
        )
    }
}
