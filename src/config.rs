// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Screen and renderer configuration knobs.

#[cfg(feature = "serde-config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("screen must be at least 1x1, got {width}x{height}")]
    EmptyScreen { width: usize, height: usize },
    #[error("screen {width}x{height} is too small for a {status_bar}-pixel status bar")]
    StatusBarTooTall {
        width: usize,
        height: usize,
        status_bar: usize,
    },
    #[error("resolution divisor must be at least 1")]
    ZeroResolution,
    #[error("at least one player color is required")]
    NoPlayerColors,
    #[error("view {width}x{height} does not fit in the {screen_width}x{play_height} play area")]
    ViewTooLarge {
        width: usize,
        height: usize,
        screen_width: usize,
        play_height: usize,
    },
    #[cfg(feature = "serde-config")]
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[cfg(feature = "serde-config")]
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Screen geometry and the knobs that affect drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-config", serde(default))]
pub struct ScreenConfig {
    /// Full screen width in pixels
    pub width: usize,
    /// Full screen height in pixels
    pub height: usize,
    /// Rows reserved for the status bar at the bottom
    pub status_bar_height: usize,
    /// Hi-res multiplier; border art is placed in `1 / resolution` units
    pub resolution: usize,
    /// Extra logical pixels on each side in wide-screen modes
    pub widescreen_delta: i32,
    /// Number of player colors; sizes the translation tables
    pub player_colors: usize,
}

impl ScreenConfig {
    /// Rows above the status bar.
    pub fn play_height(&self) -> usize {
        self.height.saturating_sub(self.status_bar_height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyScreen {
                width: self.width,
                height: self.height,
            });
        }
        if self.status_bar_height >= self.height {
            return Err(ConfigError::StatusBarTooTall {
                width: self.width,
                height: self.height,
                status_bar: self.status_bar_height,
            });
        }
        if self.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if self.player_colors == 0 {
            return Err(ConfigError::NoPlayerColors);
        }
        Ok(())
    }

    #[cfg(feature = "serde-config")]
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde-config")]
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
            status_bar_height: 39,
            resolution: 1,
            widescreen_delta: 0,
            player_colors: 8,
        }
    }
}
