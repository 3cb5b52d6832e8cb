// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Raydraw software renderer core
//!
//! The inner drawing stage of a column-based software renderer: vertical
//! wall and sprite columns, horizontal floor spans, player color
//! translation tables, and the cached border around a reduced view.

pub mod assets;
pub mod blend;
pub mod border;
pub mod config;
pub mod core;
pub mod draw;
pub mod patch;
pub mod renderer;
pub mod tables;
pub mod translation;

// Re-export commonly used types
pub use assets::{AssetError, LumpDirectory, LumpSource};
pub use blend::Blend;
#[cfg(feature = "truecolor")]
pub use blend::RgbBlend;
#[cfg(not(feature = "truecolor"))]
pub use blend::TintTable;
pub use border::{BorderArt, BorderCache};
pub use config::{ConfigError, ScreenConfig};
pub use crate::core::{FRACBITS, FRACUNIT, Fixed, Framebuffer, Pixel, Rect, ViewWindow};
pub use draw::{ColumnExtras, ColumnParams, ColumnStyle, DrawError, SpanParams};
pub use patch::Patch;
pub use renderer::{FrameStats, RenderError, Renderer};
pub use tables::{Brightmap, ColorMap, ColorMaps, Flat, TranslationTable};
pub use translation::TranslationTables;
