// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Frame-level renderer state.
//!
//! [`Renderer`] ties the pieces together: it owns the framebuffer, the
//! view window addressing tables, the border cache and the player
//! translation tables, and keeps per-frame drawing counters.

use log::{debug, trace};
use thiserror::Error;

use crate::assets::{AssetError, LumpSource};
use crate::blend::Blend;
use crate::border::{BorderArt, BorderCache};
use crate::config::{ConfigError, ScreenConfig};
use crate::core::{Framebuffer, ViewWindow};
use crate::draw::{
    ColumnExtras, ColumnParams, ColumnStyle, DrawError, SpanParams, draw_span, draw_span_low,
    draw_styled_column,
};
use crate::tables::ColorMap;
use crate::translation::{TRANSLATION_BASE_LUMP, TranslationTables};

/// Errors surfaced by [`Renderer`].
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("translation tables are not loaded")]
    NoTranslations,
    #[error("no translation table for class {class} color {color}")]
    MissingTranslation { class: usize, color: usize },
}

/// Drawing counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub columns_drawn: u64,
    pub spans_drawn: u64,
    pub pixels_written: u64,
    pub border_pixels: u64,
    /// Completed frames, never reset
    pub frames: u64,
}

/// Software renderer state for one screen.
pub struct Renderer {
    config: ScreenConfig,
    framebuffer: Framebuffer,
    window: ViewWindow,
    border: BorderCache,
    border_art: BorderArt,
    translations: Option<TranslationTables>,
    stats: FrameStats,
}

impl Renderer {
    /// Create a renderer with a full-width view covering the play area.
    pub fn new(config: ScreenConfig) -> Result<Self, RenderError> {
        let window = ViewWindow::new(&config, config.width, config.play_height())?;
        let framebuffer = Framebuffer::new(config.width, config.height);
        debug!(
            "renderer {}x{} (status bar {}, resolution {})",
            config.width, config.height, config.status_bar_height, config.resolution
        );

        Ok(Self {
            config,
            framebuffer,
            window,
            border: BorderCache::new(),
            border_art: BorderArt::default(),
            translations: None,
            stats: FrameStats::default(),
        })
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    pub fn window(&self) -> &ViewWindow {
        &self.window
    }

    pub fn border(&self) -> &BorderCache {
        &self.border
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Resize the view. Rebuilds the addressing tables and drops the
    /// cached border.
    pub fn set_view_size(&mut self, width: usize, height: usize) -> Result<(), RenderError> {
        self.window.resize(width, height)?;
        self.border.invalidate();
        Ok(())
    }

    /// Move the horizon row, for looking up and down.
    pub fn set_center_y(&mut self, center_y: i32) {
        self.window.set_center_y(center_y);
    }

    /// Use different border artwork from the next frame on.
    pub fn set_border_art(&mut self, art: BorderArt) {
        if art != self.border_art {
            self.border_art = art;
            self.border.invalidate();
        }
    }

    /// Load the player translation tables. Returns how many were loaded.
    pub fn load_translations(&mut self, assets: &impl LumpSource) -> Result<usize, RenderError> {
        let tables =
            TranslationTables::load(assets, TRANSLATION_BASE_LUMP, self.config.player_colors)?;
        let count = tables.len();
        self.translations = Some(tables);
        Ok(count)
    }

    pub fn translations(&self) -> Option<&TranslationTables> {
        self.translations.as_ref()
    }

    /// Reset the per-frame counters.
    pub fn begin_frame(&mut self) {
        self.stats = FrameStats {
            frames: self.stats.frames,
            ..FrameStats::default()
        };
    }

    /// Finish the frame and return its counters. The view is marked
    /// dirty if anything was drawn into it.
    pub fn end_frame(&mut self) -> FrameStats {
        if self.stats.columns_drawn > 0 || self.stats.spans_drawn > 0 {
            let view = self.window.rect();
            self.framebuffer
                .mark_rect(view.x, view.y, view.width, view.height);
        }
        self.stats.frames += 1;
        trace!(
            "frame {}: {} columns, {} spans, {} pixels, {} border pixels",
            self.stats.frames,
            self.stats.columns_drawn,
            self.stats.spans_drawn,
            self.stats.pixels_written,
            self.stats.border_pixels
        );
        self.stats
    }

    /// Draw one column in the given style.
    pub fn draw_column(
        &mut self,
        style: ColumnStyle,
        params: &ColumnParams<'_>,
        extras: ColumnExtras<'_>,
    ) -> Result<usize, RenderError> {
        let written =
            draw_styled_column(style, &self.window, &mut self.framebuffer, params, extras)?;
        self.count_column(written);
        Ok(written)
    }

    /// Draw a column recolored for player `color` of `class`. Color 0
    /// is drawn untranslated.
    pub fn draw_player_column(
        &mut self,
        style: ColumnStyle,
        params: &ColumnParams<'_>,
        class: usize,
        color: usize,
        blend: Option<&dyn Blend>,
    ) -> Result<usize, RenderError> {
        let (style, translation) = if color == 0 {
            (style - ColumnStyle::TRANSLATED, None)
        } else {
            let tables = self
                .translations
                .as_ref()
                .ok_or(RenderError::NoTranslations)?;
            let table = tables
                .for_player(class, color)
                .ok_or(RenderError::MissingTranslation { class, color })?;
            (style | ColumnStyle::TRANSLATED, Some(table))
        };

        let extras = ColumnExtras { translation, blend };
        let written =
            draw_styled_column(style, &self.window, &mut self.framebuffer, params, extras)?;
        self.count_column(written);
        Ok(written)
    }

    /// Draw one flat span; `low_detail` picks the low-detail routine.
    pub fn draw_span(
        &mut self,
        params: &SpanParams<'_>,
        low_detail: bool,
    ) -> Result<usize, RenderError> {
        let written = if low_detail {
            draw_span_low(&self.window, &mut self.framebuffer, params)?
        } else {
            draw_span(&self.window, &mut self.framebuffer, params)?
        };
        self.stats.spans_drawn += 1;
        self.stats.pixels_written += written as u64;
        Ok(written)
    }

    /// Paint the border around a reduced view, composing it first if the
    /// cache is empty. Returns the number of pixels restored.
    pub fn draw_view_border(
        &mut self,
        assets: &impl LumpSource,
        colormap: &ColorMap,
    ) -> Result<usize, RenderError> {
        self.border
            .ensure_built(&self.config, &self.window, assets, &self.border_art, colormap)?;
        let copied = self.border.restore(&self.window, &mut self.framebuffer);
        self.stats.border_pixels += copied as u64;
        Ok(copied)
    }

    fn count_column(&mut self, written: usize) {
        self.stats.columns_drawn += 1;
        self.stats.pixels_written += written as u64;
    }
}
