// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! View border compositor.
//!
//! When the view is narrower than the screen, the area around it shows a
//! tiled background flat framed by bevel patches. That picture only
//! changes with the view geometry, so it is composed once into an
//! offscreen buffer and copied back around the view every frame.
//!
//! [`BorderCache::invalidate`] must be called whenever the view window is
//! resized; the next [`BorderCache::ensure_built`] recomposes it.

use log::{debug, warn};

use crate::assets::{AssetError, LumpSource};
use crate::config::ScreenConfig;
use crate::core::{Framebuffer, Pixel, Rect, ViewWindow};
use crate::patch::{Canvas, Patch};
use crate::tables::{ColorMap, FLAT_SIZE};

/// Lump names of the border artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderArt {
    pub flat: String,
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
    pub top_left: String,
    pub top_right: String,
    pub bottom_right: String,
    pub bottom_left: String,
}

impl Default for BorderArt {
    fn default() -> Self {
        Self {
            flat: "F_022".into(),
            top: "BORDT".into(),
            bottom: "BORDB".into(),
            left: "BORDL".into(),
            right: "BORDR".into(),
            top_left: "BORDTL".into(),
            top_right: "BORDTR".into(),
            bottom_right: "BORDBR".into(),
            bottom_left: "BORDBL".into(),
        }
    }
}

struct BorderPatches {
    top: Patch,
    bottom: Patch,
    left: Patch,
    right: Patch,
    top_left: Patch,
    top_right: Patch,
    bottom_right: Patch,
    bottom_left: Patch,
}

impl BorderPatches {
    fn load(assets: &impl LumpSource, art: &BorderArt) -> Result<Self, AssetError> {
        Ok(Self {
            top: Patch::load(assets, &art.top)?,
            bottom: Patch::load(assets, &art.bottom)?,
            left: Patch::load(assets, &art.left)?,
            right: Patch::load(assets, &art.right)?,
            top_left: Patch::load(assets, &art.top_left)?,
            top_right: Patch::load(assets, &art.top_right)?,
            bottom_right: Patch::load(assets, &art.bottom_right)?,
            bottom_left: Patch::load(assets, &art.bottom_left)?,
        })
    }
}

/// Geometry a composed picture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    view: Rect,
    screen_width: usize,
    play_height: usize,
    scale: usize,
    widescreen_delta: i32,
}

impl Placement {
    fn new(config: &ScreenConfig, window: &ViewWindow) -> Self {
        Self {
            view: window.rect(),
            screen_width: config.width,
            play_height: config.play_height(),
            scale: config.resolution.max(1),
            widescreen_delta: config.widescreen_delta,
        }
    }

    fn fits(&self, window: &ViewWindow) -> bool {
        self.view == window.rect()
            && self.screen_width == window.screen_width()
            && self.play_height == window.screen_height() - window.status_bar_height()
    }
}

#[derive(Debug)]
struct Picture {
    placement: Placement,
    pixels: Vec<Pixel>,
}

/// Cached background for the area around the view.
///
/// The picture remembers the view rectangle and screen settings it was
/// composed for; a picture that no longer matches is never restored and
/// is recomposed by the next [`BorderCache::ensure_built`].
#[derive(Debug, Default)]
pub struct BorderCache {
    picture: Option<Picture>,
    generation: u64,
}

impl BorderCache {
    /// Spacing of the edge patches, in logical pixels.
    pub const EDGE_STEP: usize = 16;
    /// Thickness of the bevel patches.
    const BEVEL: i32 = 4;
    /// Top and bottom strips sit one pixel closer to the view.
    const NUDGE: i32 = 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached picture; it no longer matches the view geometry.
    pub fn invalidate(&mut self) {
        if self.picture.take().is_some() {
            debug!("border cache invalidated");
        }
    }

    pub fn is_built(&self) -> bool {
        self.picture.is_some()
    }

    /// True if the cached picture was composed for this exact geometry.
    pub fn is_built_for(&self, config: &ScreenConfig, window: &ViewWindow) -> bool {
        self.picture
            .as_ref()
            .is_some_and(|picture| picture.placement == Placement::new(config, window))
    }

    /// Number of times the picture has been composed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The composed picture, `width * play_height` pixels.
    pub fn background(&self) -> Option<&[Pixel]> {
        self.picture.as_ref().map(|picture| picture.pixels.as_slice())
    }

    /// Compose the background if it is missing or was composed for other
    /// geometry. Full-width views have no border and never allocate.
    /// Returns true if a build happened.
    pub fn ensure_built(
        &mut self,
        config: &ScreenConfig,
        window: &ViewWindow,
        assets: &impl LumpSource,
        art: &BorderArt,
        colormap: &ColorMap,
    ) -> Result<bool, AssetError> {
        if window.is_full_width() || self.is_built_for(config, window) {
            return Ok(false);
        }
        if self.picture.take().is_some() {
            debug!("border cache is stale, recomposing");
        }

        let flat = assets.lump_by_name(&art.flat)?;
        let flat = flat
            .get(..FLAT_SIZE * FLAT_SIZE)
            .ok_or_else(|| AssetError::LumpTooShort {
                name: art.flat.clone(),
                len: flat.len(),
                expected: FLAT_SIZE * FLAT_SIZE,
            })?;
        let patches = BorderPatches::load(assets, art)?;

        let width = config.width;
        let height = config.play_height();
        let scale = config.resolution.max(1);
        let mut buffer = vec![0 as Pixel; width * height];

        for (y, row) in buffer.chunks_exact_mut(width).enumerate() {
            let flat_row = ((y / scale) & (FLAT_SIZE - 1)) * FLAT_SIZE;
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = colormap[flat[flat_row + ((x / scale) & (FLAT_SIZE - 1))] as usize];
            }
        }

        let mut canvas = Canvas {
            pixels: &mut buffer,
            width,
            height,
            scale,
            x_origin: config.widescreen_delta,
        };
        Self::draw_bevel(&mut canvas, config, window, &patches, colormap);

        self.picture = Some(Picture {
            placement: Placement::new(config, window),
            pixels: buffer,
        });
        self.generation += 1;
        debug!(
            "border cache built for {}x{} view (generation {})",
            window.width(),
            window.height(),
            self.generation
        );
        Ok(true)
    }

    fn draw_bevel(
        canvas: &mut Canvas<'_>,
        config: &ScreenConfig,
        window: &ViewWindow,
        patches: &BorderPatches,
        colormap: &ColorMap,
    ) {
        let scale = config.resolution.max(1);
        // view edges in logical units; the canvas adds the wide-screen
        // delta back, so positions here are relative to the 4:3 area
        let delta = config.widescreen_delta;
        let left = (window.x() / scale) as i32;
        let right = ((window.x() + window.width()) / scale) as i32;
        let top = (window.y() / scale) as i32;
        let bottom = ((window.y() + window.height()) / scale) as i32;
        let above = top - Self::BEVEL + Self::NUDGE;
        let below = bottom - Self::NUDGE;
        let outer_left = left - Self::BEVEL - delta;
        let outer_right = right - delta;

        let mut clipped = 0;
        for x in (left..right).step_by(Self::EDGE_STEP) {
            clipped += canvas.draw_patch(x - delta, above, &patches.top, colormap);
            clipped += canvas.draw_patch(x - delta, below, &patches.bottom, colormap);
        }
        for y in (top..bottom).step_by(Self::EDGE_STEP) {
            clipped += canvas.draw_patch(outer_left, y, &patches.left, colormap);
            clipped += canvas.draw_patch(outer_right, y, &patches.right, colormap);
        }
        clipped += canvas.draw_patch(outer_left, above, &patches.top_left, colormap);
        clipped += canvas.draw_patch(outer_right, above, &patches.top_right, colormap);
        clipped += canvas.draw_patch(outer_right, below, &patches.bottom_right, colormap);
        clipped += canvas.draw_patch(outer_left, below, &patches.bottom_left, colormap);

        if clipped > 0 {
            warn!("border bevel clipped {} pixels", clipped);
        }
    }

    /// Copy the cached background over everything outside the view and
    /// mark the play area dirty. Returns the number of pixels copied.
    ///
    /// Three copies cover the frame: the top rows plus the left margin of
    /// the first view row, the right margin of the last view row plus the
    /// bottom rows, and one run per view row spanning its right margin and
    /// the next row's left margin, which are adjacent in memory. The right
    /// margin is one pixel wider than the left when the margins are odd.
    ///
    /// Nothing is copied if the picture is missing or was composed for
    /// other geometry.
    pub fn restore(&self, window: &ViewWindow, fb: &mut Framebuffer) -> usize {
        if window.is_full_width() {
            return 0;
        }
        let Some(picture) = self.picture.as_ref() else {
            return 0;
        };
        if !picture.placement.fits(window) {
            debug!("border cache does not match the view window, skipping restore");
            return 0;
        }
        let background = picture.pixels.as_slice();

        let width = window.screen_width();
        let play_height = window.screen_height() - window.status_bar_height();
        let top = window.y();
        let left = window.x();
        let right = width - left - window.width();
        let view_height = window.height();
        let mut copied = 0;
        let mut erase = |fb: &mut Framebuffer, start: usize, count: usize| {
            if fb.copy_range_from(background, start, count) {
                copied += count;
            }
        };

        if view_height == 0 {
            erase(fb, 0, width * play_height);
        } else {
            erase(fb, 0, top * width + left);

            let bottom_start = (view_height + top) * width - right;
            erase(fb, bottom_start, width * play_height - bottom_start);

            let mut offset = (top + 1) * width - right;
            for _ in 1..view_height {
                erase(fb, offset, left + right);
                offset += width;
            }
        }

        fb.mark_rect(0, 0, width, play_height);
        copied
    }
}
