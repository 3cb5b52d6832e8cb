// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! View window geometry and the framebuffer addressing tables.
//!
//! The rasterizers never compute `y * stride + x` themselves. Instead they
//! start from a precomputed row base offset and a precomputed column
//! offset, which keeps the inner loops to a single add per pixel. Both
//! tables are only valid for the geometry they were built from, so
//! [`ViewWindow::resize`] rebuilds them in full.

use log::debug;

use super::framebuffer::Rect;
use crate::config::{ConfigError, ScreenConfig};

/// Placement of the 3D view on screen plus its addressing tables.
#[derive(Debug, Clone)]
pub struct ViewWindow {
    screen_width: usize,
    screen_height: usize,
    status_bar_height: usize,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    center_y: i32,
    row_offsets: Vec<usize>,
    column_offsets: Vec<usize>,
}

impl ViewWindow {
    /// Build the tables for a `width` x `height` view on the configured screen.
    pub fn new(config: &ScreenConfig, width: usize, height: usize) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut window = Self {
            screen_width: config.width,
            screen_height: config.height,
            status_bar_height: config.status_bar_height,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            center_y: 0,
            row_offsets: Vec::new(),
            column_offsets: Vec::new(),
        };
        window.resize(width, height)?;
        Ok(window)
    }

    /// Recompute placement and both addressing tables.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), ConfigError> {
        let full_width = width == self.screen_width;
        let max_height = if full_width {
            self.screen_height
        } else {
            self.screen_height - self.status_bar_height
        };
        if width > self.screen_width || height > max_height {
            return Err(ConfigError::ViewTooLarge {
                width,
                height,
                screen_width: self.screen_width,
                play_height: max_height,
            });
        }

        self.x = (self.screen_width - width) >> 1;
        self.y = if full_width {
            0
        } else {
            (self.screen_height - self.status_bar_height - height) >> 1
        };
        // keep the top edge on an even row for the line-doubling blitters
        self.y &= !1;
        self.width = width;
        self.height = height;
        self.center_y = (height / 2) as i32;

        self.column_offsets.clear();
        self.column_offsets.extend((0..width).map(|col| self.x + col));
        self.row_offsets.clear();
        self.row_offsets
            .extend((0..height).map(|row| (row + self.y) * self.screen_width));

        debug!(
            "view window {}x{} at ({}, {}) on {}x{} screen",
            width, height, self.x, self.y, self.screen_width, self.screen_height
        );
        Ok(())
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn screen_width(&self) -> usize {
        self.screen_width
    }

    pub fn screen_height(&self) -> usize {
        self.screen_height
    }

    pub fn status_bar_height(&self) -> usize {
        self.status_bar_height
    }

    /// Screen row that texture-mid projects onto.
    pub fn center_y(&self) -> i32 {
        self.center_y
    }

    /// Shift the horizon, e.g. for looking up and down.
    pub fn set_center_y(&mut self, center_y: i32) {
        self.center_y = center_y;
    }

    /// True when the view covers the whole screen width and needs no border.
    pub fn is_full_width(&self) -> bool {
        self.width == self.screen_width
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Framebuffer offset of the first pixel of view row `row`.
    #[inline]
    pub fn row_offset(&self, row: usize) -> Option<usize> {
        self.row_offsets.get(row).copied()
    }

    /// Horizontal offset of view column `col` within a row.
    #[inline]
    pub fn column_offset(&self, col: usize) -> Option<usize> {
        self.column_offsets.get(col).copied()
    }

    /// Framebuffer offset of view pixel (`col`, `row`).
    #[inline]
    pub fn offset(&self, col: usize, row: usize) -> Option<usize> {
        Some(self.row_offset(row)? + self.column_offset(col)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(status_bar_height: usize) -> ScreenConfig {
        ScreenConfig {
            status_bar_height,
            ..ScreenConfig::default()
        }
    }

    #[test]
    fn centered_view_offsets() {
        let window = ViewWindow::new(&screen(32), 240, 144).unwrap();
        let top = ((200 - 32 - 144) / 2) & !1;
        assert_eq!(window.row_offset(0), Some(top * 320));
        assert_eq!(window.column_offset(0), Some(40));
        assert_eq!(window.offset(239, 143), Some((143 + top) * 320 + 40 + 239));
        assert_eq!(window.row_offset(144), None);
        assert_eq!(window.column_offset(240), None);
        assert_eq!(window.center_y(), 72);
    }

    #[test]
    fn top_edge_forced_even() {
        // (161 - 100) / 2 = 30, (161 - 99) / 2 = 31 -> 30
        let mut window = ViewWindow::new(&screen(39), 256, 100).unwrap();
        assert_eq!(window.y(), 30);
        window.resize(256, 99).unwrap();
        assert_eq!(window.y(), 30);
        assert_eq!(window.row_offset(0), Some(30 * 320));
    }

    #[test]
    fn full_width_view_starts_at_top() {
        let window = ViewWindow::new(&screen(39), 320, 200).unwrap();
        assert!(window.is_full_width());
        assert_eq!(window.x(), 0);
        assert_eq!(window.y(), 0);
        assert_eq!(window.row_offset(199), Some(199 * 320));
    }

    #[test]
    fn resize_rebuilds_tables() {
        let mut window = ViewWindow::new(&screen(32), 240, 144).unwrap();
        window.resize(160, 80).unwrap();
        assert_eq!(window.column_offset(0), Some(80));
        assert_eq!(window.column_offset(160), None);
        assert_eq!(window.row_offset(0), Some(44 * 320));
        assert_eq!(window.row_offset(80), None);
    }

    #[test]
    fn oversized_view_rejected() {
        let mut window = ViewWindow::new(&screen(32), 240, 144).unwrap();
        assert!(matches!(
            window.resize(240, 169),
            Err(ConfigError::ViewTooLarge { .. })
        ));
        assert!(window.resize(321, 100).is_err());
    }
}
