// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Linear, row-major video buffer the rasterizers write into.

/// One native screen pixel: a palette index, or packed `0x00RRGGBB` with
/// the `truecolor` feature.
#[cfg(not(feature = "truecolor"))]
pub type Pixel = u8;
#[cfg(feature = "truecolor")]
pub type Pixel = u32;

/// Screen rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    fn union(self, other: Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Owned framebuffer with an explicit stride and a dirty box that
/// downstream compositing can consume.
pub struct Framebuffer {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
    dirty: Option<Rect>,
}

impl Framebuffer {
    pub const DEFAULT_WIDTH: usize = 320;
    pub const DEFAULT_HEIGHT: usize = 200;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
            dirty: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance in pixels between vertically adjacent pixels.
    pub fn stride(&self) -> usize {
        self.width
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Read a pixel, `None` outside the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Write a pixel; writes outside the buffer are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, value: Pixel) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }

    pub fn fill(&mut self, value: Pixel) {
        self.pixels.fill(value);
    }

    /// Copy `count` pixels starting at linear offset `start` from `src`,
    /// which shares this buffer's layout. Returns false (and copies
    /// nothing) if the range falls outside either buffer.
    pub fn copy_range_from(&mut self, src: &[Pixel], start: usize, count: usize) -> bool {
        let Some(end) = start.checked_add(count) else {
            return false;
        };
        match (self.pixels.get_mut(start..end), src.get(start..end)) {
            (Some(dst), Some(src)) => {
                dst.copy_from_slice(src);
                true
            }
            _ => false,
        }
    }

    /// Grow the dirty box to cover the given rectangle.
    pub fn mark_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        if width == 0 || height == 0 {
            return;
        }
        let rect = Rect::new(x, y, width, height);
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.union(rect),
            None => rect,
        });
    }

    pub fn dirty(&self) -> Option<Rect> {
        self.dirty
    }

    /// Return and clear the dirty box.
    pub fn take_dirty(&mut self) -> Option<Rect> {
        self.dirty.take()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}
