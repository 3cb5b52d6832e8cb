// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Translucency blending.
//!
//! A blend combines the pixel already on screen (`bg`) with the pixel a
//! translucent surface wants to draw (`fg`). The column rasterizers call
//! it in two operand orders: the translucent variants pass
//! `(dest, src)` and the alt-translucent variants pass `(src, dest)`.
//! Blends are generally not symmetric, so the two orders look different.

use crate::core::Pixel;

/// Combine a background pixel with a foreground pixel.
pub trait Blend {
    fn blend(&self, bg: Pixel, fg: Pixel) -> Pixel;
}

impl<F> Blend for F
where
    F: Fn(Pixel, Pixel) -> Pixel,
{
    #[inline]
    fn blend(&self, bg: Pixel, fg: Pixel) -> Pixel {
        self(bg, fg)
    }
}

#[cfg(not(feature = "truecolor"))]
const TINT_TABLE_SIZE: usize = 256 * 256;

/// 256x256 palette tint table, indexed `[fg][bg]`.
#[cfg(not(feature = "truecolor"))]
#[derive(Clone)]
pub struct TintTable {
    table: Box<[u8; TINT_TABLE_SIZE]>,
}

#[cfg(not(feature = "truecolor"))]
impl TintTable {
    pub const SIZE: usize = TINT_TABLE_SIZE;

    /// Wrap a raw 64 KiB table; `None` if the length is wrong.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let table: Box<[u8; Self::SIZE]> = bytes.to_vec().into_boxed_slice().try_into().ok()?;
        Some(Self { table })
    }

    /// Build a table from a `(bg, fg) -> mixed` function.
    pub fn from_fn(mut mix: impl FnMut(u8, u8) -> u8) -> Self {
        let mut table = Box::new([0u8; Self::SIZE]);
        for fg in 0..=255u8 {
            for bg in 0..=255u8 {
                table[((fg as usize) << 8) | bg as usize] = mix(bg, fg);
            }
        }
        Self { table }
    }
}

#[cfg(not(feature = "truecolor"))]
impl Blend for TintTable {
    #[inline]
    fn blend(&self, bg: Pixel, fg: Pixel) -> Pixel {
        self.table[((fg as usize) << 8) | bg as usize]
    }
}

/// Per-channel alpha blend of packed `0x00RRGGBB` pixels.
#[cfg(feature = "truecolor")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbBlend {
    /// Weight of the foreground pixel, 0..=255
    pub alpha: u8,
}

#[cfg(feature = "truecolor")]
impl RgbBlend {
    pub const fn new(alpha: u8) -> Self {
        Self { alpha }
    }
}

#[cfg(feature = "truecolor")]
impl Blend for RgbBlend {
    #[inline]
    fn blend(&self, bg: Pixel, fg: Pixel) -> Pixel {
        let a = self.alpha as u32;
        let ia = 255 - a;
        let mix = |shift: u32| {
            let f = (fg >> shift) & 0xFF;
            let b = (bg >> shift) & 0xFF;
            ((f * a + b * ia) / 255) << shift
        };
        mix(16) | mix(8) | mix(0)
    }
}
