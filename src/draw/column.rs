// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Wall column rasterizer.
//!
//! Every variant runs the same loop: step a fixed-point texture offset
//! down the column, sample the source byte, optionally remap it through a
//! translation table, resolve it through the normal or bright color map
//! (chosen by the raw source byte), then either store the result or blend
//! it with what is already on screen.
//!
//! Texture height wraparound has two regimes, picked once per call:
//! power-of-two heights mask the integer part of the offset, any other
//! height keeps the offset in `[0, height << FRACBITS)` by subtracting the
//! scaled height whenever the accumulator reaches it. The second form is
//! what stops tall non-power-of-two textures from sampling garbage.

use super::DrawError;
use crate::blend::Blend;
use crate::core::fixed::fixed_int;
use crate::core::{FRACBITS, Fixed, Framebuffer, Pixel, ViewWindow};
use crate::tables::{Brightmap, ColorMaps, TranslationTable};

/// Everything needed to draw one column.
#[derive(Clone, Copy)]
pub struct ColumnParams<'a> {
    /// View column
    pub x: i32,
    /// First view row, inclusive
    pub yl: i32,
    /// Last view row, inclusive
    pub yh: i32,
    /// Texture rows advanced per screen row
    pub iscale: Fixed,
    /// Texture row at `ViewWindow::center_y`
    pub texturemid: Fixed,
    pub texheight: i32,
    /// Texture column, at least `texheight` bytes
    pub source: &'a [u8],
    pub colormaps: ColorMaps<'a>,
    pub brightmap: &'a Brightmap,
}

/// Wraparound regime for a texture height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    /// Power-of-two height: mask the texel row with `height - 1`.
    Mask(i32),
    /// Any height: keep the accumulator below `height << FRACBITS`.
    Modulo(Fixed),
}

impl TextureWrap {
    const MAX_HEIGHT: i32 = i32::MAX >> FRACBITS;

    /// Pick the cheapest regime that is exact for `height`.
    pub fn for_height(height: i32) -> Result<Self, DrawError> {
        Self::check_height(height)?;
        if height & (height - 1) == 0 {
            Ok(Self::Mask(height - 1))
        } else {
            Ok(Self::Modulo(height << FRACBITS))
        }
    }

    /// Force the modulo regime, even for power-of-two heights.
    pub fn modulo(height: i32) -> Result<Self, DrawError> {
        Self::check_height(height)?;
        Ok(Self::Modulo(height << FRACBITS))
    }

    fn check_height(height: i32) -> Result<(), DrawError> {
        if height <= 0 || height > Self::MAX_HEIGHT {
            return Err(DrawError::BadTextureHeight(height));
        }
        Ok(())
    }
}

/// Walks texel rows down a column.
#[derive(Debug, Clone)]
pub struct ColumnSampler {
    frac: Fixed,
    step: Fixed,
    wrap: TextureWrap,
}

impl ColumnSampler {
    pub fn new(frac: Fixed, step: Fixed, wrap: TextureWrap) -> Self {
        let frac = match wrap {
            TextureWrap::Mask(_) => frac,
            // same result as adding or subtracting the height until in range
            TextureWrap::Modulo(height) => frac.rem_euclid(height),
        };
        Self { frac, step, wrap }
    }

    /// Texel row for the current pixel, then advance one screen row.
    #[inline]
    pub fn next_texel(&mut self) -> usize {
        match self.wrap {
            TextureWrap::Mask(mask) => {
                let texel = fixed_int(self.frac) & mask;
                self.frac = self.frac.wrapping_add(self.step);
                texel as usize
            }
            TextureWrap::Modulo(height) => {
                let texel = fixed_int(self.frac);
                self.frac = self.frac.wrapping_add(self.step);
                if self.frac >= height {
                    self.frac -= height;
                    // steps longer than the texture need more than one wrap
                    if self.frac >= height {
                        self.frac = self.frac.rem_euclid(height);
                    }
                } else if self.frac < 0 {
                    self.frac = self.frac.rem_euclid(height);
                }
                texel as usize
            }
        }
    }
}

impl Iterator for ColumnSampler {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        Some(self.next_texel())
    }
}

trait Remap {
    fn remap(&self, index: u8) -> u8;
}

struct Untranslated;

impl Remap for Untranslated {
    #[inline(always)]
    fn remap(&self, index: u8) -> u8 {
        index
    }
}

impl Remap for &TranslationTable {
    #[inline(always)]
    fn remap(&self, index: u8) -> u8 {
        self[index as usize]
    }
}

trait Pen {
    fn put(&self, dest: &mut Pixel, color: Pixel);
}

struct Opaque;

impl Pen for Opaque {
    #[inline(always)]
    fn put(&self, dest: &mut Pixel, color: Pixel) {
        *dest = color;
    }
}

/// Destination tinted by source.
struct Translucent<'b, B: ?Sized>(&'b B);

impl<B: Blend + ?Sized> Pen for Translucent<'_, B> {
    #[inline(always)]
    fn put(&self, dest: &mut Pixel, color: Pixel) {
        *dest = self.0.blend(*dest, color);
    }
}

/// Source tinted by destination.
struct AltTranslucent<'b, B: ?Sized>(&'b B);

impl<B: Blend + ?Sized> Pen for AltTranslucent<'_, B> {
    #[inline(always)]
    fn put(&self, dest: &mut Pixel, color: Pixel) {
        *dest = self.0.blend(color, *dest);
    }
}

#[inline(always)]
fn rasterize<R: Remap, P: Pen>(
    routine: &'static str,
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &ColumnParams<'_>,
    remap: R,
    pen: P,
    clip_view_edges: bool,
) -> Result<usize, DrawError> {
    let mut yl = params.yl;
    let mut yh = params.yh;
    if clip_view_edges {
        if yl == 0 {
            yl = 1;
        }
        if yh == window.height() as i32 - 1 {
            yh = window.height() as i32 - 2;
        }
    }

    let count = yh - yl;
    if count < 0 {
        return Ok(0);
    }

    let out_of_range = || DrawError::ColumnOutOfRange {
        routine,
        x: params.x,
        yl,
        yh,
    };

    #[cfg(feature = "rangecheck")]
    if params.x < 0
        || params.x as usize >= window.width()
        || yl < 0
        || yh as usize >= window.height()
    {
        return Err(out_of_range());
    }

    if fb.stride() != window.screen_width() {
        return Err(DrawError::StrideMismatch {
            framebuffer: fb.stride(),
            window: window.screen_width(),
        });
    }
    let wrap = TextureWrap::for_height(params.texheight)?;
    if params.source.len() < params.texheight as usize {
        return Err(DrawError::SourceTooShort {
            len: params.source.len(),
            height: params.texheight,
        });
    }

    let mut dest = usize::try_from(params.x)
        .ok()
        .zip(usize::try_from(yl).ok())
        .and_then(|(x, y)| window.offset(x, y))
        .ok_or_else(out_of_range)?;
    let stride = fb.stride();

    let frac = params
        .texturemid
        .wrapping_add((yl - window.center_y()).wrapping_mul(params.iscale));
    let mut sampler = ColumnSampler::new(frac, params.iscale, wrap);

    let pixels = fb.pixels_mut();
    for _ in 0..=count {
        let source = params.source[sampler.next_texel()];
        let colormap = params.brightmap.select(source, &params.colormaps);
        pen.put(&mut pixels[dest], colormap[remap.remap(source) as usize]);
        dest += stride;
    }

    Ok(count as usize + 1)
}

/// Opaque column.
pub fn draw_column(
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &ColumnParams<'_>,
) -> Result<usize, DrawError> {
    rasterize("draw_column", window, fb, params, Untranslated, Opaque, false)
}

/// Opaque column for low-detail mode, where the caller only visits every
/// other screen column.
pub fn draw_column_low(
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &ColumnParams<'_>,
) -> Result<usize, DrawError> {
    rasterize("draw_column_low", window, fb, params, Untranslated, Opaque, false)
}

/// Translucent column: the screen pixel is tinted by the texture,
/// `blend(dest, src)`. The first and last view rows are never touched.
pub fn draw_tl_column<B: Blend + ?Sized>(
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &ColumnParams<'_>,
    blend: &B,
) -> Result<usize, DrawError> {
    rasterize(
        "draw_tl_column",
        window,
        fb,
        params,
        Untranslated,
        Translucent(blend),
        true,
    )
}

/// Translucent column with the operands swapped: the texture is tinted by
/// the screen pixel, `blend(src, dest)`.
pub fn draw_alt_tl_column<B: Blend + ?Sized>(
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &ColumnParams<'_>,
    blend: &B,
) -> Result<usize, DrawError> {
    rasterize(
        "draw_alt_tl_column",
        window,
        fb,
        params,
        Untranslated,
        AltTranslucent(blend),
        true,
    )
}

/// Opaque column recolored through `translation`.
pub fn draw_translated_column(
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &ColumnParams<'_>,
    translation: &TranslationTable,
) -> Result<usize, DrawError> {
    rasterize(
        "draw_translated_column",
        window,
        fb,
        params,
        translation,
        Opaque,
        false,
    )
}

/// Recolored translucent column, `blend(src, dest)`.
pub fn draw_translated_tl_column<B: Blend + ?Sized>(
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &ColumnParams<'_>,
    translation: &TranslationTable,
    blend: &B,
) -> Result<usize, DrawError> {
    rasterize(
        "draw_translated_tl_column",
        window,
        fb,
        params,
        translation,
        AltTranslucent(blend),
        false,
    )
}
