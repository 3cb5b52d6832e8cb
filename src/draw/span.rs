// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Floor and ceiling span rasterizer.

use super::DrawError;
use crate::core::fixed::fixed_int;
use crate::core::{Fixed, Framebuffer, ViewWindow};
use crate::tables::{ColorMap, Flat};

/// Everything needed to draw one horizontal span.
#[derive(Clone, Copy)]
pub struct SpanParams<'a> {
    /// View row
    pub y: i32,
    /// First view column, inclusive
    pub x1: i32,
    /// Last view column, inclusive
    pub x2: i32,
    pub xfrac: Fixed,
    pub yfrac: Fixed,
    pub xstep: Fixed,
    pub ystep: Fixed,
    pub source: &'a Flat,
    pub colormap: &'a ColorMap,
}

/// Index into a 64x64 flat for the given texture coordinates.
///
/// Row comes from `yfrac` bits 16..22, column from `xfrac` bits 16..22;
/// the masks wrap both axes at the tile edge.
#[inline]
pub fn flat_index(xfrac: Fixed, yfrac: Fixed) -> usize {
    (((yfrac >> (16 - 6)) & (63 * 64)) + (fixed_int(xfrac) & 63)) as usize
}

fn rasterize(
    routine: &'static str,
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &SpanParams<'_>,
) -> Result<usize, DrawError> {
    let out_of_range = || DrawError::SpanOutOfRange {
        routine,
        y: params.y,
        x1: params.x1,
        x2: params.x2,
    };

    #[cfg(feature = "rangecheck")]
    if params.x2 < params.x1
        || params.x1 < 0
        || params.x2 as usize >= window.width()
        || params.y < 0
        || params.y as usize >= window.height()
    {
        return Err(out_of_range());
    }

    let count = params.x2 - params.x1;
    if count < 0 {
        return Ok(0);
    }

    if fb.stride() != window.screen_width() {
        return Err(DrawError::StrideMismatch {
            framebuffer: fb.stride(),
            window: window.screen_width(),
        });
    }

    let mut dest = usize::try_from(params.x1)
        .ok()
        .zip(usize::try_from(params.y).ok())
        .and_then(|(x, y)| window.offset(x, y))
        .ok_or_else(out_of_range)?;

    let mut xfrac = params.xfrac;
    let mut yfrac = params.yfrac;
    let pixels = fb.pixels_mut();
    for _ in 0..=count {
        let spot = flat_index(xfrac, yfrac);
        pixels[dest] = params.colormap[params.source[spot] as usize];
        dest += 1;
        xfrac = xfrac.wrapping_add(params.xstep);
        yfrac = yfrac.wrapping_add(params.ystep);
    }

    Ok(count as usize + 1)
}

/// Draw one span of a 64x64 flat.
pub fn draw_span(
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &SpanParams<'_>,
) -> Result<usize, DrawError> {
    rasterize("draw_span", window, fb, params)
}

/// Low-detail span; the caller halves the horizontal coordinates.
pub fn draw_span_low(
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &SpanParams<'_>,
) -> Result<usize, DrawError> {
    rasterize("draw_span_low", window, fb, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenConfig;
    use crate::core::{FRACUNIT, Pixel, fixed::to_fixed};
    use crate::tables::{FLAT_SIZE, identity_colormap};
    use pretty_assertions::assert_eq;

    const SENTINEL: Pixel = 0xEE;

    fn setup() -> (ViewWindow, Framebuffer) {
        let config = ScreenConfig {
            width: 16,
            height: 12,
            status_bar_height: 2,
            ..ScreenConfig::default()
        };
        let window = ViewWindow::new(&config, 8, 6).unwrap();
        let mut fb = Framebuffer::new(16, 12);
        fb.fill(SENTINEL);
        (window, fb)
    }

    // texel (x, y) holds (x + y) & 0x7f so rows and columns are distinguishable
    fn gradient_flat() -> Flat {
        std::array::from_fn(|i| ((i % FLAT_SIZE + i / FLAT_SIZE) & 0x7f) as u8)
    }

    #[test]
    fn tile_wraps_every_64_texels() {
        let period = 64 * 65536;
        assert_eq!(flat_index(0, 0), flat_index(period, 0));
        assert_eq!(flat_index(0, 0), flat_index(0, period));
        for (x, y) in [(123_456, 7_654_321), (-5 * FRACUNIT, 3), (0x7fff_0000, -1)] {
            assert_eq!(flat_index(x, y), flat_index(x.wrapping_add(period), y));
            assert_eq!(flat_index(x, y), flat_index(x, y.wrapping_sub(period)));
            assert!(flat_index(x, y) < FLAT_SIZE * FLAT_SIZE);
        }
    }

    #[test]
    fn index_splits_rows_and_columns() {
        assert_eq!(flat_index(to_fixed(5), to_fixed(2)), 2 * 64 + 5);
        assert_eq!(flat_index(to_fixed(63), to_fixed(63)), 4095);
        assert_eq!(flat_index(to_fixed(-1), to_fixed(-1)), 4095);
    }

    #[test]
    fn span_writes_its_row_only() {
        let (window, mut fb) = setup();
        let flat = gradient_flat();
        let cmap = identity_colormap();
        let params = SpanParams {
            y: 4,
            x1: 2,
            x2: 6,
            xfrac: to_fixed(62),
            yfrac: to_fixed(1),
            xstep: FRACUNIT,
            ystep: 0,
            source: &flat,
            colormap: &cmap,
        };

        assert_eq!(draw_span(&window, &mut fb, &params).unwrap(), 5);

        let start = window.offset(2, 4).unwrap();
        // x runs 62, 63, 0, 1, 2 on texel row 1
        assert_eq!(&fb.pixels()[start..start + 5], &[63, 64, 1, 2, 3]);
        let untouched = fb
            .pixels()
            .iter()
            .enumerate()
            .filter(|(i, _)| !(start..start + 5).contains(i))
            .all(|(_, p)| *p == SENTINEL);
        assert!(untouched);
    }

    #[test]
    fn span_applies_colormap() {
        let (window, mut fb) = setup();
        let flat = [9u8; FLAT_SIZE * FLAT_SIZE];
        let mut cmap = identity_colormap();
        cmap[9] = 42;
        let params = SpanParams {
            y: 0,
            x1: 0,
            x2: 0,
            xfrac: 0,
            yfrac: 0,
            xstep: FRACUNIT,
            ystep: FRACUNIT,
            source: &flat,
            colormap: &cmap,
        };

        draw_span_low(&window, &mut fb, &params).unwrap();
        assert_eq!(fb.pixels()[window.offset(0, 0).unwrap()], 42);
    }

    #[test]
    fn diagonal_steps_walk_both_axes() {
        let (window, mut fb) = setup();
        let flat = gradient_flat();
        let cmap = identity_colormap();
        let params = SpanParams {
            y: 1,
            x1: 0,
            x2: 3,
            xfrac: 0,
            yfrac: to_fixed(63),
            xstep: FRACUNIT,
            ystep: FRACUNIT,
            source: &flat,
            colormap: &cmap,
        };

        draw_span(&window, &mut fb, &params).unwrap();
        let start = window.offset(0, 1).unwrap();
        // (0,63) (1,0) (2,1) (3,2)
        assert_eq!(&fb.pixels()[start..start + 4], &[63, 1, 3, 5]);
    }

    #[cfg(feature = "rangecheck")]
    #[test]
    fn bad_spans_are_errors() {
        let (window, mut fb) = setup();
        let flat = gradient_flat();
        let cmap = identity_colormap();
        let mut params = SpanParams {
            y: 1,
            x1: 5,
            x2: 4,
            xfrac: 0,
            yfrac: 0,
            xstep: FRACUNIT,
            ystep: 0,
            source: &flat,
            colormap: &cmap,
        };

        let err = draw_span(&window, &mut fb, &params).unwrap_err();
        assert_eq!(
            err,
            DrawError::SpanOutOfRange {
                routine: "draw_span",
                y: 1,
                x1: 5,
                x2: 4
            }
        );

        params.x1 = 0;
        params.x2 = 8;
        assert!(draw_span(&window, &mut fb, &params).is_err());
        params.x2 = 7;
        params.y = 6;
        assert!(draw_span_low(&window, &mut fb, &params).is_err());
        assert!(fb.pixels().iter().all(|p| *p == SENTINEL));
    }

    #[cfg(not(feature = "rangecheck"))]
    #[test]
    fn inverted_span_is_a_no_op_without_checks() {
        let (window, mut fb) = setup();
        let flat = gradient_flat();
        let cmap = identity_colormap();
        let params = SpanParams {
            y: 1,
            x1: 5,
            x2: 4,
            xfrac: 0,
            yfrac: 0,
            xstep: FRACUNIT,
            ystep: 0,
            source: &flat,
            colormap: &cmap,
        };

        assert_eq!(draw_span(&window, &mut fb, &params).unwrap(), 0);
        assert!(fb.pixels().iter().all(|p| *p == SENTINEL));
    }
}
