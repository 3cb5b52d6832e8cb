// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Column and span rasterizers.
//!
//! Callers resolve all sampling parameters (texture coordinates, step
//! rates, color maps) and hand them over as a [`ColumnParams`] or
//! [`SpanParams`]. The rasterizers only turn those into pixels, writing
//! through the [`ViewWindow`](crate::core::ViewWindow) addressing tables.

pub mod column;
pub mod span;

use bitflags::bitflags;
use thiserror::Error;

use crate::blend::Blend;
use crate::core::{Framebuffer, ViewWindow};
use crate::tables::TranslationTable;

pub use column::{
    ColumnParams, ColumnSampler, TextureWrap, draw_alt_tl_column, draw_column, draw_column_low,
    draw_tl_column, draw_translated_column, draw_translated_tl_column,
};
pub use span::{SpanParams, draw_span, draw_span_low, flat_index};

/// Rasterizer errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("{routine}: {yl} to {yh} at {x}")]
    ColumnOutOfRange {
        routine: &'static str,
        x: i32,
        yl: i32,
        yh: i32,
    },
    #[error("{routine}: {x1} to {x2} at {y}")]
    SpanOutOfRange {
        routine: &'static str,
        y: i32,
        x1: i32,
        x2: i32,
    },
    #[error("texture height {0} is out of range")]
    BadTextureHeight(i32),
    #[error("source column holds {len} bytes, texture height is {height}")]
    SourceTooShort { len: usize, height: i32 },
    #[error("framebuffer stride {framebuffer} does not match screen width {window}")]
    StrideMismatch { framebuffer: usize, window: usize },
    #[error("column style {0:?} needs a translation table")]
    MissingTranslation(ColumnStyle),
    #[error("column style {0:?} needs a blend")]
    MissingBlend(ColumnStyle),
}

bitflags! {
    /// Which column variant to draw.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColumnStyle: u8 {
        const LOW_DETAIL = 0x01;
        const TRANSLATED = 0x02;
        const TRANSLUCENT = 0x04;
        const ALT_TRANSLUCENT = 0x08;
    }
}

/// Optional inputs some column styles need.
#[derive(Clone, Copy, Default)]
pub struct ColumnExtras<'a> {
    pub translation: Option<&'a TranslationTable>,
    pub blend: Option<&'a dyn Blend>,
}

/// Draw one column with the variant selected by `style`.
pub fn draw_styled_column(
    style: ColumnStyle,
    window: &ViewWindow,
    fb: &mut Framebuffer,
    params: &ColumnParams<'_>,
    extras: ColumnExtras<'_>,
) -> Result<usize, DrawError> {
    let translucent = style.intersects(ColumnStyle::TRANSLUCENT | ColumnStyle::ALT_TRANSLUCENT);
    let blend = if translucent {
        Some(extras.blend.ok_or(DrawError::MissingBlend(style))?)
    } else {
        None
    };

    if style.contains(ColumnStyle::TRANSLATED) {
        let translation = extras
            .translation
            .ok_or(DrawError::MissingTranslation(style))?;
        return match blend {
            Some(blend) => draw_translated_tl_column(window, fb, params, translation, blend),
            None => draw_translated_column(window, fb, params, translation),
        };
    }

    match blend {
        Some(blend) if style.contains(ColumnStyle::ALT_TRANSLUCENT) => {
            draw_alt_tl_column(window, fb, params, blend)
        }
        Some(blend) => draw_tl_column(window, fb, params, blend),
        None if style.contains(ColumnStyle::LOW_DETAIL) => draw_column_low(window, fb, params),
        None => draw_column(window, fb, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenConfig;
    use crate::core::{FRACUNIT, Pixel};
    use crate::tables::{Brightmap, ColorMap, ColorMaps, identity_colormap};

    fn setup() -> (ViewWindow, Framebuffer) {
        let config = ScreenConfig {
            width: 16,
            height: 12,
            status_bar_height: 2,
            ..ScreenConfig::default()
        };
        (
            ViewWindow::new(&config, 8, 6).unwrap(),
            Framebuffer::new(16, 12),
        )
    }

    #[test]
    fn translated_style_without_table_is_rejected() {
        let (window, mut fb) = setup();
        let cmap: ColorMap = identity_colormap();
        let bm = Brightmap::none();
        let source = [1u8; 4];
        let params = ColumnParams {
            x: 0,
            yl: 1,
            yh: 2,
            iscale: FRACUNIT,
            texturemid: 0,
            texheight: 4,
            source: &source,
            colormaps: ColorMaps::uniform(&cmap),
            brightmap: &bm,
        };

        let err = draw_styled_column(
            ColumnStyle::TRANSLATED,
            &window,
            &mut fb,
            &params,
            ColumnExtras::default(),
        )
        .unwrap_err();
        assert_eq!(err, DrawError::MissingTranslation(ColumnStyle::TRANSLATED));

        let err = draw_styled_column(
            ColumnStyle::ALT_TRANSLUCENT,
            &window,
            &mut fb,
            &params,
            ColumnExtras::default(),
        )
        .unwrap_err();
        assert_eq!(err, DrawError::MissingBlend(ColumnStyle::ALT_TRANSLUCENT));
    }

    #[test]
    fn style_picks_blend_order() {
        let (window, mut fb) = setup();
        let cmap: ColorMap = identity_colormap();
        let bm = Brightmap::none();
        let source = [5u8; 4];
        let params = ColumnParams {
            x: 2,
            yl: 2,
            yh: 2,
            iscale: FRACUNIT,
            texturemid: 0,
            texheight: 4,
            source: &source,
            colormaps: ColorMaps::uniform(&cmap),
            brightmap: &bm,
        };
        let keep_bg = |bg: Pixel, _fg: Pixel| bg;
        let extras = ColumnExtras {
            translation: None,
            blend: Some(&keep_bg),
        };
        let offset = window.offset(2, 2).unwrap();

        fb.pixels_mut()[offset] = 9;
        draw_styled_column(ColumnStyle::TRANSLUCENT, &window, &mut fb, &params, extras).unwrap();
        assert_eq!(fb.pixels()[offset], 9);

        draw_styled_column(ColumnStyle::ALT_TRANSLUCENT, &window, &mut fb, &params, extras)
            .unwrap();
        assert_eq!(fb.pixels()[offset], 5);
    }

    #[test]
    fn error_messages_name_routine_and_coordinates() {
        let err = DrawError::ColumnOutOfRange {
            routine: "draw_column",
            x: 400,
            yl: 3,
            yh: 9,
        };
        assert_eq!(err.to_string(), "draw_column: 3 to 9 at 400");
    }
}
