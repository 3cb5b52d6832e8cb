// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

// A small demo for the Raydraw renderer: draws a few frames of walls,
// floor and border from in-memory assets.
use anyhow::{Context, Result};
use raydraw_core::blend::Blend;
use raydraw_core::tables::identity_colormap;
use raydraw_core::translation::{PLAYER_CLASSES, TRANSLATION_BASE_LUMP};
use raydraw_core::{
    Brightmap, ColorMap, ColorMaps, ColumnExtras, ColumnParams, ColumnStyle, FRACUNIT, Flat,
    LumpDirectory, Pixel, Renderer, ScreenConfig, SpanParams, TranslationTables,
};

const WALL_HEIGHT: usize = 100;
const FRAMES: usize = 3;

/// Encode a solid patch in the column-post format.
fn solid_patch(width: u16, height: u8, color: u8) -> Vec<u8> {
    let mut data = Vec::new();
    for field in [width, height as u16, 0, 0] {
        data.extend_from_slice(&field.to_le_bytes());
    }
    let column_len = height as usize + 5;
    let table_end = 8 + width as usize * 4;
    for col in 0..width as usize {
        data.extend_from_slice(&((table_end + col * column_len) as u32).to_le_bytes());
    }
    for _ in 0..width {
        data.extend_from_slice(&[0, height, 0]);
        data.extend(std::iter::repeat_n(color, height as usize));
        data.extend_from_slice(&[0, 0xFF]);
    }
    data
}

fn demo_assets(config: &ScreenConfig) -> LumpDirectory {
    let mut dir = LumpDirectory::new();

    let flat: Vec<u8> = (0..64 * 64).map(|i| (((i / 64) ^ (i % 64)) & 15) as u8 + 16).collect();
    dir.push("F_022", flat);
    for (name, width, height, color) in [
        ("BORDT", 16, 4, 96),
        ("BORDB", 16, 4, 97),
        ("BORDL", 4, 16, 98),
        ("BORDR", 4, 16, 99),
        ("BORDTL", 4, 4, 100),
        ("BORDTR", 4, 4, 101),
        ("BORDBR", 4, 4, 102),
        ("BORDBL", 4, 4, 103),
    ] {
        dir.push(name, solid_patch(width, height, color));
    }

    // one shifted palette per class and color
    let base = TRANSLATION_BASE_LUMP.trim_end_matches('0');
    for k in 0..TranslationTables::count_for(config.player_colors) {
        let table: Vec<u8> = (0..=255u8).map(|i| i.wrapping_add(32 * (k as u8 + 1))).collect();
        dir.push(&format!("{base}{k}"), table);
    }
    dir
}

#[cfg(not(feature = "truecolor"))]
fn demo_blend() -> impl Blend {
    raydraw_core::TintTable::from_fn(|bg, fg| ((bg as u16 + fg as u16) / 2) as u8)
}

#[cfg(feature = "truecolor")]
fn demo_blend() -> impl Blend {
    raydraw_core::RgbBlend::new(96)
}

#[cfg(feature = "serde-config")]
fn load_config() -> Result<ScreenConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            ScreenConfig::from_yaml_str(&text).with_context(|| format!("parsing config {path}"))
        }
        None => Ok(ScreenConfig::default()),
    }
}

#[cfg(not(feature = "serde-config"))]
fn load_config() -> Result<ScreenConfig> {
    Ok(ScreenConfig::default())
}

fn main() -> Result<()> {
    env_logger::init();

    println!("Raydraw Software Renderer v0.1.0");
    println!("================================");
    println!();

    let config = load_config()?;
    let assets = demo_assets(&config);
    let mut renderer = Renderer::new(config.clone()).context("creating renderer")?;
    let tables = renderer
        .load_translations(&assets)
        .context("loading translation tables")?;

    let view_width = config.width * 3 / 4;
    let view_height = config.play_height() * 3 / 4;
    renderer
        .set_view_size(view_width, view_height)
        .context("resizing view")?;
    let window = renderer.window();
    println!("Screen:       {}x{}", config.width, config.height);
    println!(
        "View:         {}x{} at ({}, {})",
        window.width(),
        window.height(),
        window.x(),
        window.y()
    );
    println!("Translations: {}", tables);
    println!();

    let colormap = identity_colormap();
    let bright: ColorMap = [255 as Pixel; 256];
    let brightmap = Brightmap::from_indices([7u8, 42]);
    let maps = ColorMaps {
        normal: &colormap,
        bright: &bright,
    };
    let wall: Vec<u8> = (0..WALL_HEIGHT).map(|i| (i % 64) as u8).collect();
    let mut floor: Flat = [0; 64 * 64];
    for (i, texel) in floor.iter_mut().enumerate() {
        *texel = if (i / 64 / 8 + i % 64 / 8) % 2 == 0 { 60 } else { 70 };
    }
    let blend = demo_blend();

    let horizon = (view_height / 2) as i32;
    for frame in 0..FRAMES {
        renderer.begin_frame();
        renderer
            .draw_view_border(&assets, &colormap)
            .context("drawing view border")?;

        for y in horizon..view_height as i32 {
            let distance = y - horizon + 1;
            let params = SpanParams {
                y,
                x1: 0,
                x2: view_width as i32 - 1,
                xfrac: (frame as i32) << 16,
                yfrac: (64 << 16) / distance,
                xstep: FRACUNIT / distance,
                ystep: 0,
                source: &floor,
                colormap: &colormap,
            };
            renderer.draw_span(&params, false)?;
        }

        for x in 0..view_width as i32 {
            let params = ColumnParams {
                x,
                yl: 0,
                yh: horizon - 1,
                iscale: FRACUNIT * 3 / 4,
                texturemid: ((WALL_HEIGHT as i32) / 2) << 16,
                texheight: WALL_HEIGHT as i32,
                source: &wall,
                colormaps: maps,
                brightmap: &brightmap,
            };
            match x * 4 / view_width as i32 {
                0 => renderer.draw_column(ColumnStyle::empty(), &params, ColumnExtras::default())?,
                1 => renderer.draw_column(
                    ColumnStyle::TRANSLUCENT,
                    &params,
                    ColumnExtras {
                        translation: None,
                        blend: Some(&blend),
                    },
                )?,
                2 => {
                    let class = x as usize % PLAYER_CLASSES;
                    // color 0 draws untranslated
                    let color = match config.player_colors {
                        0 | 1 => 0,
                        colors => 1 + x as usize % (colors - 1),
                    };
                    renderer.draw_player_column(ColumnStyle::empty(), &params, class, color, None)?
                }
                _ => renderer.draw_column(
                    ColumnStyle::LOW_DETAIL,
                    &params,
                    ColumnExtras::default(),
                )?,
            };
        }

        let stats = renderer.end_frame();
        println!(
            "Frame {}: {} columns, {} spans, {} pixels, {} border pixels",
            frame + 1,
            stats.columns_drawn,
            stats.spans_drawn,
            stats.pixels_written,
            stats.border_pixels
        );
    }

    let dirty = renderer.framebuffer_mut().take_dirty();
    let checksum = renderer
        .framebuffer()
        .pixels()
        .iter()
        .fold(0u64, |acc, &p| acc.wrapping_mul(31).wrapping_add(p as u64));
    println!();
    println!("Dirty region: {:?}", dirty);
    println!("Checksum:     0x{:016X}", checksum);
    println!("Border built: {} time(s)", renderer.border().generation());

    Ok(())
}
