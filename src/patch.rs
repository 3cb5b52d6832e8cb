// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Column-post picture decoding and drawing.
//!
//! A patch starts with an 8-byte header (width, height, left offset, top
//! offset; little-endian 16-bit), followed by one 32-bit offset per
//! column. Each column is a run of posts: top row, pixel count, a pad
//! byte, the pixels, another pad byte. A top row of `0xFF` ends the
//! column. Rows that do not increase continue from the previous post,
//! which lets tall patches exceed 254 rows.

use crate::assets::{AssetError, LumpSource};
use crate::core::Pixel;
use crate::tables::ColorMap;

const HEADER_LEN: usize = 8;
const END_OF_COLUMN: u8 = 0xFF;

/// A vertical run of opaque pixels in one patch column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub top: usize,
    pub pixels: Vec<u8>,
}

/// Decoded patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub width: usize,
    pub height: usize,
    pub left_offset: i32,
    pub top_offset: i32,
    pub columns: Vec<Vec<Post>>,
}

impl Patch {
    /// Decode the patch stored in lump `name`.
    pub fn load(source: &impl LumpSource, name: &str) -> Result<Self, AssetError> {
        Self::parse(name, source.lump_by_name(name)?)
    }

    pub fn parse(name: &str, data: &[u8]) -> Result<Self, AssetError> {
        let bad = |reason| AssetError::BadPatch {
            name: name.to_string(),
            reason,
        };
        if data.len() < HEADER_LEN {
            return Err(AssetError::LumpTooShort {
                name: name.to_string(),
                len: data.len(),
                expected: HEADER_LEN,
            });
        }
        let width = u16::from_le_bytes([data[0], data[1]]) as usize;
        let height = u16::from_le_bytes([data[2], data[3]]) as usize;
        let left_offset = i16::from_le_bytes([data[4], data[5]]) as i32;
        let top_offset = i16::from_le_bytes([data[6], data[7]]) as i32;

        let table_end = HEADER_LEN + width * 4;
        let table = data
            .get(HEADER_LEN..table_end)
            .ok_or_else(|| bad("truncated column table"))?;

        let mut columns = Vec::with_capacity(width);
        for entry in table.chunks_exact(4) {
            let offset = u32::from_le_bytes([entry[0], entry[1], entry[2], entry[3]]) as usize;
            let column =
                Self::parse_column(data, offset).ok_or_else(|| bad("column overruns lump"))?;
            columns.push(column);
        }

        Ok(Self {
            width,
            height,
            left_offset,
            top_offset,
            columns,
        })
    }

    fn parse_column(data: &[u8], mut offset: usize) -> Option<Vec<Post>> {
        let mut posts = Vec::new();
        let mut last_top: Option<usize> = None;
        loop {
            let delta = *data.get(offset)?;
            if delta == END_OF_COLUMN {
                return Some(posts);
            }
            let len = *data.get(offset + 1)? as usize;
            let pixels = data.get(offset + 3..offset + 3 + len)?.to_vec();
            let top = match last_top {
                Some(prev) if delta as usize <= prev => prev + delta as usize,
                _ => delta as usize,
            };
            last_top = Some(top);
            posts.push(Post { top, pixels });
            offset += len + 4;
        }
    }
}

/// A pixel buffer patches are drawn into, in logical (unscaled) units.
pub struct Canvas<'a> {
    pub pixels: &'a mut [Pixel],
    pub width: usize,
    pub height: usize,
    /// Screen pixels per logical pixel
    pub scale: usize,
    /// Logical x of the leftmost 4:3 column
    pub x_origin: i32,
}

impl Canvas<'_> {
    /// Draw `patch` with its origin at logical (`x`, `y`), mapping each
    /// texel through `colormap`. Pixels outside the canvas are dropped;
    /// returns how many screen pixels were clipped.
    pub fn draw_patch(&mut self, x: i32, y: i32, patch: &Patch, colormap: &ColorMap) -> usize {
        let scale = self.scale.max(1) as i64;
        let left = (x + self.x_origin - patch.left_offset) as i64;
        let top = (y - patch.top_offset) as i64;
        let mut clipped = 0;

        for (col, posts) in patch.columns.iter().enumerate() {
            let sx0 = (left + col as i64) * scale;
            for post in posts {
                for (i, &texel) in post.pixels.iter().enumerate() {
                    let sy0 = (top + (post.top + i) as i64) * scale;
                    let color = colormap[texel as usize];
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let sx = sx0 + dx;
                            let sy = sy0 + dy;
                            let slot = if sx < 0 || sy < 0 || sx as usize >= self.width {
                                None
                            } else {
                                self.pixels.get_mut(sy as usize * self.width + sx as usize)
                            };
                            match slot {
                                Some(pixel) if (sy as usize) < self.height => *pixel = color,
                                _ => clipped += 1,
                            }
                        }
                    }
                }
            }
        }
        clipped
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tables::identity_colormap;
    use pretty_assertions::assert_eq;

    /// Encode a solid `width` x `height` patch filled with `color`.
    pub(crate) fn solid_patch(width: u16, height: u8, left: i16, top: i16, color: u8) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&(height as u16).to_le_bytes());
        data.extend_from_slice(&left.to_le_bytes());
        data.extend_from_slice(&top.to_le_bytes());
        let column_len = 4 + height as usize + 1;
        for col in 0..width as usize {
            let offset = HEADER_LEN + width as usize * 4 + col * column_len;
            data.extend_from_slice(&(offset as u32).to_le_bytes());
        }
        for _ in 0..width {
            data.extend_from_slice(&[0, height, 0]);
            data.extend(std::iter::repeat_n(color, height as usize));
            data.extend_from_slice(&[0, END_OF_COLUMN]);
        }
        data
    }

    #[test]
    fn parses_header_and_posts() {
        let patch = Patch::parse("BORDT", &solid_patch(3, 4, -1, 2, 9)).unwrap();
        assert_eq!(patch.width, 3);
        assert_eq!(patch.height, 4);
        assert_eq!(patch.left_offset, -1);
        assert_eq!(patch.top_offset, 2);
        assert_eq!(patch.columns.len(), 3);
        assert_eq!(
            patch.columns[0],
            vec![Post {
                top: 0,
                pixels: vec![9; 4]
            }]
        );
    }

    #[test]
    fn tall_posts_accumulate_top() {
        // one column: post at 200 (2 px), then delta 10 <= 200 -> row 210
        let mut data = vec![1, 0, 0, 1, 0, 0, 0, 0];
        data.extend_from_slice(&12u32.to_le_bytes());
        data.extend_from_slice(&[200, 2, 0, 1, 1, 0]);
        data.extend_from_slice(&[10, 1, 0, 2, 0]);
        data.push(END_OF_COLUMN);

        let patch = Patch::parse("TALL", &data).unwrap();
        let tops: Vec<usize> = patch.columns[0].iter().map(|p| p.top).collect();
        assert_eq!(tops, vec![200, 210]);
    }

    #[test]
    fn malformed_patches_are_rejected() {
        assert!(matches!(
            Patch::parse("X", &[1, 0, 1]),
            Err(AssetError::LumpTooShort { expected: 8, .. })
        ));

        let mut truncated = solid_patch(2, 2, 0, 0, 1);
        truncated.truncate(HEADER_LEN + 6);
        assert!(matches!(
            Patch::parse("X", &truncated),
            Err(AssetError::BadPatch { reason: "truncated column table", .. })
        ));

        let mut unterminated = solid_patch(1, 2, 0, 0, 1);
        unterminated.pop();
        assert!(matches!(
            Patch::parse("X", &unterminated),
            Err(AssetError::BadPatch { reason: "column overruns lump", .. })
        ));
    }

    #[test]
    fn draws_scaled_and_clipped() {
        let patch = Patch::parse("P", &solid_patch(2, 1, 0, 0, 7)).unwrap();
        let cmap = identity_colormap();
        let mut pixels = vec![0 as Pixel; 6 * 4];
        let mut canvas = Canvas {
            pixels: &mut pixels,
            width: 6,
            height: 4,
            scale: 2,
            x_origin: 0,
        };

        // logical (2, 1) -> screen columns 4..8, rows 2..4; columns 6, 7 clip
        let clipped = canvas.draw_patch(2, 1, &patch, &cmap);
        assert_eq!(clipped, 4);
        let lit: Vec<usize> = pixels
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == 7)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lit, vec![2 * 6 + 4, 2 * 6 + 5, 3 * 6 + 4, 3 * 6 + 5]);
    }

    #[test]
    fn offsets_and_origin_shift_placement() {
        let patch = Patch::parse("P", &solid_patch(1, 1, 1, 1, 3)).unwrap();
        let cmap = identity_colormap();
        let mut pixels = vec![0 as Pixel; 4 * 4];
        let mut canvas = Canvas {
            pixels: &mut pixels,
            width: 4,
            height: 4,
            scale: 1,
            x_origin: 2,
        };
        assert_eq!(canvas.draw_patch(0, 2, &patch, &cmap), 0);
        // x: 0 + 2 - 1 = 1, y: 2 - 1 = 1
        assert_eq!(pixels[4 + 1], 3);
    }
}
