// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fixed-size lookup tables shared by the rasterizers.
//!
//! Every table a rasterizer indexes with a source byte is a 256-entry
//! array, so lookups by `u8` can never go out of bounds.

use bitvec::prelude::*;

use crate::core::Pixel;

/// Light-level lookup from a palette index to a display pixel.
pub type ColorMap = [Pixel; 256];

/// Palette remap used to recolor a texture.
pub type TranslationTable = [u8; 256];

/// Side length of a flat tile.
pub const FLAT_SIZE: usize = 64;

/// A 64x64 floor/ceiling tile, row-major.
pub type Flat = [u8; FLAT_SIZE * FLAT_SIZE];

/// Per-source-byte flag selecting the bright color map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brightmap {
    bits: BitArray<[u64; 4], Lsb0>,
}

impl Brightmap {
    /// No source byte is bright.
    pub fn none() -> Self {
        Self {
            bits: BitArray::new([0; 4]),
        }
    }

    /// Mark the given palette indices as bright.
    pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> Self {
        let mut map = Self::none();
        for index in indices {
            map.set(index, true);
        }
        map
    }

    pub fn set(&mut self, index: u8, bright: bool) {
        self.bits.set(index as usize, bright);
    }

    #[inline]
    pub fn is_bright(&self, index: u8) -> bool {
        self.bits[index as usize]
    }

    /// Pick the normal or bright map for a raw source byte.
    #[inline]
    pub fn select<'a>(&self, index: u8, maps: &ColorMaps<'a>) -> &'a ColorMap {
        if self.is_bright(index) {
            maps.bright
        } else {
            maps.normal
        }
    }
}

impl Default for Brightmap {
    fn default() -> Self {
        Self::none()
    }
}

/// The two color maps a column can resolve through.
#[derive(Debug, Clone, Copy)]
pub struct ColorMaps<'a> {
    pub normal: &'a ColorMap,
    pub bright: &'a ColorMap,
}

impl<'a> ColorMaps<'a> {
    /// Use the same map for bright and normal pixels.
    pub fn uniform(map: &'a ColorMap) -> Self {
        Self {
            normal: map,
            bright: map,
        }
    }
}

/// Identity color map: every palette index maps to itself.
pub fn identity_colormap() -> ColorMap {
    std::array::from_fn(|i| i as Pixel)
}

/// Identity translation.
pub fn identity_translation() -> TranslationTable {
    std::array::from_fn(|i| i as u8)
}
