// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-player palette translation tables.
//!
//! Each player class gets one 256-byte remap per extra player color. The
//! tables sit in consecutive lumps starting at `TRANTBL0` and are packed
//! into one buffer, table `i` at byte offset `i * 256`.

use log::debug;

use crate::assets::{AssetError, LumpSource};
use crate::tables::TranslationTable;

/// First translation lump.
pub const TRANSLATION_BASE_LUMP: &str = "TRANTBL0";

/// Player classes that carry their own set of color tables.
pub const PLAYER_CLASSES: usize = 3;

const TABLE_LEN: usize = 256;

/// Contiguous, immutable set of translation tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTables {
    data: Vec<u8>,
    colors_per_class: usize,
}

impl TranslationTables {
    /// Tables needed for `player_colors` colors; color 0 is untranslated.
    pub fn count_for(player_colors: usize) -> usize {
        PLAYER_CLASSES * player_colors.saturating_sub(1)
    }

    /// Load every table from consecutive lumps starting at `base_name`.
    pub fn load(
        source: &impl LumpSource,
        base_name: &str,
        player_colors: usize,
    ) -> Result<Self, AssetError> {
        let count = Self::count_for(player_colors);
        let mut data = Vec::with_capacity(count * TABLE_LEN);
        if count > 0 {
            let first = source.require_num(base_name)?;
            for num in first..first + count {
                let lump = source.require_lump(num)?;
                let table = lump.get(..TABLE_LEN).ok_or_else(|| AssetError::LumpTooShort {
                    name: source.name(num).unwrap_or(base_name).to_string(),
                    len: lump.len(),
                    expected: TABLE_LEN,
                })?;
                data.extend_from_slice(table);
            }
        }
        debug!("loaded {} translation tables from {}", count, base_name);
        Ok(Self {
            data,
            colors_per_class: player_colors.saturating_sub(1),
        })
    }

    pub fn len(&self) -> usize {
        self.data.len() / TABLE_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The packed buffer, indexed `table * 256 + source`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Table number `index` in load order.
    pub fn table(&self, index: usize) -> Option<&TranslationTable> {
        let start = index.checked_mul(TABLE_LEN)?;
        self.data.get(start..start + TABLE_LEN)?.try_into().ok()
    }

    /// Table for player `color` of `class`. Color 0 draws untranslated
    /// and has no table.
    pub fn for_player(&self, class: usize, color: usize) -> Option<&TranslationTable> {
        if color == 0 || color > self.colors_per_class || class >= PLAYER_CLASSES {
            return None;
        }
        self.table(class * self.colors_per_class + color - 1)
    }
}
