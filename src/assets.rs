// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Named asset records ("lumps") consumed by the renderer.
//!
//! The renderer never parses archives itself. It asks a [`LumpSource`]
//! for records by name or by number and treats a missing record as a
//! fatal [`AssetError`].

use log::trace;
use thiserror::Error;

/// Asset lookup and decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("lump {0} not found")]
    MissingLump(String),
    #[error("lump number {0} not found")]
    MissingLumpNum(usize),
    #[error("lump {name} is {len} bytes, need at least {expected}")]
    LumpTooShort {
        name: String,
        len: usize,
        expected: usize,
    },
    #[error("malformed patch {name}: {reason}")]
    BadPatch { name: String, reason: &'static str },
}

/// Read access to named asset records.
pub trait LumpSource {
    /// Number of the lump called `name`, compared case-insensitively.
    fn num_for_name(&self, name: &str) -> Option<usize>;

    /// Name of lump `num`.
    fn name(&self, num: usize) -> Option<&str>;

    /// Raw bytes of lump `num`.
    fn lump(&self, num: usize) -> Option<&[u8]>;

    /// Number of the lump called `name`, or a missing-lump error.
    fn require_num(&self, name: &str) -> Result<usize, AssetError> {
        self.num_for_name(name)
            .ok_or_else(|| AssetError::MissingLump(name.to_string()))
    }

    /// Raw bytes of lump `num`, or a missing-lump error.
    fn require_lump(&self, num: usize) -> Result<&[u8], AssetError> {
        self.lump(num).ok_or(AssetError::MissingLumpNum(num))
    }

    /// Raw bytes of the lump called `name`.
    fn lump_by_name(&self, name: &str) -> Result<&[u8], AssetError> {
        let num = self.require_num(name)?;
        self.require_lump(num)
    }
}

/// In-memory list of lumps. Later entries shadow earlier ones with the
/// same name, so patches loaded on top of a base set take effect.
#[derive(Debug, Clone, Default)]
pub struct LumpDirectory {
    lumps: Vec<(String, Vec<u8>)>,
}

impl LumpDirectory {
    /// Maximum lump name length in the archive format.
    pub const NAME_LEN: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lump and return its number. Names are stored uppercase
    /// and truncated to eight characters.
    pub fn push(&mut self, name: &str, data: impl Into<Vec<u8>>) -> usize {
        let name: String = name
            .chars()
            .take(Self::NAME_LEN)
            .collect::<String>()
            .to_ascii_uppercase();
        let data = data.into();
        trace!("lump {} = {} ({} bytes)", self.lumps.len(), name, data.len());
        self.lumps.push((name, data));
        self.lumps.len() - 1
    }

    pub fn len(&self) -> usize {
        self.lumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lumps.is_empty()
    }
}

impl LumpSource for LumpDirectory {
    fn num_for_name(&self, name: &str) -> Option<usize> {
        self.lumps
            .iter()
            .rposition(|(lump_name, _)| lump_name.eq_ignore_ascii_case(name))
    }

    fn name(&self, num: usize) -> Option<&str> {
        self.lumps.get(num).map(|(name, _)| name.as_str())
    }

    fn lump(&self, num: usize) -> Option<&[u8]> {
        self.lumps.get(num).map(|(_, data)| data.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut dir = LumpDirectory::new();
        dir.push("trantbl0", vec![1u8, 2, 3]);
        assert_eq!(dir.num_for_name("TRANTBL0"), Some(0));
        assert_eq!(dir.name(0), Some("TRANTBL0"));
        assert_eq!(dir.lump_by_name("TranTbl0").unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn later_lumps_shadow_earlier_ones() {
        let mut dir = LumpDirectory::new();
        dir.push("F_022", vec![0u8]);
        dir.push("BORDT", vec![1u8]);
        dir.push("F_022", vec![2u8]);
        assert_eq!(dir.len(), 3);
        assert_eq!(dir.lump_by_name("f_022").unwrap(), &[2]);
    }

    #[test]
    fn long_names_are_truncated() {
        let mut dir = LumpDirectory::new();
        dir.push("verylongname", Vec::<u8>::new());
        assert_eq!(dir.name(0), Some("VERYLONG"));
        assert_eq!(dir.num_for_name("verylong"), Some(0));
    }

    #[test]
    fn missing_lumps_are_errors() {
        let dir = LumpDirectory::new();
        assert!(dir.is_empty());
        assert_eq!(
            dir.lump_by_name("BORDTL"),
            Err(AssetError::MissingLump("BORDTL".to_string()))
        );
        assert_eq!(dir.require_lump(4), Err(AssetError::MissingLumpNum(4)));
    }
}
