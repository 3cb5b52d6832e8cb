// Copyright (C) 2025 Dayton Fishell
// Raydraw Software Renderer
// This file is part of Raydraw.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! 16.16 fixed-point helpers used for texture stepping.

/// Signed 16.16 fixed-point value.
pub type Fixed = i32;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: Fixed = 1 << FRACBITS;

/// Promote a whole number to fixed point.
#[inline]
pub const fn to_fixed(value: i32) -> Fixed {
    value << FRACBITS
}

/// Integer part of a fixed-point value (arithmetic shift, rounds toward -inf).
#[inline]
pub const fn fixed_int(value: Fixed) -> i32 {
    value >> FRACBITS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_round_trip() {
        assert_eq!(to_fixed(3), 3 * FRACUNIT);
        assert_eq!(fixed_int(to_fixed(-7)), -7);
    }

    #[test]
    fn integer_part_floors_negative_fractions() {
        assert_eq!(fixed_int(FRACUNIT / 2), 0);
        assert_eq!(fixed_int(-FRACUNIT / 2), -1);
    }
}
