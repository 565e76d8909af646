// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compositing a subtitle cue onto a decoded frame.
//!
//! The reference tool hands each frame's timestamp to an external rasterizer and composites
//! whatever RGBA layer comes back, writing the nearest palette index wherever a pixel's alpha
//! exceeds `0x70`. This workspace has no glyph rasterizer, so the "layer" is a fixed caption bar
//! covering the bottom of the frame rather than shaped text; the nearest-palette-index compositing
//! step downstream of that layer is real.

use sierra_core::palette::Palette;
use sierra_core::plane::Plane;

/// Fraction of the frame height the caption bar covers, anchored to the bottom.
const BAR_HEIGHT_FRACTION: usize = 8;

/// The caption bar's fill color, chosen to read as a plain light card behind text.
const BAR_RGB: (u8, u8, u8) = (0xC8, 0xC8, 0xC8);

/// Paint the caption bar into `plane` using the palette index nearest `BAR_RGB`.
pub fn paint_caption_bar(plane: &mut Plane, palette: &Palette) {
    let index = palette.nearest(BAR_RGB.0, BAR_RGB.1, BAR_RGB.2);
    let height = plane.height();
    let bar_rows = (height / BAR_HEIGHT_FRACTION).max(1);
    let first_row = height.saturating_sub(bar_rows);

    for y in first_row..height {
        if let Ok(row) = plane.row_mut(y) {
            row.fill(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paints_bottom_rows_only() {
        let mut plane = Plane::new(4, 16);
        let mut palette = Palette::black();
        palette.set_entry(7, 0xC8, 0xC8, 0xC8);
        paint_caption_bar(&mut plane, &palette);

        assert_eq!(plane.get(0, 0).unwrap(), 0);
        assert_eq!(plane.get(0, 15).unwrap(), 7);
        assert_eq!(plane.get(3, 14).unwrap(), 7);
    }
}
