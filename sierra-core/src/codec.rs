// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal decoder/encoder traits shared by the VMD and RBT video codec crates.

use crate::errors::Result;
use crate::packet::Packet;
use crate::palette::Palette;
use crate::plane::Plane;

/// A decoded video frame: a palette index plane plus the palette active at that frame.
pub struct VideoFrame {
    pub plane: Plane,
    pub palette: Palette,
}

/// Decodes a stream of packets for one video track into palette-indexed frames.
///
/// Implementors own their previous-frame plane and any codec-specific scratch buffers for the
/// lifetime of the decoder; there is no shared mutable state between instances.
pub trait VideoDecoder {
    /// Decode one packet into a frame.
    fn decode(&mut self, packet: &Packet) -> Result<VideoFrame>;

    /// Reset any cross-frame state (previous-frame plane, palette), as if newly constructed.
    fn reset(&mut self);
}

/// Encodes a stream of palette-index planes (quantized from 24-bit BGR input) into packets
/// carrying a VMD-style side-data prefix plus compressed payload.
pub trait VideoEncoder {
    /// Quantize and encode one 24-bit BGR frame of `width * height * 3` bytes.
    fn encode_bgr(&mut self, bgr: &[u8]) -> Result<Packet>;

    /// Reset the encoder's palette map and frame history.
    fn reset(&mut self);
}
