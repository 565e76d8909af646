// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! # Sierra
//!
//! Sierra is a pure Rust codec and container toolkit for the Sierra VMD (Video/Multimedia Data)
//! and RBT (Robot) formats used by 1990s Sierra On-Line game engines.
//!
//! ## Formats
//!
//! | Format | Feature Flag | Default | Read | Write |
//! |--------|--------------|---------|------|-------|
//! | VMD    | `vmd`        | Yes     | Yes  | Yes   |
//! | RBT    | `rbt`        | Yes     | Yes  | Yes (frame codec only; see [`codecs::RbtEncoder`]) |
//!
//! ## Usage
//!
//! Decode a VMD file's video track frame by frame:
//!
//! ```no_run
//! use std::fs::File;
//! use sierra::codecs::VmdDecoder;
//! use sierra::core::codec::VideoDecoder;
//! use sierra::formats::VmdReader;
//!
//! # fn run() -> sierra::core::errors::Result<()> {
//! let mut reader = VmdReader::open(File::open("intro.vmd")?)?;
//! let mut decoder = VmdDecoder::new(reader.width, reader.height, reader.decode_buffer_size);
//!
//! for info in reader.frames().to_vec() {
//!     if info.frame_type != 2 {
//!         continue;
//!     }
//!     let packet = reader.read_frame_payload(&info)?;
//!     let frame = decoder.decode(&packet)?;
//!     let _ = frame.plane;
//! }
//! # Ok(())
//! # }
//! ```

pub use sierra_core as core;

pub mod codecs {
    //! Re-exports of the enabled video codecs.

    #[cfg(feature = "rbt")]
    pub use sierra_codec_rbt::{RbtDecoder, RbtEncoder};
    #[cfg(feature = "vmd")]
    pub use sierra_codec_vmd::{VmdDecoder, VmdEncoder};
}

pub mod formats {
    //! Re-exports of the enabled container readers and writers.

    #[cfg(feature = "rbt")]
    pub use sierra_format::RbtReader;
    #[cfg(feature = "vmd")]
    pub use sierra_format::{VmdFrameInfo, VmdReader, VmdWriter};
}
