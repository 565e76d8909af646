// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The secondary, pair-encoded RLE coder nested inside a VMD method-3 literal run.

/// Decode up to `dest_len` bytes of pair-encoded RLE data from `src`, stopping once `src_count`
/// output bytes have been produced or the source/destination is exhausted.
///
/// Returns the decoded bytes and the number of input bytes consumed. Running out of source or
/// destination space stops decoding early rather than erroring, matching the reference decoder's
/// behavior of returning its current stream position.
pub fn rle_unpack(src: &[u8], src_count: usize, dest_len: usize) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(src_count.min(dest_len));
    let mut pos = 0usize;
    let mut used = 0usize;

    if src_count % 2 == 1 {
        if pos >= src.len() || out.len() >= dest_len {
            return (out, pos);
        }
        out.push(src[pos]);
        pos += 1;
        used += 1;
    }

    while used < src_count {
        if pos >= src.len() {
            break;
        }
        let l = src[pos];
        pos += 1;

        if l & 0x80 != 0 {
            let count = (l & 0x7F) as usize * 2;
            if out.len() + count > dest_len || pos + count > src.len() {
                return (out, pos);
            }
            out.extend_from_slice(&src[pos..pos + count]);
            pos += count;
            used += count;
        } else {
            let pairs = l as usize;
            if out.len() + pairs * 2 > dest_len || pos + 2 > src.len() {
                return (out, pos);
            }
            let run = [src[pos], src[pos + 1]];
            pos += 2;
            for _ in 0..pairs {
                out.push(run[0]);
                out.push(run[1]);
            }
            used += pairs * 2;
        }
    }

    (out, pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_count_emits_leading_raw_byte() {
        // src_count = 3 (odd): one raw byte, then a run pair (0x81 -> copy 2 raw bytes).
        let src = [0xAA, 0x81, 0x01, 0x02];
        let (out, consumed) = rle_unpack(&src, 3, 3);
        assert_eq!(out, vec![0xAA, 0x01, 0x02]);
        assert_eq!(consumed, 4);
    }

    #[test]
    fn run_length_pair_expands() {
        // l = 0x02 (no high bit): write the next 2-byte pair twice (4 bytes total).
        let src = [0x02, 0x11, 0x22];
        let (out, consumed) = rle_unpack(&src, 4, 4);
        assert_eq!(out, vec![0x11, 0x22, 0x11, 0x22]);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn stops_at_dest_cap() {
        let src = [0x02, 0x11, 0x22, 0x02, 0x33, 0x44];
        let (out, _consumed) = rle_unpack(&src, 8, 2);
        assert_eq!(out, vec![0x11, 0x22]);
    }
}
