// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A minimal `.ass` `Dialogue:` line parser.
//!
//! The reference overlay tools hand frame timestamps to libass and composite whatever glyphs it
//! rasterizes. This workspace carries no font-rendering crate, so cue text is not rasterized;
//! instead each active cue is represented by its time range and painted as a placeholder caption
//! bar (see `overlay::paint_caption_bar`). Parsing cue windows from the script is still real and
//! drives exactly when that bar appears.

use std::fs;
use std::path::Path;

use sierra_core::errors::{decode_error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Parse every `Dialogue:` line's start/end timestamps out of an `.ass` script.
pub fn parse_cues(path: &Path) -> Result<Vec<Cue>> {
    let contents = fs::read_to_string(path)?;
    let mut cues = Vec::new();

    for line in contents.lines() {
        let Some(rest) = line.strip_prefix("Dialogue:") else { continue };
        let fields: Vec<&str> = rest.splitn(10, ',').collect();
        if fields.len() < 3 {
            continue;
        }
        let start_ms = parse_timestamp(fields[1].trim())?;
        let end_ms = parse_timestamp(fields[2].trim())?;
        cues.push(Cue { start_ms, end_ms });
    }

    Ok(cues)
}

/// Parse an ASS timestamp of the form `H:MM:SS.cc` into milliseconds.
fn parse_timestamp(s: &str) -> Result<u64> {
    if s.is_empty() {
        return decode_error("empty ASS timestamp");
    }

    let mut parts = s.split(':');
    let hours: u64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minutes: u64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let sec_field = parts.next().unwrap_or("0.00");
    let mut sec_parts = sec_field.split('.');
    let seconds: u64 = sec_parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let centis: u64 = sec_parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

    Ok(((hours * 3600 + minutes * 60 + seconds) * 1000) + centis * 10)
}

/// Whether any cue covers the given frame timestamp.
pub fn is_active(cues: &[Cue], timestamp_ms: u64) -> bool {
    cues.iter().any(|c| timestamp_ms >= c.start_ms && timestamp_ms < c.end_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timestamp() {
        assert_eq!(parse_timestamp("0:00:01.50").unwrap(), 1500);
        assert_eq!(parse_timestamp("1:02:03.04").unwrap(), 3_723_040);
    }

    #[test]
    fn active_window_is_half_open() {
        let cues = vec![Cue { start_ms: 1000, end_ms: 2000 }];
        assert!(!is_active(&cues, 999));
        assert!(is_active(&cues, 1000));
        assert!(is_active(&cues, 1999));
        assert!(!is_active(&cues, 2000));
    }
}
