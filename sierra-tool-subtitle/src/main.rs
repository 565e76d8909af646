// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! `sierra-subtitle` burns `.ass` subtitle cues into a Sierra VMD or RBT video file, driven by a
//! pre-decoded raw-frame sidecar, and remuxes the result.

mod overlay;
mod raw_frames;
mod rbt_tool;
mod subtitle;
mod vmd_tool;

use std::path::PathBuf;
use std::process;

use clap::Parser;

#[derive(Parser)]
#[command(name = "sierra-subtitle", about = "Burn .ass subtitles into a Sierra VMD or RBT file")]
struct Args {
    /// Path to the .ass subtitle script.
    subtitles: PathBuf,

    /// Path to the input .vmd or .rbt file.
    input: PathBuf,

    /// Path to the pre-decoded raw-frame sidecar.
    raw_frames: PathBuf,

    /// Path to write the subtitled output to.
    output: PathBuf,

    /// Raise log verbosity to debug.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all but error-level logging.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    pretty_env_logger::formatted_builder()
        .parse_filters(&format!("sierra_subtitle={level}"))
        .init();

    if let Err(err) = run(&args) {
        log::error!("{err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> sierra_core::errors::Result<()> {
    let cues = subtitle::parse_cues(&args.subtitles)?;
    log::debug!("parsed {} subtitle cue(s)", cues.len());

    let extension = args.input.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("rbt") => rbt_tool::run(&cues, &args.input, &args.raw_frames, &args.output),
        _ => vmd_tool::run(&cues, &args.input, &args.raw_frames, &args.output),
    }
}
